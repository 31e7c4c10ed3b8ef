//! Chain validation against a trust set.
//!
//! The walk goes leaf to terminus. At each position the certificate must
//! decode and be inside its validity window; every certificate except the
//! last must name the next one as issuer and carry a signature that verifies
//! under the next one's key. The first failure decides the reason.
//!
//! The terminus is then matched against the trust set by SPKI fingerprint.
//! A match is only trusted while the stored anchor is inside its own window,
//! and a self-issued terminus that is not byte-identical to the anchor must
//! carry a valid self-signature.
//! With anchor completion enabled, a terminus that is not itself an anchor
//! may still be trusted when an anchor issued it.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use x509_parser::certificate::X509Certificate;

use crate::anchor::{parse_der, Anchor};
use crate::config::ResolverConfig;
use crate::decision::{TrustDecision, TrustReason};
use crate::hash::Fingerprint;
use crate::trust_set::TrustSet;

/// Knobs for a validation query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Longest chain accepted
    pub max_chain_depth: usize,
    /// Search the trust set for the terminus' issuer
    pub anchor_completion: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_chain_depth: 8,
            anchor_completion: true,
        }
    }
}

impl From<&ResolverConfig> for ValidationOptions {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            max_chain_depth: config.max_chain_depth,
            anchor_completion: config.anchor_completion,
        }
    }
}

pub(crate) fn validate<B: AsRef<[u8]>>(
    set: &TrustSet,
    chain: &[B],
    at: DateTime<Utc>,
    options: &ValidationOptions,
) -> TrustDecision {
    let version = set.version();

    if chain.is_empty() {
        return TrustDecision::untrusted(TrustReason::EmptyChain, None, version);
    }
    if chain.len() > options.max_chain_depth {
        debug!(
            len = chain.len(),
            max = options.max_chain_depth,
            "chain exceeds depth limit"
        );
        return TrustDecision::untrusted(
            TrustReason::BrokenChain,
            Some(options.max_chain_depth),
            version,
        );
    }

    let parsed: Vec<_> = chain.iter().map(|der| parse_der(der.as_ref())).collect();
    let at_ts = at.timestamp();

    for depth in 0..parsed.len() {
        let cert = match &parsed[depth] {
            Ok(cert) => cert,
            Err(reason) => {
                debug!(depth, %reason, "chain certificate failed to decode");
                return TrustDecision::untrusted(TrustReason::BrokenChain, Some(depth), version);
            }
        };

        if !covers(cert, at_ts) {
            debug!(depth, subject = %cert.subject(), %at, "certificate outside validity window");
            return TrustDecision::untrusted(TrustReason::Expired, Some(depth), version);
        }

        let Some(next) = parsed.get(depth + 1) else {
            break;
        };
        let issuer = match next {
            Ok(issuer) => issuer,
            Err(reason) => {
                debug!(depth = depth + 1, %reason, "chain certificate failed to decode");
                return TrustDecision::untrusted(
                    TrustReason::BrokenChain,
                    Some(depth + 1),
                    version,
                );
            }
        };

        if cert.issuer().as_raw() != issuer.subject().as_raw() {
            debug!(
                depth,
                issuer = %cert.issuer(),
                next_subject = %issuer.subject(),
                "issuer name does not match next certificate"
            );
            return TrustDecision::untrusted(TrustReason::BrokenChain, Some(depth), version);
        }
        if let Err(e) = cert.verify_signature(Some(issuer.public_key())) {
            debug!(depth, error = %e, "signature link failed");
            return TrustDecision::untrusted(TrustReason::BrokenChain, Some(depth), version);
        }
    }

    let last_depth = parsed.len() - 1;
    let Ok(terminus) = &parsed[last_depth] else {
        // The walk above returns on any decode failure.
        return TrustDecision::untrusted(TrustReason::BrokenChain, Some(last_depth), version);
    };

    let fingerprint = Fingerprint::of(terminus.public_key().raw);
    if let Some(anchor) = set.find_by_fingerprint(&fingerprint) {
        let terminus_der = chain[last_depth].as_ref();
        return direct_hit(anchor, terminus, terminus_der, last_depth, at, version);
    }

    if options.anchor_completion {
        if let Some(decision) = complete(set, terminus, chain.len(), at, version) {
            return decision;
        }
    }

    debug!(%fingerprint, subject = %terminus.subject(), "chain terminates outside trust set");
    TrustDecision::untrusted(TrustReason::UntrustedRoot, None, version)
}

/// The terminus carries an anchor's key. It may be the stored certificate
/// itself or another certificate over the same key, so the stored anchor's
/// window still applies and a self-issued terminus must verify under its own
/// key.
fn direct_hit(
    anchor: &Arc<Anchor>,
    terminus: &X509Certificate<'_>,
    terminus_der: &[u8],
    last_depth: usize,
    at: DateTime<Utc>,
    version: u64,
) -> TrustDecision {
    let self_issued = terminus.issuer().as_raw() == terminus.subject().as_raw();
    if self_issued && terminus_der != anchor.der() {
        if let Err(e) = terminus.verify_signature(None) {
            debug!(
                depth = last_depth,
                anchor = %anchor.subject(),
                error = %e,
                "terminus shares an anchor key but its self-signature fails"
            );
            return TrustDecision::untrusted(TrustReason::BrokenChain, Some(last_depth), version);
        }
    }

    if !anchor.is_valid_at(at) {
        debug!(
            anchor = %anchor.subject(),
            not_after = %anchor.not_after(),
            %at,
            "matched anchor outside its validity window"
        );
        return TrustDecision::untrusted(TrustReason::Expired, Some(last_depth), version);
    }

    debug!(
        anchor = %anchor.subject(),
        fingerprint = %anchor.fingerprint(),
        "terminus is a trust anchor"
    );
    TrustDecision::trusted(Arc::clone(anchor), version)
}

/// Find an anchor that issued `terminus`, in load order.
///
/// An anchor that verifies the signature but is outside its own validity
/// window is remembered; if no in-window issuer turns up the decision is
/// `EXPIRED` at the position the anchor would occupy in the chain.
fn complete(
    set: &TrustSet,
    terminus: &X509Certificate<'_>,
    chain_len: usize,
    at: DateTime<Utc>,
    version: u64,
) -> Option<TrustDecision> {
    let issuer_raw = terminus.issuer().as_raw();
    let mut expired: Option<&Arc<Anchor>> = None;

    for anchor in set.anchors() {
        if anchor.subject_raw() != issuer_raw {
            continue;
        }
        let Ok(anchor_cert) = parse_der(anchor.der()) else {
            continue;
        };
        if terminus
            .verify_signature(Some(anchor_cert.public_key()))
            .is_err()
        {
            continue;
        }
        if anchor.is_valid_at(at) {
            debug!(anchor = %anchor.subject(), "terminus issued by trust anchor");
            return Some(TrustDecision::trusted(Arc::clone(anchor), version));
        }
        expired.get_or_insert(anchor);
    }

    expired.map(|anchor| {
        debug!(anchor = %anchor.subject(), %at, "issuing anchor outside validity window");
        TrustDecision::untrusted(TrustReason::Expired, Some(chain_len), version)
    })
}

fn covers(cert: &X509Certificate<'_>, at_ts: i64) -> bool {
    let validity = cert.validity();
    validity.not_before.timestamp() <= at_ts && at_ts <= validity.not_after.timestamp()
}
