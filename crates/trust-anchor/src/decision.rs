//! Trust decision values returned by chain validation.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::anchor::Anchor;

/// Why a chain was or was not trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustReason {
    /// Every link verified and the terminus matched an anchor.
    Trusted,
    /// The chain verifies internally but ends outside the trust set.
    UntrustedRoot,
    /// A certificate failed to decode, a link's signature or names did not
    /// match, or the chain exceeded the depth limit.
    BrokenChain,
    /// The verification time is outside some certificate's validity window.
    Expired,
    /// No certificates were supplied.
    EmptyChain,
}

impl TrustReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trusted => "TRUSTED",
            Self::UntrustedRoot => "UNTRUSTED_ROOT",
            Self::BrokenChain => "BROKEN_CHAIN",
            Self::Expired => "EXPIRED",
            Self::EmptyChain => "EMPTY_CHAIN",
        }
    }
}

impl fmt::Display for TrustReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one validation query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustDecision {
    /// Final verdict
    pub trusted: bool,
    /// The anchor the chain terminated in (only set when trusted)
    pub matched_anchor: Option<Arc<Anchor>>,
    pub reason: TrustReason,
    /// Chain position of the certificate that caused a failure
    pub depth: Option<usize>,
    /// Version of the trust set that answered
    pub trust_set_version: u64,
}

impl TrustDecision {
    pub(crate) fn trusted(anchor: Arc<Anchor>, version: u64) -> Self {
        Self {
            trusted: true,
            matched_anchor: Some(anchor),
            reason: TrustReason::Trusted,
            depth: None,
            trust_set_version: version,
        }
    }

    pub(crate) fn untrusted(reason: TrustReason, depth: Option<usize>, version: u64) -> Self {
        Self {
            trusted: false,
            matched_anchor: None,
            reason,
            depth,
            trust_set_version: version,
        }
    }

    /// Whether the chain is trusted. Same as the `trusted` field.
    pub const fn is_trusted(&self) -> bool {
        self.trusted
    }
}

impl fmt::Display for TrustDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)?;
        if let Some(anchor) = &self.matched_anchor {
            write!(f, " via {}", anchor.subject())?;
        }
        if let Some(depth) = self.depth {
            write!(f, " at depth {depth}")?;
        }
        Ok(())
    }
}
