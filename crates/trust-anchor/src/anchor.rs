//! Anchor decoding: DER bytes in, immutable [`Anchor`] out.

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;
use x509_parser::certificate::X509Certificate;
use x509_parser::time::ASN1Time;

use crate::error::{AnchorError, Result};
use crate::hash::Fingerprint;

/// One trusted certificate.
///
/// Built once when a trust set is loaded and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    der: Vec<u8>,
    common_name: Option<String>,
    fingerprint: Fingerprint,
    subject: String,
    issuer: String,
    subject_raw: Vec<u8>,
    serial: String,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    self_signed: bool,
    position: usize,
}

impl Anchor {
    /// Decode a DER certificate into an anchor.
    ///
    /// `position` is the entry's index in the load order and is carried into
    /// error messages and tie-breaks.
    pub fn from_der(der: &[u8], position: usize) -> Result<Self> {
        let cert = parse_der(der).map_err(|reason| AnchorError::MalformedAnchor {
            index: position,
            reason,
        })?;
        let malformed = |reason: String| AnchorError::MalformedAnchor {
            index: position,
            reason,
        };

        let common_name = subject_common_name(&cert);
        let not_before = asn1_to_utc(cert.validity().not_before).ok_or_else(|| {
            malformed("notBefore out of range".to_string())
        })?;
        let not_after = asn1_to_utc(cert.validity().not_after)
            .ok_or_else(|| malformed("notAfter out of range".to_string()))?;
        if not_after < not_before {
            return Err(malformed(format!(
                "validity window inverted: {not_before} > {not_after}"
            )));
        }

        let subject_raw = cert.subject().as_raw().to_vec();
        let self_signed = subject_raw.as_slice() == cert.issuer().as_raw()
            && cert.verify_signature(None).is_ok();

        Ok(Self {
            der: der.to_vec(),
            common_name,
            fingerprint: Fingerprint::of(cert.public_key().raw),
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            subject_raw,
            serial: cert.raw_serial_as_string(),
            not_before,
            not_after,
            self_signed,
            position,
        })
    }

    /// Raw DER encoding, exactly as loaded.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// First subject common name, if the certificate has one.
    pub fn common_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }

    pub const fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Subject distinguished name (human-readable)
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Issuer distinguished name (human-readable)
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Serial number (hex)
    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub const fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    pub const fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    pub const fn is_self_signed(&self) -> bool {
        self.self_signed
    }

    /// Index of this anchor in its trust set's load order.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Whether `at` falls inside the validity window (both ends inclusive).
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.not_before <= at && at <= self.not_after
    }

    pub(crate) fn subject_raw(&self) -> &[u8] {
        &self.subject_raw
    }
}

/// Decode a single DER certificate, rejecting trailing bytes.
pub(crate) fn parse_der(der: &[u8]) -> std::result::Result<X509Certificate<'_>, String> {
    match x509_parser::parse_x509_certificate(der) {
        Ok((rest, _)) if !rest.is_empty() => {
            Err(format!("{} trailing bytes after certificate", rest.len()))
        }
        Ok((_, cert)) => Ok(cert),
        Err(e) => Err(e.to_string()),
    }
}

/// First common name in the subject, when it is one of the string types
/// x509-parser reads as text (UTF8, Printable, IA5, Numeric). A CN in any
/// other encoding, BMPString included, leaves the anchor without a name.
pub(crate) fn subject_common_name(cert: &X509Certificate<'_>) -> Option<String> {
    let cn = cert.subject().iter_common_name().next()?;
    match cn.as_str() {
        Ok(name) => Some(name.to_owned()),
        Err(e) => {
            debug!(
                subject = %cert.subject(),
                tag = ?cn.attr_value().tag(),
                error = %e,
                "common name not decodable as text, anchor left out of name index"
            );
            None
        }
    }
}

/// Convert an ASN.1 `GeneralizedTime` / `UTCTime` to `DateTime<Utc>`.
pub(crate) fn asn1_to_utc(t: ASN1Time) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(t.timestamp(), 0).single()
}
