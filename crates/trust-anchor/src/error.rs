//! Error types for trust-set loading and configuration.
//!
//! Only load-time and configuration problems are errors. Validation
//! outcomes are ordinary values in [`crate::TrustDecision`].

use thiserror::Error;

use crate::hash::Fingerprint;

/// Result type alias for trust-anchor operations.
pub type Result<T> = std::result::Result<T, AnchorError>;

/// Errors that can occur while building or sourcing a trust set.
#[derive(Error, Debug)]
pub enum AnchorError {
    /// An anchor's bytes could not be decoded as an X.509 certificate.
    #[error("malformed anchor at position {index}: {reason}")]
    MalformedAnchor {
        /// Position of the entry in the load order
        index: usize,
        /// Decoder message
        reason: String,
    },

    /// Two anchors share a public-key fingerprint.
    #[error("duplicate anchor fingerprint {fingerprint} at positions {first} and {second}")]
    DuplicateFingerprint {
        /// The shared SPKI fingerprint
        fingerprint: Fingerprint,
        /// Position of the first entry carrying it
        first: usize,
        /// Position of the rejected entry
        second: usize,
    },

    /// Reading an anchor source failed.
    #[error("io error on {path}: {source}")]
    Io {
        /// File or directory being read
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// A PEM source could not be decoded.
    #[error("pem decode failed for {path}: {reason}")]
    PemDecode {
        /// Source file
        path: String,
        /// Decoder message
        reason: String,
    },

    /// Configuration is invalid or unreadable.
    #[error("config error: {0}")]
    Config(String),
}

impl AnchorError {
    /// Wrap an I/O error with the path that produced it.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from the anchor material itself rather than
    /// from reading it.
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MalformedAnchor { .. } | Self::DuplicateFingerprint { .. }
        )
    }
}
