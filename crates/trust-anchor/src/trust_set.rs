//! Immutable, indexed trust sets.

use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::anchor::Anchor;
use crate::chain::{self, ValidationOptions};
use crate::decision::TrustDecision;
use crate::error::{AnchorError, Result};
use crate::hash::Fingerprint;

/// Source of trust set versions. Every built set gets a fresh number.
static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// An immutable snapshot of trusted anchors with common-name and
/// fingerprint indexes.
///
/// Anchors keep their load order. The fingerprint index is unique (loading
/// rejects duplicates); the common-name index keeps the first anchor loaded
/// under each name.
#[derive(Debug)]
pub struct TrustSet {
    version: u64,
    anchors: Vec<Arc<Anchor>>,
    by_common_name: HashMap<String, usize>,
    by_fingerprint: HashMap<Fingerprint, usize>,
}

impl TrustSet {
    /// Build a trust set from DER-encoded certificates.
    ///
    /// Fails closed: one undecodable entry or one repeated fingerprint
    /// rejects the whole input.
    pub fn load<I, B>(raw_anchors: I) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut anchors = Vec::new();
        let mut by_common_name = HashMap::new();
        let mut by_fingerprint = HashMap::new();

        for (position, der) in raw_anchors.into_iter().enumerate() {
            let anchor = Anchor::from_der(der.as_ref(), position)?;

            match by_fingerprint.entry(*anchor.fingerprint()) {
                Entry::Occupied(existing) => {
                    return Err(AnchorError::DuplicateFingerprint {
                        fingerprint: *anchor.fingerprint(),
                        first: *existing.get(),
                        second: position,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
            }

            if let Some(cn) = anchor.common_name() {
                match by_common_name.entry(cn.to_owned()) {
                    Entry::Occupied(existing) => {
                        debug!(
                            common_name = cn,
                            kept = *existing.get(),
                            shadowed = position,
                            "duplicate common name, keeping first loaded"
                        );
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(position);
                    }
                }
            }

            anchors.push(Arc::new(anchor));
        }

        let version = NEXT_VERSION.fetch_add(1, Ordering::Relaxed);
        info!(version, anchors = anchors.len(), "trust set loaded");

        Ok(Self {
            version,
            anchors,
            by_common_name,
            by_fingerprint,
        })
    }

    /// A trust set with no anchors. Nothing validates against it.
    pub fn empty() -> Self {
        Self {
            version: NEXT_VERSION.fetch_add(1, Ordering::Relaxed),
            anchors: Vec::new(),
            by_common_name: HashMap::new(),
            by_fingerprint: HashMap::new(),
        }
    }

    /// Exact, case-sensitive lookup by subject common name.
    pub fn find_by_common_name(&self, cname: &str) -> Option<&Arc<Anchor>> {
        self.by_common_name.get(cname).map(|&i| &self.anchors[i])
    }

    pub fn find_by_fingerprint(&self, fingerprint: &Fingerprint) -> Option<&Arc<Anchor>> {
        self.by_fingerprint.get(fingerprint).map(|&i| &self.anchors[i])
    }

    /// All anchors, in load order.
    pub fn anchors(&self) -> &[Arc<Anchor>] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Validate a chain (leaf first) at a fixed time with default options.
    pub fn validate_at<B: AsRef<[u8]>>(&self, chain: &[B], at: DateTime<Utc>) -> TrustDecision {
        self.validate_with(chain, at, &ValidationOptions::default())
    }

    pub fn validate_with<B: AsRef<[u8]>>(
        &self,
        chain: &[B],
        at: DateTime<Utc>,
        options: &ValidationOptions,
    ) -> TrustDecision {
        chain::validate(self, chain, at, options)
    }
}
