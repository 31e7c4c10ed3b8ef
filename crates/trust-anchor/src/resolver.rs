//! Process-wide resolver holding the active trust set.
//!
//! Readers grab the current [`TrustSet`] snapshot with one atomic load and
//! run against it to completion. [`TrustAnchorResolver::swap`] publishes a
//! new snapshot with one atomic store, so a query sees either the old set or
//! the new one, never a mix.

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::anchor::Anchor;
use crate::chain::ValidationOptions;
use crate::clock::{Clock, SystemClock};
use crate::config::ResolverConfig;
use crate::decision::TrustDecision;
use crate::error::{AnchorError, Result};
use crate::hash::Fingerprint;
use crate::source;
use crate::trust_set::TrustSet;

/// Trust anchor resolver.
///
/// Owns the active trust set, the validation options and the clock.
/// Cheap to share behind an `Arc`; all query methods take `&self`.
#[derive(Debug)]
pub struct TrustAnchorResolver {
    active: ArcSwap<TrustSet>,
    options: ValidationOptions,
    clock: Arc<dyn Clock>,
}

impl TrustAnchorResolver {
    /// Wrap an already-loaded trust set with default options and the
    /// system clock.
    pub fn new(trust_set: TrustSet) -> Self {
        if trust_set.is_empty() {
            warn!(version = trust_set.version(), "resolver started with an empty trust set");
        }
        Self {
            active: ArcSwap::from_pointee(trust_set),
            options: ValidationOptions::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Load the configured sources and build a resolver.
    ///
    /// Fails closed: any unreadable or malformed source, or an empty result
    /// when `allow_empty` is off, is an error.
    pub async fn from_config(config: &ResolverConfig) -> Result<Self> {
        let trust_set = load_checked(config).await?;
        Ok(Self::new(trust_set).with_options(ValidationOptions::from(config)))
    }

    #[must_use]
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub const fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// The trust set currently in force.
    pub fn snapshot(&self) -> Arc<TrustSet> {
        self.active.load_full()
    }

    /// Atomically replace the active trust set, returning the previous one.
    ///
    /// Queries already running keep the snapshot they started with.
    pub fn swap(&self, trust_set: TrustSet) -> Arc<TrustSet> {
        let new_version = trust_set.version();
        let new_len = trust_set.len();
        if trust_set.is_empty() {
            warn!(version = new_version, "swapping in an empty trust set");
        }
        let previous = self.active.swap(Arc::new(trust_set));
        info!(
            from = previous.version(),
            to = new_version,
            anchors = new_len,
            "trust set swapped"
        );
        previous
    }

    /// Reload anchors from `config.sources` and swap them in.
    ///
    /// On failure the active set is left untouched and the error returned.
    pub async fn reload(&self, config: &ResolverConfig) -> Result<Arc<TrustSet>> {
        match load_checked(config).await {
            Ok(trust_set) => Ok(self.swap(trust_set)),
            Err(e) => {
                warn!(
                    error = %e,
                    active = self.active.load().version(),
                    "trust set reload failed, keeping active set"
                );
                Err(e)
            }
        }
    }

    pub fn find_by_common_name(&self, cname: &str) -> Option<Arc<Anchor>> {
        self.active.load().find_by_common_name(cname).cloned()
    }

    pub fn find_by_fingerprint(&self, fingerprint: &Fingerprint) -> Option<Arc<Anchor>> {
        self.active.load().find_by_fingerprint(fingerprint).cloned()
    }

    /// Validate a chain (leaf first) at the clock's current time.
    pub fn validate<B: AsRef<[u8]>>(&self, chain: &[B]) -> TrustDecision {
        self.validate_at(chain, self.clock.now())
    }

    /// Validate a chain at an explicit time against the active snapshot.
    pub fn validate_at<B: AsRef<[u8]>>(&self, chain: &[B], at: DateTime<Utc>) -> TrustDecision {
        let snapshot = self.active.load_full();
        snapshot.validate_with(chain, at, &self.options)
    }
}

async fn load_checked(config: &ResolverConfig) -> Result<TrustSet> {
    let trust_set = source::load_trust_set(&config.sources).await?;
    if trust_set.is_empty() && !config.allow_empty {
        return Err(AnchorError::Config(
            "configured sources contain no anchors".to_string(),
        ));
    }
    Ok(trust_set)
}
