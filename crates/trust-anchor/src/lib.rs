//! # trust-anchor
//!
//! Certificate trust-set resolver.
//!
//! Holds a curated set of trust anchors (roots and intermediates such as
//! ISRG Root X1/X2 and the Let's Encrypt R3/E1 intermediates), answers
//! lookups by subject common name or key fingerprint, and decides whether a
//! candidate chain ends in a known anchor.
//!
//! ## Model
//!
//! - [`Anchor`] -- one decoded, immutable trusted certificate.
//! - [`TrustSet`] -- an immutable, versioned snapshot of anchors with a
//!   fingerprint index (unique) and a common-name index (first loaded wins).
//! - [`TrustDecision`] -- the outcome of one validation query. Untrusted
//!   chains are ordinary results, never errors.
//! - [`TrustAnchorResolver`] -- owns the active snapshot and swaps it
//!   atomically on reload.
//!
//! ## Data Flow
//!
//! ```text
//! Startup (may block on I/O, fails closed)
//!   ResolverConfig::load() -> source::read_sources() -> TrustSet::load()
//!   -> TrustAnchorResolver
//!
//! Query (pure, lock-free, no I/O)
//!   snapshot = active.load()
//!   walk chain leaf -> terminus: decode, validity window, issuer name, signature
//!   terminus fingerprint in snapshot? -> TRUSTED / EXPIRED (anchor window)
//!   else anchor completion (terminus issued by an anchor?) -> TRUSTED / EXPIRED
//!   else UNTRUSTED_ROOT
//!
//! Reload
//!   load new TrustSet off the hot path -> swap() (single atomic store)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use trust_anchor::{ResolverConfig, TrustAnchorResolver};
//!
//! let config = ResolverConfig::load("trust-anchor.toml".as_ref())?;
//! let resolver = TrustAnchorResolver::from_config(&config).await?;
//!
//! let decision = resolver.validate(&[leaf_der, intermediate_der]);
//! if decision.trusted {
//!     println!("trusted via {}", decision.matched_anchor.unwrap().subject());
//! }
//! ```

pub mod anchor;
pub mod chain;
pub mod clock;
pub mod config;
pub mod decision;
pub mod error;
pub mod hash;
pub mod resolver;
pub mod source;
pub mod trust_set;

pub use anchor::Anchor;
pub use chain::ValidationOptions;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ResolverConfig;
pub use decision::{TrustDecision, TrustReason};
pub use error::{AnchorError, Result};
pub use hash::Fingerprint;
pub use resolver::TrustAnchorResolver;
pub use trust_set::TrustSet;
