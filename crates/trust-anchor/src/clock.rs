//! Injected time source for validity checks.
//!
//! Validation never reads the wall clock directly; the resolver asks its
//! [`Clock`], and tests pin time with [`FixedClock`].

use chrono::{DateTime, Utc};
use std::fmt;

/// Source of the verification time.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time. The default for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// The instant to report
    pub at: DateTime<Utc>,
}

impl FixedClock {
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}
