//! Injectable wall clock and external identifier generator.
//!
//! Engines never call `Utc::now()` or `Uuid::now_v7()` directly so that
//! tests can pin the registration date and identifiers.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::types::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Source of time-ordered, globally unique 128-bit identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self, at: Timestamp) -> Uuid;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// UUIDv7 generator. The leading 48 bits carry the millisecond timestamp, so
/// ids sort lexicographically in creation order.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self, at: Timestamp) -> Uuid {
        let millis = at.timestamp_millis().max(0) as u64;
        let ts = uuid::Timestamp::from_unix(
            uuid::NoContext,
            millis / 1000,
            ((millis % 1000) * 1_000_000) as u32,
        );
        Uuid::new_v7(ts)
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

pub type SharedClock = Arc<dyn Clock>;
pub type SharedIdGenerator = Arc<dyn IdGenerator>;
