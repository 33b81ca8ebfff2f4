//! # Temporal Primitives: Identifier Clock and Datetime Parsing
//!
//! The renderer stamps every document with a fresh [`DocumentId`] drawn
//! from an [`IdSource`]. The source is injected rather than read from a
//! global clock so tests can substitute a deterministic sequence.
//!
//! ## Uniqueness
//!
//! Wall-clock time alone does not guarantee unique identifiers: two
//! renders inside one clock tick, or a clock stepping backwards, would
//! collide. [`MonotonicIdSource`] therefore hands out
//! `max(now_nanos, last + 1)` through an atomic compare-and-swap, which is
//! strictly increasing across all threads sharing the source.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, FixedOffset, Utc};

use crate::identity::DocumentId;

/// A source of document identifiers.
///
/// Implementations must be safe to sample concurrently and must never
/// return the same identifier twice.
pub trait IdSource: Send + Sync {
    /// Produce the next identifier.
    fn next_id(&self) -> DocumentId;
}

impl<T: IdSource + ?Sized> IdSource for &T {
    fn next_id(&self) -> DocumentId {
        (**self).next_id()
    }
}

impl<T: IdSource + ?Sized> IdSource for std::sync::Arc<T> {
    fn next_id(&self) -> DocumentId {
        (**self).next_id()
    }
}

/// Wall-clock identifier source with a monotonic tie-breaker.
#[derive(Debug, Default)]
pub struct MonotonicIdSource {
    last: AtomicU64,
}

impl MonotonicIdSource {
    /// Create a source with no history.
    pub fn new() -> Self {
        Self::default()
    }

    fn now_nanos() -> u64 {
        Utc::now()
            .timestamp_nanos_opt()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0)
    }
}

impl IdSource for MonotonicIdSource {
    fn next_id(&self) -> DocumentId {
        let now = Self::now_nanos();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return DocumentId::from_raw(next),
                Err(observed) => last = observed,
            }
        }
    }
}

/// Deterministic identifier source: `start`, `start + 1`, ...
#[derive(Debug)]
pub struct SequenceIdSource {
    next: AtomicU64,
}

impl SequenceIdSource {
    /// Start the sequence at `start`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdSource for SequenceIdSource {
    fn next_id(&self) -> DocumentId {
        DocumentId::from_raw(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Parse an RFC 3339 timestamp with optional fractional seconds.
///
/// Accepts `Z` and numeric offsets, e.g. `2026-01-15T12:00:00Z` or
/// `2026-01-15T12:00:00.123+05:30`.
pub fn parse_datetime(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("invalid RFC 3339 timestamp {s:?}: {e}"))
}
