//! Observability vocabulary.
//!
//! Library code emits `tracing` events with an `event` field taken from [`events`] and
//! correlation fields built with [`fields`]. No global subscriber is installed here;
//! binaries and tests own `tracing_subscriber` initialization.

pub mod events;
pub mod fields;
