//! Domain model for timeline events.
//!
//! # Responsibility
//! - Define canonical data structures persisted by the event store.
//! - Keep presentation-only state (theme, routing) out of core.
//!
//! # Invariants
//! - Every event is identified by a stable `EventId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod event;
