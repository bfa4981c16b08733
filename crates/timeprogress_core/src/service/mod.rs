//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Combine stored events with timeline projections for UI/FFI callers.

pub mod event_service;
