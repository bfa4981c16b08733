//! Flutter-facing bindings over `timeprogress_core`.

pub mod api;
