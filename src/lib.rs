//! Incident reporting intake.
//!
//! The library carries three surfaces: the server-side intake pipeline with
//! its notification dispatch (`features::intake`, `features::notifications`),
//! the reporting-dialog core consumed by client embedders
//! (`features::dialog`), and the ambient plumbing (`core`, `shared`) the
//! binary wires together.

pub mod core;
pub mod features;
pub mod shared;
