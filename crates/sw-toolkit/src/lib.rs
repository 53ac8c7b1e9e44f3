//! sw-toolkit: the embedding boundary of the drainage engine.
//!
//! Provides:
//! - a three-phase lifecycle (Closed, Open, Started) gating every call
//! - typed accessors over nodes, links, subcatchments and gages, with
//!   display-unit conversion on the way in and out
//! - the per-node coupling opening registry
//! - live results and a read-only statistics façade
//! - an integer-coded [`api`] layer returning stable status codes

pub mod api;
pub mod inputs;
pub mod lifecycle;
pub mod objects;
pub mod openings;
pub mod options;
pub mod params;
pub mod results;
pub mod simulation;
pub mod stats;

#[cfg(test)]
mod testing;

// Re-exports for public API
pub use lifecycle::{Gate, Lifecycle, Phase};
pub use options::{DATETIME_FORMAT, DateParts, format_datetime, parse_datetime};
pub use params::*;
pub use simulation::{RunClock, Simulation};
pub use stats::*;
