//! sw-core: stable foundation for the simulation toolkit.
//!
//! Contains:
//! - error (boundary error taxonomy + integer status codes)
//! - ids (object type tags and object references)
//! - numeric (Real + tolerances + guarded arithmetic)
//! - units (quantity kinds, unit systems, conversion table)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{ApiError, ApiResult, error_message};
pub use ids::*;
pub use numeric::*;
pub use units::{FlowUnits, L_PER_FT3, Quantity, UnitConverter, UnitSystem, seconds_to_hours};
