//! Display-unit conversion.
//!
//! Internal state is always held in US customary base units (ft, ft², ft³,
//! cfs, ft/s). Every value crossing the boundary is multiplied by the factor
//! for its [`Quantity`] on read and divided by it on write.

use uom::si::f64::{Length as UomLength, Time as UomTime};

use crate::error::{ApiError, ApiResult};

pub type Length = UomLength;
pub type Time = UomTime;

/// Litres per cubic foot.
pub const L_PER_FT3: f64 = 28.317;

#[inline]
pub fn ft(v: f64) -> Length {
    use uom::si::length::foot;
    Length::new::<foot>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Convert an accumulated duration in seconds to hours.
#[inline]
pub fn seconds_to_hours(v: f64) -> f64 {
    use uom::si::time::hour;
    s(v).get::<hour>()
}

/// Caller-selected unit convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum UnitSystem {
    #[default]
    Us,
    Si,
}

impl UnitSystem {
    pub fn code(self) -> i32 {
        self as i32
    }

    fn column(self) -> usize {
        self as usize
    }
}

/// Flow units; each implies a unit system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum FlowUnits {
    #[default]
    Cfs,
    Gpm,
    Mgd,
    Cms,
    Lps,
    Mld,
}

impl FlowUnits {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn unit_system(self) -> UnitSystem {
        match self {
            FlowUnits::Cfs | FlowUnits::Gpm | FlowUnits::Mgd => UnitSystem::Us,
            FlowUnits::Cms | FlowUnits::Lps | FlowUnits::Mld => UnitSystem::Si,
        }
    }

    /// Display flow per cfs.
    pub fn factor(self) -> f64 {
        match self {
            FlowUnits::Cfs => 1.0,
            FlowUnits::Gpm => 448.831,
            FlowUnits::Mgd => 0.64632,
            FlowUnits::Cms => 0.02832,
            FlowUnits::Lps => 28.317,
            FlowUnits::Mld => 2.4466,
        }
    }
}

impl TryFrom<i32> for FlowUnits {
    type Error = ApiError;

    fn try_from(code: i32) -> ApiResult<Self> {
        Ok(match code {
            0 => FlowUnits::Cfs,
            1 => FlowUnits::Gpm,
            2 => FlowUnits::Mgd,
            3 => FlowUnits::Cms,
            4 => FlowUnits::Lps,
            5 => FlowUnits::Mld,
            _ => {
                return Err(ApiError::ParamOutOfRange {
                    what: "flow units",
                    code,
                });
            }
        })
    }
}

/// Category of physical measurement; selects the conversion factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Rainfall intensity (in/hr, mm/hr).
    Rainfall,
    /// Rain or snow depth (in, mm).
    RainDepth,
    /// Evaporation rate (in/day, mm/day).
    EvapRate,
    Length,
    /// Length squared; never a table entry of its own.
    Area,
    /// Subcatchment land area (ac, ha).
    LandArea,
    /// Dedicated volume factor rather than length cubed.
    Volume,
    /// Pollutant mass (lb, kg).
    Mass,
    Flow,
    Dimensionless,
}

// Rows follow the order of the table variants in `Quantity`; columns are (US, SI).
const RAINFALL: [f64; 2] = [43_200.0, 1_097_280.0];
const RAINDEPTH: [f64; 2] = [12.0, 304.8];
const EVAPRATE: [f64; 2] = [1_036_800.0, 26_334_720.0];
const LENGTH: [f64; 2] = [1.0, 0.3048];
const LANDAREA: [f64; 2] = [2.2956e-5, 0.92903e-5];
const VOLUME: [f64; 2] = [1.0, 0.02832];
const MASS: [f64; 2] = [2.203e-6, 1.0e-6];

/// Pure conversion between internal and display values.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct UnitConverter {
    system: UnitSystem,
    flow: FlowUnits,
}

impl UnitConverter {
    pub fn new(system: UnitSystem, flow: FlowUnits) -> Self {
        Self { system, flow }
    }

    /// Converter whose unit system is implied by its flow units.
    pub fn from_flow_units(flow: FlowUnits) -> Self {
        Self::new(flow.unit_system(), flow)
    }

    pub fn system(&self) -> UnitSystem {
        self.system
    }

    pub fn flow_units(&self) -> FlowUnits {
        self.flow
    }

    /// Display units per internal unit.
    pub fn factor(&self, q: Quantity) -> f64 {
        let col = self.system.column();
        match q {
            Quantity::Rainfall => RAINFALL[col],
            Quantity::RainDepth => RAINDEPTH[col],
            Quantity::EvapRate => EVAPRATE[col],
            Quantity::Length => LENGTH[col],
            Quantity::Area => LENGTH[col] * LENGTH[col],
            Quantity::LandArea => LANDAREA[col],
            Quantity::Volume => VOLUME[col],
            Quantity::Mass => MASS[col],
            Quantity::Flow => self.flow.factor(),
            Quantity::Dimensionless => 1.0,
        }
    }

    /// Internal -> display.
    #[inline]
    pub fn to_display(&self, q: Quantity, internal: f64) -> f64 {
        internal * self.factor(q)
    }

    /// Display -> internal.
    #[inline]
    pub fn to_internal(&self, q: Quantity, display: f64) -> f64 {
        display / self.factor(q)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::numeric::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    const QUANTITIES: [Quantity; 10] = [
        Quantity::Rainfall,
        Quantity::RainDepth,
        Quantity::EvapRate,
        Quantity::Length,
        Quantity::Area,
        Quantity::LandArea,
        Quantity::Volume,
        Quantity::Mass,
        Quantity::Flow,
        Quantity::Dimensionless,
    ];

    proptest! {
        #[test]
        fn display_round_trip(v in -1.0e6_f64..1.0e6, q in 0usize..10, flow in 0i32..6) {
            let conv = UnitConverter::from_flow_units(FlowUnits::try_from(flow).unwrap());
            let q = QUANTITIES[q];
            let back = conv.to_internal(q, conv.to_display(q, v));
            let tol = Tolerances { abs: 1e-9, rel: 1e-12 };
            prop_assert!(nearly_equal(back, v, tol));
        }
    }
}
