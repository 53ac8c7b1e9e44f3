//! Parameter enumerations addressed by integer code at the boundary.
//!
//! Each enum is closed: an unknown code is a `ParamOutOfRange` error from
//! `TryFrom<i32>`. Physical parameters also name the [`Quantity`] that
//! selects their display conversion.

use sw_core::{ApiError, ApiResult, Quantity};

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $code),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> i32 {
                self as i32
            }
        }

        impl TryFrom<i32> for $name {
            type Error = ApiError;

            fn try_from(code: i32) -> ApiResult<Self> {
                match code {
                    $($code => Ok($name::$variant),)+
                    _ => Err(ApiError::ParamOutOfRange { what: $what, code }),
                }
            }
        }
    };
}

code_enum! {
    /// Node input parameters.
    NodeParam, "node parameter" {
        InvertElev = 0,
        FullDepth = 1,
        SurchargeDepth = 2,
        PondedArea = 3,
        InitDepth = 4,
        SurfaceArea = 5,
        CouplingArea = 6,
        OverlandDepth = 7,
    }
}

impl NodeParam {
    pub fn quantity(self) -> Quantity {
        match self {
            NodeParam::PondedArea | NodeParam::SurfaceArea | NodeParam::CouplingArea => {
                Quantity::Area
            }
            NodeParam::InvertElev
            | NodeParam::FullDepth
            | NodeParam::SurchargeDepth
            | NodeParam::InitDepth
            | NodeParam::OverlandDepth => Quantity::Length,
        }
    }
}

code_enum! {
    /// Link input parameters.
    LinkParam, "link parameter" {
        Offset1 = 0,
        Offset2 = 1,
        InitFlow = 2,
        FlowLimit = 3,
        InletLoss = 4,
        OutletLoss = 5,
        AvgLoss = 6,
    }
}

impl LinkParam {
    pub fn quantity(self) -> Quantity {
        match self {
            LinkParam::Offset1 | LinkParam::Offset2 => Quantity::Length,
            LinkParam::InitFlow | LinkParam::FlowLimit => Quantity::Flow,
            LinkParam::InletLoss | LinkParam::OutletLoss | LinkParam::AvgLoss => {
                Quantity::Dimensionless
            }
        }
    }

    /// Offsets shape the hydraulic grid and cannot change mid-run.
    pub fn locked_while_running(self) -> bool {
        matches!(self, LinkParam::Offset1 | LinkParam::Offset2)
    }
}

code_enum! {
    /// Subcatchment input parameters.
    SubcatchParam, "subcatchment parameter" {
        Width = 0,
        Area = 1,
        FracImperv = 2,
        Slope = 3,
        CurbLength = 4,
    }
}

impl SubcatchParam {
    pub fn quantity(self) -> Quantity {
        match self {
            SubcatchParam::Width | SubcatchParam::CurbLength => Quantity::Length,
            SubcatchParam::Area => Quantity::LandArea,
            SubcatchParam::FracImperv | SubcatchParam::Slope => Quantity::Dimensionless,
        }
    }
}

code_enum! {
    /// Instantaneous node results.
    NodeResult, "node result" {
        TotalInflow = 0,
        TotalOutflow = 1,
        Losses = 2,
        Volume = 3,
        Flooding = 4,
        Depth = 5,
        Head = 6,
        LateralInflow = 7,
        CouplingInflow = 8,
    }
}

impl NodeResult {
    pub fn quantity(self) -> Quantity {
        match self {
            NodeResult::Volume => Quantity::Volume,
            NodeResult::Depth | NodeResult::Head => Quantity::Length,
            NodeResult::TotalInflow
            | NodeResult::TotalOutflow
            | NodeResult::Losses
            | NodeResult::Flooding
            | NodeResult::LateralInflow
            | NodeResult::CouplingInflow => Quantity::Flow,
        }
    }
}

code_enum! {
    /// Instantaneous link results.
    LinkResult, "link result" {
        Flow = 0,
        Depth = 1,
        Volume = 2,
        UpstreamSurfaceArea = 3,
        DownstreamSurfaceArea = 4,
        Setting = 5,
        TargetSetting = 6,
        Froude = 7,
    }
}

impl LinkResult {
    pub fn quantity(self) -> Quantity {
        match self {
            LinkResult::Flow => Quantity::Flow,
            LinkResult::Depth => Quantity::Length,
            LinkResult::Volume => Quantity::Volume,
            LinkResult::UpstreamSurfaceArea | LinkResult::DownstreamSurfaceArea => Quantity::Area,
            LinkResult::Setting | LinkResult::TargetSetting | LinkResult::Froude => {
                Quantity::Dimensionless
            }
        }
    }
}

code_enum! {
    /// Instantaneous subcatchment results.
    SubcatchResult, "subcatchment result" {
        Rainfall = 0,
        Evaporation = 1,
        Infiltration = 2,
        Runon = 3,
        Runoff = 4,
        SnowDepth = 5,
    }
}

impl SubcatchResult {
    pub fn quantity(self) -> Quantity {
        match self {
            SubcatchResult::Rainfall | SubcatchResult::Infiltration => Quantity::Rainfall,
            SubcatchResult::Evaporation => Quantity::EvapRate,
            SubcatchResult::Runon | SubcatchResult::Runoff => Quantity::Flow,
            SubcatchResult::SnowDepth => Quantity::RainDepth,
        }
    }
}

code_enum! {
    /// Which simulation date-time to read or write.
    DateKind, "date kind" {
        Start = 0,
        End = 1,
        ReportStart = 2,
    }
}

code_enum! {
    /// Unit settings exposed as codes.
    UnitKind, "unit kind" {
        System = 0,
        Flow = 1,
    }
}

code_enum! {
    /// Analysis switches.
    AnalysisOption, "analysis option" {
        AllowPonding = 0,
        SkipSteadyState = 1,
        IgnoreRainfall = 2,
        IgnoreRdii = 3,
        IgnoreSnowmelt = 4,
        IgnoreGroundwater = 5,
        IgnoreRouting = 6,
        IgnoreQuality = 7,
    }
}

code_enum! {
    /// Numerical settings and continuity results.
    SimParam, "simulation parameter" {
        RouteStep = 0,
        MinRouteStep = 1,
        LengtheningStep = 2,
        StartDryDays = 3,
        CourantFactor = 4,
        MinSurfArea = 5,
        MinSlope = 6,
        RunoffError = 7,
        GroundwaterError = 8,
        FlowError = 9,
        QualityError = 10,
        HeadTolerance = 11,
        SysFlowTolerance = 12,
        LatFlowTolerance = 13,
    }
}

impl SimParam {
    pub fn quantity(self) -> Quantity {
        match self {
            SimParam::MinSurfArea => Quantity::Area,
            SimParam::HeadTolerance => Quantity::Length,
            _ => Quantity::Dimensionless,
        }
    }
}

code_enum! {
    /// Opening geometry and coefficients.
    OpeningParam, "opening parameter" {
        Area = 0,
        Length = 1,
        OrificeCoeff = 2,
        FreeWeirCoeff = 3,
        SubmergedWeirCoeff = 4,
    }
}

impl OpeningParam {
    pub fn quantity(self) -> Quantity {
        match self {
            OpeningParam::Area => Quantity::Area,
            OpeningParam::Length => Quantity::Length,
            OpeningParam::OrificeCoeff
            | OpeningParam::FreeWeirCoeff
            | OpeningParam::SubmergedWeirCoeff => Quantity::Dimensionless,
        }
    }
}
