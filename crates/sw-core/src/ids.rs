use core::fmt;

use crate::error::{ApiError, ApiResult};

/// Object type tags agreed with the model loader.
///
/// Each type owns a dense, zero-based index space sized at Open time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectType {
    Gage,
    Subcatchment,
    Node,
    Link,
    Pollutant,
    Landuse,
    TimePattern,
    Curve,
    TimeSeries,
    Control,
    Transect,
    Aquifer,
    UnitHydrograph,
    Snowmelt,
    Shape,
    Lid,
}

impl ObjectType {
    pub const ALL: [ObjectType; 16] = [
        ObjectType::Gage,
        ObjectType::Subcatchment,
        ObjectType::Node,
        ObjectType::Link,
        ObjectType::Pollutant,
        ObjectType::Landuse,
        ObjectType::TimePattern,
        ObjectType::Curve,
        ObjectType::TimeSeries,
        ObjectType::Control,
        ObjectType::Transect,
        ObjectType::Aquifer,
        ObjectType::UnitHydrograph,
        ObjectType::Snowmelt,
        ObjectType::Shape,
        ObjectType::Lid,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    /// Whether objects of this type expose a string ID through the boundary.
    pub fn has_ids(self) -> bool {
        !matches!(
            self,
            ObjectType::Control | ObjectType::Shape | ObjectType::Lid
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Gage => "gage",
            ObjectType::Subcatchment => "subcatchment",
            ObjectType::Node => "node",
            ObjectType::Link => "link",
            ObjectType::Pollutant => "pollutant",
            ObjectType::Landuse => "landuse",
            ObjectType::TimePattern => "time pattern",
            ObjectType::Curve => "curve",
            ObjectType::TimeSeries => "time series",
            ObjectType::Control => "control rule",
            ObjectType::Transect => "transect",
            ObjectType::Aquifer => "aquifer",
            ObjectType::UnitHydrograph => "unit hydrograph",
            ObjectType::Snowmelt => "snowmelt",
            ObjectType::Shape => "shape",
            ObjectType::Lid => "LID",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for ObjectType {
    type Error = ApiError;

    fn try_from(code: i32) -> ApiResult<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| ObjectType::ALL.get(i).copied())
            .ok_or(ApiError::ParamOutOfRange {
                what: "object type",
                code,
            })
    }
}

/// Reference to an object by type tag and dense index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub kind: ObjectType,
    pub index: usize,
}

impl ObjectRef {
    pub fn new(kind: ObjectType, index: usize) -> Self {
        Self { kind, index }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.index)
    }
}
