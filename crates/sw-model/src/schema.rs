//! Model definition schema.
//!
//! A `ModelDef` is the hand-off from the model loader: every object with its
//! parameters in display units, references by string ID. Building it yields
//! the fixed-size tables used while the project is open.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sw_core::FlowUnits;

use crate::objects::{ConcUnits, LinkType, NodeType, OutfallBoundary, RainSource};
use crate::options::{AnalysisOptions, SimSettings};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub options: OptionsDef,
    #[serde(default)]
    pub gages: Vec<GageDef>,
    #[serde(default)]
    pub subcatchments: Vec<SubcatchmentDef>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub links: Vec<LinkDef>,
    #[serde(default)]
    pub pollutants: Vec<PollutantDef>,
    #[serde(default)]
    pub landuses: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub curves: Vec<String>,
    #[serde(default)]
    pub timeseries: Vec<String>,
    #[serde(default)]
    pub controls: Vec<String>,
    #[serde(default)]
    pub transects: Vec<String>,
    #[serde(default)]
    pub aquifers: Vec<String>,
    #[serde(default)]
    pub unit_hydrographs: Vec<String>,
    #[serde(default)]
    pub snowmelts: Vec<String>,
}

/// Options block. `min_surf_area` and `head_tol` in `settings` are in
/// display units here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OptionsDef {
    #[serde(default)]
    pub flow_units: FlowUnits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_start: Option<NaiveDateTime>,
    #[serde(default)]
    pub analysis: AnalysisOptions,
    #[serde(default)]
    pub settings: SimSettings,
    #[serde(default)]
    pub report_controls: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GageDef {
    pub id: String,
    #[serde(default)]
    pub source: RainSource,
    #[serde(default = "default_snow_factor")]
    pub snow_factor: f64,
    /// Current intensity (in/hr or mm/hr).
    #[serde(default)]
    pub rainfall: f64,
}

fn default_snow_factor() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubcatchmentDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gage: Option<String>,
    /// Node or subcatchment ID; absent means runoff loads onto itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlet: Option<String>,
    /// Area (ac or ha).
    pub area: f64,
    pub width: f64,
    /// Impervious fraction, 0..1.
    #[serde(default)]
    pub imperv: f64,
    /// Slope, ft/ft or m/m.
    #[serde(default)]
    pub slope: f64,
    #[serde(default)]
    pub curb_length: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub id: String,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    pub invert_elev: f64,
    #[serde(default)]
    pub max_depth: f64,
    #[serde(default)]
    pub sur_depth: f64,
    #[serde(default)]
    pub ponded_area: f64,
    #[serde(default)]
    pub init_depth: f64,
    #[serde(default)]
    pub surface_area: f64,
    #[serde(default)]
    pub coupling_area: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfall: Option<OutfallDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageCurveDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutfallDef {
    #[serde(default)]
    pub boundary: OutfallBoundary,
    #[serde(default)]
    pub stage: f64,
}

/// `area = a * depth^b + c`, display units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StorageCurveDef {
    pub a: f64,
    #[serde(default)]
    pub b: f64,
    #[serde(default)]
    pub c: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkDef {
    pub id: String,
    #[serde(rename = "type", default)]
    pub link_type: LinkType,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub offset1: f64,
    #[serde(default)]
    pub offset2: f64,
    #[serde(default)]
    pub init_flow: f64,
    #[serde(default)]
    pub max_flow: f64,
    #[serde(default)]
    pub inlet_loss: f64,
    #[serde(default)]
    pub outlet_loss: f64,
    #[serde(default)]
    pub avg_loss: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollutantDef {
    pub id: String,
    #[serde(default)]
    pub units: ConcUnits,
}
