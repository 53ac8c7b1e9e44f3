//! Object records held in the per-type tables.
//!
//! All physical fields are stored in internal units (ft, ft², ft³, cfs, ft/s).
//! Live result fields are written by the external routing engine and only
//! read through the toolkit.

use serde::{Deserialize, Serialize};

/// Node subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    #[default]
    Junction,
    Outfall,
    Storage,
    Divider,
}

impl NodeType {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Link subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    #[default]
    Conduit,
    Pump,
    Orifice,
    Weir,
    Outlet,
}

impl LinkType {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Boundary condition at an outfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutfallBoundary {
    #[default]
    Free,
    Normal,
    Fixed,
    Tidal,
    Timeseries,
    /// Stage supplied by an external caller; held until set again.
    Staged,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outfall {
    pub boundary: OutfallBoundary,
    /// Boundary stage (ft).
    pub stage: f64,
}

/// Functional storage curve: `area(d) = a * d^b + c` in ft² for depth in ft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl StorageCurve {
    /// Stored volume (ft³) at depth `d` (ft).
    pub fn volume(&self, d: f64) -> f64 {
        if d <= 0.0 {
            return 0.0;
        }
        self.a / (self.b + 1.0) * d.powf(self.b + 1.0) + self.c * d
    }
}

/// What an external inflow carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflowParam {
    Flow,
    Pollutant(usize),
}

/// External inflow attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtInflow {
    pub param: InflowParam,
    pub baseline: f64,
    pub scale_factor: f64,
    /// Value last pushed through the toolkit (cfs for flow inflows).
    pub iface_inflow: f64,
}

impl ExtInflow {
    /// A flow inflow with no time series, no pattern and unit scaling.
    pub fn flow() -> Self {
        Self {
            param: InflowParam::Flow,
            baseline: 0.0,
            scale_factor: 1.0,
            iface_inflow: 0.0,
        }
    }
}

/// Live node results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeState {
    pub inflow: f64,
    pub outflow: f64,
    pub losses: f64,
    pub new_volume: f64,
    pub overflow: f64,
    pub new_depth: f64,
    pub new_lat_flow: f64,
    pub coupling_inflow: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub node_type: NodeType,
    pub invert_elev: f64,
    pub full_depth: f64,
    pub sur_depth: f64,
    pub ponded_area: f64,
    pub init_depth: f64,
    pub surface_area: f64,
    pub coupling_area: f64,
    pub overland_depth: f64,
    /// Derived from `surface_area`/`full_depth` (or the storage curve).
    pub full_volume: f64,
    pub outfall: Option<Outfall>,
    pub storage: Option<StorageCurve>,
    pub ext_inflows: Vec<ExtInflow>,
    pub state: NodeState,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            invert_elev: 0.0,
            full_depth: 0.0,
            sur_depth: 0.0,
            ponded_area: 0.0,
            init_depth: 0.0,
            surface_area: 0.0,
            coupling_area: 0.0,
            overland_depth: 0.0,
            full_volume: 0.0,
            outfall: (node_type == NodeType::Outfall).then(Outfall::default),
            storage: None,
            ext_inflows: Vec::new(),
            state: NodeState::default(),
        }
    }

    /// Stored volume (ft³) at depth `d` (ft).
    pub fn volume_at(&self, d: f64) -> f64 {
        match self.storage {
            Some(curve) => curve.volume(d),
            None => self.surface_area * d.max(0.0),
        }
    }

    /// Re-derive `full_volume` from the current geometry.
    pub fn refresh_full_volume(&mut self) {
        self.full_volume = self.volume_at(self.full_depth);
    }

    /// Flow-type external inflow, created on first use.
    ///
    /// Returns the inflow and whether it was just created.
    pub fn flow_inflow_mut(&mut self) -> (&mut ExtInflow, bool) {
        let pos = self
            .ext_inflows
            .iter()
            .position(|inflow| inflow.param == InflowParam::Flow);
        match pos {
            Some(i) => (&mut self.ext_inflows[i], false),
            None => {
                self.ext_inflows.insert(0, ExtInflow::flow());
                (&mut self.ext_inflows[0], true)
            }
        }
    }

    pub fn head(&self) -> f64 {
        self.state.new_depth + self.invert_elev
    }
}

/// Live link results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkState {
    pub new_flow: f64,
    pub new_depth: f64,
    pub new_volume: f64,
    pub surf_area1: f64,
    pub surf_area2: f64,
    pub setting: f64,
    pub target_setting: f64,
    pub froude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: String,
    pub link_type: LinkType,
    /// +1, or -1 when the endpoints were reversed at build time.
    pub direction: i8,
    pub node1: usize,
    pub node2: usize,
    pub offset1: f64,
    pub offset2: f64,
    pub q0: f64,
    pub q_limit: f64,
    pub c_loss_inlet: f64,
    pub c_loss_outlet: f64,
    pub c_loss_avg: f64,
    pub state: LinkState,
}

impl Link {
    pub fn new(id: impl Into<String>, link_type: LinkType, node1: usize, node2: usize) -> Self {
        Self {
            id: id.into(),
            link_type,
            direction: 1,
            node1,
            node2,
            offset1: 0.0,
            offset2: 0.0,
            q0: 0.0,
            q_limit: 0.0,
            c_loss_inlet: 0.0,
            c_loss_outlet: 0.0,
            c_loss_avg: 0.0,
            state: LinkState {
                setting: 1.0,
                target_setting: 1.0,
                ..LinkState::default()
            },
        }
    }

    /// Clamp a requested setting to what this link type can take.
    pub fn feasible_setting(&self, requested: f64) -> f64 {
        let s = requested.max(0.0);
        if self.link_type == LinkType::Pump {
            s
        } else {
            s.min(1.0)
        }
    }

    /// Apply the target setting immediately instead of at the next step.
    pub fn apply_target_setting(&mut self) {
        self.state.setting = self.state.target_setting;
    }
}

/// Where a gage's rainfall comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainSource {
    #[default]
    Series,
    File,
    /// Pushed by an external caller; never switches back.
    External,
}

/// Current precipitation split (ft/s).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Precip {
    pub rainfall: f64,
    pub snowfall: f64,
}

impl Precip {
    pub fn total(&self) -> f64 {
        self.rainfall + self.snowfall
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gage {
    pub id: String,
    pub source: RainSource,
    pub snow_factor: f64,
    /// Intensity read from the gage's own source (ft/s).
    pub rainfall: f64,
    /// Intensity pushed by an external caller (ft/s).
    pub external_rain: f64,
    /// Air temperature is at or below the snow threshold.
    pub is_snowing: bool,
}

impl Gage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: RainSource::default(),
            snow_factor: 1.0,
            rainfall: 0.0,
            external_rain: 0.0,
            is_snowing: false,
        }
    }

    pub fn precip(&self) -> Precip {
        let intensity = match self.source {
            RainSource::External => self.external_rain,
            RainSource::Series | RainSource::File => self.rainfall,
        };
        if self.is_snowing {
            Precip {
                rainfall: 0.0,
                snowfall: intensity * self.snow_factor,
            }
        } else {
            Precip {
                rainfall: intensity,
                snowfall: 0.0,
            }
        }
    }

    /// Push an external intensity; returns true if the source switched.
    pub fn set_external_rain(&mut self, intensity: f64) -> bool {
        let switched = self.source != RainSource::External;
        self.source = RainSource::External;
        self.external_rain = intensity;
        switched
    }
}

/// Where a subcatchment sends its runoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubcatchOutlet {
    Node(usize),
    Subcatchment(usize),
    /// Runoff is loaded back onto the subcatchment itself.
    Itself,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubcatchState {
    pub rainfall: f64,
    pub evap_loss: f64,
    pub infil_loss: f64,
    pub runon: f64,
    pub new_runoff: f64,
    pub new_snow_depth: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subcatchment {
    pub id: String,
    pub gage: Option<usize>,
    pub outlet: SubcatchOutlet,
    pub width: f64,
    /// Land area (ft²).
    pub area: f64,
    pub frac_imperv: f64,
    pub slope: f64,
    pub curb_length: f64,
    pub state: SubcatchState,
}

impl Subcatchment {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            gage: None,
            outlet: SubcatchOutlet::Itself,
            width: 0.0,
            area: 0.0,
            frac_imperv: 0.0,
            slope: 0.0,
            curb_length: 0.0,
            state: SubcatchState::default(),
        }
    }
}

/// Concentration units of a pollutant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcUnits {
    #[default]
    #[serde(rename = "MG/L")]
    MgPerL,
    #[serde(rename = "UG/L")]
    UgPerL,
    /// Population counts; reported on a log10 scale.
    #[serde(rename = "#/L")]
    Count,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pollutant {
    pub id: String,
    pub units: ConcUnits,
    /// Mass conversion factor applied to accumulated loads.
    pub mcf: f64,
}

/// Secondary objects addressed only by ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedObject {
    pub id: String,
}

impl From<&str> for NamedObject {
    fn from(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn junction_volume_is_prismatic() {
        let mut node = Node::new("J1", NodeType::Junction);
        node.surface_area = 12.0;
        node.full_depth = 5.0;
        node.refresh_full_volume();
        assert_eq!(node.full_volume, 60.0);
    }

    #[test]
    fn storage_curve_volume_integrates_area() {
        // area = 2 d + 10  -> volume = d^2 + 10 d
        let curve = StorageCurve {
            a: 2.0,
            b: 1.0,
            c: 10.0,
        };
        assert_eq!(curve.volume(3.0), 39.0);
        assert_eq!(curve.volume(-1.0), 0.0);
    }

    #[test]
    fn flow_inflow_created_once() {
        let mut node = Node::new("J1", NodeType::Junction);
        let (inflow, created) = node.flow_inflow_mut();
        assert!(created);
        inflow.iface_inflow = 3.0;
        let (inflow, created) = node.flow_inflow_mut();
        assert!(!created);
        assert_eq!(inflow.iface_inflow, 3.0);
        assert_eq!(node.ext_inflows.len(), 1);
    }

    #[test]
    fn feasible_setting_limits() {
        let weir = Link::new("W1", LinkType::Weir, 0, 1);
        assert_eq!(weir.feasible_setting(1.7), 1.0);
        assert_eq!(weir.feasible_setting(-0.2), 0.0);
        let pump = Link::new("P1", LinkType::Pump, 0, 1);
        assert_eq!(pump.feasible_setting(1.7), 1.7);
    }

    #[test]
    fn external_rain_switch_is_one_way() {
        let mut gage = Gage::new("RG1");
        gage.rainfall = 1.0;
        assert!(gage.set_external_rain(2.0));
        assert!(!gage.set_external_rain(3.0));
        assert_eq!(gage.source, RainSource::External);
        assert_eq!(gage.precip().total(), 3.0);
    }

    #[test]
    fn snowing_gage_reports_snowfall() {
        let mut gage = Gage::new("RG1");
        gage.rainfall = 2.0;
        gage.snow_factor = 1.5;
        gage.is_snowing = true;
        let p = gage.precip();
        assert_eq!(p.rainfall, 0.0);
        assert_eq!(p.snowfall, 3.0);
    }

    #[test]
    fn outfall_nodes_carry_boundary() {
        assert!(Node::new("O1", NodeType::Outfall).outfall.is_some());
        assert!(Node::new("J1", NodeType::Junction).outfall.is_none());
    }
}
