use std::path::{Path, PathBuf};

use proptest::prelude::*;
use sw_core::{ApiError, L_PER_FT3, ObjectType};
use sw_model::{OpeningSpec, Upsert};
use sw_toolkit::{
    LinkParam, LinkStats, NodeParam, NodeStats, OpeningParam, OutfallStats, PumpStats,
    RoutingTotals, RunoffTotals, Simulation, StatsSource, StorageStats, SubcatchParam,
    SubcatchStats,
};

fn model_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../models")
        .join(name)
}

fn open_network() -> Simulation {
    let def = sw_model::load_yaml(&model_path("network.yaml"))
        .unwrap_or_else(|e| panic!("Failed to load network.yaml: {e}"));
    let mut sim = Simulation::new();
    sim.open(def.build().expect("build")).expect("open");
    sim
}

fn opening(area: f64) -> OpeningSpec {
    OpeningSpec {
        kind: 0,
        area,
        length: 8.0,
        coeff_orifice: 0.167,
        coeff_free_weir: 0.54,
        coeff_sub_weir: 0.056,
    }
}

#[test]
fn storage_full_depth_round_trip() {
    let mut sim = open_network();
    let area_before = sim.node_param(3, NodeParam::SurfaceArea).unwrap();

    sim.set_node_param(3, NodeParam::FullDepth, 10.0).unwrap();

    assert_eq!(sim.node_param(3, NodeParam::FullDepth), Ok(10.0));
    assert_eq!(sim.node_param(3, NodeParam::SurfaceArea), Ok(area_before));
    // constant-area curve of 2000 ft²
    let node = &sim.model().unwrap().tables.nodes[3];
    assert!((node.full_volume - 20_000.0).abs() < 1e-9);
}

#[test]
fn opening_create_then_delete() {
    let mut sim = open_network();
    assert_eq!(sim.set_opening(2, 7, opening(5.0)), Ok(Upsert::Created));
    assert_eq!(sim.opening_count(2), Ok(1));
    assert_eq!(sim.opening_param(2, 7, OpeningParam::Area), Ok(5.0));

    sim.delete_opening(2, 7).unwrap();
    assert_eq!(sim.opening_count(2), Ok(0));
    assert!(matches!(
        sim.opening_param(2, 7, OpeningParam::Area),
        Err(ApiError::ObjectIndex { .. })
    ));
}

#[test]
fn clock_queries_need_a_run() {
    let mut sim = open_network();
    assert_eq!(sim.current_datetime(), Err(ApiError::NotRunning));
    sim.start().unwrap();
    assert_eq!(sim.current_datetime().unwrap(), "06/01/2024 00:00:00");
    sim.end().unwrap();
    assert_eq!(sim.current_datetime(), Err(ApiError::NotRunning));
}

#[test]
fn outfall_without_periods_averages_to_zero() {
    let mut sim = open_network();
    sim.start().unwrap();
    let stats = sim.outfall_stats(4).unwrap();
    assert_eq!(stats.avg_flow, 0.0);
    assert_eq!(stats.total_load.len(), 2);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["total_periods"], 0);

    assert_eq!(
        sim.outfall_stats(3).err(),
        Some(ApiError::WrongType {
            expected: "outfall node"
        })
    );
}

#[test]
fn closed_context_reports_not_open() {
    let mut sim = open_network();
    sim.close();
    assert_eq!(sim.count_objects(ObjectType::Node), Err(ApiError::NotOpen));
    assert_eq!(
        sim.node_param(99, NodeParam::FullDepth),
        Err(ApiError::NotOpen)
    );
    assert_eq!(sim.opening_count(0), Err(ApiError::NotOpen));
    assert_eq!(sim.start(), Err(ApiError::NotOpen));
}

#[test]
fn bad_index_leaves_tables_untouched() {
    let mut sim = open_network();
    let before = sim.model().unwrap().tables.clone();

    assert!(sim.set_node_param(5, NodeParam::InvertElev, 1.0).is_err());
    assert!(sim.set_link_param(5, LinkParam::FlowLimit, 1.0).is_err());
    assert!(
        sim.set_subcatch_param(2, SubcatchParam::Width, 1.0).is_err()
    );
    assert!(sim.set_opening(5, 1, opening(1.0)).is_err());
    assert!(sim.set_gage_precip(1, 1.0).is_err());

    assert_eq!(sim.model().unwrap().tables, before);
    assert_eq!(sim.opening_count(0), Ok(0));
}

#[test]
fn read_only_writes_succeed_without_effect() {
    let mut sim = open_network();
    let slope = sim.subcatch_param(0, SubcatchParam::Slope).unwrap();
    sim.set_subcatch_param(0, SubcatchParam::Slope, 0.2).unwrap();
    assert_eq!(sim.subcatch_param(0, SubcatchParam::Slope), Ok(slope));

    let loss = sim.link_param(0, LinkParam::OutletLoss).unwrap();
    sim.set_link_param(0, LinkParam::OutletLoss, 3.0).unwrap();
    assert_eq!(sim.link_param(0, LinkParam::OutletLoss), Ok(loss));
}

#[test]
fn enumerate_requires_exact_length() {
    let mut sim = open_network();
    for id in [3, 1, 2] {
        sim.set_opening(1, id, opening(1.0)).unwrap();
    }
    let mut long = [0; 4];
    assert!(sim.opening_ids(1, &mut long).is_err());
    assert_eq!(long, [0; 4]);

    let mut ids = [0; 3];
    sim.opening_ids(1, &mut ids).unwrap();
    assert_eq!(ids, [3, 1, 2]);
}

#[test]
fn si_project_round_trips_display_units() {
    let yaml = r#"
options:
  flow_units: CMS
nodes:
  - id: J1
    invert_elev: 3.0
    max_depth: 2.0
    surface_area: 1.5
"#;
    let model = sw_model::from_yaml_str(yaml).unwrap().build().unwrap();
    let mut sim = Simulation::new();
    sim.open(model).unwrap();

    assert!(
        (sim.node_param(0, NodeParam::FullDepth).unwrap() - 2.0).abs() < 1e-12
    );
    sim.set_node_param(0, NodeParam::SurfaceArea, 4.0).unwrap();
    assert!(
        (sim.node_param(0, NodeParam::SurfaceArea).unwrap() - 4.0).abs() < 1e-12
    );

    let internal = sim.model().unwrap().tables.nodes[0].surface_area;
    assert!((internal - 4.0 / (0.3048 * 0.3048)).abs() < 1e-9);
}

const SI_PROJECT: &str = r#"
options:
  flow_units: CMS
nodes:
  - id: J1
    invert_elev: 5.0
    max_depth: 2.0
  - id: J2
    invert_elev: 4.0
    max_depth: 2.0
links:
  - id: C1
    type: conduit
    from: J1
    to: J2
    offset1: 0.25
    offset2: 0.1
    init_flow: 0.02
    max_flow: 1.5
    inlet_loss: 0.5
    outlet_loss: 1.0
    avg_loss: 0.2
subcatchments:
  - id: S1
    outlet: J1
    area: 1.2
    width: 80.0
    imperv: 0.35
    slope: 0.02
    curb_length: 150.0
"#;

fn open_si_project() -> Simulation {
    let model = sw_model::from_yaml_str(SI_PROJECT)
        .unwrap()
        .build()
        .unwrap();
    let mut sim = Simulation::new();
    sim.open(model).unwrap();
    sim
}

#[test]
fn si_read_only_fields_keep_built_values() {
    let mut sim = open_si_project();
    let links = [
        (LinkParam::InletLoss, 0.5),
        (LinkParam::OutletLoss, 1.0),
        (LinkParam::AvgLoss, 0.2),
    ];
    for (param, built) in links {
        sim.set_link_param(0, param, 9.0).unwrap();
        assert!((sim.link_param(0, param).unwrap() - built).abs() < 1e-12);
    }
    let subcatchments = [(SubcatchParam::FracImperv, 0.35), (SubcatchParam::Slope, 0.02)];
    for (param, built) in subcatchments {
        sim.set_subcatch_param(0, param, 9.0).unwrap();
        assert!((sim.subcatch_param(0, param).unwrap() - built).abs() < 1e-12);
    }
}

/// Fixed accumulators standing in for a stepping engine.
struct FixedStats;

impl StatsSource for FixedStats {
    fn node_stats(&self, _node: usize) -> NodeStats {
        NodeStats::default()
    }
    fn storage_stats(&self, _node: usize) -> StorageStats {
        StorageStats::default()
    }
    fn outfall_stats(&self, _node: usize) -> OutfallStats {
        OutfallStats {
            avg_flow: 10.0,
            max_flow: 4.0,
            total_load: vec![1.0, 1000.0],
            total_periods: 5,
        }
    }
    fn link_stats(&self, _link: usize) -> LinkStats {
        LinkStats::default()
    }
    fn pump_stats(&self, _link: usize) -> PumpStats {
        PumpStats::default()
    }
    fn subcatch_stats(&self, _subcatch: usize) -> SubcatchStats {
        SubcatchStats::default()
    }
    fn node_total_inflow(&self, _node: usize) -> f64 {
        0.0
    }
    fn routing_totals(&self) -> RoutingTotals {
        RoutingTotals::default()
    }
    fn runoff_totals(&self) -> RunoffTotals {
        RunoffTotals::default()
    }
    fn total_area(&self) -> f64 {
        0.0
    }
}

#[test]
fn outfall_loads_are_converted_per_pollutant() {
    let def = sw_model::load_yaml(&model_path("network.yaml")).unwrap();
    let mut sim = Simulation::with_stats(FixedStats);
    sim.open(def.build().unwrap()).unwrap();
    sim.start().unwrap();

    let stats = sim.outfall_stats(4).unwrap();
    assert_eq!(stats.avg_flow, 2.0);
    assert_eq!(stats.max_flow, 4.0);
    assert!((stats.total_load[0] - L_PER_FT3 * 2.203e-6).abs() < 1e-15);
    assert!(
        (stats.total_load[1] - (1000.0 * L_PER_FT3).log10()).abs() < 1e-12
    );
}

proptest! {
    #[test]
    fn node_params_round_trip(value in 0.0f64..1.0e4, code in 0i32..8) {
        let mut sim = open_network();
        let param = NodeParam::try_from(code).unwrap();
        sim.set_node_param(1, param, value).unwrap();
        let back = sim.node_param(1, param).unwrap();
        prop_assert!((back - value).abs() <= 1e-9 * value.max(1.0));
    }

    #[test]
    fn si_link_params_round_trip(value in 0.0f64..1.0e4, code in 0i32..4) {
        let mut sim = open_si_project();
        let param = LinkParam::try_from(code).unwrap();
        sim.set_link_param(0, param, value).unwrap();
        let back = sim.link_param(0, param).unwrap();
        prop_assert!((back - value).abs() <= 1e-9 * value.max(1.0));
    }

    #[test]
    fn si_subcatch_params_round_trip(
        value in 0.0f64..1.0e4,
        param in prop::sample::select(vec![
            SubcatchParam::Width,
            SubcatchParam::Area,
            SubcatchParam::CurbLength,
        ]),
    ) {
        let mut sim = open_si_project();
        sim.set_subcatch_param(0, param, value).unwrap();
        let back = sim.subcatch_param(0, param).unwrap();
        prop_assert!((back - value).abs() <= 1e-9 * value.max(1.0));
    }
}
