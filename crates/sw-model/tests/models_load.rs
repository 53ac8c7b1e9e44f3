use std::path::{Path, PathBuf};

use sw_core::{ObjectType, nearly_equal, Tolerances};
use sw_model::{NodeType, SubcatchOutlet};

fn model_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../models")
        .join(name)
}

#[test]
fn network_loads_and_builds() {
    let def = sw_model::load_yaml(&model_path("network.yaml"))
        .unwrap_or_else(|e| panic!("Failed to load network.yaml: {e}"));
    let model = def.build().expect("build");
    let tables = &model.tables;

    assert_eq!(tables.count(ObjectType::Node), 5);
    assert_eq!(tables.count(ObjectType::Link), 5);
    assert_eq!(tables.count(ObjectType::Subcatchment), 2);
    assert_eq!(tables.count(ObjectType::Pollutant), 2);
    assert_eq!(tables.count(ObjectType::Landuse), 2);
    assert_eq!(tables.count(ObjectType::Transect), 0);

    assert_eq!(tables.nodes[3].node_type, NodeType::Storage);
    assert!(nearly_equal(
        tables.nodes[3].full_volume,
        16_000.0,
        Tolerances::default()
    ));
    assert_eq!(
        tables.subcatchments[1].outlet,
        SubcatchOutlet::Subcatchment(0)
    );
    assert_eq!(model.openings.node_count(), 5);

    // 30 hours in whole milliseconds
    assert_eq!(model.options.total_duration_ms, 108_000_000.0);
    assert!(model.options.analysis.allow_ponding);
    assert_eq!(model.options.settings.route_step, 5.0);
}

#[test]
fn yaml_round_trip_preserves_definition() {
    let def = sw_model::load_yaml(&model_path("network.yaml")).expect("load");
    let dir = std::env::temp_dir().join("sw-model-roundtrip");
    std::fs::create_dir_all(&dir).expect("tmp dir");
    let path = dir.join("network.yaml");
    sw_model::save_yaml(&path, &def).expect("save");
    let back = sw_model::load(&path).expect("reload");
    assert_eq!(back, def);
}

#[test]
fn json_definition_loads() {
    let json = r#"{
        "options": { "flow_units": "LPS" },
        "nodes": [ { "id": "J1", "invert_elev": 1.0, "max_depth": 2.0 } ]
    }"#;
    let dir = std::env::temp_dir().join("sw-model-json");
    std::fs::create_dir_all(&dir).expect("tmp dir");
    let path = dir.join("tiny.json");
    std::fs::write(&path, json).expect("write");

    let def = sw_model::load(&path).expect("load json");
    let model = def.build().expect("build");
    let j1 = &model.tables.nodes[0];
    assert!((j1.full_depth - 2.0 / 0.3048).abs() < 1e-9);
}

#[test]
fn unresolved_gage_is_reported() {
    let yaml = r#"
subcatchments:
  - id: S1
    gage: nowhere
    area: 1.0
    width: 10.0
"#;
    let def = sw_model::from_yaml_str(yaml).expect("parse");
    let err = def.build().unwrap_err();
    assert!(err.to_string().contains("nowhere"));
}
