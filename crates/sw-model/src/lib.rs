//! sw-model: object tables, opening registry and the model definition format.

pub mod build;
pub mod error;
pub mod objects;
pub mod openings;
pub mod options;
pub mod schema;
pub mod tables;

pub use build::Model;
pub use error::{ModelError, ModelResult};
pub use objects::*;
pub use openings::{CouplingType, Opening, OpeningRegistry, OpeningSpec, Upsert};
pub use options::{AnalysisOptions, SimOptions, SimSettings};
pub use schema::*;
pub use tables::ObjectTables;

pub fn from_yaml_str(content: &str) -> ModelResult<ModelDef> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn load_yaml(path: &std::path::Path) -> ModelResult<ModelDef> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn load_json(path: &std::path::Path) -> ModelResult<ModelDef> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load a definition by file extension (`.json`, otherwise YAML).
pub fn load(path: &std::path::Path) -> ModelResult<ModelDef> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}

pub fn save_yaml(path: &std::path::Path, def: &ModelDef) -> ModelResult<()> {
    let content = serde_yaml::to_string(def)?;
    std::fs::write(path, content)?;
    Ok(())
}
