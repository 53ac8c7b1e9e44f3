//! Model definition errors.

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while loading or building a model definition.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Duplicate {what} ID: {id}")]
    DuplicateId { what: &'static str, id: String },

    #[error("{what} '{owner}' refers to unknown {target} '{id}'")]
    UnknownRef {
        what: &'static str,
        owner: String,
        target: &'static str,
        id: String,
    },

    #[error("Non-finite value for {what} of '{owner}': {value}")]
    NonFinite {
        what: &'static str,
        owner: String,
        value: f64,
    },

    #[error("Non-physical value for {what} of '{owner}': {value}")]
    NonPhysical {
        what: &'static str,
        owner: String,
        value: f64,
    },

    #[error("Invalid definition: {what}")]
    Invalid { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
