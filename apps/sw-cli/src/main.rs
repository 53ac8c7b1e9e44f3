use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use sw_core::{ApiError, ObjectType};
use sw_model::ModelError;
use sw_toolkit::{
    AnalysisOption, DateKind, LinkParam, NodeParam, SimParam, Simulation, SubcatchParam, UnitKind,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "sw-cli")]
#[command(
    about = "StormWorks CLI - inspect drainage models through the toolkit boundary",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and build a model definition, reporting any error
    Validate {
        /// Path to the model YAML or JSON file
        model_path: PathBuf,
    },
    /// List object counts and IDs of an opened model
    Inspect {
        /// Path to the model YAML or JSON file
        model_path: PathBuf,
    },
    /// Print the input parameters of one object type in display units
    Params {
        /// Path to the model YAML or JSON file
        model_path: PathBuf,
        /// Object type to list
        #[arg(value_enum)]
        kind: ParamKind,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print simulation dates, units, analysis switches and settings
    Options {
        /// Path to the model YAML or JSON file
        model_path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ParamKind {
    Node,
    Link,
    Subcatchment,
}

#[derive(Serialize)]
struct ParamRow {
    id: String,
    values: Vec<(String, f64)>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { model_path } => cmd_validate(&model_path),
        Commands::Inspect { model_path } => cmd_inspect(&model_path),
        Commands::Params {
            model_path,
            kind,
            json,
        } => cmd_params(&model_path, kind, json),
        Commands::Options { model_path } => cmd_options(&model_path),
    }
}

fn open(model_path: &Path) -> CliResult<Simulation> {
    let def = sw_model::load(model_path)?;
    let mut sim = Simulation::new();
    sim.open(def.build()?)?;
    Ok(sim)
}

fn cmd_validate(model_path: &Path) -> CliResult<()> {
    println!("Validating model: {}", model_path.display());
    let sim = open(model_path)?;
    println!(
        "✓ Model is valid ({} nodes, {} links, {} subcatchments)",
        sim.count_objects(ObjectType::Node)?,
        sim.count_objects(ObjectType::Link)?,
        sim.count_objects(ObjectType::Subcatchment)?
    );
    Ok(())
}

fn cmd_inspect(model_path: &Path) -> CliResult<()> {
    let sim = open(model_path)?;
    for kind in ObjectType::ALL {
        let count = sim.count_objects(kind)?;
        if count == 0 {
            continue;
        }
        println!("{} ({count}):", kind.name());
        if !kind.has_ids() {
            continue;
        }
        for i in 0..count {
            let id = sim.object_id(kind, i)?;
            match kind {
                ObjectType::Node => println!("  [{i}] {id} ({:?})", sim.node_type(i)?),
                ObjectType::Link => {
                    let (n1, n2) = sim.link_connections(i)?;
                    println!(
                        "  [{i}] {id} ({:?}) {} -> {}",
                        sim.link_type(i)?,
                        sim.object_id(ObjectType::Node, n1)?,
                        sim.object_id(ObjectType::Node, n2)?
                    );
                }
                ObjectType::Subcatchment => {
                    let outlet = sim.subcatch_outlet(i)?;
                    println!(
                        "  [{i}] {id} -> {}",
                        sim.object_id(outlet.kind, outlet.index)?
                    );
                }
                _ => println!("  [{i}] {id}"),
            }
        }
    }
    Ok(())
}

fn param_rows(sim: &Simulation, kind: ParamKind) -> CliResult<Vec<ParamRow>> {
    let object_type = match kind {
        ParamKind::Node => ObjectType::Node,
        ParamKind::Link => ObjectType::Link,
        ParamKind::Subcatchment => ObjectType::Subcatchment,
    };
    let mut rows = Vec::new();
    for i in 0..sim.count_objects(object_type)? {
        let values = match kind {
            ParamKind::Node => NodeParam::ALL
                .iter()
                .map(|&p| Ok((format!("{p:?}"), sim.node_param(i, p)?)))
                .collect::<CliResult<Vec<_>>>()?,
            ParamKind::Link => LinkParam::ALL
                .iter()
                .map(|&p| Ok((format!("{p:?}"), sim.link_param(i, p)?)))
                .collect::<CliResult<Vec<_>>>()?,
            ParamKind::Subcatchment => SubcatchParam::ALL
                .iter()
                .map(|&p| Ok((format!("{p:?}"), sim.subcatch_param(i, p)?)))
                .collect::<CliResult<Vec<_>>>()?,
        };
        rows.push(ParamRow {
            id: sim.object_id(object_type, i)?,
            values,
        });
    }
    Ok(rows)
}

fn cmd_params(model_path: &Path, kind: ParamKind, json: bool) -> CliResult<()> {
    let sim = open(model_path)?;
    let rows = param_rows(&sim, kind)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("No objects of this type");
    }
    for row in rows {
        println!("{}:", row.id);
        for (name, value) in row.values {
            println!("  {name:<16} {value:>14.6}");
        }
    }
    Ok(())
}

fn cmd_options(model_path: &Path) -> CliResult<()> {
    let sim = open(model_path)?;

    for kind in DateKind::ALL {
        let d = sim.simulation_datetime(*kind)?;
        println!(
            "{:<16} {:02}/{:02}/{:04} {:02}:{:02}:{:02}",
            format!("{kind:?}"),
            d.month,
            d.day,
            d.year,
            d.hour,
            d.minute,
            d.second
        );
    }
    for kind in UnitKind::ALL {
        println!("{:<16} {}", format!("{kind:?}"), sim.simulation_unit(*kind)?);
    }
    for option in AnalysisOption::ALL {
        println!("{:<16} {}", format!("{option:?}"), sim.analysis_setting(*option)?);
    }
    for param in SimParam::ALL {
        println!("{:<16} {}", format!("{param:?}"), sim.simulation_param(*param)?);
    }
    Ok(())
}
