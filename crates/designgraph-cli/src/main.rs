//! Design graph command-line tool.
//!
//! Provides the `designgraph` binary for creating, editing, validating and
//! inspecting stored designs. Every edit goes through the same
//! `DesignService` pipeline a long-running host would use.
//!
//! Results are printed as JSON on stdout. Failures print the error code and
//! message on stderr. Exit codes: 0 = success, 1 = rejected request,
//! 2 = validation failure, 3 = storage or I/O error.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use designgraph_core::codec;
use designgraph_core::{
    Component, ComponentKind, ComponentPatch, ConnectionPatch, DeploymentState, DesignId,
    DomainType, ResolvedGraph,
};
use designgraph_service::config::{PATH_ENV, STORE_ENV};
use designgraph_service::{DesignError, DesignService, StoreConfig};
use designgraph_storage::DesignStore;

/// Design graph storage and consistency tools.
#[derive(Parser)]
#[command(name = "designgraph", about = "Design graph storage and consistency tools")]
struct Cli {
    /// Storage backend: dir, sqlite, or memory (overrides DESIGNGRAPH_STORE).
    #[arg(long, global = true)]
    store: Option<String>,

    /// Directory or database path (overrides DESIGNGRAPH_PATH).
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Create an empty design.
    Create { name: String },

    /// List stored designs, most recently updated first.
    List,

    /// Print a stored design.
    Show { id: DesignId },

    /// Delete a stored design.
    Delete { id: DesignId },

    /// Replace a stored design with the contents of a JSON file.
    Replace { id: DesignId, file: PathBuf },

    /// Validate a stored design, or a design document on disk.
    Validate {
        /// Design to validate.
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        id: Option<DesignId>,

        /// JSON document to validate instead of a stored design.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Add a component.
    AddComponent {
        id: DesignId,
        name: String,
        /// Component kind (Gateway, Container, Lambda, Cache, Rdms, Archive).
        #[arg(long = "type")]
        kind: String,
        /// Domain (Public, Web, Application, Data).
        #[arg(long)]
        domain: String,
        #[arg(long, default_value = "")]
        technology: String,
    },

    /// Change a component's attributes or name.
    UpdateComponent {
        id: DesignId,
        name: String,
        #[arg(long)]
        rename: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        technology: Option<String>,
    },

    /// Remove a component and every connection touching it.
    RemoveComponent { id: DesignId, name: String },

    /// Connect two components.
    Connect {
        id: DesignId,
        source: String,
        destination: String,
        #[arg(long, default_value = "")]
        label: String,
        #[arg(long, default_value = "")]
        technology: String,
    },

    /// Change a connection's label or technology.
    UpdateConnection {
        id: DesignId,
        index: usize,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        technology: Option<String>,
    },

    /// Remove the connection at a position.
    Disconnect { id: DesignId, index: usize },

    /// Record a component's deployment state.
    SetState {
        id: DesignId,
        name: String,
        /// undeployed, deploying, deployed, updating, destroying, or error.
        state: DeploymentState,
        #[arg(long)]
        resource_id: Option<String>,
        #[arg(long)]
        error: Option<String>,
    },

    /// Print a component's deployment state.
    State { id: DesignId, name: String },

    /// Print the resolved graph of a valid design.
    Graph { id: DesignId },
}

/// Failures outside the service's own error set.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Design(#[from] DesignError),

    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not a JSON document: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("{0}")]
    Config(String),

    #[error("failed to serialize output: {0}")]
    Output(#[source] serde_json::Error),
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            CliError::Design(err) => err.code(),
            CliError::Read { .. } => "IO",
            CliError::Parse { .. } => "PARSE",
            CliError::Config(_) => "CONFIG",
            CliError::Output(_) => "INTERNAL",
        }
    }

    fn exit_code(&self) -> i32 {
        match self {
            CliError::Design(DesignError::ValidationFailed(_)) => 2,
            CliError::Design(DesignError::Storage(_) | DesignError::Corrupt(_)) => 3,
            CliError::Read { .. } => 3,
            _ => 1,
        }
    }
}

/// What a successful command prints, and whether it counts as a pass.
struct Output {
    body: Value,
    exit_code: i32,
}

impl Output {
    fn ok(body: Value) -> Self {
        Output { body, exit_code: 0 }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    process::exit(run(cli));
}

/// Runs one command and returns the process exit code.
fn run(cli: Cli) -> i32 {
    let outcome = resolve_config(&cli).and_then(|config| {
        debug!(store = %config, "opening store");
        let store = config.open().map_err(DesignError::from)?;
        execute(&mut DesignService::new(store), cli.command)
    });

    match outcome {
        Ok(output) => {
            match serde_json::to_string_pretty(&output.body) {
                Ok(text) => {
                    println!("{text}");
                    output.exit_code
                }
                Err(e) => {
                    let err = CliError::Output(e);
                    report(&err);
                    err.exit_code()
                }
            }
        }
        Err(err) => {
            report(&err);
            err.exit_code()
        }
    }
}

/// Flags take precedence over the environment.
fn resolve_config(cli: &Cli) -> Result<StoreConfig, CliError> {
    StoreConfig::from_lookup(|key| {
        let flag = match key {
            STORE_ENV => cli.store.clone(),
            PATH_ENV => cli.path.as_ref().map(|p| p.to_string_lossy().into_owned()),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    })
    .map_err(CliError::Config)
}

fn report(err: &CliError) {
    eprintln!("error[{}]: {}", err.code(), err);
    if let CliError::Design(design_err) = err {
        for message in design_err.validation_messages() {
            eprintln!("  - {message}");
        }
    }
}

fn execute<S: DesignStore>(
    service: &mut DesignService<S>,
    command: Commands,
) -> Result<Output, CliError> {
    let body = match command {
        Commands::Create { name } => to_json(&service.create_design(&name)?)?,
        Commands::List => to_json(&service.list_designs()?)?,
        Commands::Show { id } => to_json(&service.get_design(&id)?)?,
        Commands::Delete { id } => {
            service.delete_design(&id)?;
            json!({ "deleted": id.to_string() })
        }
        Commands::Replace { id, file } => {
            let document = read_document(&file)?;
            to_json(&service.replace_design(&id, document)?)?
        }
        Commands::Validate { id, file } => {
            let messages = match (id, file) {
                (_, Some(file)) => {
                    let document = read_document(&file)?;
                    designgraph_check::ValidationError::messages(&designgraph_check::validate(
                        &document,
                    ))
                }
                (Some(id), None) => {
                    designgraph_check::ValidationError::messages(&service.validate_design(&id)?)
                }
                (None, None) => {
                    return Err(CliError::Config("validate needs an id or --file".into()))
                }
            };
            let valid = messages.is_empty();
            return Ok(Output {
                body: json!({ "valid": valid, "errors": messages }),
                exit_code: if valid { 0 } else { 2 },
            });
        }
        Commands::AddComponent {
            id,
            name,
            kind,
            domain,
            technology,
        } => {
            let component = Component::new(
                name,
                ComponentKind::from(kind),
                DomainType::from(domain),
                technology,
            );
            to_json(&service.add_component(&id, component)?)?
        }
        Commands::UpdateComponent {
            id,
            name,
            rename,
            kind,
            domain,
            technology,
        } => {
            let patch = ComponentPatch {
                name: rename,
                kind: kind.map(ComponentKind::from),
                domain_type: domain.map(DomainType::from),
                technology,
            };
            to_json(&service.update_component(&id, &name, &patch)?)?
        }
        Commands::RemoveComponent { id, name } => {
            let removal = service.delete_component(&id, &name)?;
            json!({
                "component": to_json(&removal.component)?,
                "detached": to_json(&removal.detached)?,
            })
        }
        Commands::Connect {
            id,
            source,
            destination,
            label,
            technology,
        } => {
            let index = service.add_connection(&id, &source, &destination, &label, &technology)?;
            json!({ "index": index })
        }
        Commands::UpdateConnection {
            id,
            index,
            label,
            technology,
        } => {
            let patch = ConnectionPatch { label, technology };
            to_json(&service.update_connection(&id, index, &patch)?)?
        }
        Commands::Disconnect { id, index } => to_json(&service.delete_connection(&id, index)?)?,
        Commands::SetState {
            id,
            name,
            state,
            resource_id,
            error,
        } => to_json(&service.set_component_state(&id, &name, state, resource_id, error)?)?,
        Commands::State { id, name } => to_json(&service.component_state(&id, &name)?)?,
        Commands::Graph { id } => graph_json(&service.resolved_graph(&id)?)?,
    };
    Ok(Output::ok(body))
}

fn read_document(path: &PathBuf) -> Result<Value, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    codec::parse_document(&text).map_err(|e| CliError::Parse {
        path: path.clone(),
        reason: e.to_string(),
    })
}

fn graph_json(graph: &ResolvedGraph) -> Result<Value, CliError> {
    let edges: Vec<Value> = graph
        .connections()
        .map(|(from, to, connection)| {
            json!({
                "from": from.name,
                "to": to.name,
                "label": connection.label,
                "technology": connection.technology,
            })
        })
        .collect();
    Ok(json!({
        "name": graph.name(),
        "components": to_json(&graph.components().collect::<Vec<_>>())?,
        "edges": edges,
    }))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(CliError::Output)
}
