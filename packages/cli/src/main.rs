#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the crime dashboard.
//!
//! `summary` and `options` load a dataset and print the derived view or
//! selector values; `serve` starts the HTTP API. With no subcommand an
//! interactive menu is shown.
//!
//! Uses `indicatif-log-bridge` (via [`crime_dash_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod interactive;
mod report;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use crime_dash_analytics::filter::filter_options;
use crime_dash_analytics::params::{SelectionInput, view_options};
use crime_dash_analytics::view::build_view;
use crime_dash_cli_utils::{MultiProgress, RowCounter};
use crime_dash_server::{DEFAULT_BIND_ADDR, DEFAULT_DATA_PATH, DEFAULT_PORT, ServerConfig};
use crime_dash_store::{LoadError, RecordStore};

#[derive(Parser)]
#[command(name = "crime_dash", about = "Crime incident dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where to load incidents from.
#[derive(Args, Clone)]
struct SourceArgs {
    /// Dataset to load (.xlsx, .xls, .ods or .csv)
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
    /// TOML file mapping dataset headers to incident fields
    #[arg(long)]
    columns: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter the dataset and print the resulting view
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        /// View profile: dashboard, heatmap or full
        #[arg(long)]
        profile: Option<String>,
        /// Map mode: density or points
        #[arg(long)]
        map_mode: Option<String>,
        /// Crime type to include (repeatable; default: all)
        #[arg(long = "crime-type")]
        crime_types: Vec<String>,
        /// Area to include (repeatable; default: all)
        #[arg(long = "area")]
        areas: Vec<String>,
        /// Inclusive start date (YYYY-MM-DD; default: earliest incident)
        #[arg(long)]
        from: Option<String>,
        /// Inclusive end date (YYYY-MM-DD; default: latest incident)
        #[arg(long)]
        to: Option<String>,
        /// Entries per ranked panel (1-100)
        #[arg(long)]
        top_n: Option<usize>,
        /// Print JSON instead of text tables
        #[arg(long)]
        json: bool,
    },
    /// Print the distinct crime types, areas and date bounds
    Options {
        #[command(flatten)]
        source: SourceArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Start the HTTP API server
    Serve {
        #[command(flatten)]
        source: SourceArgs,
        /// Address to bind
        #[arg(long, default_value = DEFAULT_BIND_ADDR)]
        bind: String,
        /// Port to bind
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

impl SourceArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            data_path: self.data.clone(),
            columns_path: self.columns.clone(),
            ..ServerConfig::default()
        }
    }
}

/// Loads the dataset behind a row counter.
fn load_store(config: &ServerConfig, multi: &MultiProgress) -> Result<RecordStore, LoadError> {
    let counter = RowCounter::new(multi, "Loading incidents");
    config.load_store(&counter).inspect_err(|e| {
        log::error!("Failed to load {}: {e}", config.data_path.display());
    })
}

fn non_empty(values: Vec<String>) -> Option<BTreeSet<String>> {
    (!values.is_empty()).then(|| values.into_iter().collect())
}

fn summary(
    multi: &MultiProgress,
    source: &SourceArgs,
    profile: Option<&str>,
    map_mode: Option<&str>,
    input: SelectionInput,
    top_n: Option<usize>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = view_options(profile, map_mode, top_n)?;
    let store = load_store(&source.server_config(), multi)?;
    let selection = input.resolve(&store, options.profile)?;
    let view = build_view(&store, &selection, options);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", report::render_view(&view));
    }

    Ok(())
}

fn options(
    multi: &MultiProgress,
    source: &SourceArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = load_store(&source.server_config(), multi)?;
    let options = filter_options(&store);

    if json {
        println!("{}", serde_json::to_string_pretty(&options)?);
    } else {
        print!("{}", report::render_options(&options));
    }

    Ok(())
}

/// Loads the dataset, then runs the actix server on its own runtime.
async fn serve(multi: &MultiProgress, config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(load_store(&config, multi)?);

    // The server uses actix-web's runtime, so we need to run it in a
    // blocking task to avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(crime_dash_server::serve(store, &config))
    })
    .await??;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_dash_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi).await;
    };

    match command {
        Commands::Summary {
            source,
            profile,
            map_mode,
            crime_types,
            areas,
            from,
            to,
            top_n,
            json,
        } => {
            let input = SelectionInput {
                crime_types: non_empty(crime_types),
                area_names: non_empty(areas),
                date_from: from,
                date_to: to,
            };
            summary(
                &multi,
                &source,
                profile.as_deref(),
                map_mode.as_deref(),
                input,
                top_n,
                json,
            )?;
        }
        Commands::Options { source, json } => options(&multi, &source, json)?,
        Commands::Serve { source, bind, port } => {
            let config = ServerConfig {
                bind_addr: bind,
                port,
                ..source.server_config()
            };
            serve(&multi, config).await?;
        }
    }

    Ok(())
}
