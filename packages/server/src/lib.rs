#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the crime dashboard.
//!
//! Loads one dataset at startup into a [`RecordStore`] and serves filtered
//! views of it as JSON. The store is shared read-only across workers; each
//! request builds its own selection and derived views.

mod handlers;
pub mod interactive;
mod query;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use crime_dash_server_models::ApiError;
use crime_dash_store::progress::{LoadProgress, Silent};
use crime_dash_store::{ColumnMapping, LoadError, RecordStore};
use thiserror::Error;

/// Default dataset path, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/crime_data.xlsx";

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
pub struct AppState {
    /// The loaded dataset. Never mutated after startup.
    pub store: Arc<RecordStore>,
}

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The dataset or column mapping could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The HTTP server failed to bind or crashed.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Dataset to load (`.xlsx`, `.xls`, `.ods` or `.csv`).
    pub data_path: PathBuf,
    /// Optional TOML column mapping.
    pub columns_path: Option<PathBuf>,
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            columns_path: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Reads `CRIME_DASH_DATA`, `CRIME_DASH_COLUMNS`, `BIND_ADDR` and
    /// `PORT`, falling back to the defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            data_path: lookup("CRIME_DASH_DATA").map_or(defaults.data_path, PathBuf::from),
            columns_path: lookup("CRIME_DASH_COLUMNS").map(PathBuf::from),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    /// Column mapping from `columns_path`, or the default headers.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the mapping file cannot be read or parsed.
    pub fn column_mapping(&self) -> Result<ColumnMapping, LoadError> {
        self.columns_path
            .as_deref()
            .map_or_else(|| Ok(ColumnMapping::default()), ColumnMapping::from_file)
    }

    /// Loads the configured dataset.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the column mapping or dataset cannot be
    /// loaded.
    pub fn load_store(&self, progress: &dyn LoadProgress) -> Result<RecordStore, LoadError> {
        let mapping = self.column_mapping()?;
        RecordStore::load(&self.data_path, &mapping, progress)
    }
}

/// Registers the `/api` routes and the JSON query-error handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        let body = ApiError::new(&err);
        actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
            .into()
    });

    cfg.app_data(query_config).service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/heatmap", web::get().to(handlers::heatmap))
            .route("/view", web::get().to(handlers::view)),
    );
}

/// Loads the dataset named by `config` and serves it.
///
/// The caller is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`) and for initializing logging.
///
/// # Errors
///
/// Returns [`ServerError::Load`] if the dataset cannot be loaded; the
/// server never binds in that case. Returns [`ServerError::Io`] if the
/// HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    log::info!("Loading dataset from {}...", config.data_path.display());
    let store = config.load_store(&Silent).inspect_err(|e| {
        log::error!("Failed to load {}: {e}", config.data_path.display());
    })?;

    serve(Arc::new(store), &config).await
}

/// Serves an already-loaded store on the address in `config`.
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn serve(store: Arc<RecordStore>, config: &ServerConfig) -> Result<(), ServerError> {
    log::info!(
        "Serving {} incidents on {}:{}",
        store.len(),
        config.bind_addr,
        config.port
    );

    let state = web::Data::new(AppState { store });

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
