//! Interactive mode for the server.
//!
//! Prompts the user for the dataset, bind address and port before starting
//! the server.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::{ServerConfig, ServerError};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Defaults are taken from the environment (see
/// [`ServerConfig::from_env`]) and delegates to [`super::run_server`].
///
/// # Errors
///
/// Returns [`ServerError`] if the dataset cannot be loaded or the server
/// fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> Result<(), ServerError> {
    println!("Crime Dashboard Server");
    println!();

    let defaults = ServerConfig::from_env();

    let data_path: String = Input::new()
        .with_prompt("Dataset (.xlsx or .csv)")
        .default(defaults.data_path.display().to_string())
        .interact_text()
        .unwrap_or_else(|_| defaults.data_path.display().to_string());

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    if !Confirm::new()
        .with_prompt(format!("Serve {data_path} on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(ServerConfig {
        data_path: PathBuf::from(data_path),
        bind_addr,
        port,
        ..defaults
    })
    .await
}
