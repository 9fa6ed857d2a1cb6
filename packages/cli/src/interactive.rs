//! Menu shown when the CLI is started without a subcommand.

use std::path::PathBuf;

use crime_dash_analytics::params::SelectionInput;
use crime_dash_analytics_models::{DEFAULT_TOP_N, MapMode, ViewProfile};
use crime_dash_cli_utils::MultiProgress;
use crime_dash_server::DEFAULT_DATA_PATH;
use dialoguer::{Input, Select};
use strum::IntoEnumIterator;

use crate::SourceArgs;

/// Top-level actions.
enum Tool {
    Summary,
    Options,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[Self::Summary, Self::Options, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Summary => "Show dashboard summary",
            Self::Options => "List filter options",
            Self::Server => "Start server",
        }
    }
}

fn prompt_source() -> Result<SourceArgs, dialoguer::Error> {
    let data: String = Input::new()
        .with_prompt("Dataset (.xlsx or .csv)")
        .default(DEFAULT_DATA_PATH.to_string())
        .interact_text()?;

    Ok(SourceArgs {
        data: PathBuf::from(data),
        columns: None,
    })
}

fn prompt_summary(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let source = prompt_source()?;

    let profiles: Vec<ViewProfile> = ViewProfile::iter().collect();
    let labels: Vec<String> = profiles.iter().map(ToString::to_string).collect();
    let idx = Select::new()
        .with_prompt("View")
        .items(&labels)
        .default(0)
        .interact()?;
    let profile = profiles[idx];

    let map_mode = if profile.has_map() {
        let modes: Vec<MapMode> = MapMode::iter().collect();
        let labels: Vec<String> = modes.iter().map(ToString::to_string).collect();
        let idx = Select::new()
            .with_prompt("Map mode")
            .items(&labels)
            .default(0)
            .interact()?;
        Some(modes[idx].to_string())
    } else {
        None
    };

    let top_n: usize = Input::new()
        .with_prompt("Entries per ranked panel")
        .default(DEFAULT_TOP_N)
        .interact_text()?;

    let from: String = Input::new()
        .with_prompt("From (YYYY-MM-DD, blank for earliest)")
        .allow_empty(true)
        .interact_text()?;
    let to: String = Input::new()
        .with_prompt("To (YYYY-MM-DD, blank for latest)")
        .allow_empty(true)
        .interact_text()?;

    let input = SelectionInput {
        date_from: (!from.trim().is_empty()).then_some(from),
        date_to: (!to.trim().is_empty()).then_some(to),
        ..SelectionInput::default()
    };

    crate::summary(
        multi,
        &source,
        Some(profile.as_ref()),
        map_mode.as_deref(),
        input,
        Some(top_n),
        false,
    )
}

/// Shows the tool menu and runs the chosen action.
///
/// # Errors
///
/// Returns an error if a prompt fails, the dataset cannot be loaded, or
/// the server fails.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Crime Dashboard");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Summary => prompt_summary(multi)?,
        Tool::Options => crate::options(multi, &prompt_source()?, false)?,
        Tool::Server => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(crime_dash_server::interactive::run())
            })
            .await??;
        }
    }

    Ok(())
}
