#![forbid(unsafe_code)]

mod config;
mod constants;
mod filesystem;
mod gui;
mod organizer;
mod persistence;
mod selection;
mod tree;
mod types;
mod window;

use anyhow::Result;
use tracing::{error, info, info_span, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use config::AppConfig;
use filesystem::StdFileStats;
use organizer::Organizer;
use persistence::JsonFileStore;
use tree::GroupTree;

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = AppConfig::default_path();
    let config = AppConfig::load_from(&config_path).unwrap_or_else(|err| {
        warn!(error = ?err, path = %config_path.display(), "Failed to load config, using defaults");
        AppConfig::default()
    });

    let mut startup_errors = Vec::new();
    let store = JsonFileStore::new(JsonFileStore::default_path());
    let data_path = store.path().to_path_buf();
    let span = info_span!("organizer");
    let organizer = match Organizer::load(store, StdFileStats, span.clone()) {
        Ok(organizer) => organizer,
        Err(err) => {
            error!(error = ?err, "Failed to load groups, starting with an empty tree");
            startup_errors.push(format!(
                "Could not load {}: {err:#}\nStarting with no groups; the next change overwrites the file.",
                data_path.display()
            ));
            Organizer::new(
                GroupTree::default(),
                JsonFileStore::new(data_path),
                StdFileStats,
                span,
            )
        }
    };

    info!(
        main_groups = organizer.tree().main_groups.len(),
        width = config.window_width,
        height = config.window_height,
        "Starting kuusoo"
    );

    gui::run_gui(config, config_path, organizer, startup_errors)
}
