//! clipwatch CLI entry point

use std::process::ExitCode;

use clap::Parser;

use clipwatch::cli::{
    app::{load_merged_config, run_copy, run_paste, run_watch, WatchOptions},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    EXIT_ERROR, EXIT_USAGE_ERROR,
};
use clipwatch::domain::buffer::BufferMode;
use clipwatch::domain::config::AppConfig;
use clipwatch::infrastructure::XdgConfigStore;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

fn buffer_mode(selection: bool) -> BufferMode {
    if selection {
        BufferMode::Selection
    } else {
        BufferMode::Clipboard
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let presenter = if cli.json {
        Presenter::json()
    } else {
        Presenter::new()
    };

    let command = match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        other => other,
    };

    // Build CLI config from args
    let cli_config = AppConfig {
        formats: cli.formats,
        clipboard: if cli.no_clipboard { Some(false) } else { None },
        selection: if cli.no_selection { Some(false) } else { None },
        backend: cli.backend,
        ..Default::default()
    };

    let config = load_merged_config(cli_config).await;
    let options = match WatchOptions::from_config(&config) {
        Ok(options) => options,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    match command {
        Some(Commands::Copy { selection, text }) => {
            run_copy(options, buffer_mode(selection), text, presenter).await
        }
        Some(Commands::Paste { selection }) => {
            run_paste(options, buffer_mode(selection), presenter).await
        }
        Some(Commands::Config { .. }) | None => run_watch(options, presenter).await,
    }
}
