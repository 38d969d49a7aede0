//! Command-line interface entry point for `CampusRecords`

mod args;
mod commands;

use args::{Cli, Command};
use campus_records::config::Config;
use campus_records::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use campus_records::{error, info};
use clap::Parser;
use commands::portfolio::PortfolioOptions;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    init_logging(&args, &config);

    // Config never needs a session
    let command = match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
            return;
        }
        other => other,
    };

    let mut state = match commands::open_session(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Session start failed: {e}");
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    let result = match command {
        Command::Config { .. } => Ok(()),
        Command::Profile { subcommand } => commands::profile::run(subcommand, &mut state).await,
        Command::Certificates { subcommand } => {
            commands::certificates::run(subcommand, &state).await
        }
        Command::Review { subcommand } => commands::review::run(subcommand, &state).await,
        Command::Student { id } => commands::review::run_student(&id, &state).await,
        Command::Analytics { top } => commands::analytics::run_dashboard(top, &state).await,
        Command::Notifications { subcommand } => {
            commands::notifications::run(subcommand, &state).await
        }
        Command::Records { subcommand } => {
            commands::analytics::run_records(subcommand, &state).await
        }
        Command::Recommendations => commands::analytics::run_recommendations(&state).await,
        Command::Portfolio { details, output, format, pdf_converter } => {
            let options = PortfolioOptions { details, output, format, pdf_converter };
            commands::portfolio::run(options, &state, &config).await
        }
        Command::Reports { subcommand } => commands::reports::run(subcommand, &state).await,
    };

    state.sign_out();
    if let Err(e) = result {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}

fn init_logging(args: &Cli, config: &Config) {
    // CLI flag overrides config; otherwise use config logging.level; fallback warn
    let effective_level = args
        .log_level
        .map(std::convert::Into::into)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    let mut level = effective_level;
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    // Verbose: enable if CLI flag OR config has verbose=true
    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise use config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }
}
