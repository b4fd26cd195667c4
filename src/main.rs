use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use utm_builder::args::{Args, Command};
use utm_builder::clipboard::SystemClipboard;
use utm_builder::clock::SystemClock;
use utm_builder::config::Settings;
use utm_builder::logging::setup_logging;
use utm_builder::notify::ConsoleNotifier;
use utm_builder::params::CampaignParams;
use utm_builder::report;
use utm_builder::storage::SqliteStore;
use utm_builder::templates::find_template;
use utm_builder::utils::validate_args;
use utm_builder::{HistoryStore, Session};

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging(args.verbose);
    validate_args(&args)?;

    if let Command::Templates = args.command {
        report::print_templates();
        return Ok(ExitCode::SUCCESS);
    }

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(database) = &args.database {
        settings.database_path = database.clone();
    }

    let storage = SqliteStore::open(&settings.database_path).with_context(|| {
        format!(
            "Failed to open history database at {}",
            settings.database_path.display()
        )
    })?;
    let store = HistoryStore::open(storage, settings.storage_key.clone());

    let clock = SystemClock;
    let clipboard = SystemClipboard;
    let notifier = ConsoleNotifier;
    let mut session = Session::new(store, &clock, &clipboard, &notifier);

    match run(&args.command, &settings, &mut session) {
        Ok(code) => Ok(code),
        Err(e) => {
            error!(action = "run", component = "cli", error = %e, "Command failed");
            eprintln!("Error: {e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(command: &Command, settings: &Settings, session: &mut Session<SqliteStore>) -> Result<ExitCode> {
    match command {
        Command::Build(build) => {
            let mut params = CampaignParams::default();
            if let Some(name) = &build.template {
                let template = find_template(name)
                    .with_context(|| format!("Unknown template '{name}', see `utm-builder templates`"))?;
                session.apply_template(&mut params, template);
            }
            build.fill(&mut params);

            let generated = if build.no_history {
                session.generate_without_history(&params)
            } else {
                session.generate(&params)
            };

            let url = match generated {
                Ok(url) => url,
                Err(errors) => {
                    report::print_validation_errors(&errors);
                    return Ok(ExitCode::FAILURE);
                }
            };
            println!("{url}");

            if build.copy || settings.copy_on_build {
                // A failed copy is reported by the session and does not fail the build.
                let _ = session.copy(url.as_str());
            }
        }
        Command::History { limit } => {
            report::print_history(session.history(), *limit);
        }
        Command::Load { target, json } => {
            let Some(params) = session.load_entry(target) else {
                return Ok(ExitCode::FAILURE);
            };
            if *json {
                println!("{}", serde_json::to_string_pretty(&params)?);
            } else {
                report::print_fields(&params);
            }
        }
        Command::Copy { index } => {
            let url = session
                .history()
                .get(*index)
                .map(|entry| entry.url.clone())
                .with_context(|| format!("No history entry #{index}"))?;
            if session.copy(&url).is_err() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Export { output } => {
            let path = output.as_ref().unwrap_or(&settings.export_file);
            let written = session.export(path)?;
            info!(action = "export", component = "cli", path = ?written, "History exported");
        }
        Command::Templates => report::print_templates(),
    }

    Ok(ExitCode::SUCCESS)
}
