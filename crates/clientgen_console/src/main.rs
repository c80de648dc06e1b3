//! Clientgen Console
//!
//! Terminal front end for a clientgen engine: watch its counters, start and
//! stop it, and edit, export or import its configuration.
//!
//! ```bash
//! clientgen-console --backend http://10.0.0.5:8080
//! clientgen-console --simulate
//! ```

mod commands;
mod fields;
mod input;
mod view;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;

use clientgen_core::backend::{Backend, HttpBackend, SimulatedBackend};
use clientgen_core::controller::ControllerOptions;
use clientgen_core::logging::{init_tracing, LogLevel};
use clientgen_core::models::SystemState;
use clientgen_core::poller::OverlapPolicy;
use clientgen_core::ports::{FormSurface, Surfaces};
use clientgen_core::settings::{default_settings_path, SettingsManager};
use clientgen_core::Controller;

use commands::{Command, HELP};
use input::ConsoleInput;
use view::{render_form, ConsoleView, ExportDir};

/// Operator console for the clientgen PTP client generator
#[derive(Parser, Debug)]
#[command(name = "clientgen-console", version, about)]
struct Cli {
    /// Settings file (created with defaults if missing)
    #[arg(short, long, env = "CLIENTGEN_SETTINGS")]
    settings: Option<PathBuf>,

    /// Engine web server base URL, overrides the settings file
    #[arg(short, long, env = "CLIENTGEN_BACKEND")]
    backend: Option<String>,

    /// Run against an in-process simulated engine
    #[arg(long, conflicts_with = "backend")]
    simulate: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<LogLevel>,

    /// Never issue a stats fetch while one is outstanding
    #[arg(long)]
    serialize_polls: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = cli.settings.clone().unwrap_or_else(default_settings_path);
    let mut manager = SettingsManager::new(&settings_path);
    manager
        .load_or_create()
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;
    let mut settings = manager.into_settings();

    if let Some(url) = cli.backend {
        settings.backend.base_url = url;
    }
    if cli.serialize_polls {
        settings.poller.overlap = OverlapPolicy::Serialize;
    }
    init_tracing(cli.log_level.unwrap_or(settings.logging.level));

    let backend: Arc<dyn Backend> = if cli.simulate {
        tracing::info!("using simulated engine");
        Arc::new(SimulatedBackend::new())
    } else {
        tracing::info!(url = %settings.backend.base_url, "using engine web server");
        Arc::new(HttpBackend::new(&settings.backend.base_url))
    };

    let view = ConsoleView::new();
    let form = Arc::new(Mutex::new(fields::engine_form()));
    let surfaces = Surfaces {
        edit: Box::new(Arc::clone(&form)),
        counters: Box::new(view.clone()),
        chart: Box::new(view.clone()),
        alerts: Box::new(view.clone()),
        toggle: Box::new(view.clone()),
        artifacts: Box::new(ExportDir::new(&settings.export.directory)),
    };
    let mut controller = Controller::new(backend, surfaces, ControllerOptions::from(&settings));
    let mut input = ConsoleInput::stdin();

    println!("clientgen console {}, type help for commands", clientgen_core::version());
    controller.startup();

    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line.context("reading input")? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(Some(command)) => {
                        if !run(command, &mut controller, &mut input, &view, &form).await {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => println!("{message}"),
                }
            }
            Some(event) = controller.next_event() => controller.handle(event),
        }
    }

    controller.stop_polling();
    tracing::info!("console closed");
    Ok(())
}

/// Carry out one command. Returns `false` to quit.
async fn run(
    command: Command,
    controller: &mut Controller,
    input: &mut ConsoleInput,
    view: &ConsoleView,
    form: &Mutex<FormSurface>,
) -> bool {
    match command {
        Command::Help => println!("{HELP}"),
        Command::Toggle => {
            if !controller.toggle() {
                println!("a start/stop request is already in flight");
            }
        }
        Command::Start | Command::Stop => {
            let wanted = if command == Command::Start {
                SystemState::Running
            } else {
                SystemState::Stopped
            };
            if controller.state() == wanted {
                println!("engine is already {}", wanted.indicator().label.to_lowercase());
            } else if !controller.toggle() {
                println!("a start/stop request is already in flight");
            }
        }
        Command::Stats => println!("{}", view.render_stats()),
        Command::Chart => println!("{}", view.render_chart()),
        Command::Config => {
            let entries = controller.edit_surface().entries();
            println!("{}", render_form(&entries));
        }
        Command::Set { key, value } => {
            if let Err(message) = form.lock().edit(&key, &value) {
                println!("{message}");
            }
        }
        Command::Load => controller.load_config(),
        Command::Save => controller.save_config(),
        Command::Export => {
            if let Some(location) = controller.export_config() {
                println!("exported to {location}");
            }
        }
        Command::Import(path) => {
            controller.import_config(&path).await;
        }
        Command::Clear => {
            controller.clear_stats(input).await;
        }
        Command::Status => controller.query_status(),
        Command::Alerts => println!("{}", view.render_alerts()),
        Command::Poll(true) => controller.start_polling(),
        Command::Poll(false) => controller.stop_polling(),
        Command::Quit => return false,
    }
    true
}
