// Project Launcher - terminal entry point

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use project_launcher::cli::{Cli, Commands, ConfigCommands, ReplCommand, REPL_HELP};
use project_launcher::storage::ConfigService;
use project_launcher::{commands, views, AppConfig, AppState, CommandResponse, Session};

const LOG_ENV: &str = "PROJECT_LAUNCHER_LOG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigService::open(path.clone()),
        None => ConfigService::new(),
    }
    .context("failed to load configuration")?;

    init_tracing(&config.get_config().log_level);

    match cli.command {
        Some(Commands::Config { command }) => run_config(config, command),
        Some(Commands::Check) => run_check(config).await,
        Some(Commands::Run { brief, json }) => run_session(config, brief, json).await,
        None => run_session(config, None, false).await,
    }
}

/// Log to stderr so the views on stdout stay clean.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `config show` / `config set` work on the file alone; no provider is built.
fn run_config(mut config: ConfigService, command: ConfigCommands) -> anyhow::Result<()> {
    let response: CommandResponse<AppConfig> = match (&command, command.settings_update()) {
        (_, Some(update)) => config.update_config(update).into(),
        (ConfigCommands::Reset, None) => config
            .reset()
            .map(|_| config.get_config().clone())
            .into(),
        _ => CommandResponse::ok(config.get_config().clone()),
    };

    println!("# {}", config.path().display());
    println!("{}", serde_json::to_string_pretty(&response)?);
    if !response.success {
        anyhow::bail!(response.error.unwrap_or_default());
    }
    Ok(())
}

async fn run_check(config: ConfigService) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let response = commands::check_service(&state).await;
    match (&response.data, &response.error) {
        (Some(message), _) => println!("{}", message),
        (None, error) => anyhow::bail!(error.clone().unwrap_or_default()),
    }
    Ok(())
}

async fn run_session(config: ConfigService, brief: Option<String>, json: bool) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    let printer = Printer { json };

    printer.session(&commands::get_mission(&state).await);
    if let Some(brief) = brief {
        analyze(&state, &printer, &brief).await;
    }
    if !json {
        println!("Type `help` for commands.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match ReplCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                printer.error(&message);
                continue;
            }
        };

        match command {
            ReplCommand::Empty => {}
            ReplCommand::Analyze(brief) => analyze(&state, &printer, &brief).await,
            ReplCommand::Risk(id) => printer.session(&commands::toggle_risk(&state, &id).await),
            ReplCommand::Task(id) => printer.session(&commands::toggle_task(&state, &id).await),
            ReplCommand::Tab(tab) => printer.session(&commands::select_tab(&state, &tab).await),
            ReplCommand::Manifesto => spawn_generation(&state, printer, Generation::Manifesto).await,
            ReplCommand::Patch => spawn_generation(&state, printer, Generation::Patch).await,
            ReplCommand::Reset => printer.session(&commands::reset_mission(&state).await),
            ReplCommand::Show => printer.session(&commands::get_mission(&state).await),
            ReplCommand::Help => println!("{}", REPL_HELP),
            ReplCommand::Quit => break,
        }
    }
    Ok(())
}

async fn analyze(state: &AppState, printer: &Printer, brief: &str) {
    if !printer.json {
        print!("{}", views::render_processing());
    }
    let response = commands::analyze_mission(state, brief).await;
    if printer.json {
        printer.print(&response);
    } else {
        // a failed analysis is shown inside the input view
        printer.session(&commands::get_mission(state).await);
        if !response.success && state.orchestrator().snapshot().await.error.is_none() {
            printer.error(response.error.as_deref().unwrap_or_default());
        }
    }
}

#[derive(Clone, Copy)]
enum Generation {
    Manifesto,
    Patch,
}

/// Manifesto and patch run in the background; the prompt stays usable.
async fn spawn_generation(state: &Arc<AppState>, printer: Printer, generation: Generation) {
    let before = state.orchestrator().snapshot().await;
    let has_selection = before.data.selected_risk_count() > 0;
    let state = Arc::clone(state);

    tokio::spawn(async move {
        let response = match generation {
            Generation::Manifesto => commands::generate_manifesto(&state).await,
            Generation::Patch => commands::generate_mission_patch(&state).await,
        };
        if printer.json {
            printer.print(&response);
            return;
        }
        match &response.data {
            Some(after) => {
                let changed = match generation {
                    Generation::Manifesto => after.data.manifesto != before.data.manifesto,
                    Generation::Patch => after.data.logo_url != before.data.logo_url,
                };
                if changed {
                    println!("{}", views::render_session(after));
                } else {
                    println!("(nothing generated; see the log for details)");
                }
            }
            None => printer.error(response.error.as_deref().unwrap_or_default()),
        }
    });

    if !printer.json {
        if let Some(notice) = generation_notice(generation, has_selection) {
            println!("{}", notice);
        }
    }
}

/// Shown while a background generation runs; a manifesto with nothing
/// selected never starts.
fn generation_notice(generation: Generation, has_selection: bool) -> Option<&'static str> {
    match generation {
        Generation::Manifesto if has_selection => Some("Updating business plan..."),
        Generation::Manifesto => None,
        Generation::Patch => Some("Generating mission patch..."),
    }
}

#[derive(Clone, Copy)]
struct Printer {
    json: bool,
}

impl Printer {
    fn print<T: Serialize>(&self, response: &CommandResponse<T>) {
        match serde_json::to_string(response) {
            Ok(text) => println!("{}", text),
            Err(e) => tracing::error!(error = %e, "failed to serialize response"),
        }
    }

    fn session(&self, response: &CommandResponse<Session>) {
        if self.json {
            self.print(response);
            return;
        }
        match (&response.data, &response.error) {
            (Some(session), _) => print!("{}", views::render_session(session)),
            (None, Some(message)) => self.error(message),
            (None, None) => {}
        }
    }

    fn error(&self, message: &str) {
        if self.json {
            self.print(&CommandResponse::<()>::err(message));
        } else {
            eprintln!("error: {}", message);
        }
    }
}
