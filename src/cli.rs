//! Command Line Interface
//!
//! Process arguments (clap) and the line commands of the interactive session.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::settings::{SettingsUpdate, StrategyMode};

#[derive(Parser, Debug)]
#[command(
    name = "project-launcher",
    version,
    about = "Pre-mortem risks, an atomized plan and a strategy manifesto from a mission brief"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (default: ~/.project-launcher/config.json)")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive session
    Run {
        #[arg(long, help = "Analyze this brief before the first prompt")]
        brief: Option<String>,
        #[arg(long, default_value_t = false, help = "Print command responses as JSON")]
        json: bool,
    },
    /// Check the API key and model against the generative service
    Check,
    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    Show,
    /// Restore every setting to its default
    Reset,
    Set {
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        image_model: Option<String>,
        #[arg(long)]
        min_delay_ms: Option<u64>,
        #[arg(long, help = "manifesto | manifesto_and_tasks")]
        strategy_mode: Option<StrategyMode>,
        #[arg(long, help = "Environment variable holding the API key")]
        api_key_env: Option<String>,
    },
}

impl ConfigCommands {
    /// Partial settings update for `config set`; `None` otherwise.
    pub fn settings_update(&self) -> Option<SettingsUpdate> {
        match self {
            ConfigCommands::Show | ConfigCommands::Reset => None,
            ConfigCommands::Set {
                model,
                image_model,
                min_delay_ms,
                strategy_mode,
                api_key_env,
            } => Some(SettingsUpdate {
                model: model.clone(),
                image_model: image_model.clone(),
                min_analysis_delay_ms: *min_delay_ms,
                strategy_mode: *strategy_mode,
                api_key_env: api_key_env.clone(),
                ..SettingsUpdate::default()
            }),
        }
    }
}

/// A line typed into the interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Analyze(String),
    Risk(String),
    Task(String),
    Tab(String),
    Manifesto,
    Patch,
    Reset,
    Show,
    Help,
    Quit,
    Empty,
}

impl ReplCommand {
    /// Parse one input line. The first word is the command, the rest its argument.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ReplCommand::Empty);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let needs_arg = |usage: &str| -> Result<String, String> {
            if rest.is_empty() {
                Err(format!("Usage: {}", usage))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_lowercase().as_str() {
            "analyze" | "a" => Ok(ReplCommand::Analyze(needs_arg("analyze <brief>")?)),
            "risk" | "r" => Ok(ReplCommand::Risk(needs_arg("risk <id>")?)),
            "task" | "t" => Ok(ReplCommand::Task(needs_arg("task <id>")?)),
            "tab" => Ok(ReplCommand::Tab(needs_arg("tab <pre-mortem|atomizer|manifesto>")?)),
            "manifesto" | "m" => Ok(ReplCommand::Manifesto),
            "patch" | "logo" => Ok(ReplCommand::Patch),
            "reset" => Ok(ReplCommand::Reset),
            "show" | "s" => Ok(ReplCommand::Show),
            "help" | "h" | "?" => Ok(ReplCommand::Help),
            "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
            other => Err(format!("Unknown command: {}. Type `help` for commands", other)),
        }
    }
}

pub const REPL_HELP: &str = "\
Commands:
  analyze <brief>   run a pre-mortem on a mission brief
  risk <id>         select or deselect a risk's mitigation
  task <id>         mark a task done or open
  tab <name>        pre-mortem | atomizer | manifesto
  manifesto         update the business plan from the selected mitigations
  patch             generate the mission patch image
  reset             discard the mission and start over
  show              redraw the current view
  help              this list
  quit              leave";
