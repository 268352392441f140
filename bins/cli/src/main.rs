//! CLI binary entrypoint.

mod commands;
mod error;
mod format;

use clap::{Parser, Subcommand};
use commands::{
    EvalInput, run_check, run_config_show, run_config_validate, run_eval, run_hexdump, run_info,
};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode};
use propcheck_rules::RuleOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "PROPCHECK_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "propcheck",
    version,
    about = "Validate properties against presence and regex rules",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check every rule in a rule-set file.
    Check {
        /// Rule-set file path (JSON/TOML).
        #[arg(long)]
        config: PathBuf,
        /// Only check the named rules (repeatable).
        #[arg(long = "rule")]
        rules: Vec<String>,
    },
    /// Validate a single value.
    Eval {
        /// Subject label used in default messages.
        #[arg(long, default_value = "Property")]
        subject: String,
        /// Property name used in default messages.
        #[arg(long)]
        property: String,
        /// Literal value to validate.
        #[arg(long, conflicts_with = "env")]
        value: Option<String>,
        /// Read the value from this environment variable.
        #[arg(long)]
        env: Option<String>,
        /// Regular expression the whole value must match.
        #[arg(long)]
        regex: Option<String>,
        /// Message used when the value is missing.
        #[arg(long)]
        message: Option<String>,
        /// Message used when the value does not match.
        #[arg(long)]
        regex_message: Option<String>,
    },
    /// Print the hex dump of a value.
    Hexdump {
        /// Value to dump (UTF-8 bytes).
        #[arg(long, conflicts_with = "stdin")]
        value: Option<String>,
        /// Dump raw bytes read from stdin.
        #[arg(long)]
        stdin: bool,
    },
    /// Rule-set file commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Show build and version details.
    Info,
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Show the effective rule set after env overrides.
    Show {
        /// Rule-set file path (JSON/TOML).
        #[arg(long)]
        path: PathBuf,
    },
    /// Validate a rule-set file without evaluating it.
    Validate {
        /// Rule-set file path (JSON/TOML).
        #[arg(long)]
        path: PathBuf,
    },
}

pub(crate) struct CliOutput {
    stdout: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);
    init_tracing(mode);

    match run(&cli.command, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

/// Install the stderr log subscriber.
///
/// `PROPCHECK_LOG` is read straight from the process environment: logging
/// starts before any `RuleSetEnv` snapshot exists, and the snapshot only
/// carries rule values and setting overrides.
fn init_tracing(mode: OutputMode) {
    let directive = std::env::var(LOG_ENV).ok();
    let registry = tracing_subscriber::registry().with(log_filter(directive.as_deref()));

    // A global subscriber may already be installed; keep it.
    let _ = if mode.is_machine() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .try_init()
    };
}

/// Filter for a `PROPCHECK_LOG` directive; missing or invalid means `warn`.
fn log_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(command: &Commands, mode: OutputMode) -> Result<CliOutput, CliError> {
    match command {
        Commands::Check { config, rules } => run_check(mode, config, rules),
        Commands::Eval {
            subject,
            property,
            value,
            env,
            regex,
            message,
            regex_message,
        } => {
            let options = RuleOptions {
                regex: regex.clone(),
                missing_message: message.clone(),
                regex_message: regex_message.clone(),
                ..RuleOptions::new(subject.as_str(), property.as_str())
            };
            run_eval(mode, &EvalInput::new(options, value.as_deref(), env.as_deref()))
        },
        Commands::Hexdump { value, stdin } => run_hexdump(mode, value.as_deref(), *stdin),
        Commands::Config { command } => match command {
            ConfigCommands::Show { path } => run_config_show(mode, path),
            ConfigCommands::Validate { path } => run_config_validate(mode, path),
        },
        Commands::Info => run_info(mode),
    }
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
