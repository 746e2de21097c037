mod commands;
mod helpers;
mod plot;

use clap::Parser;
use pvcurve_core::domain::{PvError, PvErrorCategory};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().collect();

    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", error.diagnostic_line());
            eprintln!("FATAL EXIT CODE: {}", error.exit_code());
            error.exit_code()
        }
    }
}

#[cfg(test)]
pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("pvcurve".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_tracing(cli.verbose);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "pvcurve",
    version,
    about = "Photovoltaic IV-curve parameter extraction"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG applies otherwise
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Extract Jsc, Voc, FF, PCE, Rs and Rsh from a delimited IV table
    Analyze(commands::AnalyzeArgs),
    /// Print the default analysis configuration as JSON
    Config,
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Analyze(args) => commands::run_analyze_command(args),
        CliCommand::Config => commands::run_config_command(),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    // A subscriber may already be installed when the CLI runs in-process under tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Analysis(#[from] PvError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::Usage(_) => "INPUT.CLI_USAGE",
            Self::Analysis(error) => error.code(),
            Self::Internal(_) => "IO.CLI",
        }
    }

    fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => PvErrorCategory::InputValidationError.exit_code(),
            Self::Analysis(error) => error.exit_code(),
            Self::Internal(_) => PvErrorCategory::IoSystemError.exit_code(),
        }
    }

    fn diagnostic_line(&self) -> String {
        match self {
            Self::Usage(message) => format!("ERROR: [{}] {}", self.code(), message.trim_end()),
            Self::Analysis(error) => error.diagnostic_line(),
            Self::Internal(error) => format!("ERROR: [{}] {error:#}", self.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CliError, run};
    use pvcurve_core::domain::PvError;

    #[test]
    fn help_exits_cleanly() {
        assert_eq!(run(["--help"]).expect("help is not an error"), 0);
        assert_eq!(run(["analyze", "--help"]).expect("help is not an error"), 0);
    }

    #[test]
    fn unknown_subcommand_is_a_usage_error() {
        let error = run(["calibrate"]).expect_err("no such subcommand");
        assert!(matches!(error, CliError::Usage(_)));
        assert_eq!(error.exit_code(), 2);
        assert!(error.diagnostic_line().starts_with("ERROR: [INPUT.CLI_USAGE]"));
    }

    #[test]
    fn analysis_errors_keep_their_code_and_exit_status() {
        let error = CliError::from(PvError::degenerate_curve("flat"));
        assert_eq!(error.exit_code(), 4);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [RUN.DEGENERATE_CURVE] degenerate curve: flat"
        );

        let internal = CliError::from(anyhow::anyhow!("stdout closed"));
        assert_eq!(internal.exit_code(), 3);
        assert_eq!(internal.diagnostic_line(), "ERROR: [IO.CLI] stdout closed");
    }
}
