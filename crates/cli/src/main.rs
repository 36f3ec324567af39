mod print;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use ssd_core::options::DEFAULT_MAX_TOKEN_LEN;
use ssd_core::{Ast, ParseError, ParseOptions};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// ssd interface definition language toolchain.
#[derive(Parser)]
#[command(
    name = "ssd",
    version,
    about = "ssd interface definition language toolchain"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log parser progress to stderr (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Longest identifier, path, integer or string accepted
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_TOKEN_LEN)]
    max_token_len: usize,

    /// Leave the grammar context out of diagnostics
    #[arg(long, global = true)]
    no_context: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a source file and print its declarations
    Print {
        /// Path to the source file
        file: PathBuf,
    },

    /// Parse a source file and report whether it is well formed
    Check {
        /// Path to the source file
        file: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to open file: {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Parse(_) => 1,
            CliError::Read { .. } => 2,
        }
    }

    fn to_json_value(&self) -> serde_json::Value {
        match self {
            CliError::Parse(e) => serde_json::json!({ "error": e.to_json_value() }),
            CliError::Read { .. } => serde_json::json!({ "error": self.to_string() }),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = ParseOptions::default()
        .with_max_token_len(cli.max_token_len)
        .with_context(!cli.no_context);

    let result = match &cli.command {
        Commands::Print { file } => cmd_print(file, &options, cli.output),
        Commands::Check { file } => cmd_check(file, &options, cli.output, cli.quiet),
    };

    if let Err(e) = result {
        report_error(&e, cli.output, cli.quiet);
        process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "ssd=debug,ssd_core=debug",
        _ => "ssd=trace,ssd_core=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(file: &Path, options: &ParseOptions) -> Result<Ast, CliError> {
    let source = std::fs::read_to_string(file).map_err(|source| CliError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    debug!(file = %file.display(), bytes = source.len(), "read source");
    Ok(ssd_core::parse_with_options(&source, options)?)
}

fn cmd_print(file: &Path, options: &ParseOptions, output: OutputFormat) -> Result<(), CliError> {
    let ast = load(file, options)?;
    match output {
        OutputFormat::Text => print!("{}", print::render(&ast)),
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&ast.to_json_value())
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }
    Ok(())
}

fn cmd_check(
    file: &Path,
    options: &ParseOptions,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let ast = load(file, options)?;
    if quiet {
        return Ok(());
    }
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "ok": true, "nodes": ast.len() }));
        }
        OutputFormat::Text => println!("ok: {} node(s)", ast.len()),
    }
    Ok(())
}

fn report_error(e: &CliError, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("{}", e);
            }
        }
    }
}
