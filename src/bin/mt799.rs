//! mt799: classify an MT799 message from the command line.
//!
//! Reads one raw message from a file (or stdin), runs it through a local
//! NLI model and prints the [`StructuredMessage`](mt799_intent::StructuredMessage)
//! as JSON.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::LazyLock;

use clap::Parser;
use tracing::info;

use mt799_intent::oracle::LocalNliModel;
use mt799_intent::{AnalyzerBuilder, AnalyzerConfig, AnalyzerError, PKG_VERSION, build_commit};

static VERSION: LazyLock<String> = LazyLock::new(mt799_intent::version_string);

/// Zero-shot intent classification for SWIFT MT799 messages
#[derive(Parser)]
#[command(name = "mt799")]
#[command(version = VERSION.as_str())]
#[command(about = "Classify the intent of a SWIFT MT799 message")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "MT799_CONFIG")]
    config: Option<PathBuf>,

    /// Classify only the extracted narrative (overrides the config file).
    #[arg(short, long)]
    narrative_only: bool,

    /// Local NLI model (overrides the config file).
    #[arg(short, long)]
    model: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(short, long)]
    pretty: bool,

    /// Message file (or omit to read from stdin).
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = AnalyzerConfig::load(args.config.as_deref())?;
    let extract_narrative_only = args.narrative_only || config.analysis.extract_narrative_only;

    let mut builder = AnalyzerBuilder::from_config(&config)?;
    // The CLI always needs an oracle: fall back to the default local model.
    if let Some(name) = args.model.as_deref() {
        builder = builder.local_nli(LocalNliModel::from_name(name)?);
    } else if config.local.is_none() {
        builder = builder.local_nli(LocalNliModel::default());
    }
    let analyzer = builder.build()?;

    let raw = read_input(args.file.as_deref())?;
    info!(
        version = PKG_VERSION,
        commit = build_commit().unwrap_or("unknown"),
        bytes = raw.len(),
        "analyzing message"
    );

    let message = analyzer.analyze(&raw, extract_narrative_only).await?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&message)
    } else {
        serde_json::to_string(&message)
    }
    .map_err(AnalyzerError::from)?;
    println!("{json}");

    Ok(())
}

fn read_input(file: Option<&std::path::Path>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(path) = file {
        return Ok(std::fs::read_to_string(path)?);
    }
    if io::stdin().is_terminal() {
        return Err(Box::new(AnalyzerError::InvalidInput(
            "no message file given and stdin is a terminal".to_string(),
        )));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
