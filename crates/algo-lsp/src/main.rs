use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

use algo_lsp_core::Vocabulary;

mod capabilities;
mod document;
mod handlers;
mod server;

#[derive(Parser)]
#[command(name = "algo-lsp")]
#[command(about = "Language Server for Algo")]
struct Cli {
    /// Use stdio for communication (required)
    #[arg(long)]
    stdio: bool,

    /// Mirror debug messages to the client log
    #[arg(long)]
    debug: bool,

    /// Log filter for stderr, e.g. `debug` or `algo_lsp_core=trace`
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// JSON file overriding the built-in vocabulary tables
    #[arg(long, value_name = "FILE")]
    vocabulary: Option<PathBuf>,
}

fn init_logging(log_level: Option<&str>) {
    // stdout carries the protocol, so logs go to stderr.
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn load_vocabulary(path: Option<&Path>) -> anyhow::Result<Arc<Vocabulary>> {
    let vocabulary = match path {
        Some(path) => Vocabulary::from_path(path)
            .with_context(|| format!("loading vocabulary from {}", path.display()))?,
        None => Vocabulary::default(),
    };
    Ok(Arc::new(vocabulary))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.log_level.as_deref());

    if !args.stdio {
        anyhow::bail!("--stdio flag is required");
    }

    let vocabulary = load_vocabulary(args.vocabulary.as_deref())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting algo-lsp");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::new(|client| server::Backend::new(client, vocabulary.clone(), args.debug));

    Server::new(stdin, stdout, socket).serve(service).await;
    Ok(())
}
