use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use algo_lsp_core::{fold_ranges, CompletionEngine, Position, Vocabulary};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod completer;
mod highlighter;
mod repl;
mod repl_helper;
mod symbols;

/// Algo - French pseudocode editing tools
#[derive(Parser)]
#[command(name = "algo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Editing tools for Algo pseudocode", long_about = "Algo Development Toolkit\n\nInspects Algo programs the way the language server sees them:\n  - Syntax highlighting\n  - Foldable blocks\n  - Context-aware completion\n  - Declared symbols\n  - Interactive editor")]
struct Cli {
    /// JSON file overriding the built-in vocabulary tables
    #[arg(long, global = true, value_name = "FILE")]
    vocabulary: Option<PathBuf>,

    /// Log filter for stderr, e.g. `debug` or `algo_lsp_core=trace`
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a file with syntax highlighting
    Highlight {
        /// File to highlight
        file: PathBuf,
        /// Output classified tokens as JSON
        #[arg(long)]
        json: bool,
    },
    /// List foldable blocks
    Folds {
        /// File to scan
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show completions at a position
    Complete {
        /// File to complete in
        file: PathBuf,
        /// 1-based line of the cursor
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
        /// 1-based column of the cursor, in characters
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        column: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List declared variables and record types
    Symbols {
        /// File to scan
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start an interactive editor session
    Repl,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_logging(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let vocabulary = load_vocabulary(cli.vocabulary.as_deref())?;

    match cli.command {
        Commands::Highlight { file, json } => highlight_command(&file, json, &vocabulary),
        Commands::Folds { file, json } => folds_command(&file, json),
        Commands::Complete {
            file,
            line,
            column,
            json,
        } => {
            let cursor = Position::new((line - 1) as usize, (column - 1) as usize);
            complete_command(&file, cursor, json, &vocabulary)
        }
        Commands::Symbols { file, json } => symbols_command(&file, json, &vocabulary),
        Commands::Repl => repl::run_repl(vocabulary),
    }
}

fn load_vocabulary(path: Option<&Path>) -> Result<Arc<Vocabulary>> {
    let vocabulary = match path {
        Some(path) => Vocabulary::from_path(path)
            .with_context(|| format!("loading vocabulary from {}", path.display()))?,
        None => Vocabulary::default(),
    };
    Ok(Arc::new(vocabulary))
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading file '{}'", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing JSON")?;
    println!("{}", json);
    Ok(())
}

// ============================================================================
// HIGHLIGHT COMMAND
// ============================================================================

fn highlight_command(path: &Path, json_output: bool, vocabulary: &Vocabulary) -> Result<()> {
    let source = read_source(path)?;
    if json_output {
        print_json(&highlighter::token_records(&source, vocabulary))
    } else {
        println!("{}", highlighter::highlight_code(&source, vocabulary));
        Ok(())
    }
}

// ============================================================================
// FOLDS COMMAND
// ============================================================================

fn folds_command(path: &Path, json_output: bool) -> Result<()> {
    let source = read_source(path)?;
    let lines: Vec<&str> = source.lines().collect();
    let folds = fold_ranges(&lines);
    tracing::debug!(count = folds.len(), "folds resolved");

    if json_output {
        return print_json(&folds);
    }
    if folds.is_empty() {
        println!("No foldable blocks in: {}", path.display());
    }
    for fold in &folds {
        println!(
            "{}..{} {}",
            fold.start_line() + 1,
            fold.end_line() + 1,
            fold.kind.as_str()
        );
    }
    Ok(())
}

// ============================================================================
// COMPLETE COMMAND
// ============================================================================

fn complete_command(
    path: &Path,
    cursor: Position,
    json_output: bool,
    vocabulary: &Vocabulary,
) -> Result<()> {
    let source = read_source(path)?;
    let result = CompletionEngine::new(vocabulary).compute(&source, cursor);

    if json_output {
        return print_json(&result);
    }
    if result.items.is_empty() {
        println!("No completions at {}:{}", cursor.line + 1, cursor.column + 1);
    }
    for item in &result.items {
        println!("  {:<10} {}", item.kind.as_str(), item.display_text);
    }
    Ok(())
}

// ============================================================================
// SYMBOLS COMMAND
// ============================================================================

fn symbols_command(path: &Path, json_output: bool, vocabulary: &Vocabulary) -> Result<()> {
    let source = read_source(path)?;
    let symbols = symbols::extract_symbols(&source, vocabulary);

    if json_output {
        return print_json(&symbols);
    }
    if symbols.is_empty() {
        println!("No symbols found in: {}", path.display());
        return Ok(());
    }
    println!("Symbols in '{}':", path.display());
    for symbol in &symbols {
        match &symbol.type_name {
            Some(type_name) => println!(
                "  {} {} : {} (line {})",
                symbol.kind, symbol.name, type_name, symbol.line
            ),
            None => println!("  {} {} (line {})", symbol.kind, symbol.name, symbol.line),
        }
    }
    Ok(())
}
