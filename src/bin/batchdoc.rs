//! Batchdoc writes the HTML documentation of batch commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use batch_doc::{
    generate_documentation, BatchDocumentationHandler, CommandRegistry, Dispatcher, Layout,
    RunParmFile,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file listing the batch commands and their documentation
    #[arg(long, global = true, default_value = "commands.json")]
    commands: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the indexed documentation of every command
    Generate {
        /// Output HTML file
        output: PathBuf,
    },
    /// Execute the commands of a RunParm file
    Run {
        /// RunParm file, one `Name,value,...` per line
        runparm_file: PathBuf,
    },
}

fn main() {
    setup_logging();

    let cli = Cli::parse();
    if let Err(e) = execute(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn setup_logging() {
    let result = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
    if let Err(e) = result {
        eprintln!("failed to initialize logging: {e}");
    }
}

fn execute(cli: Cli) -> Result<()> {
    let registry = CommandRegistry::load(&cli.commands)
        .with_context(|| format!("failed to load commands from {}", cli.commands.display()))?;
    tracing::debug!("Loaded {} commands", registry.len());

    match cli.command {
        Command::Generate { output } => {
            generate_documentation(&registry, Layout::Indexed, &output)
                .with_context(|| format!("failed to write {}", output.display()))?;
        }
        Command::Run { runparm_file } => {
            let runparms = RunParmFile::read(&runparm_file)
                .with_context(|| format!("failed to read {}", runparm_file.display()))?;
            let unconsumed = Dispatcher::new()
                .with_handler(BatchDocumentationHandler::new(&registry))
                .run(&runparms)?;
            for parm in unconsumed {
                eprintln!(
                    "Skipped unknown RunParm `{}` at line {}",
                    parm.name, parm.line
                );
            }
        }
    }

    Ok(())
}
