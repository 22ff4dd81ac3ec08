mod check;
mod completions;
mod entities;
mod generate;

use std::path::PathBuf;

use check::CheckCommand;
use clap::{Args, Parser, Subcommand};
use completions::CompletionsCommand;
use entities::EntitiesCommand;
use eyre::Result;
use generate::GenerateCommand;
use tracing::debug;
use vkdgen_registry::{Registry, Selection};

use crate::logging;

/// Extension trait for exiting on registry errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for vkdgen_registry::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "vkdgen")]
#[command(version)]
#[command(about = "Generate D bindings from the Vulkan XML registry")]
pub(crate) struct Cli {
    /// Log debug output to stderr (VKDGEN_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        logging::init(self.verbose);
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Entities(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a D module from the registry
    Generate(GenerateCommand),

    /// Load and resolve the registry, then print what would be generated
    Check(CheckCommand),

    /// Dump the resolved entity stream as JSON
    Entities(EntitiesCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Registry location and API selection, shared by the registry commands.
#[derive(Args)]
pub(crate) struct RegistryArgs {
    /// Path to the XML registry
    #[arg(short, long, default_value = "vk.xml")]
    pub registry: PathBuf,

    /// API to generate for
    #[arg(long, default_value = "vulkan")]
    pub api: String,

    /// Extension to include (repeatable)
    #[arg(short, long = "extension", value_name = "NAME")]
    pub extensions: Vec<String>,

    /// Include every extension the API supports
    #[arg(long, conflicts_with = "extensions")]
    pub all_extensions: bool,
}

impl RegistryArgs {
    pub fn selection(&self) -> Selection {
        let selection = self
            .extensions
            .iter()
            .fold(Selection::new(&self.api), |s, name| s.with_extension(name));
        if self.all_extensions {
            selection.with_all_extensions()
        } else {
            selection
        }
    }

    /// Load the registry, exiting with a rendered diagnostic on failure.
    pub fn load(&self) -> Registry {
        debug!(path = %self.registry.display(), "loading registry");
        Registry::from_file(&self.registry).unwrap_or_exit()
    }
}
