use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use clap::Args;
use eyre::{Context, Result};
use tracing::info;
use vkdgen_codegen::{DispatchGroup, Generator, GeneratorOptions};

use super::{RegistryArgs, UnwrapOrExit};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Output file, or '-' for stdout
    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,

    /// Module name (overrides the config file)
    #[arg(short, long)]
    pub module: Option<String>,

    /// Generator options file (vkdgen.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Emit a loader struct per dispatch group
    #[arg(long)]
    pub dispatch_tables: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let options = self.options()?;
        let registry = self.registry.load();
        let selection = self.registry.selection();

        let mut generator = Generator::new(options);
        let count = registry.walk(&selection, &mut generator).unwrap_or_exit();

        if self.writes_stdout() {
            generator.write_to(io::stdout().lock())?;
        } else {
            let file = File::create(&self.output)
                .wrap_err_with(|| format!("failed to create '{}'", self.output.display()))?;
            let mut writer = BufWriter::new(file);
            generator.write_to(&mut writer)?;
            writer
                .flush()
                .wrap_err_with(|| format!("failed to write '{}'", self.output.display()))?;
            eprintln!(
                "Generated {} ({} entities, {} commands)",
                self.output.display(),
                count,
                generator.record().len()
            );
        }

        let record = generator.record();
        for group in DispatchGroup::ALL {
            info!(group = %group, commands = record.group_names(group).len(), "classified");
        }
        Ok(())
    }

    /// Options from the config file, then command line overrides.
    fn options(&self) -> Result<GeneratorOptions> {
        let mut options = match &self.config {
            Some(path) => GeneratorOptions::from_file(path)?,
            None => GeneratorOptions::default(),
        };
        if let Some(module) = &self.module {
            options = options.with_module(module);
        }
        if self.dispatch_tables {
            options.dispatch_tables = true;
        }
        Ok(options)
    }

    fn writes_stdout(&self) -> bool {
        self.output.as_os_str() == "-"
    }
}
