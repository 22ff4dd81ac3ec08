use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use clap::Args;
use eyre::{Context, Result};

use super::{RegistryArgs, UnwrapOrExit};

#[derive(Args)]
pub struct EntitiesCommand {
    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Output file, or '-' for stdout
    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,

    /// Write one entity per line instead of a pretty array
    #[arg(long)]
    pub lines: bool,
}

impl EntitiesCommand {
    pub fn run(&self) -> Result<()> {
        let registry = self.registry.load();
        let entities = registry
            .entities(&self.registry.selection())
            .unwrap_or_exit();

        if self.output.as_os_str() == "-" {
            self.dump(&entities, io::stdout().lock())
        } else {
            let file = File::create(&self.output)
                .wrap_err_with(|| format!("failed to create '{}'", self.output.display()))?;
            self.dump(&entities, BufWriter::new(file))
        }
    }

    fn dump<W: Write>(&self, entities: &[vkdgen_ir::Entity], mut out: W) -> Result<()> {
        if self.lines {
            for entity in entities {
                serde_json::to_writer(&mut out, entity)?;
                writeln!(out)?;
            }
        } else {
            serde_json::to_writer_pretty(&mut out, entities)?;
            writeln!(out)?;
        }
        out.flush().wrap_err("failed to write entities")
    }
}
