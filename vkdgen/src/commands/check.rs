use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use vkdgen_codegen::{Classifier, CommandRecord, DispatchGroup, GeneratorOptions};
use vkdgen_ir::{Category, Entity};

use super::{RegistryArgs, UnwrapOrExit};

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Generator options file (vkdgen.toml), for its classification tables
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let options = self.options()?;
        let registry = self.registry.load();
        let selection = self.registry.selection();
        let entities = registry.entities(&selection).unwrap_or_exit();

        println!("✓ {} is valid\n", registry.filename());

        let features = registry.features(&selection.api);
        println!("  api {} ({} features)", selection.api, features.len());
        for feature in features {
            println!("    {}", feature);
        }
        println!();

        println!("  {} entities:", entities.len());
        for (category, count) in category_counts(&entities) {
            println!("    {:<18} {}", category, count);
        }
        println!();

        let record = classify(&options.classifier(), &entities);
        println!("  {} commands:", record.len());
        for group in DispatchGroup::ALL {
            println!("    {:<18} {}", group, record.group_names(group).len());
        }

        Ok(())
    }

    fn options(&self) -> Result<GeneratorOptions> {
        match &self.config {
            Some(path) => GeneratorOptions::from_file(path),
            None => Ok(GeneratorOptions::default()),
        }
    }
}

/// Entity counts per category, skipping empty categories.
fn category_counts(entities: &[Entity]) -> Vec<(Category, usize)> {
    Category::ALL
        .into_iter()
        .map(|c| (c, entities.iter().filter(|e| e.category() == c).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

fn classify(classifier: &Classifier, entities: &[Entity]) -> CommandRecord {
    let mut record = CommandRecord::new();
    for entity in entities {
        if let Entity::Command(command) = entity {
            record.insert(command.clone(), classifier.classify_command(command));
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use vkdgen_ir::{BasicType, Command, Field, RawType, Token};

    use super::*;

    fn command(name: &str, first: Option<&str>) -> Entity {
        Entity::Command(Command {
            name: name.into(),
            return_type: "void".into(),
            params: first
                .map(|ty| {
                    Field::new(
                        RawType::new(vec![Token::ty(ty), Token::text(" "), Token::name("handle")]),
                        "handle",
                    )
                })
                .into_iter()
                .collect(),
        })
    }

    #[test]
    fn test_counts_skip_empty_categories() {
        let entities = vec![
            Entity::BasicType(BasicType {
                name: "VkFlags".into(),
                underlying: "uint32_t".into(),
            }),
            command("vkCreateInstance", None),
            command("vkQueueWaitIdle", Some("VkQueue")),
        ];
        assert_eq!(
            category_counts(&entities),
            [(Category::BasicType, 1), (Category::Command, 2)]
        );
    }

    #[test]
    fn test_commands_are_grouped() {
        let entities = vec![
            command("vkCreateInstance", None),
            command("vkDestroyInstance", Some("VkInstance")),
            command("vkQueueWaitIdle", Some("VkQueue")),
        ];
        let record = classify(&Classifier::default(), &entities);
        assert_eq!(record.group_of("vkCreateInstance"), Some(DispatchGroup::Global));
        assert_eq!(record.group_of("vkDestroyInstance"), Some(DispatchGroup::Instance));
        assert_eq!(record.group_of("vkQueueWaitIdle"), Some(DispatchGroup::Device));
    }

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        cmd: CheckCommand,
    }

    #[test]
    fn test_config_tables_drive_grouping() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "dispatchable_owners = [\"VkQueue\"]").unwrap();
        let path = config.path().display().to_string();
        let cmd = Wrapper::parse_from(["check", "-c", path.as_str()]).cmd;

        let entities = vec![
            command("vkDeviceWaitIdle", Some("VkDevice")),
            command("vkQueueWaitIdle", Some("VkQueue")),
        ];
        let record = classify(&cmd.options().unwrap().classifier(), &entities);
        assert_eq!(record.group_of("vkDeviceWaitIdle"), Some(DispatchGroup::Instance));
        assert_eq!(record.group_of("vkQueueWaitIdle"), Some(DispatchGroup::Device));

        let defaults = Wrapper::parse_from(["check"]).cmd;
        let record = classify(&defaults.options().unwrap().classifier(), &entities);
        assert_eq!(record.group_of("vkDeviceWaitIdle"), Some(DispatchGroup::Device));
    }
}
