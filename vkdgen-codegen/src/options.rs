//! Generator configuration (`vkdgen.toml`).

use std::{path::Path, str::FromStr};

use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    Classifier, Indent, ReservedWords,
    classify::{DEFAULT_DISPATCHABLE_OWNERS, DEFAULT_GLOBAL_COMMANDS},
};

/// Fixed-width integer types and their D spelling.
pub const DEFAULT_INTEGER_ALIASES: &[(&str, &str)] = &[
    ("uint8_t", "ubyte"),
    ("uint16_t", "ushort"),
    ("uint32_t", "uint"),
    ("uint64_t", "ulong"),
    ("int8_t", "byte"),
    ("int16_t", "short"),
    ("int32_t", "int"),
    ("int64_t", "long"),
];

/// Options accepted by the [`Generator`](crate::Generator).
///
/// Every field has a default, so an empty `vkdgen.toml` is valid:
///
/// ```
/// use std::str::FromStr;
/// use vkdgen_codegen::GeneratorOptions;
///
/// let options = GeneratorOptions::from_str(r#"module = "gfx.bindings.vk""#).unwrap();
/// assert_eq!(options.module, "gfx.bindings.vk");
/// assert_eq!(options.command_prefix, "PFN_");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOptions {
    /// Module name written in the preamble.
    pub module: String,
    /// First line of the preamble, written as a doc comment.
    pub header: String,
    pub indent: Indent,
    pub reserved_words: ReservedWords,
    pub integer_aliases: IndexMap<String, String>,
    pub global_commands: Vec<String>,
    pub dispatchable_owners: Vec<String>,
    /// Prefix of the function pointer alias emitted for every command.
    pub command_prefix: String,
    /// Enum groups whose name ends with this get a storage type annotation.
    pub flag_bits_marker: String,
    pub flags_type: String,
    pub flags64_type: String,
    /// Emit one loader struct per dispatch group after the command aliases.
    pub dispatch_tables: bool,
}

impl GeneratorOptions {
    /// Load options from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read '{}'", path.display()))?;
        content
            .parse()
            .wrap_err_with(|| format!("invalid options in '{}'", path.display()))
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(
            self.global_commands.iter().cloned(),
            self.dispatchable_owners.iter().cloned(),
        )
    }

    /// The D spelling of a fixed-width integer type, if `name` is one.
    pub fn integer_alias(&self, name: &str) -> Option<&str> {
        self.integer_aliases.get(name).map(String::as_str)
    }
}

impl FromStr for GeneratorOptions {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            module: "vulkan".to_string(),
            header: "Vulkan D bindings generated by vkdgen".to_string(),
            indent: Indent::default(),
            reserved_words: ReservedWords::default(),
            integer_aliases: DEFAULT_INTEGER_ALIASES
                .iter()
                .map(|(c, d)| (c.to_string(), d.to_string()))
                .collect(),
            global_commands: DEFAULT_GLOBAL_COMMANDS.iter().map(|s| s.to_string()).collect(),
            dispatchable_owners: DEFAULT_DISPATCHABLE_OWNERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            command_prefix: "PFN_".to_string(),
            flag_bits_marker: "FlagBits".to_string(),
            flags_type: "VkFlags".to_string(),
            flags64_type: "VkFlags64".to_string(),
            dispatch_tables: false,
        }
    }
}
