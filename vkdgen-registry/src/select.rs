//! API selection and requirement resolution.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;
use vkdgen_ir::{EnumConstant, EnumMember};

use crate::{
    Error, Registry,
    convert::{command_name, enum_value, type_name},
    error::{Result, SourceContext},
    xml::Element,
};

/// Which part of the registry to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// API name matched against `api` and `supported` attributes.
    pub api: String,
    /// Extensions to include on top of the core features, by name.
    pub extensions: Vec<String>,
    /// Include every extension supported by `api`.
    pub all_extensions: bool,
}

impl Selection {
    pub fn new(api: impl Into<String>) -> Self {
        Self {
            api: api.into(),
            extensions: Vec::new(),
            all_extensions: false,
        }
    }

    pub fn with_extension(mut self, name: impl Into<String>) -> Self {
        self.extensions.push(name.into());
        self
    }

    pub fn with_all_extensions(mut self) -> Self {
        self.all_extensions = true;
        self
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new("vulkan")
    }
}

/// Whether a comma separated `api` or `supported` list names `api`.
pub(crate) fn api_listed(list: &str, api: &str) -> bool {
    list.split(',').any(|item| item.trim() == api)
}

/// Elements without an `api` attribute belong to every API.
pub(crate) fn api_matches(element: &Element, api: &str) -> bool {
    element.attr("api").is_none_or(|list| api_listed(list, api))
}

/// Declarations visible to one API, keyed by name. The first definition of
/// a name wins; iteration follows document order.
pub(crate) struct Index<'a> {
    pub api: &'a str,
    pub types: IndexMap<&'a str, &'a Element>,
    pub groups: IndexMap<&'a str, &'a Element>,
    pub constants: IndexMap<&'a str, &'a Element>,
    pub commands: IndexMap<&'a str, &'a Element>,
}

impl<'a> Index<'a> {
    pub fn new(registry: &'a Registry, api: &'a str) -> Self {
        let mut index = Self {
            api,
            types: IndexMap::new(),
            groups: IndexMap::new(),
            constants: IndexMap::new(),
            commands: IndexMap::new(),
        };

        for ty in registry.types.iter().filter(|t| api_matches(t, api)) {
            if let Some(name) = type_name(ty) {
                index.types.entry(name).or_insert(ty);
            }
        }
        for block in &registry.enums {
            match (block.attr("type"), block.attr("name")) {
                (Some("enum" | "bitmask"), Some(name)) => {
                    index.groups.entry(name).or_insert(block);
                }
                _ => {
                    for item in block.elements_named("enum").filter(|e| api_matches(e, api)) {
                        if let Some(name) = item.attr("name") {
                            index.constants.entry(name).or_insert(item);
                        }
                    }
                }
            }
        }
        for command in registry.commands.iter().filter(|c| api_matches(c, api)) {
            if let Some(name) = command_name(command) {
                index.commands.entry(name).or_insert(command);
            }
        }
        index
    }

    /// Follow a command's `alias` chain to the definition carrying `<proto>`.
    pub fn resolve_command(&self, ctx: &SourceContext, command: &'a Element) -> Result<&'a Element> {
        let mut current = command;
        let mut hops = 0;
        while let Some(alias) = current.attr("alias") {
            match self.commands.get(alias) {
                Some(&target) if hops < self.commands.len() => current = target,
                _ => {
                    let name = current.attr("name").unwrap_or_default();
                    return Err(ctx.unknown_alias(name, alias, current.span));
                }
            }
            hops += 1;
        }
        Ok(current)
    }
}

/// Everything a selection requires, after transitive closure.
#[derive(Debug, Default)]
pub(crate) struct Requirements<'a> {
    pub types: IndexSet<&'a str>,
    pub constants: IndexSet<&'a str>,
    pub commands: IndexSet<&'a str>,
    /// Members added to enum groups by `<enum extends>` requirements.
    pub additions: IndexMap<&'a str, Vec<EnumMember>>,
    /// Constants defined inside a feature or extension (`VK_KHR_surface` spec version and name).
    pub inline_constants: IndexMap<&'a str, EnumConstant>,
}

impl<'a> Requirements<'a> {
    pub fn resolve(
        registry: &'a Registry,
        index: &Index<'a>,
        selection: &Selection,
    ) -> Result<Self> {
        let ctx = &registry.ctx;
        let api = index.api;
        let mut required = Self::default();

        for feature in &registry.features {
            if feature.attr("api").is_none_or(|list| api_listed(list, api)) {
                required.require_blocks(ctx, api, feature, None)?;
            }
        }
        for extension in select_extensions(registry, selection)? {
            let number = extension.attr("number").and_then(|n| n.parse().ok());
            required.require_blocks(ctx, api, extension, number)?;
        }
        required.close_over(ctx, index)?;

        debug!(
            types = required.types.len(),
            constants = required.constants.len() + required.inline_constants.len(),
            commands = required.commands.len(),
            "resolved selection for API '{api}'"
        );
        Ok(required)
    }

    fn require_blocks(
        &mut self,
        ctx: &SourceContext,
        api: &str,
        owner: &'a Element,
        number: Option<i64>,
    ) -> Result<()> {
        for block in owner.elements_named("require").filter(|b| api_matches(b, api)) {
            for item in block.elements().filter(|e| api_matches(e, api)) {
                let Some(name) = item.attr("name") else {
                    continue;
                };
                match item.name.as_str() {
                    "type" => {
                        self.types.insert(name);
                    }
                    "command" => {
                        self.commands.insert(name);
                    }
                    "enum" => self.require_enum(ctx, item, name, number)?,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn require_enum(
        &mut self,
        ctx: &SourceContext,
        item: &'a Element,
        name: &'a str,
        number: Option<i64>,
    ) -> Result<()> {
        if let Some(group) = item.attr("extends") {
            let value = enum_value(ctx, item, number)?;
            let members = self.additions.entry(group).or_default();
            if !members.iter().any(|m| m.name == name) {
                members.push(EnumMember::new(name, value));
            }
        } else if ["value", "bitpos", "offset", "alias"]
            .iter()
            .any(|key| item.attr(key).is_some())
        {
            let value = enum_value(ctx, item, number)?;
            self.inline_constants
                .entry(name)
                .or_insert_with(|| EnumConstant {
                    name: name.to_string(),
                    value,
                });
        } else {
            self.constants.insert(name);
        }
        Ok(())
    }

    /// Pull in every type and constant reachable from the required
    /// commands and types.
    fn close_over(&mut self, ctx: &SourceContext, index: &Index<'a>) -> Result<()> {
        let mut pending = Vec::new();
        let mut constants = Vec::new();

        for name in &self.commands {
            let Some(&command) = index.commands.get(name) else {
                debug!(%name, "required command is not defined");
                continue;
            };
            let command = index.resolve_command(ctx, command)?;
            collect_refs(command, index.api, &mut pending, &mut constants);
        }

        pending.extend(self.types.iter().copied());
        let mut visited = HashSet::new();
        while let Some(name) = pending.pop() {
            if !visited.insert(name) {
                continue;
            }
            self.types.insert(name);
            if let Some(&ty) = index.types.get(name) {
                for key in ["requires", "bitvalues", "alias"] {
                    if let Some(target) = ty.attr(key) {
                        pending.push(target);
                    }
                }
                collect_refs(ty, index.api, &mut pending, &mut constants);
            }
        }

        self.constants.extend(constants);
        Ok(())
    }
}

/// Type and constant names mentioned in an element's declarations.
fn collect_refs<'a>(
    element: &'a Element,
    api: &str,
    types: &mut Vec<&'a str>,
    constants: &mut Vec<&'a str>,
) {
    for child in element.elements().filter(|e| api_matches(e, api)) {
        match child.name.as_str() {
            "type" => types.push(child.first_text().trim()),
            "enum" => constants.push(child.first_text().trim()),
            "comment" => {}
            _ => collect_refs(child, api, types, constants),
        }
    }
}

fn supported_by(extension: &Element, api: &str) -> bool {
    extension
        .attr("supported")
        .is_some_and(|list| api_listed(list, api))
}

/// Extensions named by the selection, plus all supported ones when asked,
/// in document order followed by explicitly named ones.
fn select_extensions<'a>(registry: &'a Registry, selection: &Selection) -> Result<Vec<&'a Element>> {
    let api = selection.api.as_str();
    let mut selected: IndexMap<&str, &Element> = IndexMap::new();

    if selection.all_extensions {
        for extension in registry.extensions.iter().filter(|e| supported_by(e, api)) {
            if let Some(name) = extension.attr("name") {
                selected.insert(name, extension);
            }
        }
    }
    for wanted in &selection.extensions {
        let extension = registry
            .extensions
            .iter()
            .filter(|e| supported_by(e, api))
            .find(|e| e.attr("name") == Some(wanted.as_str()))
            .ok_or_else(|| {
                Box::new(Error::UnknownExtension {
                    name: wanted.clone(),
                    api: api.to_string(),
                })
            })?;
        selected.entry(wanted.as_str()).or_insert(extension);
    }
    Ok(selected.into_values().collect())
}
