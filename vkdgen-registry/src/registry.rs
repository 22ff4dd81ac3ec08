use std::path::Path;

use tracing::debug;
use vkdgen_ir::{Entity, EntitySink};

use crate::{
    Error, Selection, convert,
    error::{Result, SourceContext},
    select::{Index, Requirements, api_listed},
    xml::{self, Element},
};

/// A loaded XML registry.
///
/// Only the blocks the generator consumes are kept: `<types>`, `<enums>`,
/// `<commands>`, `<feature>` and `<extensions>`.
#[derive(Debug, Clone)]
pub struct Registry {
    pub(crate) ctx: SourceContext,
    pub(crate) types: Vec<Element>,
    pub(crate) enums: Vec<Element>,
    pub(crate) commands: Vec<Element>,
    pub(crate) features: Vec<Element>,
    pub(crate) extensions: Vec<Element>,
}

impl Registry {
    /// Load a registry from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse a registry from a string with a custom filename for error reporting
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let root = xml::parse(&ctx)?;
        if root.name != "registry" {
            return Err(ctx.malformed_at(
                format!("expected a <registry> root element, found <{}>", root.name),
                root.span,
            ));
        }

        let mut registry = Self {
            ctx,
            types: Vec::new(),
            enums: Vec::new(),
            commands: Vec::new(),
            features: Vec::new(),
            extensions: Vec::new(),
        };
        for block in root.into_elements() {
            match block.name.as_str() {
                "types" => registry.types.extend(block.into_elements().filter(|e| e.name == "type")),
                "enums" => registry.enums.push(block),
                "commands" => registry
                    .commands
                    .extend(block.into_elements().filter(|e| e.name == "command")),
                "feature" => registry.features.push(block),
                "extensions" => registry
                    .extensions
                    .extend(block.into_elements().filter(|e| e.name == "extension")),
                _ => {}
            }
        }
        Ok(registry)
    }

    pub fn filename(&self) -> &str {
        self.ctx.filename()
    }

    /// Names of the features declared for `api`, in document order.
    pub fn features(&self, api: &str) -> Vec<&str> {
        self.features
            .iter()
            .filter(|f| f.attr("api").is_none_or(|list| api_listed(list, api)))
            .filter_map(|f| f.attr("name"))
            .collect()
    }

    /// Names of the extensions supported by `api`, in document order.
    pub fn extensions(&self, api: &str) -> Vec<&str> {
        self.extensions
            .iter()
            .filter(|e| e.attr("supported").is_some_and(|list| api_listed(list, api)))
            .filter_map(|e| e.attr("name"))
            .collect()
    }

    /// Resolve `selection` and convert every required declaration.
    ///
    /// Types come first (enum types carry their value group), then
    /// constants, then commands, each in document order.
    pub fn entities(&self, selection: &Selection) -> Result<Vec<Entity>> {
        let index = Index::new(self, &selection.api);
        let required = Requirements::resolve(self, &index, selection)?;
        let mut entities = Vec::new();

        for (name, element) in &index.types {
            if required.types.contains(name) {
                entities.extend(convert::type_entity(&self.ctx, &index, &required, element)?);
            }
        }
        for (name, element) in &index.constants {
            if required.constants.contains(name) {
                entities.push(Entity::EnumConstant(convert::constant(&self.ctx, element)?));
            }
        }
        entities.extend(required.inline_constants.values().cloned().map(Entity::EnumConstant));
        for (name, element) in &index.commands {
            if required.commands.contains(name) {
                entities.push(Entity::Command(convert::command(&self.ctx, &index, element)?));
            }
        }

        debug!(entities = entities.len(), "converted registry declarations");
        Ok(entities)
    }

    /// Deliver the entities of `selection` to `sink` as one run.
    ///
    /// The selection is fully resolved before `begin`, so an error never
    /// leaves the sink with a partial run.
    pub fn walk<S>(&self, selection: &Selection, sink: &mut S) -> Result<usize>
    where
        S: EntitySink + ?Sized,
    {
        let entities = self.entities(selection)?;
        let count = entities.len();
        sink.begin();
        for entity in entities {
            sink.entity(entity);
        }
        sink.end();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use vkdgen_ir::{BasicType, Category, HandleKind};

    use super::*;

    const REGISTRY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<registry>
    <comment>test registry</comment>
    <types>
        <type name="vk_platform" category="include">#include "vk_platform.h"</type>
        <type requires="vk_platform" name="uint32_t"/>
        <type category="basetype">typedef <type>uint32_t</type> <name>VkFlags</name>;</type>
        <type category="handle" parent="VkInstance"><type>VK_DEFINE_HANDLE</type>(<name>VkDevice</name>)</type>
        <type category="handle"><type>VK_DEFINE_HANDLE</type>(<name>VkInstance</name>)</type>
        <type name="VkResult" category="enum"/>
        <type category="struct" name="VkExtent2D">
            <member><type>uint32_t</type> <name>width</name></member>
            <member><type>uint32_t</type> <name>height</name></member>
        </type>
        <type category="struct" name="VkExtent2DKHR" alias="VkExtent2D"/>
    </types>
    <enums name="API Constants" type="constants">
        <enum type="uint32_t" value="256" name="VK_MAX_NAME"/>
    </enums>
    <enums name="VkResult" type="enum">
        <enum value="0" name="VK_SUCCESS"/>
        <enum value="-1" name="VK_ERROR_OUT_OF_HOST_MEMORY"/>
    </enums>
    <commands>
        <command>
            <proto><type>void</type> <name>vkDestroyDevice</name></proto>
            <param><type>VkDevice</type> <name>device</name></param>
        </command>
    </commands>
    <feature api="vulkan" name="VK_VERSION_1_0">
        <require>
            <command name="vkDestroyDevice"/>
            <type name="VkFlags"/>
            <type name="VkExtent2DKHR"/>
            <enum name="VK_MAX_NAME"/>
            <type name="VkResult"/>
        </require>
    </feature>
    <extensions>
        <extension name="VK_KHR_test" number="1" supported="vulkan">
            <require>
                <enum value="1" name="VK_KHR_TEST_SPEC_VERSION"/>
            </require>
        </extension>
    </extensions>
</registry>
"#;

    fn load() -> Registry {
        Registry::from_str_with_filename(REGISTRY, "vk.xml").unwrap()
    }

    #[test]
    fn test_blocks_are_collected() {
        let registry = load();
        assert_eq!(registry.types.len(), 8);
        assert_eq!(registry.enums.len(), 2);
        assert_eq!(registry.commands.len(), 1);
        assert_eq!(registry.features(""), Vec::<&str>::new());
        assert_eq!(registry.features("vulkan"), ["VK_VERSION_1_0"]);
        assert_eq!(registry.extensions("vulkan"), ["VK_KHR_test"]);
    }

    #[test]
    fn test_delivery_order_and_closure() {
        let entities = load().entities(&Selection::default()).unwrap();
        let delivered: Vec<_> = entities
            .iter()
            .map(|e| (e.category(), e.name().to_string()))
            .collect();
        assert_eq!(
            delivered,
            [
                (Category::Unknown, "vk_platform".to_string()),
                (Category::BasicType, "VkFlags".to_string()),
                (Category::Handle, "VkDevice".to_string()),
                (Category::EnumGroup, "VkResult".to_string()),
                (Category::Struct, "VkExtent2D".to_string()),
                (Category::BasicType, "VkExtent2DKHR".to_string()),
                (Category::EnumConstant, "VK_MAX_NAME".to_string()),
                (Category::Command, "vkDestroyDevice".to_string()),
            ]
        );
        assert_eq!(
            entities[5],
            Entity::BasicType(BasicType {
                name: "VkExtent2DKHR".into(),
                underlying: "VkExtent2D".into(),
            })
        );
        assert!(matches!(
            &entities[2],
            Entity::Handle(h) if h.kind == HandleKind::Dispatchable
        ));
    }

    #[test]
    fn test_extension_constants_follow_core_constants() {
        let selection = Selection::default().with_extension("VK_KHR_test");
        let entities = load().entities(&selection).unwrap();
        let constants: Vec<_> = entities
            .iter()
            .filter(|e| e.category() == Category::EnumConstant)
            .map(Entity::name)
            .collect();
        assert_eq!(constants, ["VK_MAX_NAME", "VK_KHR_TEST_SPEC_VERSION"]);
    }

    #[test]
    fn test_walk_brackets_the_run() {
        struct Recorder(Vec<String>);
        impl EntitySink for Recorder {
            fn begin(&mut self) {
                self.0.push("begin".into());
            }
            fn entity(&mut self, entity: Entity) {
                self.0.push(entity.name().to_string());
            }
            fn end(&mut self) {
                self.0.push("end".into());
            }
        }

        let mut recorder = Recorder(Vec::new());
        let count = load().walk(&Selection::default(), &mut recorder).unwrap();
        assert_eq!(count, 8);
        assert_eq!(recorder.0.first().map(String::as_str), Some("begin"));
        assert_eq!(recorder.0.last().map(String::as_str), Some("end"));
        assert_eq!(recorder.0.len(), count + 2);
    }

    #[test]
    fn test_walk_error_leaves_sink_untouched() {
        let mut sink: Vec<Entity> = Vec::new();
        let selection = Selection::default().with_extension("VK_missing");
        assert!(load().walk(&selection, &mut sink).is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_wrong_root_element() {
        let err = Registry::from_str_with_filename("<types/>", "vk.xml").unwrap_err();
        assert!(err.to_string().contains("<registry>"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(REGISTRY.as_bytes()).unwrap();
        let registry = Registry::from_file(file.path()).unwrap();
        assert_eq!(registry.filename(), file.path().display().to_string());
    }

    #[test]
    fn test_missing_file() {
        let err = Registry::from_file("/nonexistent/vk.xml").unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
