//! Dispatch group classification for commands.

use std::{collections::HashSet, fmt};

use vkdgen_ir::Command;

use crate::render_type;

/// Commands callable before any instance exists.
pub const DEFAULT_GLOBAL_COMMANDS: &[&str] = &[
    "vkGetInstanceProcAddr",
    "vkEnumerateInstanceExtensionProperties",
    "vkEnumerateInstanceLayerProperties",
    "vkCreateInstance",
];

/// Handle types whose commands are dispatched through the device.
pub const DEFAULT_DISPATCHABLE_OWNERS: &[&str] = &["VkDevice", "VkQueue", "VkCommandBuffer"];

/// How a command gets loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchGroup {
    /// Resolved without an instance.
    Global,
    /// Resolved through an instance. The fallback group.
    Instance,
    /// Resolved through a device; first parameter is a device-owned handle.
    Device,
}

impl DispatchGroup {
    pub const ALL: [DispatchGroup; 3] = [
        DispatchGroup::Global,
        DispatchGroup::Instance,
        DispatchGroup::Device,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Instance => "instance",
            Self::Device => "device",
        }
    }
}

impl fmt::Display for DispatchGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Buckets commands into [`DispatchGroup`]s.
///
/// # Example
///
/// ```
/// use vkdgen_codegen::{Classifier, DispatchGroup};
///
/// let classifier = Classifier::default();
/// assert_eq!(classifier.classify("vkCreateInstance", None), DispatchGroup::Global);
/// assert_eq!(classifier.classify("vkQueueWaitIdle", Some("VkQueue")), DispatchGroup::Device);
/// assert_eq!(classifier.classify("vkDestroyInstance", Some("VkInstance")), DispatchGroup::Instance);
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    global_commands: HashSet<String>,
    dispatchable_owners: HashSet<String>,
}

impl Classifier {
    pub fn new<G, O>(global_commands: G, dispatchable_owners: O) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            global_commands: global_commands.into_iter().map(Into::into).collect(),
            dispatchable_owners: dispatchable_owners.into_iter().map(Into::into).collect(),
        }
    }

    /// Classify from a command name and the rendered type of its first parameter.
    pub fn classify(&self, name: &str, first_param_type: Option<&str>) -> DispatchGroup {
        if self.global_commands.contains(name) {
            return DispatchGroup::Global;
        }
        match first_param_type {
            Some(ty) if self.dispatchable_owners.contains(ty) => DispatchGroup::Device,
            _ => DispatchGroup::Instance,
        }
    }

    pub fn classify_command(&self, command: &Command) -> DispatchGroup {
        let first = command.params.first().map(|p| render_type(&p.ty));
        self.classify(&command.name, first.as_deref())
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_GLOBAL_COMMANDS.iter().copied(),
            DEFAULT_DISPATCHABLE_OWNERS.iter().copied(),
        )
    }
}
