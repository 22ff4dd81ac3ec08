//! Commands seen during traversal, kept for the finishing pass.

use indexmap::{IndexMap, IndexSet};
use vkdgen_ir::Command;

use crate::DispatchGroup;

/// Every recorded command in discovery order, plus the names of each
/// dispatch group in the same order.
///
/// A command belongs to exactly one group and appears once in the total list.
#[derive(Debug, Clone, Default)]
pub struct CommandRecord {
    commands: IndexMap<String, Command>,
    groups: [IndexSet<String>; 3],
}

impl CommandRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a command. Returns `false`, leaving the record untouched, if a
    /// command with the same name was already recorded.
    pub fn insert(&mut self, command: Command, group: DispatchGroup) -> bool {
        if self.commands.contains_key(&command.name) {
            return false;
        }
        self.groups[group_index(group)].insert(command.name.clone());
        self.commands.insert(command.name.clone(), command);
        true
    }

    /// All commands in discovery order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    /// Commands of one group in discovery order.
    pub fn group(&self, group: DispatchGroup) -> impl Iterator<Item = &Command> {
        self.groups[group_index(group)]
            .iter()
            .filter_map(|name| self.commands.get(name))
    }

    pub fn group_names(&self, group: DispatchGroup) -> &IndexSet<String> {
        &self.groups[group_index(group)]
    }

    pub fn group_of(&self, name: &str) -> Option<DispatchGroup> {
        DispatchGroup::ALL
            .into_iter()
            .find(|g| self.groups[group_index(*g)].contains(name))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn group_index(group: DispatchGroup) -> usize {
    match group {
        DispatchGroup::Global => 0,
        DispatchGroup::Instance => 1,
        DispatchGroup::Device => 2,
    }
}
