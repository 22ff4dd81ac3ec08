//! Entity emitters.
//!
//! One function per entity category. Each selects its target [`Section`]
//! and appends formatted declarations; commands are only recorded during
//! traversal and emitted by the finishing pass in [`commands`].
//!
//! [`Section`]: crate::Section

mod commands;
mod constants;
mod enums;
mod structs;
mod types;

pub use commands::{command_aliases, dispatch_tables};
pub use constants::{enum_constant, normalize_literal};
pub use enums::enum_group;
pub use structs::structure;
pub use types::{basic_type, func_pointer, handle};
