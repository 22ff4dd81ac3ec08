//! D bindings generator core.
//!
//! Turns a stream of registry [entities](vkdgen_ir::Entity) into a single D
//! module. Entities arrive in the front end's traversal order and are
//! placed into fixed output sections, so the generated module is grouped by
//! declaration kind regardless of how the registry interleaves them.
//!
//! # Module Organization
//!
//! - [`SectionBuffer`] - per-section line buffers with scoped indentation
//! - [`render_type`], [`rewrite`] - C declared types to D type expressions
//! - [`Classifier`] - command dispatch groups
//! - [`emit`] - one emitter per entity category
//! - [`Generator`] - the driver and its finishing pass
//! - [`GeneratorOptions`] - `vkdgen.toml` configuration

mod align;
mod classify;
pub mod emit;
mod generator;
mod indent;
mod naming;
mod options;
mod record;
mod section;
mod types;

pub use classify::{
    Classifier, DEFAULT_DISPATCHABLE_OWNERS, DEFAULT_GLOBAL_COMMANDS, DispatchGroup,
};
pub use generator::{Generator, generate, render};
pub use indent::Indent;
pub use naming::{D_KEYWORDS, ReservedWords};
pub use options::{DEFAULT_INTEGER_ALIASES, GeneratorOptions};
pub use record::CommandRecord;
pub use section::{IndentGuard, Section, SectionBuffer};
pub use types::{bit_width, normalize, render_type, rewrite, rewrite_const};
