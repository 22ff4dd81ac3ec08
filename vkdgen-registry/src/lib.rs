//! Vulkan XML registry front end.
//!
//! Loads a `vk.xml`-style registry, resolves the features and extensions of
//! one API, and delivers the required declarations to an
//! [`EntitySink`](vkdgen_ir::EntitySink) in document order.
//!
//! ```no_run
//! use vkdgen_registry::{Registry, Selection};
//!
//! let registry = Registry::from_file("vk.xml")?;
//! let entities = registry.entities(&Selection::default())?;
//! # Ok::<(), Box<vkdgen_registry::Error>>(())
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod convert;
mod error;
mod registry;
mod select;
mod xml;

pub use error::{Error, Result, SourceContext};
pub use registry::Registry;
pub use select::Selection;
pub use xml::{Element, Node};
