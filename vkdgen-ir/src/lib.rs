//! Parsed entity types for the vkdgen bindings generator.
//!
//! This crate is the boundary between the registry front end and the code
//! generator. The front end walks the registry and produces one [`Entity`] at
//! a time; the generator consumes them through an [`EntitySink`].
//!
//! # Architecture
//!
//! ```text
//! vk.xml → vkdgen-registry (parsing) → vkdgen-ir (entities) → vkdgen-codegen
//! ```
//!
//! The types are deliberately plain data: no target-language concerns, and
//! no references back into the registry document.

mod entity;
mod sink;
mod tokens;

pub use entity::{
    BasicType, Category, Command, EnumConstant, EnumGroup, EnumMember, Entity, Field,
    FuncPointer, Handle, HandleKind, Struct,
};
pub use sink::EntitySink;
pub use tokens::{RawType, Token, TokenKind};
