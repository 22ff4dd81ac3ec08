//! Registry entities delivered to the generator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RawType;

/// One parsed registry entity.
///
/// The set of categories is closed: anything the front end does not
/// recognise arrives as [`Entity::Unknown`] and generators skip it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Entity {
    BasicType(BasicType),
    Handle(Handle),
    FuncPointer(FuncPointer),
    EnumConstant(EnumConstant),
    EnumGroup(EnumGroup),
    Struct(Struct),
    Command(Command),
    Unknown { raw_category: String, name: String },
}

impl Entity {
    pub fn name(&self) -> &str {
        match self {
            Self::BasicType(e) => &e.name,
            Self::Handle(e) => &e.name,
            Self::FuncPointer(e) => &e.name,
            Self::EnumConstant(e) => &e.name,
            Self::EnumGroup(e) => &e.name,
            Self::Struct(e) => &e.name,
            Self::Command(e) => &e.name,
            Self::Unknown { name, .. } => name,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::BasicType(_) => Category::BasicType,
            Self::Handle(_) => Category::Handle,
            Self::FuncPointer(_) => Category::FuncPointer,
            Self::EnumConstant(_) => Category::EnumConstant,
            Self::EnumGroup(_) => Category::EnumGroup,
            Self::Struct(s) if s.is_union => Category::Union,
            Self::Struct(_) => Category::Struct,
            Self::Command(_) => Category::Command,
            Self::Unknown { .. } => Category::Unknown,
        }
    }
}

/// Entity category, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    BasicType,
    Handle,
    FuncPointer,
    EnumConstant,
    EnumGroup,
    Struct,
    Union,
    Command,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::BasicType,
        Category::Handle,
        Category::FuncPointer,
        Category::EnumConstant,
        Category::EnumGroup,
        Category::Struct,
        Category::Union,
        Category::Command,
        Category::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::BasicType => "basic type",
            Category::Handle => "handle",
            Category::FuncPointer => "function pointer",
            Category::EnumConstant => "constant",
            Category::EnumGroup => "enumeration",
            Category::Struct => "struct",
            Category::Union => "union",
            Category::Command => "command",
            Category::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A type alias: `basetype`, `bitmask`, or any aliased type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicType {
    pub name: String,
    pub underlying: String,
}

/// Whether a handle owns a dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    Dispatchable,
    NonDispatchable,
}

impl HandleKind {
    /// Parse the registry's handle macro name.
    pub fn from_macro(name: &str) -> Option<Self> {
        match name {
            "VK_DEFINE_HANDLE" => Some(Self::Dispatchable),
            "VK_DEFINE_NON_DISPATCHABLE_HANDLE" => Some(Self::NonDispatchable),
            _ => None,
        }
    }

    pub fn macro_name(&self) -> &'static str {
        match self {
            Self::Dispatchable => "VK_DEFINE_HANDLE",
            Self::NonDispatchable => "VK_DEFINE_NON_DISPATCHABLE_HANDLE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handle {
    pub name: String,
    pub kind: HandleKind,
}

/// A function pointer typedef.
///
/// `params` is the raw tail of the declaration following the name, starting
/// at the `)(` that opens the parameter list and ending with `);`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncPointer {
    pub name: String,
    pub return_type: String,
    pub params: RawType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConstant {
    pub name: String,
    /// Literal exactly as written in the registry (`256`, `(~0ULL)`, `"name"`, or another constant).
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: String,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumGroup {
    pub name: String,
    pub is_bitmask: bool,
    /// Storage width for bitmask groups (`64` for the `Flags2` family).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_width: Option<u32>,
    pub members: Vec<EnumMember>,
}

/// A struct member or a command parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub ty: RawType,
    pub name: String,
}

impl Field {
    pub fn new(ty: impl Into<RawType>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Struct {
    pub name: String,
    pub is_union: bool,
    pub members: Vec<Field>,
}

/// A callable entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    pub return_type: String,
    pub params: Vec<Field>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_category() {
        let entity = Entity::Struct(Struct {
            name: "VkClearValue".into(),
            is_union: true,
            members: vec![],
        });
        assert_eq!(entity.category(), Category::Union);
        assert_eq!(entity.name(), "VkClearValue");
    }

    #[test]
    fn test_handle_macro_roundtrip() {
        for kind in [HandleKind::Dispatchable, HandleKind::NonDispatchable] {
            assert_eq!(HandleKind::from_macro(kind.macro_name()), Some(kind));
        }
        assert_eq!(HandleKind::from_macro("VK_DEFINE_SOMETHING"), None);
    }

    #[test]
    fn test_serialize_tagged() {
        let entity = Entity::EnumConstant(EnumConstant {
            name: "VK_TRUE".into(),
            value: "1".into(),
        });
        let json = serde_json::to_string(&entity).unwrap();
        assert_eq!(
            json,
            r#"{"category":"enum_constant","name":"VK_TRUE","value":"1"}"#
        );
    }

    #[test]
    fn test_deserialize_unknown() {
        let entity: Entity =
            serde_json::from_str(r#"{"category":"unknown","raw_category":"define","name":"X"}"#)
                .unwrap();
        assert_eq!(entity.category(), Category::Unknown);
        assert_eq!(entity.name(), "X");
    }
}
