//! Indentation configuration for generated code.

use std::borrow::Cow;

use serde::Deserialize;

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum Indent {
    /// Spaces with the specified width (e.g., 2 or 4).
    Spaces(u8),
    /// Tab character.
    Tab,
}

impl Indent {
    /// 4-space indentation (D style guide).
    pub const D: Self = Self::Spaces(4);

    /// The string for one indent level.
    pub fn unit(&self) -> Cow<'static, str> {
        match self {
            Self::Spaces(2) => Cow::Borrowed("  "),
            Self::Spaces(4) => Cow::Borrowed("    "),
            Self::Spaces(8) => Cow::Borrowed("        "),
            Self::Spaces(n) => Cow::Owned(" ".repeat(usize::from(*n))),
            Self::Tab => Cow::Borrowed("\t"),
        }
    }
}

impl From<u8> for Indent {
    /// `0` selects tabs, any other value is a space count.
    fn from(width: u8) -> Self {
        match width {
            0 => Self::Tab,
            n => Self::Spaces(n),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::D
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_unit() {
        assert_eq!(Indent::Spaces(2).unit(), "  ");
        assert_eq!(Indent::Spaces(4).unit(), "    ");
        assert_eq!(Indent::Spaces(3).unit(), "   ");
        assert_eq!(Indent::Tab.unit(), "\t");
    }

    #[test]
    fn test_from_width() {
        assert_eq!(Indent::from(0), Indent::Tab);
        assert_eq!(Indent::from(2), Indent::Spaces(2));
    }

    #[test]
    fn test_default() {
        assert_eq!(Indent::default(), Indent::Spaces(4));
    }
}
