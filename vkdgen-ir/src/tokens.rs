//! Raw declared types as they appear in the registry.

use serde::{Deserialize, Serialize};

/// Kind of a fragment inside a mixed-content declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Free text between elements (`const `, `* `, `[`, ...).
    Text,
    /// Content of a `<type>` element.
    Type,
    /// Content of a `<name>` element. Type rendering skips it.
    Name,
    /// Content of an `<enum>` element (array sizes).
    Enum,
}

/// One fragment of a mixed-content declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Text, text)
    }

    pub fn ty(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Type, text)
    }

    pub fn name(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Name, text)
    }

    pub fn is_name(&self) -> bool {
        self.kind == TokenKind::Name
    }
}

/// A declared type in its raw, C-like token form.
///
/// The token stream may include the declared name (as a [`TokenKind::Name`]
/// token) and anything that follows it, such as array bounds:
///
/// ```
/// use vkdgen_ir::{RawType, Token};
///
/// let raw = RawType::new(vec![
///     Token::text("const "),
///     Token::ty("char"),
///     Token::text("* "),
///     Token::name("pName"),
/// ]);
/// let (head, tail) = raw.split_at_name();
/// assert_eq!(head.len(), 3);
/// assert!(tail.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawType {
    tokens: Vec<Token>,
}

impl RawType {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens before the `<name>` fragment and tokens after it (array
    /// bounds, bit widths). Without a name everything is in the head.
    pub fn split_at_name(&self) -> (&[Token], &[Token]) {
        match self.tokens.iter().position(Token::is_name) {
            Some(at) => (&self.tokens[..at], &self.tokens[at + 1..]),
            None => (self.tokens.as_slice(), &[][..]),
        }
    }
}

impl From<&str> for RawType {
    /// A single text fragment. Mostly useful for tests and hand-built entities.
    fn from(text: &str) -> Self {
        Self::new(vec![Token::text(text)])
    }
}
