//! Reserved word escaping for member and parameter names.

use indexmap::IndexMap;
use serde::Deserialize;

/// D keywords. Registry names matching one of these get a trailing `_`.
pub const D_KEYWORDS: &[&str] = &[
    "abstract", "alias", "align", "asm", "assert", "auto", "body", "bool", "break", "byte",
    "case", "cast", "catch", "cdouble", "cent", "cfloat", "char", "class", "const", "continue",
    "creal", "dchar", "debug", "default", "delegate", "delete", "deprecated", "do", "double",
    "else", "enum", "export", "extern", "false", "final", "finally", "float", "for", "foreach",
    "foreach_reverse", "function", "goto", "idouble", "if", "ifloat", "immutable", "import", "in",
    "inout", "int", "interface", "invariant", "ireal", "is", "lazy", "long", "macro", "mixin",
    "module", "new", "nothrow", "null", "out", "override", "package", "pragma", "private",
    "protected", "public", "pure", "real", "ref", "return", "scope", "shared", "short", "static",
    "struct", "super", "switch", "synchronized", "template", "this", "throw", "true", "try",
    "typeid", "typeof", "ubyte", "ucent", "uint", "ulong", "union", "unittest", "ushort",
    "version", "void", "wchar", "while", "with",
];

/// Lookup table from colliding names to their escaped form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ReservedWords(IndexMap<String, String>);

impl ReservedWords {
    pub fn new(table: IndexMap<String, String>) -> Self {
        Self(table)
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The escaped form of `name`, or `name` itself when it does not collide.
    pub fn escape<'a>(&'a self, name: &'a str) -> &'a str {
        self.0.get(name).map_or(name, String::as_str)
    }
}

impl Default for ReservedWords {
    fn default() -> Self {
        Self(
            D_KEYWORDS
                .iter()
                .map(|kw| (kw.to_string(), format!("{kw}_")))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_escapes_keywords() {
        let words = ReservedWords::default();
        assert!(words.is_reserved("module"));
        assert_eq!(words.escape("module"), "module_");
        assert_eq!(words.escape("function"), "function_");
    }

    #[test]
    fn test_non_keyword_passes_through() {
        let words = ReservedWords::default();
        assert!(!words.is_reserved("sType"));
        assert_eq!(words.escape("sType"), "sType");
    }

    #[test]
    fn test_custom_table() {
        let words = ReservedWords::new(IndexMap::from([("type".into(), "type_".into())]));
        assert_eq!(words.escape("type"), "type_");
        assert_eq!(words.escape("module"), "module");
    }
}
