use vkdgen_ir::EnumConstant;

use crate::{Section, SectionBuffer};

/// `enum VK_MAX_EXTENSION_NAME_SIZE = 256;`
pub fn enum_constant(out: &mut SectionBuffer, constant: &EnumConstant) {
    out.set_section(Section::Const).line(format!(
        "enum {} = {};",
        constant.name,
        normalize_literal(&constant.value)
    ));
}

/// Rewrite C integer suffixes to their D spelling: `ULL` → `uL`, `LL` → `L`,
/// `U` → `u`.
///
/// Only suffixes directly following a numeric literal are touched; digits
/// inside identifiers are left alone.
///
/// ```
/// use vkdgen_codegen::emit::normalize_literal;
///
/// assert_eq!(normalize_literal("(~0ULL)"), "(~0uL)");
/// assert_eq!(normalize_literal("(~0U)"), "(~0u)");
/// assert_eq!(normalize_literal("1000.0F"), "1000.0F");
/// ```
pub fn normalize_literal(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        let starts_literal =
            bytes[i].is_ascii_digit() && (i == 0 || !is_ident_byte(bytes[i - 1]));
        if !starts_literal {
            i += 1;
            continue;
        }

        out.push_str(&value[copied..i]);
        let start = i;
        if bytes[i] == b'0' && matches!(bytes.get(i + 1), Some(b'x' | b'X')) {
            i += 2;
            while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
                i += 1;
            }
        } else {
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                i += 1;
            }
        }
        out.push_str(&value[start..i]);

        let rest = &value[i..];
        let (suffix, len) = if rest.starts_with("ULL") {
            ("uL", 3)
        } else if rest.starts_with("LL") {
            ("L", 2)
        } else if rest.starts_with('U') {
            ("u", 1)
        } else {
            ("", 0)
        };
        out.push_str(suffix);
        i += len;
        copied = i;
    }

    out.push_str(&value[copied..]);
    out
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
