//! C declared types to D type expressions.
//!
//! | C                   | D                 |
//! |---------------------|-------------------|
//! | `T`                 | `T`               |
//! | `T*`, `T**`         | unchanged         |
//! | `const T*`          | `const(T)*`       |
//! | `const T* const*`   | `const(T*)*`      |
//! | `struct T*`         | `T*`              |
//! | `T name[A][B]`      | `T[B][A]`         |
//!
//! Forms outside this table are passed through after whitespace
//! normalization; nothing here fails.

use vkdgen_ir::{RawType, Token, TokenKind};

/// Render a raw registry type, skipping its `<name>` fragment.
///
/// Array bounds after the name are appended in reverse, since D reads
/// `T[B][A]` as an `A`-element array of `T[B]`. A bit width after the name
/// is dropped here; see [`bit_width`].
pub fn render_type(raw: &RawType) -> String {
    let (head, tail) = raw.split_at_name();
    let mut ty = rewrite(&join_head(head));
    for dim in array_dims(&join_tail(tail)).iter().rev() {
        ty.push('[');
        ty.push_str(dim);
        ty.push(']');
    }
    ty
}

/// Width of a bitfield member (`<name>mask</name>:8`), if the declaration is one.
pub fn bit_width(raw: &RawType) -> Option<u32> {
    let (_, tail) = raw.split_at_name();
    let tail = join_tail(tail);
    let (_, width) = tail.split_once(':')?;
    width.trim().parse().ok()
}

fn join_head(tokens: &[Token]) -> String {
    let mut joined = String::new();
    for token in tokens {
        let piece = match token.kind {
            TokenKind::Text => strip_struct_tag(&token.text),
            _ => token.text.trim().to_string(),
        };
        if piece.is_empty() {
            continue;
        }
        if needs_separator(&joined, &piece) {
            joined.push(' ');
        }
        joined.push_str(&piece);
    }
    joined
}

fn join_tail(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.trim()).collect()
}

/// `[3][VK_UUID_SIZE]` → `["3", "VK_UUID_SIZE"]`
fn array_dims(tail: &str) -> Vec<&str> {
    tail.split('[')
        .skip(1)
        .filter_map(|part| part.split_once(']'))
        .map(|(dim, _)| dim.trim())
        .collect()
}

/// Normalize and rewrite a type written as plain text.
pub fn rewrite(ty: &str) -> String {
    rewrite_const(&normalize(&strip_struct_tag(ty)))
}

/// Collapse whitespace runs, attach `*` to the token before it and keep a
/// single space before a `const` that follows a `*`.
///
/// ```
/// assert_eq!(vkdgen_codegen::normalize("const  char * const *"), "const char* const*");
/// assert_eq!(vkdgen_codegen::normalize("const char*const*"), "const char* const*");
/// ```
pub fn normalize(ty: &str) -> String {
    let ty = split_glued_const(ty);
    let mut out = String::with_capacity(ty.len());
    for word in ty.split_whitespace() {
        if !out.is_empty() && !word.starts_with('*') {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Rewrite the const/pointer forms of a normalized type.
pub fn rewrite_const(ty: &str) -> String {
    let Some(rest) = ty.strip_prefix("const ") else {
        return ty.to_string();
    };
    if let Some(inner) = rest.strip_suffix("* const*") {
        return format!("const({inner}*)*");
    }
    match rest.strip_suffix('*') {
        Some(inner) => format!("const({inner})*"),
        None => ty.to_string(),
    }
}

/// `*const` → `* const`, leaving identifiers such as `*constant` alone.
fn split_glued_const(ty: &str) -> String {
    let mut out = String::with_capacity(ty.len() + 4);
    let mut rest = ty;
    while let Some(at) = rest.find('*') {
        let (before, after) = rest.split_at(at + 1);
        out.push_str(before);
        let glued = after
            .strip_prefix("const")
            .is_some_and(|tail| !tail.starts_with(is_ident_char));
        if glued {
            out.push(' ');
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn strip_struct_tag(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().filter(|w| *w != "struct").collect();
    normalize(&words.join(" "))
}

fn needs_separator(prev: &str, next: &str) -> bool {
    prev.ends_with(is_ident_char) && next.starts_with(is_ident_char)
}
