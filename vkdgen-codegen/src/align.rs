//! Column alignment for declaration blocks.
//!
//! Blocks are emitted in two passes: measure the widest left-hand token,
//! then pad every line to that width.

/// Width of the widest item in chars, `0` for an empty block.
///
/// Counted the same way [`pad`] fills, so non-ASCII names stay aligned.
pub fn column_width<'a, I>(items: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    items
        .into_iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0)
}

/// Right-pad `s` with spaces to `width`.
pub fn pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_width() {
        assert_eq!(column_width(["a", "abc", "ab"]), 3);
        assert_eq!(column_width(std::iter::empty()), 0);
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("x", 3), "x  ");
        assert_eq!(pad("long", 2), "long");
    }

    #[test]
    fn test_non_ascii_columns_line_up() {
        let items = ["größe", "ab"];
        let width = column_width(items);
        assert_eq!(width, 5);
        let padded: Vec<_> = items.iter().map(|s| pad(s, width)).collect();
        assert!(padded.iter().all(|p| p.chars().count() == 5));
    }
}
