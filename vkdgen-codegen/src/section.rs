//! Multi-section output buffer.
//!
//! Registry entities arrive in traversal order, but the generated module
//! groups declarations by kind. [`SectionBuffer`] keeps one line list per
//! [`Section`]; lines can be appended to any section at any time and are
//! only put in their final order when the buffer is written out.

use std::{
    io::{self, Write},
    ops::{Deref, DerefMut},
};

use crate::Indent;

/// Output sections, in the order they appear in the generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Module declaration and handle helper templates.
    GlobalDef,
    BaseType,
    Const,
    Handle,
    FuncPtr,
    Enum,
    Struct,
    Cmd,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::GlobalDef,
        Section::BaseType,
        Section::Const,
        Section::Handle,
        Section::FuncPtr,
        Section::Enum,
        Section::Struct,
        Section::Cmd,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default)]
struct SectionLines {
    lines: Vec<String>,
    indent_level: usize,
}

/// Line buffer with an independent indentation level per section.
///
/// # Example
///
/// ```
/// use vkdgen_codegen::{Section, SectionBuffer};
///
/// let mut buf = SectionBuffer::default();
/// buf.set_section(Section::Struct);
/// buf.line("struct VkExtent2D {");
/// {
///     let mut body = buf.indented();
///     body.line("uint width;");
///     body.line("uint height;");
/// }
/// buf.line("}");
/// buf.set_section(Section::GlobalDef).line("module vulkan;");
///
/// assert_eq!(
///     buf.render(),
///     "module vulkan;\nstruct VkExtent2D {\n    uint width;\n    uint height;\n}\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SectionBuffer {
    indent: Indent,
    sections: [SectionLines; 8],
    current: Section,
}

impl SectionBuffer {
    pub fn new(indent: Indent) -> Self {
        Self {
            indent,
            sections: Default::default(),
            current: Section::GlobalDef,
        }
    }

    /// The section lines are currently appended to.
    pub fn section(&self) -> Section {
        self.current
    }

    pub fn set_section(&mut self, section: Section) -> &mut Self {
        self.current = section;
        self
    }

    /// Append a line to the active section at its indentation.
    pub fn line(&mut self, s: impl AsRef<str>) -> &mut Self {
        let unit = self.indent.unit();
        let section = &mut self.sections[self.current.index()];
        let mut line = unit.repeat(section.indent_level);
        line.push_str(s.as_ref());
        section.lines.push(line);
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.sections[self.current.index()].lines.push(String::new());
        self
    }

    /// Increase the indentation of the active section.
    ///
    /// Prefer [`indented`](Self::indented) unless the matching dedent happens
    /// in a different call, as for blocks opened before traversal and closed
    /// in the finishing pass.
    pub fn push_indent(&mut self) -> &mut Self {
        self.sections[self.current.index()].indent_level += 1;
        self
    }

    /// Decrease the indentation of the active section.
    pub fn push_dedent(&mut self) -> &mut Self {
        self.dedent_section(self.current);
        self
    }

    /// Indent the active section until the returned guard is dropped.
    ///
    /// The guard dedents the section it was created for, even if the active
    /// section changed in between.
    pub fn indented(&mut self) -> IndentGuard<'_> {
        let section = self.current;
        self.push_indent();
        IndentGuard {
            buffer: self,
            section,
        }
    }

    /// Indentation level of the active section.
    pub fn current_indent(&self) -> usize {
        self.sections[self.current.index()].indent_level
    }

    /// Lines accumulated so far in a section, indentation included.
    pub fn lines(&self, section: Section) -> &[String] {
        &self.sections[section.index()].lines
    }

    /// Write every section in canonical order, stripping trailing whitespace.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        for section in Section::ALL {
            for line in self.lines(section) {
                writeln!(out, "{}", line.trim_end())?;
            }
        }
        out.flush()
    }

    /// Render every section into a single string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in Section::ALL {
            for line in self.lines(section) {
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }
        out
    }

    fn dedent_section(&mut self, section: Section) {
        let level = &mut self.sections[section.index()].indent_level;
        debug_assert!(*level > 0, "negative indent in {section:?}");
        *level = level.saturating_sub(1);
    }
}

impl Default for SectionBuffer {
    fn default() -> Self {
        Self::new(Indent::default())
    }
}

/// Scoped indentation returned by [`SectionBuffer::indented`].
pub struct IndentGuard<'a> {
    buffer: &'a mut SectionBuffer,
    section: Section,
}

impl Deref for IndentGuard<'_> {
    type Target = SectionBuffer;

    fn deref(&self) -> &SectionBuffer {
        self.buffer
    }
}

impl DerefMut for IndentGuard<'_> {
    fn deref_mut(&mut self) -> &mut SectionBuffer {
        self.buffer
    }
}

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        self.buffer.dedent_section(self.section);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_flush_in_canonical_order() {
        let mut buf = SectionBuffer::default();
        buf.set_section(Section::Cmd).line("cmd");
        buf.set_section(Section::Const).line("const");
        buf.set_section(Section::GlobalDef).line("global");
        buf.set_section(Section::Struct).line("struct");
        assert_eq!(buf.render(), "global\nconst\nstruct\ncmd\n");
    }

    #[test]
    fn test_indentation_is_per_section() {
        let mut buf = SectionBuffer::default();
        buf.set_section(Section::FuncPtr).push_indent();
        buf.set_section(Section::Enum).line("enum");
        buf.set_section(Section::FuncPtr).line("alias");
        assert_eq!(buf.lines(Section::Enum), ["enum"]);
        assert_eq!(buf.lines(Section::FuncPtr), ["    alias"]);
    }

    #[test]
    fn test_guard_restores_original_section() {
        let mut buf = SectionBuffer::default();
        buf.set_section(Section::Struct);
        {
            let mut inner = buf.indented();
            inner.line("a;");
            inner.set_section(Section::Enum);
            inner.line("b");
        }
        assert_eq!(buf.current_indent(), 0);
        buf.set_section(Section::Struct);
        assert_eq!(buf.current_indent(), 0);
        buf.line("c");
        assert_eq!(buf.lines(Section::Struct), ["    a;", "c"]);
    }

    #[test]
    fn test_nested_guards() {
        let mut buf = SectionBuffer::default();
        {
            let mut outer = buf.indented();
            {
                let mut inner = outer.indented();
                inner.line("deep");
            }
            outer.line("shallow");
        }
        buf.line("top");
        assert_eq!(buf.render(), "        deep\n    shallow\ntop\n");
    }

    #[test]
    fn test_blank_and_trailing_whitespace() {
        let mut buf = SectionBuffer::default();
        buf.line("enum X = ");
        {
            let mut inner = buf.indented();
            inner.line("");
        }
        buf.blank();
        assert_eq!(buf.render(), "enum X =\n\n\n");
    }

    #[test]
    fn test_tab_indent() {
        let mut buf = SectionBuffer::new(Indent::Tab);
        buf.push_indent().line("x");
        assert_eq!(buf.render(), "\tx\n");
    }

    #[test]
    fn test_write_to_matches_render() {
        let mut buf = SectionBuffer::default();
        buf.set_section(Section::Handle).line("h");
        buf.set_section(Section::BaseType).line("b");
        let mut out = Vec::new();
        buf.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), buf.render());
    }
}
