//! A small owned element tree built from `quick-xml` events.
//!
//! Registry declarations are mixed content (`const <type>char</type>* <name>p</name>`),
//! so text nodes are kept verbatim, whitespace included.

use miette::SourceSpan;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::error::{Result, SourceContext};

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// Location of the start tag.
    pub span: SourceSpan,
}

impl Element {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Consume the element, yielding its child elements.
    pub fn into_elements(self) -> impl Iterator<Item = Element> {
        self.children.into_iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// The first text node directly under this element, `""` if none.
    ///
    /// Leaf elements such as `<name>` and `<type>` hold exactly one.
    pub fn first_text(&self) -> &str {
        self.children
            .iter()
            .find_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .unwrap_or("")
    }

    /// Concatenated text of this element and all of its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }
}

/// Parse the document held by `ctx` and return its root element.
pub fn parse(ctx: &SourceContext) -> Result<Element> {
    let mut reader = Reader::from_str(ctx.src());
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        let start = reader.buffer_position() as usize;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(source) => return Err(ctx.xml_error(source, reader.error_position() as usize)),
        };
        let span = (start, reader.buffer_position() as usize - start);

        match event {
            Event::Start(tag) => stack.push(open(ctx, &tag, span)?),
            Event::Empty(tag) => {
                let element = open(ctx, &tag, span)?;
                close(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err(ctx.malformed_at("unexpected end tag", span));
                };
                close(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| ctx.xml_error(e, start))?;
                    parent.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    parent.children.push(Node::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = stack.last() {
        return Err(ctx.malformed_at(
            format!("element <{}> is never closed", unclosed.name),
            unclosed.span,
        ));
    }
    root.ok_or_else(|| ctx.malformed("document has no root element"))
}

fn open(ctx: &SourceContext, tag: &BytesStart, span: (usize, usize)) -> Result<Element> {
    let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| ctx.xml_error(e.into(), span.0))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ctx.xml_error(e, span.0))?;
        attrs.push((key, value.into_owned()));
    }
    Ok(Element {
        name,
        attrs,
        children: Vec::new(),
        span: span.into(),
    })
}

fn close(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => {
            root.get_or_insert(element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(src: &str) -> Result<Element> {
        parse(&SourceContext::new(src, "test.xml"))
    }

    #[test]
    fn test_mixed_content_is_preserved() {
        let root = parse_str("<member>const <type>char</type>* <name>pName</name></member>").unwrap();
        assert_eq!(root.name, "member");
        assert_eq!(root.text(), "const char* pName");
        assert_eq!(root.child("type").unwrap().first_text(), "char");
        assert_eq!(root.children.len(), 4);
    }

    #[test]
    fn test_attributes_are_unescaped() {
        let root = parse_str(r#"<enum value="&quot;VK_KHR_surface&quot;" name="N"/>"#).unwrap();
        assert_eq!(root.attr("value"), Some("\"VK_KHR_surface\""));
        assert_eq!(root.attr("name"), Some("N"));
        assert_eq!(root.attr("missing"), None);
    }

    #[test]
    fn test_comments_and_declaration_are_dropped() {
        let root = parse_str(
            "<?xml version=\"1.0\"?>\n<!-- header -->\n<registry><types/><!-- x --><enums/></registry>",
        )
        .unwrap();
        let names: Vec<_> = root.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["types", "enums"]);
    }

    #[test]
    fn test_span_points_at_start_tag() {
        let src = "<registry>\n  <types/>\n</registry>";
        let root = parse_str(src).unwrap();
        let types = root.child("types").unwrap();
        assert_eq!(&src[types.span.offset()..types.span.offset() + types.span.len()], "<types/>");
    }

    #[test]
    fn test_mismatched_end_tag_is_an_error() {
        let err = parse_str("<registry><types></enums></registry>").unwrap_err();
        assert!(matches!(*err, crate::Error::Xml { .. }));
    }

    #[test]
    fn test_unclosed_element_is_an_error() {
        let err = parse_str("<registry><types>").unwrap_err();
        assert!(err.to_string().contains("<types>") || matches!(*err, crate::Error::Xml { .. }));
    }
}
