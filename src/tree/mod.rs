//! Owned source tree for a TEI document.
//!
//! The renderers only read this tree. Element content is kept as an ordered
//! sequence of child elements interleaved with text segments, so mixed
//! content like `He said <quote>no</quote>.` survives exactly.

mod parse;

use crate::vocab::{Section, Tag};

/// A parsed TEI document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
}

/// One piece of element content.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    content: Vec<Content>,
}

impl Document {
    /// Wrap an already-built root element.
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// First element (in document order) with the given tag.
    pub fn find(&self, tag: Tag) -> Option<&Element> {
        self.root.find(tag)
    }

    /// Locate a structural section anywhere below the root.
    pub fn section(&self, section: Section) -> Option<&Element> {
        self.find(section.tag())
    }

    pub fn header(&self) -> Option<&Element> {
        self.find(Tag::TeiHeader)
    }

    /// Document title from the header, or "Untitled".
    pub fn title(&self) -> String {
        self.header()
            .and_then(|h| h.find(Tag::Title))
            .map(|t| collapse_whitespace(&t.text()))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    /// First author named in the header.
    pub fn author(&self) -> Option<String> {
        self.header()
            .and_then(|h| h.find(Tag::Author))
            .map(|a| collapse_whitespace(&a.text()))
            .filter(|a| !a.is_empty())
    }

    /// Language of the document (`xml:lang` on the root), defaulting to English.
    pub fn language(&self) -> &str {
        self.root.attr("xml:lang").unwrap_or("en")
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.content.push(Content::Element(child));
        self
    }

    /// Builder: append a text segment.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(&text.into());
        self
    }

    pub(crate) fn push_child(&mut self, child: Element) {
        self.content.push(Content::Element(child));
    }

    /// Append text, merging with a preceding text segment.
    pub(crate) fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Content::Text(last)) = self.content.last_mut() {
            last.push_str(text);
        } else {
            self.content.push(Content::Text(text.to_string()));
        }
    }

    pub(crate) fn push_attr(&mut self, name: String, value: String) {
        self.attrs.push((name, value));
    }

    /// Tag name as written, possibly with a namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// The vocabulary tag, or `None` for an unknown element.
    pub fn tag(&self) -> Option<Tag> {
        Tag::from_local(self.local_name())
    }

    pub fn is(&self, tag: Tag) -> bool {
        self.local_name() == tag.as_str()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The element's identifier (`xml:id`, or a plain `id`).
    pub fn id(&self) -> Option<&str> {
        self.attr("xml:id")
            .or_else(|| self.attr("id"))
            .filter(|id| !id.is_empty())
    }

    /// The `rend` style hint, empty when absent.
    pub fn rend(&self) -> &str {
        self.attr("rend").unwrap_or("")
    }

    pub fn content(&self) -> &[Content] {
        &self.content
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.content.iter().filter_map(|c| match c {
            Content::Element(e) => Some(e),
            Content::Text(_) => None,
        })
    }

    /// Direct text segments in document order.
    pub fn text_segments(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|c| match c {
            Content::Text(t) => Some(t.as_str()),
            Content::Element(_) => None,
        })
    }

    /// First child element with the given tag.
    pub fn child(&self, tag: Tag) -> Option<&Element> {
        self.elements().find(|e| e.is(tag))
    }

    /// All child elements with the given tag.
    pub fn children_tagged(&self, tag: Tag) -> impl Iterator<Item = &Element> {
        self.elements().filter(move |e| e.is(tag))
    }

    /// This element and every element below it, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First element at or below this one with the given tag.
    pub fn find(&self, tag: Tag) -> Option<&Element> {
        self.descendants().find(|e| e.is(tag))
    }

    /// Concatenated text of the whole subtree, markup discarded.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for content in &self.content {
            match content {
                Content::Text(t) => out.push_str(t),
                Content::Element(e) => e.collect_text(out),
            }
        }
    }

    /// True when any direct text segment has non-whitespace content.
    pub fn has_direct_text(&self) -> bool {
        self.text_segments().any(|t| !t.trim().is_empty())
    }
}

/// Pre-order iterator over an element subtree.
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        let next = self.stack.pop()?;
        let children: Vec<&Element> = next.elements().collect();
        self.stack.extend(children.into_iter().rev());
        Some(next)
    }
}

/// Strip a namespace prefix (e.g., "tei:p" -> "p").
pub fn local_name(name: &str) -> &str {
    name.rfind(':').map(|i| &name[i + 1..]).unwrap_or(name)
}

/// Collapse runs of whitespace into single spaces and trim.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div")
            .with_attr("xml:id", "ch1")
            .with_child(Element::new("head").with_text("One"))
            .with_child(
                Element::new("p")
                    .with_text("He said ")
                    .with_child(Element::new("quote").with_text("no"))
                    .with_text("."),
            )
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("tei:p"), "p");
        assert_eq!(local_name("p"), "p");
        assert_eq!(Element::new("tei:quote").tag(), Some(Tag::Quote));
    }

    #[test]
    fn test_text_concatenates_subtree() {
        assert_eq!(sample().text(), "OneHe said no.");
    }

    #[test]
    fn test_push_text_merges_segments() {
        let p = Element::new("p").with_text("A ").with_text("& B");
        assert_eq!(p.content().len(), 1);
        assert_eq!(p.content()[0], Content::Text("A & B".to_string()));
    }

    #[test]
    fn test_descendants_preorder() {
        let el = sample();
        let names: Vec<_> = el.descendants().map(|e| e.name()).collect();
        assert_eq!(names, ["div", "head", "p", "quote"]);
    }

    #[test]
    fn test_id_prefers_xml_id() {
        let el = Element::new("p").with_attr("id", "b").with_attr("xml:id", "a");
        assert_eq!(el.id(), Some("a"));
        assert_eq!(Element::new("p").with_attr("xml:id", "").id(), None);
    }

    #[test]
    fn test_document_metadata_defaults() {
        let doc = Document::new(Element::new("TEI").with_child(Element::new("text")));
        assert_eq!(doc.title(), "Untitled");
        assert_eq!(doc.author(), None);
        assert_eq!(doc.language(), "en");
    }

    #[test]
    fn test_document_title_from_header() {
        let header = Element::new("teiHeader").with_child(
            Element::new("fileDesc").with_child(
                Element::new("titleStmt")
                    .with_child(Element::new("title").with_text("  The\n  Book "))
                    .with_child(Element::new("author").with_text("A. Writer")),
            ),
        );
        let doc = Document::new(
            Element::new("TEI")
                .with_attr("xml:lang", "fr")
                .with_child(header),
        );
        assert_eq!(doc.title(), "The Book");
        assert_eq!(doc.author().as_deref(), Some("A. Writer"));
        assert_eq!(doc.language(), "fr");
    }
}
