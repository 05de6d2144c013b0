//! The renderer contract and the concrete renderers.
//!
//! A [`Renderer`] decides what each element becomes; the
//! [`Traverser`](crate::traverse::Traverser) decides nothing and only walks.
//! Renderers receive the traverser so they can recurse into their own
//! children with whatever derived context the element calls for.

use std::fmt;

use crate::context::RenderContext;
use crate::traverse::Traverser;
use crate::tree::{Content, Document, Element, collapse_whitespace};
use crate::vocab::{Section, Tag};

mod chapter;
mod html;
mod text;

pub use chapter::{ChapterRenderer, RenderedChapter};
pub use html::{HtmlConfig, HtmlRenderer};
pub(crate) use html::DEFAULT_CSS;
pub use text::{TextConfig, TextRenderer, wrap};

/// Output format, used to scope per-format behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Single styled HTML document.
    Html,
    /// Wrapped plain text.
    Text,
    /// Packaged XHTML chapters.
    Epub,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Text => "txt",
            Format::Epub => "xhtml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Html => "html",
            Format::Text => "text",
            Format::Epub => "epub",
        };
        f.write_str(name)
    }
}

/// A rendered piece of output that can be combined with its siblings.
pub trait Fragment: Sized {
    fn empty() -> Self;

    fn is_empty(&self) -> bool;

    /// Combine parts in order. Empty parts contribute nothing.
    fn concat(parts: Vec<Self>) -> Self;
}

impl Fragment for String {
    fn empty() -> Self {
        String::new()
    }

    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }

    fn concat(parts: Vec<Self>) -> Self {
        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Fragment for Vec<String> {
    fn empty() -> Self {
        Vec::new()
    }

    fn is_empty(&self) -> bool {
        <[String]>::is_empty(self)
    }

    fn concat(parts: Vec<Self>) -> Self {
        parts.into_iter().flatten().collect()
    }
}

/// An opening and closing quotation mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteMarks {
    pub open: &'static str,
    pub close: &'static str,
}

impl QuoteMarks {
    pub const DOUBLE: QuoteMarks = QuoteMarks {
        open: "\u{201c}",
        close: "\u{201d}",
    };
    pub const SINGLE: QuoteMarks = QuoteMarks {
        open: "\u{2018}",
        close: "\u{2019}",
    };

    /// Marks for a quotation nested `depth` levels deep: double at even
    /// depths, single at odd depths.
    pub fn for_depth(depth: usize) -> QuoteMarks {
        if depth % 2 == 0 {
            QuoteMarks::DOUBLE
        } else {
            QuoteMarks::SINGLE
        }
    }

    pub fn wrap(self, inner: &str) -> String {
        format!("{}{inner}{}", self.open, self.close)
    }
}

/// Format-specific rendering of the source vocabulary.
pub trait Renderer: Sized {
    type Output: Fragment;

    /// Output emitted before any section.
    fn document_start(&self, doc: &Document) -> Self::Output;

    /// Output emitted after the last section.
    fn document_end(&self) -> Self::Output;

    fn section_start(&self, _section: Section, _ctx: RenderContext<'_>) -> Self::Output {
        Self::Output::empty()
    }

    fn section_end(&self, _section: Section, _ctx: RenderContext<'_>) -> Self::Output {
        Self::Output::empty()
    }

    /// Context the traversal starts from.
    fn root_context(&self) -> RenderContext<'static> {
        RenderContext::new()
    }

    /// Render one element. `tag` is the element's local name.
    ///
    /// Must accept any tag: elements outside the vocabulary render as their
    /// children.
    fn render_element(
        &self,
        el: &Element,
        tag: &str,
        ctx: RenderContext<'_>,
        trav: &Traverser<'_, Self>,
    ) -> Self::Output;

    /// Render a text segment found between elements.
    fn render_text(&self, text: &str, ctx: RenderContext<'_>) -> Self::Output;

    fn quote_marks(&self, depth: usize) -> QuoteMarks {
        QuoteMarks::for_depth(depth)
    }

    /// All text below `el` with markup dropped and whitespace collapsed.
    fn plain_text(&self, el: &Element) -> String {
        collapse_whitespace(&el.text())
    }

    /// Render the content of `el` in document order with `ctx` unchanged.
    ///
    /// Callers derive the context for their children before calling this;
    /// every child sees the same value. Empty fragments are dropped.
    fn render_children(
        &self,
        el: &Element,
        ctx: RenderContext<'_>,
        trav: &Traverser<'_, Self>,
    ) -> Vec<Self::Output> {
        el.content()
            .iter()
            .map(|content| match content {
                Content::Element(child) => trav.traverse_element(child, ctx),
                Content::Text(text) => self.render_text(text, ctx),
            })
            .filter(|out| !out.is_empty())
            .collect()
    }

    /// Whether `el` opts out of `format` through its `rend-epub` attribute.
    ///
    /// Only section breaks and page breaks honor the attribute, and only
    /// packaged output is affected.
    fn suppressed_in(&self, el: &Element, format: Format) -> bool {
        if format != Format::Epub || !(el.is(Tag::Milestone) || el.is(Tag::Pb)) {
            return false;
        }
        matches!(
            el.attr("rend-epub").map(str::trim),
            Some("suppress") | Some("none")
        )
    }
}

/// True when a quotation or note holds block elements and no bare text.
pub(crate) fn has_block_content(el: &Element) -> bool {
    !el.has_direct_text() && el.elements().any(is_block_child)
}

/// True when `el` takes its own block. An unknown element counts as a block
/// when it wraps block content.
pub(crate) fn is_block_child(el: &Element) -> bool {
    match el.tag() {
        Some(tag) => tag.is_block(),
        None => has_block_content(el),
    }
}

/// Classification of a `ref` target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// Identifier inside the document (without the leading `#`).
    Internal(&'a str),
    /// Absolute URI, passed through as written.
    External(&'a str),
}

impl<'a> Target<'a> {
    /// Classify a `target` attribute. Empty targets yield `None`.
    pub fn parse(raw: &'a str) -> Option<Target<'a>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some(id) = raw.strip_prefix('#') {
            return (!id.is_empty()).then_some(Target::Internal(id));
        }
        if raw.starts_with("//") || has_scheme(raw) {
            Some(Target::External(raw))
        } else {
            Some(Target::Internal(raw))
        }
    }

    /// The link destination for this target under `ctx`.
    ///
    /// Internal targets resolve to `file#id` through the context's
    /// cross-reference table, or to a same-document `#id` otherwise.
    pub fn href(self, ctx: &RenderContext<'_>) -> String {
        match self {
            Target::External(uri) => uri.to_string(),
            Target::Internal(id) => match ctx.xrefs {
                Some(map) => map.resolve(id).unwrap_or_else(|| {
                    tracing::warn!(id, "unresolved cross-reference");
                    format!("#{id}")
                }),
                None => format!("#{id}"),
            },
        }
    }
}

/// `scheme:` prefix per RFC 3986 (letter, then letters, digits, `+-.`).
fn has_scheme(s: &str) -> bool {
    let Some(colon) = s.find(':') else {
        return false;
    };
    let scheme = &s[..colon];
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
