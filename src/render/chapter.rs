//! Packaged XHTML chapters.
//!
//! Each top-level division becomes a self-contained XHTML document. Element
//! rendering is the strict HTML renderer's; this renderer only adds the
//! chapter wrapper, cross-file link resolution, and the per-format
//! suppression of section and page breaks.

use crate::context::RenderContext;
use crate::error::Result;
use crate::idmap::{IdentifierMap, division_elements};
use crate::render::{Format, HtmlRenderer, Renderer};
use crate::traverse::Traverser;
use crate::tree::{Document, Element};
use crate::util::escape_xml;
use crate::vocab::{Section, Tag};

const DEFAULT_STYLESHEET_HREF: &str = "stylesheet.css";
const DEFAULT_LANGUAGE: &str = "en";

/// One rendered division.
#[derive(Debug, Clone)]
pub struct RenderedChapter {
    pub section: Section,
    pub index: usize,
    /// File name assigned by the identifier map.
    pub file: String,
    pub title: String,
    /// Complete XHTML document.
    pub content: String,
}

/// Renders divisions as standalone XHTML chapter files.
#[derive(Debug, Clone)]
pub struct ChapterRenderer {
    html: HtmlRenderer,
    stylesheet_href: String,
    language: Option<String>,
}

impl Default for ChapterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChapterRenderer {
    pub fn new() -> Self {
        Self {
            html: HtmlRenderer::strict(),
            stylesheet_href: DEFAULT_STYLESHEET_HREF.to_string(),
            language: None,
        }
    }

    /// Stylesheet linked from every chapter's head.
    pub fn with_stylesheet_href(mut self, href: impl Into<String>) -> Self {
        self.stylesheet_href = href.into();
        self
    }

    /// Override the chapter language instead of taking it from the source.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Render one division as a complete XHTML document.
    ///
    /// The chapter title is the division's heading, or `document_title` when
    /// it has none. Internal links resolve through `map`. A lone division
    /// carries no document language, so the chapter is marked with the one
    /// set by [`with_language`](Self::with_language), or English.
    pub fn render_chapter(&self, division: &Element, document_title: &str, map: &IdentifierMap) -> String {
        let language = self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
        self.chapter_document(division, document_title, language, map)
    }

    /// Render every division of `doc` in output order.
    ///
    /// The identifier map is built first, so duplicate identifiers abort
    /// before anything is rendered.
    pub fn render_chapters(&self, doc: &Document) -> Result<Vec<RenderedChapter>> {
        let map = IdentifierMap::build(doc)?;
        let document_title = doc.title();
        let language = self.language.as_deref().unwrap_or_else(|| doc.language());

        let chapters: Vec<RenderedChapter> = map
            .divisions()
            .iter()
            .zip(division_elements(doc))
            .map(|(division, el)| {
                tracing::debug!(file = %division.file, "rendering chapter");
                RenderedChapter {
                    section: division.section,
                    index: division.index,
                    file: division.file.clone(),
                    title: self.chapter_title(el, &document_title),
                    content: self.chapter_document(el, &document_title, language, &map),
                }
            })
            .collect();

        if chapters.is_empty() {
            tracing::warn!("document has no divisions to package");
        }
        Ok(chapters)
    }

    fn chapter_title(&self, division: &Element, document_title: &str) -> String {
        division
            .child(Tag::Head)
            .map(|h| self.plain_text(h))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| document_title.to_string())
    }

    fn chapter_document(
        &self,
        division: &Element,
        document_title: &str,
        language: &str,
        map: &IdentifierMap,
    ) -> String {
        let ctx = self
            .root_context()
            .with_xrefs(map)
            .with_ancestor(Tag::Body);
        let body = Traverser::new(self).traverse_element(division, ctx);
        let title = self.chapter_title(division, document_title);
        let language = escape_xml(language);

        let mut doc = String::new();
        doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n");
        doc.push_str(&format!(
            "<html xmlns=\"http://www.w3.org/1999/xhtml\" xmlns:epub=\"http://www.idpf.org/2007/ops\" xml:lang=\"{language}\" lang=\"{language}\">\n"
        ));
        doc.push_str("<head>\n<meta charset=\"utf-8\"/>\n");
        doc.push_str(&format!("<title>{}</title>\n", escape_xml(&title)));
        doc.push_str(&format!(
            "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\"/>\n",
            escape_xml(&self.stylesheet_href)
        ));
        doc.push_str("</head>\n<body>\n");
        doc.push_str(&body);
        doc.push_str("\n</body>\n</html>\n");
        doc
    }
}

impl Renderer for ChapterRenderer {
    type Output = String;

    fn document_start(&self, doc: &Document) -> String {
        self.html.document_start(doc)
    }

    fn document_end(&self) -> String {
        self.html.document_end()
    }

    fn root_context(&self) -> RenderContext<'static> {
        self.html.root_context()
    }

    fn render_element(
        &self,
        el: &Element,
        tag: &str,
        ctx: RenderContext<'_>,
        trav: &Traverser<'_, Self>,
    ) -> String {
        if self.suppressed_in(el, Format::Epub) {
            tracing::debug!(tag, "suppressed in packaged output");
            return String::new();
        }
        self.html.dispatch(el, tag, ctx, trav)
    }

    fn render_text(&self, text: &str, ctx: RenderContext<'_>) -> String {
        self.html.render_text(text, ctx)
    }
}
