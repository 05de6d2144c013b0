//! Format-agnostic tree walker.

use crate::context::RenderContext;
use crate::error::{Error, Result};
use crate::render::{Fragment, Renderer};
use crate::tree::{Document, Element};
use crate::vocab::Section;

/// Walks a source tree and hands every element to a [`Renderer`].
///
/// The traverser holds no per-tag knowledge. It locates the document's
/// sections, seeds the root context, and dispatches elements by their local
/// name; all rendering decisions belong to the renderer.
#[derive(Debug)]
pub struct Traverser<'r, R> {
    renderer: &'r R,
}

impl<'r, R: Renderer> Traverser<'r, R> {
    pub fn new(renderer: &'r R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &'r R {
        self.renderer
    }

    /// Render a whole document: prologue, front, body, back, epilogue.
    ///
    /// Sections are searched for anywhere below the root. A document
    /// without a `body` cannot be rendered.
    pub fn traverse_document(&self, doc: &Document) -> Result<R::Output> {
        if doc.section(Section::Body).is_none() {
            return Err(Error::MissingSection(Section::Body.as_str()));
        }

        let mut parts = vec![self.renderer.document_start(doc)];
        for section in Section::ALL {
            let Some(el) = doc.section(section) else {
                continue;
            };
            let ctx = self.renderer.root_context().with_ancestor(section.tag());
            tracing::debug!(section = section.as_str(), "rendering section");

            parts.push(self.renderer.section_start(section, ctx));
            parts.extend(self.renderer.render_children(el, ctx, self));
            parts.push(self.renderer.section_end(section, ctx));
        }
        parts.push(self.renderer.document_end());

        Ok(R::Output::concat(parts))
    }

    /// Render one element under `ctx`.
    pub fn traverse_element(&self, el: &Element, ctx: RenderContext<'_>) -> R::Output {
        self.renderer.render_element(el, el.local_name(), ctx, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Element;
    use crate::vocab::Tag;

    /// Records each element with the ancestor and depth it was rendered under.
    struct Recorder;

    impl Renderer for Recorder {
        type Output = Vec<String>;

        fn document_start(&self, _doc: &Document) -> Vec<String> {
            vec!["start".into()]
        }

        fn document_end(&self) -> Vec<String> {
            vec!["end".into()]
        }

        fn render_element(
            &self,
            el: &Element,
            tag: &str,
            ctx: RenderContext<'_>,
            trav: &Traverser<'_, Self>,
        ) -> Vec<String> {
            let mut out = vec![format!(
                "{tag}<{}>q{}",
                ctx.ancestor.as_str(),
                ctx.quote_depth
            )];
            let child_ctx = match el.tag() {
                Some(Tag::Quote) => ctx.deeper_quote(),
                Some(t) => ctx.with_ancestor(t),
                None => ctx,
            };
            for child in self.render_children(el, child_ctx, trav) {
                out.extend(child);
            }
            out
        }

        fn render_text(&self, _text: &str, _ctx: RenderContext<'_>) -> Vec<String> {
            Vec::new()
        }
    }

    fn doc(body: Element) -> Document {
        Document::new(
            Element::new("TEI").with_child(
                Element::new("text")
                    .with_child(Element::new("front").with_child(Element::new("div")))
                    .with_child(body),
            ),
        )
    }

    #[test]
    fn test_sections_seeded_with_section_ancestor() {
        let body = Element::new("body").with_child(Element::new("p"));
        let out = Traverser::new(&Recorder).traverse_document(&doc(body)).unwrap();
        assert_eq!(out, ["start", "div<front>q0", "p<body>q0", "end"]);
    }

    #[test]
    fn test_siblings_share_context() {
        let body = Element::new("body").with_child(
            Element::new("p")
                .with_child(Element::new("quote").with_child(Element::new("quote")))
                .with_child(Element::new("quote")),
        );
        let out = Traverser::new(&Recorder).traverse_document(&doc(body)).unwrap();
        assert_eq!(
            out,
            [
                "start",
                "div<front>q0",
                "p<body>q0",
                "quote<p>q0",
                "quote<p>q1",
                "quote<p>q0",
                "end"
            ]
        );
    }

    #[test]
    fn test_missing_body() {
        let doc = Document::new(Element::new("TEI").with_child(Element::new("text")));
        let err = Traverser::new(&Recorder).traverse_document(&doc).unwrap_err();
        assert!(matches!(err, Error::MissingSection("body")));
    }

    #[test]
    fn test_prefixed_tags_dispatch_by_local_name() {
        let el = Element::new("tei:p");
        let out = Traverser::new(&Recorder).traverse_element(&el, RenderContext::new());
        assert_eq!(out, ["p<TEI>q0"]);
    }
}
