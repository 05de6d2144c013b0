//! Single-document HTML exporter.

use std::io::Write;

use super::Exporter;
use crate::error::Result;
use crate::render::{HtmlConfig, HtmlRenderer};
use crate::traverse::Traverser;
use crate::tree::Document;

/// Exporter for HTML output.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    renderer: HtmlRenderer,
}

impl HtmlExporter {
    /// Create a new HtmlExporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an HtmlExporter with the specified configuration.
    pub fn with_config(config: HtmlConfig) -> Self {
        Self {
            renderer: HtmlRenderer::with_config(config),
        }
    }

    /// Render to a string without writing anywhere.
    pub fn render(&self, doc: &Document) -> Result<String> {
        Traverser::new(&self.renderer).traverse_document(doc)
    }
}

impl Exporter for HtmlExporter {
    fn export<W: Write>(&self, doc: &Document, writer: &mut W) -> Result<()> {
        let html = self.render(doc)?;
        writer.write_all(html.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_writes_document() {
        let doc = Document::parse("<TEI><text><body><p>Hi</p></body></text></TEI>").unwrap();
        let mut out = Vec::new();
        HtmlExporter::new().export(&doc, &mut out).unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<p>Hi</p>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_export_strict() {
        let doc = Document::parse("<TEI><text><body><p>a<lb/>b</p></body></text></TEI>").unwrap();
        let exporter = HtmlExporter::with_config(HtmlConfig {
            strict: true,
            ..HtmlConfig::default()
        });
        let html = exporter.render(&doc).unwrap();
        assert!(html.starts_with("<?xml"));
        assert!(html.contains("<p>a<br/>b</p>"));
    }

    #[test]
    fn test_export_without_body_writes_nothing() {
        let doc = Document::parse("<TEI><text><front/></text></TEI>").unwrap();
        let mut out = Vec::new();
        assert!(HtmlExporter::new().export(&doc, &mut out).is_err());
        assert!(out.is_empty());
    }
}
