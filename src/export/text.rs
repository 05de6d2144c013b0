//! Plain-text exporter.

use std::io::Write;

use super::Exporter;
use crate::error::Result;
use crate::render::{TextConfig, TextRenderer};
use crate::traverse::Traverser;
use crate::tree::Document;

/// Exporter for wrapped plain text.
#[derive(Debug, Clone, Default)]
pub struct TextExporter {
    renderer: TextRenderer,
}

impl TextExporter {
    /// Create a new TextExporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a TextExporter with the specified configuration.
    pub fn with_config(config: TextConfig) -> Self {
        Self {
            renderer: TextRenderer::with_config(config),
        }
    }

    /// Render to a string without writing anywhere.
    ///
    /// Non-breaking spaces become ordinary spaces, trailing whitespace is
    /// trimmed from every line, and the text ends with a single newline.
    pub fn render(&self, doc: &Document) -> Result<String> {
        let lines = Traverser::new(&self.renderer).traverse_document(doc)?;
        let mut out = String::new();
        let mut blank_run = 0;
        for line in &lines {
            let line = line.replace('\u{a0}', " ");
            let line = line.trim_end();
            if line.is_empty() {
                blank_run += 1;
                continue;
            }
            if !out.is_empty() {
                for _ in 0..blank_run {
                    out.push('\n');
                }
            }
            blank_run = 0;
            out.push_str(line);
            out.push('\n');
        }
        Ok(out)
    }
}

impl Exporter for TextExporter {
    fn export<W: Write>(&self, doc: &Document, writer: &mut W) -> Result<()> {
        let text = self.render(doc)?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
