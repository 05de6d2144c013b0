//! Packaged-chapter exporter.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::render::{ChapterRenderer, DEFAULT_CSS, RenderedChapter};
use crate::tree::Document;

const STYLESHEET_FILE: &str = "stylesheet.css";

/// Writes one XHTML file per division, plus the stylesheet they link to.
#[derive(Debug, Clone, Default)]
pub struct ChapterExporter {
    renderer: ChapterRenderer,
    stylesheet: Option<String>,
}

impl ChapterExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra CSS appended to the written stylesheet.
    pub fn with_stylesheet(mut self, css: impl Into<String>) -> Self {
        self.stylesheet = Some(css.into());
        self
    }

    pub fn render(&self, doc: &Document) -> Result<Vec<RenderedChapter>> {
        self.renderer.render_chapters(doc)
    }

    /// Render every chapter and write them into `dir`, creating it if needed.
    ///
    /// Returns the written paths, stylesheet last. Nothing is written when
    /// rendering fails.
    pub fn export_dir(&self, doc: &Document, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let chapters = self.render(doc)?;
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(chapters.len() + 1);
        for chapter in &chapters {
            let path = dir.join(&chapter.file);
            fs::write(&path, &chapter.content)?;
            written.push(path);
        }

        let mut css = DEFAULT_CSS.to_string();
        css.push('\n');
        if let Some(extra) = &self.stylesheet {
            css.push_str(extra.trim_end());
            css.push('\n');
        }
        let path = dir.join(STYLESHEET_FILE);
        fs::write(&path, css)?;
        written.push(path);

        tracing::debug!(dir = %dir.display(), files = written.len(), "wrote chapters");
        Ok(written)
    }
}
