//! Export module for writing rendered documents.
//!
//! Provides the `Exporter` trait and format-specific implementations.
//!
//! # Architecture
//!
//! Exporters use a builder pattern:
//! - `new()` creates an exporter with default configuration
//! - `with_config()` allows customization
//! - `export()` renders the document and writes it to any `Write` destination
//!
//! Packaged chapters are many files rather than one stream, so
//! [`ChapterExporter`] writes into a directory instead.
//!
//! # Example
//!
//! ```no_run
//! use quire::Document;
//! use quire::export::{Exporter, HtmlExporter};
//! use std::fs::File;
//!
//! let doc = Document::open("book.xml")?;
//! let mut file = File::create("book.html")?;
//! HtmlExporter::new().export(&doc, &mut file)?;
//! # Ok::<(), quire::Error>(())
//! ```

use std::io::Write;

use crate::error::Result;
use crate::tree::Document;

mod chapters;
mod html;
mod text;

pub use chapters::ChapterExporter;
pub use html::HtmlExporter;
pub use text::TextExporter;

/// Trait for exporting documents to a single-stream format.
pub trait Exporter {
    /// Render `doc` and write the result to `writer`.
    ///
    /// Structural problems (no `body`) are reported before anything is
    /// written.
    fn export<W: Write>(&self, doc: &Document, writer: &mut W) -> Result<()>;
}
