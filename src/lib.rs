//! # quire
//!
//! Context-correct rendering of TEI documents to HTML, plain text, and
//! packaged XHTML chapters.
//!
//! ## Features
//!
//! - One source tree, three output formats
//! - Quotation marks alternate with nesting depth
//! - Quotations and notes render inline or as blocks depending on where they sit
//! - Plain text wraps to the width left after the current indentation
//! - Links between chapters resolve to the file that holds their target
//!
//! ## Quick Start
//!
//! ```no_run
//! use quire::{Document, HtmlRenderer, Traverser};
//!
//! let doc = Document::open("book.xml")?;
//! let html = Traverser::new(&HtmlRenderer::new()).traverse_document(&doc)?;
//! println!("{html}");
//! # Ok::<(), quire::Error>(())
//! ```
//!
//! ## Rendering model
//!
//! A [`Traverser`] walks the tree and hands each element to a [`Renderer`],
//! together with an immutable [`RenderContext`] describing the element's
//! ancestry. Renderers derive new contexts for their own children only, so
//! state never leaks between siblings:
//!
//! ```
//! use quire::{Document, HtmlRenderer, RenderContext, Tag, Traverser};
//!
//! let doc = Document::parse("<p>He said <quote>she said <quote>no</quote></quote>.</p>")?;
//! let renderer = HtmlRenderer::new();
//! let ctx = RenderContext::new().with_ancestor(Tag::Body);
//! let html = Traverser::new(&renderer).traverse_element(doc.root(), ctx);
//! assert_eq!(html, "<p>He said \u{201c}she said \u{2018}no\u{2019}\u{201d}.</p>");
//! # Ok::<(), quire::Error>(())
//! ```

pub mod context;
pub mod error;
pub mod export;
pub mod idmap;
pub mod render;
pub mod traverse;
pub mod tree;
pub(crate) mod util;
pub mod vocab;

pub use context::RenderContext;
pub use error::{Error, Result};
pub use idmap::{Division, IdentifierMap};
pub use render::{
    ChapterRenderer, Format, Fragment, HtmlConfig, HtmlRenderer, QuoteMarks, RenderedChapter,
    Renderer, TextConfig, TextRenderer,
};
pub use traverse::Traverser;
pub use tree::{Content, Document, Element};
pub use vocab::{Section, Tag};
