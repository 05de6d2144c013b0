//! Immutable render context.
//!
//! A [`RenderContext`] is a small `Copy` snapshot of everything an element
//! needs to know about its ancestors. Renderers never mutate it: each
//! derivation returns a new value, which is handed down to the element's own
//! children only. Siblings keep seeing the value their parent passed in.

use crate::idmap::IdentifierMap;
use crate::vocab::Tag;

/// Default columns per indentation level.
pub const DEFAULT_INDENT_UNIT: usize = 4;

/// Default plain-text line width.
pub const DEFAULT_WRAP_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Tag of the immediate structural parent.
    pub ancestor: Tag,
    /// Number of enclosing inline quotations.
    pub quote_depth: usize,
    /// Number of enclosing block containers (block quotes, block notes).
    pub block_depth: usize,
    pub indent_level: usize,
    pub indent_unit: usize,
    pub wrap_width: usize,
    /// Emit strict XHTML.
    pub strict: bool,
    /// Cross-reference table for resolving links across files.
    pub xrefs: Option<&'a IdentifierMap>,
}

impl Default for RenderContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RenderContext<'a> {
    /// Root context: ancestor `TEI`, all depths zero, lax output.
    pub fn new() -> Self {
        Self {
            ancestor: Tag::Tei,
            quote_depth: 0,
            block_depth: 0,
            indent_level: 0,
            indent_unit: DEFAULT_INDENT_UNIT,
            wrap_width: DEFAULT_WRAP_WIDTH,
            strict: false,
            xrefs: None,
        }
    }

    /// Context for the children of an element with the given tag.
    pub fn with_ancestor(self, tag: Tag) -> Self {
        Self {
            ancestor: tag,
            ..self
        }
    }

    pub fn deeper_quote(self) -> Self {
        Self {
            quote_depth: self.quote_depth + 1,
            ..self
        }
    }

    /// One level deeper in block nesting, which also indents one level.
    pub fn deeper_block(self) -> Self {
        Self {
            block_depth: self.block_depth + 1,
            indent_level: self.indent_level + 1,
            ..self
        }
    }

    pub fn indented(self, by: usize) -> Self {
        Self {
            indent_level: self.indent_level + by,
            ..self
        }
    }

    pub fn with_strict(self, strict: bool) -> Self {
        Self { strict, ..self }
    }

    pub fn with_xrefs(self, xrefs: &'a IdentifierMap) -> Self {
        Self {
            xrefs: Some(xrefs),
            ..self
        }
    }

    pub fn with_wrap_width(self, wrap_width: usize) -> Self {
        Self { wrap_width, ..self }
    }

    pub fn with_indent_unit(self, indent_unit: usize) -> Self {
        Self {
            indent_unit,
            ..self
        }
    }

    /// True when the immediate parent is a running-text container, so
    /// ambiguous elements render inline.
    pub fn is_inline(&self) -> bool {
        self.ancestor.hosts_inline()
    }

    /// Columns consumed by the current indentation.
    pub fn margin_width(&self) -> usize {
        self.indent_level * self.indent_unit
    }

    /// Left margin for the current indentation, as spaces.
    pub fn margin(&self) -> String {
        " ".repeat(self.margin_width())
    }

    /// Columns left for text after the margin, at least 1.
    pub fn text_width(&self) -> usize {
        self.wrap_width.saturating_sub(self.margin_width()).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_context() {
        let ctx = RenderContext::new();
        assert_eq!(ctx.ancestor, Tag::Tei);
        assert_eq!(ctx.quote_depth, 0);
        assert_eq!(ctx.block_depth, 0);
        assert_eq!(ctx.text_width(), 72);
        assert!(ctx.margin().is_empty());
        assert!(!ctx.is_inline());
    }

    #[test]
    fn test_derivations_leave_original_untouched() {
        let ctx = RenderContext::new().with_ancestor(Tag::Body);
        let quoted = ctx.deeper_quote().deeper_quote();
        let blocked = ctx.deeper_block();

        assert_eq!(ctx.quote_depth, 0);
        assert_eq!(ctx.indent_level, 0);
        assert_eq!(quoted.quote_depth, 2);
        assert_eq!(quoted.ancestor, Tag::Body);
        assert_eq!(blocked.block_depth, 1);
        assert_eq!(blocked.indent_level, 1);
        assert_eq!(blocked.quote_depth, 0);
    }

    #[test]
    fn test_is_inline_follows_ancestor() {
        let ctx = RenderContext::new();
        assert!(ctx.with_ancestor(Tag::P).is_inline());
        assert!(ctx.with_ancestor(Tag::Cell).is_inline());
        assert!(!ctx.with_ancestor(Tag::Div).is_inline());
        assert!(!ctx.with_ancestor(Tag::Quote).is_inline());
    }

    #[test]
    fn test_margin_and_text_width() {
        let ctx = RenderContext::new().deeper_block().indented(1);
        assert_eq!(ctx.margin(), "        ");
        assert_eq!(ctx.text_width(), 64);

        let narrow = RenderContext::new().with_wrap_width(10).indented(5);
        assert_eq!(narrow.text_width(), 1);
    }

    #[test]
    fn test_indent_unit_scales_margin() {
        let ctx = RenderContext::new().with_indent_unit(2).indented(3);
        assert_eq!(ctx.margin_width(), 6);
        assert_eq!(ctx.text_width(), 66);
    }
}
