//! Plain-text rendering.
//!
//! Output is a list of lines. Inline elements produce a single unwrapped
//! string which their enclosing block (paragraph, verse line, list item)
//! wraps to the width left after the current margin. Line breaks inside a
//! paragraph travel as U+2028 until the paragraph is wrapped.

use unicode_width::UnicodeWidthStr;

use crate::context::{DEFAULT_INDENT_UNIT, DEFAULT_WRAP_WIDTH, RenderContext};
use crate::render::{Renderer, has_block_content, is_block_child};
use crate::traverse::Traverser;
use crate::tree::{Content, Document, Element};
use crate::vocab::{Emphasis, Rend, Tag};

const LINE_BREAK: char = '\u{2028}';
const NBSP: char = '\u{a0}';
const STARS: &str = "*       *       *       *       *";

/// Configuration for plain-text output.
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Maximum printed line width, margin included.
    pub line_width: usize,
    /// Columns per indentation level.
    pub indent_unit: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_WRAP_WIDTH,
            indent_unit: DEFAULT_INDENT_UNIT,
        }
    }
}

/// Renders the source vocabulary to wrapped, indented plain text.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    config: TextConfig,
}

type Lines = Vec<String>;

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Inline content of `el` as one unwrapped string.
    fn inline(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> String {
        let mut out = String::new();
        for content in el.content() {
            self.push_inline(&mut out, content, ctx, trav);
        }
        out
    }

    /// Append one child to running text. A block child has already been
    /// laid out in lines; its words become a segment of their own, set off
    /// by line breaks.
    fn push_inline(&self, out: &mut String, content: &Content, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) {
        match content {
            Content::Text(t) => out.extend(self.render_text(t, ctx)),
            Content::Element(child) if is_block_child(child) => {
                let lines = trav.traverse_element(child, ctx);
                let text = lines.iter().flat_map(|l| words(l)).collect::<Vec<_>>().join(" ");
                if text.is_empty() {
                    return;
                }
                if !out.trim().is_empty() && !out.ends_with(LINE_BREAK) {
                    out.push(LINE_BREAK);
                }
                out.push_str(&text);
                out.push(LINE_BREAK);
            }
            Content::Element(child) => out.extend(trav.traverse_element(child, ctx)),
        }
    }

    /// Inline content with runs of whitespace collapsed.
    fn line_text(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> String {
        words(&self.inline(el, ctx, trav)).collect::<Vec<_>>().join(" ")
    }

    fn head(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> Lines {
        let text = self.line_text(el, ctx.with_ancestor(Tag::Head), trav);
        if text.is_empty() {
            return Vec::new();
        }
        let margin = ctx.margin();
        match ctx.ancestor {
            Tag::Body => vec![
                String::new(),
                String::new(),
                String::new(),
                text.to_uppercase(),
                String::new(),
                String::new(),
            ],
            Tag::Front => {
                let rule = "=".repeat(text.width());
                vec![text, rule, String::new()]
            }
            Tag::Back => vec![text.to_uppercase(), String::new()],
            Tag::Div => vec![
                format!("{margin}{}", text.to_uppercase()),
                String::new(),
                String::new(),
            ],
            _ => vec![format!("{margin}{text}"), String::new()],
        }
    }

    fn paragraph_element(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> Lines {
        let text = self.inline(el, ctx.with_ancestor(Tag::P), trav);
        if Rend::parse(el.rend()).center {
            let mut lines: Lines = text
                .split(LINE_BREAK)
                .flat_map(|seg| wrap(seg, ctx.wrap_width, "", ""))
                .map(|line| center(&line, ctx.wrap_width))
                .collect();
            if !lines.is_empty() {
                lines.push(String::new());
            }
            return lines;
        }
        paragraph(&text, &ctx)
    }

    fn quote(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> Lines {
        if ctx.is_inline() {
            let marks = self.quote_marks(ctx.quote_depth);
            return vec![marks.wrap(&self.inline(el, ctx.deeper_quote(), trav))];
        }

        let inner = ctx.deeper_block();
        if has_block_content(el) {
            let mut lines = concat(self.render_children(el, inner.with_ancestor(Tag::Quote), trav));
            if lines.last().is_some_and(|l| !l.is_empty()) {
                lines.push(String::new());
            }
            lines
        } else {
            paragraph(&self.inline(el, inner.with_ancestor(Tag::P), trav), &inner)
        }
    }

    fn note(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> Lines {
        if ctx.is_inline() {
            let text = self.line_text(el, ctx.with_ancestor(Tag::Note), trav);
            return vec![format!(" [{text}]")];
        }

        let inner = ctx.deeper_block();
        if !has_block_content(el) {
            let text = self.inline(el, inner.with_ancestor(Tag::P), trav);
            return paragraph(&format!("[{}]", text.trim()), &inner);
        }

        let mut lines = concat(self.render_children(el, inner.with_ancestor(Tag::Note), trav));
        let margin = inner.margin();
        if let Some(first) = lines.iter_mut().find(|l| !l.trim().is_empty()) {
            let body = first.trim_start().to_string();
            *first = format!("{margin}[{body}");
        }
        if let Some(last) = lines.iter_mut().rev().find(|l| !l.trim().is_empty()) {
            last.push(']');
        }
        lines
    }

    fn verse(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> Lines {
        let centered = Rend::parse(el.rend()).center;
        let mut lines = Vec::new();

        if let Some(head) = el.child(Tag::Head) {
            let title = self.line_text(head, ctx.with_ancestor(Tag::Head), trav);
            if !title.is_empty() {
                if centered {
                    lines.push(center(&title, ctx.wrap_width));
                } else {
                    lines.push(format!("{}{}", verse_prefix(&ctx), title.to_uppercase()));
                }
                lines.push(String::new());
            }
        }

        lines.extend(self.stanza(el, centered, ctx, trav));
        if lines.last().is_some_and(|l| !l.is_empty()) {
            lines.push(String::new());
        }
        lines
    }

    /// Lines of a line group. Nested groups are stanzas, each followed by a
    /// blank line.
    fn stanza(&self, el: &Element, centered: bool, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> Lines {
        let child_ctx = ctx.with_ancestor(Tag::Lg);
        let prefix = verse_prefix(&ctx);
        let mut out = Vec::new();
        let mut run: Vec<VerseLine> = Vec::new();

        let flush = |run: &mut Vec<VerseLine>, out: &mut Lines| {
            if centered {
                out.extend(center_block(run.iter().map(VerseLine::raw), ctx.wrap_width));
            } else {
                out.extend(run.iter().map(|l| l.placed(&prefix, ctx.wrap_width)));
            }
            run.clear();
        };

        for child in el.elements() {
            match child.tag() {
                Some(Tag::Head) => {}
                Some(Tag::L) => run.extend(self.verse_line(child, child_ctx, trav)),
                Some(Tag::Lg) => {
                    flush(&mut run, &mut out);
                    let nested = centered || Rend::parse(child.rend()).center;
                    out.extend(self.stanza(child, nested, ctx, trav));
                    if out.last().is_some_and(|l| !l.is_empty()) {
                        out.push(String::new());
                    }
                }
                _ => {
                    flush(&mut run, &mut out);
                    out.extend(trav.traverse_element(child, child_ctx));
                }
            }
        }
        flush(&mut run, &mut out);
        out
    }

    /// One `l` element; an embedded line break yields several lines.
    fn verse_line(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> Vec<VerseLine> {
        let rend = Rend::parse(el.rend());
        let text = self.inline(el, ctx.with_ancestor(Tag::L), trav);
        text.split(LINE_BREAK)
            .map(|seg| words(seg).collect::<Vec<_>>().join(" "))
            .filter(|seg| !seg.is_empty())
            .map(|text| VerseLine {
                step: usize::from(rend.indent) * 2,
                center: rend.center,
                text,
            })
            .collect()
    }

    fn list(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> Lines {
        let margin = ctx.margin();
        let ordered = matches!(el.attr("type"), Some("ordered" | "numbered"));
        let labelled = el.child(Tag::Label).is_some();
        let mut out = Vec::new();
        let mut number = 0;

        for child in el.elements() {
            match child.tag() {
                Some(Tag::Head) | Some(Tag::Label) => {
                    let text = self.line_text(child, ctx.with_ancestor(Tag::Label), trav);
                    out.push(format!("{margin}{text}"));
                }
                Some(Tag::Item) => {
                    number += 1;
                    let bullet = if labelled {
                        " ".repeat(ctx.indent_unit)
                    } else if ordered {
                        format!("  {number}. ")
                    } else {
                        "  \u{2022} ".to_string()
                    };
                    let hanging = " ".repeat(bullet.width());
                    out.extend(self.item(
                        child,
                        ctx,
                        trav,
                        &format!("{margin}{bullet}"),
                        &format!("{margin}{hanging}"),
                    ));
                }
                _ => out.extend(trav.traverse_element(child, ctx.with_ancestor(Tag::List))),
            }
        }
        if !out.is_empty() {
            out.push(String::new());
        }
        out
    }

    /// A list item: wrapped running text, then any nested lists one level in.
    fn item(
        &self,
        el: &Element,
        ctx: RenderContext<'_>,
        trav: &Traverser<'_, Self>,
        first: &str,
        rest: &str,
    ) -> Lines {
        let item_ctx = ctx.with_ancestor(Tag::Item);
        let mut text = String::new();
        let mut nested = Vec::new();
        for content in el.content() {
            match content {
                Content::Element(child) if child.is(Tag::List) => nested.push(child),
                _ => self.push_inline(&mut text, content, item_ctx, trav),
            }
        }

        let mut lines = Vec::new();
        for segment in text.split(LINE_BREAK) {
            let lead = if lines.is_empty() { first } else { rest };
            lines.extend(wrap(segment, ctx.wrap_width, lead, rest));
        }
        for list in nested {
            let mut sub = self.list(list, ctx.indented(1), trav);
            if sub.last().is_some_and(String::is_empty) {
                sub.pop();
            }
            lines.extend(sub);
        }
        lines
    }

    fn table(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> Lines {
        let margin = ctx.margin();
        let mut out = Vec::new();
        let mut rows: Vec<Vec<String>> = Vec::new();

        for child in el.elements() {
            match child.tag() {
                Some(Tag::Head) => {
                    out.push(format!("{margin}{}", self.line_text(child, ctx.with_ancestor(Tag::Head), trav)));
                }
                Some(Tag::Row) => rows.push(
                    child
                        .children_tagged(Tag::Cell)
                        .map(|cell| self.line_text(cell, ctx.with_ancestor(Tag::Cell), trav))
                        .collect(),
                ),
                _ => {}
            }
        }

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let widths: Vec<usize> = (0..columns)
            .map(|i| {
                rows.iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.width())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for row in &rows {
            let mut line = margin.clone();
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    line.push_str("  ");
                }
                line.push_str(cell);
                line.push_str(&" ".repeat(widths[i].saturating_sub(cell.width())));
            }
            out.push(line.trim_end().to_string());
        }
        if !out.is_empty() {
            out.push(String::new());
        }
        out
    }

    fn figure(&self, el: &Element, ctx: RenderContext<'_>) -> Lines {
        let caption = el
            .child(Tag::Head)
            .map(|h| self.plain_text(h))
            .filter(|c| !c.is_empty());
        let line = match caption {
            Some(caption) => format!("{}[Illustration: {caption}]", ctx.margin()),
            None => format!("{}[Illustration]", ctx.margin()),
        };
        vec![line, String::new()]
    }

    fn hi(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> Lines {
        let inner = self.inline(el, ctx.with_ancestor(Tag::Hi), trav);
        let rend = Rend::parse(el.rend());
        let out = match rend.emphasis {
            Some(Emphasis::Bold) => format!("*{inner}*"),
            Some(Emphasis::SmallCaps) => inner.to_uppercase(),
            Some(Emphasis::Monospace) => format!("`{inner}`"),
            Some(Emphasis::Italic | Emphasis::Underline) => format!("_{inner}_"),
            None if rend.is_empty() => format!("_{inner}_"),
            None => inner,
        };
        vec![out]
    }

    fn signed(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, Self>) -> Lines {
        let text = self.line_text(el, ctx.with_ancestor(Tag::Signed), trav);
        let pad = ctx.wrap_width.saturating_sub(text.width());
        vec![format!("{}{text}", " ".repeat(pad)), String::new()]
    }
}

impl Renderer for TextRenderer {
    type Output = Lines;

    fn document_start(&self, doc: &Document) -> Lines {
        let width = self.config.line_width;
        let mut lines = vec![center(&doc.title(), width)];
        if let Some(author) = doc.author() {
            lines.push(String::new());
            lines.push(center(&format!("by {author}"), width));
        }
        lines.push(String::new());
        lines.push(String::new());
        lines
    }

    fn document_end(&self) -> Lines {
        Vec::new()
    }

    fn root_context(&self) -> RenderContext<'static> {
        RenderContext::new()
            .with_wrap_width(self.config.line_width)
            .with_indent_unit(self.config.indent_unit)
    }

    fn render_element(
        &self,
        el: &Element,
        tag: &str,
        ctx: RenderContext<'_>,
        trav: &Traverser<'_, Self>,
    ) -> Lines {
        let Some(known) = Tag::from_local(tag) else {
            tracing::debug!(tag, "rendering unknown element through its children");
            return concat(self.render_children(el, ctx, trav));
        };

        match known {
            Tag::TeiHeader | Tag::Pb | Tag::FigDesc => Vec::new(),
            Tag::Tei | Tag::Text | Tag::Front | Tag::Body | Tag::Back | Tag::Div => {
                concat(self.render_children(el, ctx.with_ancestor(known), trav))
            }
            Tag::Head => self.head(el, ctx, trav),
            Tag::P | Tag::Row | Tag::Cell => self.paragraph_element(el, ctx, trav),
            Tag::Quote => self.quote(el, ctx, trav),
            Tag::Note => self.note(el, ctx, trav),
            Tag::Lg => self.verse(el, ctx, trav),
            Tag::L => {
                let prefix = verse_prefix(&ctx);
                self.verse_line(el, ctx, trav)
                    .iter()
                    .map(|l| l.placed(&prefix, ctx.wrap_width))
                    .collect()
            }
            Tag::List => self.list(el, ctx, trav),
            Tag::Item => {
                let bullet = format!("{}  \u{2022} ", ctx.margin());
                let hanging = " ".repeat(bullet.width());
                self.item(el, ctx, trav, &bullet, &hanging)
            }
            Tag::Label => vec![format!(
                "{}{}",
                ctx.margin(),
                self.line_text(el, ctx.with_ancestor(Tag::Label), trav)
            )],
            Tag::Table => self.table(el, ctx, trav),
            Tag::Figure | Tag::Graphic => self.figure(el, ctx),
            Tag::Milestone => {
                if el.rend().trim() == "stars" {
                    vec![center(STARS, ctx.wrap_width), String::new()]
                } else {
                    vec![String::new(), String::new()]
                }
            }
            Tag::Signed => self.signed(el, ctx, trav),
            Tag::Hi => self.hi(el, ctx, trav),
            Tag::Emph | Tag::Title | Tag::Foreign => {
                vec![format!("_{}_", self.inline(el, ctx.with_ancestor(known), trav))]
            }
            Tag::Ref => vec![self.inline(el, ctx.with_ancestor(Tag::Ref), trav)],
            Tag::Lb => vec![LINE_BREAK.to_string()],
            Tag::FileDesc
            | Tag::TitleStmt
            | Tag::PublicationStmt
            | Tag::SourceDesc
            | Tag::Author => concat(self.render_children(el, ctx, trav)),
        }
    }

    fn render_text(&self, text: &str, ctx: RenderContext<'_>) -> Lines {
        if ctx.is_inline() {
            return vec![text.to_string()];
        }
        if text.trim().is_empty() {
            return Vec::new();
        }
        paragraph(text, &ctx)
    }
}

/// A verse line before placement.
struct VerseLine {
    /// Extra columns from the line's indentation step.
    step: usize,
    center: bool,
    text: String,
}

impl VerseLine {
    fn raw(&self) -> String {
        format!("{}{}", " ".repeat(self.step), self.text)
    }

    fn placed(&self, prefix: &str, width: usize) -> String {
        if self.center {
            center(&self.text, width)
        } else {
            format!("{prefix}{}", self.raw())
        }
    }
}

/// Verse sits one indentation unit inside the current margin.
fn verse_prefix(ctx: &RenderContext<'_>) -> String {
    " ".repeat(ctx.margin_width() + ctx.indent_unit)
}

/// Wrapped paragraph at the context's margin, followed by a blank line.
fn paragraph(text: &str, ctx: &RenderContext<'_>) -> Lines {
    let margin = ctx.margin();
    let mut lines: Lines = text
        .split(LINE_BREAK)
        .flat_map(|seg| wrap(seg, ctx.wrap_width, &margin, &margin))
        .collect();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Greedy word wrap.
///
/// `width` is the full printed width; each line's prefix counts against it.
/// Widths are measured in terminal columns. Words are never broken, so a
/// word wider than the available space gets a line of its own. Non-breaking
/// spaces do not separate words.
pub fn wrap(text: &str, width: usize, first_prefix: &str, rest_prefix: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;
    let mut prefix = first_prefix;

    for word in words(text) {
        let word_width = word.width();
        let capacity = width.saturating_sub(prefix.width()).max(1);
        if !line.is_empty() && line_width + 1 + word_width > capacity {
            lines.push(format!("{prefix}{line}"));
            line.clear();
            line_width = 0;
            prefix = rest_prefix;
        }
        if !line.is_empty() {
            line.push(' ');
            line_width += 1;
        }
        line.push_str(word);
        line_width += word_width;
    }

    if !line.is_empty() {
        lines.push(format!("{prefix}{line}"));
    }
    lines
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() && c != NBSP)
        .filter(|w| !w.is_empty())
}

fn center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width()) / 2;
    format!("{}{text}", " ".repeat(pad))
}

/// Center lines as one block, keeping their relative indentation.
fn center_block(lines: impl Iterator<Item = String>, width: usize) -> Lines {
    let lines: Lines = lines.collect();
    let widest = lines.iter().map(|l| l.width()).max().unwrap_or(0);
    let pad = " ".repeat(width.saturating_sub(widest) / 2);
    lines.into_iter().map(|l| format!("{pad}{l}")).collect()
}

fn concat(parts: Vec<Lines>) -> Lines {
    parts.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_with(src: &str, ctx: RenderContext<'_>) -> Lines {
        let doc = Document::parse(src).unwrap();
        let renderer = TextRenderer::new();
        Traverser::new(&renderer).traverse_element(doc.root(), ctx)
    }

    fn render(src: &str) -> Lines {
        render_with(src, RenderContext::new().with_ancestor(Tag::Body))
    }

    #[test]
    fn test_wrap_greedy() {
        let lines = wrap("the quick brown fox jumps", 10, "", "");
        assert_eq!(lines, ["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_prefix_counts_against_width() {
        let lines = wrap("aaa bbb ccc", 9, "  ", "  ");
        assert_eq!(lines, ["  aaa bbb", "  ccc"]);
    }

    #[test]
    fn test_wrap_never_breaks_words() {
        let lines = wrap("a supercalifragilistic b", 8, "", "");
        assert_eq!(lines, ["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_wrap_keeps_nbsp_words_together() {
        let lines = wrap("Mr.\u{a0}Smith went", 9, "", "");
        assert_eq!(lines, ["Mr.\u{a0}Smith", "went"]);
    }

    #[test]
    fn test_wrap_measures_columns() {
        // Each ideograph is two columns wide.
        let lines = wrap("漢字 漢字", 5, "", "");
        assert_eq!(lines, ["漢字", "漢字"]);
    }

    #[test]
    fn test_paragraph_with_quotes() {
        let lines = render("<p>He said <quote>no <quote>never</quote></quote>.</p>");
        assert_eq!(lines, ["He said \u{201c}no \u{2018}never\u{2019}\u{201d}.", ""]);
    }

    #[test]
    fn test_line_break_splits_paragraph() {
        let lines = render("<p>one<lb/>two</p>");
        assert_eq!(lines, ["one", "two", ""]);
    }

    #[test]
    fn test_block_quote_indents() {
        let lines = render("<quote><p>Inside.</p></quote>");
        assert_eq!(lines, ["    Inside.", ""]);

        let lines = render("<quote>Bare text.</quote>");
        assert_eq!(lines, ["    Bare text.", ""]);
    }

    #[test]
    fn test_notes() {
        assert_eq!(render("<p>Word<note>gloss</note></p>"), ["Word [gloss]", ""]);
        assert_eq!(render("<note>gloss</note>"), ["    [gloss]", ""]);
        assert_eq!(render("<note><p>a</p><p>b</p></note>"), ["    [a", "", "    b]", ""]);
    }

    #[test]
    fn test_heads_by_ancestor() {
        let head = |ancestor| {
            render_with(
                "<head>Chapter One</head>",
                RenderContext::new().with_ancestor(ancestor),
            )
        };
        assert_eq!(head(Tag::Body), ["", "", "", "CHAPTER ONE", "", ""]);
        assert_eq!(head(Tag::Front), ["Chapter One", "===========", ""]);
        assert_eq!(head(Tag::Back), ["CHAPTER ONE", ""]);
        assert_eq!(head(Tag::Div), ["CHAPTER ONE", "", ""]);
        assert_eq!(head(Tag::Quote), ["Chapter One", ""]);
    }

    #[test]
    fn test_verse_indentation() {
        let lines = render(
            r#"<lg><head>Ode</head><l>First</l><l rend="indent">second</l><l rend="indent3">third</l></lg>"#,
        );
        assert_eq!(
            lines,
            ["    ODE", "", "    First", "      second", "          third", ""]
        );
    }

    #[test]
    fn test_verse_stanzas_separated() {
        let lines = render("<lg><lg><l>a</l></lg><lg><l>b</l></lg></lg>");
        assert_eq!(lines, ["    a", "", "    b", ""]);
    }

    #[test]
    fn test_centered_stanza_is_block_centered() {
        let ctx = RenderContext::new().with_ancestor(Tag::Body).with_wrap_width(20);
        let lines = render_with(r#"<lg rend="center"><l>abcd</l><l>ab</l></lg>"#, ctx);
        assert_eq!(lines, ["        abcd", "        ab", ""]);
    }

    #[test]
    fn test_centered_line() {
        let ctx = RenderContext::new().with_ancestor(Tag::Body).with_wrap_width(20);
        let lines = render_with(r#"<lg><l rend="center">abcd</l></lg>"#, ctx);
        assert_eq!(lines, ["        abcd", ""]);
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            render("<list><item>one</item><item>two</item></list>"),
            ["  \u{2022} one", "  \u{2022} two", ""]
        );
        assert_eq!(
            render(r#"<list type="ordered"><item>one</item></list>"#),
            ["  1. one", ""]
        );
        assert_eq!(
            render("<list><label>A</label><item>x</item></list>"),
            ["A", "    x", ""]
        );
    }

    #[test]
    fn test_wrapped_paragraph_inside_item_keeps_words_apart() {
        let words = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo \
                     lima mike november oscar papa";
        let lines = render(&format!("<list>\n<item>\n  <p>{words}</p>\n</item>\n</list>"));
        assert_eq!(
            lines,
            [
                "  \u{2022} alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo",
                "    lima mike november oscar papa",
                "",
            ]
        );
        let rejoined: Vec<_> = lines.iter().flat_map(|l| l.split_whitespace()).skip(1).collect();
        assert_eq!(rejoined.join(" "), words.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_paragraphs_inside_item_start_new_lines() {
        let lines = render("<list><item>Lead <p>first</p><p>second</p></item></list>");
        assert_eq!(lines, ["  \u{2022} Lead", "    first", "    second", ""]);
    }

    #[test]
    fn test_note_with_wrapped_paragraph() {
        let long = "one two three four five six seven eight nine ten eleven twelve thirteen fourteen";
        let lines = render(&format!("<p>Word<note><p>{long}</p><p>end</p></note> after.</p>"));
        let flowing = lines.join(" ");
        assert!(flowing.contains(&format!("Word [{long} end] after.")), "{lines:?}");
        assert!(lines.iter().all(|l| l.len() <= DEFAULT_WRAP_WIDTH));
    }

    #[test]
    fn test_quote_of_verse_lines() {
        assert_eq!(
            render("<quote><l>roses are red</l><l>violets blue</l></quote>"),
            ["        roses are red", "        violets blue", ""]
        );
    }

    #[test]
    fn test_block_quote_with_lead_text() {
        assert_eq!(
            render("<quote>Lead <p>para</p></quote>"),
            ["    Lead", "    para", ""]
        );
    }

    #[test]
    fn test_list_item_continuation_aligned() {
        let ctx = RenderContext::new().with_ancestor(Tag::Body).with_wrap_width(12);
        let lines = render_with("<list><item>aaa bbb ccc</item></list>", ctx);
        assert_eq!(lines, ["  \u{2022} aaa bbb", "    ccc", ""]);
    }

    #[test]
    fn test_table_columns_padded() {
        let lines = render(
            "<table><row><cell>a</cell><cell>b</cell></row><row><cell>long</cell><cell>c</cell></row></table>",
        );
        assert_eq!(lines, ["a     b", "long  c", ""]);
    }

    #[test]
    fn test_figure_and_breaks() {
        assert_eq!(
            render("<figure><graphic url=\"x.png\"/><head>A map</head></figure>"),
            ["[Illustration: A map]", ""]
        );
        assert_eq!(render("<figure/>"), ["[Illustration]", ""]);
        assert_eq!(render("<milestone/>"), ["", ""]);
        assert_eq!(render(r#"<milestone rend="stars"/>"#)[0].trim(), STARS);
        assert!(render(r#"<pb n="4"/>"#).is_empty());
    }

    #[test]
    fn test_hi_and_friends() {
        assert_eq!(render(r#"<p><hi rend="bold">b</hi> <hi>i</hi> <emph>e</emph></p>"#), ["*b* _i_ _e_", ""]);
        assert_eq!(render(r#"<p><hi rend="small-caps">sc</hi> <hi rend="mono">m</hi></p>"#), ["SC `m`", ""]);
        assert_eq!(render(r##"<p><ref target="#x">link</ref></p>"##), ["link", ""]);
    }

    #[test]
    fn test_signed_right_aligned() {
        let ctx = RenderContext::new().with_ancestor(Tag::Body).with_wrap_width(10);
        assert_eq!(render_with("<signed>Jo</signed>", ctx), ["        Jo", ""]);
    }

    #[test]
    fn test_unknown_elements_render_children() {
        assert_eq!(render("<p>a <sic>teh</sic> b</p>"), ["a teh b", ""]);
        assert_eq!(render("<wrapper><p>x</p></wrapper>"), ["x", ""]);
    }
}
