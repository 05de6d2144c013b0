//! HTML rendering.
//!
//! Produces a single HTML document. In strict mode the output is well-formed
//! XHTML: every empty element self-closes and all five markup characters are
//! escaped in text and attribute values.

use std::borrow::Cow;

use crate::context::RenderContext;
use crate::render::{Renderer, Target, is_block_child};
use crate::traverse::Traverser;
use crate::tree::{Content, Document, Element};
use crate::util::{escape_attr, escape_text, escape_xml};
use crate::vocab::{Emphasis, Rend, Tag};

/// Stylesheet embedded in every standalone HTML document.
pub(crate) const DEFAULT_CSS: &str = "\
body { margin: 2em auto; max-width: 40em; line-height: 1.5; }
h1, h2, .poem-title { text-align: center; }
blockquote { margin: 1em 2em; }
.note { font-size: 0.85em; }
aside.note { margin: 1em 2em; }
.poem { margin: 1em 2em; }
.stanza { margin-bottom: 1em; }
.line.indent { padding-left: 1em; }
.line.indent2 { padding-left: 2em; }
.line.indent3 { padding-left: 3em; }
.center { text-align: center; }
.milestone.stars::before { content: \"*       *       *       *       *\"; white-space: pre; }
.milestone { text-align: center; margin: 1em 0; }
.signature { text-align: right; }
.small-caps { font-variant: small-caps; }
.underline { text-decoration: underline; }
.pagebreak { display: none; }
figure { text-align: center; }";

/// Configuration for HTML output.
#[derive(Debug, Clone, Default)]
pub struct HtmlConfig {
    /// Emit well-formed XHTML instead of HTML5.
    pub strict: bool,
    /// Extra CSS appended after the default stylesheet.
    pub stylesheet: Option<String>,
    /// Document language; the source's `xml:lang` when `None`.
    pub language: Option<String>,
}

/// Renders the source vocabulary to HTML.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    config: HtmlConfig,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HtmlConfig) -> Self {
        Self { config }
    }

    /// A renderer producing well-formed XHTML.
    pub fn strict() -> Self {
        Self::with_config(HtmlConfig {
            strict: true,
            ..HtmlConfig::default()
        })
    }

    pub fn config(&self) -> &HtmlConfig {
        &self.config
    }

    /// Render one element as HTML.
    ///
    /// Generic over the traverser's renderer so that wrapping renderers can
    /// reuse these handlers while recursion keeps flowing through the
    /// wrapper.
    pub(crate) fn dispatch<R>(
        &self,
        el: &Element,
        tag: &str,
        ctx: RenderContext<'_>,
        trav: &Traverser<'_, R>,
    ) -> String
    where
        R: Renderer<Output = String>,
    {
        let Some(known) = Tag::from_local(tag) else {
            tracing::debug!(tag, "rendering unknown element through its children");
            return self.transparent(el, ctx, trav);
        };

        match known {
            Tag::TeiHeader => String::new(),
            Tag::Tei | Tag::Text | Tag::Front | Tag::Body | Tag::Back => {
                let inner = self.block_children(el, ctx.with_ancestor(known), trav);
                prepend_anchor(el, &ctx, inner)
            }
            Tag::Div => {
                let attrs = Attrs::new(&ctx).id(el).opt("class", el.attr("type"));
                block("div", &attrs, &self.block_children(el, ctx.with_ancestor(Tag::Div), trav))
            }
            Tag::Head => self.head(el, ctx, trav),
            Tag::P => {
                let attrs = Attrs::new(&ctx).id(el).opt("class", Some(el.rend()));
                inline("p", &attrs, &self.inline_children(el, ctx.with_ancestor(Tag::P), trav))
            }
            Tag::Quote => self.quote(el, ctx, trav),
            Tag::Note => self.note(el, ctx, trav),
            Tag::Lg => {
                let kind = if ctx.ancestor == Tag::Lg { "stanza" } else { "poem" };
                let attrs = Attrs::new(&ctx).id(el).set("class", &with_rend(kind, el));
                block("div", &attrs, &self.block_children(el, ctx.with_ancestor(Tag::Lg), trav))
            }
            Tag::L => {
                let attrs = Attrs::new(&ctx).id(el).set("class", &with_rend("line", el));
                inline("div", &attrs, &self.inline_children(el, ctx.with_ancestor(Tag::L), trav))
            }
            Tag::List => self.list(el, ctx, trav),
            Tag::Item => {
                let attrs = Attrs::new(&ctx).id(el);
                inline("li", &attrs, &self.flow_children(el, ctx.with_ancestor(Tag::Item), trav))
            }
            Tag::Label => {
                let attrs = Attrs::new(&ctx).id(el).set("class", "label");
                inline("span", &attrs, &self.inline_children(el, ctx.with_ancestor(Tag::Label), trav))
            }
            Tag::Table => {
                let attrs = Attrs::new(&ctx).id(el).opt("class", Some(el.rend()));
                block("table", &attrs, &self.block_children(el, ctx.with_ancestor(Tag::Table), trav))
            }
            Tag::Row => {
                let attrs = Attrs::new(&ctx).id(el);
                block("tr", &attrs, &self.block_children(el, ctx.with_ancestor(Tag::Row), trav))
            }
            Tag::Cell => {
                let name = if el.attr("role") == Some("label") { "th" } else { "td" };
                let attrs = Attrs::new(&ctx)
                    .id(el)
                    .opt("colspan", el.attr("cols"))
                    .opt("rowspan", el.attr("rows"));
                inline(name, &attrs, &self.flow_children(el, ctx.with_ancestor(Tag::Cell), trav))
            }
            Tag::Figure => self.figure(el, ctx, trav),
            Tag::Graphic => self.graphic(el, None, &ctx),
            Tag::FigDesc => String::new(),
            Tag::Milestone => {
                let kind = match el.rend().trim() {
                    "" | "space" => "space",
                    "stars" => "stars",
                    other => other,
                };
                let attrs = Attrs::new(&ctx)
                    .id(el)
                    .set("class", &format!("milestone {kind}"));
                empty("div", &attrs, &ctx)
            }
            Tag::Signed => {
                let attrs = Attrs::new(&ctx).id(el).set("class", "signature");
                inline("div", &attrs, &self.inline_children(el, ctx.with_ancestor(Tag::Signed), trav))
            }
            Tag::Hi => self.hi(el, ctx, trav),
            Tag::Emph => {
                let attrs = Attrs::new(&ctx).id(el);
                inline("em", &attrs, &self.inline_children(el, ctx.with_ancestor(Tag::Emph), trav))
            }
            Tag::Foreign => {
                let lang = el.attr("xml:lang");
                let mut attrs = Attrs::new(&ctx).id(el).set("class", "foreign").opt("lang", lang);
                if ctx.strict {
                    attrs = attrs.opt("xml:lang", lang);
                }
                inline("i", &attrs, &self.inline_children(el, ctx.with_ancestor(Tag::Foreign), trav))
            }
            Tag::Title => {
                let attrs = Attrs::new(&ctx).id(el).set("class", "title");
                inline("i", &attrs, &self.inline_children(el, ctx.with_ancestor(Tag::Title), trav))
            }
            Tag::Ref => self.reference(el, ctx, trav),
            Tag::Lb => empty("br", &Attrs::new(&ctx).id(el), &ctx),
            Tag::Pb => {
                let attrs = Attrs::new(&ctx)
                    .id(el)
                    .set("class", "pagebreak")
                    .opt("title", el.attr("n"));
                empty("span", &attrs, &ctx)
            }
            Tag::FileDesc
            | Tag::TitleStmt
            | Tag::PublicationStmt
            | Tag::SourceDesc
            | Tag::Author => self.transparent(el, ctx, trav),
        }
    }

    fn head<R>(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, R>) -> String
    where
        R: Renderer<Output = String>,
    {
        let content = self.inline_children(el, ctx.with_ancestor(Tag::Head), trav);
        let attrs = Attrs::new(&ctx).id(el);
        match ctx.ancestor {
            Tag::Div | Tag::Body | Tag::Front | Tag::Back => inline("h2", &attrs, &content),
            Tag::Lg => inline("div", &attrs.set("class", "poem-title"), &content),
            Tag::Figure => inline("figcaption", &attrs, &content),
            Tag::Table => inline("caption", &attrs, &content),
            Tag::List => inline("li", &attrs.set("class", "head"), &content),
            _ => inline("div", &attrs.set("class", "head"), &content),
        }
    }

    fn quote<R>(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, R>) -> String
    where
        R: Renderer<Output = String>,
    {
        if ctx.is_inline() {
            let marks = trav.renderer().quote_marks(ctx.quote_depth);
            let inner = self.inline_children(el, ctx.deeper_quote(), trav);
            return prepend_anchor(el, &ctx, marks.wrap(&inner));
        }

        let attrs = Attrs::new(&ctx).id(el);
        let inner = self.block_content(el, ctx.deeper_block().with_ancestor(Tag::Quote), trav);
        block("blockquote", &attrs, &inner)
    }

    fn note<R>(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, R>) -> String
    where
        R: Renderer<Output = String>,
    {
        let attrs = Attrs::new(&ctx).id(el).set("class", "note");
        if ctx.is_inline() {
            let inner = self.inline_children(el, ctx.with_ancestor(Tag::Note), trav);
            return inline("sup", &attrs, &format!("[{}]", inner.trim()));
        }

        let inner = self.block_content(el, ctx.deeper_block().with_ancestor(Tag::Note), trav);
        block("aside", &attrs, &inner)
    }

    /// Content of a block quotation or note. Block children keep their own
    /// markup; each run of text and phrase elements between them becomes a
    /// paragraph.
    fn block_content<R>(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, R>) -> String
    where
        R: Renderer<Output = String>,
    {
        let run_ctx = ctx.with_ancestor(Tag::P);
        let mut parts = Vec::new();
        let mut run = String::new();

        let flush = |run: &mut String, parts: &mut Vec<String>| {
            let text = run.trim();
            if !text.is_empty() {
                parts.push(inline("p", &Attrs::new(&ctx), text));
            }
            run.clear();
        };

        for content in el.content() {
            match content {
                Content::Element(child) if !is_phrasing(child) => {
                    flush(&mut run, &mut parts);
                    parts.push(trav.traverse_element(child, ctx));
                }
                Content::Element(child) => run.push_str(&trav.traverse_element(child, run_ctx)),
                Content::Text(t) => run.push_str(&trav.renderer().render_text(t, run_ctx)),
            }
        }
        flush(&mut run, &mut parts);
        join_blocks(parts)
    }

    fn list<R>(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, R>) -> String
    where
        R: Renderer<Output = String>,
    {
        let child_ctx = ctx.with_ancestor(Tag::List);
        let attrs = Attrs::new(&ctx).id(el);

        if el.child(Tag::Label).is_some() {
            let mut parts = Vec::new();
            for child in el.elements() {
                let (name, class, tag) = match child.tag() {
                    Some(Tag::Label) => ("dt", None, Tag::Label),
                    Some(Tag::Item) => ("dd", None, Tag::Item),
                    Some(Tag::Head) => ("dt", Some("head"), Tag::Head),
                    _ => {
                        parts.push(trav.traverse_element(child, child_ctx));
                        continue;
                    }
                };
                let attrs = Attrs::new(&ctx).id(child).opt("class", class);
                let inner = if tag == Tag::Item {
                    self.flow_children(child, ctx.with_ancestor(tag), trav)
                } else {
                    self.inline_children(child, ctx.with_ancestor(tag), trav)
                };
                parts.push(inline(name, &attrs, &inner));
            }
            return block("dl", &attrs, &join_blocks(parts));
        }

        let name = match el.attr("type") {
            Some("ordered" | "numbered") => "ol",
            _ => "ul",
        };
        block(name, &attrs, &self.block_children(el, child_ctx, trav))
    }

    fn figure<R>(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, R>) -> String
    where
        R: Renderer<Output = String>,
    {
        let child_ctx = ctx.with_ancestor(Tag::Figure);
        let desc = el.child(Tag::FigDesc).map(|d| trav.renderer().plain_text(d));
        let width = el
            .attr("width")
            .or_else(|| el.child(Tag::Graphic).and_then(|g| g.attr("width")));

        let mut parts = Vec::new();
        for child in el.elements() {
            if child.is(Tag::Graphic) {
                parts.push(self.graphic(child, desc.as_deref(), &child_ctx));
            } else {
                parts.push(trav.traverse_element(child, child_ctx));
            }
        }

        let attrs = Attrs::new(&ctx)
            .id(el)
            .opt("class", Some(el.rend()))
            .opt("style", width.map(|w| format!("width: {w}")).as_deref());
        block("figure", &attrs, &join_blocks(parts))
    }

    fn graphic(&self, el: &Element, alt: Option<&str>, ctx: &RenderContext<'_>) -> String {
        let attrs = Attrs::new(ctx)
            .id(el)
            .set("src", el.attr("url").unwrap_or(""))
            .set("alt", alt.unwrap_or(""));
        empty("img", &attrs, ctx)
    }

    fn hi<R>(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, R>) -> String
    where
        R: Renderer<Output = String>,
    {
        let inner = self.inline_children(el, ctx.with_ancestor(Tag::Hi), trav);
        let rend = Rend::parse(el.rend());
        let attrs = Attrs::new(&ctx).id(el);
        match rend.emphasis {
            None if rend.is_empty() => inline("i", &attrs, &inner),
            Some(Emphasis::Italic) => inline("i", &attrs, &inner),
            Some(Emphasis::Bold) => inline("b", &attrs, &inner),
            Some(Emphasis::Monospace) => inline("code", &attrs, &inner),
            Some(e @ (Emphasis::Underline | Emphasis::SmallCaps)) => {
                inline("span", &attrs.set("class", e.class()), &inner)
            }
            None => inline("span", &attrs.set("class", rend.raw), &inner),
        }
    }

    fn reference<R>(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, R>) -> String
    where
        R: Renderer<Output = String>,
    {
        let inner = self.inline_children(el, ctx.with_ancestor(Tag::Ref), trav);
        match el.attr("target").and_then(Target::parse) {
            Some(target) => {
                let attrs = Attrs::new(&ctx).id(el).set("href", &target.href(&ctx));
                inline("a", &attrs, &inner)
            }
            None => prepend_anchor(el, &ctx, inner),
        }
    }

    /// Children only, for elements without their own markup.
    fn transparent<R>(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, R>) -> String
    where
        R: Renderer<Output = String>,
    {
        let inner = if ctx.is_inline() {
            self.inline_children(el, ctx, trav)
        } else {
            self.block_children(el, ctx, trav)
        };
        prepend_anchor(el, &ctx, inner)
    }

    /// Phrasing content of `el`. Block children are reduced to their own
    /// phrasing content, set off by spaces, so the result can sit inside
    /// `<p>`, `<span>` and the like.
    fn inline_children<R>(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, R>) -> String
    where
        R: Renderer<Output = String>,
    {
        let mut out = String::new();
        let mut space_before_next = false;
        for content in el.content() {
            let piece = match content {
                Content::Text(t) => trav.renderer().render_text(t, ctx),
                Content::Element(child) if is_phrasing(child) => trav.traverse_element(child, ctx),
                Content::Element(child) if matches!(child.tag(), Some(Tag::FigDesc | Tag::TeiHeader)) => {
                    continue;
                }
                Content::Element(child) => {
                    let inner = self.inline_children(child, ctx, trav);
                    let inner = prepend_anchor(child, &ctx, inner.trim().to_string());
                    if inner.is_empty() {
                        continue;
                    }
                    if !out.is_empty() && !out.ends_with(char::is_whitespace) {
                        out.push(' ');
                    }
                    out.push_str(&inner);
                    space_before_next = true;
                    continue;
                }
            };
            if piece.is_empty() {
                continue;
            }
            if space_before_next && !piece.starts_with(char::is_whitespace) {
                out.push(' ');
            }
            space_before_next = false;
            out.push_str(&piece);
        }
        out
    }

    /// Children as they are, for wrappers that may hold blocks.
    fn flow_children<R>(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, R>) -> String
    where
        R: Renderer<Output = String>,
    {
        trav.renderer().render_children(el, ctx, trav).concat()
    }

    fn block_children<R>(&self, el: &Element, ctx: RenderContext<'_>, trav: &Traverser<'_, R>) -> String
    where
        R: Renderer<Output = String>,
    {
        join_blocks(trav.renderer().render_children(el, ctx, trav))
    }

    /// `text` escaped for the current output mode.
    fn text<'t>(&self, text: &'t str, ctx: &RenderContext<'_>) -> Cow<'t, str> {
        if ctx.strict {
            escape_xml(text)
        } else {
            escape_text(text)
        }
    }

    fn language<'d>(&'d self, doc: &'d Document) -> &'d str {
        self.config.language.as_deref().unwrap_or_else(|| doc.language())
    }
}

impl Renderer for HtmlRenderer {
    type Output = String;

    fn document_start(&self, doc: &Document) -> String {
        let ctx = self.root_context();
        let lang = self.language(doc);
        let title = doc.title();
        let mut out = String::new();

        if self.config.strict {
            out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n");
            out.push_str(&format!(
                "<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"{0}\" lang=\"{0}\">\n",
                escape_xml(lang)
            ));
            out.push_str("<head>\n<meta charset=\"utf-8\"/>\n");
        } else {
            out.push_str("<!DOCTYPE html>\n");
            out.push_str(&format!("<html lang=\"{}\">\n", escape_attr(lang)));
            out.push_str("<head>\n<meta charset=\"utf-8\">\n");
        }

        out.push_str(&format!("<title>{}</title>\n", self.text(&title, &ctx)));
        if let Some(author) = doc.author() {
            let attrs = Attrs::new(&ctx).set("name", "author").set("content", &author);
            out.push_str(&empty("meta", &attrs, &ctx));
            out.push('\n');
        }

        out.push_str("<style>\n");
        out.push_str(DEFAULT_CSS);
        out.push('\n');
        if let Some(css) = &self.config.stylesheet {
            out.push_str(css.trim_end());
            out.push('\n');
        }
        out.push_str("</style>\n</head>\n<body>\n");
        out.push_str(&format!("<h1>{}</h1>", self.text(&title, &ctx)));
        if let Some(author) = doc.author() {
            out.push_str(&format!(
                "\n<p class=\"byline\">{}</p>",
                self.text(&author, &ctx)
            ));
        }
        out
    }

    fn document_end(&self) -> String {
        "</body>\n</html>\n".to_string()
    }

    fn root_context(&self) -> RenderContext<'static> {
        RenderContext::new().with_strict(self.config.strict)
    }

    fn render_element(
        &self,
        el: &Element,
        tag: &str,
        ctx: RenderContext<'_>,
        trav: &Traverser<'_, Self>,
    ) -> String {
        self.dispatch(el, tag, ctx, trav)
    }

    fn render_text(&self, text: &str, ctx: RenderContext<'_>) -> String {
        if !ctx.is_inline() && text.trim().is_empty() {
            return String::new();
        }
        self.text(text, &ctx).into_owned()
    }
}

/// Attribute list for one start tag, escaped per output mode.
struct Attrs {
    buf: String,
    strict: bool,
}

impl Attrs {
    fn new(ctx: &RenderContext<'_>) -> Self {
        Self {
            buf: String::new(),
            strict: ctx.strict,
        }
    }

    fn set(mut self, name: &str, value: &str) -> Self {
        let value = if self.strict {
            escape_xml(value)
        } else {
            escape_attr(value)
        };
        self.buf.push_str(&format!(" {name}=\"{value}\""));
        self
    }

    /// Add the attribute when the value is present and non-empty.
    fn opt(self, name: &str, value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => self.set(name, v),
            _ => self,
        }
    }

    fn id(self, el: &Element) -> Self {
        self.opt("id", el.id())
    }
}

fn inline(name: &str, attrs: &Attrs, inner: &str) -> String {
    format!("<{name}{}>{inner}</{name}>", attrs.buf)
}

fn block(name: &str, attrs: &Attrs, inner: &str) -> String {
    if inner.is_empty() {
        format!("<{name}{}></{name}>", attrs.buf)
    } else {
        format!("<{name}{}>\n{inner}\n</{name}>", attrs.buf)
    }
}

/// An element with no content.
fn empty(name: &str, attrs: &Attrs, ctx: &RenderContext<'_>) -> String {
    let void = matches!(name, "br" | "img" | "meta" | "link" | "hr");
    match (ctx.strict, void) {
        (true, _) => format!("<{name}{}/>", attrs.buf),
        (false, true) => format!("<{name}{}>", attrs.buf),
        (false, false) => format!("<{name}{}></{name}>", attrs.buf),
    }
}

/// Keep the identifier of an element that has no wrapper of its own.
fn prepend_anchor(el: &Element, ctx: &RenderContext<'_>, inner: String) -> String {
    match el.id() {
        Some(_) => {
            let anchor = empty("a", &Attrs::new(ctx).id(el), ctx);
            format!("{anchor}{inner}")
        }
        None => inner,
    }
}

/// True when `el` may sit inside running text.
fn is_phrasing(el: &Element) -> bool {
    match el.tag() {
        Some(tag) => tag.is_phrase(),
        None => !is_block_child(el),
    }
}

fn with_rend(base: &str, el: &Element) -> String {
    let rend = el.rend().trim();
    if rend.is_empty() {
        base.to_string()
    } else {
        format!("{base} {rend}")
    }
}

fn join_blocks(parts: Vec<String>) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
