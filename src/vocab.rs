//! The supported TEI vocabulary and its style hints.
//!
//! The vocabulary is closed: every tag the renderers know about is a [`Tag`]
//! variant, and renderers dispatch with a plain `match`. Anything else is an
//! unknown element and is rendered through its children only.

/// A supported TEI element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Document root (`<TEI>`).
    Tei,
    /// Metadata block (`<teiHeader>`).
    TeiHeader,
    FileDesc,
    TitleStmt,
    PublicationStmt,
    SourceDesc,
    Author,
    /// Wrapper around front/body/back (`<text>`).
    Text,
    Front,
    Body,
    Back,
    /// Structural division (chapter, part, appendix...).
    Div,
    Head,
    P,
    /// Line group: a poem or a stanza.
    Lg,
    /// Line of verse.
    L,
    List,
    Item,
    Label,
    Table,
    Row,
    Cell,
    /// Highlighted text; the `rend` attribute names the style.
    Hi,
    Emph,
    Quote,
    Ref,
    Note,
    Foreign,
    Title,
    /// Line break.
    Lb,
    /// Page break.
    Pb,
    /// Section break.
    Milestone,
    Figure,
    Graphic,
    FigDesc,
    Signed,
}

impl Tag {
    /// Look up a tag by its local (unprefixed) name.
    pub fn from_local(name: &str) -> Option<Tag> {
        let tag = match name {
            "TEI" => Tag::Tei,
            "teiHeader" => Tag::TeiHeader,
            "fileDesc" => Tag::FileDesc,
            "titleStmt" => Tag::TitleStmt,
            "publicationStmt" => Tag::PublicationStmt,
            "sourceDesc" => Tag::SourceDesc,
            "author" => Tag::Author,
            "text" => Tag::Text,
            "front" => Tag::Front,
            "body" => Tag::Body,
            "back" => Tag::Back,
            "div" => Tag::Div,
            "head" => Tag::Head,
            "p" => Tag::P,
            "lg" => Tag::Lg,
            "l" => Tag::L,
            "list" => Tag::List,
            "item" => Tag::Item,
            "label" => Tag::Label,
            "table" => Tag::Table,
            "row" => Tag::Row,
            "cell" => Tag::Cell,
            "hi" => Tag::Hi,
            "emph" => Tag::Emph,
            "quote" => Tag::Quote,
            "ref" => Tag::Ref,
            "note" => Tag::Note,
            "foreign" => Tag::Foreign,
            "title" => Tag::Title,
            "lb" => Tag::Lb,
            "pb" => Tag::Pb,
            "milestone" => Tag::Milestone,
            "figure" => Tag::Figure,
            "graphic" => Tag::Graphic,
            "figDesc" => Tag::FigDesc,
            "signed" => Tag::Signed,
            _ => return None,
        };
        Some(tag)
    }

    /// The local name as written in the source vocabulary.
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Tei => "TEI",
            Tag::TeiHeader => "teiHeader",
            Tag::FileDesc => "fileDesc",
            Tag::TitleStmt => "titleStmt",
            Tag::PublicationStmt => "publicationStmt",
            Tag::SourceDesc => "sourceDesc",
            Tag::Author => "author",
            Tag::Text => "text",
            Tag::Front => "front",
            Tag::Body => "body",
            Tag::Back => "back",
            Tag::Div => "div",
            Tag::Head => "head",
            Tag::P => "p",
            Tag::Lg => "lg",
            Tag::L => "l",
            Tag::List => "list",
            Tag::Item => "item",
            Tag::Label => "label",
            Tag::Table => "table",
            Tag::Row => "row",
            Tag::Cell => "cell",
            Tag::Hi => "hi",
            Tag::Emph => "emph",
            Tag::Quote => "quote",
            Tag::Ref => "ref",
            Tag::Note => "note",
            Tag::Foreign => "foreign",
            Tag::Title => "title",
            Tag::Lb => "lb",
            Tag::Pb => "pb",
            Tag::Milestone => "milestone",
            Tag::Figure => "figure",
            Tag::Graphic => "graphic",
            Tag::FigDesc => "figDesc",
            Tag::Signed => "signed",
        }
    }

    /// Running-text containers. Ambiguous elements (quotations, notes)
    /// directly below one of these render inline.
    pub fn hosts_inline(self) -> bool {
        matches!(
            self,
            Tag::P
                | Tag::L
                | Tag::Cell
                | Tag::Item
                | Tag::Label
                | Tag::Head
                | Tag::Note
                | Tag::Signed
                | Tag::Hi
                | Tag::Emph
                | Tag::Foreign
                | Tag::Title
                | Tag::Ref
                | Tag::FigDesc
        )
    }

    /// Elements that occupy their own block when they appear as children
    /// of a quotation or note.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Tag::P
                | Tag::Lg
                | Tag::L
                | Tag::List
                | Tag::Table
                | Tag::Figure
                | Tag::Div
                | Tag::Quote
                | Tag::Signed
                | Tag::Milestone
        )
    }

    /// Elements that may sit inside a line of running text.
    pub fn is_phrase(self) -> bool {
        matches!(
            self,
            Tag::Hi
                | Tag::Emph
                | Tag::Foreign
                | Tag::Title
                | Tag::Ref
                | Tag::Lb
                | Tag::Pb
                | Tag::Quote
                | Tag::Note
                | Tag::Graphic
                | Tag::Author
        )
    }
}

/// A top-level structural section of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "lowercase"))]
pub enum Section {
    Front,
    Body,
    Back,
}

impl Section {
    /// All sections in document order.
    pub const ALL: [Section; 3] = [Section::Front, Section::Body, Section::Back];

    pub fn tag(self) -> Tag {
        match self {
            Section::Front => Tag::Front,
            Section::Body => Tag::Body,
            Section::Back => Tag::Back,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.tag().as_str()
    }

    /// File name stem for divisions of this section in packaged output.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Section::Front => "front",
            Section::Body => "chapter",
            Section::Back => "back",
        }
    }
}

/// Emphasis keywords recognized in `rend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Italic,
    Bold,
    Underline,
    SmallCaps,
    Monospace,
}

impl Emphasis {
    pub fn parse(token: &str) -> Option<Emphasis> {
        match token {
            "italic" | "italics" | "i" => Some(Emphasis::Italic),
            "bold" | "b" => Some(Emphasis::Bold),
            "underline" | "u" => Some(Emphasis::Underline),
            "small-caps" | "smallcaps" | "sc" => Some(Emphasis::SmallCaps),
            "monospace" | "mono" | "code" => Some(Emphasis::Monospace),
            _ => None,
        }
    }

    /// Class token used in styled output.
    pub fn class(self) -> &'static str {
        match self {
            Emphasis::Italic => "italic",
            Emphasis::Bold => "bold",
            Emphasis::Underline => "underline",
            Emphasis::SmallCaps => "small-caps",
            Emphasis::Monospace => "monospace",
        }
    }
}

/// Structural reading of a `rend` attribute.
///
/// `rend` holds whitespace-separated tokens. A handful are interpreted
/// (alignment, indentation steps, emphasis); the rest are kept verbatim as
/// opaque style tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rend<'a> {
    pub center: bool,
    /// Verse indentation step, 0 when absent or malformed.
    pub indent: u8,
    pub emphasis: Option<Emphasis>,
    pub raw: &'a str,
}

impl<'a> Rend<'a> {
    pub fn parse(raw: &'a str) -> Rend<'a> {
        let mut rend = Rend {
            raw: raw.trim(),
            ..Rend::default()
        };
        for token in raw.split_whitespace() {
            if token == "center" || token == "centre" {
                rend.center = true;
            } else if let Some(step) = token.strip_prefix("indent") {
                rend.indent = match step {
                    "" | "1" => 1,
                    "2" => 2,
                    "3" => 3,
                    _ => {
                        tracing::debug!(token, "ignoring unrecognized indentation step");
                        0
                    }
                };
            } else if let Some(emphasis) = Emphasis::parse(token) {
                rend.emphasis.get_or_insert(emphasis);
            }
        }
        rend
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
