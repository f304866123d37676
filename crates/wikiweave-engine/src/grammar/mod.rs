//! The chunk grammar: a declarative table of every markup construct and the
//! compiled form the parse engine runs against.
//!
//! The raw table ([`table::chunk_table`]) says *what* each construct looks
//! like; the compiler ([`compiler`]) derives *how* to match it quickly:
//! anchored start matchers, stop/delimiter matchers (explicit patterns or
//! unions of the boundaries that interrupt a block), and a per-container
//! dispatch index keyed by lead character. Compilation happens once per
//! process and the result is immutable; per-converter customization lives in
//! a separate overlay.

pub(crate) mod compiler;
pub(crate) mod table;

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::filters::{FilterKind, FilterRegexes};
use crate::pattern::Pat;

/// Every chunk type the grammar knows about.
///
/// Structural kinds (`Top`, `AnyHeading`) never produce output themselves:
/// `Top` is the document root context and `AnyHeading` only contributes its
/// line-start pattern to block terminator unions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    Top,
    Blank,
    Paragraph,
    IndentPara,
    DefList,
    DefTerm,
    DefDef,
    Table,
    TableRow,
    TableCell,
    TableHeader,
    UnorderedList,
    OrderedList,
    ListItem,
    NowikiBlock,
    HorizontalRule,
    AnyHeading,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Plain,
    Any,
    LineBreak,
    Escape,
    NowikiInline,
    PluginTriple,
    PluginDouble,
    BareLink,
    Link,
    LinkTarget,
    LinkText,
    Image,
    ImageSrc,
    ImageAlt,
    Strong,
    Em,
    Mono,
    Sub,
    Sup,
    Underline,
    Amp,
    Trademark,
    Registered,
    Copyright,
    Ndash,
    Ellipsis,
}

impl ChunkKind {
    pub(crate) const ALL: [ChunkKind; 49] = [
        ChunkKind::Top,
        ChunkKind::Blank,
        ChunkKind::Paragraph,
        ChunkKind::IndentPara,
        ChunkKind::DefList,
        ChunkKind::DefTerm,
        ChunkKind::DefDef,
        ChunkKind::Table,
        ChunkKind::TableRow,
        ChunkKind::TableCell,
        ChunkKind::TableHeader,
        ChunkKind::UnorderedList,
        ChunkKind::OrderedList,
        ChunkKind::ListItem,
        ChunkKind::NowikiBlock,
        ChunkKind::HorizontalRule,
        ChunkKind::AnyHeading,
        ChunkKind::H1,
        ChunkKind::H2,
        ChunkKind::H3,
        ChunkKind::H4,
        ChunkKind::H5,
        ChunkKind::H6,
        ChunkKind::Plain,
        ChunkKind::Any,
        ChunkKind::LineBreak,
        ChunkKind::Escape,
        ChunkKind::NowikiInline,
        ChunkKind::PluginTriple,
        ChunkKind::PluginDouble,
        ChunkKind::BareLink,
        ChunkKind::Link,
        ChunkKind::LinkTarget,
        ChunkKind::LinkText,
        ChunkKind::Image,
        ChunkKind::ImageSrc,
        ChunkKind::ImageAlt,
        ChunkKind::Strong,
        ChunkKind::Em,
        ChunkKind::Mono,
        ChunkKind::Sub,
        ChunkKind::Sup,
        ChunkKind::Underline,
        ChunkKind::Amp,
        ChunkKind::Trademark,
        ChunkKind::Registered,
        ChunkKind::Copyright,
        ChunkKind::Ndash,
        ChunkKind::Ellipsis,
    ];

    /// Stable lowercase name, used by the markup diagnostic dump.
    pub fn name(self) -> &'static str {
        match self {
            ChunkKind::Top => "top",
            ChunkKind::Blank => "blank",
            ChunkKind::Paragraph => "paragraph",
            ChunkKind::IndentPara => "indent_para",
            ChunkKind::DefList => "def_list",
            ChunkKind::DefTerm => "def_term",
            ChunkKind::DefDef => "def_def",
            ChunkKind::Table => "table",
            ChunkKind::TableRow => "table_row",
            ChunkKind::TableCell => "table_cell",
            ChunkKind::TableHeader => "table_header",
            ChunkKind::UnorderedList => "unordered_list",
            ChunkKind::OrderedList => "ordered_list",
            ChunkKind::ListItem => "list_item",
            ChunkKind::NowikiBlock => "nowiki_block",
            ChunkKind::HorizontalRule => "horizontal_rule",
            ChunkKind::AnyHeading => "any_heading",
            ChunkKind::H1 => "h1",
            ChunkKind::H2 => "h2",
            ChunkKind::H3 => "h3",
            ChunkKind::H4 => "h4",
            ChunkKind::H5 => "h5",
            ChunkKind::H6 => "h6",
            ChunkKind::Plain => "plain",
            ChunkKind::Any => "any",
            ChunkKind::LineBreak => "line_break",
            ChunkKind::Escape => "escape",
            ChunkKind::NowikiInline => "nowiki_inline",
            ChunkKind::PluginTriple => "plugin_triple",
            ChunkKind::PluginDouble => "plugin_double",
            ChunkKind::BareLink => "bare_link",
            ChunkKind::Link => "link",
            ChunkKind::LinkTarget => "link_target",
            ChunkKind::LinkText => "link_text",
            ChunkKind::Image => "image",
            ChunkKind::ImageSrc => "image_src",
            ChunkKind::ImageAlt => "image_alt",
            ChunkKind::Strong => "strong",
            ChunkKind::Em => "em",
            ChunkKind::Mono => "mono",
            ChunkKind::Sub => "sub",
            ChunkKind::Sup => "sup",
            ChunkKind::Underline => "underline",
            ChunkKind::Amp => "amp",
            ChunkKind::Trademark => "trademark",
            ChunkKind::Registered => "registered",
            ChunkKind::Copyright => "copyright",
            ChunkKind::Ndash => "ndash",
            ChunkKind::Ellipsis => "ellipsis",
        }
    }
}

/// Lead characters that may begin a chunk. A pre-filter for dispatch, not a
/// guarantee.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Hint {
    None,
    Chars(&'static [char]),
    /// The derived plain-character set: ASCII printable minus the special
    /// characters that can open markup.
    Plain,
}

/// How a chunk's content ends: its own closing delimiter, or the union of
/// the boundaries of the kinds that interrupt it.
#[derive(Debug, Clone)]
pub(crate) enum StopSpec {
    Pattern(Pat),
    Terminators(&'static [ChunkKind]),
}

/// Forward-search strategy for the stop matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanMode {
    Leftmost,
    /// Consume as much as possible, then find the marker. Needed by the
    /// definition-definition chunk, whose delimiter can match at the very
    /// position the chunk begins.
    GreedyRightmost,
}

/// One raw grammar table entry.
#[derive(Debug, Clone)]
pub(crate) struct ChunkSpec {
    pub kind: ChunkKind,
    /// Anchored zero-width test: does a chunk of this kind begin here?
    pub start: Option<Pat>,
    /// Variant of `start` used when this kind terminates an enclosing chunk
    /// from a position at a line break.
    pub boundary: Option<Pat>,
    pub stop: Option<StopSpec>,
    pub scan: ScanMode,
    pub hint: Hint,
    /// Kinds this chunk's content decomposes into, in dispatch order.
    /// Absent means leaf content, emitted without recursion.
    pub contains: Option<&'static [ChunkKind]>,
    pub filter: Option<FilterKind>,
    pub open: &'static str,
    pub close: &'static str,
}

/// A chunk after compilation: patterns resolved, stop union built, dispatch
/// index in place.
#[derive(Debug)]
pub(crate) struct CompiledChunk {
    pub start: Option<Pat>,
    pub delim: Option<Pat>,
    pub scan: ScanMode,
    pub contains: Option<&'static [ChunkKind]>,
    pub dispatch: HashMap<char, Vec<ChunkKind>>,
    pub filter: Option<FilterKind>,
    pub open: &'static str,
    pub close: &'static str,
}

#[derive(Debug)]
pub(crate) struct Grammar {
    chunks: HashMap<ChunkKind, CompiledChunk>,
    pub filters: FilterRegexes,
}

impl Grammar {
    pub(crate) fn chunk(&self, kind: ChunkKind) -> &CompiledChunk {
        self.chunks
            .get(&kind)
            .expect("every chunk kind has a table entry")
    }
}

static GRAMMAR: OnceLock<Grammar> = OnceLock::new();

/// The compiled grammar, built on first use and shared by every parse.
pub(crate) fn grammar() -> &'static Grammar {
    GRAMMAR.get_or_init(compiler::compile)
}
