//! The declarative chunk table: every markup construct, its start condition,
//! its termination condition, what it may contain, and how its text is
//! transformed before emission.
//!
//! Grammar is data, not code. The parse engine never special-cases a
//! construct beyond what this table says (the one exception being the
//! greedy-rightmost scan mode, which is itself declared here on the
//! definition-definition entry).

use super::{ChunkKind, ChunkSpec, Hint, ScanMode, StopSpec};
use crate::filters::FilterKind;
use crate::pattern::{Pat, ahead, alt, bol, not_ahead, re, seq};

/// Characters that may open inline or block markup. Everything else in ASCII
/// printable is a plain character (derived by the compiler).
pub(crate) const SPECIAL_CHARS: &[char] = &[
    '^', '\\', '*', '/', '_', ',', '{', '[', '<', '~', '|', '\n', '#', ':', ';', '(', '-', '.',
];

/// Inline constructs, in dispatch order. Also the stop set of the two leaf
/// text kinds: plain text runs until one of these begins.
const INLINE: &[ChunkKind] = &[
    ChunkKind::Strong,
    ChunkKind::Em,
    ChunkKind::LineBreak,
    ChunkKind::Escape,
    ChunkKind::Image,
    ChunkKind::Link,
    ChunkKind::BareLink,
    ChunkKind::NowikiInline,
    ChunkKind::Sub,
    ChunkKind::Sup,
    ChunkKind::Mono,
    ChunkKind::Underline,
    ChunkKind::PluginTriple,
    ChunkKind::PluginDouble,
    ChunkKind::Trademark,
    ChunkKind::Registered,
    ChunkKind::Copyright,
    ChunkKind::Ndash,
    ChunkKind::Ellipsis,
    ChunkKind::Amp,
];

/// Inline constructs plus the two leaf text kinds. `Any` matches any
/// character at all, so containers of this set always dispatch.
const ALL_INLINE: &[ChunkKind] = &[
    ChunkKind::Strong,
    ChunkKind::Em,
    ChunkKind::LineBreak,
    ChunkKind::Escape,
    ChunkKind::Image,
    ChunkKind::Link,
    ChunkKind::BareLink,
    ChunkKind::NowikiInline,
    ChunkKind::Sub,
    ChunkKind::Sup,
    ChunkKind::Mono,
    ChunkKind::Underline,
    ChunkKind::PluginTriple,
    ChunkKind::PluginDouble,
    ChunkKind::Trademark,
    ChunkKind::Registered,
    ChunkKind::Copyright,
    ChunkKind::Ndash,
    ChunkKind::Ellipsis,
    ChunkKind::Amp,
    ChunkKind::Plain,
    ChunkKind::Any,
];

/// Block constructs, in dispatch order. `Paragraph` is the catch-all: its
/// start test matches any remaining character.
const BLOCKS: &[ChunkKind] = &[
    ChunkKind::H1,
    ChunkKind::H2,
    ChunkKind::H3,
    ChunkKind::HorizontalRule,
    ChunkKind::NowikiBlock,
    ChunkKind::H4,
    ChunkKind::H5,
    ChunkKind::H6,
    ChunkKind::UnorderedList,
    ChunkKind::OrderedList,
    ChunkKind::Table,
    ChunkKind::Paragraph,
    ChunkKind::IndentPara,
    ChunkKind::DefList,
    ChunkKind::PluginTriple,
    ChunkKind::PluginDouble,
    ChunkKind::Blank,
];

const P_STOPS: &[ChunkKind] = &[
    ChunkKind::Blank,
    ChunkKind::IndentPara,
    ChunkKind::AnyHeading,
    ChunkKind::HorizontalRule,
    ChunkKind::NowikiBlock,
    ChunkKind::UnorderedList,
    ChunkKind::OrderedList,
    ChunkKind::DefList,
    ChunkKind::Table,
];

const IP_STOPS: &[ChunkKind] = &[
    ChunkKind::Blank,
    ChunkKind::AnyHeading,
    ChunkKind::HorizontalRule,
    ChunkKind::NowikiBlock,
    ChunkKind::UnorderedList,
    ChunkKind::OrderedList,
    ChunkKind::DefList,
    ChunkKind::Table,
];

const DL_STOPS: &[ChunkKind] = &[
    ChunkKind::Blank,
    ChunkKind::AnyHeading,
    ChunkKind::HorizontalRule,
    ChunkKind::NowikiBlock,
    ChunkKind::UnorderedList,
    ChunkKind::OrderedList,
    ChunkKind::Table,
];

const LIST_STOPS: &[ChunkKind] = &[
    ChunkKind::Blank,
    ChunkKind::IndentPara,
    ChunkKind::AnyHeading,
    ChunkKind::NowikiBlock,
    ChunkKind::ListItem,
    ChunkKind::Table,
    ChunkKind::HorizontalRule,
    ChunkKind::DefList,
];

const IP_CONTAINS: &[ChunkKind] = &[ChunkKind::Paragraph, ChunkKind::IndentPara];
const DL_CONTAINS: &[ChunkKind] = &[ChunkKind::DefTerm, ChunkKind::DefDef];
const TABLE_CONTAINS: &[ChunkKind] = &[ChunkKind::TableRow];
const ROW_CONTAINS: &[ChunkKind] = &[ChunkKind::TableCell, ChunkKind::TableHeader];
const LIST_CONTAINS: &[ChunkKind] = &[
    ChunkKind::UnorderedList,
    ChunkKind::OrderedList,
    ChunkKind::ListItem,
];
const LINK_CONTAINS: &[ChunkKind] = &[ChunkKind::LinkTarget, ChunkKind::LinkText];
const IMAGE_CONTAINS: &[ChunkKind] = &[ChunkKind::ImageSrc, ChunkKind::ImageAlt];

/// End of line: a newline, or the end of the text.
const EOL: &str = r"\n|\z";

fn spec(kind: ChunkKind) -> ChunkSpec {
    ChunkSpec {
        kind,
        start: None,
        boundary: None,
        stop: None,
        scan: ScanMode::Leftmost,
        hint: Hint::None,
        contains: None,
        filter: None,
        open: "",
        close: "",
    }
}

/// A cell boundary is a `|` that does not sit inside an unclosed `[[…]]` or
/// `{{…}}`; a `~` before the pipe keeps it literal.
fn cell_stop() -> Pat {
    seq(vec![
        re(r"[^~]"),
        ahead(seq(vec![
            re(r"\|"),
            not_ahead(re(r"[^\[]*\]\]|[^{]*\}\}")),
        ])),
    ])
}

pub(crate) fn chunk_table() -> Vec<ChunkSpec> {
    vec![
        ChunkSpec {
            contains: Some(BLOCKS),
            ..spec(ChunkKind::Top)
        },
        ChunkSpec {
            start: Some(re(&format!(" *(?:{EOL})"))),
            boundary: Some(ahead(seq(vec![
                alt(vec![bol(), re(r"\n")]),
                re(&format!(" *(?:{EOL})")),
            ]))),
            stop: Some(StopSpec::Pattern(ahead(re(r"\S")))),
            hint: Hint::Chars(&['\n']),
            filter: Some(FilterKind::Constant("")),
            ..spec(ChunkKind::Blank)
        },
        ChunkSpec {
            start: Some(re(r".")),
            stop: Some(StopSpec::Terminators(P_STOPS)),
            hint: Hint::Plain,
            contains: Some(ALL_INLINE),
            filter: Some(FilterKind::Chomp),
            open: "<p>",
            close: "</p>\n\n",
            ..spec(ChunkKind::Paragraph)
        },
        ChunkSpec {
            start: Some(re(":")),
            boundary: Some(seq(vec![re(r"\n"), ahead(re(":"))])),
            stop: Some(StopSpec::Terminators(IP_STOPS)),
            hint: Hint::Chars(&[':']),
            contains: Some(IP_CONTAINS),
            filter: Some(FilterKind::IndentPara),
            open: "<div style=\"margin-left: 2em\">",
            close: "</div>\n",
            ..spec(ChunkKind::IndentPara)
        },
        ChunkSpec {
            start: Some(re(";")),
            boundary: Some(seq(vec![re(r"\n"), ahead(re(";"))])),
            stop: Some(StopSpec::Terminators(DL_STOPS)),
            hint: Hint::Chars(&[';']),
            contains: Some(DL_CONTAINS),
            open: "<dl>\n",
            close: "</dl>\n",
            ..spec(ChunkKind::DefList)
        },
        ChunkSpec {
            start: Some(re(";")),
            boundary: Some(seq(vec![re(r"\n"), ahead(re(";"))])),
            stop: Some(StopSpec::Pattern(ahead(re(r":|\n")))),
            hint: Hint::Chars(&[';']),
            contains: Some(ALL_INLINE),
            filter: Some(FilterKind::DefTerm),
            open: "  <dt>",
            close: "</dt>\n",
            ..spec(ChunkKind::DefTerm)
        },
        ChunkSpec {
            start: Some(re(r"\n|:")),
            boundary: Some(re(r"\n|:")),
            stop: Some(StopSpec::Pattern(alt(vec![
                ahead(re(":")),
                seq(vec![re(r"\n"), ahead(re(";"))]),
            ]))),
            scan: ScanMode::GreedyRightmost,
            hint: Hint::Chars(&[':', '\n']),
            contains: Some(ALL_INLINE),
            filter: Some(FilterKind::DefDef),
            open: "    <dd>",
            close: "</dd>\n",
            ..spec(ChunkKind::DefDef)
        },
        ChunkSpec {
            start: Some(re(r" *\|.")),
            boundary: Some(seq(vec![re(r"\n"), ahead(re(r" *\|."))])),
            stop: Some(StopSpec::Pattern(seq(vec![
                re(r"\n"),
                ahead(re(r" *[^|]")),
            ]))),
            hint: Hint::Chars(&['|', ' ']),
            contains: Some(TABLE_CONTAINS),
            open: "<table>\n",
            close: "</table>\n\n",
            ..spec(ChunkKind::Table)
        },
        ChunkSpec {
            start: Some(re(r" *\|")),
            stop: Some(StopSpec::Pattern(re(r"\n"))),
            hint: Hint::Chars(&['|', ' ']),
            contains: Some(ROW_CONTAINS),
            filter: Some(FilterKind::TableRow),
            open: "    <tr>\n",
            close: "    </tr>\n",
            ..spec(ChunkKind::TableRow)
        },
        ChunkSpec {
            start: Some(re(r"\|[^=]")),
            stop: Some(StopSpec::Pattern(cell_stop())),
            hint: Hint::Chars(&['|']),
            contains: Some(ALL_INLINE),
            filter: Some(FilterKind::TableCell),
            open: "        <td>",
            close: "</td>\n",
            ..spec(ChunkKind::TableCell)
        },
        ChunkSpec {
            start: Some(re(r"\|=")),
            stop: Some(StopSpec::Pattern(cell_stop())),
            hint: Hint::Chars(&['|']),
            contains: Some(ALL_INLINE),
            filter: Some(FilterKind::TableHeader),
            open: "        <th>",
            close: "</th>\n",
            ..spec(ChunkKind::TableHeader)
        },
        ChunkSpec {
            start: Some(re(r"(?:`| *)\*[^*]")),
            boundary: Some(ahead(re(r"\n(?:`| *)\*[^*]"))),
            stop: Some(StopSpec::Terminators(LIST_STOPS)),
            hint: Hint::Chars(&['*', ' ']),
            contains: Some(LIST_CONTAINS),
            filter: Some(FilterKind::List),
            open: "<ul>\n",
            close: "</ul>\n",
            ..spec(ChunkKind::UnorderedList)
        },
        ChunkSpec {
            start: Some(re(r"(?:`| *)#[^#]")),
            boundary: Some(ahead(re(r"\n(?:`| *)#[^#]"))),
            stop: Some(StopSpec::Terminators(LIST_STOPS)),
            hint: Hint::Chars(&['#', ' ']),
            contains: Some(LIST_CONTAINS),
            filter: Some(FilterKind::List),
            open: "<ol>\n",
            close: "</ol>\n",
            ..spec(ChunkKind::OrderedList)
        },
        ChunkSpec {
            start: Some(re(r"`[^*#]")),
            boundary: Some(seq(vec![re(r"\n"), ahead(re(r"`[^*#]"))])),
            stop: Some(StopSpec::Pattern(seq(vec![re(r"\n"), ahead(re("`"))]))),
            hint: Hint::Chars(&['`']),
            contains: Some(ALL_INLINE),
            filter: Some(FilterKind::ListItem),
            open: "    <li>",
            close: "</li>\n",
            ..spec(ChunkKind::ListItem)
        },
        ChunkSpec {
            start: Some(re(r"\{\{\{ *\n")),
            boundary: Some(seq(vec![re(r"\n"), ahead(re(r"\{\{\{ *\n"))])),
            stop: Some(StopSpec::Pattern(re(&format!(r"\n\}}\}}\}} *(?:{EOL})")))),
            hint: Hint::Chars(&['{']),
            filter: Some(FilterKind::Nowiki),
            open: "<pre>",
            close: "</pre>\n\n",
            ..spec(ChunkKind::NowikiBlock)
        },
        ChunkSpec {
            start: Some(re(&format!(" *-{{4,}} *(?:{EOL})"))),
            boundary: Some(seq(vec![
                re(r"\n"),
                ahead(re(&format!(" *-{{4,}} *(?:{EOL})"))),
            ])),
            stop: Some(StopSpec::Pattern(re(EOL))),
            hint: Hint::Chars(&['-', ' ']),
            filter: Some(FilterKind::Constant("")),
            open: "<hr />\n\n",
            ..spec(ChunkKind::HorizontalRule)
        },
        // Matches any heading at a line start; used only in terminator unions.
        ChunkSpec {
            start: Some(seq(vec![alt(vec![bol(), re(r"\n")]), re(" *=")])),
            ..spec(ChunkKind::AnyHeading)
        },
        heading(ChunkKind::H1, r" *=[^=]", "<h1>", "</h1>\n\n"),
        heading(ChunkKind::H2, r" *={2}[^=]", "<h2>", "</h2>\n\n"),
        heading(ChunkKind::H3, r" *={3}[^=]", "<h3>", "</h3>\n\n"),
        heading(ChunkKind::H4, r" *={4}[^=]", "<h4>", "</h4>\n\n"),
        heading(ChunkKind::H5, r" *={5}[^=]", "<h5>", "</h5>\n\n"),
        heading(ChunkKind::H6, r" *={6,}", "<h6>", "</h6>\n\n"),
        ChunkSpec {
            start: Some(re(r"[^*/_,\^\\{\[<|]")),
            stop: Some(StopSpec::Terminators(INLINE)),
            hint: Hint::Plain,
            ..spec(ChunkKind::Plain)
        },
        // Catch-all: any single character can begin opaque text.
        ChunkSpec {
            start: Some(re(r".")),
            stop: Some(StopSpec::Terminators(INLINE)),
            ..spec(ChunkKind::Any)
        },
        ChunkSpec {
            start: Some(re(r"\\\\")),
            stop: Some(StopSpec::Pattern(re(r"\\\\"))),
            hint: Hint::Chars(&['\\']),
            filter: Some(FilterKind::Constant("")),
            open: "<br />",
            ..spec(ChunkKind::LineBreak)
        },
        ChunkSpec {
            start: Some(re(r"~\S")),
            stop: Some(StopSpec::Pattern(re(r"~."))),
            hint: Hint::Chars(&['~']),
            filter: Some(FilterKind::EscapeChar),
            ..spec(ChunkKind::Escape)
        },
        ChunkSpec {
            start: Some(re(r"\{{3}.*?\}*\}{3}")),
            stop: Some(StopSpec::Pattern(re(r".*?\}*\}{3}"))),
            hint: Hint::Chars(&['{']),
            filter: Some(FilterKind::Nowiki),
            open: "<tt>",
            close: "</tt>",
            ..spec(ChunkKind::NowikiInline)
        },
        ChunkSpec {
            start: Some(re(r"<{3}.*?>*>{3}")),
            stop: Some(StopSpec::Pattern(re(r".*?>*>{3}"))),
            hint: Hint::Chars(&['<']),
            filter: Some(FilterKind::Plugin { angles: 3 }),
            ..spec(ChunkKind::PluginTriple)
        },
        ChunkSpec {
            start: Some(re(r"<{2}.*?>*>{2}")),
            stop: Some(StopSpec::Pattern(re(r".*?>*>{2}"))),
            hint: Hint::Chars(&['<']),
            filter: Some(FilterKind::Plugin { angles: 2 }),
            ..spec(ChunkKind::PluginDouble)
        },
        ChunkSpec {
            start: Some(re(r"(?:https?|ftp)://")),
            stop: Some(StopSpec::Pattern(ahead(re(r"[[:punct:]]?(?:\s|\z)")))),
            hint: Hint::Chars(&['h', 'f']),
            filter: Some(FilterKind::BareLink),
            open: "<a ",
            close: "</a>",
            ..spec(ChunkKind::BareLink)
        },
        ChunkSpec {
            start: Some(re(r"\[\[[^\n]+?\]\]")),
            stop: Some(StopSpec::Pattern(re(r"\]\]"))),
            hint: Hint::Chars(&['[']),
            contains: Some(LINK_CONTAINS),
            filter: Some(FilterKind::Link),
            open: "<a ",
            close: "</a>",
            ..spec(ChunkKind::Link)
        },
        ChunkSpec {
            start: Some(re(r"[^|]")),
            stop: Some(StopSpec::Pattern(ahead(re(r"\|")))),
            filter: Some(FilterKind::LinkTarget),
            open: "href=\"",
            close: "\">",
            ..spec(ChunkKind::LinkTarget)
        },
        ChunkSpec {
            start: Some(re(r"\|")),
            stop: Some(StopSpec::Pattern(re(r"\n"))),
            hint: Hint::Chars(&['|']),
            contains: Some(ALL_INLINE),
            filter: Some(FilterKind::LinkText),
            ..spec(ChunkKind::LinkText)
        },
        ChunkSpec {
            start: Some(re(r"\{\{[^{][^\n]*?\}\}")),
            stop: Some(StopSpec::Pattern(re(r"\}\}"))),
            hint: Hint::Chars(&['{']),
            contains: Some(IMAGE_CONTAINS),
            filter: Some(FilterKind::Image),
            open: "<img ",
            close: " />",
            ..spec(ChunkKind::Image)
        },
        ChunkSpec {
            start: Some(re(r"[^|]")),
            stop: Some(StopSpec::Pattern(ahead(re(r"\|")))),
            filter: Some(FilterKind::ImageSrc),
            open: "src=\"",
            close: "\"",
            ..spec(ChunkKind::ImageSrc)
        },
        ChunkSpec {
            start: Some(re(r"\|")),
            stop: Some(StopSpec::Pattern(re(r"\n"))),
            hint: Hint::Chars(&['|']),
            filter: Some(FilterKind::ImageAlt),
            open: " alt=\"",
            close: "\"",
            ..spec(ChunkKind::ImageAlt)
        },
        inline_span(ChunkKind::Strong, r"\*\*", r"\*\*.*?\*\*", "**", "<strong>", "</strong>", &['*']),
        // `[^:]` keeps the `//` of a bare URL from closing an emphasis span.
        inline_span(ChunkKind::Em, r"//", r"//.*?[^:]//", "//", "<em>", "</em>", &['/']),
        inline_span(ChunkKind::Mono, r"##", r"##.*?##", "##", "<tt>", "</tt>", &['#']),
        inline_span(ChunkKind::Sub, r",,", r",,.*?,,", ",,", "<sub>", "</sub>", &[',']),
        inline_span(ChunkKind::Sup, r"\^\^", r"\^\^.*?\^\^", "^^", "<sup>", "</sup>", &['^']),
        inline_span(ChunkKind::Underline, r"__", r"__.*?__", "__", "<u>", "</u>", &['_']),
        ChunkSpec {
            // An ampersand that does not already open a character entity.
            start: Some(seq(vec![re("&"), not_ahead(re(r"\w+;"))])),
            stop: Some(StopSpec::Pattern(re(r"."))),
            hint: Hint::Chars(&['&']),
            filter: Some(FilterKind::Constant("&amp;")),
            ..spec(ChunkKind::Amp)
        },
        entity(ChunkKind::Trademark, r"\(TM\)", "&trade;", &['(']),
        entity(ChunkKind::Registered, r"\(R\)", "&reg;", &['(']),
        entity(ChunkKind::Copyright, r"\(C\)", "&copy;", &['(']),
        entity(ChunkKind::Ndash, r"--", "&ndash;", &['-']),
        entity(ChunkKind::Ellipsis, r"\.\.\.", "&hellip;", &['.']),
    ]
}

fn heading(
    kind: ChunkKind,
    start: &str,
    open: &'static str,
    close: &'static str,
) -> ChunkSpec {
    ChunkSpec {
        start: Some(re(start)),
        stop: Some(StopSpec::Pattern(re(r"\n"))),
        hint: Hint::Chars(&['=', ' ']),
        contains: Some(ALL_INLINE),
        filter: Some(FilterKind::Heading),
        open,
        close,
        ..spec(kind)
    }
}

#[allow(clippy::too_many_arguments)]
fn inline_span(
    kind: ChunkKind,
    start: &str,
    stop: &str,
    marker: &'static str,
    open: &'static str,
    close: &'static str,
    hint: &'static [char],
) -> ChunkSpec {
    ChunkSpec {
        start: Some(re(start)),
        stop: Some(StopSpec::Pattern(re(stop))),
        hint: Hint::Chars(hint),
        contains: Some(ALL_INLINE),
        filter: Some(FilterKind::InlineSpan(marker)),
        open,
        close,
        ..spec(kind)
    }
}

fn entity(
    kind: ChunkKind,
    pattern: &str,
    replacement: &'static str,
    hint: &'static [char],
) -> ChunkSpec {
    ChunkSpec {
        start: Some(re(pattern)),
        stop: Some(StopSpec::Pattern(re(pattern))),
        hint: Hint::Chars(hint),
        filter: Some(FilterKind::Constant(replacement)),
        ..spec(kind)
    }
}
