//! Per-chunk text transformations, applied to each matched span before
//! recursion or emission.
//!
//! Every transformation is named by a [`FilterKind`] carried in the grammar
//! table and interpreted here, so the table stays plain data. Trailing-strip
//! operations use first-match line-end semantics (`(?m)…$`, replace first):
//! on multi-line content they act at the first line end, which is what the
//! grammar's block extents rely on.

use regex::Regex;

use crate::customize::Rewriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterKind {
    /// Replace the span with a fixed string (possibly empty): blanks and
    /// rules vanish, entities substitute.
    Constant(&'static str),
    /// Strip one trailing line ending.
    Chomp,
    /// Strip leading/trailing `=` runs and surrounding whitespace.
    Heading,
    /// Normalize list marker runs to the internal backtick marker, so
    /// nesting depth is re-derived by recursion instead of marker counting.
    List,
    ListItem,
    IndentPara,
    DefTerm,
    DefDef,
    TableRow,
    TableCell,
    TableHeader,
    /// Strip the `{{{`/`}}}` fence and escape `&`, `<`, `>`.
    Nowiki,
    /// Drop the `~`, keep the escaped character literally.
    EscapeChar,
    /// `<<…>>`/`<<<…>>>`: strip delimiters and hand the body to the plugin
    /// rewriter; without one, delimiters and content pass through unchanged.
    Plugin { angles: usize },
    /// Strip a two-character marker pair (`**`, `//`, …) off both ends.
    InlineSpan(&'static str),
    Link,
    LinkTarget,
    LinkText,
    BareLink,
    Image,
    ImageAlt,
    ImageSrc,
    /// Callback-only modes installed by the customization surface: the raw
    /// span goes straight to the rewriter.
    LinkCallbackOnly,
    BareLinkCallbackOnly,
    ImageCallbackOnly,
}

/// Precompiled filter regexes, built once with the grammar.
#[derive(Debug)]
pub(crate) struct FilterRegexes {
    heading_lead: Regex,
    heading_trail: Regex,
    list_first: Regex,
    list_rest: Regex,
    item_lead: Regex,
    dt_lead: Regex,
    dd_lead: Regex,
    lead_ws: Regex,
    trail_ws: Regex,
    row_lead: Regex,
    row_trail: Regex,
    cell_lead: Regex,
    header_lead: Regex,
    fence_trail: Regex,
    pipe_lead: Regex,
}

impl FilterRegexes {
    pub(crate) fn new() -> Self {
        let rx = |src: &str| Regex::new(src).expect("filter pattern must compile");
        Self {
            heading_lead: rx(r"^\s*=*\s*"),
            heading_trail: rx(r"(?m)\s*=*\s*$"),
            list_first: rx(r"(?:`*| *)[*#]"),
            list_rest: rx(r"\n(?:`*| *)[*#]"),
            item_lead: rx(r"` *"),
            dt_lead: rx(r"(?m)^;\s*"),
            dd_lead: rx(r"(?:\n|:)\s*"),
            lead_ws: rx(r"^\s*"),
            trail_ws: rx(r"(?m)\s*$"),
            row_lead: rx(r"(?m)^ *"),
            row_trail: rx(r"(?m)\| *$"),
            cell_lead: rx(r"(?m)^ *\| *"),
            header_lead: rx(r"(?m)^ *\|= *"),
            fence_trail: rx(r"(?m)\}{3}\s*$"),
            pipe_lead: rx(r"(?m)^\|\s*"),
        }
    }

    fn trim(&self, s: &str) -> String {
        let s = self.lead_ws.replace(s, "");
        self.trail_ws.replace(&s, "").into_owned()
    }
}

pub(crate) fn apply(
    kind: FilterKind,
    raw: &str,
    rewriter: &dyn Rewriter,
    rx: &FilterRegexes,
) -> String {
    match kind {
        FilterKind::Constant(text) => text.to_string(),
        FilterKind::Chomp => chomp(raw).to_string(),
        FilterKind::Heading => {
            let s = rx.heading_lead.replace(raw, "");
            rx.heading_trail.replace(&s, "").into_owned()
        }
        FilterKind::List => {
            let s = rx.list_first.replace(raw, "`");
            rx.list_rest.replace_all(&s, "\n`").into_owned()
        }
        FilterKind::ListItem => chomp(&rx.item_lead.replace(raw, "")).to_string(),
        FilterKind::IndentPara => raw.replacen(':', "", 1).replacen("\n:", "\n", 1),
        FilterKind::DefTerm => rx.dt_lead.replace(raw, "").into_owned(),
        FilterKind::DefDef => {
            let s = rx.dd_lead.replace(raw, "");
            rx.trail_ws.replace(&s, "").into_owned()
        }
        FilterKind::TableRow => {
            let s = rx.row_lead.replace(raw, "");
            rx.row_trail.replace(&s, "").into_owned()
        }
        FilterKind::TableCell => {
            let s = rx.cell_lead.replace(raw, "");
            rx.trail_ws.replace(&s, "").into_owned()
        }
        FilterKind::TableHeader => {
            let s = rx.header_lead.replace(raw, "");
            rx.trail_ws.replace(&s, "").into_owned()
        }
        FilterKind::Nowiki => {
            let s = drop_chars(raw, 3);
            let s = rx.fence_trail.replace(&s, "");
            html_escape::encode_text(&s).into_owned()
        }
        FilterKind::EscapeChar => drop_chars(raw, 1).to_string(),
        FilterKind::Plugin { angles } => {
            let close = if angles == 3 { ">>>" } else { ">>" };
            let body = strip_trailing_marker(drop_chars(raw, angles), close);
            match rewriter.rewrite_plugin(&body) {
                Some(out) => out,
                None if angles == 3 => format!("<<<{body}>>>"),
                None => format!("<<{body}>>"),
            }
        }
        FilterKind::InlineSpan(marker) => {
            strip_trailing_marker(drop_chars(raw, marker.chars().count()), marker)
        }
        FilterKind::Link => {
            let s = drop_last_chars(drop_chars(raw, 2), 2);
            // Display text defaults to the target.
            if s.contains('|') {
                s.to_string()
            } else {
                format!("{s}|{s}")
            }
        }
        FilterKind::LinkTarget => {
            let s = rx.trim(raw);
            rewriter.rewrite_link(&s).unwrap_or(s)
        }
        FilterKind::LinkText => {
            let s = rx.pipe_lead.replace(raw, "");
            rx.trail_ws.replace(&s, "").into_owned()
        }
        FilterKind::BareLink => {
            let s = rx.trim(raw);
            let s = rewriter.rewrite_bare_link(&s).unwrap_or(s);
            format!("href=\"{s}\">{s}")
        }
        FilterKind::Image => strip_trailing_marker(drop_chars(raw, 2), "}}"),
        FilterKind::ImageAlt => {
            let s = rx.pipe_lead.replace(raw, "");
            rx.trail_ws.replace(&s, "").into_owned()
        }
        FilterKind::ImageSrc => {
            let s = rx.pipe_lead.replace(raw, "");
            let s = rx.trail_ws.replace(&s, "").into_owned();
            rewriter.rewrite_image(&s).unwrap_or(s)
        }
        FilterKind::LinkCallbackOnly => rewriter
            .rewrite_link(raw)
            .unwrap_or_else(|| raw.to_string()),
        FilterKind::BareLinkCallbackOnly => rewriter
            .rewrite_bare_link(raw)
            .unwrap_or_else(|| raw.to_string()),
        FilterKind::ImageCallbackOnly => rewriter
            .rewrite_image(raw)
            .unwrap_or_else(|| raw.to_string()),
    }
}

/// Remove one trailing line ending.
fn chomp(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .or_else(|| s.strip_suffix('\r'))
        .unwrap_or(s)
}

fn drop_chars(s: &str, n: usize) -> &str {
    let mut chars = s.chars();
    for _ in 0..n {
        chars.next();
    }
    chars.as_str()
}

fn drop_last_chars(s: &str, n: usize) -> &str {
    let mut chars = s.chars();
    for _ in 0..n {
        chars.next_back();
    }
    chars.as_str()
}

/// Remove the first occurrence of `marker` that sits at a line end.
/// Occurrences may overlap (`a>>>>` holds two candidate `>>>`s), so every
/// byte position is a candidate.
fn strip_trailing_marker(s: &str, marker: &str) -> String {
    for i in 0..=s.len().saturating_sub(marker.len()) {
        if !s.is_char_boundary(i) || !s[i..].starts_with(marker) {
            continue;
        }
        let after = &s[i + marker.len()..];
        if after.is_empty() || after.starts_with('\n') {
            return format!("{}{}", &s[..i], after);
        }
    }
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customize::Callbacks;
    use crate::grammar::grammar;

    fn run(kind: FilterKind, raw: &str) -> String {
        apply(kind, raw, &Callbacks::default(), &grammar().filters)
    }

    #[test]
    fn heading_strips_markers_and_whitespace() {
        for raw in ["==head", " == head", "head ==", "head == ", "head  ", "  head", "  head  "] {
            assert_eq!(run(FilterKind::Heading, raw), "head");
        }
        assert_eq!(run(FilterKind::Heading, "=Heading ==="), "Heading");
    }

    #[test]
    fn list_normalizes_markers_to_backticks() {
        assert_eq!(run(FilterKind::List, " *head"), "`head");
        assert_eq!(run(FilterKind::List, "\n *head"), "\n`head");
        assert_eq!(run(FilterKind::List, "***head"), "`**head");
    }

    #[test]
    fn indent_para_drops_colon_markers() {
        assert_eq!(
            run(FilterKind::IndentPara, "a string with a : in it"),
            "a string with a  in it"
        );
    }

    #[test]
    fn chomp_removes_one_trailing_newline() {
        assert_eq!(
            run(FilterKind::Chomp, "a string with a newline\n"),
            "a string with a newline"
        );
    }

    #[test]
    fn def_def_trims_marker_and_whitespace() {
        assert_eq!(
            run(FilterKind::DefDef, "a string with a newline\n"),
            "a string with a newline"
        );
        assert_eq!(run(FilterKind::DefDef, ": def"), "def");
    }

    #[test]
    fn blank_goes_to_the_bit_bucket() {
        assert_eq!(run(FilterKind::Constant(""), "a non-blank string"), "");
    }

    #[test]
    fn nowiki_strips_fence_and_escapes() {
        assert_eq!(
            run(FilterKind::Nowiki, "{{{\na < b & c\n}}}"),
            "\na &lt; b &amp; c\n"
        );
        assert_eq!(run(FilterKind::Nowiki, "{{{tt}}}"), "tt");
    }

    #[test]
    fn inline_span_strips_marker_pair() {
        assert_eq!(run(FilterKind::InlineSpan("**"), "**bold**"), "bold");
        assert_eq!(run(FilterKind::InlineSpan("**"), "**unclosed"), "unclosed");
    }

    #[test]
    fn link_defaults_text_to_target() {
        assert_eq!(run(FilterKind::Link, "[[url]]"), "url|url");
        assert_eq!(run(FilterKind::Link, "[[url|text]]"), "url|text");
    }

    #[test]
    fn plugin_passes_through_without_rewriter() {
        assert_eq!(run(FilterKind::Plugin { angles: 2 }, "<<body>>"), "<<body>>");
        assert_eq!(
            run(FilterKind::Plugin { angles: 3 }, "<<<body>>>"),
            "<<<body>>>"
        );
    }

    #[test]
    fn escape_drops_the_tilde() {
        assert_eq!(run(FilterKind::EscapeChar, "~*"), "*");
    }
}
