//! Anchored pattern matchers for the chunk grammar.
//!
//! Grammar patterns need two things the [`regex`] crate does not offer
//! directly: zero-width lookaround and a beginning-of-line test that knows
//! what precedes the anchor position. Both are expressed here as a small
//! combinator layer over anchored regexes. Consuming cores stay inside a
//! single [`Pat::Re`] node (compiled as `^(?s:…)` so `.` crosses newlines,
//! matching how the grammar was written); only the zero-width structure is
//! lifted into combinators.
//!
//! All positions are byte offsets on `char` boundaries.

use regex::Regex;

#[derive(Debug, Clone)]
pub(crate) enum Pat {
    /// Consuming regex, anchored at the test position.
    Re(Regex),
    /// Zero-width: position 0 or preceded by a newline.
    Bol,
    /// Zero-width lookahead.
    Ahead(Box<Pat>),
    /// Zero-width negative lookahead.
    NotAhead(Box<Pat>),
    /// All parts in order, each continuing where the previous ended.
    Seq(Vec<Pat>),
    /// First matching alternative wins.
    Alt(Vec<Pat>),
}

pub(crate) fn re(src: &str) -> Pat {
    let anchored = format!("^(?s:{src})");
    Pat::Re(Regex::new(&anchored).expect("grammar pattern must compile"))
}

pub(crate) fn bol() -> Pat {
    Pat::Bol
}

pub(crate) fn ahead(inner: Pat) -> Pat {
    Pat::Ahead(Box::new(inner))
}

pub(crate) fn not_ahead(inner: Pat) -> Pat {
    Pat::NotAhead(Box::new(inner))
}

pub(crate) fn seq(parts: Vec<Pat>) -> Pat {
    Pat::Seq(parts)
}

pub(crate) fn alt(alts: Vec<Pat>) -> Pat {
    Pat::Alt(alts)
}

impl Pat {
    /// Match anchored at `pos`. Returns the end offset of the consumed text
    /// (equal to `pos` for zero-width matches).
    pub(crate) fn match_at(&self, text: &str, pos: usize) -> Option<usize> {
        match self {
            Pat::Re(re) => re.find(&text[pos..]).map(|m| pos + m.end()),
            Pat::Bol => (pos == 0 || text.as_bytes()[pos - 1] == b'\n').then_some(pos),
            Pat::Ahead(inner) => inner.match_at(text, pos).map(|_| pos),
            Pat::NotAhead(inner) => inner.match_at(text, pos).is_none().then_some(pos),
            Pat::Alt(alts) => alts.iter().find_map(|a| a.match_at(text, pos)),
            Pat::Seq(parts) => match_seq(parts, text, pos),
        }
    }
}

/// A branch of an alternative may match here and yet leave the remainder of
/// the sequence unable to match; a later branch must then be tried. Sequences
/// therefore thread the rest of the sequence through each branch.
fn match_seq(parts: &[Pat], text: &str, pos: usize) -> Option<usize> {
    let Some((head, rest)) = parts.split_first() else {
        return Some(pos);
    };
    match head {
        Pat::Alt(alts) => alts
            .iter()
            .find_map(|a| a.match_at(text, pos).and_then(|end| match_seq(rest, text, end))),
        _ => head
            .match_at(text, pos)
            .and_then(|end| match_seq(rest, text, end)),
    }
}

/// Leftmost match at or after `from`. Returns `(start, end)`.
pub(crate) fn find_forward(pat: &Pat, text: &str, from: usize) -> Option<(usize, usize)> {
    scan_positions(text, from).find_map(|start| pat.match_at(text, start).map(|end| (start, end)))
}

/// Rightmost match at or after `from`. Returns `(start, end)`.
///
/// This is the "consume as much as possible, then find the marker" search:
/// equivalent to a greedy `.*` prefix in front of the pattern.
pub(crate) fn find_rightmost(pat: &Pat, text: &str, from: usize) -> Option<(usize, usize)> {
    let positions: Vec<usize> = scan_positions(text, from).collect();
    positions
        .into_iter()
        .rev()
        .find_map(|start| pat.match_at(text, start).map(|end| (start, end)))
}

/// Every char boundary from `from` to the end of `text`, inclusive.
fn scan_positions(text: &str, from: usize) -> impl Iterator<Item = usize> + '_ {
    text[from..]
        .char_indices()
        .map(move |(i, _)| from + i)
        .chain(std::iter::once(text.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_is_anchored() {
        let p = re(r"\*\*");
        assert_eq!(p.match_at("**x", 0), Some(2));
        assert_eq!(p.match_at("x**", 0), None);
        assert_eq!(p.match_at("x**", 1), Some(3));
    }

    #[test]
    fn dot_crosses_newlines() {
        let p = re(r"\*\*.*?\*\*");
        assert_eq!(p.match_at("**a\nb**c", 0), Some(7));
    }

    #[test]
    fn bol_checks_preceding_byte() {
        let p = bol();
        assert_eq!(p.match_at("ab", 0), Some(0));
        assert_eq!(p.match_at("ab", 1), None);
        assert_eq!(p.match_at("a\nb", 2), Some(2));
    }

    #[test]
    fn ahead_is_zero_width() {
        let p = seq(vec![re(r"\n"), ahead(re(":"))]);
        assert_eq!(p.match_at("a\n:b", 1), Some(2));
        assert_eq!(p.match_at("a\nb", 1), None);
    }

    #[test]
    fn not_ahead_rejects() {
        // An ampersand that does not open a character entity.
        let p = seq(vec![re("&"), not_ahead(re(r"\w+;"))]);
        assert_eq!(p.match_at("AT&T", 2), Some(3));
        assert_eq!(p.match_at("&amp; x", 0), None);
    }

    #[test]
    fn alternative_retried_for_sequence_remainder() {
        // Line-start-or-newline followed by an equals run: at a position that
        // is both preceded by a newline and sitting on one, the newline
        // branch must be consumed before the run can match.
        let p = seq(vec![alt(vec![bol(), re(r"\n")]), re(" *=")]);
        assert_eq!(p.match_at("\n\n= x", 1), Some(3));
    }

    #[test]
    fn find_forward_is_leftmost() {
        let p = ahead(re(r"\S"));
        assert_eq!(find_forward(&p, " \n x", 0), Some((3, 3)));
        assert_eq!(find_forward(&p, "   ", 0), None);
    }

    #[test]
    fn find_rightmost_prefers_later_starts() {
        let p = ahead(re(":"));
        assert_eq!(find_rightmost(&p, ": a : b", 0), Some((4, 4)));
        assert_eq!(find_rightmost(&p, ": a : b", 5), None);
    }

    #[test]
    fn end_of_text_is_scanned() {
        let p = re(r"\n|\z");
        assert_eq!(find_forward(&p, "----", 0), Some((4, 4)));
    }
}
