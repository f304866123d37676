//! The recursive parse engine and its dispatch resolver.
//!
//! One generic loop serves every construct: identify the chunk beginning at
//! the cursor (a zero-width test), search forward for where it ends, filter
//! the raw span, recurse into it if its kind contains nested content, and
//! wrap the result in the kind's markup. Identification and extent are
//! deliberately decoupled: the same loop handles chunks that close
//! themselves (explicit delimiters) and chunks that close because something
//! else begins (structural boundaries).

use crate::customize::{Overlay, Rewriter};
use crate::filters;
use crate::grammar::{ChunkKind, CompiledChunk, Grammar, ScanMode};
use crate::pattern::{find_forward, find_rightmost};

/// Parse `text` under the grammar of `context`, accumulating HTML.
pub(crate) fn parse(
    grammar: &Grammar,
    overlay: &Overlay,
    rewriter: &dyn Rewriter,
    text: &str,
    context: ChunkKind,
) -> String {
    let mut html = String::new();
    let mut pos = 0;

    while pos < text.len() {
        let kind = resolve(grammar, text, context, pos).unwrap_or_else(|| {
            // Reachable only if the static table loses a catch-all kind.
            unreachable!(
                "no chunk type in {} context matches at byte {pos}",
                context.name()
            )
        });
        let chunk = grammar.chunk(kind);

        let end = chunk_end(chunk, text, pos);
        let raw = &text[pos..end];
        pos = end;

        let content = match overlay.filter_for(kind).or(chunk.filter) {
            Some(filter) => filters::apply(filter, raw, rewriter, &grammar.filters),
            None => raw.to_string(),
        };

        html.push_str(overlay.open_for(kind, chunk.open));
        if chunk.contains.is_some() && !overlay.recursion_suppressed(kind) {
            html.push_str(&parse(grammar, overlay, rewriter, &content, kind));
        } else {
            html.push_str(&content);
        }
        html.push_str(overlay.close_for(kind, chunk.close));
    }

    html
}

/// Identify which chunk kind begins at `pos` inside `context`.
///
/// Two phases: the hint index for the lead character (an optimization, not a
/// proof — every candidate is still verified against its start matcher),
/// then the full `contains` list in declaration order.
pub(crate) fn resolve(
    grammar: &Grammar,
    text: &str,
    context: ChunkKind,
    pos: usize,
) -> Option<ChunkKind> {
    let container = grammar.chunk(context);
    let first = text[pos..].chars().next()?;

    if let Some(candidates) = container.dispatch.get(&first) {
        for &kind in candidates {
            if starts_at(grammar, kind, text, pos) {
                return Some(kind);
            }
        }
    }

    for &kind in container.contains? {
        if starts_at(grammar, kind, text, pos) {
            return Some(kind);
        }
    }

    None
}

fn starts_at(grammar: &Grammar, kind: ChunkKind, text: &str, pos: usize) -> bool {
    grammar
        .chunk(kind)
        .start
        .as_ref()
        .is_some_and(|pat| pat.match_at(text, pos).is_some())
}

/// Where the chunk starting at `start` ends. No stop match means the content
/// runs to the end of the text.
fn chunk_end(chunk: &CompiledChunk, text: &str, start: usize) -> usize {
    let Some(delim) = &chunk.delim else {
        return text.len();
    };
    match chunk.scan {
        ScanMode::Leftmost => match find_forward(delim, text, start) {
            Some((_, end)) if end > start => end,
            Some(_) => {
                // A zero-width stop at the chunk's own start cannot
                // terminate it; re-search strictly past it.
                let next = start + text[start..].chars().next().map_or(1, char::len_utf8);
                find_forward(delim, text, next)
                    .map(|(_, end)| end)
                    .unwrap_or(text.len())
            }
            None => text.len(),
        },
        ScanMode::GreedyRightmost => {
            // The delimiter can match at the very position the chunk begins;
            // keep re-searching from the far end until the end offset stops
            // advancing. A chunk that never advances runs to end of text.
            let mut pos = start;
            while let Some((_, end)) = find_rightmost(delim, text, pos) {
                if end == pos {
                    break;
                }
                pos = end;
            }
            if pos == start { text.len() } else { pos }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::grammar;

    fn resolve_at(text: &str, context: ChunkKind, pos: usize) -> Option<ChunkKind> {
        resolve(grammar(), text, context, pos)
    }

    #[test]
    fn identifies_chunks_by_position() {
        let text = "//Hello// **Hello**";
        assert_eq!(resolve_at(text, ChunkKind::Top, 0), Some(ChunkKind::Paragraph));
        assert_eq!(resolve_at(text, ChunkKind::Paragraph, 0), Some(ChunkKind::Em));
        assert_eq!(resolve_at(text, ChunkKind::Paragraph, 9), Some(ChunkKind::Plain));
        assert_eq!(resolve_at(text, ChunkKind::Paragraph, 10), Some(ChunkKind::Strong));
    }

    #[test]
    fn blocks_resolve_at_top() {
        assert_eq!(resolve_at("= head", ChunkKind::Top, 0), Some(ChunkKind::H1));
        assert_eq!(resolve_at("== head", ChunkKind::Top, 0), Some(ChunkKind::H2));
        assert_eq!(resolve_at("----", ChunkKind::Top, 0), Some(ChunkKind::HorizontalRule));
        assert_eq!(resolve_at("* item", ChunkKind::Top, 0), Some(ChunkKind::UnorderedList));
        assert_eq!(resolve_at("# item", ChunkKind::Top, 0), Some(ChunkKind::OrderedList));
        assert_eq!(resolve_at("| a |", ChunkKind::Top, 0), Some(ChunkKind::Table));
        assert_eq!(resolve_at(";t:d", ChunkKind::Top, 0), Some(ChunkKind::DefList));
        assert_eq!(resolve_at(":ind", ChunkKind::Top, 0), Some(ChunkKind::IndentPara));
        assert_eq!(resolve_at("{{{ \nx", ChunkKind::Top, 0), Some(ChunkKind::NowikiBlock));
    }

    #[test]
    fn failed_hints_fall_back_to_the_contains_scan() {
        // A lone `*` is not strong markup; the catch-all picks it up.
        assert_eq!(resolve_at("*x", ChunkKind::Paragraph, 0), Some(ChunkKind::Any));
        // `(x)` is not an entity; `(` is not a plain character either.
        assert_eq!(resolve_at("(x)", ChunkKind::Paragraph, 0), Some(ChunkKind::Plain));
    }

    #[test]
    fn ampersand_entity_suppresses_amp_chunk() {
        assert_eq!(resolve_at("&amp; x", ChunkKind::Paragraph, 0), Some(ChunkKind::Plain));
        assert_eq!(resolve_at("&& x", ChunkKind::Paragraph, 0), Some(ChunkKind::Amp));
    }

    #[test]
    fn hr_requires_four_dashes() {
        assert_eq!(resolve_at("--- x", ChunkKind::Top, 0), Some(ChunkKind::Paragraph));
        assert_eq!(resolve_at("---- ", ChunkKind::Top, 0), Some(ChunkKind::HorizontalRule));
    }
}
