//! One-time derivation of the runnable grammar from the declarative table.
//!
//! For every chunk: resolve the stop spec into a single matcher (an explicit
//! pattern, or the ordered union of each terminator's boundary pattern,
//! falling back to a zero-width wrap of its start pattern), and index every
//! container's contained kinds by their hint characters, preserving
//! declaration order. Also derives the plain-character set from the fixed
//! special-character list.

use std::collections::HashMap;

use super::table::{self, SPECIAL_CHARS};
use super::{ChunkKind, ChunkSpec, CompiledChunk, Grammar, Hint, StopSpec};
use crate::filters::FilterRegexes;
use crate::pattern::{Pat, ahead, alt};

pub(super) fn compile() -> Grammar {
    let specs = table::chunk_table();
    let by_kind: HashMap<ChunkKind, &ChunkSpec> = specs.iter().map(|s| (s.kind, s)).collect();
    let plain = plain_chars();

    let mut chunks = HashMap::new();
    for spec in &specs {
        let delim = spec.stop.as_ref().map(|stop| match stop {
            StopSpec::Pattern(pat) => pat.clone(),
            StopSpec::Terminators(kinds) => terminator_union(kinds, &by_kind),
        });

        let dispatch = match spec.contains {
            Some(kinds) => dispatch_index(kinds, &by_kind, &plain),
            None => HashMap::new(),
        };

        chunks.insert(
            spec.kind,
            CompiledChunk {
                start: spec.start.clone(),
                delim,
                scan: spec.scan,
                contains: spec.contains,
                dispatch,
                filter: spec.filter,
                open: spec.open,
                close: spec.close,
            },
        );
    }

    Grammar {
        chunks,
        filters: FilterRegexes::new(),
    }
}

/// Union of the patterns that interrupt a chunk, in stop-list order. A
/// terminator recognized only at a line start contributes its boundary
/// pattern; otherwise its start pattern, wrapped zero-width so the enclosing
/// chunk ends exactly where the terminator begins.
fn terminator_union(kinds: &[ChunkKind], by_kind: &HashMap<ChunkKind, &ChunkSpec>) -> Pat {
    let alts = kinds
        .iter()
        .map(|kind| {
            let spec = by_kind[kind];
            match &spec.boundary {
                Some(boundary) => boundary.clone(),
                None => ahead(
                    spec.start
                        .clone()
                        .expect("terminator kind must have a start pattern"),
                ),
            }
        })
        .collect();
    alt(alts)
}

/// Lead character → candidate kinds, in `contains` declaration order.
fn dispatch_index(
    kinds: &[ChunkKind],
    by_kind: &HashMap<ChunkKind, &ChunkSpec>,
    plain: &[char],
) -> HashMap<char, Vec<ChunkKind>> {
    let mut index: HashMap<char, Vec<ChunkKind>> = HashMap::new();
    for &kind in kinds {
        let hinted: &[char] = match &by_kind[&kind].hint {
            Hint::None => &[],
            Hint::Chars(chars) => chars,
            Hint::Plain => plain,
        };
        for &ch in hinted {
            index.entry(ch).or_default().push(kind);
        }
    }
    index
}

/// ASCII printable minus the special characters.
fn plain_chars() -> Vec<char> {
    (0x20u8..=0x7e)
        .map(char::from)
        .filter(|c| !SPECIAL_CHARS.contains(c))
        .collect()
}
