//! Per-converter customization: wrapper-markup overrides and the rewriter
//! extension points.
//!
//! The compiled grammar is shared, immutable state; everything a caller may
//! change lives in a sparse [`Overlay`] consulted at render time. Rewriters
//! are injected into the engine through the [`Rewriter`] trait rather than
//! held as process globals, so two converters never observe each other's
//! configuration.

use std::collections::{HashMap, HashSet};

use crate::filters::FilterKind;
use crate::grammar::ChunkKind;

/// Which side of a chunk's wrapper markup to replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupSide {
    Open,
    Close,
}

type RewriteFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Extension points consulted during filtering. `None` means "not handled":
/// built-in rendering applies unchanged.
pub(crate) trait Rewriter {
    fn rewrite_link(&self, target: &str) -> Option<String> {
        let _ = target;
        None
    }

    fn rewrite_bare_link(&self, url: &str) -> Option<String> {
        let _ = url;
        None
    }

    fn rewrite_image(&self, src: &str) -> Option<String> {
        let _ = src;
        None
    }

    fn rewrite_plugin(&self, body: &str) -> Option<String> {
        let _ = body;
        None
    }
}

/// Four independently installable callback slots.
#[derive(Default)]
pub(crate) struct Callbacks {
    pub link: Option<RewriteFn>,
    pub bare_link: Option<RewriteFn>,
    pub image: Option<RewriteFn>,
    pub plugin: Option<RewriteFn>,
}

impl Rewriter for Callbacks {
    fn rewrite_link(&self, target: &str) -> Option<String> {
        self.link.as_ref().map(|f| f(target))
    }

    fn rewrite_bare_link(&self, url: &str) -> Option<String> {
        self.bare_link.as_ref().map(|f| f(url))
    }

    fn rewrite_image(&self, src: &str) -> Option<String> {
        self.image.as_ref().map(|f| f(src))
    }

    fn rewrite_plugin(&self, body: &str) -> Option<String> {
        self.plugin.as_ref().map(|f| f(body))
    }
}

/// Sparse per-converter overrides layered over the compiled grammar.
#[derive(Debug, Default)]
pub(crate) struct Overlay {
    open: HashMap<ChunkKind, String>,
    close: HashMap<ChunkKind, String>,
    filter: HashMap<ChunkKind, FilterKind>,
    no_recurse: HashSet<ChunkKind>,
}

impl Overlay {
    pub(crate) fn set_open(&mut self, kind: ChunkKind, markup: String) {
        self.open.insert(kind, markup);
    }

    pub(crate) fn set_close(&mut self, kind: ChunkKind, markup: String) {
        self.close.insert(kind, markup);
    }

    pub(crate) fn open_for<'a>(&'a self, kind: ChunkKind, default: &'a str) -> &'a str {
        self.open.get(&kind).map_or(default, String::as_str)
    }

    pub(crate) fn close_for<'a>(&'a self, kind: ChunkKind, default: &'a str) -> &'a str {
        self.close.get(&kind).map_or(default, String::as_str)
    }

    pub(crate) fn set_filter(&mut self, kind: ChunkKind, filter: FilterKind) {
        self.filter.insert(kind, filter);
    }

    pub(crate) fn filter_for(&self, kind: ChunkKind) -> Option<FilterKind> {
        self.filter.get(&kind).copied()
    }

    pub(crate) fn suppress_recursion(&mut self, kind: ChunkKind) {
        self.no_recurse.insert(kind);
    }

    pub(crate) fn recursion_suppressed(&self, kind: ChunkKind) -> bool {
        self.no_recurse.contains(&kind)
    }
}
