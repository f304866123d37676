//! The public conversion surface.
//!
//! A [`Converter`] pairs the shared compiled grammar with its own
//! customization state. Configure it once, convert many times; distinct
//! converters are fully isolated from each other. The free functions
//! [`convert`] and [`convert_bytes`] cover the common no-customization case.

use crate::customize::{Callbacks, MarkupSide, Overlay};
use crate::engine;
use crate::filters::FilterKind;
use crate::grammar::{ChunkKind, grammar};

/// Converts Creole 1.0 markup to XHTML.
#[derive(Default)]
pub struct Converter {
    overlay: Overlay,
    callbacks: Callbacks,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert markup to XHTML. Empty input yields an empty string.
    pub fn convert(&self, markup: &str) -> String {
        if markup.is_empty() {
            return String::new();
        }
        engine::parse(grammar(), &self.overlay, &self.callbacks, markup, ChunkKind::Top)
    }

    /// Convert raw bytes; non-UTF-8 input yields an empty string rather than
    /// an error, matching the behavior for empty input.
    pub fn convert_bytes(&self, bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(markup) => self.convert(markup),
            Err(_) => String::new(),
        }
    }

    /// Rewrite `[[link]]` targets before they are emitted into `href`.
    pub fn set_link_rewriter<F>(&mut self, rewrite: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.callbacks.link = Some(Box::new(rewrite));
    }

    pub fn clear_link_rewriter(&mut self) {
        self.callbacks.link = None;
    }

    /// Rewrite bare `http://`/`ftp://` URLs.
    pub fn set_bare_link_rewriter<F>(&mut self, rewrite: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.callbacks.bare_link = Some(Box::new(rewrite));
    }

    pub fn clear_bare_link_rewriter(&mut self) {
        self.callbacks.bare_link = None;
    }

    /// Rewrite `{{image}}` sources before they are emitted into `src`.
    pub fn set_image_rewriter<F>(&mut self, rewrite: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.callbacks.image = Some(Box::new(rewrite));
    }

    pub fn clear_image_rewriter(&mut self) {
        self.callbacks.image = None;
    }

    /// Receive the body of `<<…>>` and `<<<…>>>` plugin markup and return
    /// the text to emit. Without a rewriter the delimiters and body pass
    /// through unchanged.
    pub fn set_plugin_rewriter<F>(&mut self, rewrite: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.callbacks.plugin = Some(Box::new(rewrite));
    }

    pub fn clear_plugin_rewriter(&mut self) {
        self.callbacks.plugin = None;
    }

    /// Replace one side of a chunk's wrapper markup for this converter.
    pub fn override_markup(
        &mut self,
        kind: ChunkKind,
        side: MarkupSide,
        markup: impl Into<String>,
    ) {
        match side {
            MarkupSide::Open => self.overlay.set_open(kind, markup.into()),
            MarkupSide::Close => self.overlay.set_close(kind, markup.into()),
        }
    }

    /// Drop the built-in `<a href=…>` rendering for `[[…]]` links and hand
    /// each raw `[[…]]` span to the link rewriter instead.
    pub fn use_custom_links(&mut self) {
        for kind in [ChunkKind::Link, ChunkKind::LinkTarget] {
            self.overlay.set_open(kind, String::new());
            self.overlay.set_close(kind, String::new());
        }
        self.overlay.set_filter(ChunkKind::Link, FilterKind::LinkCallbackOnly);
        self.overlay.suppress_recursion(ChunkKind::Link);
    }

    /// Drop the built-in anchor rendering for bare URLs and hand each URL to
    /// the bare-link rewriter instead.
    pub fn use_custom_bare_links(&mut self) {
        self.overlay.set_open(ChunkKind::BareLink, String::new());
        self.overlay.set_close(ChunkKind::BareLink, String::new());
        self.overlay
            .set_filter(ChunkKind::BareLink, FilterKind::BareLinkCallbackOnly);
    }

    /// Drop the built-in `<img …>` rendering and hand each raw `{{…}}` span
    /// to the image rewriter instead.
    pub fn use_custom_images(&mut self) {
        self.overlay.set_open(ChunkKind::Image, String::new());
        self.overlay.set_close(ChunkKind::Image, String::new());
        self.overlay.set_filter(ChunkKind::Image, FilterKind::ImageCallbackOnly);
        self.overlay.suppress_recursion(ChunkKind::Image);
    }

    /// Diagnostic dump of every chunk kind's effective wrapper markup, one
    /// line per kind that emits a tag, newlines shown as `\n`.
    pub fn active_markup(&self) -> String {
        let grammar = grammar();
        let mut kinds = ChunkKind::ALL;
        kinds.sort_by_key(|kind| kind.name());

        let mut out = String::new();
        for kind in kinds {
            let chunk = grammar.chunk(kind);
            let open = self.overlay.open_for(kind, chunk.open);
            if !open.contains('<') {
                continue;
            }
            let close = self.overlay.close_for(kind, chunk.close);
            out.push_str(&format!(
                "{}: open({}) close({})\n",
                kind.name(),
                open.replace('\n', "\\n"),
                close.replace('\n', "\\n"),
            ));
        }
        out
    }
}

/// Convert markup to XHTML with the default configuration.
pub fn convert(markup: &str) -> String {
    Converter::new().convert(markup)
}

/// Convert raw bytes with the default configuration; non-UTF-8 input yields
/// an empty string.
pub fn convert_bytes(bytes: &[u8]) -> String {
    Converter::new().convert_bytes(bytes)
}
