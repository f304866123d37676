//! Wiki Creole 1.0 to XHTML conversion.
//!
//! A single data-driven recursive-descent interpreter walks the input once,
//! guided by a declarative table of chunk types. Malformed markup never
//! errors: it degrades into literal text through the grammar's catch-all
//! kinds.

mod converter;
mod customize;
mod engine;
mod filters;
mod grammar;
mod pattern;

pub use converter::{Converter, convert, convert_bytes};
pub use customize::MarkupSide;
pub use grammar::ChunkKind;
