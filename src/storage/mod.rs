//! Atom storage layer
//!
//! Provides the in-memory atomspace, batch insertion, and text persistence.

pub mod atom;
pub mod batch;
mod sexpr;
pub mod space;
pub mod text;

pub use atom::{Atom, Handle};
pub use batch::{AtomBatch, AtomRef};
pub use space::{AtomSpace, MAX_ATOMS};
pub use text::{LoadSummary, RenderStyle, TextCodec, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
