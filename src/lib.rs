//! trueno-atomspace: embedded in-memory hypergraph store
//!
//! # Overview
//!
//! trueno-atomspace stores typed nodes and links (atoms) with structural
//! deduplication, and persists them as line-oriented S-expression text that
//! loads back losslessly.
//!
//! # Quick Start
//!
//! ```no_run
//! use trueno_atomspace::{AtomSpace, AtomType, TextCodec};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut space = AtomSpace::new();
//! let likes = space.add_node(AtomType::PredicateNode, "likes")?;
//! let alice = space.add_node(AtomType::ConceptNode, "alice")?;
//! let bob = space.add_node(AtomType::ConceptNode, "bob")?;
//! let args = space.add_link(AtomType::ListLink, vec![alice, bob])?;
//! space.add_link(AtomType::EvaluationLink, vec![likes, args])?;
//!
//! // Save as text
//! let codec = TextCodec::new();
//! codec.write_file(&space, "space.scm").await?;
//!
//! // Load into a fresh atomspace
//! let mut loaded = AtomSpace::new();
//! codec.load_file("space.scm", &mut loaded).await?;
//! assert_eq!(loaded.size(), space.size());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Types**: closed [`AtomType`] enum, validated at add and parse time
//! - **Storage**: insertion-ordered arena with a structural index and incoming sets
//! - **Batches**: atoms referencing each other, inserted children-first, cycles rejected
//! - **Persistence**: S-expression text via [`TextCodec`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod storage;
pub mod types;

// Re-export core types
pub use error::{AtomSpaceError, Result};
pub use storage::text::{load, load_file, serialize, write_file};
pub use storage::{
    Atom, AtomBatch, AtomRef, AtomSpace, Handle, LoadSummary, RenderStyle, TextCodec,
    DEFAULT_MAX_DEPTH, MAX_ATOMS, MAX_DEPTH_LIMIT,
};
pub use types::AtomType;
