//! Error types for atomspace and codec operations

use std::path::PathBuf;
use thiserror::Error;

use crate::storage::Handle;

/// Errors raised by [`AtomSpace`](crate::AtomSpace) and
/// [`TextCodec`](crate::TextCodec) operations.
#[derive(Debug, Error)]
pub enum AtomSpaceError {
    /// Type token is unknown, or names a node where a link is required
    /// (and vice versa).
    #[error("invalid atom type `{token}`: {reason}")]
    InvalidType {
        /// Offending type name
        token: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Handle does not belong to this atomspace.
    #[error("unknown element {handle}: not a member of this atomspace")]
    UnknownElement {
        /// Offending handle
        handle: Handle,
    },

    /// Batch entry refers to a batch slot that does not exist.
    #[error("batch reference #{index} out of range (batch has {len} entries)")]
    InvalidBatchReference {
        /// Referenced slot
        index: usize,
        /// Batch length
        len: usize,
    },

    /// Malformed text input.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        /// 1-based line
        line: usize,
        /// 1-based column (in characters)
        column: usize,
        /// What went wrong
        message: String,
    },

    /// Link structure is not a DAG.
    #[error("cyclic reference through `{name}`")]
    CyclicReference {
        /// Symbol or batch slot on the cycle
        name: String,
    },

    /// Atom nests deeper than the codec's configured limit when rendered as a
    /// single expanded expression.
    #[error("atom {handle} nests deeper than {max_depth} levels")]
    NestingTooDeep {
        /// Root atom being rendered
        handle: Handle,
        /// Configured limit
        max_depth: usize,
    },

    /// Atomspace cannot issue any more handles.
    #[error("atomspace is full ({limit} atoms)")]
    CapacityExceeded {
        /// Maximum number of atoms
        limit: usize,
    },

    /// The atomspace was torn down with [`AtomSpace::close`](crate::AtomSpace::close).
    #[error("atomspace has been closed")]
    Closed,

    /// File read or write failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl AtomSpaceError {
    /// Create a `Parse` error.
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an `InvalidType` error.
    pub fn invalid_type(token: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidType {
            token: token.into(),
            reason,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AtomSpaceError>;
