//! Atom representation
//!
//! ```text
//! (EvaluationLink                 Link  { EvaluationLink, [#0, #3] }
//!   (PredicateNode "likes")       Node  { PredicateNode, "likes" }      #0
//!   (ListLink                     Link  { ListLink, [#1, #2] }          #3
//!     (ConceptNode "alice")       Node  { ConceptNode, "alice" }        #1
//!     (ConceptNode "bob")))       Node  { ConceptNode, "bob" }          #2
//! ```

use crate::types::AtomType;
use std::fmt;

/// Atom identifier, scoped to the atomspace that issued it
///
/// Handles from one atomspace are never members of another, even when the
/// index is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    space: u64,
    index: u32,
}

impl Handle {
    pub(crate) const fn new(space: u64, index: u32) -> Self {
        Self { space, index }
    }

    /// Position in the owning atomspace's insertion order
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    pub(crate) const fn space(self) -> u64 {
        self.space
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.space)
    }
}

/// A node or a link
///
/// Two atoms are the same entity iff they compare equal: nodes by
/// (type, name), links by (type, outgoing sequence).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    /// Leaf atom
    Node {
        /// Node type
        atom_type: AtomType,
        /// Node name
        name: String,
    },
    /// Composite atom
    Link {
        /// Link type
        atom_type: AtomType,
        /// Ordered children
        outgoing: Vec<Handle>,
    },
}

impl Atom {
    /// Atom type
    #[must_use]
    pub const fn atom_type(&self) -> AtomType {
        match self {
            Self::Node { atom_type, .. } | Self::Link { atom_type, .. } => *atom_type,
        }
    }

    /// True for nodes
    #[must_use]
    pub const fn is_node(&self) -> bool {
        matches!(self, Self::Node { .. })
    }

    /// True for links
    #[must_use]
    pub const fn is_link(&self) -> bool {
        matches!(self, Self::Link { .. })
    }

    /// Node name (`None` for links)
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Node { name, .. } => Some(name),
            Self::Link { .. } => None,
        }
    }

    /// Outgoing set (empty for nodes)
    #[must_use]
    pub fn outgoing(&self) -> &[Handle] {
        match self {
            Self::Node { .. } => &[],
            Self::Link { outgoing, .. } => outgoing,
        }
    }

    /// Number of children
    #[must_use]
    pub fn arity(&self) -> usize {
        self.outgoing().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_accessors() {
        let atom = Atom::Node {
            atom_type: AtomType::ConceptNode,
            name: "cat".to_string(),
        };
        assert!(atom.is_node());
        assert_eq!(atom.atom_type(), AtomType::ConceptNode);
        assert_eq!(atom.name(), Some("cat"));
        assert_eq!(atom.arity(), 0);
    }

    #[test]
    fn test_link_identity_is_structural() {
        let a = Handle::new(1, 0);
        let b = Handle::new(1, 1);

        let l1 = Atom::Link {
            atom_type: AtomType::ListLink,
            outgoing: vec![a, b],
        };
        let l2 = Atom::Link {
            atom_type: AtomType::ListLink,
            outgoing: vec![a, b],
        };
        let reversed = Atom::Link {
            atom_type: AtomType::ListLink,
            outgoing: vec![b, a],
        };

        assert_eq!(l1, l2);
        assert_ne!(l1, reversed);
        assert_eq!(l1.name(), None);
        assert_eq!(l1.outgoing(), &[a, b]);
    }

    #[test]
    fn test_handles_from_different_spaces_differ() {
        assert_ne!(Handle::new(1, 0), Handle::new(2, 0));
        assert_eq!(Handle::new(1, 5).index(), 5);
    }
}
