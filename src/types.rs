//! Atom type registry
//!
//! A closed set of node and link types. Type names are validated at the
//! boundary (add time and parse time); anything not listed here is rejected.

use crate::error::{AtomSpaceError, Result};
use std::fmt;
use std::str::FromStr;

/// Type of an atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AtomType {
    /// Named concept
    ConceptNode,
    /// Named predicate, usually the head of an `EvaluationLink`
    PredicateNode,
    /// Named schema (function)
    SchemaNode,
    /// Variable
    VariableNode,
    /// Numeric literal carried in the name
    NumberNode,
    /// Ordered list
    ListLink,
    /// Unordered set (stored as given)
    SetLink,
    /// Element membership
    MemberLink,
    /// Subclass relation
    InheritanceLink,
    /// Symmetric similarity
    SimilarityLink,
    /// Predicate applied to arguments
    EvaluationLink,
    /// Implication
    ImplicationLink,
    /// Conjunction
    AndLink,
    /// Disjunction
    OrLink,
    /// Negation
    NotLink,
    /// Arithmetic sum
    PlusLink,
}

impl AtomType {
    /// Every known type, nodes first
    pub const ALL: [Self; 16] = [
        Self::ConceptNode,
        Self::PredicateNode,
        Self::SchemaNode,
        Self::VariableNode,
        Self::NumberNode,
        Self::ListLink,
        Self::SetLink,
        Self::MemberLink,
        Self::InheritanceLink,
        Self::SimilarityLink,
        Self::EvaluationLink,
        Self::ImplicationLink,
        Self::AndLink,
        Self::OrLink,
        Self::NotLink,
        Self::PlusLink,
    ];

    /// Canonical type name, as written in text files
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ConceptNode => "ConceptNode",
            Self::PredicateNode => "PredicateNode",
            Self::SchemaNode => "SchemaNode",
            Self::VariableNode => "VariableNode",
            Self::NumberNode => "NumberNode",
            Self::ListLink => "ListLink",
            Self::SetLink => "SetLink",
            Self::MemberLink => "MemberLink",
            Self::InheritanceLink => "InheritanceLink",
            Self::SimilarityLink => "SimilarityLink",
            Self::EvaluationLink => "EvaluationLink",
            Self::ImplicationLink => "ImplicationLink",
            Self::AndLink => "AndLink",
            Self::OrLink => "OrLink",
            Self::NotLink => "NotLink",
            Self::PlusLink => "PlusLink",
        }
    }

    /// True for leaf (named) types
    #[must_use]
    pub const fn is_node(self) -> bool {
        matches!(
            self,
            Self::ConceptNode
                | Self::PredicateNode
                | Self::SchemaNode
                | Self::VariableNode
                | Self::NumberNode
        )
    }

    /// True for composite types
    #[must_use]
    pub const fn is_link(self) -> bool {
        !self.is_node()
    }

    /// Look up a type by its canonical name
    ///
    /// # Errors
    ///
    /// Returns [`AtomSpaceError::InvalidType`] if the name is not a known type
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| AtomSpaceError::invalid_type(name, "unknown type name"))
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AtomType {
    type Err = AtomSpaceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}
