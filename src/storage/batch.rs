//! Batch insertion in dependency order
//!
//! A batch is a list of prospective atoms whose links may point either at
//! atoms already in the atomspace or at other entries of the same batch.
//! Entries can reference later entries, so the batch is a directed graph
//! that must be ordered (children before parents) before insertion:
//!
//! ```text
//! #0 ListLink(#1, #2)        order: #1, #2, #0
//! #1 ConceptNode "a"
//! #2 ConceptNode "b"
//! ```
//!
//! Ordering uses depth-first search with three-color marking; reaching an
//! entry that is still on the DFS path means the batch is cyclic.

use super::atom::{Atom, Handle};
use super::space::AtomSpace;
use crate::error::{AtomSpaceError, Result};
use crate::types::AtomType;
use std::collections::HashMap;

/// Reference to a link member: an existing atom or a batch entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomRef {
    /// Atom already in the target atomspace
    Existing(Handle),
    /// Entry of the same batch, by position
    Pending(usize),
}

impl From<Handle> for AtomRef {
    fn from(handle: Handle) -> Self {
        Self::Existing(handle)
    }
}

#[derive(Debug, Clone)]
enum Proto {
    Node {
        atom_type: AtomType,
        name: String,
    },
    Link {
        atom_type: AtomType,
        outgoing: Vec<AtomRef>,
    },
}

#[derive(Debug, Clone)]
struct Entry {
    proto: Proto,
    label: Option<String>,
}

/// Atoms to be inserted together
///
/// # Example
///
/// ```
/// use trueno_atomspace::{AtomBatch, AtomRef, AtomSpace, AtomType};
///
/// let mut batch = AtomBatch::new();
/// // Forward reference: entry #0 points at entries #1 and #2
/// batch.add_link(AtomType::ListLink, vec![AtomRef::Pending(1), AtomRef::Pending(2)]);
/// batch.add_node(AtomType::ConceptNode, "a");
/// batch.add_node(AtomType::ConceptNode, "b");
///
/// let mut space = AtomSpace::new();
/// let handles = space.insert_batch(batch).unwrap();
/// assert_eq!(space.size(), 3);
/// assert_eq!(space.get(handles[0]).unwrap().outgoing(), &[handles[1], handles[2]]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AtomBatch {
    entries: Vec<Entry>,
}

impl AtomBatch {
    /// Create empty batch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty batch with room for `capacity` entries
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Queue a node; types are checked at insertion
    pub fn add_node(&mut self, atom_type: AtomType, name: impl Into<String>) -> AtomRef {
        self.push(Proto::Node {
            atom_type,
            name: name.into(),
        })
    }

    /// Queue a link; types and references are checked at insertion
    pub fn add_link(&mut self, atom_type: AtomType, outgoing: Vec<AtomRef>) -> AtomRef {
        self.push(Proto::Link {
            atom_type,
            outgoing,
        })
    }

    /// Attach a human-readable name to an entry, used in cycle errors
    pub fn set_label(&mut self, entry: usize, label: impl Into<String>) {
        if let Some(e) = self.entries.get_mut(entry) {
            e.label = Some(label.into());
        }
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the batch has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite one outgoing slot of a queued link (no-op for nodes)
    pub(crate) fn set_child(&mut self, entry: usize, position: usize, target: AtomRef) {
        if let Some(Entry {
            proto: Proto::Link { outgoing, .. },
            ..
        }) = self.entries.get_mut(entry)
        {
            if let Some(slot) = outgoing.get_mut(position) {
                *slot = target;
            }
        }
    }

    fn push(&mut self, proto: Proto) -> AtomRef {
        let idx = self.entries.len();
        self.entries.push(Entry { proto, label: None });
        AtomRef::Pending(idx)
    }

    fn describe(&self, entry: usize) -> String {
        self.entries
            .get(entry)
            .and_then(|e| e.label.clone())
            .unwrap_or_else(|| format!("#{entry}"))
    }

    /// Check types and references without touching the atomspace
    fn validate(&self, space: &AtomSpace) -> Result<()> {
        let len = self.entries.len();

        for entry in &self.entries {
            match &entry.proto {
                Proto::Node { atom_type, .. } => {
                    if !atom_type.is_node() {
                        return Err(AtomSpaceError::invalid_type(
                            atom_type.name(),
                            "expected a node type",
                        ));
                    }
                }
                Proto::Link {
                    atom_type,
                    outgoing,
                } => {
                    if !atom_type.is_link() {
                        return Err(AtomSpaceError::invalid_type(
                            atom_type.name(),
                            "expected a link type",
                        ));
                    }
                    for child in outgoing {
                        match *child {
                            AtomRef::Existing(handle) => space.check_member(handle)?,
                            AtomRef::Pending(index) if index >= len => {
                                return Err(AtomSpaceError::InvalidBatchReference { index, len });
                            }
                            AtomRef::Pending(_) => {}
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Entry order in which every pending child precedes its parents
    ///
    /// # Errors
    ///
    /// Returns [`AtomSpaceError::CyclicReference`] if entries reference each
    /// other in a cycle (including an entry referencing itself)
    fn dependency_order(&self) -> Result<Vec<usize>> {
        let n = self.entries.len();
        let mut state = vec![NodeState::Unvisited; n];
        let mut order = Vec::with_capacity(n);

        // (entry, next outgoing position to examine)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for start in 0..n {
            if state[start] != NodeState::Unvisited {
                continue;
            }

            state[start] = NodeState::InStack;
            stack.push((start, 0));

            while let Some((entry, next)) = stack.last_mut() {
                let outgoing: &[AtomRef] = match &self.entries[*entry].proto {
                    Proto::Link { outgoing, .. } => outgoing,
                    Proto::Node { .. } => &[],
                };

                if let Some(child) = outgoing.get(*next) {
                    *next += 1;
                    let AtomRef::Pending(child) = *child else {
                        continue;
                    };

                    match state[child] {
                        NodeState::InStack => {
                            return Err(AtomSpaceError::CyclicReference {
                                name: self.describe(child),
                            });
                        }
                        NodeState::Unvisited => {
                            state[child] = NodeState::InStack;
                            stack.push((child, 0));
                        }
                        NodeState::Finished => {}
                    }
                } else {
                    state[*entry] = NodeState::Finished;
                    order.push(*entry);
                    stack.pop();
                }
            }
        }

        Ok(order)
    }
}

/// Entry state during DFS ordering
#[derive(Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unvisited,
    InStack,
    Finished,
}

fn resolve(resolved: &[Option<Handle>], target: AtomRef) -> Result<Handle> {
    match target {
        AtomRef::Existing(handle) => Ok(handle),
        AtomRef::Pending(index) => {
            resolved
                .get(index)
                .copied()
                .flatten()
                .ok_or(AtomSpaceError::InvalidBatchReference {
                    index,
                    len: resolved.len(),
                })
        }
    }
}

impl AtomSpace {
    /// Insert a batch of atoms in dependency order
    ///
    /// The whole batch is validated (types, membership of existing handles,
    /// range of pending references, acyclicity) before anything is inserted,
    /// so on error the atomspace is unchanged. Entries equal to existing atoms,
    /// or to each other, are deduplicated.
    ///
    /// Returns the handle of every entry, in batch order.
    ///
    /// # Errors
    ///
    /// - [`AtomSpaceError::InvalidType`] for a node/link type mismatch
    /// - [`AtomSpaceError::UnknownElement`] for a foreign existing handle
    /// - [`AtomSpaceError::InvalidBatchReference`] for an out-of-range pending reference
    /// - [`AtomSpaceError::CyclicReference`] if pending references form a cycle
    /// - [`AtomSpaceError::CapacityExceeded`] if the new atoms do not fit
    /// - [`AtomSpaceError::Closed`] after [`close`](Self::close)
    pub fn insert_batch(&mut self, batch: AtomBatch) -> Result<Vec<Handle>> {
        self.check_open()?;
        batch.validate(self)?;
        let order = batch.dependency_order()?;

        let before = self.size();
        let mut resolved: Vec<Option<Handle>> = vec![None; batch.len()];
        let mut fresh: Vec<Atom> = Vec::new();
        let mut fresh_index: HashMap<Atom, Handle> = HashMap::new();

        for idx in order {
            let atom = match &batch.entries[idx].proto {
                Proto::Node { atom_type, name } => Atom::Node {
                    atom_type: *atom_type,
                    name: name.clone(),
                },
                Proto::Link {
                    atom_type,
                    outgoing,
                } => Atom::Link {
                    atom_type: *atom_type,
                    outgoing: outgoing
                        .iter()
                        .map(|&child| resolve(&resolved, child))
                        .collect::<Result<Vec<_>>>()?,
                },
            };
            let existing = self
                .lookup(&atom)
                .or_else(|| fresh_index.get(&atom).copied());
            let handle = match existing {
                Some(handle) => handle,
                None => {
                    let handle = self.next_handle(fresh.len())?;
                    fresh_index.insert(atom.clone(), handle);
                    fresh.push(atom);
                    handle
                }
            };
            resolved[idx] = Some(handle);
        }

        // Every handle is assigned and the space has room, so nothing below fails
        for atom in fresh {
            self.insert(atom)?;
        }

        tracing::trace!(
            entries = batch.len(),
            added = self.size() - before,
            "inserted atom batch"
        );

        (0..resolved.len())
            .map(|idx| resolve(&resolved, AtomRef::Pending(idx)))
            .collect()
    }
}
