//! In-memory atomspace
//!
//! Atoms live in an insertion-ordered arena. A structural index maps each
//! atom to its handle for deduplication, and a parallel incoming table
//! records which links contain each atom (the reverse of the outgoing sets).
//!
//! ```text
//! atoms:    [ C"a", C"b", List(#0,#1), P"p", Eval(#3,#2) ]
//! incoming: [ [#2],  [#2],  [#4],       [#4],  []          ]
//! ```

use super::atom::{Atom, Handle};
use crate::error::{AtomSpaceError, Result};
use crate::types::AtomType;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SPACE_ID: AtomicU64 = AtomicU64::new(1);

/// Most atoms one atomspace can hold (handle indices are `u32`)
pub const MAX_ATOMS: usize = u32::MAX as usize;

/// Deduplicated store of nodes and links
///
/// # Example
///
/// ```
/// use trueno_atomspace::{AtomSpace, AtomType};
///
/// let mut space = AtomSpace::new();
/// let cat = space.add_node(AtomType::ConceptNode, "cat").unwrap();
/// let animal = space.add_node(AtomType::ConceptNode, "animal").unwrap();
/// space.add_link(AtomType::InheritanceLink, vec![cat, animal]).unwrap();
///
/// // Re-adding an existing atom returns the same handle
/// assert_eq!(space.add_node(AtomType::ConceptNode, "cat").unwrap(), cat);
/// assert_eq!(space.size(), 3);
/// ```
#[derive(Debug)]
pub struct AtomSpace {
    /// Identity stamped into every issued handle
    id: u64,

    /// Atoms in insertion order; `Handle::index` points here
    atoms: Vec<Atom>,

    /// Structural identity → handle
    index: HashMap<Atom, Handle>,

    /// Links containing each atom, parallel to `atoms`
    incoming: Vec<Vec<Handle>>,

    /// Insertion refuses to grow past this; `MAX_ATOMS` outside tests
    max_atoms: usize,

    closed: bool,
}

impl AtomSpace {
    /// Create new empty atomspace
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create empty atomspace with room for `capacity` atoms
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: NEXT_SPACE_ID.fetch_add(1, Ordering::Relaxed),
            atoms: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            incoming: Vec::with_capacity(capacity),
            max_atoms: MAX_ATOMS,
            closed: false,
        }
    }

    /// Add a node, or return the existing one with the same (type, name)
    ///
    /// # Errors
    ///
    /// - [`AtomSpaceError::InvalidType`] if `atom_type` is a link type
    /// - [`AtomSpaceError::CapacityExceeded`] if the atomspace is full
    /// - [`AtomSpaceError::Closed`] after [`close`](Self::close)
    pub fn add_node(&mut self, atom_type: AtomType, name: impl Into<String>) -> Result<Handle> {
        self.check_open()?;
        if !atom_type.is_node() {
            return Err(AtomSpaceError::invalid_type(
                atom_type.name(),
                "expected a node type",
            ));
        }

        self.insert(Atom::Node {
            atom_type,
            name: name.into(),
        })
    }

    /// Add a link, or return the existing one with the same type and outgoing set
    ///
    /// # Errors
    ///
    /// - [`AtomSpaceError::InvalidType`] if `atom_type` is a node type
    /// - [`AtomSpaceError::UnknownElement`] if any outgoing handle is not a member
    /// - [`AtomSpaceError::CapacityExceeded`] if the atomspace is full
    /// - [`AtomSpaceError::Closed`] after [`close`](Self::close)
    pub fn add_link(
        &mut self,
        atom_type: AtomType,
        outgoing: impl Into<Vec<Handle>>,
    ) -> Result<Handle> {
        self.check_open()?;
        if !atom_type.is_link() {
            return Err(AtomSpaceError::invalid_type(
                atom_type.name(),
                "expected a link type",
            ));
        }

        let outgoing = outgoing.into();
        for &handle in &outgoing {
            self.check_member(handle)?;
        }

        self.insert(Atom::Link {
            atom_type,
            outgoing,
        })
    }

    /// Number of distinct atoms (0 once closed)
    #[must_use]
    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    /// True if the atomspace holds no atoms
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// True if `handle` was issued by this atomspace and is still live
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        handle.space() == self.id && (handle.index() as usize) < self.atoms.len()
    }

    /// Get an atom by handle
    ///
    /// # Errors
    ///
    /// Returns error if the handle is not a member, or the atomspace is closed
    pub fn get(&self, handle: Handle) -> Result<&Atom> {
        self.check_open()?;
        self.check_member(handle)?;
        Ok(&self.atoms[handle.index() as usize])
    }

    /// Links whose outgoing set contains `handle`
    ///
    /// A link listing the same child twice appears once.
    ///
    /// # Errors
    ///
    /// Returns error if the handle is not a member, or the atomspace is closed
    pub fn incoming(&self, handle: Handle) -> Result<&[Handle]> {
        self.check_open()?;
        self.check_member(handle)?;
        Ok(&self.incoming[handle.index() as usize])
    }

    /// Look up a node without inserting it
    #[must_use]
    pub fn find_node(&self, atom_type: AtomType, name: &str) -> Option<Handle> {
        self.index
            .get(&Atom::Node {
                atom_type,
                name: name.to_string(),
            })
            .copied()
    }

    /// Look up a link without inserting it
    #[must_use]
    pub fn find_link(&self, atom_type: AtomType, outgoing: &[Handle]) -> Option<Handle> {
        self.index
            .get(&Atom::Link {
                atom_type,
                outgoing: outgoing.to_vec(),
            })
            .copied()
    }

    /// Iterate over atoms in insertion order
    ///
    /// Children always precede the links that contain them. Each call starts
    /// a fresh traversal.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Atom)> + '_ {
        let id = self.id;
        self.atoms.iter().enumerate().map(move |(idx, atom)| {
            #[allow(clippy::cast_possible_truncation)] // idx < MAX_ATOMS, enforced in insert
            let index = idx as u32;
            (Handle::new(id, index), atom)
        })
    }

    /// Handles of all atoms of exactly `atom_type`, in insertion order
    pub fn atoms_of_type(&self, atom_type: AtomType) -> impl Iterator<Item = Handle> + '_ {
        self.iter()
            .filter(move |(_, atom)| atom.atom_type() == atom_type)
            .map(|(handle, _)| handle)
    }

    /// Tear the atomspace down
    ///
    /// Drops every atom. Afterwards `size()` is 0, `iter()` is empty, and every
    /// fallible operation returns [`AtomSpaceError::Closed`]. Handles issued
    /// before closing are no longer members.
    pub fn close(&mut self) {
        tracing::debug!(space = self.id, atoms = self.atoms.len(), "closing atomspace");
        self.atoms = Vec::new();
        self.index = HashMap::new();
        self.incoming = Vec::new();
        self.closed = true;
    }

    /// True after [`close`](Self::close)
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(AtomSpaceError::Closed);
        }
        Ok(())
    }

    pub(crate) fn check_member(&self, handle: Handle) -> Result<()> {
        if !self.contains(handle) {
            return Err(AtomSpaceError::UnknownElement { handle });
        }
        Ok(())
    }

    /// Existing handle of a structurally equal atom
    pub(crate) fn lookup(&self, atom: &Atom) -> Option<Handle> {
        self.index.get(atom).copied()
    }

    /// Handle the atom inserted `offset` places after the current last one
    /// will receive
    pub(crate) fn next_handle(&self, offset: usize) -> Result<Handle> {
        let position = self.atoms.len() + offset;
        u32::try_from(position)
            .ok()
            .filter(|_| position < self.max_atoms)
            .map(|index| Handle::new(self.id, index))
            .ok_or(AtomSpaceError::CapacityExceeded {
                limit: self.max_atoms,
            })
    }

    /// Insert with deduplication; callers have validated type and members
    pub(crate) fn insert(&mut self, atom: Atom) -> Result<Handle> {
        if let Some(existing) = self.lookup(&atom) {
            return Ok(existing);
        }

        let handle = self.next_handle(0)?;

        let mut seen: Vec<Handle> = Vec::with_capacity(atom.arity());
        for &child in atom.outgoing() {
            if !seen.contains(&child) {
                self.incoming[child.index() as usize].push(handle);
                seen.push(child);
            }
        }

        self.index.insert(atom.clone(), handle);
        self.atoms.push(atom);
        self.incoming.push(Vec::new());

        Ok(handle)
    }
}

impl Default for AtomSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a AtomSpace {
    type Item = (Handle, &'a Atom);
    type IntoIter = Box<dyn Iterator<Item = (Handle, &'a Atom)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
