//! Text I/O for atomspace persistence
//!
//! # Format
//!
//! One S-expression per atom, newline-terminated, UTF-8, in insertion order:
//!
//! ```text
//! (define $0 (ConceptNode "cat"))
//! (define $1 (ConceptNode "animal"))
//! (InheritanceLink $0 $1)
//! ```
//!
//! `(define name <atom>)` binds a symbol that other expressions may reference
//! by bare name, before or after the definition. The serializer binds `$N`
//! (N the handle index) for every atom some link points at, and writes link
//! members as symbols, so line length does not depend on nesting depth and
//! shared sub-structure is written once.
//!
//! The loader also accepts members nested inline, as written by hand or by
//! [`TextCodec::render`]:
//!
//! ```text
//! (InheritanceLink (ConceptNode "cat") (ConceptNode "animal"))
//! ```
//!
//! `;` starts a comment running to end of line.

use super::batch::{AtomBatch, AtomRef};
use super::sexpr::{self, Pos, SExpr};
use super::{Atom, AtomSpace, Handle};
use crate::error::{AtomSpaceError, Result};
use crate::types::AtomType;
use std::collections::HashMap;
use std::path::Path;

/// Default limit on expression nesting, for reading and for [`TextCodec::render`]
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Largest nesting limit a codec accepts; reading and rendering recurse once
/// per level
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Layout of serialized expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// Each atom on a single line
    #[default]
    Compact,
    /// Link members on their own lines, indented two spaces per level
    Indented,
}

/// Outcome of a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Top-level expressions read (including `define`s)
    pub expressions: usize,
    /// Atom expressions read, nested ones included (a repeated identical
    /// `define` counts once)
    pub atoms_read: usize,
    /// Atoms that were not already present
    pub added: usize,
}

/// Serializer and loader for the atomspace text format
///
/// # Example
///
/// ```
/// use trueno_atomspace::{AtomSpace, AtomType, TextCodec};
///
/// let mut space = AtomSpace::new();
/// let cat = space.add_node(AtomType::ConceptNode, "cat").unwrap();
/// let animal = space.add_node(AtomType::ConceptNode, "animal").unwrap();
/// space.add_link(AtomType::InheritanceLink, vec![cat, animal]).unwrap();
///
/// let codec = TextCodec::new();
/// let text = codec.serialize(&space).unwrap();
///
/// let mut copy = AtomSpace::new();
/// codec.load(&text, &mut copy).unwrap();
/// assert_eq!(copy.size(), space.size());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCodec {
    style: RenderStyle,
    max_depth: usize,
}

impl TextCodec {
    /// Codec with compact output and [`DEFAULT_MAX_DEPTH`]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: RenderStyle::Compact,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set output layout
    #[must_use]
    pub const fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Set nesting limit for reading and rendering, capped at [`MAX_DEPTH_LIMIT`]
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = if max_depth > MAX_DEPTH_LIMIT {
            MAX_DEPTH_LIMIT
        } else {
            max_depth
        };
        self
    }

    /// Output layout
    #[must_use]
    pub const fn style(&self) -> RenderStyle {
        self.style
    }

    /// Nesting limit
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Render a single atom with its members nested inline (no trailing newline)
    ///
    /// Shared members are expanded at every occurrence; use
    /// [`serialize`](Self::serialize) to persist whole atomspaces.
    ///
    /// # Errors
    ///
    /// Returns error if the handle is not a member, the atomspace is closed,
    /// or the atom nests deeper than `max_depth`
    pub fn render(&self, space: &AtomSpace, handle: Handle) -> Result<String> {
        let mut out = String::new();
        self.render_into(space, handle, handle, 0, &mut out)?;
        Ok(out)
    }

    /// Serialize every atom, one top-level expression each, in iteration order
    ///
    /// Atoms that are members of some link are written as `(define $N ...)`
    /// and referenced by symbol, so the output is linear in the number of
    /// atoms plus link members, whatever the depth or sharing.
    ///
    /// # Errors
    ///
    /// Returns error if the atomspace is closed
    pub fn serialize(&self, space: &AtomSpace) -> Result<String> {
        space.check_open()?;

        let mut out = String::new();
        for (handle, atom) in space {
            let referenced = !space.incoming(handle)?.is_empty();
            if referenced {
                out.push_str("(define ");
                push_symbol(handle, &mut out);
                out.push(' ');
            }
            self.write_flat(atom, &mut out);
            if referenced {
                out.push(')');
            }
            out.push('\n');
        }

        tracing::debug!(atoms = space.size(), bytes = out.len(), "serialized atomspace");
        Ok(out)
    }

    /// Parse `text` and add every atom it describes to `space`
    ///
    /// The whole text is parsed and checked before anything is inserted:
    /// on a parse or cycle error `space` is left unchanged. Atoms already
    /// present, or repeated in the text, are deduplicated.
    ///
    /// # Errors
    ///
    /// - [`AtomSpaceError::Parse`] for malformed text, unknown type names,
    ///   wrongly shaped atoms, undefined or redefined symbols
    /// - [`AtomSpaceError::CyclicReference`] if `define`d symbols form a cycle
    /// - [`AtomSpaceError::Closed`] if `space` is closed
    pub fn load(&self, text: &str, space: &mut AtomSpace) -> Result<LoadSummary> {
        space.check_open()?;

        let exprs = sexpr::parse_all(text, self.max_depth)?;

        let mut builder = BatchBuilder::default();
        for expr in &exprs {
            builder.top_level(expr)?;
        }
        let batch = builder.finish()?;

        let atoms_read = batch.len();
        let before = space.size();
        space.insert_batch(batch)?;

        let summary = LoadSummary {
            expressions: exprs.len(),
            atoms_read,
            added: space.size() - before,
        };
        tracing::debug!(
            expressions = summary.expressions,
            atoms_read = summary.atoms_read,
            added = summary.added,
            "loaded atomspace text"
        );
        Ok(summary)
    }

    /// Serialize `space` to a file, replacing it; returns bytes written
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails or the file cannot be written
    pub async fn write_file<P: AsRef<Path>>(&self, space: &AtomSpace, path: P) -> Result<usize> {
        let path = path.as_ref();
        let text = self.serialize(space)?;

        tokio::fs::write(path, text.as_bytes())
            .await
            .map_err(|source| AtomSpaceError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(
            path = %path.display(),
            atoms = space.size(),
            bytes = text.len(),
            "wrote atomspace file"
        );
        Ok(text.len())
    }

    /// Read a file and load its atoms into `space`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read (or is not UTF-8), or on any
    /// [`load`](Self::load) error
    pub async fn load_file<P: AsRef<Path>>(
        &self,
        path: P,
        space: &mut AtomSpace,
    ) -> Result<LoadSummary> {
        let path = path.as_ref();

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AtomSpaceError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let summary = self.load(&text, space)?;
        tracing::info!(
            path = %path.display(),
            bytes = text.len(),
            added = summary.added,
            "loaded atomspace file"
        );
        Ok(summary)
    }

    /// Write one atom with link members as `$N` symbols
    fn write_flat(&self, atom: &Atom, out: &mut String) {
        out.push('(');
        out.push_str(atom.atom_type().name());
        match atom {
            Atom::Node { name, .. } => {
                out.push(' ');
                sexpr::quote(name, out);
            }
            Atom::Link { outgoing, .. } => {
                for &child in outgoing {
                    match self.style {
                        RenderStyle::Compact => out.push(' '),
                        RenderStyle::Indented => out.push_str("\n  "),
                    }
                    push_symbol(child, out);
                }
            }
        }
        out.push(')');
    }

    fn render_into(
        &self,
        space: &AtomSpace,
        root: Handle,
        handle: Handle,
        depth: usize,
        out: &mut String,
    ) -> Result<()> {
        if depth >= self.max_depth {
            return Err(AtomSpaceError::NestingTooDeep {
                handle: root,
                max_depth: self.max_depth,
            });
        }

        out.push('(');
        match space.get(handle)? {
            Atom::Node { atom_type, name } => {
                out.push_str(atom_type.name());
                out.push(' ');
                sexpr::quote(name, out);
            }
            Atom::Link {
                atom_type,
                outgoing,
            } => {
                out.push_str(atom_type.name());
                for &child in outgoing {
                    match self.style {
                        RenderStyle::Compact => out.push(' '),
                        RenderStyle::Indented => {
                            out.push('\n');
                            for _ in 0..=depth {
                                out.push_str("  ");
                            }
                        }
                    }
                    self.render_into(space, root, child, depth + 1, out)?;
                }
            }
        }
        out.push(')');

        Ok(())
    }
}

impl Default for TextCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Symbol the serializer binds to `handle`
fn push_symbol(handle: Handle, out: &mut String) {
    out.push('$');
    out.push_str(&handle.index().to_string());
}

/// Serialize with the default codec
///
/// # Errors
///
/// See [`TextCodec::serialize`]
pub fn serialize(space: &AtomSpace) -> Result<String> {
    TextCodec::new().serialize(space)
}

/// Load text with the default codec
///
/// # Errors
///
/// See [`TextCodec::load`]
pub fn load(text: &str, space: &mut AtomSpace) -> Result<LoadSummary> {
    TextCodec::new().load(text, space)
}

/// Write a file with the default codec
///
/// # Errors
///
/// See [`TextCodec::write_file`]
pub async fn write_file<P: AsRef<Path>>(space: &AtomSpace, path: P) -> Result<usize> {
    TextCodec::new().write_file(space, path).await
}

/// Load a file with the default codec
///
/// # Errors
///
/// See [`TextCodec::load_file`]
pub async fn load_file<P: AsRef<Path>>(path: P, space: &mut AtomSpace) -> Result<LoadSummary> {
    TextCodec::new().load_file(path, space).await
}

/// Symbol reference awaiting its definition
struct Unresolved {
    entry: usize,
    position: usize,
    name: String,
    pos: Pos,
}

/// A `define`d symbol
struct Definition<'a> {
    entry: usize,
    pos: Pos,
    body: &'a SExpr,
}

/// Turns parsed expressions into an [`AtomBatch`]
#[derive(Default)]
struct BatchBuilder<'a> {
    batch: AtomBatch,
    defines: HashMap<&'a str, Definition<'a>>,
    unresolved: Vec<Unresolved>,
}

impl<'a> BatchBuilder<'a> {
    fn top_level(&mut self, expr: &'a SExpr) -> Result<()> {
        match expr {
            SExpr::List(items, pos)
                if matches!(items.first(), Some(SExpr::Symbol(head, _)) if head == "define") =>
            {
                self.define(items, *pos)
            }
            SExpr::List(..) => self.atom(expr).map(|_| ()),
            SExpr::Symbol(name, pos) => {
                Err(pos.error(format!("unexpected symbol `{name}` at top level")))
            }
            SExpr::Str(_, pos) => Err(pos.error("unexpected string literal at top level")),
        }
    }

    fn define(&mut self, items: &'a [SExpr], pos: Pos) -> Result<()> {
        let [_, SExpr::Symbol(name, name_pos), body @ SExpr::List(..)] = items else {
            return Err(pos.error("expected (define <name> <atom>)"));
        };

        if name == "define" || AtomType::from_name(name).is_ok() {
            return Err(name_pos.error(format!("cannot define reserved name `{name}`")));
        }
        if let Some(first) = self.defines.get(name.as_str()) {
            // Concatenated or reloaded files repeat their defines
            if first.body.same_shape(body) {
                return Ok(());
            }
            return Err(name_pos.error(format!(
                "`{name}` already defined at line {}, column {}",
                first.pos.line, first.pos.column
            )));
        }

        let entry = self.atom(body)?;
        self.batch.set_label(entry, name.clone());
        self.defines.insert(
            name.as_str(),
            Definition {
                entry,
                pos: *name_pos,
                body,
            },
        );
        Ok(())
    }

    /// Queue an atom expression (and its nested children); returns its entry
    fn atom(&mut self, expr: &SExpr) -> Result<usize> {
        let SExpr::List(items, pos) = expr else {
            return Err(expr.pos().error("expected an atom expression"));
        };
        let Some((head, args)) = items.split_first() else {
            return Err(pos.error("empty expression"));
        };
        let SExpr::Symbol(type_name, type_pos) = head else {
            return Err(head.pos().error("expected an atom type name"));
        };
        let atom_type = AtomType::from_name(type_name)
            .map_err(|_| type_pos.error(format!("unknown atom type `{type_name}`")))?;

        if atom_type.is_node() {
            let [SExpr::Str(name, _)] = args else {
                return Err(pos.error(format!("{atom_type} takes exactly one string name")));
            };
            let entry = self.batch.len();
            self.batch.add_node(atom_type, name.clone());
            return Ok(entry);
        }

        let mut outgoing = Vec::with_capacity(args.len());
        let mut symbols = Vec::new();
        for (position, arg) in args.iter().enumerate() {
            match arg {
                SExpr::List(..) => outgoing.push(AtomRef::Pending(self.atom(arg)?)),
                SExpr::Symbol(name, at) => {
                    // Patched in `finish` once every define is known
                    outgoing.push(AtomRef::Pending(usize::MAX));
                    symbols.push((position, name.clone(), *at));
                }
                SExpr::Str(_, at) => {
                    return Err(at.error(format!("{atom_type} takes atoms, not string literals")));
                }
            }
        }

        let entry = self.batch.len();
        self.batch.add_link(atom_type, outgoing);
        self.unresolved
            .extend(symbols.into_iter().map(|(position, name, pos)| Unresolved {
                entry,
                position,
                name,
                pos,
            }));
        Ok(entry)
    }

    fn finish(self) -> Result<AtomBatch> {
        let Self {
            mut batch,
            defines,
            unresolved,
        } = self;

        for reference in unresolved {
            let Some(target) = defines.get(reference.name.as_str()) else {
                return Err(reference
                    .pos
                    .error(format!("reference to undefined name `{}`", reference.name)));
            };
            batch.set_child(
                reference.entry,
                reference.position,
                AtomRef::Pending(target.entry),
            );
        }

        Ok(batch)
    }
}
