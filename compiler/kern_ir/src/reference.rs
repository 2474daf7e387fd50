//! Reference slots: stable declaration identity.
//!
//! Every class, field and procedure is bound to exactly one slot in the
//! program's reference arena. Incremental compilation pre-reserves slots for
//! declarations it expects a pass to (re)create, and hands them out through a
//! [`ReferenceTable`]; binding a new declaration to such a slot keeps its
//! identity stable across compiler runs.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{ClassId, FieldId, Name, ProcedureId, ReferenceId};

/// Kind of declaration a slot identifies.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferenceKind {
    Class,
    Field,
    Procedure,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReferenceKind::Class => "class",
            ReferenceKind::Field => "field",
            ReferenceKind::Procedure => "procedure",
        })
    }
}

/// Declaration a slot is bound to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeHandle {
    Class(ClassId),
    Field(FieldId),
    Procedure(ProcedureId),
}

impl NodeHandle {
    pub const fn kind(self) -> ReferenceKind {
        match self {
            NodeHandle::Class(_) => ReferenceKind::Class,
            NodeHandle::Field(_) => ReferenceKind::Field,
            NodeHandle::Procedure(_) => ReferenceKind::Procedure,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceSlot {
    /// Kind fixed when the slot was created.
    pub kind: ReferenceKind,
    /// `None` while the slot is reserved but unbound.
    pub node: Option<NodeHandle>,
}

/// Error binding a declaration to a slot.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ReferenceError {
    /// The slot does not exist in this program.
    Unknown(ReferenceId),
    /// The slot was reserved for a different kind of declaration.
    KindMismatch {
        reference: ReferenceId,
        expected: ReferenceKind,
        found: ReferenceKind,
    },
    /// The slot already identifies a live declaration.
    AlreadyBound {
        reference: ReferenceId,
        node: NodeHandle,
    },
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceError::Unknown(reference) => {
                write!(f, "{reference:?} does not exist in this program")
            }
            ReferenceError::KindMismatch {
                reference,
                expected,
                found,
            } => write!(
                f,
                "{reference:?} was reserved for a {expected}, cannot bind a {found}"
            ),
            ReferenceError::AlreadyBound { reference, node } => {
                write!(f, "{reference:?} is already bound to {node:?}")
            }
        }
    }
}

impl std::error::Error for ReferenceError {}

/// Lookup of pre-reserved slots by `(library import URI, member name)`.
pub trait ReferenceTable {
    fn lookup(&self, library: Name, name: Name) -> Option<ReferenceId>;
}

/// Reference table recorded from a previous compilation of the same libraries.
#[derive(Clone, Debug, Default)]
pub struct ReferenceFromIndex {
    slots: FxHashMap<(Name, Name), ReferenceId>,
}

impl ReferenceFromIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the slot `name` in `library` was bound to.
    ///
    /// Returns the previously recorded slot, if any.
    pub fn insert(&mut self, library: Name, name: Name, reference: ReferenceId) -> Option<ReferenceId> {
        self.slots.insert((library, name), reference)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl ReferenceTable for ReferenceFromIndex {
    fn lookup(&self, library: Name, name: Name) -> Option<ReferenceId> {
        self.slots.get(&(library, name)).copied()
    }
}
