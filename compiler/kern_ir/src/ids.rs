//! Typed node ids.
//!
//! Every node kind lives in its own arena inside [`Program`](crate::Program)
//! and is addressed by a `u32` newtype. Ids are never reused or moved, so a
//! handle taken before a pass stays valid after it.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create an id from a raw arena index.
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Get the index into the arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the raw u32 value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// Index of a library in the program.
    LibraryId
);
define_id!(
    /// Index of a class declaration.
    ClassId
);
define_id!(
    /// Index of a procedure declaration (top-level or class member).
    ProcedureId
);
define_id!(
    /// Index of a field declaration (top-level or class member).
    FieldId
);
define_id!(
    /// Index of a variable declaration (procedure parameters).
    VariableId
);
define_id!(
    /// Index into the expression arena.
    ExprId
);
define_id!(
    /// Index into the statement arena.
    StmtId
);
define_id!(
    /// Index into the constant pool.
    ConstantId
);
define_id!(
    /// Index of a reference slot (stable declaration identity).
    ReferenceId
);

/// Convert an arena length to the next id, panicking on overflow.
///
/// Arenas hold at most `u32::MAX` nodes of each kind.
pub(crate) fn next_index(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len} exceeds u32::MAX"))
}
