//! Kern IR - kernel intermediate representation
//!
//! This crate contains the data structures the kern passes rewrite:
//! - Names for interned identifiers and the interner that produces them
//! - Typed ids for every node kind (libraries, members, expressions, ...)
//! - The `Program` arena that owns every node
//! - The symbol index used to resolve well-known declarations
//! - Reference slots that keep declaration identity stable across runs
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → `Name(u32)`
//! - **Flatten Everything**: No `Box<Expr>`, children are `ExprId(u32)` indices
//! - **Append, Never Rewire**: adding a declaration pushes an id onto its
//!   parent's member list; existing ids never move
//!
//! Types that contain floats store them as u64 bits for Hash compatibility.

mod constant;
mod expr;
mod ids;
pub mod index;
mod interner;
mod name;
pub mod printer;
mod program;
pub mod reference;
mod span;
mod tree;
mod types;
mod validate;

pub use constant::{Constant, InstanceConstant};
pub use expr::{Arguments, Expr, MemberRef, Stmt};
pub use ids::{
    ClassId, ConstantId, ExprId, FieldId, LibraryId, ProcedureId, ReferenceId, StmtId, VariableId,
};
pub use index::{IndexError, LibraryIndex, SymbolIndex};
pub use interner::{InternError, StringInterner, StringLookup};
pub use name::Name;
pub use program::Program;
pub use reference::{
    NodeHandle, ReferenceError, ReferenceFromIndex, ReferenceKind, ReferenceSlot, ReferenceTable,
};
pub use span::Span;
pub use tree::{
    Class, Field, FieldFlags, FunctionNode, Library, Member, Parent, Procedure, ProcedureFlags,
    VariableDecl,
};
pub use types::{DartType, FunctionType, InterfaceType, Nullability};
pub use validate::validate;
