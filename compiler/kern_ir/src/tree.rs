//! Declarations: libraries, classes, procedures, fields and variables.
//!
//! Declarations own no reference slot directly; the program keeps slots in
//! a parallel array indexed by the declaration id (see `Program::field_reference`).

use bitflags::bitflags;

use crate::{ClassId, DartType, ExprId, FieldId, LibraryId, Name, ProcedureId, Span, StmtId, VariableId};

bitflags! {
    /// Procedure modifiers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct ProcedureFlags: u8 {
        /// Not an instance member.
        const STATIC = 1 << 0;
        /// Declared without a body; the implementation is supplied elsewhere.
        const EXTERNAL = 1 << 1;
    }
}

bitflags! {
    /// Field modifiers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct FieldFlags: u8 {
        const STATIC = 1 << 0;
        /// Cannot be reassigned after initialization.
        const FINAL = 1 << 1;
        const CONST = 1 << 2;
        /// Initialization is deferred and may be performed by assignment.
        const LATE = 1 << 3;
    }
}

/// A top-level declaration, in library declaration order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Member {
    Class(ClassId),
    Field(FieldId),
    Procedure(ProcedureId),
}

/// Enclosing declaration of a member.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Parent {
    Library(LibraryId),
    Class(ClassId),
}

/// A library: one compilation unit identified by its import URI.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Library {
    /// Identity of the library, e.g. `dart:math` or `package:foo/foo.dart`.
    pub import_uri: Name,
    /// File the library was read from.
    pub file_uri: Name,
    /// Top-level declarations in declaration order.
    pub members: Vec<Member>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Class {
    pub name: Name,
    pub library: LibraryId,
    pub fields: Vec<FieldId>,
    pub procedures: Vec<ProcedureId>,
}

/// A local variable; procedure parameters are variables too.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableDecl {
    pub name: Name,
    pub ty: DartType,
}

/// Signature and body of a procedure.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionNode {
    /// Positional parameters in declaration order.
    pub positional: Vec<VariableId>,
    pub return_type: DartType,
    /// `None` for external and abstract procedures.
    pub body: Option<StmtId>,
}

impl FunctionNode {
    pub fn new(positional: Vec<VariableId>, return_type: DartType) -> Self {
        FunctionNode {
            positional,
            return_type,
            body: None,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Procedure {
    pub name: Name,
    pub parent: Parent,
    pub flags: ProcedureFlags,
    pub function: FunctionNode,
    /// Metadata attached to the declaration (usually constant expressions).
    pub annotations: Vec<ExprId>,
    pub span: Span,
}

impl Procedure {
    pub fn new(name: Name, parent: Parent, function: FunctionNode) -> Self {
        Procedure {
            name,
            parent,
            flags: ProcedureFlags::empty(),
            function,
            annotations: Vec::new(),
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ProcedureFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: Vec<ExprId>) -> Self {
        self.annotations = annotations;
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.flags.contains(ProcedureFlags::EXTERNAL)
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(ProcedureFlags::STATIC)
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: Name,
    pub parent: Parent,
    pub ty: DartType,
    /// Evaluated lazily on first read for static fields.
    pub initializer: Option<ExprId>,
    pub flags: FieldFlags,
    pub annotations: Vec<ExprId>,
    pub file_uri: Name,
    pub span: Span,
}

impl Field {
    pub fn new(name: Name, parent: Parent, ty: DartType) -> Self {
        Field {
            name,
            parent,
            ty,
            initializer: None,
            flags: FieldFlags::empty(),
            annotations: Vec::new(),
            file_uri: Name::EMPTY,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_initializer(mut self, initializer: ExprId) -> Self {
        self.initializer = Some(initializer);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_file_uri(mut self, file_uri: Name) -> Self {
        self.file_uri = file_uri;
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldFlags::STATIC)
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.flags.contains(FieldFlags::FINAL)
    }
}
