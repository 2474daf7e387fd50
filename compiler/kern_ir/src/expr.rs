//! Expressions and statements.
//!
//! A closed set of node kinds; passes dispatch with an exhaustive `match`
//! and leave every kind they do not care about unchanged.

use crate::{ConstantId, DartType, ExprId, FieldId, FunctionType, ProcedureId, StmtId, VariableId};

/// Static member target of a read.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum MemberRef {
    Field(FieldId),
    Procedure(ProcedureId),
}

/// Type and positional arguments of an invocation.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Arguments {
    pub types: Vec<DartType>,
    pub positional: Vec<ExprId>,
}

impl Arguments {
    pub fn new(positional: Vec<ExprId>) -> Self {
        Arguments {
            types: Vec::new(),
            positional,
        }
    }

    pub fn with_types(types: Vec<DartType>, positional: Vec<ExprId>) -> Self {
        Arguments { types, positional }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// Reference to a canonicalized constant (annotations are constants).
    Constant(ConstantId),
    /// Read of a static field or tear-off of a static procedure.
    StaticGet(MemberRef),
    /// Direct call of a static procedure.
    StaticInvocation {
        target: ProcedureId,
        arguments: Arguments,
    },
    /// Call of a callable value, typed by the receiver's static function type.
    FunctionInvocation {
        receiver: ExprId,
        arguments: Arguments,
        function_type: FunctionType,
    },
    VariableGet(VariableId),
    IntLiteral(i64),
    /// Float stored as bits for Hash compatibility.
    DoubleLiteral(u64),
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Stmt {
    /// `return;` or `return e;`
    Return(Option<ExprId>),
    Expression(ExprId),
    Block(Vec<StmtId>),
}
