//! Language-level types.
//!
//! Types are small value trees rather than arena nodes: they are compared
//! structurally, copied into synthesized invocations as type arguments, and
//! never carry identity of their own.

use crate::ClassId;

/// Nullability marker on interface and function types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Nullability {
    /// `T?`
    Nullable,
    /// `T`
    NonNullable,
    /// `T*`, from libraries compiled without sound null safety.
    Legacy,
}

impl Nullability {
    /// Suffix used when printing a type with this nullability.
    pub const fn suffix(self) -> &'static str {
        match self {
            Nullability::Nullable => "?",
            Nullability::NonNullable => "",
            Nullability::Legacy => "*",
        }
    }
}

/// A type as seen by the language (and by the native call boundary, whose
/// marker types such as `Double` are ordinary interface types).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum DartType {
    Dynamic,
    Void,
    Never,
    Interface(InterfaceType),
    Function(FunctionType),
}

/// `C<T0, ..., Tn>` with a nullability marker.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceType {
    pub class: ClassId,
    pub nullability: Nullability,
    pub type_arguments: Vec<DartType>,
}

/// `R Function(P0, ..., Pn)` with a nullability marker.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionType {
    pub positional: Vec<DartType>,
    pub return_type: Box<DartType>,
    pub nullability: Nullability,
}

impl FunctionType {
    pub fn new(positional: Vec<DartType>, return_type: DartType, nullability: Nullability) -> Self {
        FunctionType {
            positional,
            return_type: Box::new(return_type),
            nullability,
        }
    }
}

impl DartType {
    /// Interface type without type arguments.
    pub fn simple(class: ClassId, nullability: Nullability) -> Self {
        Self::generic(class, nullability, Vec::new())
    }

    /// Interface type with type arguments.
    pub fn generic(class: ClassId, nullability: Nullability, type_arguments: Vec<DartType>) -> Self {
        DartType::Interface(InterfaceType {
            class,
            nullability,
            type_arguments,
        })
    }

    /// Function type.
    pub fn function(positional: Vec<DartType>, return_type: DartType, nullability: Nullability) -> Self {
        DartType::Function(FunctionType::new(positional, return_type, nullability))
    }

    /// The function type, if this is one.
    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            DartType::Function(function) => Some(function),
            DartType::Dynamic | DartType::Void | DartType::Never | DartType::Interface(_) => None,
        }
    }
}
