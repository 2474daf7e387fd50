//! Canonicalized constants.

use crate::{ClassId, ConstantId, DartType, FieldId, Name};

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    /// Float stored as bits for Hash compatibility.
    Double(u64),
    String(Name),
    Instance(InstanceConstant),
}

/// `const C<T0, ...>(field: value, ...)`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceConstant {
    pub class: ClassId,
    pub type_arguments: Vec<DartType>,
    /// Field values keyed by the declaring field, in declaration order.
    pub field_values: Vec<(FieldId, ConstantId)>,
}

impl InstanceConstant {
    /// Value stored for `field`, if the constant carries one.
    pub fn field_value(&self, field: FieldId) -> Option<ConstantId> {
        self.field_values
            .iter()
            .find_map(|&(f, value)| (f == field).then_some(value))
    }
}

impl Constant {
    /// The interned string, if this is a string constant.
    pub fn as_string(&self) -> Option<Name> {
        match self {
            Constant::String(name) => Some(*name),
            Constant::Null
            | Constant::Bool(_)
            | Constant::Int(_)
            | Constant::Double(_)
            | Constant::Instance(_) => None,
        }
    }

    /// The instance constant, if this is one.
    pub fn as_instance(&self) -> Option<&InstanceConstant> {
        match self {
            Constant::Instance(instance) => Some(instance),
            Constant::Null
            | Constant::Bool(_)
            | Constant::Int(_)
            | Constant::Double(_)
            | Constant::String(_) => None,
        }
    }
}
