//! Recognition of the marker annotation.

use kern_ir::{DartType, Expr, InstanceConstant, Name, ProcedureId, Program};

use super::FfiNativeTransformer;
use crate::FfiNativeError;

/// What the marker annotation says about a procedure.
#[derive(Clone, Debug)]
pub(super) struct NativeBinding {
    pub(super) symbol: Name,
    /// Native signature, the marker's single type argument.
    pub(super) native_type: DartType,
}

impl FfiNativeTransformer<'_> {
    /// The first annotation that is a constant instance of exactly the
    /// marker class.
    ///
    /// A same-named class from another library is a different class id and
    /// never matches.
    pub(super) fn find_native_binding(
        &self,
        program: &Program,
        procedure: ProcedureId,
    ) -> Result<Option<NativeBinding>, FfiNativeError> {
        let node = program.procedure(procedure);
        for &annotation in &node.annotations {
            let Expr::Constant(constant) = program.expr(annotation) else {
                continue;
            };
            let Some(instance) = program.constant(*constant).as_instance() else {
                continue;
            };
            if instance.class != self.helpers.marker_class {
                continue;
            }
            return self
                .extract_binding(program, instance)
                .map(Some)
                .map_err(|reason| FfiNativeError::MalformedAnnotation {
                    procedure: self.interner.lookup(node.name).to_owned(),
                    reason,
                });
        }
        Ok(None)
    }

    fn extract_binding(
        &self,
        program: &Program,
        instance: &InstanceConstant,
    ) -> Result<NativeBinding, &'static str> {
        let [native_type] = instance.type_arguments.as_slice() else {
            return Err("expected exactly one type argument");
        };
        let value = instance
            .field_value(self.helpers.native_name_field)
            .ok_or("missing native symbol name")?;
        let symbol = program
            .constant(value)
            .as_string()
            .ok_or("native symbol name is not a string")?;
        Ok(NativeBinding {
            symbol,
            native_type: native_type.clone(),
        })
    }
}
