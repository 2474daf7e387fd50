//! Expression synthesis for lowered bindings.
//!
//! Synthesized nodes carry `Span::DUMMY`; the generated field carries the
//! span of the procedure it was lowered from.

use kern_ir::{
    Arguments, Constant, DartType, Expr, ExprId, FieldId, FunctionType, MemberRef, Name,
    Nullability, ProcedureId, Program, Span, Stmt, StmtId,
};

use super::{annotation::NativeBinding, FfiNativeTransformer, LibraryContext};

impl FfiNativeTransformer<'_> {
    /// `asFunction<N, D>(_fromAddress<NativeFunction<N>*>(_ffi_resolver(uri, symbol)))`
    pub(super) fn accessor_initializer(
        &self,
        program: &mut Program,
        context: &LibraryContext,
        binding: &NativeBinding,
        dart_type: &FunctionType,
    ) -> ExprId {
        let address = self.resolver_invocation(program, context.import_uri, binding.symbol);

        let pointer_type = DartType::generic(
            self.helpers.native_function_class,
            Nullability::Legacy,
            vec![binding.native_type.clone()],
        );
        let pointer = program.alloc_expr(
            Expr::StaticInvocation {
                target: self.helpers.from_address,
                arguments: Arguments::with_types(vec![pointer_type], vec![address]),
            },
            Span::DUMMY,
        );

        program.alloc_expr(
            Expr::StaticInvocation {
                target: self.helpers.as_function,
                arguments: Arguments::with_types(
                    vec![
                        binding.native_type.clone(),
                        DartType::Function(dart_type.clone()),
                    ],
                    vec![pointer],
                ),
            },
            Span::DUMMY,
        )
    }

    /// `_ffi_resolver(import_uri, symbol)`, typed by the resolver's declaration.
    fn resolver_invocation(&self, program: &mut Program, import_uri: Name, symbol: Name) -> ExprId {
        let receiver = program.alloc_expr(
            Expr::StaticGet(MemberRef::Field(self.helpers.resolver_field)),
            Span::DUMMY,
        );
        let arguments = [import_uri, symbol]
            .into_iter()
            .map(|value| {
                let constant = program.intern_constant(Constant::String(value));
                program.alloc_expr(Expr::Constant(constant), Span::DUMMY)
            })
            .collect();
        program.alloc_expr(
            Expr::FunctionInvocation {
                receiver,
                arguments: Arguments::new(arguments),
                function_type: self.helpers.resolver_type.clone(),
            },
            Span::DUMMY,
        )
    }
}

/// `return accessor(p0, ..., pn);` over the procedure's positional parameters.
pub(super) fn forwarding_body(
    program: &mut Program,
    procedure: ProcedureId,
    accessor: FieldId,
    function_type: FunctionType,
) -> StmtId {
    let parameters = program.procedure(procedure).function.positional.clone();
    let receiver = program.alloc_expr(Expr::StaticGet(MemberRef::Field(accessor)), Span::DUMMY);
    let arguments = parameters
        .into_iter()
        .map(|parameter| program.alloc_expr(Expr::VariableGet(parameter), Span::DUMMY))
        .collect();
    let call = program.alloc_expr(
        Expr::FunctionInvocation {
            receiver,
            arguments: Arguments::new(arguments),
            function_type,
        },
        Span::DUMMY,
    );
    program.alloc_stmt(Stmt::Return(Some(call)))
}
