//! Property-based tests for native binding lowering.
//!
//! Generates libraries of external procedures, some carrying the marker
//! annotation, and checks that:
//! 1. Exactly the annotated procedures are lowered, each forwarding every parameter
//! 2. A second run changes nothing
//! 3. Independent runs over equal input produce equal output

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use kern_ffi::testing::{
    add_core_library, add_external_procedure, add_ffi_library, native_annotation,
};
use kern_ffi::{transform_program, FfiNativeConfig};
use kern_ir::printer::print_program;
use kern_ir::{DartType, Expr, LibraryId, Nullability, ProcedureId, Program, Stmt, StringInterner};
use proptest::prelude::*;

// -- Input Generation --

#[derive(Clone, Debug)]
struct Decl {
    symbol: String,
    arity: usize,
    annotated: bool,
}

/// Generate a native symbol name.
fn symbol_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Za-z0-9_]{0,15}").expect("valid regex")
}

/// Generate declarations with distinct symbols.
fn decls_strategy() -> impl Strategy<Value = Vec<Decl>> {
    prop::collection::btree_map(symbol_strategy(), (0usize..5, any::<bool>()), 0..8).prop_map(
        |decls| {
            decls
                .into_iter()
                .map(|(symbol, (arity, annotated))| Decl {
                    symbol,
                    arity,
                    annotated,
                })
                .collect()
        },
    )
}

struct Built {
    interner: StringInterner,
    program: Program,
    library: LibraryId,
    procedures: Vec<ProcedureId>,
}

fn build(decls: &[Decl]) -> Built {
    kern_ffi::init_tracing();
    let interner = StringInterner::new();
    let mut program = Program::new();
    let core = add_core_library(&mut program, &interner);
    let ffi = add_ffi_library(&mut program, &interner, &core, &FfiNativeConfig::default());
    let library = program.add_library(
        interner.intern("package:app/native.dart"),
        interner.intern("native.dart"),
    );

    let procedures = decls
        .iter()
        .enumerate()
        .map(|(i, decl)| {
            let annotations = if decl.annotated {
                let native = DartType::function(
                    vec![ffi.native_int32_type(); decl.arity],
                    ffi.native_int32_type(),
                    Nullability::NonNullable,
                );
                let symbol = interner.intern(&decl.symbol);
                vec![native_annotation(
                    &mut program,
                    ffi.marker,
                    ffi.native_name,
                    native,
                    symbol,
                )]
            } else {
                Vec::new()
            };
            let params: Vec<_> = (0..decl.arity)
                .map(|j| (interner.intern(&format!("p{j}")), core.int_type()))
                .collect();
            add_external_procedure(
                &mut program,
                library,
                interner.intern(&format!("_native{i}")),
                &params,
                core.int_type(),
                annotations,
            )
        })
        .collect();

    Built {
        interner,
        program,
        library,
        procedures,
    }
}

fn lower(built: &mut Built) -> kern_ffi::TransformSummary {
    transform_program(
        &mut built.program,
        &built.interner,
        None,
        &FfiNativeConfig::default(),
    )
    .unwrap()
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Annotated procedures are lowered and forward every parameter.
    #[test]
    fn prop_lowers_exactly_annotated(decls in decls_strategy()) {
        let mut built = build(&decls);
        let summary = lower(&mut built);

        prop_assert_eq!(summary.len(), decls.iter().filter(|decl| decl.annotated).count());
        for (decl, &procedure) in decls.iter().zip(&built.procedures) {
            let node = built.program.procedure(procedure);
            prop_assert_eq!(node.is_external(), !decl.annotated);
            if !decl.annotated {
                prop_assert!(node.function.body.is_none());
                continue;
            }

            let field = summary.accessor_for(procedure).unwrap();
            prop_assert_eq!(built.program.field(field).parent, kern_ir::Parent::Library(built.library));
            prop_assert_eq!(
                built.interner.lookup(built.program.field(field).name),
                format!("_@FfiNative_{}", decl.symbol)
            );

            let Some(Stmt::Return(Some(call))) =
                node.function.body.map(|body| built.program.stmt(body))
            else {
                return Err(TestCaseError::fail("lowered procedure does not return"));
            };
            let Expr::FunctionInvocation { arguments, .. } = built.program.expr(*call) else {
                return Err(TestCaseError::fail("body is not a call of the generated field"));
            };
            let forwarded: Vec<_> = arguments
                .positional
                .iter()
                .map(|&argument| built.program.expr(argument).clone())
                .collect();
            let params: Vec<_> = node
                .function
                .positional
                .iter()
                .map(|&param| Expr::VariableGet(param))
                .collect();
            prop_assert_eq!(forwarded, params);
        }
    }

    /// Lowering twice is the same as lowering once.
    #[test]
    fn prop_second_run_is_noop(decls in decls_strategy()) {
        let mut built = build(&decls);
        lower(&mut built);
        let once = built.program.clone();

        let summary = lower(&mut built);

        prop_assert!(summary.is_empty());
        prop_assert_eq!(&built.program, &once);
    }

    /// Equal input gives equal output.
    #[test]
    fn prop_deterministic(decls in decls_strategy()) {
        let mut first = build(&decls);
        let mut second = build(&decls);

        let first_summary = lower(&mut first);
        let second_summary = lower(&mut second);

        prop_assert_eq!(first_summary, second_summary);
        prop_assert_eq!(
            print_program(&first.program, &first.interner),
            print_program(&second.program, &second.interner)
        );
    }
}
