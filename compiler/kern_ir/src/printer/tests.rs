use pretty_assertions::assert_eq;

use super::*;
use crate::{
    Arguments, Field, FunctionNode, InstanceConstant, Nullability, Procedure, ProcedureFlags, Span,
    StringInterner, VariableDecl,
};

#[test]
fn test_print_declarations() {
    let interner = StringInterner::new();
    let mut program = Program::new();
    let core = program.add_library(interner.intern("dart:core"), interner.intern("core.dart"));
    let int = program.add_class(core, interner.intern("int"));
    let string = program.add_class(core, interner.intern("String"));
    let int_ty = DartType::simple(int, Nullability::NonNullable);

    let meta = program.add_class(core, interner.intern("pragma"));
    let meta_name = program.add_field(
        Field::new(
            interner.intern("name"),
            Parent::Class(meta),
            DartType::simple(string, Nullability::NonNullable),
        )
        .with_flags(FieldFlags::FINAL),
    );

    let limit = program.alloc_expr(Expr::IntLiteral(64), Span::DUMMY);
    program.add_field(
        Field::new(interner.intern("limit"), Parent::Library(core), int_ty.clone())
            .with_initializer(limit)
            .with_flags(FieldFlags::STATIC | FieldFlags::CONST),
    );

    let n = program.alloc_variable(VariableDecl {
        name: interner.intern("n"),
        ty: int_ty.clone(),
    });
    let inline = interner.intern("vm:prefer-inline");
    let pragma_value = program.intern_constant(Constant::String(inline));
    let pragma = program.intern_constant(Constant::Instance(InstanceConstant {
        class: meta,
        type_arguments: Vec::new(),
        field_values: vec![(meta_name, pragma_value)],
    }));
    let annotation = program.alloc_expr(Expr::Constant(pragma), Span::DUMMY);
    let read = program.alloc_expr(Expr::VariableGet(n), Span::DUMMY);
    let ret = program.alloc_stmt(Stmt::Return(Some(read)));
    let mut function = FunctionNode::new(vec![n], int_ty.clone());
    function.body = Some(ret);
    program.add_procedure(
        Procedure::new(interner.intern("identity"), Parent::Library(core), function)
            .with_flags(ProcedureFlags::STATIC)
            .with_annotations(vec![annotation]),
    );

    let ext = program.add_procedure(
        Procedure::new(
            interner.intern("_hash"),
            Parent::Library(core),
            FunctionNode::new(Vec::new(), int_ty),
        )
        .with_flags(ProcedureFlags::STATIC | ProcedureFlags::EXTERNAL),
    );
    let call = program.alloc_expr(
        Expr::StaticInvocation {
            target: ext,
            arguments: Arguments::new(Vec::new()),
        },
        Span::DUMMY,
    );
    let stmt = program.alloc_stmt(Stmt::Expression(call));
    let block = program.alloc_stmt(Stmt::Block(vec![stmt]));
    let mut function = FunctionNode::new(Vec::new(), DartType::Void);
    function.body = Some(block);
    program.add_procedure(
        Procedure::new(interner.intern("touch"), Parent::Library(core), function)
            .with_flags(ProcedureFlags::STATIC),
    );

    let expected = "\
library dart:core;
class int {}
class String {}
class pragma {
  final String name;
}
static const int limit = 64;
@pragma{name: \"vm:prefer-inline\"}
static int identity(int n) {
  return n;
}
external static int _hash();
static void touch() {
  _hash();
}
";
    assert_eq!(print_library(&program, &interner, core), expected);
}

#[test]
fn test_print_types() {
    let interner = StringInterner::new();
    let mut program = Program::new();
    let ffi = program.add_library(interner.intern("dart:ffi"), interner.intern("ffi.dart"));
    let double = program.add_class(ffi, interner.intern("Double"));
    let native_function = program.add_class(ffi, interner.intern("NativeFunction"));
    let signature = DartType::function(
        vec![DartType::simple(double, Nullability::NonNullable)],
        DartType::simple(double, Nullability::NonNullable),
        Nullability::NonNullable,
    );
    let pointer = DartType::generic(native_function, Nullability::Legacy, vec![signature]);
    let callback = DartType::function(vec![pointer], DartType::Void, Nullability::Nullable);

    let field = program.add_field(Field::new(
        interner.intern("callback"),
        Parent::Library(ffi),
        callback,
    ));

    let text = print_library(&program, &interner, ffi);
    assert!(
        text.contains(
            "void Function(NativeFunction<Double Function(Double)>*)? callback;"
        ),
        "{text}"
    );
    assert_eq!(program.field(field).name, interner.intern("callback"));
}

#[test]
fn test_print_program_joins_libraries() {
    let interner = StringInterner::new();
    let mut program = Program::new();
    program.add_library(interner.intern("dart:a"), interner.intern("a.dart"));
    program.add_library(interner.intern("dart:b"), interner.intern("b.dart"));
    assert_eq!(
        print_program(&program, &interner),
        "library dart:a;\n\nlibrary dart:b;\n"
    );
}
