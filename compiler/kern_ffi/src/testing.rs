//! Program fixtures for exercising the pass.
//!
//! Builds minimal `dart:core` and FFI libraries with the declarations the
//! lowering binds against, plus helpers for annotated external procedures.
//! Used by this crate's tests and by embedders testing their own pipelines.

use kern_ir::{
    ClassId, Constant, DartType, Expr, ExprId, Field, FieldFlags, FieldId, FunctionNode,
    InstanceConstant, LibraryId, Name, Nullability, Parent, Procedure, ProcedureFlags, ProcedureId,
    Program, Span, StringInterner, VariableDecl,
};

use crate::FfiNativeConfig;

/// Classes of the core library.
#[derive(Copy, Clone, Debug)]
pub struct CoreLibrary {
    pub library: LibraryId,
    pub int: ClassId,
    pub double: ClassId,
    pub string: ClassId,
}

impl CoreLibrary {
    pub fn int_type(&self) -> DartType {
        DartType::simple(self.int, Nullability::NonNullable)
    }

    pub fn double_type(&self) -> DartType {
        DartType::simple(self.double, Nullability::NonNullable)
    }

    pub fn string_type(&self) -> DartType {
        DartType::simple(self.string, Nullability::NonNullable)
    }
}

/// Declarations of the FFI library.
#[derive(Copy, Clone, Debug)]
pub struct FfiLibrary {
    pub library: LibraryId,
    pub marker: ClassId,
    pub native_name: FieldId,
    pub native_function: ClassId,
    pub native_function_pointer: ClassId,
    pub resolver: FieldId,
    pub from_address: ProcedureId,
    pub as_function: ProcedureId,
    /// Native marker types.
    pub native_double: ClassId,
    pub native_int32: ClassId,
    pub native_void: ClassId,
}

impl FfiLibrary {
    pub fn native_double_type(&self) -> DartType {
        DartType::simple(self.native_double, Nullability::NonNullable)
    }

    pub fn native_int32_type(&self) -> DartType {
        DartType::simple(self.native_int32, Nullability::NonNullable)
    }
}

/// Add `dart:core` with `int`, `double` and `String`.
pub fn add_core_library(program: &mut Program, interner: &StringInterner) -> CoreLibrary {
    let library = program.add_library(interner.intern("dart:core"), interner.intern("core.dart"));
    CoreLibrary {
        library,
        int: program.add_class(library, interner.intern("int")),
        double: program.add_class(library, interner.intern("double")),
        string: program.add_class(library, interner.intern("String")),
    }
}

/// Add the FFI library with every declaration named by `config`.
pub fn add_ffi_library(
    program: &mut Program,
    interner: &StringInterner,
    core: &CoreLibrary,
    config: &FfiNativeConfig,
) -> FfiLibrary {
    let library = program.add_library(
        interner.intern(&config.ffi_library),
        interner.intern("ffi.dart"),
    );

    let marker = program.add_class(library, interner.intern(&config.marker_class));
    let native_name = program.add_field(
        Field::new(
            interner.intern(&config.native_name_field),
            Parent::Class(marker),
            core.string_type(),
        )
        .with_flags(FieldFlags::FINAL),
    );

    let native_function = program.add_class(library, interner.intern(&config.native_function_class));
    let native_double = program.add_class(library, interner.intern("Double"));
    let native_int32 = program.add_class(library, interner.intern("Int32"));
    let native_void = program.add_class(library, interner.intern("Void"));

    let resolver = program.add_field(
        Field::new(
            interner.intern(&config.resolver_field),
            Parent::Library(library),
            DartType::function(
                vec![core.string_type(), core.string_type()],
                core.int_type(),
                Nullability::NonNullable,
            ),
        )
        .with_flags(FieldFlags::STATIC | FieldFlags::FINAL),
    );

    let address = program.alloc_variable(VariableDecl {
        name: interner.intern("address"),
        ty: core.int_type(),
    });
    let from_address = program.add_procedure(
        Procedure::new(
            interner.intern(&config.from_address),
            Parent::Library(library),
            FunctionNode::new(vec![address], DartType::Dynamic),
        )
        .with_flags(ProcedureFlags::STATIC | ProcedureFlags::EXTERNAL),
    );

    let pointer_class_name = config
        .as_function_class
        .as_deref()
        .unwrap_or("NativeFunctionPointer");
    let native_function_pointer = program.add_class(library, interner.intern(pointer_class_name));
    let pointer = program.alloc_variable(VariableDecl {
        name: interner.intern("pointer"),
        ty: DartType::Dynamic,
    });
    let as_function_parent = match config.as_function_class {
        Some(_) => Parent::Class(native_function_pointer),
        None => Parent::Library(library),
    };
    let as_function = program.add_procedure(
        Procedure::new(
            interner.intern(&config.as_function),
            as_function_parent,
            FunctionNode::new(vec![pointer], DartType::Dynamic),
        )
        .with_flags(ProcedureFlags::STATIC | ProcedureFlags::EXTERNAL),
    );

    FfiLibrary {
        library,
        marker,
        native_name,
        native_function,
        native_function_pointer,
        resolver,
        from_address,
        as_function,
        native_double,
        native_int32,
        native_void,
    }
}

/// `@Marker<native_type>(nativeName: symbol)` as a constant expression.
pub fn native_annotation(
    program: &mut Program,
    marker: ClassId,
    native_name: FieldId,
    native_type: DartType,
    symbol: Name,
) -> ExprId {
    let symbol = program.intern_constant(Constant::String(symbol));
    let annotation = program.intern_constant(Constant::Instance(InstanceConstant {
        class: marker,
        type_arguments: vec![native_type],
        field_values: vec![(native_name, symbol)],
    }));
    program.alloc_expr(Expr::Constant(annotation), Span::DUMMY)
}

/// Add `external static <return_type> name(<params>)` to `library`.
pub fn add_external_procedure(
    program: &mut Program,
    library: LibraryId,
    name: Name,
    params: &[(Name, DartType)],
    return_type: DartType,
    annotations: Vec<ExprId>,
) -> ProcedureId {
    let positional = params
        .iter()
        .map(|(name, ty)| {
            program.alloc_variable(VariableDecl {
                name: *name,
                ty: ty.clone(),
            })
        })
        .collect();
    program.add_procedure(
        Procedure::new(
            name,
            Parent::Library(library),
            FunctionNode::new(positional, return_type),
        )
        .with_flags(ProcedureFlags::STATIC | ProcedureFlags::EXTERNAL)
        .with_annotations(annotations),
    )
}
