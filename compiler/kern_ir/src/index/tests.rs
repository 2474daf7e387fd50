use super::*;
use crate::{DartType, Field, FunctionNode, Parent, Procedure};

struct Fixture {
    program: Program,
    interner: StringInterner,
    ffi: LibraryId,
    marker: ClassId,
    native_name: FieldId,
    as_function: ProcedureId,
    resolver: FieldId,
}

fn fixture() -> Fixture {
    let interner = StringInterner::new();
    let mut program = Program::new();
    let ffi = program.add_library(interner.intern("dart:ffi"), interner.intern("ffi.dart"));
    let marker = program.add_class(ffi, interner.intern("FfiNative"));
    let native_name = program.add_field(Field::new(
        interner.intern("nativeName"),
        Parent::Class(marker),
        DartType::Dynamic,
    ));
    let pointer = program.add_class(ffi, interner.intern("NativeFunctionPointer"));
    let as_function = program.add_procedure(Procedure::new(
        interner.intern("asFunction"),
        Parent::Class(pointer),
        FunctionNode::new(Vec::new(), DartType::Dynamic),
    ));
    let resolver = program.add_field(Field::new(
        interner.intern("_ffi_resolver"),
        Parent::Library(ffi),
        DartType::Dynamic,
    ));
    program.add_library(interner.intern("dart:math"), interner.intern("math.dart"));

    Fixture {
        program,
        interner,
        ffi,
        marker,
        native_name,
        as_function,
        resolver,
    }
}

#[test]
fn test_resolves_indexed_members() {
    let f = fixture();
    let index = LibraryIndex::new(&f.program, &f.interner, &["dart:ffi"]);

    assert!(index.contains_library("dart:ffi"));
    assert_eq!(index.library_id("dart:ffi"), Some(f.ffi));
    assert_eq!(index.try_get_class("dart:ffi", "FfiNative"), Some(f.marker));
    assert_eq!(
        index.get_field("dart:ffi", "FfiNative", "nativeName"),
        Ok(f.native_name)
    );
    assert_eq!(
        index.get_procedure("dart:ffi", Some("NativeFunctionPointer"), "asFunction"),
        Ok(f.as_function)
    );
    assert_eq!(
        index.get_top_level_field("dart:ffi", "_ffi_resolver"),
        Ok(f.resolver)
    );
}

#[test]
fn test_missing_class_is_absent_not_error() {
    let f = fixture();
    let index = LibraryIndex::new(&f.program, &f.interner, &["dart:ffi"]);

    assert_eq!(index.try_get_class("dart:ffi", "Struct"), None);
    assert_eq!(index.try_get_class("dart:io", "FfiNative"), None);
}

#[test]
fn test_unindexed_library_is_reported() {
    let f = fixture();
    let index = LibraryIndex::new(&f.program, &f.interner, &["dart:ffi"]);

    assert!(!index.contains_library("dart:math"));
    assert_eq!(
        index.get_top_level_field("dart:math", "pi"),
        Err(IndexError::LibraryNotIndexed {
            library: "dart:math".to_owned()
        })
    );
}

#[test]
fn test_absent_library_is_skipped() {
    let f = fixture();
    let index = LibraryIndex::new(&f.program, &f.interner, &["dart:ffi", "dart:nope"]);
    assert!(index.contains_library("dart:ffi"));
    assert!(!index.contains_library("dart:nope"));
}

#[test]
fn test_missing_member_error_names_the_member() {
    let f = fixture();
    let index = LibraryIndex::new(&f.program, &f.interner, &["dart:ffi"]);

    let err = index
        .get_procedure("dart:ffi", Some("NativeFunctionPointer"), "asTypedList")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'NativeFunctionPointer.asTypedList' not found in 'dart:ffi'"
    );

    let err = index.get_top_level_field("dart:ffi", "_fromAddress").unwrap_err();
    assert_eq!(err.to_string(), "'_fromAddress' not found in 'dart:ffi'");
}

#[test]
fn test_class_members_are_not_top_level() {
    let f = fixture();
    let index = LibraryIndex::new(&f.program, &f.interner, &["dart:ffi"]);
    assert!(index.get_top_level_field("dart:ffi", "nativeName").is_err());
    assert!(index.get_procedure("dart:ffi", None, "asFunction").is_err());
}
