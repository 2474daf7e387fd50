//! Debug-mode validation of program invariants.
//!
//! Walks every library and declaration and asserts that:
//! - All member, statement and expression ids resolve to allocated nodes
//! - Every member's `parent` points back at the declaration listing it
//! - Top-level member names are unique per library
//! - Every declaration's reference slot has the right kind and is bound to it
//! - External procedures have no body
//!
//! These checks are enabled only in debug builds (`debug_assert!`). Passes
//! call this after rewriting the tree so a broken splice is caught before a
//! backend consumes it.

use rustc_hash::FxHashSet;

use crate::reference::NodeHandle;
use crate::{ExprId, LibraryId, Member, Parent, Program, ReferenceId, StmtId};

/// Validate that a program satisfies all structural invariants.
///
/// Panics with a descriptive message if any invariant is violated.
pub fn validate(program: &Program) {
    for library in program.library_ids() {
        validate_library(program, library);
    }
}

fn validate_library(program: &Program, id: LibraryId) {
    let library = program.library(id);
    let mut names = FxHashSet::default();

    for &member in &library.members {
        let name = match member {
            Member::Class(class) => {
                debug_assert!(
                    class.index() < program.class_count(),
                    "{id:?} lists {class:?} but only {} classes exist",
                    program.class_count(),
                );
                let decl = program.class(class);
                debug_assert_eq!(decl.library, id, "{class:?} is listed by {id:?}");
                validate_reference(program, program.class_reference(class), NodeHandle::Class(class));
                for &field in &decl.fields {
                    validate_field(program, field, Parent::Class(class));
                }
                for &procedure in &decl.procedures {
                    validate_procedure(program, procedure, Parent::Class(class));
                }
                decl.name
            }
            Member::Field(field) => {
                validate_field(program, field, Parent::Library(id));
                program.field(field).name
            }
            Member::Procedure(procedure) => {
                validate_procedure(program, procedure, Parent::Library(id));
                program.procedure(procedure).name
            }
        };
        debug_assert!(
            names.insert(name),
            "{id:?} declares {name:?} more than once",
        );
    }
}

fn validate_field(program: &Program, id: crate::FieldId, parent: Parent) {
    debug_assert!(
        id.index() < program.field_count(),
        "{id:?} out of bounds (program has {} fields)",
        program.field_count(),
    );
    let field = program.field(id);
    debug_assert_eq!(field.parent, parent, "{id:?} has the wrong parent");
    validate_reference(program, program.field_reference(id), NodeHandle::Field(id));
    if let Some(initializer) = field.initializer {
        validate_expr_id(program, initializer);
    }
    for &annotation in &field.annotations {
        validate_expr_id(program, annotation);
    }
}

fn validate_procedure(program: &Program, id: crate::ProcedureId, parent: Parent) {
    debug_assert!(
        id.index() < program.procedure_count(),
        "{id:?} out of bounds (program has {} procedures)",
        program.procedure_count(),
    );
    let procedure = program.procedure(id);
    debug_assert_eq!(procedure.parent, parent, "{id:?} has the wrong parent");
    validate_reference(
        program,
        program.procedure_reference(id),
        NodeHandle::Procedure(id),
    );
    debug_assert!(
        !(procedure.is_external() && procedure.function.body.is_some()),
        "{id:?} is external but has a body",
    );
    for &variable in &procedure.function.positional {
        debug_assert!(
            variable.index() < program.variable_count(),
            "{id:?} references {variable:?} but only {} variables exist",
            program.variable_count(),
        );
    }
    if let Some(body) = procedure.function.body {
        validate_stmt_id(program, body);
    }
    for &annotation in &procedure.annotations {
        validate_expr_id(program, annotation);
    }
}

fn validate_reference(program: &Program, reference: ReferenceId, node: NodeHandle) {
    let slot = program.reference(reference);
    debug_assert!(slot.is_some(), "{node:?} references missing {reference:?}");
    if let Some(slot) = slot {
        debug_assert_eq!(slot.kind, node.kind(), "{reference:?} has the wrong kind");
        debug_assert_eq!(
            slot.node,
            Some(node),
            "{reference:?} is not bound to its declaration",
        );
    }
}

fn validate_expr_id(program: &Program, id: ExprId) {
    debug_assert!(
        id.index() < program.expr_count(),
        "{id:?} out of bounds (program has {} expressions)",
        program.expr_count(),
    );
}

fn validate_stmt_id(program: &Program, id: StmtId) {
    debug_assert!(
        id.index() < program.stmt_count(),
        "{id:?} out of bounds (program has {} statements)",
        program.stmt_count(),
    );
}
