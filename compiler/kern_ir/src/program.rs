//! The program arena.
//!
//! [`Program`] owns every node of a compilation unit in flat arrays indexed
//! by typed ids. Declaration reference slots are kept in arrays parallel to
//! the declarations (`field_references[i]` is the slot of `FieldId(i)`).
//!
//! Adding a declaration appends it to its arena and pushes its id onto the
//! parent's member list; nothing is ever removed or re-indexed, so ids taken
//! before a pass remain valid after it.

use rustc_hash::FxHashMap;

use crate::ids::next_index;
use crate::reference::{NodeHandle, ReferenceError, ReferenceKind, ReferenceSlot};
use crate::{
    Class, ClassId, Constant, ConstantId, Expr, ExprId, Field, FieldId, FunctionType, Library,
    LibraryId, Member, Name, Nullability, Parent, Procedure, ProcedureId, ReferenceId, Span, Stmt,
    StmtId, VariableDecl, VariableId,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    libraries: Vec<Library>,
    classes: Vec<Class>,
    class_references: Vec<ReferenceId>,
    procedures: Vec<Procedure>,
    procedure_references: Vec<ReferenceId>,
    fields: Vec<Field>,
    field_references: Vec<ReferenceId>,
    variables: Vec<VariableDecl>,
    /// Expression kinds (parallel with `expr_spans`).
    exprs: Vec<Expr>,
    expr_spans: Vec<Span>,
    stmts: Vec<Stmt>,
    constants: Vec<Constant>,
    /// Canonicalization map: structurally equal constants share one id.
    constant_ids: FxHashMap<Constant, ConstantId>,
    references: Vec<ReferenceSlot>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    // Libraries

    pub fn add_library(&mut self, import_uri: Name, file_uri: Name) -> LibraryId {
        let id = LibraryId::new(next_index(self.libraries.len(), "libraries"));
        self.libraries.push(Library {
            import_uri,
            file_uri,
            members: Vec::new(),
        });
        id
    }

    #[inline]
    pub fn library(&self, id: LibraryId) -> &Library {
        &self.libraries[id.index()]
    }

    /// All libraries in the order they were added.
    pub fn library_ids(&self) -> impl Iterator<Item = LibraryId> {
        (0..next_index(self.libraries.len(), "libraries")).map(LibraryId::new)
    }

    pub fn library_count(&self) -> usize {
        self.libraries.len()
    }

    pub fn find_library(&self, import_uri: Name) -> Option<LibraryId> {
        self.library_ids()
            .find(|&id| self.library(id).import_uri == import_uri)
    }

    /// Top-level procedures of a library, in declaration order.
    pub fn top_level_procedures(&self, library: LibraryId) -> Vec<ProcedureId> {
        self.library(library)
            .members
            .iter()
            .filter_map(|member| match member {
                Member::Procedure(id) => Some(*id),
                Member::Class(_) | Member::Field(_) => None,
            })
            .collect()
    }

    /// Find a top-level member of `library` by name.
    pub fn lookup_member(&self, library: LibraryId, name: Name) -> Option<Member> {
        self.library(library)
            .members
            .iter()
            .copied()
            .find(|&member| self.member_name(member) == name)
    }

    pub fn member_name(&self, member: Member) -> Name {
        match member {
            Member::Class(id) => self.class(id).name,
            Member::Field(id) => self.field(id).name,
            Member::Procedure(id) => self.procedure(id).name,
        }
    }

    // Classes

    pub fn add_class(&mut self, library: LibraryId, name: Name) -> ClassId {
        let id = ClassId::new(next_index(self.classes.len(), "classes"));
        self.classes.push(Class {
            name,
            library,
            fields: Vec::new(),
            procedures: Vec::new(),
        });
        let reference = self.bound_reference(NodeHandle::Class(id));
        self.class_references.push(reference);
        self.libraries[library.index()]
            .members
            .push(Member::Class(id));
        id
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn class_reference(&self, id: ClassId) -> ReferenceId {
        self.class_references[id.index()]
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    // Fields

    /// Add a field bound to a freshly allocated reference slot.
    pub fn add_field(&mut self, field: Field) -> FieldId {
        let id = FieldId::new(next_index(self.fields.len(), "fields"));
        let reference = self.bound_reference(NodeHandle::Field(id));
        self.push_field(field, reference)
    }

    /// Add a field, binding it to `reference` when given.
    ///
    /// The slot is checked before anything is added: on error the program
    /// is unchanged.
    pub fn add_field_with_reference(
        &mut self,
        field: Field,
        reference: Option<ReferenceId>,
    ) -> Result<FieldId, ReferenceError> {
        let Some(reference) = reference else {
            return Ok(self.add_field(field));
        };
        let id = FieldId::new(next_index(self.fields.len(), "fields"));
        self.bind_reference(reference, NodeHandle::Field(id))?;
        Ok(self.push_field(field, reference))
    }

    fn push_field(&mut self, field: Field, reference: ReferenceId) -> FieldId {
        let id = FieldId::new(next_index(self.fields.len(), "fields"));
        let parent = field.parent;
        self.fields.push(field);
        self.field_references.push(reference);
        match parent {
            Parent::Library(library) => self.libraries[library.index()]
                .members
                .push(Member::Field(id)),
            Parent::Class(class) => self.classes[class.index()].fields.push(id),
        }
        id
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn field_mut(&mut self, id: FieldId) -> &mut Field {
        &mut self.fields[id.index()]
    }

    #[inline]
    pub fn field_reference(&self, id: FieldId) -> ReferenceId {
        self.field_references[id.index()]
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    // Procedures

    pub fn add_procedure(&mut self, procedure: Procedure) -> ProcedureId {
        let id = ProcedureId::new(next_index(self.procedures.len(), "procedures"));
        let reference = self.bound_reference(NodeHandle::Procedure(id));
        let parent = procedure.parent;
        self.procedures.push(procedure);
        self.procedure_references.push(reference);
        match parent {
            Parent::Library(library) => self.libraries[library.index()]
                .members
                .push(Member::Procedure(id)),
            Parent::Class(class) => self.classes[class.index()].procedures.push(id),
        }
        id
    }

    #[inline]
    pub fn procedure(&self, id: ProcedureId) -> &Procedure {
        &self.procedures[id.index()]
    }

    #[inline]
    pub fn procedure_mut(&mut self, id: ProcedureId) -> &mut Procedure {
        &mut self.procedures[id.index()]
    }

    #[inline]
    pub fn procedure_reference(&self, id: ProcedureId) -> ReferenceId {
        self.procedure_references[id.index()]
    }

    pub fn procedure_count(&self) -> usize {
        self.procedures.len()
    }

    /// The function type of a procedure as seen by its callers.
    ///
    /// Built from the declared parameter and return types.
    pub fn function_type(&self, id: ProcedureId, nullability: Nullability) -> FunctionType {
        let function = &self.procedure(id).function;
        let positional = function
            .positional
            .iter()
            .map(|&variable| self.variable(variable).ty.clone())
            .collect();
        FunctionType::new(positional, function.return_type.clone(), nullability)
    }

    // Variables, expressions, statements

    pub fn alloc_variable(&mut self, variable: VariableDecl) -> VariableId {
        let id = VariableId::new(next_index(self.variables.len(), "variables"));
        self.variables.push(variable);
        id
    }

    #[inline]
    pub fn variable(&self, id: VariableId) -> &VariableDecl {
        &self.variables[id.index()]
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn alloc_expr(&mut self, expr: Expr, span: Span) -> ExprId {
        let id = ExprId::new(next_index(self.exprs.len(), "expressions"));
        self.exprs.push(expr);
        self.expr_spans.push(span);
        id
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_span(&self, id: ExprId) -> Span {
        self.expr_spans[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(next_index(self.stmts.len(), "statements"));
        self.stmts.push(stmt);
        id
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    // Constants

    /// Canonicalize a constant, returning the id shared by all equal constants.
    pub fn intern_constant(&mut self, constant: Constant) -> ConstantId {
        if let Some(&id) = self.constant_ids.get(&constant) {
            return id;
        }
        let id = ConstantId::new(next_index(self.constants.len(), "constants"));
        self.constants.push(constant.clone());
        self.constant_ids.insert(constant, id);
        id
    }

    #[inline]
    pub fn constant(&self, id: ConstantId) -> &Constant {
        &self.constants[id.index()]
    }

    pub fn constant_count(&self) -> usize {
        self.constants.len()
    }

    // References

    /// Reserve an unbound slot for a declaration that will be created later.
    pub fn reserve_reference(&mut self, kind: ReferenceKind) -> ReferenceId {
        let id = ReferenceId::new(next_index(self.references.len(), "references"));
        self.references.push(ReferenceSlot { kind, node: None });
        id
    }

    /// Get a slot, if it exists.
    pub fn reference(&self, id: ReferenceId) -> Option<&ReferenceSlot> {
        self.references.get(id.index())
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Bind an existing slot to `node`.
    ///
    /// Fails without modifying the slot if it is unknown, was reserved for
    /// another kind of declaration, or is already bound.
    fn bind_reference(&mut self, reference: ReferenceId, node: NodeHandle) -> Result<(), ReferenceError> {
        let slot = self
            .references
            .get_mut(reference.index())
            .ok_or(ReferenceError::Unknown(reference))?;
        if slot.kind != node.kind() {
            return Err(ReferenceError::KindMismatch {
                reference,
                expected: slot.kind,
                found: node.kind(),
            });
        }
        if let Some(bound) = slot.node {
            return Err(ReferenceError::AlreadyBound {
                reference,
                node: bound,
            });
        }
        slot.node = Some(node);
        Ok(())
    }

    fn bound_reference(&mut self, node: NodeHandle) -> ReferenceId {
        let id = ReferenceId::new(next_index(self.references.len(), "references"));
        self.references.push(ReferenceSlot {
            kind: node.kind(),
            node: Some(node),
        });
        id
    }
}
