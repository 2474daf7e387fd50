//! Native binding lowering.
//!
//! Resolves the FFI helper declarations once, then rewrites every annotated
//! external top-level procedure of the requested libraries. Each rewrite adds
//! one static field that caches the resolved function pointer and turns the
//! procedure into a forwarder to it.

mod annotation;
mod synth;


use kern_ir::{
    ClassId, DartType, Field, FieldFlags, FieldId, FunctionType, LibraryId, LibraryIndex, Name,
    Nullability, Parent, ProcedureFlags, ProcedureId, Program, ReferenceTable, StringInterner,
    SymbolIndex,
};
use tracing::{debug, trace};

use crate::{FfiNativeConfig, FfiNativeError};

use annotation::NativeBinding;

/// One procedure rewritten by the pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoweredProcedure {
    pub library: LibraryId,
    pub procedure: ProcedureId,
    /// The generated field caching the resolved function.
    pub field: FieldId,
}

/// What a pass did, in rewrite order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub lowered: Vec<LoweredProcedure>,
}

impl TransformSummary {
    pub fn len(&self) -> usize {
        self.lowered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lowered.is_empty()
    }

    /// The field generated for `procedure`, if this pass lowered it.
    pub fn accessor_for(&self, procedure: ProcedureId) -> Option<FieldId> {
        self.lowered
            .iter()
            .find(|lowered| lowered.procedure == procedure)
            .map(|lowered| lowered.field)
    }
}

/// Lower every annotated external procedure in `libraries`.
///
/// Indexes the FFI library of `config`. When it does not declare the marker
/// class the program is left untouched and the summary is empty.
///
/// # Errors
///
/// Returns an error for a missing FFI helper, a malformed annotation, a name
/// clash on a generated field, or a reserved reference slot that cannot hold
/// it. The program may be partially rewritten in that case and must be
/// discarded.
#[tracing::instrument(level = "debug", skip_all, fields(libraries = libraries.len()))]
pub fn transform_libraries(
    program: &mut Program,
    libraries: &[LibraryId],
    interner: &StringInterner,
    references: Option<&dyn ReferenceTable>,
    config: &FfiNativeConfig,
) -> Result<TransformSummary, FfiNativeError> {
    let index = LibraryIndex::new(program, interner, &[config.ffi_library.as_str()]);
    let Some(transformer) = FfiNativeTransformer::new(program, &index, interner, references, config)?
    else {
        debug!(
            library = %config.ffi_library,
            marker = %config.marker_class,
            "native bindings not available, skipping"
        );
        return Ok(TransformSummary::default());
    };

    let mut summary = TransformSummary::default();
    for &library in libraries {
        transformer.transform_library(program, library, &mut summary)?;
    }

    #[cfg(debug_assertions)]
    kern_ir::validate(program);

    debug!(lowered = summary.len(), "native binding lowering complete");
    Ok(summary)
}

/// Lower every library of `program`.
///
/// # Errors
///
/// See [`transform_libraries`].
pub fn transform_program(
    program: &mut Program,
    interner: &StringInterner,
    references: Option<&dyn ReferenceTable>,
    config: &FfiNativeConfig,
) -> Result<TransformSummary, FfiNativeError> {
    let libraries: Vec<LibraryId> = program.library_ids().collect();
    transform_libraries(program, &libraries, interner, references, config)
}

/// FFI declarations the generated code refers to.
#[derive(Clone, Debug)]
struct FfiHelpers {
    marker_class: ClassId,
    native_name_field: FieldId,
    native_function_class: ClassId,
    resolver_field: FieldId,
    /// Declared type of `resolver_field`, carried by every resolver call.
    resolver_type: FunctionType,
    from_address: ProcedureId,
    as_function: ProcedureId,
}

/// Per-library state threaded through one library's rewrites.
#[derive(Copy, Clone, Debug)]
struct LibraryContext {
    library: LibraryId,
    import_uri: Name,
    file_uri: Name,
}

impl LibraryContext {
    fn new(program: &Program, library: LibraryId) -> Self {
        let node = program.library(library);
        LibraryContext {
            library,
            import_uri: node.import_uri,
            file_uri: node.file_uri,
        }
    }
}

/// How a procedure is handled.
enum Disposition {
    /// Not external: either never native or lowered by an earlier run.
    AlreadyLowered,
    /// External, but without the marker annotation.
    NotApplicable,
    NeedsLowering(NativeBinding),
}

/// Rewrites annotated external procedures with resolved FFI helpers.
pub struct FfiNativeTransformer<'a> {
    interner: &'a StringInterner,
    references: Option<&'a dyn ReferenceTable>,
    accessor_prefix: &'a str,
    helpers: FfiHelpers,
}

impl<'a> FfiNativeTransformer<'a> {
    /// Resolve the helpers named by `config` through `index`.
    ///
    /// Returns `Ok(None)` when the marker class is not declared, meaning the
    /// FFI library is not part of the program.
    ///
    /// # Errors
    ///
    /// Fails when the marker class exists but another helper is missing, or
    /// when the resolver field is not declared with a function type.
    pub fn new(
        program: &Program,
        index: &dyn SymbolIndex,
        interner: &'a StringInterner,
        references: Option<&'a dyn ReferenceTable>,
        config: &'a FfiNativeConfig,
    ) -> Result<Option<Self>, FfiNativeError> {
        let library = config.ffi_library.as_str();
        let Some(marker_class) = index.try_get_class(library, &config.marker_class) else {
            return Ok(None);
        };

        let native_name_field =
            index.get_field(library, &config.marker_class, &config.native_name_field)?;
        let native_function_class = index.get_class(library, &config.native_function_class)?;
        let resolver_field = index.get_top_level_field(library, &config.resolver_field)?;
        let from_address = index.get_procedure(library, None, &config.from_address)?;
        let as_function = index.get_procedure(
            library,
            config.as_function_class.as_deref(),
            &config.as_function,
        )?;

        let resolver_type = program
            .field(resolver_field)
            .ty
            .as_function()
            .cloned()
            .ok_or_else(|| FfiNativeError::ResolverNotCallable {
                field: config.resolver_field.clone(),
            })?;

        Ok(Some(FfiNativeTransformer {
            interner,
            references,
            accessor_prefix: &config.accessor_prefix,
            helpers: FfiHelpers {
                marker_class,
                native_name_field,
                native_function_class,
                resolver_field,
                resolver_type,
                from_address,
                as_function,
            },
        }))
    }

    /// Lower the annotated external top-level procedures of `library`.
    ///
    /// Procedures are visited in declaration order; fields added along the
    /// way are not revisited.
    ///
    /// # Errors
    ///
    /// See [`transform_libraries`].
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(library = self.interner.lookup(program.library(library).import_uri))
    )]
    pub fn transform_library(
        &self,
        program: &mut Program,
        library: LibraryId,
        summary: &mut TransformSummary,
    ) -> Result<(), FfiNativeError> {
        let context = LibraryContext::new(program, library);
        for procedure in program.top_level_procedures(library) {
            match self.classify(program, procedure)? {
                Disposition::AlreadyLowered => {
                    trace!(procedure = self.procedure_name(program, procedure), "not external");
                }
                Disposition::NotApplicable => {
                    trace!(procedure = self.procedure_name(program, procedure), "no native binding");
                }
                Disposition::NeedsLowering(binding) => {
                    let field = self.lower(program, &context, procedure, &binding)?;
                    summary.lowered.push(LoweredProcedure {
                        library,
                        procedure,
                        field,
                    });
                }
            }
        }
        Ok(())
    }

    fn classify(
        &self,
        program: &Program,
        procedure: ProcedureId,
    ) -> Result<Disposition, FfiNativeError> {
        if !program.procedure(procedure).is_external() {
            return Ok(Disposition::AlreadyLowered);
        }
        Ok(match self.find_native_binding(program, procedure)? {
            Some(binding) => Disposition::NeedsLowering(binding),
            None => Disposition::NotApplicable,
        })
    }

    fn lower(
        &self,
        program: &mut Program,
        context: &LibraryContext,
        procedure: ProcedureId,
        binding: &NativeBinding,
    ) -> Result<FieldId, FfiNativeError> {
        let symbol = self.interner.lookup(binding.symbol);
        let accessor = format!("{}{symbol}", self.accessor_prefix);
        let name = self.interner.intern(&accessor);

        if program.lookup_member(context.library, name).is_some() {
            return Err(FfiNativeError::DuplicateAccessor {
                library: self.interner.lookup(context.import_uri).to_owned(),
                name: accessor,
            });
        }

        let dart_type = program.function_type(procedure, Nullability::NonNullable);
        let reference = self
            .references
            .and_then(|table| table.lookup(context.import_uri, name));

        // The field goes in first so a rejected slot leaves no orphan nodes.
        let span = program.procedure(procedure).span;
        let field = program
            .add_field_with_reference(
                Field::new(
                    name,
                    Parent::Library(context.library),
                    DartType::Function(dart_type.clone()),
                )
                .with_flags(FieldFlags::STATIC | FieldFlags::FINAL)
                .with_file_uri(context.file_uri)
                .with_span(span),
                reference,
            )
            .map_err(|source| FfiNativeError::IdentityConflict {
                name: accessor.clone(),
                source,
            })?;

        let initializer = self.accessor_initializer(program, context, binding, &dart_type);
        program.field_mut(field).initializer = Some(initializer);

        let body = synth::forwarding_body(program, procedure, field, dart_type);
        let node = program.procedure_mut(procedure);
        node.function.body = Some(body);
        node.flags.remove(ProcedureFlags::EXTERNAL);

        debug!(
            symbol,
            accessor = accessor.as_str(),
            reused_reference = reference.is_some(),
            "lowered native binding"
        );
        Ok(field)
    }

    fn procedure_name(&self, program: &Program, procedure: ProcedureId) -> &'a str {
        self.interner.lookup(program.procedure(procedure).name)
    }
}
