//! Symbol index over well-known libraries.
//!
//! Passes that need to reference library declarations by name (a marker
//! class, a helper procedure) resolve them once through a [`SymbolIndex`]
//! instead of walking the program. [`LibraryIndex`] snapshots the members of
//! a fixed set of libraries when it is built and is read-only afterwards.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{ClassId, FieldId, LibraryId, Member, Name, ProcedureId, Program, StringInterner};

/// Error resolving a declaration by name.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum IndexError {
    /// The library was not part of the indexed set, or is not in the program.
    LibraryNotIndexed { library: String },
    /// The library (or class) has no member with that name.
    MemberNotFound {
        library: String,
        class: Option<String>,
        member: String,
    },
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::LibraryNotIndexed { library } => {
                write!(f, "library '{library}' is not indexed")
            }
            IndexError::MemberNotFound {
                library,
                class: Some(class),
                member,
            } => write!(f, "'{class}.{member}' not found in '{library}'"),
            IndexError::MemberNotFound {
                library,
                class: None,
                member,
            } => write!(f, "'{member}' not found in '{library}'"),
        }
    }
}

impl std::error::Error for IndexError {}

/// Name-based resolution of declarations in well-known libraries.
///
/// Class lookup is the only fallible-by-design query: a missing class means
/// the feature library is not loaded, which callers treat as "nothing to do".
/// Every other lookup is expected to succeed once the class was found.
pub trait SymbolIndex {
    fn contains_library(&self, library: &str) -> bool;

    fn try_get_class(&self, library: &str, name: &str) -> Option<ClassId>;

    fn get_field(&self, library: &str, class: &str, name: &str) -> Result<FieldId, IndexError>;

    /// Procedure declared in `class`, or at top level when `class` is `None`.
    fn get_procedure(
        &self,
        library: &str,
        class: Option<&str>,
        name: &str,
    ) -> Result<ProcedureId, IndexError>;

    fn get_top_level_field(&self, library: &str, name: &str) -> Result<FieldId, IndexError>;

    fn get_class(&self, library: &str, name: &str) -> Result<ClassId, IndexError> {
        self.try_get_class(library, name)
            .ok_or_else(|| IndexError::MemberNotFound {
                library: library.to_owned(),
                class: None,
                member: name.to_owned(),
            })
    }
}

#[derive(Default)]
struct MemberTable {
    fields: FxHashMap<Name, FieldId>,
    procedures: FxHashMap<Name, ProcedureId>,
}

struct IndexedClass {
    id: ClassId,
    members: MemberTable,
}

struct IndexedLibrary {
    id: LibraryId,
    classes: FxHashMap<Name, IndexedClass>,
    members: MemberTable,
}

/// Snapshot index of a set of libraries, keyed by import URI.
pub struct LibraryIndex<'a> {
    interner: &'a StringInterner,
    libraries: FxHashMap<Name, IndexedLibrary>,
}

impl<'a> LibraryIndex<'a> {
    /// Index every member of the listed libraries that exist in `program`.
    ///
    /// URIs with no matching library are skipped; `contains_library` reports
    /// them as absent.
    pub fn new(program: &Program, interner: &'a StringInterner, import_uris: &[&str]) -> Self {
        let mut libraries = FxHashMap::default();
        for uri in import_uris {
            let Some(uri) = interner.get(uri) else {
                continue;
            };
            let Some(id) = program.find_library(uri) else {
                continue;
            };
            libraries.insert(uri, Self::index_library(program, id));
        }
        LibraryIndex {
            interner,
            libraries,
        }
    }

    fn index_library(program: &Program, id: LibraryId) -> IndexedLibrary {
        let mut indexed = IndexedLibrary {
            id,
            classes: FxHashMap::default(),
            members: MemberTable::default(),
        };
        for &member in &program.library(id).members {
            match member {
                Member::Class(class_id) => {
                    let class = program.class(class_id);
                    let mut members = MemberTable::default();
                    for &field in &class.fields {
                        members.fields.insert(program.field(field).name, field);
                    }
                    for &procedure in &class.procedures {
                        members
                            .procedures
                            .insert(program.procedure(procedure).name, procedure);
                    }
                    indexed.classes.insert(
                        class.name,
                        IndexedClass {
                            id: class_id,
                            members,
                        },
                    );
                }
                Member::Field(field) => {
                    indexed.members.fields.insert(program.field(field).name, field);
                }
                Member::Procedure(procedure) => {
                    indexed
                        .members
                        .procedures
                        .insert(program.procedure(procedure).name, procedure);
                }
            }
        }
        indexed
    }

    /// Library id of an indexed library.
    pub fn library_id(&self, library: &str) -> Option<LibraryId> {
        self.library(library).ok().map(|indexed| indexed.id)
    }

    fn library(&self, library: &str) -> Result<&IndexedLibrary, IndexError> {
        self.interner
            .get(library)
            .and_then(|uri| self.libraries.get(&uri))
            .ok_or_else(|| IndexError::LibraryNotIndexed {
                library: library.to_owned(),
            })
    }

    fn members(&self, library: &str, class: Option<&str>) -> Result<&MemberTable, IndexError> {
        let indexed = self.library(library)?;
        let Some(class) = class else {
            return Ok(&indexed.members);
        };
        self.interner
            .get(class)
            .and_then(|name| indexed.classes.get(&name))
            .map(|class| &class.members)
            .ok_or_else(|| IndexError::MemberNotFound {
                library: library.to_owned(),
                class: None,
                member: class.to_owned(),
            })
    }

    fn not_found(library: &str, class: Option<&str>, member: &str) -> IndexError {
        IndexError::MemberNotFound {
            library: library.to_owned(),
            class: class.map(str::to_owned),
            member: member.to_owned(),
        }
    }
}

impl SymbolIndex for LibraryIndex<'_> {
    fn contains_library(&self, library: &str) -> bool {
        self.library(library).is_ok()
    }

    fn try_get_class(&self, library: &str, name: &str) -> Option<ClassId> {
        let indexed = self.library(library).ok()?;
        let name = self.interner.get(name)?;
        indexed.classes.get(&name).map(|class| class.id)
    }

    fn get_field(&self, library: &str, class: &str, name: &str) -> Result<FieldId, IndexError> {
        let members = self.members(library, Some(class))?;
        self.interner
            .get(name)
            .and_then(|field| members.fields.get(&field).copied())
            .ok_or_else(|| Self::not_found(library, Some(class), name))
    }

    fn get_procedure(
        &self,
        library: &str,
        class: Option<&str>,
        name: &str,
    ) -> Result<ProcedureId, IndexError> {
        let members = self.members(library, class)?;
        self.interner
            .get(name)
            .and_then(|procedure| members.procedures.get(&procedure).copied())
            .ok_or_else(|| Self::not_found(library, class, name))
    }

    fn get_top_level_field(&self, library: &str, name: &str) -> Result<FieldId, IndexError> {
        let members = self.members(library, None)?;
        self.interner
            .get(name)
            .and_then(|field| members.fields.get(&field).copied())
            .ok_or_else(|| Self::not_found(library, None, name))
    }
}

#[cfg(test)]
mod tests;
