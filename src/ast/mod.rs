//! Declaration and type model consumed by semantic analysis.
//!
//! Parsing is a separate pipeline stage; the structures here arrive already
//! name-resolved. Declarations are arena-owned by [`Module`] and referenced
//! by stable [`DeclId`]s for the life of the compilation unit.

mod decls;
mod types;

pub use decls::{
    CaseSlot, ConstraintEntry, DeclId, DeclKind, FieldDecl, GenericParam, GenericParams,
    InheritanceClause, InheritedEntry, Module, TypeDecl, UnionCase,
};
pub use types::{RefStorageKind, Ty};
