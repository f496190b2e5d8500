//! Capability conformance for the semantic-analysis stage.
//!
//! # Pipeline
//! - **Derivation** reads each declaration's [`Marking`] and decides whether
//!   to synthesize a [`CapabilityGrant`], possibly conditional on the
//!   declaration's generic parameters via a [`SyntheticScope`].
//! - **Validation** runs afterwards over the registered duplication grants,
//!   walking each declaration's storage and diagnosing members that cannot
//!   be duplicated.
//!
//! The two passes communicate only through the grant table and the explicit
//! [`GrantState`] field, so neither can re-enter the other.

mod capability;
mod diagnostics;
mod grants;
mod marking;
mod queries;
mod signature;
mod solver;
mod storage;
mod trace;
mod validate;

pub use capability::CapabilityKind;
pub use diagnostics::codes;
pub use grants::{
    CapabilityGrant, GrantId, GrantKind, GrantState, GrantTable, SyntheticScope, SyntheticScopeId,
};
pub use marking::{MarkState, Marking};
pub use queries::ConformanceQueries;
pub use signature::{GenericSignature, Requirement, merge_generic_signature};
pub use solver::{CapabilitySolver, ConformanceMetrics, ConformanceResult, check_module};
pub use storage::{StorageMember, visit_storage};

#[cfg(test)]
mod tests;
