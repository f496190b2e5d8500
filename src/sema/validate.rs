//! Structural validation of duplication grants.
//!
//! Runs strictly after derivation: every grant it inspects already exists,
//! and the conformance query it leans on resolves through the grant table
//! alone, so validation can never trigger another round of derivation.

use tracing::debug;

use super::capability::CapabilityKind;
use super::diagnostics::{self as sema_diagnostics, codes};
use super::grants::{GrantId, GrantKind, GrantState};
use super::signature::GenericSignature;
use super::solver::CapabilitySolver;
use super::storage::visit_storage;
use crate::ast::{DeclId, DeclKind};

impl CapabilitySolver<'_> {
    /// Validation pass over every registered duplication grant.
    pub fn validate_module_grants(&mut self) {
        let duplication_grants: Vec<GrantId> = self
            .grants
            .grant_ids()
            .filter(|&id| self.grants.grant(id).capability == CapabilityKind::Duplicable)
            .collect();
        for id in duplication_grants {
            let _ = self.validate_grant(id);
        }
    }

    /// Checks that the grant's declaration can actually satisfy the
    /// duplication capability with the storage it declares, emitting
    /// diagnostics for the first violating member. The verdict is recorded
    /// on the grant (never retracting it); re-validation returns the
    /// recorded verdict without emitting anything again.
    ///
    /// # Panics
    ///
    /// Panics when the grant's capability is not the duplication capability
    /// (storage validation is defined for nothing else) or when the grant
    /// covers a builtin tuple declaration.
    pub fn validate_grant(&mut self, id: GrantId) -> bool {
        let grant = self.grants.grant(id);
        assert!(
            grant.capability == CapabilityKind::Duplicable,
            "structural validation only applies to duplication grants, got `{}`",
            grant.capability.display_name()
        );

        match grant.state {
            GrantState::Valid => return true,
            GrantState::Invalid => return false,
            GrantState::Unvalidated => {}
        }

        let decl_id = grant.decl;
        let signature = match grant.kind {
            GrantKind::Unconditional => GenericSignature::of_decl(self.module.decl(decl_id)),
            GrantKind::Conditional { scope } => self.grants.scope(scope).signature.clone(),
        };

        let valid = match &self.module.decl(decl_id).kind {
            // Indirection: the capability is about the reference, not the
            // pointee, so stored members are irrelevant.
            DeclKind::Reference { .. } => true,
            // No storage to violate.
            DeclKind::Interface => true,
            DeclKind::BuiltinTuple => {
                unreachable!("duplication validation over a builtin tuple declaration is not implemented")
            }
            DeclKind::Aggregate { .. } | DeclKind::TaggedUnion { .. } => {
                !self.has_nonduplicable_member(decl_id, &signature)
            }
        };

        debug!(
            decl = %self.module.decl(decl_id).name,
            valid,
            "validated duplication grant"
        );
        self.metrics.grants_validated += 1;
        self.grants.set_state(
            id,
            if valid {
                GrantState::Valid
            } else {
                GrantState::Invalid
            },
        );
        valid
    }

    /// Walks the declaration's storage looking for a member whose
    /// substituted type lacks the duplication capability. Stops at the
    /// first violation, after reporting it and tracing its cause.
    fn has_nonduplicable_member(&mut self, decl_id: DeclId, signature: &GenericSignature) -> bool {
        let capability = CapabilityKind::Duplicable;
        let module = self.module;
        let decl = module.decl(decl_id);

        visit_storage(module, decl_id, &[], |member, ty| {
            // Invalid storage was already diagnosed upstream.
            if ty.is_error() {
                return false;
            }
            if self.ty_holds_capability(&ty, capability, signature) {
                return false;
            }

            self.metrics.violations += 1;
            let rendered = module.ty_display(&ty, decl);
            let message = if member.is_union_payload() {
                format!(
                    "associated value `{}` of `{}` union `{}` has non-duplicable type `{}`",
                    member.name(),
                    capability.display_name(),
                    decl.name,
                    rendered
                )
            } else {
                format!(
                    "stored member `{}` of `{}` {} `{}` has non-duplicable type `{}`",
                    member.name(),
                    capability.display_name(),
                    decl.kind.keyword(),
                    decl.name,
                    rendered
                )
            };
            self.sink.push(sema_diagnostics::error(
                codes::NONDUPLICABLE_MEMBER,
                message,
                member.span().or(decl.span),
            ));
            self.trace_nonduplicable(decl_id, &ty);
            true
        })
    }
}
