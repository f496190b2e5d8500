//! Grant derivation and the conformance query.
//!
//! Derivation consults only the marking model and is memoized through the
//! grant table; it never runs structural validation. Validation (see
//! `validate.rs`) runs as a separate later pass over the registered grants,
//! so the two cannot recurse into each other.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use super::capability::CapabilityKind;
use super::diagnostics::{self as sema_diagnostics, codes};
use super::grants::{
    CapabilityGrant, GrantId, GrantKind, GrantState, GrantTable, SyntheticScope,
};
use super::marking::{MarkState, Marking};
use super::signature::{GenericSignature, Requirement, merge_generic_signature};
use crate::ast::{DeclId, Module, Ty};
use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// Counters reported by a full conformance run.
#[derive(Clone, Debug)]
pub struct ConformanceMetrics {
    pub grants_derived: usize,
    pub memo_hits: usize,
    pub conditional_grants: usize,
    pub scopes_synthesized: usize,
    pub grants_validated: usize,
    pub violations: usize,
    pub elapsed: Duration,
}

impl Default for ConformanceMetrics {
    fn default() -> Self {
        Self {
            grants_derived: 0,
            memo_hits: 0,
            conditional_grants: 0,
            scopes_synthesized: 0,
            grants_validated: 0,
            violations: 0,
            elapsed: Duration::from_secs(0),
        }
    }
}

/// Result of running capability conformance over a module: the diagnostics,
/// the grant table for later conformance-checking and code-generation
/// passes, and the run counters.
#[derive(Clone, Debug)]
pub struct ConformanceResult {
    pub diagnostics: Vec<Diagnostic>,
    pub grants: GrantTable,
    pub metrics: ConformanceMetrics,
}

impl ConformanceResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity.is_error())
    }
}

/// Single-threaded solver owning the per-module conformance state: the
/// precomputed markings, the write-once grant table, and the diagnostic
/// sink. All writes happen on the analysis thread that owns the module.
pub struct CapabilitySolver<'a> {
    pub(super) module: &'a Module,
    markings: HashMap<(DeclId, CapabilityKind), Marking>,
    pub(super) grants: GrantTable,
    pub(super) sink: DiagnosticSink,
    pub(super) metrics: ConformanceMetrics,
}

impl<'a> CapabilitySolver<'a> {
    #[must_use]
    pub fn new(module: &'a Module) -> Self {
        let mut markings = HashMap::new();
        for decl_id in module.decl_ids() {
            let decl = module.decl(decl_id);
            for capability in CapabilityKind::INVERTIBLE {
                markings.insert((decl_id, capability), Marking::of_decl(decl, capability));
            }
        }
        Self {
            module,
            markings,
            grants: GrantTable::default(),
            sink: DiagnosticSink::new("sema"),
            metrics: ConformanceMetrics::default(),
        }
    }

    /// Read-only marking lookup for an invertible capability.
    ///
    /// # Panics
    ///
    /// Panics if the capability is not invertible (no marking is computed
    /// for the rest of the fixed set) or the declaration is foreign to the
    /// solver's module.
    #[must_use]
    pub fn marking(&self, decl: DeclId, capability: CapabilityKind) -> Marking {
        self.markings
            .get(&(decl, capability))
            .copied()
            .unwrap_or_else(|| {
                unreachable!(
                    "no marking recorded for `{}`",
                    capability.display_name()
                )
            })
    }

    /// Derives the grant for one (declaration, capability) pair, returning
    /// the registered grant or `None` when the written exclusion is honored.
    /// Idempotent: a table hit returns the prior result with no side
    /// effects.
    ///
    /// # Panics
    ///
    /// Panics when the capability is not invertible, or on a positively
    /// inferred duplication marking. Both indicate a bug in an upstream
    /// pass; continuing would synthesize meaningless grants.
    pub fn derive_grant(&mut self, decl: DeclId, capability: CapabilityKind) -> Option<GrantId> {
        assert!(
            capability.is_invertible(),
            "grant derivation is only defined for invertible capabilities, got `{}`",
            capability.display_name()
        );

        if let Some(existing) = self.grants.lookup(decl, capability) {
            self.metrics.memo_hits += 1;
            return Some(existing);
        }

        match capability {
            CapabilityKind::Duplicable => self.derive_duplicable(decl),
            CapabilityKind::ThreadSafe | CapabilityKind::Shareable => {
                unreachable!("`{}` is not an invertible capability", capability.display_name())
            }
        }
    }

    /// Decision table for the duplication capability. This match is the seam
    /// for future invertible capabilities.
    fn derive_duplicable(&mut self, decl_id: DeclId) -> Option<GrantId> {
        let capability = CapabilityKind::Duplicable;
        let marking = self.marking(decl_id, capability);

        if marking.positive.is_explicit() {
            // A written adoption takes precedence over any exclusion; a
            // simultaneous written exclusion is a contradiction to diagnose.
            if let MarkState::Explicit(inverse_span) = marking.inverse {
                let decl = self.module.decl(decl_id);
                self.sink.push(sema_diagnostics::error(
                    codes::CAPABILITY_CONTRADICTION,
                    format!(
                        "{} `{}` cannot both adopt `{}` and exclude it with `{}`",
                        decl.kind.keyword(),
                        decl.name,
                        capability.display_name(),
                        capability.inverse_spelling()
                    ),
                    Some(inverse_span),
                ));
            }
            return Some(self.register_unconditional(decl_id, capability));
        }

        if let MarkState::Inferred(_) = marking.positive {
            unreachable!("positive duplication-capability markings are never inferred")
        }

        match marking.inverse {
            MarkState::Explicit(_) => {
                debug!(decl = %self.module.decl(decl_id).name, "written exclusion honored, no grant");
                None
            }
            MarkState::Inferred(_) => Some(self.register_conditional(decl_id, capability)),
            MarkState::None => Some(self.register_unconditional(decl_id, capability)),
        }
    }

    fn register_unconditional(&mut self, decl: DeclId, capability: CapabilityKind) -> GrantId {
        debug!(
            decl = %self.module.decl(decl).name,
            capability = capability.display_name(),
            "synthesized unconditional grant"
        );
        self.metrics.grants_derived += 1;
        self.grants.register(CapabilityGrant {
            decl,
            capability,
            kind: GrantKind::Unconditional,
            state: GrantState::Unvalidated,
        })
    }

    /// Builds the synthesized scope whose signature extends the
    /// declaration's own with one capability requirement per generic
    /// parameter, registers it as a top-level synthesized declaration, and
    /// declares the grant against it.
    fn register_conditional(&mut self, decl_id: DeclId, capability: CapabilityKind) -> GrantId {
        let decl = self.module.decl(decl_id);
        let base = GenericSignature::of_decl(decl);
        let extra: Vec<Requirement> = (0..decl.generics.params.len())
            .map(|param| Requirement { param, capability })
            .collect();
        let signature = merge_generic_signature(&base, &extra);
        debug!(
            decl = %decl.name,
            capability = capability.display_name(),
            requirements = signature.requirements.len(),
            "synthesized conditional grant"
        );
        let scope = self.grants.register_scope(SyntheticScope {
            decl: decl_id,
            capability,
            signature,
        });
        self.metrics.scopes_synthesized += 1;
        self.metrics.conditional_grants += 1;
        self.metrics.grants_derived += 1;
        self.grants.register(CapabilityGrant {
            decl: decl_id,
            capability,
            kind: GrantKind::Conditional { scope },
            state: GrantState::Unvalidated,
        })
    }

    /// Derivation pass: every declaration crossed with every invertible
    /// capability.
    pub fn derive_module_grants(&mut self) {
        for decl in self.module.decl_ids() {
            for capability in CapabilityKind::INVERTIBLE {
                let _ = self.derive_grant(decl, capability);
            }
        }
    }

    /// Capability-conformance query over the derived grant table.
    ///
    /// Resolves exclusively through already-registered grants; it never
    /// derives or validates, which is what keeps the query safe to call
    /// from inside validation. `signature` supplies the requirements in
    /// scope for generic-parameter references. Types that failed earlier
    /// resolution are treated as conforming to suppress cascades.
    #[must_use]
    pub fn ty_holds_capability(
        &self,
        ty: &Ty,
        capability: CapabilityKind,
        signature: &GenericSignature,
    ) -> bool {
        match ty {
            Ty::Error => true,
            Ty::Param { index } => signature.requires(*index, capability),
            Ty::Lvalue(inner) => self.ty_holds_capability(inner, capability, signature),
            Ty::RefStorage { inner, .. } => {
                self.ty_holds_capability(inner, capability, signature)
            }
            Ty::Decl { id, args } => {
                let Some(grant_id) = self.grants.lookup(*id, capability) else {
                    return false;
                };
                match self.grants.grant(grant_id).kind {
                    GrantKind::Unconditional => true,
                    GrantKind::Conditional { scope } => self
                        .grants
                        .scope(scope)
                        .signature
                        .requirements
                        .iter()
                        .filter(|req| req.capability == capability)
                        .all(|req| {
                            args.get(req.param).is_some_and(|arg| {
                                self.ty_holds_capability(arg, capability, signature)
                            })
                        }),
                }
            }
        }
    }

    /// Consumes the solver, yielding the diagnostics, the grant table, and
    /// the counters.
    #[must_use]
    pub fn finish(self) -> ConformanceResult {
        ConformanceResult {
            diagnostics: self.sink.into_vec(),
            grants: self.grants,
            metrics: self.metrics,
        }
    }
}

/// Runs the two conformance passes over a module: grant derivation for
/// every declaration, then structural validation of every duplication
/// grant.
#[must_use]
pub fn check_module(module: &Module) -> ConformanceResult {
    let start = Instant::now();
    let mut solver = CapabilitySolver::new(module);
    solver.derive_module_grants();
    solver.validate_module_grants();
    let mut result = solver.finish();
    result.metrics.elapsed = start.elapsed();
    result
}
