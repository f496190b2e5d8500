use std::collections::HashMap;

use super::capability::CapabilityKind;
use super::signature::GenericSignature;
use crate::ast::DeclId;

/// Identity of a grant within the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GrantId(usize);

impl GrantId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identity of a synthesized scope within the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntheticScopeId(usize);

impl SyntheticScopeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether a grant holds for every instantiation or only conditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantKind {
    Unconditional,
    /// Holds only when the synthesized scope's extra requirements are
    /// satisfied by the instantiation's generic arguments.
    Conditional { scope: SyntheticScopeId },
}

/// Validation state of a grant. Derivation always produces `Unvalidated`;
/// the later validation pass records the verdict here, which is what keeps
/// derivation and validation from recursing into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantState {
    Unvalidated,
    Valid,
    Invalid,
}

/// Synthesized conformance record linking a declaration to a capability.
#[derive(Debug, Clone)]
pub struct CapabilityGrant {
    pub decl: DeclId,
    pub capability: CapabilityKind,
    pub kind: GrantKind,
    pub state: GrantState,
}

/// Compiler-fabricated extension-like context hosting a conditional grant's
/// extra generic requirements. Registered as a top-level synthesized
/// declaration so later signature lookups can recover the conditional
/// requirements by finding this scope.
#[derive(Debug, Clone)]
pub struct SyntheticScope {
    pub decl: DeclId,
    pub capability: CapabilityKind,
    pub signature: GenericSignature,
}

/// Per-module grant storage: write-once per (declaration, capability) key,
/// plus the append-only list of synthesized top-level scopes that later
/// passes (serialization, further analysis) enumerate.
#[derive(Debug, Clone, Default)]
pub struct GrantTable {
    grants: Vec<CapabilityGrant>,
    by_key: HashMap<(DeclId, CapabilityKind), GrantId>,
    scopes: Vec<SyntheticScope>,
    top_level: Vec<SyntheticScopeId>,
}

impl GrantTable {
    #[must_use]
    pub fn lookup(&self, decl: DeclId, capability: CapabilityKind) -> Option<GrantId> {
        self.by_key.get(&(decl, capability)).copied()
    }

    /// # Panics
    ///
    /// Panics if `id` was not produced by this table.
    #[must_use]
    pub fn grant(&self, id: GrantId) -> &CapabilityGrant {
        &self.grants[id.index()]
    }

    /// # Panics
    ///
    /// Panics if `id` was not produced by this table.
    #[must_use]
    pub fn scope(&self, id: SyntheticScopeId) -> &SyntheticScope {
        &self.scopes[id.index()]
    }

    #[must_use]
    pub fn grant_count(&self) -> usize {
        self.grants.len()
    }

    pub fn grant_ids(&self) -> impl Iterator<Item = GrantId> + '_ {
        (0..self.grants.len()).map(GrantId)
    }

    /// Synthesized top-level declarations, in registration order.
    #[must_use]
    pub fn top_level_synthesized(&self) -> &[SyntheticScopeId] {
        &self.top_level
    }

    /// Registers a freshly derived grant. The key is write-once; derivation
    /// memoizes before registering, so a duplicate registration means the
    /// synthesizer's memo check was bypassed.
    pub(super) fn register(&mut self, grant: CapabilityGrant) -> GrantId {
        let key = (grant.decl, grant.capability);
        let id = GrantId(self.grants.len());
        let previous = self.by_key.insert(key, id);
        assert!(
            previous.is_none(),
            "duplicate grant registration for `{}`",
            grant.capability.display_name()
        );
        self.grants.push(grant);
        id
    }

    pub(super) fn register_scope(&mut self, scope: SyntheticScope) -> SyntheticScopeId {
        let id = SyntheticScopeId(self.scopes.len());
        self.scopes.push(scope);
        self.top_level.push(id);
        id
    }

    pub(super) fn set_state(&mut self, id: GrantId, state: GrantState) {
        self.grants[id.index()].state = state;
    }
}
