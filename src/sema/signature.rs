use super::capability::CapabilityKind;
use crate::ast::TypeDecl;

/// Requirement that a generic parameter (by index in the owning parameter
/// list) holds a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub param: usize,
    pub capability: CapabilityKind,
}

/// Generic signature: the parameter list plus the capability requirements
/// that hold within the signature's scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericSignature {
    pub params: Vec<String>,
    pub requirements: Vec<Requirement>,
}

impl GenericSignature {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Signature of a declaration as written: its parameter names and the
    /// capability constraints spelled on them.
    #[must_use]
    pub fn of_decl(decl: &TypeDecl) -> Self {
        let params: Vec<String> = decl
            .generics
            .params
            .iter()
            .map(|param| param.name.clone())
            .collect();
        let mut requirements = Vec::new();
        for (index, param) in decl.generics.params.iter().enumerate() {
            for constraint in &param.constraints {
                if constraint.inverse {
                    continue;
                }
                if let Some(capability) = CapabilityKind::from_name(&constraint.name) {
                    requirements.push(Requirement {
                        param: index,
                        capability,
                    });
                }
            }
        }
        Self {
            params,
            requirements,
        }
    }

    #[must_use]
    pub fn requires(&self, param: usize, capability: CapabilityKind) -> bool {
        self.requirements
            .iter()
            .any(|req| req.param == param && req.capability == capability)
    }
}

/// Merges a base signature with additional requirements, deduplicating.
/// Pure function of its inputs; this is the signature-builder service the
/// grant synthesizer consumes.
#[must_use]
pub fn merge_generic_signature(base: &GenericSignature, extra: &[Requirement]) -> GenericSignature {
    let mut merged = base.clone();
    for req in extra {
        if !merged.requires(req.param, req.capability) {
            merged.requirements.push(*req);
        }
    }
    merged
}
