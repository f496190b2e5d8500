use super::capability::CapabilityKind;
use crate::ast::TypeDecl;
use crate::diagnostics::Span;

/// Annotation state of one axis (positive or inverse) of a marking.
///
/// The location rides inside the carrying variants so an `Explicit` state
/// without a location is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkState {
    None,
    Inferred(Span),
    Explicit(Span),
}

impl MarkState {
    #[must_use]
    pub fn span(self) -> Option<Span> {
        match self {
            MarkState::None => None,
            MarkState::Inferred(span) | MarkState::Explicit(span) => Some(span),
        }
    }

    #[must_use]
    pub fn is_explicit(self) -> bool {
        matches!(self, MarkState::Explicit(_))
    }

    #[must_use]
    pub fn is_none(self) -> bool {
        matches!(self, MarkState::None)
    }
}

/// Recorded positive/inverse annotation state for one (declaration,
/// invertible capability) pair. Computed once from the written annotations;
/// consumers never mutate it.
#[derive(Debug, Clone, Copy)]
pub struct Marking {
    pub positive: MarkState,
    pub inverse: MarkState,
}

impl Marking {
    /// Reads the declaration's written annotations.
    ///
    /// The positive axis is explicit when the inheritance clause names the
    /// capability. The inverse axis is explicit when the clause names the
    /// exclusion, and otherwise inferred when some generic parameter carries
    /// no constraint guaranteeing the capability (anchored at that
    /// parameter's declaration site).
    #[must_use]
    pub fn of_decl(decl: &TypeDecl, capability: CapabilityKind) -> Self {
        let fallback = decl.span.unwrap_or(Span::new(0, 0));
        let mut positive = MarkState::None;
        let mut inverse = MarkState::None;

        for entry in &decl.inherited.entries {
            if entry.name != capability.display_name() {
                continue;
            }
            let span = entry.span.unwrap_or(fallback);
            if entry.inverse {
                inverse = MarkState::Explicit(span);
            } else {
                positive = MarkState::Explicit(span);
            }
        }

        if inverse.is_none() {
            for param in &decl.generics.params {
                let guaranteed = param
                    .constraints
                    .iter()
                    .any(|constraint| {
                        !constraint.inverse && constraint.name == capability.display_name()
                    });
                if !guaranteed {
                    inverse = MarkState::Inferred(param.span.unwrap_or(fallback));
                    break;
                }
            }
        }

        Self { positive, inverse }
    }
}
