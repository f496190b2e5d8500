//! Causal explanation for a member that fails duplication validation.
//!
//! One level deep only: the tracer names the immediate cause and stops,
//! reading the marking model directly rather than re-entering conformance
//! evaluation.

use super::capability::CapabilityKind;
use super::diagnostics::{self as sema_diagnostics, codes};
use super::marking::MarkState;
use super::solver::CapabilitySolver;
use crate::ast::{DeclId, Ty, TypeDecl};
use crate::diagnostics::Suggestion;

impl CapabilitySolver<'_> {
    /// Explains why `offending` (the substituted type of a member of
    /// `container`) is not duplicable, and suggests the most general fix:
    /// excluding the container itself.
    ///
    /// # Panics
    ///
    /// Panics when the offending declaration carries no exclusion marking
    /// at all; it could not have failed the query without one.
    pub(super) fn trace_nonduplicable(&mut self, container: DeclId, offending: &Ty) {
        let capability = CapabilityKind::Duplicable;
        let decl = self.module.decl(container);

        // Most general suggestion first, always applicable.
        let mut help = sema_diagnostics::help(
            codes::EXCLUSION_SUGGESTED,
            format!(
                "consider excluding `{}` from `{}`",
                decl.name,
                capability.display_name()
            ),
            decl.span,
        );
        if let Some(suggestion) = exclusion_fixit(decl, capability) {
            help.add_suggestion(suggestion);
        }
        self.sink.push(help);

        // A generic parameter of the container is the root cause by
        // construction; point at its declaration site and stop.
        if let Ty::Param { index } = offending {
            if let Some(param) = decl.param(*index) {
                self.sink.push(sema_diagnostics::note(
                    format!(
                        "type parameter `{}` of `{}` does not require `{}`",
                        param.name,
                        decl.name,
                        capability.display_name()
                    ),
                    param.span.or(decl.span),
                ));
            }
            return;
        }

        if let Ty::Decl { id, .. } = offending {
            let target = self.module.decl(*id);
            // Imported or compiler-seeded declarations have no location to
            // point at.
            if target.span.is_none() {
                return;
            }
            match self.marking(*id, capability).inverse {
                MarkState::Inferred(span) => {
                    self.sink.push(sema_diagnostics::note(
                        format!(
                            "`{}` is implicitly excluded from `{}` here",
                            target.name,
                            capability.display_name()
                        ),
                        Some(span),
                    ));
                }
                MarkState::Explicit(span) => {
                    self.sink.push(sema_diagnostics::note(
                        format!(
                            "`{}` is explicitly excluded from `{}` here",
                            target.name,
                            capability.display_name()
                        ),
                        Some(span),
                    ));
                }
                MarkState::None => {
                    unreachable!(
                        "`{}` fails the duplication query without any exclusion marking",
                        target.name
                    )
                }
            }
        }
    }
}

/// Builds the insertion fix-it that writes the exclusion into the
/// container's inheritance clause: appended after the final entry when the
/// clause is non-empty, otherwise a fresh clause at the body brace.
fn exclusion_fixit(decl: &TypeDecl, capability: CapabilityKind) -> Option<Suggestion> {
    let spelling = capability.inverse_spelling();
    if decl.inherited.is_empty() {
        let at = decl.body_start?;
        Some(Suggestion::insert(
            format!("add `: {spelling}`"),
            at,
            format!(": {spelling} "),
        ))
    } else {
        let end = decl.inherited.end_span()?;
        Some(Suggestion::insert(
            format!("add `, {spelling}`"),
            end.end,
            format!(", {spelling}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DeclKind, InheritanceClause, InheritedEntry};
    use crate::diagnostics::Span;

    #[test]
    fn empty_clause_inserts_at_the_body_brace() {
        let decl = TypeDecl::new("Bag", DeclKind::Aggregate { fields: Vec::new() })
            .with_span(Span::new(0, 30), 11);
        let suggestion =
            exclusion_fixit(&decl, CapabilityKind::Duplicable).expect("fix-it expected");
        assert_eq!(suggestion.span, Some(Span::caret(11)));
        assert_eq!(suggestion.replacement.as_deref(), Some(": ~Duplicable "));
    }

    #[test]
    fn populated_clause_appends_after_the_final_entry() {
        let decl = TypeDecl::new("Bag", DeclKind::Aggregate { fields: Vec::new() })
            .with_span(Span::new(0, 40), 25)
            .with_inherited(InheritanceClause::new(vec![InheritedEntry::adopts(
                "Hashable",
                Some(Span::new(12, 20)),
            )]));
        let suggestion =
            exclusion_fixit(&decl, CapabilityKind::Duplicable).expect("fix-it expected");
        assert_eq!(suggestion.span, Some(Span::caret(20)));
        assert_eq!(suggestion.replacement.as_deref(), Some(", ~Duplicable"));
    }
}
