use super::fixtures::{aggregate, field, generic_box, nonduplicable, seeded};
use crate::ast::{GenericParam, GenericParams, InheritanceClause, InheritedEntry, Ty};
use crate::diagnostics::{Diagnostic, Severity, Span};
use crate::sema::check_module;

fn notes(diagnostics: &[Diagnostic]) -> Vec<&Diagnostic> {
    diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.severity == Severity::Note)
        .collect()
}

#[test]
fn generic_parameter_member_notes_the_parameter_site() {
    let mut fixture = seeded();
    fixture.module.declare(
        aggregate("Holder", vec![field("value", Ty::param(0))])
            .with_span(Span::new(0, 90), 40)
            .with_generics(GenericParams::new(
                Some(Span::new(13, 16)),
                vec![GenericParam::new("T", Some(Span::new(14, 15)))],
            ))
            .with_inherited(InheritanceClause::new(vec![InheritedEntry::adopts(
                "Duplicable",
                Some(Span::new(20, 30)),
            )])),
    );

    let result = check_module(&fixture.module);
    let notes = notes(&result.diagnostics);
    assert_eq!(notes.len(), 1, "the parameter is the root cause, tracing stops");
    assert!(notes[0]
        .message
        .contains("type parameter `T` of `Holder` does not require `Duplicable`"));
    assert_eq!(notes[0].span(), Some(Span::new(14, 15)));
}

#[test]
fn explicitly_excluded_member_notes_the_exclusion_site() {
    let mut fixture = seeded();
    let handle = fixture.module.declare(nonduplicable("FileHandle"));
    fixture.module.declare(
        aggregate("Container", vec![field("handle", Ty::decl(handle))])
            .with_span(Span::new(300, 360), 312),
    );

    let result = check_module(&fixture.module);
    let notes = notes(&result.diagnostics);
    assert_eq!(notes.len(), 1);
    assert!(notes[0]
        .message
        .contains("`FileHandle` is explicitly excluded from `Duplicable` here"));
    assert_eq!(notes[0].span(), Some(Span::new(12, 23)));
}

#[test]
fn implicitly_excluded_member_notes_the_inferred_site() {
    let mut fixture = seeded();
    let handle = fixture.module.declare(nonduplicable("FileHandle"));
    let boxed = fixture.module.declare(generic_box("Box"));
    fixture.module.declare(
        aggregate(
            "Snapshot",
            vec![field("payload", Ty::generic(boxed, vec![Ty::decl(handle)]))],
        )
        .with_span(Span::new(800, 870), 812),
    );

    let result = check_module(&fixture.module);
    let notes = notes(&result.diagnostics);
    assert_eq!(notes.len(), 1);
    assert!(notes[0]
        .message
        .contains("`Box` is implicitly excluded from `Duplicable` here"));
    assert_eq!(
        notes[0].span(),
        Some(Span::new(205, 206)),
        "the inferred marking anchors at the unconstrained parameter"
    );
}

#[test]
fn members_without_a_source_location_produce_no_note() {
    let mut fixture = seeded();
    // Unlocated declaration excluded via its clause, the shape of an
    // imported declaration.
    let foreign = fixture.module.declare(
        aggregate("ForeignHandle", Vec::new()).with_inherited(InheritanceClause::new(vec![
            InheritedEntry::excludes("Duplicable", Some(Span::new(1, 2))),
        ])),
    );
    fixture.module.declare(
        aggregate("Wrapper", vec![field("inner", Ty::decl(foreign))])
            .with_span(Span::new(900, 940), 912),
    );

    let result = check_module(&fixture.module);
    assert!(notes(&result.diagnostics).is_empty());
    // The member failure and the exclusion suggestion still fire.
    assert!(result.has_errors());
}
