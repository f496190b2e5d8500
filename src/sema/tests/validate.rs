use super::fixtures::{aggregate, field, generic_box, nonduplicable, payload_case, seeded, union};
use crate::ast::{DeclKind, InheritanceClause, InheritedEntry, Ty, TypeDecl, UnionCase};
use crate::diagnostics::Span;
use crate::sema::{
    CapabilityKind, CapabilitySolver, GenericSignature, GrantState, check_module, codes,
};

fn diagnostics_with_code<'a>(
    diagnostics: &'a [crate::diagnostics::Diagnostic],
    code: &str,
) -> Vec<&'a crate::diagnostics::Diagnostic> {
    diagnostics
        .iter()
        .filter(|diagnostic| {
            diagnostic
                .code
                .as_ref()
                .is_some_and(|candidate| candidate.code == code)
        })
        .collect()
}

#[test]
fn reference_types_validate_regardless_of_their_fields() {
    let mut fixture = seeded();
    let handle = fixture.module.declare(nonduplicable("FileHandle"));
    fixture.module.declare(TypeDecl::new(
        "Registry",
        DeclKind::Reference {
            fields: vec![field("handle", Ty::decl(handle))],
        },
    ));

    let result = check_module(&fixture.module);
    assert!(diagnostics_with_code(&result.diagnostics, codes::NONDUPLICABLE_MEMBER).is_empty());
    assert_eq!(result.metrics.violations, 0);
}

#[test]
fn interface_declarations_validate_trivially() {
    let mut fixture = seeded();
    fixture
        .module
        .declare(TypeDecl::new("Drawable", DeclKind::Interface));
    let result = check_module(&fixture.module);
    assert!(!result.has_errors());
}

#[test]
fn nonduplicable_field_fails_validation_exactly_once() {
    let mut fixture = seeded();
    let handle = fixture.module.declare(nonduplicable("FileHandle"));
    let container = fixture.module.declare(
        aggregate("Container", vec![field("handle", Ty::decl(handle))])
            .with_span(Span::new(300, 360), 312),
    );

    let result = check_module(&fixture.module);
    let failures = diagnostics_with_code(&result.diagnostics, codes::NONDUPLICABLE_MEMBER);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("`handle`"));
    assert!(failures[0].message.contains("`Container`"));
    assert!(failures[0].message.contains("`FileHandle`"));
    assert_eq!(result.metrics.violations, 1);

    let grant = result
        .grants
        .lookup(container, CapabilityKind::Duplicable)
        .expect("grant is created before validation");
    assert_eq!(result.grants.grant(grant).state, GrantState::Invalid);

    let helps = diagnostics_with_code(&result.diagnostics, codes::EXCLUSION_SUGGESTED);
    assert_eq!(helps.len(), 1);
    let suggestion = helps[0]
        .suggestions
        .first()
        .expect("exclusion fix-it expected");
    assert_eq!(suggestion.span, Some(Span::caret(312)));
    assert_eq!(suggestion.replacement.as_deref(), Some(": ~Duplicable "));
}

#[test]
fn revalidation_returns_the_verdict_without_new_diagnostics() {
    let mut fixture = seeded();
    let handle = fixture.module.declare(nonduplicable("FileHandle"));
    let container = fixture
        .module
        .declare(aggregate("Container", vec![field("handle", Ty::decl(handle))]));

    let mut solver = CapabilitySolver::new(&fixture.module);
    solver.derive_module_grants();
    let grant = solver
        .grants
        .lookup(container, CapabilityKind::Duplicable)
        .expect("grant expected");
    assert!(!solver.validate_grant(grant));
    assert!(!solver.validate_grant(grant));

    let result = solver.finish();
    assert_eq!(
        diagnostics_with_code(&result.diagnostics, codes::NONDUPLICABLE_MEMBER).len(),
        1
    );
}

#[test]
fn union_payload_failure_names_the_case_element() {
    let mut fixture = seeded();
    let handle = fixture.module.declare(nonduplicable("FileHandle"));
    let events = fixture.module.declare(
        union(
            "Event",
            vec![
                UnionCase::new("Closed", Vec::new(), Some(Span::new(400, 406))),
                payload_case("Opened", "handle", Ty::decl(handle)),
            ],
        )
        .with_span(Span::new(390, 440), 398),
    );

    let result = check_module(&fixture.module);
    let failures = diagnostics_with_code(&result.diagnostics, codes::NONDUPLICABLE_MEMBER);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("associated value `handle`"));
    assert!(failures[0].message.contains("union `Event`"));
    let grant = result
        .grants
        .lookup(events, CapabilityKind::Duplicable)
        .expect("grant expected");
    assert_eq!(result.grants.grant(grant).state, GrantState::Invalid);
}

#[test]
fn conditional_grant_validates_inside_its_synthesized_scope() {
    let mut fixture = seeded();
    let boxed = fixture.module.declare(generic_box("Box"));

    let result = check_module(&fixture.module);
    assert!(result.diagnostics.is_empty());
    let grant = result
        .grants
        .lookup(boxed, CapabilityKind::Duplicable)
        .expect("conditional grant expected");
    assert_eq!(result.grants.grant(grant).state, GrantState::Valid);
}

#[test]
fn conditional_grants_check_their_instantiation_arguments() {
    let mut fixture = seeded();
    let handle = fixture.module.declare(nonduplicable("FileHandle"));
    let boxed = fixture.module.declare(generic_box("Box"));

    let mut solver = CapabilitySolver::new(&fixture.module);
    solver.derive_module_grants();
    let empty = GenericSignature::empty();
    assert!(solver.ty_holds_capability(
        &Ty::generic(boxed, vec![Ty::decl(fixture.int)]),
        CapabilityKind::Duplicable,
        &empty,
    ));
    assert!(!solver.ty_holds_capability(
        &Ty::generic(boxed, vec![Ty::decl(handle)]),
        CapabilityKind::Duplicable,
        &empty,
    ));
}

#[test]
fn excluded_node_with_self_reference_is_left_alone() {
    let mut fixture = seeded();
    // Forward id so the stored member can reference its own declaration.
    let node_id = crate::ast::DeclId::from_index(fixture.module.decl_count());
    let node = fixture.module.declare(
        aggregate("Node", vec![field("next", Ty::decl(node_id))])
            .with_span(Span::new(500, 560), 524)
            .with_inherited(InheritanceClause::new(vec![InheritedEntry::excludes(
                "Duplicable",
                Some(Span::new(512, 523)),
            )])),
    );
    assert_eq!(node, node_id);

    let result = check_module(&fixture.module);
    assert_eq!(result.grants.lookup(node, CapabilityKind::Duplicable), None);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn reference_storage_wrappers_are_stripped_before_the_check() {
    let mut fixture = seeded();
    let registry = fixture.module.declare(TypeDecl::new(
        "Registry",
        DeclKind::Reference { fields: Vec::new() },
    ));
    fixture.module.declare(
        aggregate("Observer", vec![field("target", Ty::weak(Ty::decl(registry)))])
            .with_span(Span::new(600, 660), 612),
    );

    let result = check_module(&fixture.module);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn error_member_types_are_ignored() {
    let mut fixture = seeded();
    fixture.module.declare(
        aggregate("Broken", vec![field("oops", Ty::Error)]).with_span(Span::new(700, 730), 709),
    );
    let result = check_module(&fixture.module);
    assert!(result.diagnostics.is_empty());
}
