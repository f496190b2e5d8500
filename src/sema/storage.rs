use crate::ast::{CaseSlot, DeclId, DeclKind, FieldDecl, Module, Ty, UnionCase};
use crate::diagnostics::Span;

/// Storage member handed to the traversal callback: a stored field or a
/// union case's associated payload slot.
#[derive(Debug, Clone, Copy)]
pub enum StorageMember<'a> {
    Field(&'a FieldDecl),
    CaseSlot {
        case: &'a UnionCase,
        slot: &'a CaseSlot,
        index: usize,
    },
}

impl StorageMember<'_> {
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            StorageMember::Field(field) => field.name.clone(),
            StorageMember::CaseSlot { case, slot, index } => slot
                .name
                .clone()
                .unwrap_or_else(|| format!("{}.{index}", case.name)),
        }
    }

    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            StorageMember::Field(field) => field.span,
            StorageMember::CaseSlot { slot, case, .. } => slot.span.or(case.span),
        }
    }

    #[must_use]
    pub fn is_union_payload(&self) -> bool {
        matches!(self, StorageMember::CaseSlot { .. })
    }
}

/// Walks the instance storage of a declaration, presenting each member's
/// declared type mapped through `subst` into the requested context and
/// normalized (reference-storage wrapper stripped, r-value view). An empty
/// `subst` keeps members in the declaration's own generic context.
///
/// Returns true iff some invocation of `per_member` returned true, which
/// stops the walk. Aggregates and reference types contribute their stored
/// fields in declaration order (static and computed members are skipped);
/// tagged unions contribute the payload slots of payload-carrying cases in
/// case order, skipping payload-less cases entirely; interfaces define no
/// storage and the callback is never invoked.
///
/// # Panics
///
/// Reaching a builtin tuple declaration is a violated internal invariant:
/// no source construct materializes one that undergoes storage checks.
pub fn visit_storage<F>(module: &Module, decl_id: DeclId, subst: &[Ty], mut per_member: F) -> bool
where
    F: FnMut(&StorageMember<'_>, Ty) -> bool,
{
    let decl = module.decl(decl_id);
    match &decl.kind {
        DeclKind::Aggregate { fields } | DeclKind::Reference { fields } => {
            for field in fields {
                if field.is_static || field.is_computed {
                    continue;
                }
                let ty = field.ty.substitute(subst).normalized();
                if per_member(&StorageMember::Field(field), ty) {
                    return true;
                }
            }
            false
        }
        DeclKind::TaggedUnion { cases } => {
            for case in cases {
                if !case.has_payload() {
                    continue;
                }
                for (index, slot) in case.slots.iter().enumerate() {
                    let ty = slot.ty.substitute(subst).normalized();
                    if per_member(&StorageMember::CaseSlot { case, slot, index }, ty) {
                        return true;
                    }
                }
            }
            false
        }
        DeclKind::Interface => false,
        DeclKind::BuiltinTuple => {
            unreachable!("storage traversal over a builtin tuple declaration is not implemented")
        }
    }
}
