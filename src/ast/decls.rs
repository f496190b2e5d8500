use std::collections::HashMap;

use super::types::Ty;
use crate::diagnostics::Span;

/// Stable identity of a declaration within its module's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

impl DeclId {
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Entry written in a declaration's inheritance clause.
///
/// `inverse` records a `~`-prefixed entry; the name is matched against the
/// known capability set during marking computation, so non-capability
/// entries (plain interface adoptions) pass through untouched.
#[derive(Debug, Clone)]
pub struct InheritedEntry {
    pub name: String,
    pub inverse: bool,
    pub span: Option<Span>,
}

impl InheritedEntry {
    #[must_use]
    pub fn adopts(name: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            name: name.into(),
            inverse: false,
            span,
        }
    }

    #[must_use]
    pub fn excludes(name: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            name: name.into(),
            inverse: true,
            span,
        }
    }
}

/// Inheritance clause of a type declaration, in written order.
#[derive(Debug, Clone, Default)]
pub struct InheritanceClause {
    pub entries: Vec<InheritedEntry>,
}

impl InheritanceClause {
    #[must_use]
    pub fn new(entries: Vec<InheritedEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Span of the final written entry, the anchor for appending fix-its.
    #[must_use]
    pub fn end_span(&self) -> Option<Span> {
        self.entries.last().and_then(|entry| entry.span)
    }
}

/// Constraint written on a generic parameter.
#[derive(Debug, Clone)]
pub struct ConstraintEntry {
    pub name: String,
    pub inverse: bool,
    pub span: Option<Span>,
}

impl ConstraintEntry {
    #[must_use]
    pub fn requires(name: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            name: name.into(),
            inverse: false,
            span,
        }
    }

    #[must_use]
    pub fn suppresses(name: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            name: name.into(),
            inverse: true,
            span,
        }
    }
}

/// Individual parameter declared on a generic declaration.
#[derive(Debug, Clone)]
pub struct GenericParam {
    pub name: String,
    pub span: Option<Span>,
    pub constraints: Vec<ConstraintEntry>,
}

impl GenericParam {
    #[must_use]
    pub fn new(name: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            name: name.into(),
            span,
            constraints: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: ConstraintEntry) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Type parameter list declared on a generic declaration.
#[derive(Debug, Clone, Default)]
pub struct GenericParams {
    pub span: Option<Span>,
    pub params: Vec<GenericParam>,
}

impl GenericParams {
    #[must_use]
    pub fn new(span: Option<Span>, params: Vec<GenericParam>) -> Self {
        Self { span, params }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Stored field of an aggregate or reference declaration.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Ty,
    pub is_static: bool,
    pub is_computed: bool,
    pub span: Option<Span>,
}

impl FieldDecl {
    #[must_use]
    pub fn stored(name: impl Into<String>, ty: Ty, span: Option<Span>) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
            is_computed: false,
            span,
        }
    }
}

/// Associated payload slot of a tagged-union case.
#[derive(Debug, Clone)]
pub struct CaseSlot {
    pub name: Option<String>,
    pub ty: Ty,
    pub span: Option<Span>,
}

impl CaseSlot {
    #[must_use]
    pub fn new(name: Option<String>, ty: Ty, span: Option<Span>) -> Self {
        Self { name, ty, span }
    }
}

/// Case of a tagged union, with zero or more payload slots.
#[derive(Debug, Clone)]
pub struct UnionCase {
    pub name: String,
    pub slots: Vec<CaseSlot>,
    pub span: Option<Span>,
}

impl UnionCase {
    #[must_use]
    pub fn new(name: impl Into<String>, slots: Vec<CaseSlot>, span: Option<Span>) -> Self {
        Self {
            name: name.into(),
            slots,
            span,
        }
    }

    #[must_use]
    pub fn has_payload(&self) -> bool {
        !self.slots.is_empty()
    }
}

/// Kind of a type declaration. The set is closed; storage traversal and
/// grant validation match on it exhaustively.
#[derive(Debug, Clone)]
pub enum DeclKind {
    /// Value aggregate with fixed layout.
    Aggregate { fields: Vec<FieldDecl> },
    /// Indirect reference type.
    Reference { fields: Vec<FieldDecl> },
    /// Tagged union with ordered cases.
    TaggedUnion { cases: Vec<UnionCase> },
    /// Interface declaration; defines no storage.
    Interface,
    /// Compiler-internal tuple declaration. No source construct materializes
    /// one that reaches capability checking today.
    BuiltinTuple,
}

impl DeclKind {
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            DeclKind::Aggregate { .. } => "struct",
            DeclKind::Reference { .. } => "class",
            DeclKind::TaggedUnion { .. } => "union",
            DeclKind::Interface => "interface",
            DeclKind::BuiltinTuple => "tuple",
        }
    }

    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, DeclKind::Reference { .. })
    }

    #[must_use]
    pub fn is_tagged_union(&self) -> bool {
        matches!(self, DeclKind::TaggedUnion { .. })
    }
}

/// User-declared (or compiler-seeded builtin) type declaration.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub kind: DeclKind,
    pub generics: GenericParams,
    pub inherited: InheritanceClause,
    pub span: Option<Span>,
    /// Byte offset of the opening body brace, the insertion point for
    /// fix-its when the inheritance clause is empty.
    pub body_start: Option<usize>,
}

impl TypeDecl {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            kind,
            generics: GenericParams::default(),
            inherited: InheritanceClause::default(),
            span: None,
            body_start: None,
        }
    }

    #[must_use]
    pub fn with_generics(mut self, generics: GenericParams) -> Self {
        self.generics = generics;
        self
    }

    #[must_use]
    pub fn with_inherited(mut self, inherited: InheritanceClause) -> Self {
        self.inherited = inherited;
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span, body_start: usize) -> Self {
        self.span = Some(span);
        self.body_start = Some(body_start);
        self
    }

    #[must_use]
    pub fn param(&self, index: usize) -> Option<&GenericParam> {
        self.generics.params.get(index)
    }
}

/// Compilation unit's declaration arena plus name index.
#[derive(Debug, Default)]
pub struct Module {
    pub name: String,
    decls: Vec<TypeDecl>,
    by_name: HashMap<String, DeclId>,
}

impl Module {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decls: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn declare(&mut self, decl: TypeDecl) -> DeclId {
        let id = DeclId::from_index(self.decls.len());
        self.by_name.insert(decl.name.clone(), id);
        self.decls.push(decl);
        id
    }

    /// # Panics
    ///
    /// Panics if `id` was not produced by this module's arena.
    #[must_use]
    pub fn decl(&self, id: DeclId) -> &TypeDecl {
        &self.decls[id.index()]
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    pub fn decl_ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        (0..self.decls.len()).map(DeclId::from_index)
    }

    /// Renders a type for diagnostics, resolving generic-parameter indices
    /// against the declaration that owns the member being reported.
    #[must_use]
    pub fn ty_display(&self, ty: &Ty, owner: &TypeDecl) -> String {
        match ty {
            Ty::Decl { id, args } => {
                let name = &self.decl(*id).name;
                if args.is_empty() {
                    name.clone()
                } else {
                    let rendered: Vec<String> = args
                        .iter()
                        .map(|arg| self.ty_display(arg, owner))
                        .collect();
                    format!("{name}<{}>", rendered.join(", "))
                }
            }
            Ty::Param { index } => owner
                .param(*index)
                .map_or_else(|| format!("${index}"), |param| param.name.clone()),
            Ty::RefStorage { kind, inner } => {
                format!("{} {}", kind.keyword(), self.ty_display(inner, owner))
            }
            Ty::Lvalue(inner) => self.ty_display(inner, owner),
            Ty::Error => "<error>".into(),
        }
    }
}
