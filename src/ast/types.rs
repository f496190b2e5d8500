use super::decls::DeclId;

/// Reference-storage qualifier written on a stored member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefStorageKind {
    Weak,
    Unowned,
}

impl RefStorageKind {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            RefStorageKind::Weak => "weak",
            RefStorageKind::Unowned => "unowned",
        }
    }
}

/// Semantic type as seen by the conformance engine.
///
/// Generic parameters are referenced by their index in the enclosing
/// declaration's parameter list; substitution into a use site replaces them
/// with the supplied arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    /// Reference to a declared type, with generic arguments.
    Decl { id: DeclId, args: Vec<Ty> },
    /// Generic parameter of the enclosing declaration.
    Param { index: usize },
    /// Member wrapped in a reference-storage qualifier.
    RefStorage { kind: RefStorageKind, inner: Box<Ty> },
    /// Mutable place produced by accessor lowering; normalized away before
    /// capability checks.
    Lvalue(Box<Ty>),
    /// Placeholder for a type that already failed resolution upstream.
    Error,
}

impl Ty {
    #[must_use]
    pub fn decl(id: DeclId) -> Self {
        Ty::Decl {
            id,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn generic(id: DeclId, args: Vec<Ty>) -> Self {
        Ty::Decl { id, args }
    }

    #[must_use]
    pub fn param(index: usize) -> Self {
        Ty::Param { index }
    }

    #[must_use]
    pub fn weak(inner: Ty) -> Self {
        Ty::RefStorage {
            kind: RefStorageKind::Weak,
            inner: Box::new(inner),
        }
    }

    #[must_use]
    pub fn lvalue(inner: Ty) -> Self {
        Ty::Lvalue(Box::new(inner))
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Ty::Error)
    }

    /// Strips l-value wrappers, yielding the r-value view of the type.
    #[must_use]
    pub fn r_value(&self) -> &Ty {
        let mut ty = self;
        while let Ty::Lvalue(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Strips a reference-storage qualifier, yielding the referent.
    #[must_use]
    pub fn reference_storage_referent(&self) -> &Ty {
        match self {
            Ty::RefStorage { inner, .. } => inner,
            other => other,
        }
    }

    /// Normalization applied to a stored member's declared type before any
    /// capability check: r-value view, then reference-storage referent.
    #[must_use]
    pub fn normalized(&self) -> Ty {
        self.r_value().reference_storage_referent().clone()
    }

    /// Replaces generic-parameter references with the supplied arguments.
    ///
    /// Parameters without a corresponding argument are left in place, which
    /// keeps substitution into a declaration's own context the identity.
    #[must_use]
    pub fn substitute(&self, args: &[Ty]) -> Ty {
        match self {
            Ty::Decl { id, args: inner } => Ty::Decl {
                id: *id,
                args: inner.iter().map(|arg| arg.substitute(args)).collect(),
            },
            Ty::Param { index } => args.get(*index).cloned().unwrap_or(Ty::Param { index: *index }),
            Ty::RefStorage { kind, inner } => Ty::RefStorage {
                kind: *kind,
                inner: Box::new(inner.substitute(args)),
            },
            Ty::Lvalue(inner) => Ty::Lvalue(Box::new(inner.substitute(args))),
            Ty::Error => Ty::Error,
        }
    }
}
