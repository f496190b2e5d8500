use crate::diagnostics::{Diagnostic, DiagnosticCode, Span};

pub mod codes {
    /// A declaration both adopts a capability and writes its exclusion.
    pub const CAPABILITY_CONTRADICTION: &str = "CAP001";
    /// A stored member's type lacks the capability its container claims.
    pub const NONDUPLICABLE_MEMBER: &str = "CAP002";
    /// Suggestion to exclude the container instead of fixing the member.
    pub const EXCLUSION_SUGGESTED: &str = "CAP003";
}

#[must_use]
pub fn error(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Diagnostic {
    let mut message = message.into();
    if !message.starts_with('[') {
        message = format!("[{code}] {message}");
    }
    Diagnostic::error(message, span)
        .with_code(DiagnosticCode::new(code.to_string(), Some("sema".into())))
}

#[must_use]
pub fn help(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Diagnostic {
    let mut message = message.into();
    if !message.starts_with('[') {
        message = format!("[{code}] {message}");
    }
    Diagnostic::help(message, span)
        .with_code(DiagnosticCode::new(code.to_string(), Some("sema".into())))
}

#[must_use]
pub fn note(message: impl Into<String>, span: Option<Span>) -> Diagnostic {
    Diagnostic::note(message.into(), span)
}
