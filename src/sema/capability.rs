/// Compiler-known capability interfaces checked structurally by this engine.
///
/// The set is fixed; user-defined capability interfaces go through ordinary
/// interface conformance instead. Only the invertible members support an
/// explicit `~`-prefixed exclusion at declaration sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    Duplicable,
    ThreadSafe,
    Shareable,
}

impl CapabilityKind {
    /// Capabilities that support the written inverse form. Grant derivation
    /// is defined for exactly this subset.
    pub const INVERTIBLE: [CapabilityKind; 1] = [CapabilityKind::Duplicable];

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            CapabilityKind::Duplicable => "Duplicable",
            CapabilityKind::ThreadSafe => "ThreadSafe",
            CapabilityKind::Shareable => "Shareable",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Duplicable" => Some(CapabilityKind::Duplicable),
            "ThreadSafe" => Some(CapabilityKind::ThreadSafe),
            "Shareable" => Some(CapabilityKind::Shareable),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_invertible(self) -> bool {
        matches!(self, CapabilityKind::Duplicable)
    }

    /// Written spelling of the exclusion form, e.g. `~Duplicable`.
    #[must_use]
    pub fn inverse_spelling(self) -> String {
        format!("~{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_duplicable_is_invertible() {
        assert!(CapabilityKind::Duplicable.is_invertible());
        assert!(!CapabilityKind::ThreadSafe.is_invertible());
        assert!(!CapabilityKind::Shareable.is_invertible());
        assert_eq!(CapabilityKind::INVERTIBLE, [CapabilityKind::Duplicable]);
    }

    #[test]
    fn names_round_trip() {
        for capability in [
            CapabilityKind::Duplicable,
            CapabilityKind::ThreadSafe,
            CapabilityKind::Shareable,
        ] {
            assert_eq!(
                CapabilityKind::from_name(capability.display_name()),
                Some(capability)
            );
        }
        assert_eq!(CapabilityKind::from_name("Hashable"), None);
    }
}
