use std::cell::RefCell;

use super::solver::{ConformanceResult, check_module};
use crate::ast::Module;

/// Memoizing front door for conformance results, for callers that may ask
/// more than once per module (driver, LSP, serialization).
pub struct ConformanceQueries<'a> {
    module: &'a Module,
    full_cache: RefCell<Option<ConformanceResult>>,
}

impl<'a> ConformanceQueries<'a> {
    #[must_use]
    pub fn new(module: &'a Module) -> Self {
        Self {
            module,
            full_cache: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn check_module(&self) -> ConformanceResult {
        if let Some(cached) = self.full_cache.borrow().clone() {
            return cached;
        }
        let result = check_module(self.module);
        self.full_cache.replace(Some(result.clone()));
        result
    }
}
