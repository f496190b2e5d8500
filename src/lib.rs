#![deny(warnings)]
#![deny(clippy::all, clippy::pedantic, clippy::perf, clippy::suspicious)] // Catch correctness + perf + suspicious patterns early.
#![deny(clippy::unwrap_used, clippy::expect_used)]

//! Capability conformance engine for the Quill compiler's semantic-analysis
//! stage.
//!
//! Given a module of type declarations, the engine decides which declarations
//! hold the compiler-known invertible capabilities (canonically `Duplicable`),
//! synthesizes the grant records (unconditional, or conditional on the
//! declaration's generic parameters), and validates each duplication grant
//! against the declaration's stored members. Validation failures produce
//! diagnostics with fix-it suggestions.

pub mod ast;
pub mod diagnostics;
pub mod sema;

pub use sema::{ConformanceQueries, ConformanceResult, check_module};
