//! Shared infrastructure used by every lovela compiler stage: source spans,
//! the source map, and the diagnostic model.

pub mod diagnostic;
pub mod error;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBag, DiagnosticBuilder, DiagnosticCode, Level};
pub use span::{FileId, SourceMap, Span};
