mod builder;
pub mod codes;

pub use builder::DiagnosticBuilder;
pub use codes::DiagnosticCode;

use std::fmt;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Note,
    Help,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
            Level::Help => "help",
        };
        f.write_str(s)
    }
}

/// A single diagnostic, carrying everything the driver needs to pretty-print
/// it without consulting anything but the `SourceMap` for the quoted line.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: Level,
    pub code: Option<DiagnosticCode>,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub helps: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(Level::Warning, message)
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

/// Accumulates diagnostics across every pipeline stage without ever aborting
/// it; the driver drains this at the end to decide the exit code.
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        DiagnosticBag {
            diagnostics: Vec::new(),
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

impl IntoIterator for DiagnosticBag {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

/// Anything a stage's error enum can be turned into so the driver can feed
/// it straight into a `DiagnosticBag`.
pub trait IntoDiagnostic {
    fn into_diagnostic(self) -> Diagnostic;
}
