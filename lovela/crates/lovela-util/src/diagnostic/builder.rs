use super::{Diagnostic, DiagnosticBag, DiagnosticCode, Level};
use crate::span::Span;

/// Fluent construction of a `Diagnostic`, mirroring how every stage reports
/// an error without having to build the struct literal by hand.
pub struct DiagnosticBuilder {
    level: Level,
    code: Option<DiagnosticCode>,
    message: String,
    span: Span,
    notes: Vec<String>,
    helps: Vec<String>,
}

impl DiagnosticBuilder {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        DiagnosticBuilder {
            level,
            code: None,
            message: message.into(),
            span: Span::DUMMY,
            notes: Vec::new(),
            helps: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            code: self.code,
            message: self.message,
            span: self.span,
            notes: self.notes,
            helps: self.helps,
        }
    }

    /// Builds the diagnostic and pushes it directly into a bag.
    pub fn emit(self, bag: &mut DiagnosticBag) {
        bag.push(self.build());
    }
}
