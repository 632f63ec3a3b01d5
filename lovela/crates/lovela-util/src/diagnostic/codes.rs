use std::fmt;

/// A stable, human-typeable diagnostic identifier, e.g. `E_LEX_001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    prefix: &'static str,
    number: u32,
}

impl DiagnosticCode {
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        DiagnosticCode { prefix, number }
    }

    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub const fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.prefix, self.number)
    }
}

// Lexer errors (spec ch. 4.2 / 7).
pub const E_LEX_SYNTAX_ERROR: DiagnosticCode = DiagnosticCode::new("E_LEX_", 1);
pub const E_LEX_COMMENT_OPEN: DiagnosticCode = DiagnosticCode::new("E_LEX_", 2);
pub const E_LEX_STRING_LITERAL_OPEN: DiagnosticCode = DiagnosticCode::new("E_LEX_", 3);
pub const E_LEX_STRING_FIELD_ILLFORMED: DiagnosticCode = DiagnosticCode::new("E_LEX_", 4);
pub const E_LEX_STRING_FIELD_UNKNOWN: DiagnosticCode = DiagnosticCode::new("E_LEX_", 5);
pub const E_LEX_STRING_INTERPOLATION_OVERFLOW: DiagnosticCode = DiagnosticCode::new("E_LEX_", 6);
pub const E_LEX_LITERAL_DECIMAL_ILLFORMED: DiagnosticCode = DiagnosticCode::new("E_LEX_", 7);

// Parser errors.
pub const E_PAR_PARSE_ERROR: DiagnosticCode = DiagnosticCode::new("E_PAR_", 1);
pub const E_PAR_UNEXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::new("E_PAR_", 2);
pub const E_PAR_INVALID_CURRENT_TOKEN: DiagnosticCode = DiagnosticCode::new("E_PAR_", 3);
pub const E_PAR_ERROR_TOKEN_FROM_LEXER: DiagnosticCode = DiagnosticCode::new("E_PAR_", 4);
pub const E_PAR_MISSING_TOKEN: DiagnosticCode = DiagnosticCode::new("E_PAR_", 5);

// Emitter errors.
pub const E_GEN_UNSUPPORTED_PRIMITIVE: DiagnosticCode = DiagnosticCode::new("E_GEN_", 1);
pub const E_GEN_NON_PRIMITIVE_EXPORT: DiagnosticCode = DiagnosticCode::new("E_GEN_", 2);
pub const E_GEN_SCOPE_IMBALANCE: DiagnosticCode = DiagnosticCode::new("E_GEN_", 3);
pub const E_GEN_UNHANDLED_NODE: DiagnosticCode = DiagnosticCode::new("E_GEN_", 4);
