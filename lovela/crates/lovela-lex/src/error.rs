use thiserror::Error;

use lovela_util::span::Span;

/// Programmatic counterpart of the lexer's diagnostic taxonomy (spec ch. 7).
/// The lexer itself never returns these directly — it always keeps scanning
/// and records a `Diagnostic` plus an `Error` token — but callers that want
/// to match on a specific failure kind can convert through here.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("syntax error near '{lexeme}'")]
    SyntaxError { lexeme: String, span: Span },
    #[error("comment is not terminated")]
    CommentOpen { span: Span },
    #[error("string literal is not terminated")]
    StringLiteralOpen { span: Span },
    #[error("ill-formed string field")]
    StringFieldIllformed { span: Span },
    #[error("unknown string field code")]
    StringFieldUnknown { span: Span },
    #[error("too many implicit string interpolations")]
    StringInterpolationOverflow { span: Span },
    #[error("ill-formed decimal literal")]
    LiteralDecimalIllformed { span: Span },
}
