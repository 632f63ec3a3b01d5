//! Turns a token stream into a forest of top-level declarations.
//!
//! The parser buffers every token from a [`lovela_lex::Lexer`] up front (the
//! language has no preprocessor and no need to interleave lexing with
//! parsing) and walks it with one token of lookahead. Each top-level
//! construct is parsed independently: a [`ParseError`] raised while parsing
//! one is caught right there, turned into a single `Error` node, and the
//! parser resynchronises at the next safe boundary rather than aborting the
//! whole file.

mod ast;
mod error;
mod expr;
mod items;
mod types;

pub use ast::{ApiSpec, NameSpace, Node, NodeKind, Primitive, TypeSpec, VariableDeclaration};
pub use error::ParseError;
pub use types::{infer_decimal_primitive, infer_integer_primitive};

use lovela_lex::{Lexer, Token, TokenKind};
use lovela_util::diagnostic::codes;
use lovela_util::{Diagnostic, DiagnosticBag, FileId, Span};

/// Recursive-descent parser over a fully buffered token stream.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    file_id: FileId,
    diagnostics: DiagnosticBag,
    /// Names in scope as the current declaration's parameters, consulted to
    /// tell a bare `VariableReference` apart from a zero-argument
    /// `FunctionCall`.
    current_params: Vec<String>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
            file_id: FileId::DUMMY,
            diagnostics: DiagnosticBag::new(),
            current_params: Vec::new(),
        }
    }

    pub fn with_file(tokens: Vec<Token>, file_id: FileId) -> Self {
        let mut parser = Parser::new(tokens);
        parser.file_id = file_id;
        parser
    }

    /// Drains `lexer` fully, carrying over any diagnostics it already
    /// collected (e.g. an unterminated string or comment) into the new
    /// parser's bag.
    pub fn from_lexer(mut lexer: Lexer, file_id: FileId) -> Self {
        let tokens: Vec<Token> = (&mut lexer).collect();
        let lex_diagnostics = lexer.into_diagnostics();
        let mut parser = Parser::with_file(tokens, file_id);
        for diagnostic in lex_diagnostics {
            parser.diagnostics.push(diagnostic);
        }
        parser
    }

    /// Parses every top-level declaration in the buffered token stream.
    /// Never panics and never returns early on a malformed declaration —
    /// each failure becomes one `Error` node and parsing continues after it.
    pub fn parse(mut self) -> (Vec<Node>, DiagnosticBag) {
        let mut decls = Vec::new();
        while !self.at_end() {
            match self.parse_top_decl() {
                Ok(node) => {
                    tracing::trace!(name = %node.value, "parsed top-level declaration");
                    decls.push(node);
                }
                Err(err) => {
                    let span = err.span();
                    self.report_parse_error(&err);
                    decls.push(Node::error(err.to_string(), span));
                    self.synchronize();
                }
            }
        }
        tracing::debug!(count = decls.len(), errors = self.diagnostics.len(), "parse complete");
        (decls, self.diagnostics)
    }

    fn report_parse_error(&mut self, err: &ParseError) {
        let code = match err {
            ParseError::UnexpectedToken { .. } => codes::E_PAR_UNEXPECTED_TOKEN,
            ParseError::InvalidCurrentToken { .. } => codes::E_PAR_INVALID_CURRENT_TOKEN,
            ParseError::ErrorTokenFromLexer { .. } => codes::E_PAR_ERROR_TOKEN_FROM_LEXER,
            ParseError::MissingToken { .. } => codes::E_PAR_MISSING_TOKEN,
        };
        self.diagnostics.push(
            Diagnostic::error(err.to_string())
                .code(code)
                .span(err.span())
                .build(),
        );
    }

    /// Skips tokens until the next plausible top-level boundary: past a
    /// `.`, or up to (but not past) a token that starts a fresh declaration,
    /// or up to `End`.
    fn synchronize(&mut self) {
        loop {
            match self.current().kind {
                TokenKind::End => return,
                TokenKind::SeparatorDot => {
                    self.advance();
                    return;
                }
                TokenKind::OperatorArrow | TokenKind::ParenSquareOpen | TokenKind::SeparatorSlash => return,
                TokenKind::Identifier if self.looks_like_decl_start() => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// A heuristic used only during error recovery: an identifier at the
    /// current resync point is treated as a new declaration's start if the
    /// previous token was a `.` (i.e. we're sitting right after a
    /// terminator, not mid-expression).
    fn looks_like_decl_start(&self) -> bool {
        self.position == 0
            || matches!(
                self.tokens.get(self.position - 1).map(|t| t.kind),
                Some(TokenKind::SeparatorDot)
            )
    }

    // -- token cursor -------------------------------------------------

    fn current(&self) -> &Token {
        self.tokens
            .get(self.position)
            .unwrap_or_else(|| self.tokens.last().expect("lexer always yields at least End"))
    }

    fn peek_ahead(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.position + offset)
            .unwrap_or_else(|| self.tokens.last().expect("lexer always yields at least End"))
    }

    fn at_end(&self) -> bool {
        self.current().kind == TokenKind::End
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::End {
            self.position += 1;
        }
        token
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    /// Consumes and returns the current token if it matches `kind`,
    /// otherwise raises a `MissingToken` signal without advancing.
    fn expect(&mut self, kind: TokenKind, what: &'static str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else if self.check(TokenKind::Error) {
            let tok = self.advance();
            Err(ParseError::ErrorTokenFromLexer {
                message: tok.value,
                span: tok.span,
            })
        } else {
            Err(ParseError::MissingToken {
                what,
                span: self.current_span(),
            })
        }
    }

    fn is_operator_like(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::OperatorComparison | TokenKind::OperatorArithmetic | TokenKind::OperatorBitwise
        )
    }

    /// `qualified-name := ['/'] identifier { '|' identifier } [ '|' name-or-operator ]`
    /// — the leading segments land in `NameSpace`, the last becomes the
    /// returned value (the function/variable's own name).
    fn parse_qualified_name(&mut self) -> (NameSpace, String) {
        let mut namespace = NameSpace::default();
        if self.check(TokenKind::SeparatorSlash) {
            self.advance();
            namespace.root_absolute = true;
        }

        let mut segments = Vec::new();
        if self.check(TokenKind::Identifier) || self.is_operator_like() {
            segments.push(self.advance().value);
            while self.check(TokenKind::SeparatorVerticalLine) {
                self.advance();
                let next_is_operator = self.is_operator_like();
                if self.check(TokenKind::Identifier) || next_is_operator {
                    segments.push(self.advance().value);
                    if next_is_operator && self.check(TokenKind::SeparatorVerticalLine) {
                        self.diagnostics.push(
                            Diagnostic::error("operator token must be the last name segment")
                                .code(codes::E_PAR_UNEXPECTED_TOKEN)
                                .span(self.current_span())
                                .build(),
                        );
                    }
                } else {
                    self.diagnostics.push(
                        Diagnostic::error("expected identifier after '|'")
                            .code(codes::E_PAR_MISSING_TOKEN)
                            .span(self.current_span())
                            .build(),
                    );
                    break;
                }
            }
        }

        let name = segments.pop().unwrap_or_default();
        namespace.segments = segments;
        (namespace, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lovela_lex::Lexer;

    fn parse(src: &str) -> (Vec<Node>, DiagnosticBag) {
        let lexer = Lexer::new(src);
        Parser::from_lexer(lexer, FileId::DUMMY).parse()
    }

    #[test]
    fn scenario_1_simple_declaration() {
        let (decls, diags) = parse("func: + 1.");
        assert!(diags.is_empty());
        assert_eq!(decls.len(), 1);
        let decl = &decls[0];
        assert_eq!(decl.kind, NodeKind::FunctionDeclaration);
        assert_eq!(decl.value, "func");
        assert_eq!(decl.children.len(), 1);
        let body = &decl.children[0];
        assert_eq!(body.kind, NodeKind::Expression);
        assert_eq!(body.children.len(), 1);
        let binop = &body.children[0];
        assert_eq!(binop.kind, NodeKind::BinaryOperation);
        assert_eq!(binop.children.len(), 2);
        assert_eq!(binop.children[0].kind, NodeKind::ExpressionInput);
        assert_eq!(binop.children[1].kind, NodeKind::Literal);
        assert_eq!(binop.children[1].value, "1");
    }

    #[test]
    fn scenario_2_exported_function_with_types() {
        let (decls, diags) = parse("<- [#32] ex [#32]: + 1.");
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(decls.len(), 1);
        let decl = &decls[0];
        assert!(decl.api_spec.contains(ApiSpec::EXPORT));
        assert_eq!(decl.value, "ex");
        assert_eq!(decl.in_type, TypeSpec::Primitive(Primitive::signed(32)));
        assert_eq!(decl.out_type, TypeSpec::Primitive(Primitive::signed(32)));
    }

    #[test]
    fn scenario_3_imported_standard_c_function() {
        let (decls, diags) = parse("-> 'Standard C' puts.");
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(decls.len(), 1);
        let decl = &decls[0];
        assert!(decl.api_spec.contains(ApiSpec::IMPORT));
        assert!(decl.api_spec.contains(ApiSpec::STANDARD));
        assert!(decl.api_spec.contains(ApiSpec::C));
        assert_eq!(decl.value, "puts");
        assert!(decl.children.is_empty(), "imports have no body");
    }

    #[test]
    fn main_function_has_empty_name() {
        let (decls, diags) = parse(": + 1.");
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(decls.len(), 1);
        assert!(decls[0].value.is_empty());
        assert!(decls[0].namespace.is_empty());
    }

    #[test]
    fn unterminated_declaration_yields_single_error_node_and_recovers() {
        let (decls, diags) = parse("broken: + 1\nfunc: + 2.");
        assert!(diags.has_errors());
        assert_eq!(decls.len(), 2, "one node per source top-level construct");
        assert!(decls[0].is_error());
        assert_eq!(decls[1].value, "func");
    }

    #[test]
    fn parenthesized_arguments_become_function_call_children() {
        let (decls, diags) = parse("f(a, b): + 1.");
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(decls[0].parameters.len(), 2);
        assert_eq!(decls[0].parameters[0].name, "a");
        assert_eq!(decls[0].parameters[1].name, "b");
    }
}
