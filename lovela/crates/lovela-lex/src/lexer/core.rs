use std::collections::VecDeque;

use lovela_util::diagnostic::{codes, DiagnosticBag, DiagnosticBuilder};
use lovela_util::span::{FileId, Span};

use super::{classify, comment, number, string};
use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// A single-threaded streaming scanner producing a lazy, finite sequence of
/// tokens terminating with one `End` token. Buffers characters that don't
/// trigger an immediate dispatch and classifies the buffer at the next
/// word break.
pub struct Lexer {
    cursor: Cursor,
    file_id: FileId,
    diagnostics: DiagnosticBag,
    pending: VecDeque<Token>,
    buffer: String,
    buffer_start: (usize, u32, u32),
    expect_word_break: bool,
    finished: bool,
    end_emitted: bool,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self::with_file(source, FileId::DUMMY)
    }

    pub fn with_file(source: &str, file_id: FileId) -> Self {
        tracing::debug!(bytes = source.len(), ?file_id, "lexing source");
        Lexer {
            cursor: Cursor::with_file(source, file_id),
            file_id,
            diagnostics: DiagnosticBag::new(),
            pending: VecDeque::new(),
            buffer: String::new(),
            buffer_start: (0, 1, 1),
            expect_word_break: false,
            finished: false,
            end_emitted: false,
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> DiagnosticBag {
        self.diagnostics
    }

    fn here_span(&self) -> Span {
        Span::with_file(
            self.cursor.position(),
            self.cursor.position(),
            self.cursor.line(),
            self.cursor.column(),
            self.file_id,
        )
    }

    fn span_from(&self, start: (usize, u32, u32)) -> Span {
        Span::with_file(start.0, self.cursor.position(), start.1, start.2, self.file_id)
    }

    fn buffer_span(&self) -> Span {
        self.span_from(self.buffer_start)
    }

    fn emit_separator(&mut self, c: char) -> Token {
        let span = self.here_span();
        self.cursor.advance();
        let kind = separator_kind(c);
        Token::new(kind, c.to_string(), span, self.cursor.current_line_excerpt())
    }

    /// Classifies and clears the lexeme buffer, returning the token it
    /// produced (if the buffer was non-empty).
    fn flush_buffer(&mut self) -> Option<Token> {
        if self.buffer.is_empty() {
            return None;
        }
        let span = self.buffer_span();
        let lexeme = std::mem::take(&mut self.buffer);
        let excerpt = self.cursor.current_line_excerpt();
        match classify::classify(&lexeme) {
            Some(kind) => Some(Token::new(kind, lexeme, span, excerpt)),
            None => {
                DiagnosticBuilder::error(format!("syntax error near '{lexeme}'"))
                    .code(codes::E_LEX_SYNTAX_ERROR)
                    .span(span)
                    .emit(&mut self.diagnostics);
                Some(Token::new(TokenKind::Error, lexeme, span, excerpt))
            }
        }
    }

    /// Produces the next token, draining any already-scanned tokens first.
    pub fn next_token(&mut self) -> Token {
        if let Some(t) = self.pending.pop_front() {
            return t;
        }
        if self.finished {
            return Token::end(self.here_span());
        }

        loop {
            if self.cursor.is_at_end() {
                if let Some(t) = self.flush_buffer() {
                    return t;
                }
                self.finished = true;
                return Token::end(self.here_span());
            }

            let c = self.cursor.current();

            // 1. whitespace flushes the buffer as a word break.
            if c.is_whitespace() {
                if let Some(t) = self.flush_buffer() {
                    return t;
                }
                self.cursor.advance();
                self.expect_word_break = false;
                continue;
            }

            // 2. single-character separators are never buffered.
            if classify::is_immediate_separator(c) {
                if let Some(t) = self.flush_buffer() {
                    return t;
                }
                self.expect_word_break = false;
                return self.emit_separator(c);
            }

            // 3. "<<" opens a nestable comment.
            if c == '<' && self.cursor.peek(1) == '<' {
                if let Some(t) = self.flush_buffer() {
                    return t;
                }
                comment::scan(&mut self.cursor, &mut self.diagnostics, self.file_id);
                self.expect_word_break = false;
                continue;
            }

            // 4. a word break was expected but none of the above matched.
            if self.expect_word_break {
                self.expect_word_break = false;
                let span = self.here_span();
                let bad = self.cursor.advance().unwrap_or('\0');
                DiagnosticBuilder::error(format!("expected a word break before '{bad}'"))
                    .code(codes::E_LEX_SYNTAX_ERROR)
                    .span(span)
                    .emit(&mut self.diagnostics);
                return Token::new(
                    TokenKind::Error,
                    bad.to_string(),
                    span,
                    self.cursor.current_line_excerpt(),
                );
            }

            // 5. a numeric literal starts at a buffer boundary.
            if self.buffer.is_empty()
                && (c.is_ascii_digit()
                    || (matches!(c, '+' | '-') && self.cursor.peek(1).is_ascii_digit()))
            {
                let start = (self.cursor.position(), self.cursor.line(), self.cursor.column());
                let scan = number::scan(&mut self.cursor);
                let span = self.span_from(start);
                self.expect_word_break = true;
                if scan.illformed {
                    DiagnosticBuilder::error("ill-formed exponent in decimal literal")
                        .code(codes::E_LEX_LITERAL_DECIMAL_ILLFORMED)
                        .span(span)
                        .emit(&mut self.diagnostics);
                    return Token::new(
                        TokenKind::Error,
                        scan.lexeme,
                        span,
                        self.cursor.current_line_excerpt(),
                    );
                }
                return Token::new(scan.kind, scan.lexeme, span, self.cursor.current_line_excerpt());
            }

            // 6. a string literal starts at a buffer boundary.
            if self.buffer.is_empty() && c == '\'' {
                let mut tokens = string::scan(&mut self.cursor, &mut self.diagnostics, self.file_id);
                self.expect_word_break = true;
                let first = tokens.remove(0);
                self.pending.extend(tokens);
                return first;
            }

            // 7. otherwise the character joins the lexeme buffer.
            if self.buffer.is_empty() {
                self.buffer_start = (self.cursor.position(), self.cursor.line(), self.cursor.column());
            }
            self.buffer.push(c);
            self.cursor.advance();
        }
    }
}

fn separator_kind(c: char) -> TokenKind {
    match c {
        '(' => TokenKind::ParenRoundOpen,
        ')' => TokenKind::ParenRoundClose,
        '[' => TokenKind::ParenSquareOpen,
        ']' => TokenKind::ParenSquareClose,
        '{' => TokenKind::ParenCurlyOpen,
        '}' => TokenKind::ParenCurlyClose,
        '.' => TokenKind::SeparatorDot,
        ',' => TokenKind::SeparatorComma,
        '!' => TokenKind::SeparatorExclamation,
        '?' => TokenKind::SeparatorQuestion,
        '|' => TokenKind::SeparatorVerticalLine,
        ':' => TokenKind::SeparatorColon,
        _ => unreachable!("separator_kind called with a non-separator character"),
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.end_emitted {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::End {
            self.end_emitted = true;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_yields_single_end_token() {
        assert_eq!(kinds(""), vec![TokenKind::End]);
    }

    #[test]
    fn scenario_1_simple_declaration() {
        let lexer = Lexer::new("func: + 1.");
        let tokens: Vec<_> = lexer.collect();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::SeparatorColon,
                TokenKind::OperatorArithmetic,
                TokenKind::LiteralInteger,
                TokenKind::SeparatorDot,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn slash_alone_is_separator_not_arithmetic() {
        assert_eq!(kinds("/"), vec![TokenKind::SeparatorSlash, TokenKind::End]);
    }

    #[test]
    fn primitive_type_token() {
        let tokens: Vec<_> = Lexer::new("[#32]").collect();
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::ParenSquareOpen,
                TokenKind::PrimitiveType,
                TokenKind::ParenSquareClose,
                TokenKind::End
            ]
        );
        assert_eq!(tokens[1].value, "#32");
    }

    #[test]
    fn scenario_5_nested_comment_yields_no_diagnostics() {
        let mut lexer = Lexer::new("<< nested << comment >> still open >>ident.");
        let tokens: Vec<_> = lexer.by_ref().collect();
        assert!(lexer.diagnostics().is_empty());
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Identifier, TokenKind::SeparatorDot, TokenKind::End]
        );
    }

    #[test]
    fn word_break_violation_after_number_is_a_syntax_error() {
        let tokens: Vec<_> = Lexer::new("1a").collect();
        assert_eq!(tokens[0].kind, TokenKind::LiteralInteger);
        assert_eq!(tokens[1].kind, TokenKind::Error);
    }

    #[test]
    fn no_error_tokens_for_well_formed_source() {
        let tokens: Vec<_> = Lexer::new("-> [#32] ex [#32]: + 1.").collect();
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::Error));
    }
}
