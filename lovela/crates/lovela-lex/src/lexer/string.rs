use lovela_util::diagnostic::{codes, DiagnosticBag, DiagnosticBuilder};
use lovela_util::span::{FileId, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Scans a `'...'` string literal, including `{}`-style interpolation
/// fields, into a sequence of tokens. Call with the cursor positioned on
/// the opening quote; it is consumed as part of the scan.
pub fn scan(cursor: &mut Cursor, diagnostics: &mut DiagnosticBag, file_id: FileId) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut implicit_index: u32 = 0;
    let open_line = cursor.line();
    let open_col = cursor.column();
    cursor.advance(); // opening quote

    loop {
        if cursor.is_at_end() {
            let span = point_span(cursor, file_id);
            DiagnosticBuilder::error("string literal is not terminated")
                .code(codes::E_LEX_STRING_LITERAL_OPEN)
                .span(span)
                .emit(diagnostics);
            tokens.push(string_token(buffer, span, cursor.current_line_excerpt()));
            return tokens;
        }

        match cursor.current() {
            '\'' if cursor.peek(1) == '\'' => {
                cursor.advance();
                cursor.advance();
                buffer.push('\'');
            }
            '\'' => {
                let span = Span::with_file(0, 0, open_line, open_col, file_id);
                cursor.advance();
                tokens.push(string_token(buffer, span, cursor.current_line_excerpt()));
                return tokens;
            }
            '{' => {
                let brace_span = point_span(cursor, file_id);
                match field(cursor) {
                    Field::LiteralBrace => {
                        cursor.advance();
                        cursor.advance();
                        buffer.push('{');
                    }
                    Field::Implicit => {
                        cursor.advance();
                        cursor.advance();
                        tokens.push(string_token(
                            std::mem::take(&mut buffer),
                            brace_span,
                            cursor.current_line_excerpt(),
                        ));
                        implicit_index += 1;
                        if implicit_index > 9 {
                            DiagnosticBuilder::error("too many implicit string interpolations (max 9)")
                                .code(codes::E_LEX_STRING_INTERPOLATION_OVERFLOW)
                                .span(brace_span)
                                .emit(diagnostics);
                        }
                        tokens.push(Token::new(
                            TokenKind::LiteralStringInterpolation,
                            implicit_index.to_string(),
                            brace_span,
                            String::new(),
                        ));
                    }
                    Field::Explicit(digit) => {
                        cursor.advance();
                        cursor.advance();
                        cursor.advance();
                        tokens.push(string_token(
                            std::mem::take(&mut buffer),
                            brace_span,
                            cursor.current_line_excerpt(),
                        ));
                        tokens.push(Token::new(
                            TokenKind::LiteralStringInterpolation,
                            digit.to_string(),
                            brace_span,
                            String::new(),
                        ));
                    }
                    Field::Escape(escaped) => {
                        cursor.advance();
                        cursor.advance();
                        cursor.advance();
                        buffer.push(escaped);
                    }
                    Field::Unknown => {
                        DiagnosticBuilder::error(format!(
                            "unknown string field code '{}'",
                            cursor.peek(1)
                        ))
                        .code(codes::E_LEX_STRING_FIELD_UNKNOWN)
                        .span(brace_span)
                        .emit(diagnostics);
                        cursor.advance();
                    }
                    Field::Illformed => {
                        DiagnosticBuilder::error("ill-formed string field (missing '}')")
                            .code(codes::E_LEX_STRING_FIELD_ILLFORMED)
                            .span(brace_span)
                            .emit(diagnostics);
                        cursor.advance();
                    }
                }
            }
            c => {
                buffer.push(c);
                cursor.advance();
            }
        }
    }
}

enum Field {
    LiteralBrace,
    Implicit,
    Explicit(char),
    Escape(char),
    Unknown,
    Illformed,
}

fn field(cursor: &Cursor) -> Field {
    match cursor.peek(1) {
        '{' => Field::LiteralBrace,
        '}' => Field::Implicit,
        d if d.is_ascii_digit() && cursor.peek(2) == '}' => Field::Explicit(d),
        't' if cursor.peek(2) == '}' => Field::Escape('\t'),
        'n' if cursor.peek(2) == '}' => Field::Escape('\n'),
        'r' if cursor.peek(2) == '}' => Field::Escape('\r'),
        c if c.is_alphabetic() => Field::Unknown,
        _ => Field::Illformed,
    }
}

fn point_span(cursor: &Cursor, file_id: FileId) -> Span {
    Span::with_file(cursor.position(), cursor.position(), cursor.line(), cursor.column(), file_id)
}

fn string_token(value: String, span: Span, excerpt: String) -> Token {
    Token::new(TokenKind::LiteralString, value, span, excerpt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lovela_util::FileId;

    fn scan_str(src: &str) -> (Vec<Token>, DiagnosticBag) {
        let mut cursor = Cursor::new(src);
        let mut bag = DiagnosticBag::new();
        let tokens = scan(&mut cursor, &mut bag, FileId::DUMMY);
        (tokens, bag)
    }

    #[test]
    fn plain_string() {
        let (tokens, bag) = scan_str("'abc'");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "abc");
        assert!(bag.is_empty());
    }

    #[test]
    fn doubled_quote_is_literal() {
        let (tokens, _) = scan_str("'it''s'");
        assert_eq!(tokens[0].value, "it's");
    }

    #[test]
    fn implicit_interpolation_splits_tokens() {
        let (tokens, bag) = scan_str("'abc{}def{}'");
        let values: Vec<_> = tokens.iter().map(|t| (t.kind, t.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                (TokenKind::LiteralString, "abc"),
                (TokenKind::LiteralStringInterpolation, "1"),
                (TokenKind::LiteralString, "def"),
                (TokenKind::LiteralStringInterpolation, "2"),
                (TokenKind::LiteralString, ""),
            ]
        );
        assert!(bag.is_empty());
    }

    #[test]
    fn unknown_field_reports_at_brace_and_keeps_text() {
        let (tokens, bag) = scan_str("'{m}'");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "m}");
        assert_eq!(bag.len(), 1);
        let diag = bag.iter().next().unwrap();
        assert_eq!(diag.span.column, 2);
    }

    #[test]
    fn unterminated_string_reports_and_emits_partial() {
        let (tokens, bag) = scan_str("'abc");
        assert_eq!(tokens[0].value, "abc");
        assert!(bag.has_errors());
    }
}
