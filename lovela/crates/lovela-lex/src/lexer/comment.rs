use lovela_util::diagnostic::{codes, DiagnosticBag, DiagnosticBuilder};
use lovela_util::span::FileId;

use crate::cursor::Cursor;

/// Scans a nestable `<< ... >>` comment. Call with the cursor positioned at
/// the first `<` of the opener; consumes through the matching closer (or to
/// end of input, reporting `CommentOpen`).
pub fn scan(cursor: &mut Cursor, diagnostics: &mut DiagnosticBag, file_id: FileId) {
    let open_line = cursor.line();
    let open_col = cursor.column();

    consume_run(cursor, '<');
    let mut depth = 1u32;

    while depth > 0 {
        if cursor.is_at_end() {
            DiagnosticBuilder::error("comment is not terminated")
                .code(codes::E_LEX_COMMENT_OPEN)
                .span(lovela_util::span::Span::with_file(
                    cursor.position(),
                    cursor.position(),
                    open_line,
                    open_col,
                    file_id,
                ))
                .emit(diagnostics);
            return;
        }

        if cursor.current() == '<' && cursor.peek(1) == '<' {
            consume_run(cursor, '<');
            depth += 1;
        } else if cursor.current() == '>' && cursor.peek(1) == '>' {
            consume_run(cursor, '>');
            depth -= 1;
        } else {
            cursor.advance();
        }
    }
}

fn consume_run(cursor: &mut Cursor, c: char) {
    while cursor.current() == c {
        cursor.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lovela_util::FileId;

    #[test]
    fn closes_simple_comment() {
        let mut cursor = Cursor::new("<< hi >>ident");
        let mut bag = DiagnosticBag::new();
        scan(&mut cursor, &mut bag, FileId::DUMMY);
        assert!(bag.is_empty());
        assert_eq!(cursor.current(), 'i');
    }

    #[test]
    fn nested_comments_balance() {
        let mut cursor = Cursor::new("<< nested << comment >> still open >>ident.");
        let mut bag = DiagnosticBag::new();
        scan(&mut cursor, &mut bag, FileId::DUMMY);
        assert!(bag.is_empty());
        assert_eq!(cursor.current(), 'i');
    }

    #[test]
    fn unterminated_comment_reports() {
        let mut cursor = Cursor::new("<< open forever");
        let mut bag = DiagnosticBag::new();
        scan(&mut cursor, &mut bag, FileId::DUMMY);
        assert!(bag.has_errors());
    }
}
