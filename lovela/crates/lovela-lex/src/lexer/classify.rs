use crate::token::TokenKind;
use crate::unicode;

/// Classifies a flushed, trimmed lexeme buffer into a token kind. Patterns
/// are tried in the order listed in the word-break rules; the first match
/// wins. Returns `None` for a buffer nothing recognises (a syntax error).
pub fn classify(buffer: &str) -> Option<TokenKind> {
    if buffer.is_empty() {
        return None;
    }

    if buffer.chars().count() == 1 {
        if let Some(kind) = single_char_separator(buffer.chars().next().unwrap()) {
            return Some(kind);
        }
    }

    if buffer.chars().all(|c| c.is_ascii_digit()) {
        return Some(TokenKind::LiteralInteger);
    }

    if is_primitive_type(buffer) {
        return Some(TokenKind::PrimitiveType);
    }

    if buffer == "<-" || buffer == "->" {
        return Some(TokenKind::OperatorArrow);
    }

    if matches!(buffer, "<" | ">" | "<>" | "<=" | ">=" | "=") {
        return Some(TokenKind::OperatorComparison);
    }

    if buffer.chars().count() == 1 && matches!(buffer, "+" | "-" | "*" | "/") {
        return Some(TokenKind::OperatorArithmetic);
    }

    if matches!(buffer, "**" | "++" | "--") {
        return Some(TokenKind::OperatorBitwise);
    }

    if is_identifier(buffer) {
        return Some(TokenKind::Identifier);
    }

    None
}

/// The separator characters intercepted immediately by the main dispatch
/// loop; kept here too since `/` and `#` reach this classifier as
/// length-one buffers rather than being intercepted per-character.
fn single_char_separator(c: char) -> Option<TokenKind> {
    Some(match c {
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
        '/' => TokenKind::SeparatorSlash,
        ':' => TokenKind::SeparatorColon,
        '#' => TokenKind::SeparatorHash,
        _ => return None,
    })
}

/// Is this one of the twelve separator characters handled immediately,
/// i.e. never entering the lexeme buffer?
pub fn is_immediate_separator(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '[' | ']' | '{' | '}' | '.' | ',' | '!' | '?' | '|' | ':'
    )
}

/// `#([.+])?(1|8|16|32|64)(#*)`
fn is_primitive_type(buffer: &str) -> bool {
    let Some(rest) = buffer.strip_prefix('#') else {
        return false;
    };
    let rest = rest.strip_prefix(['.', '+']).unwrap_or(rest);
    let rest = rest
        .strip_prefix("64")
        .or_else(|| rest.strip_prefix("32"))
        .or_else(|| rest.strip_prefix("16"))
        .or_else(|| rest.strip_prefix('8'))
        .or_else(|| rest.strip_prefix('1'));
    match rest {
        Some(tail) => tail.chars().all(|c| c == '#'),
        None => false,
    }
}

fn is_identifier(buffer: &str) -> bool {
    let mut chars = buffer.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !unicode::is_identifier_start(first) {
        return false;
    }
    chars.all(|c| unicode::is_identifier_continue(c) || matches!(c, '<' | '>' | '=' | '+' | '-' | '*' | '/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_primitive_types() {
        assert!(is_primitive_type("#32"));
        assert!(is_primitive_type("#.64"));
        assert!(is_primitive_type("#8#"));
        assert!(is_primitive_type("#+8"));
        assert!(!is_primitive_type("#2"));
        assert!(!is_primitive_type("#"));
    }

    #[test]
    fn classifies_slash_and_hash_as_separators() {
        assert_eq!(classify("/"), Some(TokenKind::SeparatorSlash));
        assert_eq!(classify("#"), Some(TokenKind::SeparatorHash));
    }

    #[test]
    fn classifies_identifiers() {
        assert_eq!(classify("foo"), Some(TokenKind::Identifier));
        assert_eq!(classify("foo-bar"), Some(TokenKind::Identifier));
    }

    #[test]
    fn classifies_operators() {
        assert_eq!(classify("->"), Some(TokenKind::OperatorArrow));
        assert_eq!(classify("<="), Some(TokenKind::OperatorComparison));
        assert_eq!(classify("+"), Some(TokenKind::OperatorArithmetic));
        assert_eq!(classify("++"), Some(TokenKind::OperatorBitwise));
    }
}
