use crate::cursor::Cursor;
use crate::token::TokenKind;

/// Result of scanning a numeric literal starting at the cursor.
pub struct NumberScan {
    pub lexeme: String,
    pub kind: TokenKind,
    /// Set when an exponent marker was opened but no digit followed it.
    pub illformed: bool,
}

/// Call only when `cursor` sits at a digit, or a sign immediately followed
/// by a digit. Consumes: an optional sign, a digit run, an optional `.`
/// digit run, and an optional `[eE][+-]?` digit run.
pub fn scan(cursor: &mut Cursor) -> NumberScan {
    let mut lexeme = String::new();
    let mut is_decimal = false;
    let mut illformed = false;

    if matches!(cursor.current(), '+' | '-') {
        lexeme.push(cursor.advance().unwrap());
    }

    while cursor.current().is_ascii_digit() {
        lexeme.push(cursor.advance().unwrap());
    }

    if cursor.current() == '.' && cursor.peek(1).is_ascii_digit() {
        is_decimal = true;
        lexeme.push(cursor.advance().unwrap());
        while cursor.current().is_ascii_digit() {
            lexeme.push(cursor.advance().unwrap());
        }
    }

    if matches!(cursor.current(), 'e' | 'E') {
        let save_sign = if matches!(cursor.peek(1), '+' | '-') {
            Some(cursor.peek(1))
        } else {
            None
        };
        let digits_start = if save_sign.is_some() { 2 } else { 1 };
        if cursor.peek(digits_start).is_ascii_digit() {
            is_decimal = true;
            lexeme.push(cursor.advance().unwrap());
            if save_sign.is_some() {
                lexeme.push(cursor.advance().unwrap());
            }
            while cursor.current().is_ascii_digit() {
                lexeme.push(cursor.advance().unwrap());
            }
        } else {
            lexeme.push(cursor.advance().unwrap());
            if save_sign.is_some() {
                lexeme.push(cursor.advance().unwrap());
            }
            illformed = true;
        }
    }

    NumberScan {
        lexeme,
        kind: if is_decimal {
            TokenKind::LiteralDecimal
        } else {
            TokenKind::LiteralInteger
        },
        illformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_plain_integer() {
        let mut cursor = Cursor::new("123.");
        let scan = scan(&mut cursor);
        assert_eq!(scan.lexeme, "123");
        assert_eq!(scan.kind, TokenKind::LiteralInteger);
        assert!(!scan.illformed);
    }

    #[test]
    fn scans_decimal() {
        let mut cursor = Cursor::new("3.14x");
        let scan = scan(&mut cursor);
        assert_eq!(scan.lexeme, "3.14");
        assert_eq!(scan.kind, TokenKind::LiteralDecimal);
    }

    #[test]
    fn scans_signed_integer() {
        let mut cursor = Cursor::new("-7.");
        let scan = scan(&mut cursor);
        assert_eq!(scan.lexeme, "-7");
    }

    #[test]
    fn scans_exponent() {
        let mut cursor = Cursor::new("1e10.");
        let scan = scan(&mut cursor);
        assert_eq!(scan.lexeme, "1e10");
        assert_eq!(scan.kind, TokenKind::LiteralDecimal);
    }

    #[test]
    fn flags_illformed_exponent() {
        let mut cursor = Cursor::new("1e.");
        let scan = scan(&mut cursor);
        assert!(scan.illformed);
    }
}
