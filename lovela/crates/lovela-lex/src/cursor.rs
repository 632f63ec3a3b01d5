use std::collections::VecDeque;

use lovela_util::span::FileId;

/// How many trailing source lines are kept around so a diagnostic can quote
/// nearby context, not just the single offending line.
const LINE_CACHE_DEPTH: usize = 8;

/// A three-character look-ahead window over decoded UTF-8 text. `\r\n` and
/// lone `\r` are normalised to `\n` as the window advances.
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    file_id: FileId,
    current_line: String,
    line_cache: VecDeque<String>,
}

impl Cursor {
    pub fn new(source: &str) -> Self {
        let normalized = normalize_newlines(source);
        Cursor {
            chars: normalized.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            file_id: FileId::DUMMY,
            current_line: String::new(),
            line_cache: VecDeque::with_capacity(LINE_CACHE_DEPTH),
        }
    }

    pub fn with_file(source: &str, file_id: FileId) -> Self {
        let mut cursor = Self::new(source);
        cursor.file_id = file_id;
        cursor
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    /// `offset` 0 is the current character, 1 and 2 look further ahead.
    /// Returns `'\0'` once the window runs past the end of input.
    pub fn peek(&self, offset: usize) -> char {
        self.chars.get(self.pos + offset).copied().unwrap_or('\0')
    }

    pub fn current(&self) -> char {
        self.peek(0)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Consumes and returns the current character, shifting the window.
    pub fn advance(&mut self) -> Option<char> {
        if self.is_at_end() {
            return None;
        }
        let c = self.chars[self.pos];
        self.pos += 1;
        if c == '\n' {
            self.line_cache.push_back(std::mem::take(&mut self.current_line));
            if self.line_cache.len() > LINE_CACHE_DEPTH {
                self.line_cache.pop_front();
            }
            self.line += 1;
            self.column = 1;
        } else {
            self.current_line.push(c);
            self.column += 1;
        }
        Some(c)
    }

    /// The accumulated text of the current line up to the cursor, trimmed to
    /// a reasonable display width.
    pub fn current_line_excerpt(&self) -> String {
        const MAX_WIDTH: usize = 120;
        if self.current_line.chars().count() > MAX_WIDTH {
            let truncated: String = self.current_line.chars().take(MAX_WIDTH).collect();
            format!("{truncated}…")
        } else {
            self.current_line.clone()
        }
    }

    pub fn cached_lines(&self) -> impl Iterator<Item = &str> {
        self.line_cache.iter().map(String::as_str)
    }
}

fn normalize_newlines(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peeks_without_consuming() {
        let cursor = Cursor::new("abc");
        assert_eq!(cursor.peek(0), 'a');
        assert_eq!(cursor.peek(1), 'b');
        assert_eq!(cursor.peek(2), 'c');
        assert_eq!(cursor.current(), 'a');
    }

    #[test]
    fn past_end_is_nul() {
        let mut cursor = Cursor::new("a");
        cursor.advance();
        assert_eq!(cursor.current(), '\0');
        assert_eq!(cursor.peek(5), '\0');
    }

    #[test]
    fn crlf_normalizes_to_lf() {
        let mut cursor = Cursor::new("a\r\nb");
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.advance(), Some('\n'));
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.advance(), Some('b'));
    }

    #[test]
    fn lone_cr_normalizes_to_lf() {
        let mut cursor = Cursor::new("a\rb");
        cursor.advance();
        assert_eq!(cursor.advance(), Some('\n'));
    }

    #[test]
    fn tracks_line_and_column() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.advance();
        assert_eq!(cursor.column(), 2);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.column(), 1);
    }
}
