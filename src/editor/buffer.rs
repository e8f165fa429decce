use ropey::Rope;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, in chars.
    pub col: usize,
    /// Column to return to when moving vertically through shorter lines.
    sticky_col: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            sticky_col: col,
        }
    }

    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.sticky_col = col;
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The editing surface's text, backed by a rope.
///
/// This is the single owner of the Document Text. Every mutating call bumps
/// [`EditorBuffer::revision`].
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    revision: u64,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
            revision: 0,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Replace the whole text (file load, sample, clear). The cursor returns
    /// to the start.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = Cursor::default();
        self.revision += 1;
    }

    /// The full Document Text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of a line without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Length of a line in chars, excluding its line ending.
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.chars().count())
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.split_line();
            return;
        }
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, ch);
        self.cursor.set_col(self.cursor.col + 1);
        self.revision += 1;
    }

    /// Insert text at the cursor, leaving the cursor after it.
    pub fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n");
        if text.is_empty() {
            return;
        }
        let idx = self.cursor_char_idx();
        self.rope.insert(idx, &text);
        let end = idx + text.chars().count();
        self.cursor = self.cursor_at_char(end);
        self.revision += 1;
    }

    /// Break the line at the cursor (Enter).
    pub fn split_line(&mut self) {
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
        self.revision += 1;
    }

    /// Delete the char before the cursor (Backspace). Returns `true` if
    /// anything was removed.
    pub fn delete_back(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return false;
        }
        let mut start = idx - 1;
        if self.cursor.col == 0 && start > 0 && self.rope.char(start) == '\n' && self.rope.char(start - 1) == '\r' {
            start -= 1;
        }
        self.rope.remove(start..idx);
        self.cursor = self.cursor_at_char(start);
        self.revision += 1;
        true
    }

    /// Delete the char under the cursor (Delete). Returns `true` if anything
    /// was removed.
    pub fn delete_forward(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx >= self.rope.len_chars() {
            return false;
        }
        let mut end = idx + 1;
        if self.rope.char(idx) == '\r' && end < self.rope.len_chars() && self.rope.char(end) == '\n' {
            end += 1;
        }
        self.rope.remove(idx..end);
        self.revision += 1;
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.cursor.col > 0 {
                    self.cursor.set_col(self.cursor.col - 1);
                } else if self.cursor.line > 0 {
                    self.cursor.line -= 1;
                    self.cursor.set_col(self.line_len(self.cursor.line));
                }
            }
            Direction::Right => {
                if self.cursor.col < self.line_len(self.cursor.line) {
                    self.cursor.set_col(self.cursor.col + 1);
                } else if self.cursor.line + 1 < self.line_count() {
                    self.cursor.line += 1;
                    self.cursor.set_col(0);
                }
            }
            Direction::Up if self.cursor.line > 0 => {
                self.cursor.line -= 1;
                self.cursor.col = self.cursor.sticky_col.min(self.line_len(self.cursor.line));
            }
            Direction::Down if self.cursor.line + 1 < self.line_count() => {
                self.cursor.line += 1;
                self.cursor.col = self.cursor.sticky_col.min(self.line_len(self.cursor.line));
            }
            Direction::Up | Direction::Down => {}
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    pub fn move_end(&mut self) {
        self.cursor.set_col(self.line_len(self.cursor.line));
    }

    pub const fn move_to_start(&mut self) {
        self.cursor = Cursor::at(0, 0);
    }

    pub fn move_to_end(&mut self) {
        let last = self.line_count().saturating_sub(1);
        self.cursor = Cursor::at(last, self.line_len(last));
    }

    fn cursor_char_idx(&self) -> usize {
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_char(line) + self.cursor.col.min(self.line_len(line))
    }

    fn cursor_at_char(&self, idx: usize) -> Cursor {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        Cursor::at(line, idx - self.rope.line_to_char(line))
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("rope", &format_args!("Rope({} lines)", self.rope.len_lines()))
            .field("cursor", &self.cursor)
            .field("revision", &self.revision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_insert_chars_builds_text() {
        let mut buf = EditorBuffer::empty();
        for ch in "# hi".chars() {
            buf.insert_char(ch);
        }
        assert_eq!(buf.text(), "# hi");
        assert_eq!(buf.cursor(), Cursor::at(0, 4));
        assert_eq!(buf.revision(), 4);
    }

    #[test]
    fn test_insert_multibyte_chars_tracks_char_columns() {
        let mut buf = EditorBuffer::empty();
        buf.insert_char('é');
        buf.insert_char('ß');
        buf.move_cursor(Direction::Left);
        buf.insert_char('x');
        assert_eq!(buf.text(), "éxß");
    }

    #[test]
    fn test_split_line_and_join_back() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_cursor(Direction::Right);
        buf.split_line();
        assert_eq!(buf.text(), "a\nb");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));

        assert!(buf.delete_back());
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = EditorBuffer::from_text("x");
        assert!(!buf.delete_back());
        assert_eq!(buf.revision(), 0);
    }

    #[test]
    fn test_delete_back_removes_crlf_pair() {
        let mut buf = EditorBuffer::from_text("a\r\nb");
        buf.move_cursor(Direction::Down);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "ab");
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_to_end();
        assert!(!buf.delete_forward());
        buf.move_home();
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "b");
    }

    #[test]
    fn test_insert_str_moves_cursor_past_text() {
        let mut buf = EditorBuffer::from_text("end");
        buf.insert_str("one\r\ntwo ");
        assert_eq!(buf.text(), "one\ntwo end");
        assert_eq!(buf.cursor(), Cursor::at(1, 4));
    }

    #[test]
    fn test_vertical_movement_keeps_sticky_column() {
        let mut buf = EditorBuffer::from_text("long line\nx\nanother line");
        buf.move_end();
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 1);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 9);
    }

    #[test]
    fn test_set_text_replaces_and_resets_cursor() {
        let mut buf = EditorBuffer::from_text("old");
        buf.move_to_end();
        buf.set_text("new\ntext");
        assert_eq!(buf.text(), "new\ntext");
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
        assert_eq!(buf.revision(), 1);
    }

    #[test]
    fn test_line_at_strips_line_endings() {
        let buf = EditorBuffer::from_text("a\r\nb\n");
        assert_eq!(buf.line_at(0).as_deref(), Some("a"));
        assert_eq!(buf.line_at(1).as_deref(), Some("b"));
        assert_eq!(buf.line_at(2).as_deref(), Some(""));
        assert_eq!(buf.line_at(3), None);
    }
}
