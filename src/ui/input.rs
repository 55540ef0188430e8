//! Single-line text editing for form fields.

use unicode_width::UnicodeWidthStr;

/// Text being edited plus a cursor, counted in chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    text: String,
    cursor: usize,
}

impl LineInput {
    /// Starts editing `text` with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }

    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index();
        self.text.insert(idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index();
        self.text.remove(idx);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let idx = self.byte_index();
            self.text.remove(idx);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Display column of the cursor.
    pub fn cursor_column(&self) -> u16 {
        let width = self.text[..self.byte_index()].width();
        u16::try_from(width).unwrap_or(u16::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_puts_cursor_at_end() {
        let input = LineInput::new("abc");
        assert_eq!(input.cursor_column(), 3);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = LineInput::new("ac");
        input.left();
        input.insert('b');

        assert_eq!(input.text(), "abc");
        assert_eq!(input.cursor_column(), 2);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = LineInput::new("abcd");
        input.backspace();
        assert_eq!(input.text(), "abc");

        input.home();
        input.delete();
        assert_eq!(input.text(), "bc");

        input.backspace();
        assert_eq!(input.text(), "bc");

        input.end();
        input.delete();
        assert_eq!(input.text(), "bc");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = LineInput::new("kartta_ä.map");
        input.home();
        for _ in 0..8 {
            input.right();
        }
        input.backspace();

        assert_eq!(input.text(), "kartta_.map");
    }

    #[test]
    fn test_wide_chars_cursor_column() {
        let mut input = LineInput::new("地図");
        assert_eq!(input.cursor_column(), 4);

        input.left();
        assert_eq!(input.cursor_column(), 2);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut input = LineInput::new("x");
        input.right();
        input.right();
        assert_eq!(input.cursor_column(), 1);

        input.left();
        input.left();
        assert_eq!(input.cursor_column(), 0);
    }
}
