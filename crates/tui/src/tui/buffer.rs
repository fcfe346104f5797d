/// Single-line editable text with a byte-indexed cursor kept on char boundaries.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Replace the contents, dropping control characters like `insert_char` does.
    pub fn set<T: Into<String>>(&mut self, value: T) {
        let mut text = value.into();
        text.retain(|ch| !ch.is_control());
        self.text = text;
        self.cursor = self.text.len();
    }

    /// Control characters (newlines, tabs, escapes) are never inserted.
    pub fn insert_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.text.drain(idx..self.cursor);
            self.cursor = idx;
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.text.drain(self.cursor..self.cursor + ch.len_utf8());
        }
    }

    pub fn move_left(&mut self) {
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Cursor position in chars, for placing the terminal cursor.
    pub fn cursor_col(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_places_cursor_at_end() {
        let mut buffer = TextBuffer::new();
        buffer.set("hello");

        assert_eq!(buffer.as_str(), "hello");
        assert_eq!(buffer.cursor_col(), 5);
    }

    #[test]
    fn edits_respect_multibyte_chars() {
        let mut buffer = TextBuffer::new();
        buffer.set("café");
        buffer.move_left();
        buffer.insert_char('!');
        assert_eq!(buffer.as_str(), "caf!é");

        buffer.move_end();
        buffer.backspace();
        assert_eq!(buffer.as_str(), "caf!");

        buffer.move_home();
        buffer.delete_char();
        assert_eq!(buffer.as_str(), "af!");
        assert_eq!(buffer.cursor_col(), 0);
    }

    #[test]
    fn control_chars_are_dropped() {
        let mut buffer = TextBuffer::new();
        buffer.insert_char('a');
        buffer.insert_char('\n');
        buffer.insert_char('\u{1b}');
        buffer.insert_char('b');
        assert_eq!(buffer.as_str(), "ab");
        assert_eq!(buffer.char_count(), 2);
    }

    #[test]
    fn set_strips_control_chars() {
        let mut buffer = TextBuffer::new();
        buffer.set("evil\u{1b}]0;title\u{7}x");
        assert_eq!(buffer.as_str(), "evil]0;titlex");
        assert_eq!(buffer.cursor_col(), 13);
    }

    #[test]
    fn edges_are_no_ops() {
        let mut buffer = TextBuffer::new();
        buffer.backspace();
        buffer.delete_char();
        buffer.move_left();
        buffer.move_right();
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor_col(), 0);
    }
}
