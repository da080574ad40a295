/// A single editing step applied to a text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Replace(String),
}

impl FieldEdit {
    /// Whether the edit can change the text, as opposed to only moving the cursor.
    pub fn changes_text(&self) -> bool {
        matches!(
            self,
            FieldEdit::Insert(_) | FieldEdit::Backspace | FieldEdit::Delete | FieldEdit::Replace(_)
        )
    }
}

/// Single-line editable text with a byte cursor and an optional select-all state.
///
/// A seeded field starts fully selected: the first inserted character or
/// deletion replaces the whole value, any cursor move drops the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
    selected_all: bool,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the field with `value`, cursor at the end and everything selected.
    pub fn seeded<T: Into<String>>(value: T) -> Self {
        let text = value.into();
        let cursor = text.len();
        Self {
            selected_all: !text.is_empty(),
            text,
            cursor,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Cursor position counted in characters, for rendering.
    pub fn cursor_column(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    pub fn is_selected_all(&self) -> bool {
        self.selected_all
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.selected_all = false;
    }

    pub fn set<T: Into<String>>(&mut self, value: T) {
        self.text = value.into();
        self.cursor = self.text.len();
        self.selected_all = false;
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Insert(ch) => self.insert_char(ch),
            FieldEdit::Backspace => self.backspace(),
            FieldEdit::Delete => self.delete_char(),
            FieldEdit::Left => self.move_left(),
            FieldEdit::Right => self.move_right(),
            FieldEdit::Home => self.move_home(),
            FieldEdit::End => self.move_end(),
            FieldEdit::Replace(value) => self.set(value),
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        // Single-line field: line breaks never make it into the value.
        if ch == '\r' || ch == '\n' {
            return;
        }
        if self.take_selection() {
            self.clear();
        }
        let mut buf = [0u8; 4];
        let encoded = ch.encode_utf8(&mut buf);
        self.text.insert_str(self.cursor, encoded);
        self.cursor += encoded.len();
    }

    pub fn backspace(&mut self) {
        if self.take_selection() {
            self.clear();
            return;
        }
        if self.cursor == 0 {
            return;
        }
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.text.drain(idx..self.cursor);
            self.cursor = idx;
        }
    }

    pub fn delete_char(&mut self) {
        if self.take_selection() {
            self.clear();
            return;
        }
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            let end = self.cursor + ch.len_utf8();
            self.text.drain(self.cursor..end);
        }
    }

    pub fn move_left(&mut self) {
        self.selected_all = false;
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    pub fn move_right(&mut self) {
        self.selected_all = false;
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.selected_all = false;
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.selected_all = false;
        self.cursor = self.text.len();
    }

    fn take_selection(&mut self) -> bool {
        std::mem::take(&mut self.selected_all)
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
        assert_eq!(buffer.cursor_column(), 5);
        assert!(!buffer.is_selected_all());
    }

    #[test]
    fn seeded_value_is_replaced_by_first_keystroke() {
        let mut buffer = TextBuffer::seeded("old title");
        assert!(buffer.is_selected_all());

        buffer.insert_char('N');
        buffer.insert_char('e');

        assert_eq!(buffer.as_str(), "Ne");
        assert!(!buffer.is_selected_all());
    }

    #[test]
    fn moving_the_cursor_keeps_seeded_text() {
        let mut buffer = TextBuffer::seeded("groceries");
        buffer.apply(FieldEdit::End);
        buffer.apply(FieldEdit::Insert('!'));

        assert_eq!(buffer.as_str(), "groceries!");
    }

    #[test]
    fn backspace_and_delete_respect_multibyte_chars() {
        let mut buffer = TextBuffer::new();
        buffer.set("café au lait");
        buffer.move_home();
        for _ in 0..4 {
            buffer.move_right();
        }
        buffer.backspace();
        assert_eq!(buffer.as_str(), "caf au lait");

        buffer.delete_char();
        assert_eq!(buffer.as_str(), "cafau lait");
        assert_eq!(buffer.cursor_column(), 3);
    }

    #[test]
    fn newlines_are_ignored() {
        let mut buffer = TextBuffer::new();
        buffer.insert_char('a');
        buffer.insert_char('\n');
        buffer.insert_char('b');

        assert_eq!(buffer.as_str(), "ab");
    }
}
