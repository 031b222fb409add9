//! Reusable UTF-8 safe text input state with cursor management.
//!
//! Backs the path field of the file picker.

use unicode_width::UnicodeWidthChar;

#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    // ----- Getters -----
    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn is_empty(&self) -> bool {
        self.input.trim().is_empty()
    }

    /// Display width of the text before the cursor, in terminal columns.
    pub fn cursor_columns(&self) -> usize {
        self.input[..self.cursor].chars().map(|c| c.width().unwrap_or(0)).sum()
    }

    /// Byte index of the character boundary closest to a clicked column.
    pub fn cursor_index_for_column(&self, column: u16) -> usize {
        let target = column as usize;
        let mut columns = 0;
        for (index, c) in self.input.char_indices() {
            let width = c.width().unwrap_or(0);
            if columns + width > target {
                return index;
            }
            columns += width;
        }
        self.input.len()
    }

    // ----- Setters -----
    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.input.len());
        while !self.input.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    // ----- Editing primitives (UTF-8 safe) -----

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().next_back() {
            let start = self.cursor - prev.len_utf8();
            self.input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.input.drain(self.cursor..self.cursor + next.len_utf8());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInputState {
        let mut st = TextInputState::default();
        text.chars().for_each(|c| st.insert_char(c));
        st
    }

    #[test]
    fn utf8_move_insert_backspace() {
        let mut st = typed("h🙂llo"); // emoji is 4 bytes
        st.set_cursor(1); // between h and 🙂
        st.insert_char('e');
        assert_eq!(st.input(), "he🙂llo");
        st.move_right(); // step over 🙂
        st.backspace(); // delete 🙂
        assert_eq!(st.input(), "hello");
        st.move_left();
        st.backspace();
        assert_eq!(st.input(), "ello");
    }

    #[test]
    fn delete_removes_char_under_cursor() {
        let mut st = typed("/tmp/a.txt");
        st.set_cursor(0);
        st.delete();
        assert_eq!(st.input(), "tmp/a.txt");
        st.set_cursor(st.input().len());
        st.delete();
        assert_eq!(st.input(), "tmp/a.txt");
    }

    #[test]
    fn columns_account_for_wide_chars() {
        let st = typed("a🙂b");
        assert_eq!(st.cursor_columns(), 4);
        assert_eq!(st.cursor_index_for_column(0), 0);
        assert_eq!(st.cursor_index_for_column(2), 1);
        assert_eq!(st.cursor_index_for_column(3), 5);
        assert_eq!(st.cursor_index_for_column(40), st.input().len());
    }
}
