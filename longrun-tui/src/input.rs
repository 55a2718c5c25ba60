/// One editing keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
    Clear,
    Insert(char),
}

/// Single-line edit buffer. `cursor` is a byte offset that always sits on a char boundary.
#[derive(Debug, Default, Clone)]
pub struct InputLine {
    text: String,
    cursor: usize,
}

impl InputLine {
    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the contents and park the cursor at the end.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn left(&mut self) {
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    pub fn right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn insert(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) -> bool {
        let Some((prev, _)) = self.text[..self.cursor].char_indices().next_back() else {
            return false;
        };
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    /// Apply `edit`; returns whether the text changed.
    pub fn apply(&mut self, edit: Edit) -> bool {
        match edit {
            Edit::Left => self.left(),
            Edit::Right => self.right(),
            Edit::Home => self.home(),
            Edit::End => self.end(),
            Edit::Backspace => return self.backspace(),
            Edit::Delete => return self.delete(),
            Edit::Clear => {
                let had_text = !self.text.is_empty();
                self.clear();
                return had_text;
            }
            Edit::Insert(ch) => {
                self.insert(ch);
                return true;
            }
        }
        false
    }

    pub fn delete(&mut self) -> bool {
        let Some(ch) = self.text[self.cursor..].chars().next() else {
            return false;
        };
        let end = self.cursor + ch.len_utf8();
        self.text.drain(self.cursor..end);
        true
    }
}
