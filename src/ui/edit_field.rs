use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Single-line correction editor. The cursor is a char index (0 = before
/// the first char); all edits keep it on a char boundary.
pub struct EditField {
    text: String,
    cursor: usize,
}

impl EditField {
    pub fn new(text: &str) -> Self {
        let cursor = text.chars().count();
        Self {
            text: text.to_string(),
            cursor,
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the contents (e.g. when a machine translation is accepted)
    /// and put the cursor at the end.
    pub fn set_value(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled
    /// rendering. When the cursor is at the end of text, cursor_char is
    /// None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        if self.cursor >= self.text.chars().count() {
            (&self.text, None, "")
        } else {
            let ch = self.text[byte_offset..].chars().next().unwrap();
            let next_byte = byte_offset + ch.len_utf8();
            (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,

            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            KeyCode::Right => {
                let len = self.text.chars().count();
                if self.cursor < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => {
                self.cursor = 0;
            }
            KeyCode::End => {
                self.cursor = self.text.chars().count();
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let byte_offset = self.char_to_byte(self.cursor - 1);
                    let ch = self.text[byte_offset..].chars().next().unwrap();
                    self.text
                        .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                let len = self.text.chars().count();
                if self.cursor < len {
                    let byte_offset = self.char_to_byte(self.cursor);
                    let ch = self.text[byte_offset..].chars().next().unwrap();
                    self.text
                        .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let byte_offset = self.char_to_byte(self.cursor);
                self.text.replace_range(..byte_offset, "");
                self.cursor = 0;
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let byte_offset = self.char_to_byte(self.cursor);
                self.text.insert(byte_offset, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_insert_at_end() {
        let mut field = EditField::new("ab");
        field.handle(key(KeyCode::Char('c')));
        assert_eq!(field.value(), "abc");
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn test_insert_mid_string_multibyte() {
        let mut field = EditField::new("été");
        field.handle(key(KeyCode::Left));
        field.handle(key(KeyCode::Char('x')));
        assert_eq!(field.value(), "étxé");
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn test_backspace_removes_char_before_cursor() {
        let mut field = EditField::new("chat");
        field.handle(key(KeyCode::Backspace));
        assert_eq!(field.value(), "cha");
        field.handle(key(KeyCode::Home));
        field.handle(key(KeyCode::Backspace));
        assert_eq!(field.value(), "cha");
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut field = EditField::new("chat");
        field.handle(key(KeyCode::Home));
        field.handle(key(KeyCode::Delete));
        assert_eq!(field.value(), "hat");
    }

    #[test]
    fn test_ctrl_u_clears_to_start() {
        let mut field = EditField::new("le chat");
        field.handle(key(KeyCode::Left));
        field.handle(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(field.value(), "t");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn test_render_parts_cursor_mid_string() {
        let mut field = EditField::new("abc");
        field.handle(key(KeyCode::Left));
        let (before, at, after) = field.render_parts();
        assert_eq!(before, "ab");
        assert_eq!(at, Some('c'));
        assert_eq!(after, "");
    }

    #[test]
    fn test_submit_and_cancel() {
        let mut field = EditField::new("");
        assert_eq!(field.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(field.handle(key(KeyCode::Esc)), InputResult::Cancel);
    }
}
