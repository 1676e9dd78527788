use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};
use tracing::trace;

/// Single line text input with a character based cursor.
#[derive(Default, Debug, Clone)]
pub struct Inputter {
    current_input: String,
    cursor: usize,
}

impl Inputter {
    pub fn read(&mut self, key: event::KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, KeyModifiers::NONE) => self.left(),
            (KeyCode::Right, KeyModifiers::NONE) => self.right(),
            (KeyCode::Home, _) => self.cursor = 0,
            (KeyCode::End, _) => self.cursor = self.len(),
            (kc, km) => self.key(kc, km),
        }
        trace!("Input: {:?} cursor {}", self.current_input, self.cursor);
    }

    pub fn set(&mut self, s: &str) {
        self.current_input = s.to_string();
        self.cursor = self.len();
    }

    pub fn value(&self) -> &str {
        &self.current_input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.current_input.clear();
        self.cursor = 0;
    }

    fn len(&self) -> usize {
        self.current_input.chars().count()
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let pos = self.byte_pos();
            self.current_input.remove(pos);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.len() {
            let pos = self.byte_pos();
            self.current_input.remove(pos);
        }
    }

    fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    fn key(&mut self, code: KeyCode, modifier: KeyModifiers) {
        if modifier.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return;
        }
        if let Some(chr) = code.as_char() {
            let pos = self.byte_pos();
            self.current_input.insert(pos, chr);
            self.cursor += 1;
        }
    }

    fn byte_pos(&self) -> usize {
        self.current_input
            .char_indices()
            .nth(self.cursor)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.current_input.len())
    }
}
