use std::time::Duration;
use tracing::trace;

use crate::domain::{HelipeConfig, HelipeError, Message};
use crate::model::Model;
use crate::navigation::Screen;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &HelipeConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_ms,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, HelipeError> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
            && key.kind == event::KeyEventKind::Press
        {
            return Ok(Self::handle_key(key, model.raw_keyevents()));
        }
        Ok(None)
    }

    fn handle_key(key: KeyEvent, raw: bool) -> Option<Message> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Message::Quit);
        }
        if raw {
            return Some(Message::RawKey(key));
        }

        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char(c @ '1'..='5') => Screen::ALL
                .get(c as usize - '1' as usize)
                .map(|&screen| Message::Navigate(screen)),
            KeyCode::Char('b') => Some(Message::Back),
            KeyCode::Tab => Some(Message::FocusNext),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::MoveUp),
            KeyCode::PageDown => Some(Message::MovePageDown),
            KeyCode::PageUp => Some(Message::MovePageUp),
            KeyCode::Enter => Some(Message::Enter),
            KeyCode::Esc => Some(Message::Exit),
            KeyCode::Char('r') => Some(Message::Refresh),
            KeyCode::Char('c') => Some(Message::NextSection),
            KeyCode::Char('y') => Some(Message::CopyRow),
            KeyCode::Char('?') => Some(Message::Help),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
