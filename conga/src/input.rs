// input.rs - Key codes and non-blocking input sources

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::signal::SignalFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

/// Something the scheduler can ask for at most one pending key without
/// blocking.
pub trait InputSource {
    fn poll_key(&mut self) -> Option<Key>;
}

/// Keys handed over by the caller, returned in push order.
#[derive(Debug, Default)]
pub struct QueuedInput {
    keys: VecDeque<Key>,
}

impl QueuedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: Key) {
        self.keys.push_back(key);
    }

    pub fn pending(&self) -> usize {
        self.keys.len()
    }
}

impl FromIterator<Key> for QueuedInput {
    fn from_iter<T: IntoIterator<Item = Key>>(iter: T) -> Self {
        Self { keys: iter.into_iter().collect() }
    }
}

impl InputSource for QueuedInput {
    fn poll_key(&mut self) -> Option<Key> {
        self.keys.pop_front()
    }
}

/// Reads the controlling terminal through crossterm.
///
/// Raw mode swallows SIGINT, so Ctrl-C is turned back into a quit request.
/// Terminal resize events raise the resize flag as SIGWINCH would.
pub struct TerminalInput {
    signals: Arc<SignalFlags>,
}

impl TerminalInput {
    pub fn new(signals: Arc<SignalFlags>) -> Self {
        Self { signals }
    }

    fn translate(&self, key: KeyEvent) -> Option<Key> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        let key = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.signals.request_quit();
                return None;
            }
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Esc,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Tab => Key::Tab,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Delete => Key::Delete,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => return None,
        };
        Some(key)
    }
}

impl InputSource for TerminalInput {
    fn poll_key(&mut self) -> Option<Key> {
        match event::poll(Duration::ZERO) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                log::warn!("terminal poll failed: {e}");
                return None;
            }
        }

        match event::read() {
            Ok(TermEvent::Key(key)) => self.translate(key),
            Ok(TermEvent::Resize(cols, rows)) => {
                log::debug!("terminal resized to {cols}x{rows}");
                self.signals.request_resize();
                None
            }
            Ok(_) => None,
            Err(e) => {
                log::warn!("terminal read failed: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_input_is_fifo() {
        let mut input: QueuedInput = [Key::Char('a'), Key::Up].into_iter().collect();
        input.push(Key::Enter);
        assert_eq!(input.pending(), 3);
        assert_eq!(input.poll_key(), Some(Key::Char('a')));
        assert_eq!(input.poll_key(), Some(Key::Up));
        assert_eq!(input.poll_key(), Some(Key::Enter));
        assert_eq!(input.poll_key(), None);
    }

    #[test]
    fn terminal_keys_translate() {
        let signals = SignalFlags::new();
        let input = TerminalInput::new(Arc::clone(&signals));

        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(input.translate(press(KeyCode::Char('q'))), Some(Key::Char('q')));
        assert_eq!(input.translate(press(KeyCode::Left)), Some(Key::Left));
        assert_eq!(input.translate(press(KeyCode::F(5))), Some(Key::F(5)));
        assert_eq!(input.translate(press(KeyCode::Insert)), None);
        assert!(!signals.quit_requested());
    }

    #[test]
    fn ctrl_c_requests_quit() {
        let signals = SignalFlags::new();
        let input = TerminalInput::new(Arc::clone(&signals));
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.translate(key), None);
        assert!(signals.quit_requested());
    }
}
