use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

use crate::machine::NUM_KEYS;

/// physical keyboard chars to hex pad indexes, using the left-hand side of
/// a qwerty keyboard: 123C/456D/789E/A0BF laid over 1234/qwer/asdf/zxcv
const CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// Supplies the per-frame key vector. The whole vector is rebuilt every
/// frame; the machine never sees individual key events.
pub trait Input {
    /// the current state of the 16 hex keys, one entry per key index
    fn read_keys(&mut self) -> Result<[bool; NUM_KEYS], io::Error>;

    /// whether the user asked to leave the emulator
    fn quit_requested(&self) -> bool;
}

/// keyboard input over crossterm's event queue.
///
/// terminals report presses, not holds, so a key counts as down for the
/// frame its press event arrives in and up again the frame after. good
/// enough for EX9E/EXA1 polling and exactly right for FX0A.
pub struct CrosstermInput {
    keymap: HashMap<char, u8>,
    quit: bool,
}

impl CrosstermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(CrosstermInput {
            keymap: HashMap::from(CONVENTIONAL_KEYMAP),
            quit: false,
        })
    }
}

impl Drop for CrosstermInput {
    fn drop(&mut self) {
        // put the terminal back even if the main loop bailed with an error
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for CrosstermInput {
    fn read_keys(&mut self) -> Result<[bool; NUM_KEYS], io::Error> {
        let mut keys = [false; NUM_KEYS];
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                match evt.code {
                    KeyCode::Char(key) => {
                        if let Some(&mapped) = self.keymap.get(&key) {
                            keys[mapped as usize] = true;
                        }
                    }
                    KeyCode::Esc => self.quit = true,
                    _ => {}
                }
            }
        }
        Ok(keys)
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing: replays a script of key
/// vectors, then reports all-up forever
pub struct DummyInput {
    frames: Vec<[bool; NUM_KEYS]>,
}

impl DummyInput {
    pub fn new(frames: &[[bool; NUM_KEYS]]) -> Self {
        let mut frames = frames.to_vec();
        frames.reverse();
        DummyInput { frames }
    }
}

impl Input for DummyInput {
    fn read_keys(&mut self) -> Result<[bool; NUM_KEYS], io::Error> {
        Ok(self.frames.pop().unwrap_or([false; NUM_KEYS]))
    }

    fn quit_requested(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_the_pad_exactly_once() {
        let mut seen = [false; NUM_KEYS];
        for (_, idx) in CONVENTIONAL_KEYMAP {
            assert!(!seen[idx as usize]);
            seen[idx as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_dummy_replays_then_goes_quiet() {
        let mut pressed = [false; NUM_KEYS];
        pressed[0x7] = true;
        let mut input = DummyInput::new(&[pressed]);
        assert_eq!(input.read_keys().unwrap(), pressed);
        assert_eq!(input.read_keys().unwrap(), [false; NUM_KEYS]);
        assert!(!input.quit_requested());
    }
}
