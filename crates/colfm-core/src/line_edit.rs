//! The line editor shared by search, select and every prompt.

use std::io;

use crate::browser::Browser;
use crate::console::Console;
use crate::key::Key;

/// What an editing session should do after a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Accept,
    Cancel,
}

/// One key as seen by a session handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub key: Key,
    /// The editor's own verdict for this key.
    pub signal: Flow,
    /// Whether the buffer text changed.
    pub changed: bool,
}

/// The text being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
}

impl LineBuffer {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: initial.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// Apply the standard editing keys.
    pub fn feed(&mut self, key: Key) -> Keystroke {
        let before = self.text.len();
        let mut changed = false;
        let signal = match key {
            Key::Char(c) if !c.is_control() => {
                self.text.push(c);
                changed = true;
                Flow::Continue
            }
            Key::Backspace | Key::Delete => {
                if self.text.pop().is_some() {
                    changed = true;
                    Flow::Continue
                } else {
                    Flow::Cancel
                }
            }
            Key::Esc | Key::Ctrl('c') | Key::Ctrl('g') => Flow::Cancel,
            Key::Ctrl('w') => {
                erase_word(&mut self.text);
                changed = self.text.len() != before;
                Flow::Continue
            }
            Key::Ctrl('u') => {
                changed = !self.text.is_empty();
                self.text.clear();
                Flow::Continue
            }
            Key::Enter => Flow::Accept,
            _ => Flow::Continue,
        };
        Keystroke {
            key,
            signal,
            changed,
        }
    }
}

/// Drop trailing whitespace, then the word before it.
pub fn erase_word(text: &mut String) {
    let trimmed = text.trim_end().len();
    text.truncate(trimmed);
    let cut = text
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    text.truncate(cut);
}

/// Run an editing session until the handler accepts or cancels.
///
/// Each round redraws the screen with `prompt` and the buffer on the status
/// line, blocks for a key, applies it to the buffer and hands it to
/// `handler`. Returns the final verdict and the buffer text.
pub fn run<H>(
    browser: &mut Browser,
    console: &mut dyn Console,
    prompt: &str,
    mut buffer: LineBuffer,
    mut handler: H,
) -> io::Result<(Flow, String)>
where
    H: FnMut(&mut Browser, &mut LineBuffer, Keystroke) -> Flow,
{
    loop {
        let status = format!("{prompt}{}", buffer.text());
        console.draw(browser, Some(&status))?;
        let key = console.read_key()?;
        let stroke = buffer.feed(key);
        match handler(browser, &mut buffer, stroke) {
            Flow::Continue => {}
            flow => return Ok((flow, buffer.text)),
        }
    }
}
