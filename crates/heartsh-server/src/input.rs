//! Key decoding for raw SSH channel bytes.
//!
//! The client's PTY sends what a terminal would: printable UTF-8, C0
//! control bytes for `ctrl+<letter>`, and CSI / SS3 escape sequences for
//! arrows and editing keys. [`KeyDecoder`] runs those bytes through a `vte`
//! state machine and turns them into [`KeyInput`]s. The parser state is kept
//! between calls, so a sequence split across two packets still decodes.

use std::mem;

use heartsh_app::KeyInput;
use vte::{Params, Parser, Perform};

const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;

/// Stateful decoder from terminal input bytes to keys.
pub struct KeyDecoder {
    parser: Parser,
    keys: Keys,
}

impl KeyDecoder {
    /// Create a decoder in the ground state.
    pub fn new() -> Self {
        Self { parser: Parser::new(), keys: Keys::default() }
    }

    /// Decode one chunk of channel data.
    ///
    /// A chunk consisting of a lone `ESC` is the escape key: terminals send
    /// escape sequences in one write, so nothing else will follow it.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<KeyInput> {
        if bytes == [ESC] {
            self.parser = Parser::new();
            self.keys.ss3 = false;
            return vec![KeyInput::Esc];
        }

        for &byte in bytes {
            if byte == DEL {
                self.keys.pending.push(KeyInput::Backspace);
                continue;
            }
            self.parser.advance(&mut self.keys, byte);
        }

        mem::take(&mut self.keys.pending)
    }
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct Keys {
    pending: Vec<KeyInput>,
    /// Set after `ESC O`; the next printable is the SS3 final byte.
    ss3: bool,
}

impl Keys {
    fn cursor_key(c: char) -> Option<KeyInput> {
        match c {
            'A' => Some(KeyInput::Up),
            'B' => Some(KeyInput::Down),
            'C' => Some(KeyInput::Right),
            'D' => Some(KeyInput::Left),
            'H' => Some(KeyInput::Home),
            'F' => Some(KeyInput::End),
            _ => None,
        }
    }

    fn tilde_key(code: u16) -> Option<KeyInput> {
        match code {
            1 | 7 => Some(KeyInput::Home),
            3 => Some(KeyInput::Delete),
            4 | 8 => Some(KeyInput::End),
            5 => Some(KeyInput::PageUp),
            6 => Some(KeyInput::PageDown),
            _ => None,
        }
    }
}

impl Perform for Keys {
    fn print(&mut self, c: char) {
        if mem::take(&mut self.ss3) {
            self.pending.extend(Self::cursor_key(c));
            return;
        }
        self.pending.push(KeyInput::Char(c));
    }

    fn execute(&mut self, byte: u8) {
        let key = match byte {
            b'\t' => KeyInput::Tab,
            b'\r' | b'\n' => KeyInput::Enter,
            0x08 => KeyInput::Backspace,
            0x01..=0x1a => KeyInput::Ctrl(char::from(b'a' + byte - 1)),
            _ => return,
        };
        self.pending.push(key);
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        if ignore || !intermediates.is_empty() {
            return;
        }

        let key = match action {
            'Z' => Some(KeyInput::BackTab),
            '~' => params.iter().next().and_then(|p| p.first().copied()).and_then(Self::tilde_key),
            other => Self::cursor_key(other),
        };
        self.pending.extend(key);
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        if intermediates.is_empty() && byte == b'O' {
            self.ss3 = true;
        }
    }
}
