//! Translation of host-editor key events into the byte sequences a child
//! process expects on its input side. The mapping is pure with respect to
//! the key and an explicit snapshot of the two persistent modes that alter
//! it; [`crate::terminal::Terminal::encode_key`] is the stateful wrapper
//! that supplies those modes from its own fields and queues the result.

/// Modifier keys as bitflags, mirroring how the host editor's own input
/// layer represents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const CTRL: Self = Self(1);
    pub const ALT: Self = Self(2);
    pub const SHIFT: Self = Self(4);

    pub fn ctrl(self) -> bool {
        self.0 & Self::CTRL.0 != 0
    }

    pub fn alt(self) -> bool {
        self.0 & Self::ALT.0 != 0
    }

    pub fn shift(self) -> bool {
        self.0 & Self::SHIFT.0 != 0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A key on the numeric keypad, distinct from its main-keyboard twin
/// because application-keypad mode encodes it differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypadKey {
    Num(u8),
    Plus,
    Minus,
    Divide,
    Multiply,
    Enter,
    Point,
}

/// A symbolic key as the host editor's input layer would deliver it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Tab,
    Backspace,
    Delete,
    Insert,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Keypad(KeypadKey),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self { key, modifiers: Modifiers::NONE }
    }
}

/// Snapshot of the two persistent modes the encoder consults. Borrowed
/// from [`crate::terminal::Terminal`] at call time rather than cached, so a
/// mode flip made by the most recent `feed` is visible immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncoderModes {
    pub application_keypad_mode: bool,
    pub application_cursor_mode: bool,
}

/// Translate a key event into the bytes a child process expects, given the
/// current persistent modes. Ctrl/Alt handling is independent of both
/// modes; arrow keys, F1–F4, and the keypad depend on one mode each.
pub fn encode_key(event: KeyEvent, modes: EncoderModes) -> Vec<u8> {
    let mods = event.modifiers;

    if mods.ctrl() && !mods.alt() {
        if let Key::Char(c) = event.key {
            if let Some(b) = ctrl_byte(c) {
                return vec![b];
            }
        }
    }

    if mods.alt() && !mods.ctrl() {
        if let Key::Char(c) = event.key {
            let ch = if mods.shift() { c.to_ascii_uppercase() } else { c };
            let mut seq = vec![0x1b];
            let mut buf = [0u8; 4];
            seq.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            return seq;
        }
    }

    match event.key {
        Key::Char(c) => {
            let ch = if mods.shift() { c.to_ascii_uppercase() } else { c };
            let mut buf = [0u8; 4];
            ch.encode_utf8(&mut buf).as_bytes().to_vec()
        }
        Key::Enter => vec![0x0d],
        Key::Esc => vec![0x1b],
        Key::Tab => vec![0x09],
        Key::Backspace => vec![0x7f],
        Key::Null => vec![0x00],
        Key::Up => cursor_seq(b'A', modes.application_cursor_mode),
        Key::Down => cursor_seq(b'B', modes.application_cursor_mode),
        Key::Left => cursor_seq(b'D', modes.application_cursor_mode),
        Key::Right => cursor_seq(b'C', modes.application_cursor_mode),
        Key::Home => vec![0x1b, b'[', b'1', b'~'],
        Key::End => vec![0x1b, b'[', b'4', b'~'],
        Key::Insert => vec![0x1b, b'[', b'2', b'~'],
        Key::Delete => vec![0x1b, b'[', b'3', b'~'],
        Key::PageUp => vec![0x1b, b'[', b'5', b'~'],
        Key::PageDown => vec![0x1b, b'[', b'6', b'~'],
        Key::F(1) => vec![0x1b, b'O', b'P'],
        Key::F(2) => vec![0x1b, b'O', b'Q'],
        Key::F(3) => vec![0x1b, b'O', b'R'],
        Key::F(4) => vec![0x1b, b'O', b'S'],
        Key::F(n) => function_key_sequence(n),
        Key::Keypad(k) => keypad_sequence(k, modes.application_keypad_mode),
    }
}

fn ctrl_byte(c: char) -> Option<u8> {
    match c {
        'a'..='z' => Some(c as u8 - b'a' + 1),
        'A'..='Z' => Some(c as u8 - b'A' + 1),
        '@' => Some(0x00),
        '[' => Some(0x1b),
        '\\' => Some(0x1c),
        ']' => Some(0x1d),
        '^' => Some(0x1e),
        '_' => Some(0x1f),
        _ => None,
    }
}

fn cursor_seq(letter: u8, application_cursor_mode: bool) -> Vec<u8> {
    let lead = if application_cursor_mode { b'O' } else { b'[' };
    vec![0x1b, lead, letter]
}

fn function_key_sequence(n: u8) -> Vec<u8> {
    match n {
        5 => vec![0x1b, b'[', b'1', b'5', b'~'],
        6 => vec![0x1b, b'[', b'1', b'7', b'~'],
        7 => vec![0x1b, b'[', b'1', b'8', b'~'],
        8 => vec![0x1b, b'[', b'1', b'9', b'~'],
        9 => vec![0x1b, b'[', b'2', b'0', b'~'],
        10 => vec![0x1b, b'[', b'2', b'1', b'~'],
        11 => vec![0x1b, b'[', b'2', b'3', b'~'],
        12 => vec![0x1b, b'[', b'2', b'4', b'~'],
        _ => vec![],
    }
}

fn keypad_sequence(key: KeypadKey, application_keypad_mode: bool) -> Vec<u8> {
    if !application_keypad_mode {
        return match key {
            KeypadKey::Num(n) => vec![b'0' + n.min(9)],
            KeypadKey::Plus => vec![b'+'],
            KeypadKey::Minus => vec![b'-'],
            KeypadKey::Divide => vec![b'/'],
            KeypadKey::Multiply => vec![b'*'],
            KeypadKey::Point => vec![b'.'],
            KeypadKey::Enter => vec![0x0d],
        };
    }
    let letter = match key {
        KeypadKey::Num(0) => b'p',
        KeypadKey::Num(1) => b'q',
        KeypadKey::Num(2) => b'r',
        KeypadKey::Num(3) => b's',
        KeypadKey::Num(4) => b't',
        KeypadKey::Num(5) => b'u',
        KeypadKey::Num(6) => b'v',
        KeypadKey::Num(7) => b'w',
        KeypadKey::Num(8) => b'x',
        KeypadKey::Num(9) => b'y',
        KeypadKey::Num(_) => b'p',
        KeypadKey::Plus => b'k',
        KeypadKey::Minus => b'm',
        KeypadKey::Divide => b'o',
        KeypadKey::Multiply => b'j',
        KeypadKey::Point => b'n',
        KeypadKey::Enter => b'M',
    };
    vec![0x1b, b'O', letter]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modes(keypad: bool, cursor: bool) -> EncoderModes {
        EncoderModes { application_keypad_mode: keypad, application_cursor_mode: cursor }
    }

    #[test]
    fn encoder_plain_char() {
        let seq = encode_key(KeyEvent::plain(Key::Char('a')), modes(false, false));
        assert_eq!(seq, vec![0x61]);
    }

    #[test]
    fn encoder_up_default_mode() {
        let seq = encode_key(KeyEvent::plain(Key::Up), modes(false, false));
        assert_eq!(seq, vec![0x1b, b'[', b'A']);
    }

    #[test]
    fn encoder_up_application_cursor_mode() {
        let seq = encode_key(KeyEvent::plain(Key::Up), modes(false, true));
        assert_eq!(seq, vec![0x1b, b'O', b'A']);
    }

    #[test]
    fn encoder_f1_is_ss3_regardless_of_mode() {
        let seq = encode_key(KeyEvent::plain(Key::F(1)), modes(false, true));
        assert_eq!(seq, vec![0x1b, b'O', b'P']);
    }

    #[test]
    fn encoder_f5_is_fixed_tilde_sequence() {
        let seq = encode_key(KeyEvent::plain(Key::F(5)), modes(false, false));
        assert_eq!(seq, vec![0x1b, b'[', b'1', b'5', b'~']);
    }

    #[test]
    fn encoder_backspace_is_del_byte() {
        let seq = encode_key(KeyEvent::plain(Key::Backspace), modes(false, false));
        assert_eq!(seq, vec![0x7f]);
    }

    #[test]
    fn encoder_ctrl_c() {
        let seq = encode_key(
            KeyEvent::new(Key::Char('c'), Modifiers::CTRL),
            modes(false, false),
        );
        assert_eq!(seq, vec![0x03]);
    }

    #[test]
    fn encoder_ctrl_bracket_is_escape() {
        let seq = encode_key(
            KeyEvent::new(Key::Char('['), Modifiers::CTRL),
            modes(false, false),
        );
        assert_eq!(seq, vec![0x1b]);
    }

    #[test]
    fn encoder_alt_a_prefixes_escape() {
        let seq = encode_key(
            KeyEvent::new(Key::Char('a'), Modifiers::ALT),
            modes(false, false),
        );
        assert_eq!(seq, vec![0x1b, b'a']);
    }

    #[test]
    fn encoder_keypad_digit_literal_by_default() {
        let seq = encode_key(KeyEvent::plain(Key::Keypad(KeypadKey::Num(5))), modes(false, false));
        assert_eq!(seq, vec![b'5']);
    }

    #[test]
    fn encoder_keypad_digit_application_mode() {
        let seq = encode_key(KeyEvent::plain(Key::Keypad(KeypadKey::Num(5))), modes(true, false));
        assert_eq!(seq, vec![0x1b, b'O', b'u']);
    }

    #[test]
    fn encoder_keypad_enter_always_uppercase_m_in_app_mode() {
        let seq = encode_key(KeyEvent::plain(Key::Keypad(KeypadKey::Enter)), modes(true, false));
        assert_eq!(seq, vec![0x1b, b'O', b'M']);
    }

    #[test]
    fn encoder_keypad_enter_is_cr_by_default() {
        let seq = encode_key(KeyEvent::plain(Key::Keypad(KeypadKey::Enter)), modes(false, false));
        assert_eq!(seq, vec![0x0d]);
    }

    #[test]
    fn encoder_home_end_ins_del_pgup_pgdn() {
        assert_eq!(encode_key(KeyEvent::plain(Key::Home), modes(false, false)), vec![0x1b, b'[', b'1', b'~']);
        assert_eq!(encode_key(KeyEvent::plain(Key::End), modes(false, false)), vec![0x1b, b'[', b'4', b'~']);
        assert_eq!(encode_key(KeyEvent::plain(Key::Insert), modes(false, false)), vec![0x1b, b'[', b'2', b'~']);
        assert_eq!(encode_key(KeyEvent::plain(Key::Delete), modes(false, false)), vec![0x1b, b'[', b'3', b'~']);
        assert_eq!(encode_key(KeyEvent::plain(Key::PageUp), modes(false, false)), vec![0x1b, b'[', b'5', b'~']);
        assert_eq!(encode_key(KeyEvent::plain(Key::PageDown), modes(false, false)), vec![0x1b, b'[', b'6', b'~']);
    }
}
