//! The input decoder: a byte-level state machine that recognizes C0
//! control bytes, ESC-introduced sequences, CSI sequences with numeric
//! parameters, and OSC title sequences, driving the [`crate::grid::Grid`]
//! it owns. This is the largest piece of the core; everything else
//! ([`crate::config`], [`crate::encoder`], [`crate::error`]) exists to
//! support what happens here.

use std::io;

use crate::config::TerminalConfig;
use crate::encoder::{self, EncoderModes, KeyEvent};
use crate::error::{VtError, VtResult};
use crate::grid::{Cell, CharsetTag, Color, Grid, Rendition};

/// Escape/CSI/OSC accumulation is discarded once a single sequence grows
/// past this many bytes (including the leading ESC), matching the ≥50-byte
/// `esc_buf` the distilled spec requires headroom for.
const ESC_BUF_CAPACITY: usize = 64;

/// `out_buf` capacity in bytes; encoded key bytes beyond this are dropped
/// with a warning rather than growing the queue without bound.
const OUT_BUF_CAPACITY: usize = 4096;

/// OSC window-title payloads are truncated to this many bytes.
const MAX_TITLE_LEN: usize = 49;

const MAX_CSI_PARAMS: usize = 20;

/// Advisory events a host may want to react to; never required for
/// correctness of the grid itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// BEL received outside of an OSC sequence.
    Bell,
    /// The window title changed via an OSC `0`/`1`/`2` sequence.
    TitleChanged(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    Normal,
    Escape,
    Csi,
    Osc,
    CharsetDesignate(CharsetSlot),
    Hash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharsetSlot {
    G0,
    G1,
}

#[derive(Debug, Clone, Default)]
struct CsiAccum {
    params: Vec<u16>,
    current: Option<u32>,
    private: bool,
    seen_any: bool,
}

impl CsiAccum {
    fn push_digit(&mut self, d: u8) {
        self.seen_any = true;
        let v = self.current.unwrap_or(0) as u64 * 10 + d as u64;
        self.current = Some(v.min(u16::MAX as u64) as u32);
    }

    fn push_separator(&mut self) {
        self.seen_any = true;
        if self.params.len() < MAX_CSI_PARAMS {
            self.params.push(self.current.unwrap_or(0).min(u16::MAX as u32) as u16);
        }
        self.current = None;
    }

    fn mark_private(&mut self) {
        self.seen_any = true;
        self.private = true;
    }

    /// Consume the accumulator into the final parameter list. An entirely
    /// empty CSI (`argc == 0`, e.g. bare `ESC [ A`) yields an empty slice;
    /// every caller must default via `.get(idx)`, never index directly,
    /// so there is nothing analogous to the source's `argv[0]` read on an
    /// empty argument list.
    fn finish(&mut self) -> Vec<u16> {
        if self.seen_any && self.params.len() < MAX_CSI_PARAMS {
            self.params.push(self.current.unwrap_or(0).min(u16::MAX as u32) as u16);
        }
        std::mem::take(&mut self.params)
    }
}

#[derive(Debug, Clone, Default)]
struct OscAccum {
    command: Vec<u8>,
    seen_semicolon: bool,
    text: Vec<u8>,
}

/// The DECSC/DECRC register: everything `ESC 7` saves and `ESC 8` restores.
#[derive(Debug, Clone, Copy)]
struct SavedRegister {
    cursor_x: u16,
    cursor_y: u16,
    rendition: Rendition,
    fg: Color,
    bg: Color,
    g0: u8,
    g1: u8,
    application_keypad_mode: bool,
    application_cursor_mode: bool,
    insert_mode: bool,
}

/// A plain-value copy of everything [`Terminal`] owns, used for the
/// alternate-screen slot instead of a nested emulator (see the source's
/// cyclic-reference design note). The slot holds at most one of these.
#[derive(Debug, Clone)]
struct AltScreen {
    grid: crate::grid::GridSnapshot,
    rendition: Rendition,
    fg: Color,
    bg: Color,
    g0: u8,
    g1: u8,
    active_charset: u8,
    wraparound: bool,
    cursor_visible: bool,
    insert_mode: bool,
    application_keypad_mode: bool,
    application_cursor_mode: bool,
    saved_register: Option<SavedRegister>,
    window_title: String,
}

/// An in-editor terminal emulator core: owns the [`Grid`], the decoder
/// state for `feed`, and the two persistent modes the encoder consults.
/// Single-threaded and non-reentrant — see the crate-level concurrency
/// notes; there is nothing here that suspends or shares state across
/// instances.
pub struct Terminal {
    grid: Grid,
    rendition: Rendition,
    fg: Color,
    bg: Color,
    g0: u8,
    g1: u8,
    active_charset: u8,
    wraparound: bool,
    cursor_visible: bool,
    insert_mode: bool,
    application_keypad_mode: bool,
    application_cursor_mode: bool,
    just_wrapped_around: bool,
    window_title: String,
    saved_register: Option<SavedRegister>,
    alt_screen: Option<AltScreen>,
    state: DecoderState,
    csi: CsiAccum,
    osc: OscAccum,
    esc_byte_count: usize,
    out_buf: Vec<u8>,
    force_redraw: bool,
}

impl Terminal {
    /// Create a terminal at `(cols, rows)` with default modes (wraparound
    /// on, cursor visible, everything else off).
    pub fn new(cols: u16, rows: u16) -> VtResult<Self> {
        Self::with_config(TerminalConfig { cols, rows, ..TerminalConfig::default() })
    }

    /// Create a terminal from an explicit configuration.
    pub fn with_config(config: TerminalConfig) -> VtResult<Self> {
        let grid = Grid::new(config.cols, config.rows)?;
        Ok(Self {
            grid,
            rendition: Rendition::default(),
            fg: Color::Default,
            bg: Color::Default,
            g0: b'B',
            g1: b'B',
            active_charset: 0,
            wraparound: config.wraparound,
            cursor_visible: config.cursor_visible,
            insert_mode: config.insert_mode,
            application_keypad_mode: config.application_keypad_mode,
            application_cursor_mode: config.application_cursor_mode,
            just_wrapped_around: false,
            window_title: String::new(),
            saved_register: None,
            alt_screen: None,
            state: DecoderState::Normal,
            csi: CsiAccum::default(),
            osc: OscAccum::default(),
            esc_byte_count: 0,
            out_buf: Vec::new(),
            force_redraw: true,
        })
    }

    pub fn cols(&self) -> u16 {
        self.grid.cols()
    }

    pub fn rows(&self) -> u16 {
        self.grid.rows()
    }

    pub fn cursor_x(&self) -> u16 {
        self.grid.cursor_x()
    }

    pub fn cursor_y(&self) -> u16 {
        self.grid.cursor_y()
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn wraparound(&self) -> bool {
        self.wraparound
    }

    pub fn insert_mode(&self) -> bool {
        self.insert_mode
    }

    pub fn application_cursor_mode(&self) -> bool {
        self.application_cursor_mode
    }

    pub fn application_keypad_mode(&self) -> bool {
        self.application_keypad_mode
    }

    pub fn window_title(&self) -> &str {
        &self.window_title
    }

    pub fn get_cell(&self, row: u16, col: u16) -> &Cell {
        self.grid.get_cell(row, col)
    }

    /// Consume the one-shot advisory redraw flag.
    pub fn take_force_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.force_redraw, false)
    }

    /// Reallocate the grid to `(cols, rows)`. On allocation failure the
    /// terminal is left exactly as it was.
    pub fn resize(&mut self, cols: u16, rows: u16) -> VtResult<()> {
        self.grid.resize(cols, rows)?;
        self.force_redraw = true;
        Ok(())
    }

    /// Feed a chunk of child-process output through the decoder. Infallible:
    /// malformed input is absorbed (logged, sequence discarded) rather than
    /// propagated, per the crate's error-handling policy.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<TerminalEvent> {
        let mut events = Vec::new();
        for &b in bytes {
            self.feed_byte(b, &mut events);
        }
        events
    }

    /// Translate a key event into bytes and queue them in `out_buf`,
    /// reading the two persistent modes directly off `self` so a mode flip
    /// from the most recent `feed` is visible immediately.
    pub fn encode_key(&mut self, event: KeyEvent) {
        let modes = EncoderModes {
            application_keypad_mode: self.application_keypad_mode,
            application_cursor_mode: self.application_cursor_mode,
        };
        let bytes = encoder::encode_key(event, modes);
        if self.out_buf.len() + bytes.len() > OUT_BUF_CAPACITY {
            tracing::warn!(
                queued = self.out_buf.len(),
                dropped = bytes.len(),
                "out_buf at capacity; dropping encoded key bytes"
            );
            return;
        }
        self.out_buf.extend_from_slice(&bytes);
    }

    /// Drain bytes queued by `encode_key`, for the host to write to the
    /// child's input side.
    pub fn drain_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out_buf)
    }

    /// Convenience wrapper draining `out_buf` straight into a writer,
    /// mapping an I/O error to [`VtError::WriteFailure`].
    pub fn drain_output_to<W: io::Write>(&mut self, sink: &mut W) -> VtResult<()> {
        let bytes = self.drain_output();
        sink.write_all(&bytes).map_err(|e| VtError::WriteFailure(e.to_string()))
    }

    // -- decoder --------------------------------------------------------

    fn feed_byte(&mut self, b: u8, events: &mut Vec<TerminalEvent>) {
        if b == 0x1b {
            self.enter_escape();
            return;
        }
        if self.state != DecoderState::Normal {
            self.esc_byte_count += 1;
            if self.esc_byte_count > ESC_BUF_CAPACITY {
                tracing::debug!(
                    capacity = ESC_BUF_CAPACITY,
                    "escape sequence exceeded buffer capacity; discarding"
                );
                self.abort_escape();
                return;
            }
        }
        if b <= 0x1f {
            self.dispatch_control(b, events);
            return;
        }
        match self.state {
            DecoderState::Normal => self.write_glyph(b),
            DecoderState::Escape => self.feed_escape(b),
            DecoderState::Csi => self.feed_csi(b),
            DecoderState::Osc => self.feed_osc(b),
            DecoderState::CharsetDesignate(slot) => self.feed_charset_designate(slot, b),
            DecoderState::Hash => self.feed_hash(b),
        }
    }

    fn enter_escape(&mut self) {
        self.state = DecoderState::Escape;
        self.esc_byte_count = 1;
        self.csi = CsiAccum::default();
        self.osc = OscAccum::default();
    }

    fn abort_escape(&mut self) {
        self.state = DecoderState::Normal;
        self.esc_byte_count = 0;
        self.csi = CsiAccum::default();
        self.osc = OscAccum::default();
    }

    /// C0 controls are dispatched immediately regardless of decoder state
    /// (mid-CSI, mid-OSC, ...); only `CAN`/`SUB` and a fresh `ESC` abort a
    /// pending sequence.
    fn dispatch_control(&mut self, b: u8, events: &mut Vec<TerminalEvent>) {
        match b {
            0x07 => {
                if self.state == DecoderState::Osc {
                    self.finish_osc(events);
                    self.state = DecoderState::Normal;
                    self.esc_byte_count = 0;
                } else {
                    events.push(TerminalEvent::Bell);
                }
            }
            0x08 => self.grid.cursor_left(1),
            0x09 => {
                let next = self.grid.next_tabstop();
                self.grid.set_cursor_x(next);
            }
            0x0a..=0x0c => {
                if self.just_wrapped_around {
                    self.just_wrapped_around = false;
                } else {
                    self.grid.line_feed();
                }
            }
            0x0d => {
                if self.just_wrapped_around {
                    self.just_wrapped_around = false;
                } else {
                    self.grid.carriage_return();
                }
            }
            0x0e => self.active_charset = 1,
            0x0f => self.active_charset = 0,
            0x18 | 0x1a => self.abort_escape(),
            _ => {}
        }
    }

    fn active_charset_tag(&self) -> CharsetTag {
        let designator = if self.active_charset == 0 { self.g0 } else { self.g1 };
        if designator == b'0' { CharsetTag::Drawing } else { CharsetTag::UsAscii }
    }

    fn write_glyph(&mut self, b: u8) {
        let cols = self.grid.cols();
        if self.grid.cursor_x() == cols {
            if self.wraparound {
                self.grid.carriage_return();
                self.grid.line_feed();
            } else {
                self.grid.set_cursor_x(cols - 1);
            }
        }
        if self.insert_mode {
            self.grid.insert_chars(1);
        }
        let charset_tag = self.active_charset_tag();
        let (y, x) = (self.grid.cursor_y(), self.grid.cursor_x());
        self.grid.set_cell(y, x, b, self.fg, self.bg, self.rendition, charset_tag);
        self.grid.cursor_right(1);
        // The flag survives exactly until the next byte: it is re-derived
        // from whether this write landed the cursor on the virtual column,
        // not from whether this particular write performed a wrap.
        self.just_wrapped_around = self.grid.cursor_x() == cols;
    }

    fn feed_escape(&mut self, byte: u8) {
        match byte {
            b'[' => {
                self.state = DecoderState::Csi;
                self.csi = CsiAccum::default();
            }
            b']' => {
                self.state = DecoderState::Osc;
                self.osc = OscAccum::default();
            }
            b'7' => {
                self.save_register();
                self.state = DecoderState::Normal;
            }
            b'8' => {
                self.restore_register();
                self.state = DecoderState::Normal;
            }
            b'D' => {
                // IND: unconditional line feed, no xenl suppression.
                self.grid.line_feed();
                self.state = DecoderState::Normal;
            }
            b'M' => {
                // RI: reverse index.
                if self.grid.cursor_y() == self.grid.scroll_top() {
                    self.grid.scroll_down();
                } else {
                    self.grid.cursor_up(1);
                }
                self.state = DecoderState::Normal;
            }
            b'E' => {
                // NEL: IND then carriage return.
                self.grid.line_feed();
                self.grid.carriage_return();
                self.state = DecoderState::Normal;
            }
            b'=' => {
                self.application_keypad_mode = true;
                self.state = DecoderState::Normal;
            }
            b'>' => {
                self.application_keypad_mode = false;
                self.state = DecoderState::Normal;
            }
            b'H' => {
                self.grid.set_tab_at_cursor();
                self.state = DecoderState::Normal;
            }
            b'#' => {
                self.state = DecoderState::Hash;
            }
            b'(' => {
                self.state = DecoderState::CharsetDesignate(CharsetSlot::G0);
            }
            b')' => {
                self.state = DecoderState::CharsetDesignate(CharsetSlot::G1);
            }
            _ => {
                tracing::debug!(byte, "unknown ESC final byte; discarding sequence");
                self.state = DecoderState::Normal;
            }
        }
    }

    fn feed_charset_designate(&mut self, slot: CharsetSlot, byte: u8) {
        match slot {
            CharsetSlot::G0 => self.g0 = byte,
            CharsetSlot::G1 => self.g1 = byte,
        }
        self.state = DecoderState::Normal;
    }

    fn feed_hash(&mut self, byte: u8) {
        if byte == b'8' {
            // DECALN: fill the glyph column only, leaving colour/rendition.
            self.grid.fill_glyph(b'E');
            self.force_redraw = true;
        } else {
            tracing::debug!(byte, "unknown ESC # sequence; discarding");
        }
        self.state = DecoderState::Normal;
    }

    fn feed_csi(&mut self, byte: u8) {
        match byte {
            b'0'..=b'9' => self.csi.push_digit(byte - b'0'),
            b';' => self.csi.push_separator(),
            b'?' => self.csi.mark_private(),
            _ => {
                self.dispatch_csi(byte);
                self.state = DecoderState::Normal;
            }
        }
    }

    fn dispatch_csi(&mut self, final_byte: u8) {
        let params = self.csi.finish();
        let private = self.csi.private;
        match final_byte {
            b'H' | b'f' => {
                let row = motion_param(&params, 0) - 1;
                let col = motion_param(&params, 1) - 1;
                self.grid.move_cursor(row, col);
            }
            b'J' => {
                self.grid.erase_display(erase_param(&params, 0));
                self.force_redraw = true;
            }
            b'K' => self.grid.erase_line(erase_param(&params, 0)),
            b'A' => self.grid.cursor_up(motion_param(&params, 0)),
            b'B' => self.grid.cursor_down(motion_param(&params, 0)),
            b'C' => self.grid.cursor_right(motion_param(&params, 0)),
            b'D' => self.grid.cursor_left(motion_param(&params, 0)),
            b'L' => self.grid.insert_lines(motion_param(&params, 0)),
            b'M' => self.grid.delete_lines(motion_param(&params, 0)),
            b'@' => self.grid.insert_chars(motion_param(&params, 0)),
            b'P' => self.grid.delete_chars(motion_param(&params, 0)),
            b'E' => {
                self.grid.carriage_return();
                self.grid.line_feed();
            }
            b's' => self.save_register(),
            b'u' => self.restore_register(),
            b'g' => self.grid.tab_clear(erase_param(&params, 0)),
            b'r' => {
                let top = motion_param(&params, 0) - 1;
                let bottom = params.get(1).copied().unwrap_or(self.grid.rows()).max(1) - 1;
                self.grid.set_scroll_region(top, bottom);
                self.grid.move_cursor(0, 0);
            }
            b'm' => self.apply_sgr(&params),
            b'h' => {
                for &p in &params {
                    self.apply_mode(private, p, true);
                }
            }
            b'l' => {
                for &p in &params {
                    self.apply_mode(private, p, false);
                }
            }
            _ => {
                tracing::debug!(final = final_byte as char, "unknown CSI final byte; discarding");
            }
        }
    }

    fn apply_sgr(&mut self, params: &[u16]) {
        if params.is_empty() {
            self.reset_rendition();
            return;
        }
        let mut i = 0;
        while i < params.len() {
            match params[i] {
                0 => self.reset_rendition(),
                1 => self.rendition.bold = true,
                2 => self.rendition.dim = true,
                4 => self.rendition.underscore = true,
                5 => self.rendition.blink = true,
                7 => self.rendition.negative = true,
                8 => self.rendition.hidden = true,
                22 => self.rendition.bold = false,
                24 => self.rendition.underscore = false,
                25 => self.rendition.blink = false,
                27 => self.rendition.negative = false,
                v @ 30..=37 => self.fg = Color::fg_from_sgr((v - 30) as u8),
                38 => i += skip_extended_color(&params[i + 1..]),
                39 => self.fg = Color::Default,
                v @ 40..=47 => self.bg = Color::bg_from_sgr((v - 40) as u8),
                48 => i += skip_extended_color(&params[i + 1..]),
                49 => self.bg = Color::Default,
                _ => {}
            }
            i += 1;
        }
    }

    fn reset_rendition(&mut self) {
        self.rendition = Rendition::default();
        self.fg = Color::Default;
        self.bg = Color::Default;
    }

    fn apply_mode(&mut self, private: bool, param: u16, set: bool) {
        match (private, param) {
            (false, 4) => self.insert_mode = set,
            (true, 1) => self.application_cursor_mode = set,
            (true, 7) => self.wraparound = set,
            (false, 34) | (true, 25) => self.cursor_visible = set,
            (true, 1047) | (true, 1049) => {
                if set {
                    self.enter_alt_screen();
                } else {
                    self.leave_alt_screen();
                }
            }
            (true, 4) | (true, 5) | (true, 6) => {}
            _ => {}
        }
    }

    fn feed_osc(&mut self, byte: u8) {
        if !self.osc.seen_semicolon {
            if byte == b';' {
                self.osc.seen_semicolon = true;
            } else if byte.is_ascii_digit() {
                self.osc.command.push(byte);
            }
            // Any other byte before the first ';' is an OSC form this
            // decoder doesn't recognize (e.g. a private extension); it is
            // consumed without mutation rather than flagged malformed.
        } else {
            self.osc.text.push(byte);
        }
    }

    fn finish_osc(&mut self, events: &mut Vec<TerminalEvent>) {
        let command = String::from_utf8_lossy(&self.osc.command);
        if matches!(command.as_ref(), "0" | "1" | "2") {
            let mut title_bytes = std::mem::take(&mut self.osc.text);
            title_bytes.truncate(MAX_TITLE_LEN);
            let title = String::from_utf8_lossy(&title_bytes).to_string();
            self.window_title = title.clone();
            events.push(TerminalEvent::TitleChanged(title));
        }
        self.osc = OscAccum::default();
    }

    fn save_register(&mut self) {
        self.saved_register = Some(SavedRegister {
            cursor_x: self.grid.cursor_x(),
            cursor_y: self.grid.cursor_y(),
            rendition: self.rendition,
            fg: self.fg,
            bg: self.bg,
            g0: self.g0,
            g1: self.g1,
            application_keypad_mode: self.application_keypad_mode,
            application_cursor_mode: self.application_cursor_mode,
            insert_mode: self.insert_mode,
        });
    }

    fn restore_register(&mut self) {
        let Some(reg) = self.saved_register else {
            tracing::debug!("DECRC with no saved register; no-op");
            return;
        };
        self.grid.set_cursor_x(reg.cursor_x);
        self.grid.set_cursor_y(reg.cursor_y);
        self.rendition = reg.rendition;
        self.fg = reg.fg;
        self.bg = reg.bg;
        self.g0 = reg.g0;
        self.g1 = reg.g1;
        self.application_keypad_mode = reg.application_keypad_mode;
        self.application_cursor_mode = reg.application_cursor_mode;
        self.insert_mode = reg.insert_mode;
    }

    fn enter_alt_screen(&mut self) {
        // Discards any existing snapshot first: the slot is single-level.
        self.alt_screen = Some(AltScreen {
            grid: self.grid.snapshot(),
            rendition: self.rendition,
            fg: self.fg,
            bg: self.bg,
            g0: self.g0,
            g1: self.g1,
            active_charset: self.active_charset,
            wraparound: self.wraparound,
            cursor_visible: self.cursor_visible,
            insert_mode: self.insert_mode,
            application_keypad_mode: self.application_keypad_mode,
            application_cursor_mode: self.application_cursor_mode,
            saved_register: self.saved_register,
            window_title: self.window_title.clone(),
        });
        self.grid.erase_display(2);
        self.force_redraw = true;
    }

    fn leave_alt_screen(&mut self) {
        let Some(snap) = self.alt_screen.take() else {
            tracing::warn!("alternate-screen reset requested with no snapshot present");
            return;
        };
        self.grid.restore(snap.grid);
        self.rendition = snap.rendition;
        self.fg = snap.fg;
        self.bg = snap.bg;
        self.g0 = snap.g0;
        self.g1 = snap.g1;
        self.active_charset = snap.active_charset;
        self.wraparound = snap.wraparound;
        self.cursor_visible = snap.cursor_visible;
        self.insert_mode = snap.insert_mode;
        self.application_keypad_mode = snap.application_keypad_mode;
        self.application_cursor_mode = snap.application_cursor_mode;
        self.saved_register = snap.saved_register;
        self.window_title = snap.window_title;
        self.force_redraw = true;
    }
}

/// Default `1`, with an explicit `0` parameter also promoted to `1` — the
/// rule CSI motion ops use. Reading past the end of `params` (an entirely
/// absent argument list) and an explicit `0` both resolve here; neither
/// reads uninitialized data the way the source's `argv[0]` access could.
fn motion_param(params: &[u16], idx: usize) -> u16 {
    params.get(idx).copied().unwrap_or(1).max(1)
}

/// Default `0`, with an explicit `0` left as `0` — the rule erase/tab-clear
/// ops use.
fn erase_param(params: &[u16], idx: usize) -> u16 {
    params.get(idx).copied().unwrap_or(0)
}

/// 256-color (`38;5;n`) and RGB (`38;2;r;g;b`) extended SGR forms are
/// swallowed without producing a colour change — both are Non-goals. Returns
/// how many extra parameter slots to skip past the `38`/`48` itself.
fn skip_extended_color(rest: &[u16]) -> usize {
    match rest.first() {
        Some(5) => 2,
        Some(2) => 4,
        _ => 0,
    }
}
