//! The cell matrix and its mutating primitives: scroll, erase, insert/delete
//! line/char, cursor movement with clamping. Pure data layer — no parsing
//! lives here; the decoder in [`crate::terminal`] drives these operations.

use serde::{Deserialize, Serialize};

use crate::error::{VtError, VtResult};

/// A foreground or background colour: one of eight indexed colours, or the
/// terminal's default colour. True-color and 256-indexed palettes are out
/// of scope for this grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// The terminal's default foreground/background.
    Default,
    /// One of the eight ANSI colours (0–7).
    Indexed(u8),
}

impl Default for Color {
    fn default() -> Self {
        Color::Default
    }
}

impl Color {
    fn from_sgr_offset(v: u8) -> Self {
        Color::Indexed(v.min(7))
    }

    /// Map an SGR foreground offset (`v - 30`) to a `Color`.
    pub(crate) fn fg_from_sgr(v: u8) -> Self {
        Color::from_sgr_offset(v)
    }

    /// Map an SGR background offset (`v - 40`) to a `Color`.
    pub(crate) fn bg_from_sgr(v: u8) -> Self {
        Color::from_sgr_offset(v)
    }
}

/// Which of the two character-set tables a cell was written under.
/// Glyph selection from this tag is the renderer's problem; the core
/// only tags cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharsetTag {
    #[default]
    UsAscii,
    Drawing,
}

/// Rendition bitset: bold, underscore, blink, negative (reverse video),
/// dim, and hidden. Italic and strikethrough are not part of this model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rendition {
    pub bold: bool,
    pub dim: bool,
    pub underscore: bool,
    pub blink: bool,
    pub negative: bool,
    pub hidden: bool,
}

impl Rendition {
    pub fn is_empty(&self) -> bool {
        *self == Rendition::default()
    }
}

/// A single grid cell: glyph, colours, rendition, and active character set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub glyph: u8,
    pub fg: Color,
    pub bg: Color,
    pub rendition: Rendition,
    pub charset: CharsetTag,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            glyph: b' ',
            fg: Color::Default,
            bg: Color::Default,
            rendition: Rendition::default(),
            charset: CharsetTag::UsAscii,
        }
    }
}

/// Grid dimensions in columns × rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub cols: u16,
    pub rows: u16,
}

impl GridSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

/// A plain-value copy of everything [`Grid`] owns, used to implement the
/// alternate-screen slot as a value rather than a nested emulator.
#[derive(Debug, Clone)]
pub struct GridSnapshot {
    pub(crate) size: GridSize,
    pub(crate) cells: Vec<Cell>,
    pub(crate) tabstops: Vec<bool>,
    pub(crate) cursor_x: u16,
    pub(crate) cursor_y: u16,
    pub(crate) scroll_top: u16,
    pub(crate) scroll_bottom: u16,
}

fn default_tabstops(cols: u16) -> Vec<bool> {
    (0..cols).map(|i| i < cols.saturating_sub(1) && (i + 1) % 8 == 0).collect()
}

/// The cell matrix plus cursor and scroll-region state. All operations
/// clamp to the grid and never allocate once constructed (aside from
/// [`Grid::resize`] and the alternate-screen snapshot, which are the only
/// sanctioned allocation points per the error-handling design).
#[derive(Debug, Clone)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
    tabstops: Vec<bool>,
    cursor_x: u16,
    cursor_y: u16,
    scroll_top: u16,
    scroll_bottom: u16,
}

fn checked_cell_count(cols: u16, rows: u16) -> VtResult<usize> {
    (cols as usize)
        .checked_mul(rows as usize)
        .ok_or(VtError::OutOfMemory)
}

impl Grid {
    /// Create a new grid of the given size, filled with default cells.
    pub fn new(cols: u16, rows: u16) -> VtResult<Self> {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let len = checked_cell_count(cols, rows)?;
        Ok(Grid {
            size: GridSize::new(cols, rows),
            cells: vec![Cell::default(); len],
            tabstops: default_tabstops(cols),
            cursor_x: 0,
            cursor_y: 0,
            scroll_top: 0,
            scroll_bottom: rows - 1,
        })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cols(&self) -> u16 {
        self.size.cols
    }

    pub fn rows(&self) -> u16 {
        self.size.rows
    }

    pub fn cursor_x(&self) -> u16 {
        self.cursor_x
    }

    pub fn cursor_y(&self) -> u16 {
        self.cursor_y
    }

    pub fn scroll_top(&self) -> u16 {
        self.scroll_top
    }

    pub fn scroll_bottom(&self) -> u16 {
        self.scroll_bottom
    }

    fn index(&self, row: u16, col: u16) -> usize {
        row as usize * self.size.cols as usize + col as usize
    }

    pub fn get_cell(&self, row: u16, col: u16) -> &Cell {
        &self.cells[self.index(row, col)]
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_cell(
        &mut self,
        row: u16,
        col: u16,
        glyph: u8,
        fg: Color,
        bg: Color,
        rendition: Rendition,
        charset: CharsetTag,
    ) {
        let idx = self.index(row, col);
        self.cells[idx] = Cell { glyph, fg, bg, rendition, charset };
    }

    /// Raw cursor-column setter used by the decoder's wrap logic; does not
    /// clamp beyond `[0, cols]` since `cursor_x == cols` is the valid
    /// "virtual" overshoot column.
    pub fn set_cursor_x(&mut self, x: u16) {
        self.cursor_x = x.min(self.size.cols);
    }

    pub fn set_cursor_y(&mut self, y: u16) {
        self.cursor_y = y.min(self.size.rows - 1);
    }

    /// `move_cursor(y, x)`: 0-based, already-defaulted coordinates.
    pub fn move_cursor(&mut self, y: u16, x: u16) {
        self.cursor_x = x.min(self.size.cols - 1);
        self.cursor_y = y.min(self.size.rows - 1);
    }

    pub fn cursor_up(&mut self, n: u16) {
        let n = n.max(1);
        self.cursor_y = self.cursor_y.saturating_sub(n).max(self.scroll_top);
    }

    pub fn cursor_down(&mut self, n: u16) {
        let n = n.max(1);
        self.cursor_y = self.cursor_y.saturating_add(n).min(self.scroll_bottom);
    }

    pub fn cursor_left(&mut self, n: u16) {
        let n = n.max(1);
        self.cursor_x = self.cursor_x.saturating_sub(n);
    }

    /// Ceiling is the virtual column `cols` — the caller must not rely on
    /// overshoot past it (see design notes on the documented source bug).
    pub fn cursor_right(&mut self, n: u16) {
        let n = n.max(1);
        self.cursor_x = self.cursor_x.saturating_add(n).min(self.size.cols);
    }

    pub fn carriage_return(&mut self) {
        self.cursor_x = 0;
    }

    /// Advance `cursor_y` by one; scrolls the region instead of leaving it.
    pub fn line_feed(&mut self) {
        if self.cursor_y >= self.scroll_bottom {
            self.scroll_up();
        } else {
            self.cursor_y += 1;
        }
    }

    fn fill_row_default(&mut self, row: u16) {
        for col in 0..self.size.cols {
            let idx = self.index(row, col);
            self.cells[idx] = Cell::default();
        }
    }

    pub fn scroll_up(&mut self) {
        for row in self.scroll_top..self.scroll_bottom {
            for col in 0..self.size.cols {
                let src = self.index(row + 1, col);
                let dst = self.index(row, col);
                self.cells[dst] = self.cells[src];
            }
        }
        self.fill_row_default(self.scroll_bottom);
    }

    pub fn scroll_down(&mut self) {
        let mut row = self.scroll_bottom;
        while row > self.scroll_top {
            for col in 0..self.size.cols {
                let src = self.index(row - 1, col);
                let dst = self.index(row, col);
                self.cells[dst] = self.cells[src];
            }
            row -= 1;
        }
        self.fill_row_default(self.scroll_top);
    }

    pub fn insert_lines(&mut self, n: u16) {
        let original_top = self.scroll_top;
        self.scroll_top = self.cursor_y;
        let count = n.max(1).min(self.scroll_bottom.saturating_sub(self.cursor_y));
        for _ in 0..count {
            self.scroll_down();
        }
        self.scroll_top = original_top;
        self.cursor_x = 0;
    }

    pub fn delete_lines(&mut self, n: u16) {
        let original_top = self.scroll_top;
        self.scroll_top = self.cursor_y;
        let count = n.max(1).min(self.scroll_bottom.saturating_sub(self.cursor_y));
        for _ in 0..count {
            self.scroll_up();
        }
        self.scroll_top = original_top;
    }

    pub fn insert_chars(&mut self, n: u16) {
        let row = self.cursor_y;
        let x = self.cursor_x.min(self.size.cols - 1);
        for _ in 0..n.max(1) {
            let mut col = self.size.cols;
            while col > x + 1 {
                col -= 1;
                let src = self.index(row, col - 1);
                let dst = self.index(row, col);
                self.cells[dst] = self.cells[src];
            }
            let idx = self.index(row, x);
            self.cells[idx] = Cell::default();
        }
    }

    pub fn delete_chars(&mut self, n: u16) {
        let row = self.cursor_y;
        for _ in 0..n.max(1) {
            for col in self.cursor_x..self.size.cols.saturating_sub(1) {
                let src = self.index(row, col + 1);
                let dst = self.index(row, col);
                self.cells[dst] = self.cells[src];
            }
            let last = self.size.cols - 1;
            let idx = self.index(row, last);
            self.cells[idx] = Cell::default();
        }
    }

    pub fn erase_display(&mut self, mode: u16) {
        match mode {
            0 => {
                let (y, x) = (self.cursor_y, self.cursor_x.min(self.size.cols - 1));
                for col in x..self.size.cols {
                    let idx = self.index(y, col);
                    self.cells[idx] = Cell::default();
                }
                for row in (y + 1)..self.size.rows {
                    self.fill_row_default(row);
                }
            }
            1 => {
                let (y, x) = (self.cursor_y, self.cursor_x.min(self.size.cols - 1));
                for row in 0..y {
                    self.fill_row_default(row);
                }
                for col in 0..=x {
                    let idx = self.index(y, col);
                    self.cells[idx] = Cell::default();
                }
            }
            _ => {
                for row in 0..self.size.rows {
                    self.fill_row_default(row);
                }
            }
        }
    }

    pub fn erase_line(&mut self, mode: u16) {
        let y = self.cursor_y;
        let x = self.cursor_x.min(self.size.cols - 1);
        match mode {
            0 => {
                for col in x..self.size.cols {
                    let idx = self.index(y, col);
                    self.cells[idx] = Cell::default();
                }
            }
            1 => {
                for col in 0..=x {
                    let idx = self.index(y, col);
                    self.cells[idx] = Cell::default();
                }
            }
            _ => self.fill_row_default(y),
        }
    }

    pub fn tab_clear(&mut self, mode: u16) {
        match mode {
            0 => {
                let x = self.cursor_x.min(self.size.cols - 1) as usize;
                self.tabstops[x] = false;
            }
            3 => {
                for t in self.tabstops.iter_mut() {
                    *t = false;
                }
            }
            _ => {}
        }
    }

    pub fn set_tab_at_cursor(&mut self) {
        let x = self.cursor_x.min(self.size.cols - 1) as usize;
        self.tabstops[x] = true;
    }

    /// Next tab stop strictly after `cursor_x`, or `cols - 1` if none.
    pub fn next_tabstop(&self) -> u16 {
        let start = self.cursor_x as usize + 1;
        for (i, set) in self.tabstops.iter().enumerate().skip(start) {
            if *set {
                return i as u16;
            }
        }
        self.size.cols - 1
    }

    pub fn set_scroll_region(&mut self, top: u16, bottom: u16) {
        if top >= bottom || bottom >= self.size.rows {
            self.scroll_top = 0;
            self.scroll_bottom = self.size.rows - 1;
        } else {
            self.scroll_top = top;
            self.scroll_bottom = bottom;
        }
    }

    /// Fill every cell's glyph column with `b`, leaving colour, rendition,
    /// and charset tag untouched (DECALN, `ESC # 8`).
    pub fn fill_glyph(&mut self, b: u8) {
        for cell in self.cells.iter_mut() {
            cell.glyph = b;
        }
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            size: self.size,
            cells: self.cells.clone(),
            tabstops: self.tabstops.clone(),
            cursor_x: self.cursor_x,
            cursor_y: self.cursor_y,
            scroll_top: self.scroll_top,
            scroll_bottom: self.scroll_bottom,
        }
    }

    pub fn restore(&mut self, snapshot: GridSnapshot) {
        self.size = snapshot.size;
        self.cells = snapshot.cells;
        self.tabstops = snapshot.tabstops;
        self.cursor_x = snapshot.cursor_x;
        self.cursor_y = snapshot.cursor_y;
        self.scroll_top = snapshot.scroll_top;
        self.scroll_bottom = snapshot.scroll_bottom;
    }

    /// Reallocate to `(cols, rows)`, copying the overlapping region
    /// bottom-up so the old last row aligns with the new last row when
    /// shrinking vertically, and resetting the scroll region to the full
    /// screen. On allocation failure the grid is left completely
    /// untouched.
    pub fn resize(&mut self, cols: u16, rows: u16) -> VtResult<()> {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let len = checked_cell_count(cols, rows)?;

        let mut new_cells = vec![Cell::default(); len];
        let overlap_rows = self.size.rows.min(rows);
        let overlap_cols = self.size.cols.min(cols);
        for i in 0..overlap_rows {
            let old_row = self.size.rows - 1 - i;
            let new_row = rows - 1 - i;
            for col in 0..overlap_cols {
                let src = old_row as usize * self.size.cols as usize + col as usize;
                let dst = new_row as usize * cols as usize + col as usize;
                new_cells[dst] = self.cells[src];
            }
        }

        self.size = GridSize::new(cols, rows);
        self.cells = new_cells;
        self.tabstops = default_tabstops(cols);
        self.scroll_top = 0;
        self.scroll_bottom = rows - 1;
        self.cursor_x = self.cursor_x.min(cols);
        self.cursor_y = self.cursor_y.min(rows - 1);
        Ok(())
    }

    /// Render a grid row as text, for debugging/tests only; the renderer's
    /// own diff-painting reads cells directly.
    pub fn row_text(&self, row: u16) -> String {
        (0..self.size.cols)
            .map(|col| self.get_cell(row, col).glyph as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_new_defaults() {
        let g = Grid::new(80, 24).unwrap();
        assert_eq!(g.cols(), 80);
        assert_eq!(g.rows(), 24);
        assert_eq!(g.cursor_x(), 0);
        assert_eq!(g.cursor_y(), 0);
        assert_eq!(g.scroll_top(), 0);
        assert_eq!(g.scroll_bottom(), 23);
        assert_eq!(*g.get_cell(0, 0), Cell::default());
    }

    #[test]
    fn grid_default_tabstops_every_eighth_column() {
        let g = Grid::new(80, 24).unwrap();
        assert!(g.tabstops[7]);
        assert!(g.tabstops[15]);
        assert!(!g.tabstops[0]);
        assert!(!g.tabstops[79]);
    }

    #[test]
    fn grid_cursor_right_clamps_to_virtual_column() {
        let mut g = Grid::new(10, 5).unwrap();
        g.cursor_right(50);
        assert_eq!(g.cursor_x(), 10);
    }

    #[test]
    fn grid_cursor_down_clamps_to_scroll_bottom_not_last_row() {
        let mut g = Grid::new(10, 10).unwrap();
        g.set_scroll_region(0, 4);
        g.cursor_down(50);
        assert_eq!(g.cursor_y(), 4);
    }

    #[test]
    fn grid_cursor_up_floors_at_scroll_top() {
        let mut g = Grid::new(10, 10).unwrap();
        g.set_scroll_region(2, 8);
        g.move_cursor(5, 0);
        g.cursor_up(50);
        assert_eq!(g.cursor_y(), 2);
    }

    #[test]
    fn grid_move_cursor_clamps() {
        let mut g = Grid::new(10, 5).unwrap();
        g.move_cursor(100, 100);
        assert_eq!(g.cursor_y(), 4);
        assert_eq!(g.cursor_x(), 9);
    }

    #[test]
    fn grid_scroll_up_moves_rows_and_fills_last() {
        let mut g = Grid::new(3, 3).unwrap();
        g.set_cell(0, 0, b'A', Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        g.set_cell(1, 0, b'B', Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        g.scroll_up();
        assert_eq!(g.get_cell(0, 0).glyph, b'B');
        assert_eq!(g.get_cell(2, 0).glyph, b' ');
    }

    #[test]
    fn grid_scroll_conservation_preserves_middle_rows() {
        let mut g = Grid::new(3, 5).unwrap();
        for row in 0..5u16 {
            g.set_cell(row, 0, b'0' + row as u8, Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        }
        let before: Vec<u8> = (1..4u16).map(|r| g.get_cell(r, 0).glyph).collect();
        g.scroll_up();
        g.scroll_down();
        let after: Vec<u8> = (1..4u16).map(|r| g.get_cell(r, 0).glyph).collect();
        assert_eq!(before[1], after[1]);
    }

    #[test]
    fn grid_insert_lines_shifts_down_within_region() {
        let mut g = Grid::new(3, 4).unwrap();
        g.set_cell(1, 0, b'X', Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        g.move_cursor(1, 0);
        g.insert_lines(1);
        assert_eq!(g.get_cell(1, 0).glyph, b' ');
        assert_eq!(g.get_cell(2, 0).glyph, b'X');
        assert_eq!(g.cursor_x(), 0);
    }

    #[test]
    fn grid_delete_lines_shifts_up_within_region() {
        let mut g = Grid::new(3, 4).unwrap();
        g.set_cell(2, 0, b'Y', Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        g.move_cursor(1, 0);
        g.delete_lines(1);
        assert_eq!(g.get_cell(1, 0).glyph, b'Y');
    }

    #[test]
    fn grid_insert_chars_clamps_virtual_column_cursor() {
        let mut g = Grid::new(5, 1).unwrap();
        g.set_cursor_x(5);
        g.insert_chars(1);
        assert_eq!(g.get_cell(0, 4).glyph, b' ');
    }

    #[test]
    fn grid_insert_chars_shifts_right_from_cursor() {
        let mut g = Grid::new(5, 1).unwrap();
        g.set_cell(0, 2, b'A', Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        g.move_cursor(0, 2);
        g.insert_chars(1);
        assert_eq!(g.get_cell(0, 2).glyph, b' ');
        assert_eq!(g.get_cell(0, 3).glyph, b'A');
    }

    #[test]
    fn grid_delete_chars_shifts_left_and_fills_right_edge() {
        let mut g = Grid::new(5, 1).unwrap();
        g.set_cell(0, 3, b'A', Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        g.move_cursor(0, 2);
        g.delete_chars(1);
        assert_eq!(g.get_cell(0, 2).glyph, b'A');
        assert_eq!(g.get_cell(0, 4).glyph, b' ');
    }

    #[test]
    fn grid_erase_display_mode_2_clears_everything() {
        let mut g = Grid::new(3, 3).unwrap();
        g.set_cell(1, 1, b'Z', Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        g.erase_display(2);
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(g.get_cell(row, col).glyph, b' ');
            }
        }
    }

    #[test]
    fn grid_erase_display_idempotent() {
        let mut g = Grid::new(4, 4).unwrap();
        g.set_cell(0, 0, b'A', Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        g.erase_display(2);
        let once = g.cells.clone();
        g.erase_display(2);
        assert_eq!(once, g.cells);
    }

    #[test]
    fn grid_erase_line_mode_0_clears_from_cursor() {
        let mut g = Grid::new(5, 1).unwrap();
        for col in 0..5u16 {
            g.set_cell(0, col, b'A', Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        }
        g.move_cursor(0, 2);
        g.erase_line(0);
        assert_eq!(g.get_cell(0, 1).glyph, b'A');
        assert_eq!(g.get_cell(0, 2).glyph, b' ');
        assert_eq!(g.get_cell(0, 4).glyph, b' ');
    }

    #[test]
    fn grid_tab_clear_single_and_all() {
        let mut g = Grid::new(16, 1).unwrap();
        g.move_cursor(0, 7);
        g.tab_clear(0);
        assert!(!g.tabstops[7]);
        assert!(g.tabstops[15]);
        g.tab_clear(3);
        assert!(!g.tabstops[15]);
    }

    #[test]
    fn grid_set_tab_at_cursor() {
        let mut g = Grid::new(10, 1).unwrap();
        g.move_cursor(0, 3);
        g.set_tab_at_cursor();
        assert!(g.tabstops[3]);
    }

    #[test]
    fn grid_next_tabstop_clamps_to_last_column_when_none_remain() {
        let mut g = Grid::new(10, 1).unwrap();
        for t in g.tabstops.iter_mut() {
            *t = false;
        }
        g.move_cursor(0, 5);
        assert_eq!(g.next_tabstop(), 9);
    }

    #[test]
    fn grid_set_scroll_region_resets_on_invalid_range() {
        let mut g = Grid::new(10, 10).unwrap();
        g.set_scroll_region(5, 2);
        assert_eq!(g.scroll_top(), 0);
        assert_eq!(g.scroll_bottom(), 9);
    }

    #[test]
    fn grid_fill_glyph_preserves_attributes() {
        let mut g = Grid::new(3, 1).unwrap();
        g.set_cell(0, 0, b'A', Color::Indexed(1), Color::Default, Rendition::default(), CharsetTag::UsAscii);
        g.fill_glyph(b'E');
        assert_eq!(g.get_cell(0, 0).glyph, b'E');
        assert_eq!(g.get_cell(0, 0).fg, Color::Indexed(1));
    }

    #[test]
    fn grid_snapshot_restore_round_trip() {
        let mut g = Grid::new(4, 4).unwrap();
        g.set_cell(2, 2, b'Q', Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        g.move_cursor(2, 2);
        let snap = g.snapshot();
        g.erase_display(2);
        g.restore(snap);
        assert_eq!(g.get_cell(2, 2).glyph, b'Q');
        assert_eq!(g.cursor_x(), 2);
    }

    #[test]
    fn grid_resize_shrink_aligns_bottom_up() {
        let mut g = Grid::new(4, 4).unwrap();
        for row in 0..4u16 {
            g.set_cell(row, 0, b'0' + row as u8, Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        }
        g.resize(4, 2).unwrap();
        assert_eq!(g.get_cell(1, 0).glyph, b'3');
        assert_eq!(g.get_cell(0, 0).glyph, b'2');
    }

    #[test]
    fn grid_resize_resets_scroll_region() {
        let mut g = Grid::new(10, 10).unwrap();
        g.set_scroll_region(2, 5);
        g.resize(10, 20).unwrap();
        assert_eq!(g.scroll_top(), 0);
        assert_eq!(g.scroll_bottom(), 19);
    }

    #[test]
    fn grid_line_feed_scrolls_at_bottom_margin() {
        let mut g = Grid::new(3, 3).unwrap();
        g.set_cell(1, 0, b'M', Color::Default, Color::Default, Rendition::default(), CharsetTag::UsAscii);
        g.move_cursor(2, 0);
        g.line_feed();
        assert_eq!(g.cursor_y(), 2);
        assert_eq!(g.get_cell(0, 0).glyph, b'M');
    }
}
