//! Terminal surface: a cell grid that shapes are rasterised into, flushed to
//! the terminal once per frame with crossterm.
//!
//! Layout: row 0 is the HUD, the last row is the controls hint, and the rows
//! in between show the logical canvas scaled to fit.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use super::{Align, Surface};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::geometry::Rect;

pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 16;

const FILL: char = '█';
const C_DIMMED: Color = Color::DarkGrey;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::Reset,
};

pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    canvas_width: f32,
    canvas_height: f32,
    cells: Vec<Cell>,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16, config: &GameConfig) -> Result<Self, GameError> {
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(GameError::TerminalTooSmall {
                cols,
                rows,
                min_cols: MIN_COLS,
                min_rows: MIN_ROWS,
            });
        }
        Ok(TerminalSurface {
            cols,
            rows,
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            cells: vec![BLANK; cols as usize * rows as usize],
        })
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Rows available to the play field.
    fn field_rows(&self) -> u16 {
        self.rows - 2
    }

    // ── Coordinate mapping ───────────────────────────────────────────────────

    fn col_of(&self, x: f32) -> f32 {
        x / self.canvas_width * self.cols as f32
    }

    fn row_of(&self, y: f32) -> f32 {
        y / self.canvas_height * self.field_rows() as f32
    }

    /// Logical point at the centre of a field cell.
    fn cell_center(&self, col: i32, row: i32) -> (f32, f32) {
        (
            (col as f32 + 0.5) / self.cols as f32 * self.canvas_width,
            (row as f32 + 0.5) / self.field_rows() as f32 * self.canvas_height,
        )
    }

    /// Field cells covered by a logical rectangle, clamped to the field.
    fn cell_span(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let c0 = (self.col_of(rect.x).floor() as i32).max(0);
        let c1 = (self.col_of(rect.right()).ceil() as i32).min(self.cols as i32);
        let r0 = (self.row_of(rect.y).floor() as i32).max(0);
        let r1 = (self.row_of(rect.bottom()).ceil() as i32).min(self.field_rows() as i32);
        (c0, c1, r0, r1)
    }

    fn set_field(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        self.set(col, row + 1, ch, fg);
    }

    fn set(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells[idx] = Cell { ch, fg };
    }

    // ── Screen-space text (used by the presentation layer) ───────────────────

    pub fn put_str(&mut self, col: i32, row: i32, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.set(col + i as i32, row, ch, fg);
        }
    }

    pub fn put_centered(&mut self, row: i32, text: &str, fg: Color) {
        let col = self.cols as i32 / 2 - text.chars().count() as i32 / 2;
        self.put_str(col, row, text, fg);
    }

    pub fn put_right(&mut self, row: i32, text: &str, fg: Color) {
        let col = self.cols as i32 - text.chars().count() as i32 - 1;
        self.put_str(col, row, text, fg);
    }

    /// Character at a screen cell.
    pub fn char_at(&self, col: u16, row: u16) -> Option<char> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row as usize * self.cols as usize + col as usize].ch)
    }

    // ── Output ───────────────────────────────────────────────────────────────

    /// Write the whole grid, switching colour only where it changes.
    pub fn flush_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut current: Option<Color> = None;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            let mut run = String::with_capacity(self.cols as usize);
            for cell in &self.cells[start..start + self.cols as usize] {
                if current != Some(cell.fg) {
                    if !run.is_empty() {
                        out.queue(Print(&run))?;
                        run.clear();
                    }
                    out.queue(style::SetForegroundColor(cell.fg))?;
                    current = Some(cell.fg);
                }
                run.push(cell.ch);
            }
            if !run.is_empty() {
                out.queue(Print(&run))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()
    }
}

/// Even-odd ray cast.
fn point_in_polygon(x: f32, y: f32, points: &[(f32, f32)]) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn bounding_box(points: &[(f32, f32)]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    let (mut x0, mut y0, mut x1, mut y1) = (first.0, first.1, first.0, first.1);
    for &(x, y) in rest {
        x0 = x0.min(x);
        y0 = y0.min(y);
        x1 = x1.max(x);
        y1 = y1.max(y);
    }
    Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
}

impl Surface for TerminalSurface {
    fn clear(&mut self, _color: Color) -> io::Result<()> {
        self.cells.fill(BLANK);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        let (c0, c1, r0, r1) = self.cell_span(&rect);
        for row in r0..r1 {
            for col in c0..c1 {
                self.set_field(col, row, FILL, color);
            }
        }
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) -> io::Result<()> {
        let Some(bounds) = bounding_box(points) else {
            return Ok(());
        };
        let (c0, c1, r0, r1) = self.cell_span(&bounds);
        for row in r0..r1 {
            for col in c0..c1 {
                let (x, y) = self.cell_center(col, row);
                if point_in_polygon(x, y, points) {
                    self.set_field(col, row, FILL, color);
                }
            }
        }
        Ok(())
    }

    fn fill_ellipse(&mut self, bounds: Rect, color: Color) -> io::Result<()> {
        let (rx, ry) = (bounds.width / 2.0, bounds.height / 2.0);
        if rx <= 0.0 || ry <= 0.0 {
            return Ok(());
        }
        let (cx, cy) = (bounds.center_x(), bounds.y + ry);
        let (c0, c1, r0, r1) = self.cell_span(&bounds);
        for row in r0..r1 {
            for col in c0..c1 {
                let (x, y) = self.cell_center(col, row);
                let (dx, dy) = ((x - cx) / rx, (y - cy) / ry);
                if dx * dx + dy * dy <= 1.0 {
                    self.set_field(col, row, FILL, color);
                }
            }
        }
        Ok(())
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Color, align: Align) -> io::Result<()> {
        let mut col = self.col_of(x) as i32;
        if align == Align::Center {
            col -= text.chars().count() as i32 / 2;
        }
        let row = self.row_of(y) as i32 + 1;
        self.put_str(col, row, text, color);
        Ok(())
    }

    fn dim(&mut self) -> io::Result<()> {
        for cell in &mut self.cells {
            if cell.ch == FILL {
                cell.ch = '▒';
            }
            cell.fg = C_DIMMED;
        }
        Ok(())
    }
}
