//! GameView: paints the canvas and session state into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::canvas::Canvas;
use crate::core::GameSnapshot;
use crate::fb::{FrameBuffer, Glyph, Rgb, Style};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH, BUFFER_ROWS, VISIBLE_ROWS};

const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const GUIDE_BG: Rgb = Rgb::new(40, 40, 54);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Lays out the well, side panel and overlays.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    ///
    /// Only the visible rows are drawn; blocks in the buffer rows stay hidden.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        canvas: &Canvas,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let well_w = BOARD_WIDTH as u16 * self.cell_w;
        let well_h = VISIBLE_ROWS as u16 * self.cell_h;
        let frame_w = well_w + 2;
        let frame_h = well_h + 2;
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let border = Style::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        let guides = if snap.piece_active { canvas.guides() } else { None };
        let grid = canvas.grid();
        for row in BUFFER_ROWS..BOARD_HEIGHT {
            for col in 0..BOARD_WIDTH {
                let x = start_x + 1 + col as u16 * self.cell_w;
                let y = start_y + 1 + (row - BUFFER_ROWS) as u16 * self.cell_h;
                match grid[row as usize][col as usize] {
                    Some(kind) => {
                        let style = Style::new(piece_color(kind), WELL_BG).bold();
                        fb.fill_rect(x, y, self.cell_w, self.cell_h, '█', style);
                    }
                    None => {
                        let in_guide = guides
                            .is_some_and(|(l, r)| (l..r).contains(&(col as i8)));
                        let bg = if in_guide { GUIDE_BG } else { WELL_BG };
                        let style = Style::new(Rgb::new(90, 90, 100), bg).dim();
                        fb.fill_rect(x, y, self.cell_w, self.cell_h, ' ', style);
                        fb.put_char(x, y, '·', style);
                    }
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x + frame_w + 2, start_y);

        if snap.paused {
            draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PAUSED");
        } else if snap.lost {
            draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, canvas: &Canvas, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, canvas, viewport, &mut fb);
        fb
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x.saturating_add(12) > viewport.width {
            return;
        }

        let label = Style::default().bold();
        let value = Style::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let mut y = start_y;
        for (name, number) in [
            ("SCORE", snap.score),
            ("HIGH SCORE", snap.high_score),
            ("LEVEL", snap.level),
            ("HIGH LEVEL", snap.high_level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, number, value);
            y += 3;
        }

        fb.put_str(panel_x, y, "NEXT", label);
        if let Some(kind) = snap.preview {
            let style = Style::new(piece_color(kind), Rgb::new(0, 0, 0)).bold();
            fb.put_char(panel_x, y + 1, kind.letter(), style);
        }
        y += 3;

        let flag = |on: bool| if on { "on" } else { "off" };
        let used = fb.put_str(panel_x, y, "SPIN  ", label);
        fb.put_str(panel_x + used, y, flag(snap.spin_grace), value);
        let used = fb.put_str(panel_x, y + 1, "HOVER ", label);
        fb.put_str(panel_x + used, y + 1, flag(snap.hover_grace), value);
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: Style) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_overlay_text(
    fb: &mut FrameBuffer,
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
    text: &str,
) {
    let text_w = text.chars().count() as u16;
    let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
    let y = start_y.saturating_add(frame_h / 2);
    let style = Style::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
    fb.put_str(x, y, text, style);
}

fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    }
}
