//! Canvas: the terminal front-end's [`Renderer`].
//!
//! The engine draws pieces as individual blocks and later moves or deletes
//! them by handle. The canvas keeps those blocks in board coordinates; the
//! [`GameView`](crate::game_view::GameView) paints them every frame.

use std::collections::HashMap;

use crate::core::Renderer;
use crate::types::{CellRect, PieceKind, RenderHandle, BOARD_HEIGHT, BOARD_WIDTH};

/// A drawn block in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub kind: PieceKind,
    pub row: i8,
    pub col: i8,
}

#[derive(Debug, Clone, Default)]
pub struct Canvas {
    next_id: u32,
    blocks: HashMap<RenderHandle, Block>,
    guides: Option<(i8, i8)>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn block(&self, handle: RenderHandle) -> Option<Block> {
        self.blocks.get(&handle).copied()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Column span `[left, right)` of the active piece.
    pub fn guides(&self) -> Option<(i8, i8)> {
        self.guides
    }

    /// Rasterize blocks into a board-sized grid. Blocks outside the board are
    /// skipped.
    pub fn grid(&self) -> [[Option<PieceKind>; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize] {
        let mut grid = [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        for block in self.blocks.values() {
            if (0..BOARD_HEIGHT as i8).contains(&block.row)
                && (0..BOARD_WIDTH as i8).contains(&block.col)
            {
                grid[block.row as usize][block.col as usize] = Some(block.kind);
            }
        }
        grid
    }
}

impl Renderer for Canvas {
    fn draw_piece(&mut self, kind: PieceKind, cells: &[CellRect]) -> Vec<RenderHandle> {
        let mut handles = Vec::with_capacity(cells.len());
        for cell in cells {
            let handle = RenderHandle(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            self.blocks.insert(
                handle,
                Block {
                    kind,
                    row: cell.row,
                    col: cell.col,
                },
            );
            handles.push(handle);
        }
        handles
    }

    fn move_handles(&mut self, handles: &[RenderHandle], d_row: i8, d_col: i8) {
        for handle in handles {
            if let Some(block) = self.blocks.get_mut(handle) {
                block.row += d_row;
                block.col += d_col;
            }
        }
    }

    fn delete_handle(&mut self, handle: RenderHandle) {
        self.blocks.remove(&handle);
    }

    fn set_guide_positions(&mut self, left_col: i8, right_col: i8) {
        self.guides = Some((left_col, right_col));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_follow_engine_calls() {
        let mut canvas = Canvas::new();
        let handles = canvas.draw_piece(
            PieceKind::T,
            &[CellRect { row: 0, col: 3 }, CellRect { row: 1, col: 4 }],
        );
        assert_eq!(canvas.len(), 2);
        assert_eq!(canvas.block(handles[0]).map(|b| b.col), Some(3));

        canvas.move_handles(&handles, 5, 1);
        let grid = canvas.grid();
        assert_eq!(grid[5][4], Some(PieceKind::T));
        assert_eq!(grid[6][5], Some(PieceKind::T));

        canvas.delete_handle(handles[0]);
        assert_eq!(canvas.len(), 1);
        canvas.delete_handle(handles[0]);
        assert_eq!(canvas.len(), 1);

        canvas.set_guide_positions(4, 6);
        assert_eq!(canvas.guides(), Some((4, 6)));
    }
}
