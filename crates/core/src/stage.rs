//! Stage module - manages the game grid
//!
//! The stage is a 10x20 grid where each cell is empty, settling (painted by the
//! falling piece) or merged (locked for good). Uses a flat array for better cache
//! locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Rows above the grid (negative y) are legal for pieces but are never stored.

use arrayvec::ArrayVec;

use crate::shapes::Shape;
use crate::types::{Cell, CellState, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the stage
const STAGE_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Row indices of the stage (capacity covers every row)
pub type RowList = ArrayVec<u8, { BOARD_HEIGHT as usize }>;

/// The game stage - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; STAGE_SIZE],
}

impl Stage {
    /// Create a new empty stage
    pub fn new() -> Self {
        Self {
            cells: [Cell::EMPTY; STAGE_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// One row of cells, left to right
    pub fn row(&self, y: usize) -> &[Cell] {
        let width = BOARD_WIDTH as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// Whether `shape` with its origin at (x, y), shifted by (dx, dy), would
    /// leave the side walls, pass the floor, or overlap a merged cell.
    ///
    /// Cells above the top row (negative y) never collide as long as they are
    /// horizontally in bounds.
    pub fn collides(&self, shape: &Shape, x: i8, y: i8, dx: i8, dy: i8) -> bool {
        shape.cells().any(|(cx, cy)| {
            let px = x as i16 + cx as i16 + dx as i16;
            let py = y as i16 + cy as i16 + dy as i16;
            if px < 0 || px >= BOARD_WIDTH as i16 || py >= BOARD_HEIGHT as i16 {
                return true;
            }
            if py < 0 {
                return false;
            }
            self.cells[py as usize * BOARD_WIDTH as usize + px as usize].is_merged()
        })
    }

    /// Lowest row the origin can reach by moving straight down from `y`
    pub fn landing_row(&self, shape: &Shape, x: i8, y: i8) -> i8 {
        let mut landing = y;
        while landing < BOARD_HEIGHT as i8 && !self.collides(shape, x, landing, 0, 1) {
            landing += 1;
        }
        landing
    }

    /// Paint every occupied shape cell that lies on the grid.
    ///
    /// Settling paint never covers a merged cell.
    pub fn stamp(&mut self, shape: &Shape, x: i8, y: i8, kind: PieceKind, state: CellState) {
        let cell = match state {
            CellState::Empty => Cell::EMPTY,
            CellState::Settling => Cell::settling(kind),
            CellState::Merged => Cell::merged(kind),
        };
        for (cx, cy) in shape.cells() {
            let Some(idx) = Self::index(x.saturating_add(cx), y.saturating_add(cy)) else {
                continue;
            };
            if state == CellState::Settling && self.cells[idx].is_merged() {
                continue;
            }
            self.cells[idx] = cell;
        }
    }

    /// Reset every settling cell to empty
    pub fn clear_settling(&mut self) {
        for cell in &mut self.cells {
            if cell.state == CellState::Settling {
                *cell = Cell::EMPTY;
            }
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        self.row(y).iter().all(|cell| cell.kind.is_some())
    }

    /// Indices of all full rows, top to bottom
    pub fn full_rows(&self) -> RowList {
        (0..BOARD_HEIGHT)
            .filter(|&y| self.is_row_full(y as usize))
            .collect()
    }

    /// Remove an arbitrary set of rows, compacting the rest downward in order,
    /// and refill the top with empty rows.
    ///
    /// Uses a two-pointer pass with zero allocation. Returns the number of rows removed.
    pub fn remove_rows(&mut self, rows: &[u8]) -> usize {
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        // Scan from bottom to top
        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if rows.contains(&(read_y as u8)) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = Cell::EMPTY;
        }

        write_y
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy into a 2D array (rows of cells)
    pub fn write_grid(&self, out: &mut [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        for (y, row) in out.iter_mut().enumerate() {
            row.copy_from_slice(self.row(y));
        }
    }

    /// Clear the entire stage
    pub fn clear(&mut self) {
        self.cells = [Cell::EMPTY; STAGE_SIZE];
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}
