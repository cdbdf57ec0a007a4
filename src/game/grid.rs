//! The hexagonal grid that holds all bubbles.
//!
//! A fixed-size dense array of cells, `bubbles_per_row` wide and `rows` tall,
//! indexed by `col + row * bubbles_per_row`. Row 0 is the ceiling. There is no
//! implicit resizing: positions outside the bounds never reach the array.

use super::{bubble::BubbleColor, hex::GridPos};

/// The bounds of the playable grid area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub bubbles_per_row: i32,
    pub rows: i32,
}

impl GridBounds {
    pub const fn new(bubbles_per_row: i32, rows: i32) -> Self {
        Self {
            bubbles_per_row,
            rows,
        }
    }

    /// Check if a position is within bounds.
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.col >= 0 && pos.col < self.bubbles_per_row && pos.row >= 0 && pos.row < self.rows
    }

    /// Flat array index of a position, `None` when out of bounds.
    pub fn index(&self, pos: GridPos) -> Option<usize> {
        self.contains(pos)
            .then(|| (pos.col + pos.row * self.bubbles_per_row) as usize)
    }

    pub fn cell_count(&self) -> usize {
        (self.bubbles_per_row.max(0) * self.rows.max(0)) as usize
    }

    /// Iterate over all valid positions, row by row.
    pub fn iter(&self) -> impl Iterator<Item = GridPos> + use<> {
        let bubbles_per_row = self.bubbles_per_row;
        (0..self.rows)
            .flat_map(move |row| (0..bubbles_per_row).map(move |col| GridPos::new(col, row)))
    }

    /// The ceiling row, where reachability flood fills start.
    pub fn ceiling(&self) -> impl Iterator<Item = GridPos> + use<> {
        (0..self.bubbles_per_row).map(|col| GridPos::new(col, 0))
    }
}

/// One slot of the board.
///
/// `generation` is a watermark, not a count: a cell whose generation matches the
/// board's current generation was reached from the ceiling in the last sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCell {
    pub occupant: Option<BubbleColor>,
    pub generation: u32,
}

impl GridCell {
    pub const EMPTY: Self = Self {
        occupant: None,
        generation: 0,
    };

    pub const fn occupied(color: BubbleColor, generation: u32) -> Self {
        Self {
            occupant: Some(color),
            generation,
        }
    }

    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// The board's bubble storage.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleGrid {
    cells: Vec<GridCell>,
    bounds: GridBounds,
}

impl BubbleGrid {
    /// Create an empty grid.
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            cells: vec![GridCell::EMPTY; bounds.cell_count()],
            bounds,
        }
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// The cell at a position, `None` when out of bounds.
    pub fn get(&self, pos: GridPos) -> Option<&GridCell> {
        self.bounds.index(pos).map(|index| &self.cells[index])
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut GridCell> {
        self.bounds.index(pos).map(|index| &mut self.cells[index])
    }

    /// Overwrite the cell at a position.
    ///
    /// Writing outside the bounds is a programming error: it panics in debug
    /// builds and is ignored in release builds.
    pub fn set(&mut self, pos: GridPos, cell: GridCell) {
        debug_assert!(self.bounds.contains(pos), "grid write out of bounds at {pos}");
        if let Some(slot) = self.get_mut(pos) {
            *slot = cell;
        }
    }

    /// The bubble at a position, if any. Out of bounds reads as empty.
    pub fn occupant(&self, pos: GridPos) -> Option<BubbleColor> {
        self.get(pos).and_then(|cell| cell.occupant)
    }

    /// Check if a cell is occupied. Out of bounds reads as empty.
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.occupant(pos).is_some()
    }

    /// Put a bubble into a cell, stamped with `generation`.
    pub fn place(&mut self, pos: GridPos, color: BubbleColor, generation: u32) {
        self.set(pos, GridCell::occupied(color, generation));
    }

    /// Empty a cell, returning the bubble that was there.
    pub fn remove(&mut self, pos: GridPos) -> Option<BubbleColor> {
        self.get_mut(pos).and_then(|cell| cell.occupant.take())
    }

    /// Empty every cell and reset generations.
    pub fn clear(&mut self) {
        self.cells.fill(GridCell::EMPTY);
    }

    /// Get the number of bubbles in the grid.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_occupied()).count()
    }

    /// Check if the grid has no bubbles.
    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(GridCell::is_occupied)
    }

    /// Iterate over all cells with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &GridCell)> {
        self.bounds.iter().zip(self.cells.iter())
    }

    /// Iterate over occupied cells.
    pub fn bubbles(&self) -> impl Iterator<Item = (GridPos, BubbleColor)> + '_ {
        self.iter()
            .filter_map(|(pos, cell)| cell.occupant.map(|color| (pos, color)))
    }

    /// Get the lowest row (highest row index) that has bubbles.
    pub fn lowest_row(&self) -> Option<i32> {
        self.bubbles().map(|(pos, _)| pos.row).max()
    }
}
