//! Grid of tiles and the operations that move them
//!
//! Tiles carry a stable [`TileId`] so a consumer can tell "the same tile moved"
//! apart from "a new tile appeared". Storage is a flat row-major `Vec<Cell>`:
//! `cells[row * cols + col]`.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::matcher::MatchSet;
use super::token::TokenKind;
use crate::consts::MIN_RUN;

/// Stable identity of a tile, independent of the slot it occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u64);

/// A slot coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True when the two slots share an edge
    #[inline]
    pub fn is_adjacent(self, other: Pos) -> bool {
        crate::manhattan(self, other) == 1
    }
}

/// A single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: TileId,
    pub kind: TokenKind,
    /// Current row; negative while the tile is still descending from above the grid
    pub row: i32,
    pub col: usize,
    /// Flagged for removal in the current round
    pub is_matched: bool,
    /// Detonates its 3x3 neighbourhood when matched
    pub is_bomb: bool,
}

impl Cell {
    fn new(id: TileId, kind: TokenKind, row: i32, col: usize) -> Self {
        Self {
            id,
            kind,
            row,
            col,
            is_matched: false,
            is_bomb: false,
        }
    }

    /// Spawned by a refill and not yet snapped into its slot
    #[inline]
    pub fn is_descending(&self) -> bool {
        self.row < 0
    }
}

/// Read-only copy of the grid for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub rows: usize,
    pub cols: usize,
    /// Row-major cells
    pub cells: Vec<Cell>,
}

/// Fixed-size rectangular grid of tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    /// Next tile id to hand out (never reused within a grid)
    next_id: u64,
}

impl Grid {
    /// Create and fill a grid with no pre-existing runs
    pub fn new<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let mut grid = Self::empty(rows, cols);
        grid.build(rng);
        grid
    }

    /// Create a grid from explicit row-major kinds.
    ///
    /// Runs are not rejected here; fixtures and replays may need them.
    pub fn from_kinds(rows: usize, cols: usize, kinds: &[TokenKind]) -> Self {
        assert_eq!(
            kinds.len(),
            rows * cols,
            "expected {} kinds for a {}x{} grid",
            rows * cols,
            rows,
            cols
        );
        let mut grid = Self::empty(rows, cols);
        for (idx, &kind) in kinds.iter().enumerate() {
            let id = grid.alloc_id();
            grid.cells
                .push(Cell::new(id, kind, (idx / cols) as i32, idx % cols));
        }
        grid
    }

    /// Parse a grid from one string of kind letters per row (see [`TokenKind::letter`]).
    ///
    /// Returns `None` on ragged rows or unknown letters.
    pub fn from_letters(rows: &[&str]) -> Option<Self> {
        let cols = rows.first()?.chars().count();
        let mut kinds = Vec::with_capacity(rows.len() * cols);
        for line in rows {
            if line.chars().count() != cols {
                return None;
            }
            for c in line.chars() {
                kinds.push(TokenKind::from_letter(c)?);
            }
        }
        Some(Self::from_kinds(rows.len(), cols, &kinds))
    }

    fn empty(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "grid must have at least one cell");
        Self {
            rows,
            cols,
            cells: Vec::with_capacity(rows * cols),
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Refill every slot with fresh tiles such that no run of three exists.
    ///
    /// Also used as the reshuffle when a settled grid has no legal move.
    pub fn build<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cells.clear();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let kind = self.pick_kind_avoiding_runs(row, col, rng);
                let id = self.alloc_id();
                self.cells.push(Cell::new(id, kind, row as i32, col));
            }
        }
        log::info!("Built {}x{} grid (next id {})", self.rows, self.cols, self.next_id);
    }

    /// Pick a kind that doesn't complete a run with the two cells to the left
    /// or the two cells above. Cells are placed row-major, so both windows are
    /// already filled.
    fn pick_kind_avoiding_runs<R: Rng + ?Sized>(
        &self,
        row: usize,
        col: usize,
        rng: &mut R,
    ) -> TokenKind {
        let reach = MIN_RUN - 1;
        let left = (col >= reach)
            .then(|| self.window_kind((0..reach).map(|d| (row, col - 1 - d))))
            .flatten();
        let above = (row >= reach)
            .then(|| self.window_kind((0..reach).map(|d| (row - 1 - d, col))))
            .flatten();

        let candidates: Vec<TokenKind> = TokenKind::ALL
            .into_iter()
            .filter(|k| Some(*k) != left && Some(*k) != above)
            .collect();
        assert!(!candidates.is_empty(), "token set has no legal kind left");
        candidates[rng.random_range(0..candidates.len())]
    }

    /// The shared kind of a window of already placed cells, if they all agree
    fn window_kind(&self, mut slots: impl Iterator<Item = (usize, usize)>) -> Option<TokenKind> {
        let (r, c) = slots.next()?;
        let kind = self.cells[r * self.cols + c].kind;
        slots
            .all(|(r, c)| self.cells[r * self.cols + c].kind == kind)
            .then_some(kind)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    fn idx(&self, pos: Pos) -> usize {
        assert!(
            self.in_bounds(pos),
            "position ({}, {}) outside {}x{} grid",
            pos.row,
            pos.col,
            self.rows,
            self.cols
        );
        pos.row * self.cols + pos.col
    }

    /// Cell in a slot. Panics when out of range.
    #[inline]
    pub fn cell(&self, pos: Pos) -> &Cell {
        &self.cells[self.idx(pos)]
    }

    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.in_bounds(pos).then(|| &self.cells[pos.row * self.cols + pos.col])
    }

    /// All cells, row-major
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Kind-only row-major view
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.cells.iter().map(|c| c.kind).collect()
    }

    /// Locate a tile by id
    pub fn find(&self, id: TileId) -> Option<(Pos, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .find(|(_, c)| c.id == id)
            .map(|(i, c)| (Pos::new(i / self.cols, i % self.cols), c))
    }

    /// Exchange two tiles. Ids travel with the tiles; coordinates follow the slots.
    ///
    /// No adjacency check: that is the caller's contract.
    pub fn swap(&mut self, a: Pos, b: Pos) {
        let ia = self.idx(a);
        let ib = self.idx(b);
        self.cells.swap(ia, ib);
        for (i, pos) in [(ia, a), (ib, b)] {
            self.cells[i].row = pos.row as i32;
            self.cells[i].col = pos.col;
        }
    }

    /// Flag every listed tile for removal. Idempotent.
    pub fn mark_matched(&mut self, ids: &MatchSet) {
        for cell in self.cells.iter_mut() {
            if ids.contains(&cell.id) {
                cell.is_matched = true;
            }
        }
    }

    /// Drop surviving tiles to the bottom of each column (keeping their order)
    /// and fill the gap above with new descending tiles.
    ///
    /// New tiles get `row = slot_row - vacated`, so the top one sits furthest
    /// above the visible grid. Returns the number of tiles spawned.
    pub fn apply_gravity_and_refill<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut spawned = 0;
        for col in 0..self.cols {
            // Bottom-most first
            let surviving: Vec<Cell> = (0..self.rows)
                .rev()
                .map(|row| self.cells[row * self.cols + col])
                .filter(|c| !c.is_matched)
                .collect();

            let vacated = self.rows - surviving.len();
            for (i, mut cell) in surviving.into_iter().enumerate() {
                let row = self.rows - 1 - i;
                cell.row = row as i32;
                cell.col = col;
                self.cells[row * self.cols + col] = cell;
            }

            for row in 0..vacated {
                let id = self.alloc_id();
                let kind = TokenKind::ALL[rng.random_range(0..TokenKind::ALL.len())];
                self.cells[row * self.cols + col] =
                    Cell::new(id, kind, row as i32 - vacated as i32, col);
            }
            spawned += vacated;
        }
        spawned
    }

    /// Snap every descending tile into its slot row. Returns how many moved.
    pub fn settle_new_tiles(&mut self) -> usize {
        let cols = self.cols;
        let mut settled = 0;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            if cell.is_descending() {
                cell.row = (i / cols) as i32;
                settled += 1;
            }
        }
        settled
    }

    /// Turn one random descending tile into a bomb. No-op when none are descending.
    pub fn spawn_bomb<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TileId> {
        let descending: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_descending())
            .map(|(i, _)| i)
            .collect();
        if descending.is_empty() {
            return None;
        }
        let idx = descending[rng.random_range(0..descending.len())];
        self.cells[idx].is_bomb = true;
        Some(self.cells[idx].id)
    }

    /// Arm the tile in a specific slot as a bomb
    pub fn place_bomb(&mut self, pos: Pos) {
        let idx = self.idx(pos);
        self.cells[idx].is_bomb = true;
    }

    /// No matched and no descending tiles
    pub fn is_settled(&self) -> bool {
        self.cells
            .iter()
            .all(|c| !c.is_matched && !c.is_descending())
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.clone(),
        }
    }
}

impl fmt::Display for Grid {
    /// One line per row of kind letters; bombs print lowercase
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for cell in row {
                let c = cell.kind.letter();
                let c = if cell.is_bomb { c.to_ascii_lowercase() } else { c };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
