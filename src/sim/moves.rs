//! Legal move search
//!
//! Works on a kind-only copy of the grid, so the real tiles (and their ids)
//! are never touched. Only meaningful on a settled grid.

use serde::{Deserialize, Serialize};

use super::grid::{Grid, Pos};
use super::matcher::kinds_have_run;

/// An adjacent swap that would create a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Pos,
    pub to: Pos,
}

/// First legal swap in row-major order, trying the right neighbour before the
/// one below
pub fn find_hint(grid: &Grid) -> Option<Move> {
    debug_assert!(grid.is_settled(), "move search on an unsettled grid");
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut kinds = grid.kinds();

    for row in 0..rows {
        for col in 0..cols {
            let here = row * cols + col;
            let neighbours = [
                (col + 1 < cols).then(|| (here + 1, Pos::new(row, col + 1))),
                (row + 1 < rows).then(|| (here + cols, Pos::new(row + 1, col))),
            ];
            for (there, to) in neighbours.into_iter().flatten() {
                if kinds[here] == kinds[there] {
                    continue;
                }
                kinds.swap(here, there);
                let hit = kinds_have_run(&kinds, rows, cols);
                kinds.swap(here, there);
                if hit {
                    return Some(Move {
                        from: Pos::new(row, col),
                        to,
                    });
                }
            }
        }
    }
    None
}

/// Whether any single adjacent swap creates a match
pub fn has_legal_move(grid: &Grid) -> bool {
    find_hint(grid).is_some()
}
