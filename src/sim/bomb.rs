//! Bomb area-of-effect expansion
//!
//! A matched bomb clears its 3x3 neighbourhood (clipped at the edges). Bombs
//! caught in a blast detonate too, so expansion repeats full row-major scans
//! until one scan detonates nothing new. The removal set only grows and is
//! bounded by the grid, so this terminates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::grid::{Grid, Pos, TileId};
use super::matcher::MatchSet;
use crate::consts::BOMB_RADIUS;

/// One detonation, kept for staged presentation only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wave {
    /// Slot of the bomb that went off
    pub center: Pos,
    /// Every tile in its blast, including the bomb itself
    pub tiles: MatchSet,
}

/// Result of [`expand`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BombExpansion {
    /// Initial matches plus everything caught in a blast
    pub expanded: MatchSet,
    /// Detonations in scan order (not causal order)
    pub waves: Vec<Wave>,
}

/// Grow `initial` through every matched bomb's neighbourhood, transitively
pub fn expand(grid: &Grid, initial: &MatchSet) -> BombExpansion {
    let cols = grid.cols();
    let mut expanded = initial.clone();
    let mut processed: BTreeSet<TileId> = BTreeSet::new();
    let mut waves = Vec::new();

    loop {
        let mut detonated = false;
        for (i, cell) in grid.cells().iter().enumerate() {
            if !cell.is_bomb || !expanded.contains(&cell.id) || !processed.insert(cell.id) {
                continue;
            }
            let center = Pos::new(i / cols, i % cols);
            let tiles = blast_area(grid, center);
            expanded.extend(tiles.iter().copied());
            waves.push(Wave { center, tiles });
            detonated = true;
        }
        if !detonated {
            break;
        }
    }

    if !waves.is_empty() {
        log::debug!(
            "{} bomb(s) expanded {} matches to {}",
            waves.len(),
            initial.len(),
            expanded.len()
        );
    }
    BombExpansion { expanded, waves }
}

/// Ids in the square of `BOMB_RADIUS` around `center`, clipped to the grid
fn blast_area(grid: &Grid, center: Pos) -> MatchSet {
    let mut tiles = MatchSet::new();
    for dr in -BOMB_RADIUS..=BOMB_RADIUS {
        for dc in -BOMB_RADIUS..=BOMB_RADIUS {
            let (Some(row), Some(col)) = (
                center.row.checked_add_signed(dr),
                center.col.checked_add_signed(dc),
            ) else {
                continue;
            };
            if let Some(cell) = grid.get(Pos::new(row, col)) {
                tiles.insert(cell.id);
            }
        }
    }
    tiles
}
