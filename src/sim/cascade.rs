//! Cascade resolution
//!
//! One player swap drives a loop of rounds:
//! Matching -> (Expanding) -> Removing -> Scoring -> Settling -> Matching ...
//! until a scan finds nothing (Stable). The settled grid is then checked for a
//! legal move and rebuilt if there is none. Every step runs to completion;
//! pacing between rounds belongs to the caller.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bomb::{BombExpansion, Wave, expand};
use super::grid::{Grid, Pos, TileId};
use super::matcher::find_matches;
use super::moves::has_legal_move;
use crate::scoring::round_points;
use crate::settings::EngineSettings;

/// Resolver phases, traced at `trace` level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadePhase {
    Idle,
    Matching,
    Expanding,
    Removing,
    Scoring,
    Settling,
    Stable,
}

/// What happened in one round of a cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    /// 1-based chain index (the score multiplier)
    pub chain: u32,
    /// Tiles in runs, before bomb expansion
    pub raw_matches: usize,
    /// Tiles actually cleared, including bomb blasts
    pub removed: usize,
    pub points: u64,
    pub bomb_fired: bool,
    /// Detonations this round, in scan order
    pub waves: Vec<Wave>,
    /// Bomb dropped in with this round's refill
    pub bomb_spawned: Option<TileId>,
}

/// Summary of a full cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeResult {
    /// Number of rounds resolved
    pub chain_depth: u32,
    /// Total points over all rounds
    pub score: u64,
    /// Any round detonated a bomb
    pub bomb_fired: bool,
    pub rounds: Vec<RoundReport>,
    /// The settled grid had no legal move and was rebuilt
    pub reshuffled: bool,
}

impl CascadeResult {
    /// All detonation waves across rounds, in order
    pub fn waves(&self) -> impl Iterator<Item = &Wave> {
        self.rounds.iter().flat_map(|r| r.waves.iter())
    }
}

/// Result of a swap attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// The swap formed no run
    NoMatch,
    Cascade(CascadeResult),
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Cascade(_))
    }

    pub fn cascade(&self) -> Option<&CascadeResult> {
        match self {
            MatchOutcome::Cascade(result) => Some(result),
            MatchOutcome::NoMatch => None,
        }
    }
}

/// Swap two adjacent tiles and resolve whatever follows.
///
/// On [`MatchOutcome::NoMatch`] the swap is left in place; undoing it is up to
/// the caller. Panics when either slot is out of range or the slots are not
/// edge-adjacent, since that means the UI broke its contract.
pub fn resolve_swap<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    settings: &EngineSettings,
    a: Pos,
    b: Pos,
) -> MatchOutcome {
    assert!(
        grid.in_bounds(a) && grid.in_bounds(b),
        "swap {a:?} <-> {b:?} outside {}x{} grid",
        grid.rows(),
        grid.cols()
    );
    assert!(a.is_adjacent(b), "swap {a:?} <-> {b:?} is not between neighbours");

    grid.swap(a, b);
    if find_matches(grid).is_empty() {
        log::debug!("Swap {a:?} <-> {b:?} made no match");
        return MatchOutcome::NoMatch;
    }
    MatchOutcome::Cascade(resolve_cascade(grid, rng, settings))
}

/// Resolve rounds until the grid is stable, then make sure it is playable
pub fn resolve_cascade<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    settings: &EngineSettings,
) -> CascadeResult {
    let mut phase = CascadePhase::Idle;
    let mut rounds: Vec<RoundReport> = Vec::new();
    let mut chain: u32 = 1;

    loop {
        enter(&mut phase, CascadePhase::Matching);
        let raw = find_matches(grid);
        if raw.is_empty() {
            break;
        }

        let bomb_fired = grid
            .cells()
            .iter()
            .any(|c| c.is_bomb && raw.contains(&c.id));
        let BombExpansion { expanded, waves } = if bomb_fired {
            enter(&mut phase, CascadePhase::Expanding);
            expand(grid, &raw)
        } else {
            BombExpansion {
                expanded: raw.clone(),
                waves: Vec::new(),
            }
        };

        enter(&mut phase, CascadePhase::Removing);
        grid.mark_matched(&expanded);

        enter(&mut phase, CascadePhase::Scoring);
        let points = round_points(raw.len(), chain, settings.points_per_tile);

        enter(&mut phase, CascadePhase::Settling);
        grid.apply_gravity_and_refill(rng);
        // Deep chains reward the next round with a bomb in the falling tiles
        let bomb_spawned = if chain + 1 >= settings.bomb_chain_threshold {
            grid.spawn_bomb(rng)
        } else {
            None
        };
        grid.settle_new_tiles();

        log::debug!(
            "Chain {}: {} matched, {} cleared, +{} points{}",
            chain,
            raw.len(),
            expanded.len(),
            points,
            if bomb_fired { " (bomb)" } else { "" }
        );
        rounds.push(RoundReport {
            chain,
            raw_matches: raw.len(),
            removed: expanded.len(),
            points,
            bomb_fired,
            waves,
            bomb_spawned,
        });
        chain += 1;
    }

    enter(&mut phase, CascadePhase::Stable);
    let reshuffled = ensure_playable(grid, rng);

    let result = CascadeResult {
        chain_depth: rounds.len() as u32,
        score: rounds.iter().map(|r| r.points).sum(),
        bomb_fired: rounds.iter().any(|r| r.bomb_fired),
        rounds,
        reshuffled,
    };
    log::debug!(
        "Cascade settled: depth {}, score {}, reshuffled {}",
        result.chain_depth,
        result.score,
        result.reshuffled
    );
    result
}

/// Rebuild the grid until some swap makes a match. Returns whether it rebuilt.
pub fn ensure_playable<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> bool {
    let mut reshuffled = false;
    while !has_legal_move(grid) {
        log::info!("No legal moves left, reshuffling");
        grid.build(rng);
        reshuffled = true;
    }
    reshuffled
}

fn enter(phase: &mut CascadePhase, next: CascadePhase) {
    log::trace!("{:?} -> {:?}", phase, next);
    *phase = next;
}
