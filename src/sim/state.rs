//! Session state
//!
//! `GameState` is what a UI drives: it owns the grid, the seeded RNG, the
//! settings and the score. One session, one grid; no shared state.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::cascade::{MatchOutcome, ensure_playable, resolve_swap};
use super::grid::{Grid, GridSnapshot, Pos};
use super::moves::{Move, find_hint};
use crate::scoring::ScoreTracker;
use crate::settings::EngineSettings;

/// A single game session
#[derive(Debug, Clone)]
pub struct GameState<R: Rng = Pcg32> {
    settings: EngineSettings,
    grid: Grid,
    rng: R,
    scores: ScoreTracker,
    /// Swaps that produced a match
    swaps: u32,
}

impl GameState<Pcg32> {
    /// Create a session with a seeded RNG (replayable)
    pub fn new(settings: EngineSettings, seed: u64) -> Self {
        Self::with_rng(settings, Pcg32::seed_from_u64(seed))
    }

    /// Create a session seeded from OS entropy
    pub fn from_entropy(settings: EngineSettings) -> Self {
        Self::with_rng(settings, Pcg32::from_os_rng())
    }
}

impl<R: Rng> GameState<R> {
    /// Create a session around any random source.
    ///
    /// Panics on invalid settings; validate them when loading.
    pub fn with_rng(settings: EngineSettings, mut rng: R) -> Self {
        if let Err(e) = settings.validate() {
            panic!("{e}");
        }
        let mut grid = Grid::new(settings.rows, settings.cols, &mut rng);
        ensure_playable(&mut grid, &mut rng);
        Self {
            settings,
            grid,
            rng,
            scores: ScoreTracker::new(),
            swaps: 0,
        }
    }

    /// Attempt a player swap between two edge-adjacent slots.
    ///
    /// A swap that forms no run is undone before returning, so the session is
    /// unchanged. Panics on out-of-range or non-adjacent slots.
    pub fn try_swap(&mut self, a: Pos, b: Pos) -> MatchOutcome {
        let outcome = resolve_swap(&mut self.grid, &mut self.rng, &self.settings, a, b);
        match &outcome {
            MatchOutcome::NoMatch => self.grid.swap(a, b),
            MatchOutcome::Cascade(result) => {
                self.swaps += 1;
                if self.scores.add(result.score) {
                    log::info!("New best score: {}", self.scores.best);
                }
            }
        }
        outcome
    }

    pub fn has_legal_move(&self) -> bool {
        self.hint().is_some()
    }

    /// A swap that would match, for hint UI
    pub fn hint(&self) -> Option<Move> {
        find_hint(&self.grid)
    }

    /// Fresh grid and zero score; the best score carries over
    pub fn reset(&mut self) {
        self.grid.build(&mut self.rng);
        ensure_playable(&mut self.grid, &mut self.rng);
        self.scores.reset();
        self.swaps = 0;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn score(&self) -> u64 {
        self.scores.score
    }

    pub fn best_score(&self) -> u64 {
        self.scores.best
    }

    pub fn is_new_best(&self) -> bool {
        self.scores.is_new_best
    }

    /// Restore a best score kept by the host
    pub fn set_best_score(&mut self, best: u64) {
        self.scores.seed_best(best);
    }

    pub fn scores(&self) -> &ScoreTracker {
        &self.scores
    }

    /// Swaps that produced a match this session
    pub fn swaps(&self) -> u32 {
        self.swaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_playable() {
        for seed in 0..20 {
            let state = GameState::new(EngineSettings::default(), seed);
            assert!(state.grid().is_settled());
            assert!(state.has_legal_move());
            assert!(crate::sim::find_matches(state.grid()).is_empty());
            assert_eq!(state.score(), 0);
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = GameState::new(EngineSettings::default(), 99);
        let mut b = GameState::new(EngineSettings::default(), 99);
        assert_eq!(a.snapshot(), b.snapshot());

        for _ in 0..5 {
            let hint = a.hint().unwrap();
            assert_eq!(b.hint(), Some(hint));
            assert_eq!(a.try_swap(hint.from, hint.to), b.try_swap(hint.from, hint.to));
        }
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.score(), b.score());
    }

    #[test]
    fn test_failed_swap_is_undone() {
        let mut state = GameState::new(EngineSettings::default(), 4);
        let before = state.snapshot();
        // Swapping a tile with an equal neighbour can never match
        let cols = state.grid().cols();
        let cells = state.grid().cells().to_vec();
        let pair = (0..cells.len()).find_map(|i| {
            let (row, col) = (i / cols, i % cols);
            (col + 1 < cols && cells[i].kind == cells[i + 1].kind)
                .then(|| (Pos::new(row, col), Pos::new(row, col + 1)))
        });
        if let Some((a, b)) = pair {
            assert_eq!(state.try_swap(a, b), MatchOutcome::NoMatch);
            assert_eq!(state.snapshot(), before);
            assert_eq!(state.swaps(), 0);
        }
    }

    #[test]
    fn test_hint_swap_scores() {
        let mut state = GameState::new(EngineSettings::default(), 12);
        let hint = state.hint().unwrap();
        let outcome = state.try_swap(hint.from, hint.to);
        let result = outcome.cascade().unwrap();
        assert!(result.score >= 30);
        assert_eq!(state.score(), result.score);
        assert_eq!(state.best_score(), result.score);
        assert!(state.is_new_best());
        assert_eq!(state.swaps(), 1);
        assert!(state.grid().is_settled());
        assert!(state.has_legal_move());
    }

    #[test]
    fn test_reset_keeps_best() {
        let mut state = GameState::new(EngineSettings::default(), 12);
        state.set_best_score(1_000_000);
        let hint = state.hint().unwrap();
        state.try_swap(hint.from, hint.to);
        assert!(!state.is_new_best());
        let old_ids: Vec<_> = state.grid().cells().iter().map(|c| c.id).collect();

        state.reset();
        assert_eq!(state.score(), 0);
        assert_eq!(state.best_score(), 1_000_000);
        assert!(state.grid().cells().iter().all(|c| !old_ids.contains(&c.id)));
        assert!(state.has_legal_move());
    }

    #[test]
    fn test_custom_dimensions() {
        let settings = EngineSettings {
            rows: 6,
            cols: 10,
            ..EngineSettings::default()
        };
        let state = GameState::new(settings, 1);
        assert_eq!(state.grid().rows(), 6);
        assert_eq!(state.grid().cols(), 10);
        assert_eq!(state.snapshot().cells.len(), 60);
    }

    #[test]
    #[should_panic(expected = "invalid settings")]
    fn test_invalid_settings_panic() {
        let settings = EngineSettings {
            rows: 1,
            ..EngineSettings::default()
        };
        GameState::new(settings, 1);
    }
}
