//! Scoring
//!
//! Chain scoring for cascade rounds, the running/best score of a session, and
//! the countdown bonus formula handed to the timer that lives outside the engine.

use serde::{Deserialize, Serialize};

use crate::consts::{LOW_TIME_SECS, MIN_RUN, TIME_CAP_SECS};
use crate::sim::RoundReport;

/// Points for one cascade round: raw matched tiles x per-tile value x chain index.
///
/// Bomb-cleared extras are not counted; `raw` is the pre-expansion match count.
#[inline]
pub fn round_points(raw: usize, chain: u32, points_per_tile: u64) -> u64 {
    raw as u64 * points_per_tile * u64::from(chain)
}

/// Seconds a round adds to the external countdown.
///
/// The engine only computes this; the timer applies it and clamps to
/// [`TIME_CAP_SECS`] (see [`apply_time_bonus`]).
pub fn time_bonus(round: &RoundReport, time_remaining: f32) -> f32 {
    let base = if time_remaining <= LOW_TIME_SECS { 1.5 } else { 0.5 };
    let mut bonus = base + round.raw_matches.saturating_sub(MIN_RUN) as f32 * 0.5;
    if round.chain > 1 {
        bonus += (round.chain - 1) as f32;
    }
    if round.bomb_fired {
        bonus += 1.0;
    }
    bonus
}

/// Countdown value after a round's bonus
pub fn apply_time_bonus(round: &RoundReport, time_remaining: f32) -> f32 {
    (time_remaining + time_bonus(round, time_remaining)).min(TIME_CAP_SECS)
}

/// Running score of a session plus the best seen so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    pub score: u64,
    pub best: u64,
    /// The current session has beaten the best it started with
    #[serde(skip)]
    pub is_new_best: bool,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a best score restored by the host
    pub fn with_best(best: u64) -> Self {
        Self {
            best,
            ..Self::default()
        }
    }

    /// Add points; returns true the first time this session passes the best
    pub fn add(&mut self, points: u64) -> bool {
        self.score += points;
        if self.score > self.best {
            self.best = self.score;
            let first = !self.is_new_best;
            self.is_new_best = true;
            return first;
        }
        false
    }

    /// New session: score back to zero, best kept
    pub fn reset(&mut self) {
        self.score = 0;
        self.is_new_best = false;
    }

    /// Overwrite the best score (e.g. restored from storage). Never lowers it
    /// below the live score.
    pub fn seed_best(&mut self, best: u64) {
        self.best = best.max(self.score);
    }
}
