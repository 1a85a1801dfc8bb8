//! Match Cascade - a deterministic tile-matching resolution engine
//!
//! Core modules:
//! - `sim`: Deterministic engine (grid, match detection, bombs, cascades, move validation)
//! - `scoring`: Chain scoring, running/best score tracking, timer bonus formula
//! - `settings`: Data-driven engine configuration
//! - `web`: wasm-bindgen shell for a browser UI (wasm32 only)

pub mod scoring;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use scoring::{ScoreTracker, apply_time_bonus, round_points, time_bonus};
pub use settings::{EngineSettings, SettingsError};
pub use sim::{CascadeResult, GameState, Grid, MatchOutcome, Move, Pos, TileId, TokenKind};

/// Engine constants
pub mod consts {
    /// Default grid height
    pub const DEFAULT_ROWS: usize = 8;
    /// Default grid width
    pub const DEFAULT_COLS: usize = 8;
    /// Smallest grid edge the settings accept
    pub const MIN_DIMENSION: usize = 4;
    /// Largest grid edge the settings accept
    pub const MAX_DIMENSION: usize = 32;

    /// Shortest run that counts as a match
    pub const MIN_RUN: usize = 3;

    /// Points per matched tile before the chain multiplier
    pub const POINTS_PER_TILE: u64 = 10;
    /// Chain index at which refills start carrying a bomb
    pub const BOMB_CHAIN_THRESHOLD: u32 = 4;
    /// Bomb blast reach in cells (1 = 3x3 neighbourhood)
    pub const BOMB_RADIUS: isize = 1;

    /// Countdown ceiling the timer collaborator clamps bonuses to (seconds)
    pub const TIME_CAP_SECS: f32 = 60.0;
    /// Below this many seconds left, rounds earn the larger base bonus
    pub const LOW_TIME_SECS: f32 = 10.0;
}

/// Manhattan distance between two grid slots
#[inline]
pub fn manhattan(a: Pos, b: Pos) -> usize {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}
