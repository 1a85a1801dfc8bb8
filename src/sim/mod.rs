//! Deterministic engine module
//!
//! All matching logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (injected, never ambient)
//! - Stable iteration order (row-major scans, ordered id sets)
//! - No timer, rendering or platform dependencies

pub mod bomb;
pub mod cascade;
pub mod grid;
pub mod matcher;
pub mod moves;
pub mod state;
pub mod token;

pub use bomb::{BombExpansion, Wave, expand};
pub use cascade::{
    CascadePhase, CascadeResult, MatchOutcome, RoundReport, ensure_playable, resolve_cascade,
    resolve_swap,
};
pub use grid::{Cell, Grid, GridSnapshot, Pos, TileId};
pub use matcher::{MatchSet, find_matches, kinds_have_run};
pub use moves::{Move, find_hint, has_legal_move};
pub use state::GameState;
pub use token::TokenKind;
