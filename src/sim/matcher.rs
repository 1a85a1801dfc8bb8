//! Run detection
//!
//! A run is a maximal line of same-kind tiles in a row or a column. Runs of
//! `MIN_RUN` or more are matches. Rows and columns are scanned independently
//! and unioned, so a tile at the crossing of an L or T shape appears once.

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use super::grid::{Grid, TileId};
use super::token::TokenKind;
use crate::consts::MIN_RUN;

/// Ids of tiles flagged for removal (ordered for deterministic iteration)
pub type MatchSet = BTreeSet<TileId>;

/// Every tile that belongs to a run of three or more
pub fn find_matches(grid: &Grid) -> MatchSet {
    let cells = grid.cells();
    let mut matched = MatchSet::new();
    let kind_at = |i: usize| cells[i].kind;
    let mut collect = |run: &[usize]| {
        matched.extend(run.iter().map(|&i| cells[i].id));
        ControlFlow::Continue(())
    };
    let _ = scan_runs(grid.rows(), grid.cols(), &kind_at, &mut collect);
    matched
}

/// Whether a row-major kind-only view contains any run. Stops at the first one.
pub fn kinds_have_run(kinds: &[TokenKind], rows: usize, cols: usize) -> bool {
    debug_assert_eq!(kinds.len(), rows * cols);
    let kind_at = |i: usize| kinds[i];
    let mut stop = |_: &[usize]| ControlFlow::Break(());
    scan_runs(rows, cols, &kind_at, &mut stop).is_break()
}

/// Visit the slot indices of every run, rows left-to-right first, then
/// columns top-to-bottom.
fn scan_runs(
    rows: usize,
    cols: usize,
    kind_at: &impl Fn(usize) -> TokenKind,
    visit: &mut impl FnMut(&[usize]) -> ControlFlow<()>,
) -> ControlFlow<()> {
    let mut line = Vec::with_capacity(rows.max(cols));
    for row in 0..rows {
        line.clear();
        line.extend((0..cols).map(|col| row * cols + col));
        scan_line(&line, kind_at, visit)?;
    }
    for col in 0..cols {
        line.clear();
        line.extend((0..rows).map(|row| row * cols + col));
        scan_line(&line, kind_at, visit)?;
    }
    ControlFlow::Continue(())
}

fn scan_line(
    line: &[usize],
    kind_at: &impl Fn(usize) -> TokenKind,
    visit: &mut impl FnMut(&[usize]) -> ControlFlow<()>,
) -> ControlFlow<()> {
    let mut start = 0;
    while start < line.len() {
        let kind = kind_at(line[start]);
        let mut end = start + 1;
        while end < line.len() && kind_at(line[end]) == kind {
            end += 1;
        }
        if end - start >= MIN_RUN {
            visit(&line[start..end])?;
        }
        start = end;
    }
    ControlFlow::Continue(())
}
