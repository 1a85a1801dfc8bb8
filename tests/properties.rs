//! Engine invariants under random seeds and random play

use std::collections::HashSet;

use match_cascade::sim::{
    Grid, MatchOutcome, MatchSet, Pos, TileId, expand, find_matches, has_legal_move,
};
use match_cascade::{EngineSettings, GameState};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn unique_ids(grid: &Grid) -> bool {
    let ids: HashSet<TileId> = grid.cells().iter().map(|c| c.id).collect();
    ids.len() == grid.cells().len()
}

/// A slot plus one of its in-range right/down neighbours
fn neighbour(rows: usize, cols: usize, row: usize, col: usize, down: bool) -> Option<(Pos, Pos)> {
    let from = Pos::new(row % rows, col % cols);
    let to = if down {
        Pos::new(from.row + 1, from.col)
    } else {
        Pos::new(from.row, from.col + 1)
    };
    (to.row < rows && to.col < cols).then_some((from, to))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_built_grid_has_no_runs(seed in any::<u64>(), rows in 4usize..=12, cols in 4usize..=12) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = Grid::new(rows, cols, &mut rng);
        prop_assert!(find_matches(&grid).is_empty());
        prop_assert!(grid.is_settled());
        prop_assert!(unique_ids(&grid));
    }

    #[test]
    fn prop_random_play_stays_settled_and_playable(
        seed in any::<u64>(),
        swaps in prop::collection::vec((0usize..8, 0usize..8, any::<bool>()), 1..24),
    ) {
        let mut state = GameState::new(EngineSettings::default(), seed);
        for (row, col, down) in swaps {
            let Some((a, b)) = neighbour(8, 8, row, col, down) else { continue };
            let before = state.snapshot();
            let score_before = state.score();
            match state.try_swap(a, b) {
                MatchOutcome::NoMatch => {
                    prop_assert_eq!(state.snapshot(), before);
                    prop_assert_eq!(state.score(), score_before);
                }
                MatchOutcome::Cascade(result) => {
                    prop_assert!(result.chain_depth >= 1);
                    prop_assert_eq!(state.score(), score_before + result.score);
                    let expected: u64 = result
                        .rounds
                        .iter()
                        .map(|r| r.raw_matches as u64 * 10 * u64::from(r.chain))
                        .sum();
                    prop_assert_eq!(result.score, expected);
                    prop_assert_eq!(
                        result.bomb_fired,
                        result.rounds.iter().any(|r| r.bomb_fired)
                    );
                }
            }
            let grid = state.grid();
            prop_assert!(grid.is_settled());
            prop_assert!(find_matches(grid).is_empty());
            prop_assert!(has_legal_move(grid));
            prop_assert!(unique_ids(grid));
        }
    }

    #[test]
    fn prop_hint_always_matches(seed in any::<u64>(), turns in 1usize..12) {
        let mut state = GameState::new(EngineSettings::default(), seed);
        for _ in 0..turns {
            let hint = state.hint();
            prop_assert!(hint.is_some());
            let hint = hint.unwrap();
            prop_assert!(state.try_swap(hint.from, hint.to).is_match());
        }
        prop_assert_eq!(state.swaps() as usize, turns);
    }

    #[test]
    fn prop_equal_kind_swap_never_matches(seed in any::<u64>(), row in 0usize..8, col in 0usize..8, down in any::<bool>()) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut grid = Grid::new(8, 8, &mut rng);
        if let Some((a, b)) = neighbour(8, 8, row, col, down) {
            let kind = grid.cell(a).kind;
            // Force the neighbour to the same kind by rebuilding from kinds
            let mut kinds = grid.kinds();
            kinds[b.row * 8 + b.col] = kind;
            grid = Grid::from_kinds(8, 8, &kinds);
            let had_matches = find_matches(&grid);
            grid.swap(a, b);
            prop_assert_eq!(find_matches(&grid).len(), had_matches.len());
        }
    }

    #[test]
    fn prop_mark_matched_idempotent(seed in any::<u64>(), picks in prop::collection::vec(0usize..64, 0..20)) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut grid = Grid::new(8, 8, &mut rng);
        let set: MatchSet = picks.iter().map(|&i| grid.cells()[i].id).collect();
        grid.mark_matched(&set);
        let once = grid.snapshot();
        grid.mark_matched(&set);
        prop_assert_eq!(grid.snapshot(), once);
        prop_assert_eq!(grid.cells().iter().filter(|c| c.is_matched).count(), set.len());
    }

    #[test]
    fn prop_gravity_is_stable_per_column(seed in any::<u64>(), picks in prop::collection::vec(0usize..64, 0..30)) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut grid = Grid::new(8, 8, &mut rng);
        let set: MatchSet = picks.iter().map(|&i| grid.cells()[i].id).collect();

        // Survivors per column, bottom to top
        let survivors: Vec<Vec<TileId>> = (0..8)
            .map(|col| {
                (0..8)
                    .rev()
                    .map(|row| grid.cell(Pos::new(row, col)).id)
                    .filter(|id| !set.contains(id))
                    .collect()
            })
            .collect();

        grid.mark_matched(&set);
        let spawned = grid.apply_gravity_and_refill(&mut rng);
        prop_assert_eq!(spawned, set.len());

        for (col, kept) in survivors.iter().enumerate() {
            for (i, id) in kept.iter().enumerate() {
                let cell = grid.cell(Pos::new(7 - i, col));
                prop_assert_eq!(cell.id, *id);
                prop_assert_eq!(cell.row, (7 - i) as i32);
            }
            let vacated = 8 - kept.len();
            for row in 0..vacated {
                let cell = grid.cell(Pos::new(row, col));
                prop_assert!(cell.is_descending());
                prop_assert_eq!(cell.row, row as i32 - vacated as i32);
                prop_assert!(!set.contains(&cell.id));
            }
        }
        prop_assert!(grid.cells().iter().all(|c| !c.is_matched));
        grid.settle_new_tiles();
        prop_assert!(grid.is_settled());
        prop_assert!(unique_ids(&grid));
    }

    #[test]
    fn prop_bomb_expansion_bounds(
        seed in any::<u64>(),
        bombs in prop::collection::vec(0usize..64, 0..6),
        picks in prop::collection::vec(0usize..64, 1..8),
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut grid = Grid::new(8, 8, &mut rng);
        for &i in &bombs {
            grid.place_bomb(Pos::new(i / 8, i % 8));
        }
        let initial: MatchSet = picks.iter().map(|&i| grid.cells()[i].id).collect();
        let result = expand(&grid, &initial);

        prop_assert!(result.expanded.is_superset(&initial));
        let distinct_bombs: HashSet<usize> = bombs.iter().copied().collect();
        prop_assert!(result.waves.len() <= distinct_bombs.len());
        let mut union = initial.clone();
        for wave in &result.waves {
            prop_assert!(grid.cell(wave.center).is_bomb);
            prop_assert!(result.expanded.contains(&grid.cell(wave.center).id));
            prop_assert!(wave.tiles.len() <= 9);
            union.extend(wave.tiles.iter().copied());
        }
        prop_assert_eq!(union, result.expanded.clone());
        // Every matched bomb went off
        for cell in grid.cells().iter().filter(|c| c.is_bomb && result.expanded.contains(&c.id)) {
            let (pos, _) = grid.find(cell.id).unwrap();
            prop_assert!(result.waves.iter().any(|w| w.center == pos));
        }
    }
}
