//! Match Cascade demo driver
//!
//! Plays a session headlessly by always taking the hint move, logging every
//! cascade. Run with `RUST_LOG=debug` to see each round.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use match_cascade::sim::GameState;
    use match_cascade::{EngineSettings, MatchOutcome, apply_time_bonus, time_bonus};

    /// Auto-play a match-3 session from a seed
    #[derive(Debug, Parser)]
    #[command(name = "match-cascade", version)]
    pub struct Args {
        /// RNG seed (random when omitted)
        #[arg(long)]
        pub seed: Option<u64>,
        /// Number of hint moves to play
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=10_000))]
        pub moves: u32,
        /// JSON settings file
        #[arg(long, value_name = "PATH")]
        pub settings: Option<PathBuf>,
        /// Print the final grid snapshot as JSON instead of letters
        #[arg(long)]
        pub json: bool,
    }

    pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
        let settings = match &args.settings {
            Some(path) => EngineSettings::load(path)?,
            None => EngineSettings::default(),
        };
        let mut state = match args.seed {
            Some(seed) => GameState::new(settings, seed),
            None => GameState::from_entropy(settings),
        };
        log::info!(
            "Starting {}x{} session",
            state.grid().rows(),
            state.grid().cols()
        );

        // Simulated countdown, only to show what the timer collaborator would do
        let mut clock = 30.0_f32;
        let mut reshuffles = 0;
        let mut deepest = 0;

        for turn in 1..=args.moves {
            let Some(hint) = state.hint() else {
                // ensure_playable keeps this from happening after a cascade
                log::warn!("No move available on turn {turn}");
                break;
            };
            match state.try_swap(hint.from, hint.to) {
                MatchOutcome::NoMatch => log::warn!("Hint {hint:?} did not match"),
                MatchOutcome::Cascade(result) => {
                    for round in &result.rounds {
                        let bonus = time_bonus(round, clock);
                        clock = apply_time_bonus(round, clock);
                        log::debug!("  chain {} +{} (+{bonus:.1}s)", round.chain, round.points);
                    }
                    log::info!(
                        "Turn {turn}: {:?} -> {:?}, depth {}, +{}{}",
                        hint.from,
                        hint.to,
                        result.chain_depth,
                        result.score,
                        if result.bomb_fired { ", bomb" } else { "" }
                    );
                    deepest = deepest.max(result.chain_depth);
                    if result.reshuffled {
                        reshuffles += 1;
                    }
                }
            }
        }

        if args.json {
            println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
        } else {
            print!("{}", state.grid());
        }
        println!(
            "score {} after {} swaps, deepest chain {}, {} reshuffle(s), clock {:.1}s",
            state.score(),
            state.swaps(),
            deepest,
            reshuffles,
            clock
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    let args = native::Args::parse();
    if let Err(e) = native::run(args) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
