//! Browser shell
//!
//! Exposes a session to JavaScript. Structured values cross the boundary as
//! JSON strings so the UI sees the same shapes serde produces natively.

use wasm_bindgen::prelude::*;

use crate::settings::EngineSettings;
use crate::sim::{GameState, Pos};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// One game session driven from JS
#[wasm_bindgen]
pub struct WebEngine {
    state: GameState,
}

#[wasm_bindgen]
impl WebEngine {
    /// `settings_json` may be omitted for defaults; `seed` for an entropy seed
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>, seed: Option<u64>) -> Result<WebEngine, JsError> {
        let settings = match settings_json {
            Some(json) => EngineSettings::from_json(&json)?,
            None => EngineSettings::default(),
        };
        let state = match seed {
            Some(seed) => GameState::new(settings, seed),
            None => GameState::from_entropy(settings),
        };
        Ok(WebEngine { state })
    }

    /// Returns the `MatchOutcome` as JSON
    #[wasm_bindgen(js_name = "trySwap")]
    pub fn try_swap(
        &mut self,
        row_a: usize,
        col_a: usize,
        row_b: usize,
        col_b: usize,
    ) -> Result<String, JsError> {
        let outcome = self
            .state
            .try_swap(Pos::new(row_a, col_a), Pos::new(row_b, col_b));
        Ok(serde_json::to_string(&outcome)?)
    }

    /// Grid snapshot as JSON
    pub fn snapshot(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.state.snapshot())?)
    }

    #[wasm_bindgen(js_name = "hasLegalMove")]
    pub fn has_legal_move(&self) -> bool {
        self.state.has_legal_move()
    }

    /// Hint `Move` as JSON, or `null`
    pub fn hint(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.state.hint())?)
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn score(&self) -> u64 {
        self.state.score()
    }

    #[wasm_bindgen(js_name = "bestScore")]
    pub fn best_score(&self) -> u64 {
        self.state.best_score()
    }

    #[wasm_bindgen(js_name = "setBestScore")]
    pub fn set_best_score(&mut self, best: u64) {
        self.state.set_best_score(best);
    }

    #[wasm_bindgen(js_name = "isNewBest")]
    pub fn is_new_best(&self) -> bool {
        self.state.is_new_best()
    }
}
