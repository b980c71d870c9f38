//! # slide2048 WebAssembly Bindings
//!
//! JavaScript-friendly bindings to the session engine using wasm-bindgen.
//! The JS side owns rendering, input events and the autoplay timer; it maps
//! keys and swipes through the helpers here and calls `apply` or
//! `autoplayTick` once per event.

use serde::Serialize;
use slide2048_core::{best_move, input, Autoplay, Direction, GameSession, StepResult};
use wasm_bindgen::prelude::*;

/// Result of a step operation, serialized for JavaScript.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsStepResult {
    /// The board after the step (16 elements, row-major order).
    pub board: Vec<u32>,
    /// Current total score.
    pub score: u64,
    /// Points earned from this move.
    pub points_gained: u64,
    /// Whether the board changed.
    pub changed: bool,
    /// Whether the game is over.
    pub over: bool,
}

/// WebAssembly wrapper for a game session.
#[wasm_bindgen]
pub struct WasmSession {
    session: GameSession,
    autoplay: Autoplay,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create a new session with the given seed.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WasmSession {
        WasmSession {
            session: GameSession::new(seed),
            autoplay: Autoplay::new(),
        }
    }

    /// Start over with a fresh board drawn from `seed`.
    pub fn reset(&mut self, seed: u64) {
        self.session.reset_with_seed(seed);
    }

    /// Apply a move. Direction codes: 0 = Up, 1 = Down, 2 = Left, 3 = Right.
    ///
    /// Unknown codes are treated as a move that changes nothing.
    pub fn apply(&mut self, direction: u8) -> JsValue {
        let result = match Direction::from_u8(direction) {
            Some(d) => self.session.apply(d),
            None => self.unchanged(),
        };
        self.create_js_result(result)
    }

    /// Map a DOM key name and apply it; other keys are ignored.
    #[wasm_bindgen(js_name = applyKey)]
    pub fn apply_key(&mut self, key: &str) -> JsValue {
        let result = match input::from_key(key) {
            Some(d) => self.session.apply(d),
            None => self.unchanged(),
        };
        self.create_js_result(result)
    }

    /// Classify a swipe displacement and apply it; short swipes are ignored.
    #[wasm_bindgen(js_name = applySwipe)]
    pub fn apply_swipe(&mut self, dx: f64, dy: f64) -> JsValue {
        let result = match input::from_swipe(dx, dy) {
            Some(d) => self.session.apply(d),
            None => self.unchanged(),
        };
        self.create_js_result(result)
    }

    /// Full session state (grid, score, status) as a JS object.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.session.state()).unwrap_or(JsValue::NULL)
    }

    /// Get the current board as 16 row-major values.
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> Vec<u32> {
        self.session.grid().to_flat().to_vec()
    }

    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u64 {
        self.session.score()
    }

    #[wasm_bindgen(js_name = isOver)]
    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }

    #[wasm_bindgen(js_name = getMaxTile)]
    pub fn get_max_tile(&self) -> u32 {
        self.session.max_tile()
    }

    /// Legal moves as 4 flags [Up, Down, Left, Right].
    #[wasm_bindgen(js_name = getLegalMoves)]
    pub fn get_legal_moves(&self) -> Vec<u8> {
        self.session.legal_moves().iter().map(|&b| b as u8).collect()
    }

    /// The heuristic's suggested direction code, or undefined when stuck.
    #[wasm_bindgen(js_name = bestMove)]
    pub fn best_move(&self) -> Option<u8> {
        best_move(self.session.grid()).map(|d| d as u8)
    }

    #[wasm_bindgen(js_name = setAutoplay)]
    pub fn set_autoplay(&mut self, enabled: bool) {
        if enabled {
            self.autoplay.enable();
        } else {
            self.autoplay.disable();
        }
    }

    #[wasm_bindgen(js_name = isAutoplay)]
    pub fn is_autoplay(&self) -> bool {
        self.autoplay.is_enabled()
    }

    /// One autoplay step, for the JS timer to call each period.
    ///
    /// Returns null when autoplay is off or the game is over.
    #[wasm_bindgen(js_name = autoplayTick)]
    pub fn autoplay_tick(&mut self) -> JsValue {
        match self.autoplay.tick(&mut self.session) {
            Some(result) => self.create_js_result(result),
            None => JsValue::NULL,
        }
    }

    fn unchanged(&self) -> StepResult {
        StepResult {
            changed: false,
            points_gained: 0,
            over: self.session.is_over(),
        }
    }

    /// Helper method to create a JS result object.
    fn create_js_result(&self, result: StepResult) -> JsValue {
        serde_wasm_bindgen::to_value(&self.step_result(result)).unwrap_or(JsValue::NULL)
    }

    fn step_result(&self, result: StepResult) -> JsStepResult {
        JsStepResult {
            board: self.session.grid().to_flat().to_vec(),
            score: self.session.score(),
            points_gained: result.points_gained,
            changed: result.changed,
            over: result.over,
        }
    }
}

/// Map a DOM key name to a direction code, or undefined.
#[wasm_bindgen(js_name = directionFromKey)]
pub fn direction_from_key(key: &str) -> Option<u8> {
    input::from_key(key).map(|d| d as u8)
}

/// Map a swipe displacement to a direction code, or undefined.
#[wasm_bindgen(js_name = directionFromSwipe)]
pub fn direction_from_swipe(dx: f64, dy: f64) -> Option<u8> {
    input::from_swipe(dx, dy).map(|d| d as u8)
}
