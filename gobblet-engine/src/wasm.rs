//! WASM bindings for gobblet-engine
//!
//! Provides a JavaScript-friendly API over [`Session`]. Every call returns a
//! plain object shaped like:
//!
//! ```text
//! { state: GameView, requiresConfirmation: bool, error: string | null }
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{GameError, GameView, Response, Session, Size};

/// WASM-friendly wrapper around Session
#[wasm_bindgen]
pub struct WasmGame {
    inner: Session,
}

/// Serializable reply for JavaScript
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Reply {
    state: GameView,
    requires_confirmation: bool,
    error: Option<String>,
}

impl WasmGame {
    fn reply(
        &self,
        requires_confirmation: bool,
        error: Option<GameError>,
    ) -> Result<JsValue, JsValue> {
        let reply = Reply {
            state: self.inner.view(),
            requires_confirmation,
            error: error.map(|e| e.to_string()),
        };
        serde_wasm_bindgen::to_value(&reply).map_err(JsValue::from)
    }
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a new game
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { inner: Session::new_game() }
    }

    /// Current observable state
    pub fn state(&self) -> Result<JsValue, JsValue> {
        self.reply(false, None)
    }

    /// Select a size: 1 (small), 2 (medium), 3 (large), anything else clears
    #[wasm_bindgen(js_name = selectSize)]
    pub fn select_size(&mut self, size: Option<u8>) -> Result<JsValue, JsValue> {
        let size = size.and_then(|s| Size::from_index(s.wrapping_sub(1) as usize));
        self.inner.select_size(size);
        self.reply(false, None)
    }

    /// Click a cell (0-8). Reclaims come back with `requiresConfirmation`
    /// until called again with `confirm = true`.
    #[wasm_bindgen(js_name = actOnCell)]
    pub fn act_on_cell(&mut self, index: usize, confirm: bool) -> Result<JsValue, JsValue> {
        match self.inner.act_on_cell(index, confirm) {
            Ok(Response::Applied(_)) => self.reply(false, None),
            Ok(Response::ConfirmReclaim { .. }) => self.reply(true, None),
            Err(err) => self.reply(false, Some(err)),
        }
    }

    /// Undo the last action. Returns null when there is nothing to undo.
    pub fn undo(&mut self) -> Result<JsValue, JsValue> {
        match self.inner.undo() {
            Some(_) => self.reply(false, None),
            None => Ok(JsValue::NULL),
        }
    }

    /// Start over (the page asks the user first)
    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        self.inner.reset();
        self.reply(false, None)
    }

    /// Move descriptions, oldest first
    #[wasm_bindgen(js_name = moveLog)]
    pub fn move_log(&self) -> Result<JsValue, JsValue> {
        let log: Vec<String> = self.inner.move_log().collect();
        serde_wasm_bindgen::to_value(&log).map_err(JsValue::from)
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
