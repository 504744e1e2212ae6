//! JavaScript-facing handle. Rendering, DOM events and status text stay on
//! the JS side; this layer only validates input and reports state.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use once_cell::sync::OnceCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::GameInstance;
use crate::types::Position;

static LOGGER: OnceCell<()> = OnceCell::new();

fn init_logging(level: log::Level) {
    LOGGER.get_or_init(|| {
        console_error_panic_hook::set_once();
        // Fails only if the host already installed a logger.
        let _ = console_log::init_with_level(level);
    });
}

fn to_js_error(err: impl Display) -> JsValue {
    JsError::new(&err.to_string()).into()
}

fn position(row: u8, col: u8) -> Result<Position, GameError> {
    Position::checked(row, col).ok_or(GameError::OutOfRange { row, col })
}

/// Resolves after `ms` milliseconds via `window.setTimeout`.
async fn sleep(ms: u32) -> Result<(), JsValue> {
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let scheduled = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no global window"))
            .and_then(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    &resolve,
                    ms.min(i32::MAX as u32) as i32,
                )
            });
        if let Err(err) = scheduled {
            let _ = reject.call1(&JsValue::NULL, &err);
        }
    });
    JsFuture::from(promise).await.map(|_| ())
}

#[wasm_bindgen]
pub struct CheckersGame {
    inner: Rc<RefCell<GameInstance>>,
    ai_delay_ms: u32,
}

#[wasm_bindgen]
impl CheckersGame {
    /// `config` may be `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<CheckersGame, JsValue> {
        let config: GameConfig = if config.is_undefined() || config.is_null() {
            GameConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        init_logging(config.log_level().map_err(to_js_error)?);

        let game = GameInstance::from_config(&config).map_err(to_js_error)?;
        log::info!(
            "checkers ready: {:?} opponent, depth {}, {:?}",
            config.opponent,
            config.search_depth(),
            config.directions
        );
        Ok(Self {
            inner: Rc::new(RefCell::new(game)),
            ai_delay_ms: config.ai_delay_ms,
        })
    }

    /// Current `GameState` as a plain JS object.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.borrow().to_game_state())?)
    }

    /// `null` until the game is over.
    pub fn outcome(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.borrow().to_outcome())?)
    }

    /// Selects the user's piece. Returns `false` and changes nothing when the
    /// square cannot be selected.
    pub fn select(&mut self, row: u8, col: u8) -> bool {
        let result = position(row, col).and_then(|pos| self.inner.borrow_mut().select(pos));
        match result {
            Ok(()) => true,
            Err(err) => {
                log::debug!("ignored selection: {err}");
                false
            }
        }
    }

    /// Moves the selected piece. Returns `false` and changes nothing when the
    /// move is not legal.
    pub fn move_to(&mut self, row: u8, col: u8) -> bool {
        let result =
            position(row, col).and_then(|pos| self.inner.borrow_mut().move_selected_to(pos));
        match result {
            Ok(_) => true,
            Err(err) => {
                log::debug!("ignored move: {err}");
                false
            }
        }
    }

    /// Destinations of the piece on `(row, col)`, for highlighting.
    pub fn legal_targets(&self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        let pos = position(row, col).map_err(to_js_error)?;
        let targets = self.inner.borrow().legal_targets(pos);
        Ok(serde_wasm_bindgen::to_value(&targets)?)
    }

    /// Waits the configured delay, then plays the computer's turn.
    /// Resolves with the played turn, or `null` when a new game was started
    /// in the meantime.
    pub fn computer_move(&self) -> js_sys::Promise {
        // Claimed now so that a reset before the timer fires cancels it.
        let ticket = match self.inner.borrow().begin_computer_turn() {
            Ok(ticket) => ticket,
            Err(err) => return js_sys::Promise::reject(&to_js_error(err)),
        };
        let inner = Rc::clone(&self.inner);
        let delay = self.ai_delay_ms;
        future_to_promise(async move {
            sleep(delay).await?;

            let result = inner.borrow_mut().resolve_computer_turn(ticket);
            match result {
                Ok(turn) => Ok(serde_wasm_bindgen::to_value(&turn)?),
                Err(GameError::Cancelled) => {
                    log::debug!("discarded computer turn from a previous game");
                    Ok(JsValue::NULL)
                }
                Err(err) => Err(to_js_error(err)),
            }
        })
    }

    pub fn reset(&mut self) {
        self.inner.borrow_mut().reset();
    }
}
