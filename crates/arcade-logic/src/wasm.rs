//! WASM bindings for the browser frontend

#![cfg(feature = "wasm")]

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::opponent::describe_opponent;
use crate::{
    judge, ArcadeConfig, Board, EventLog, GameKind, KeyValueStore, MatchDriver, Opponent, PollingChannel,
    PriorityMover, RandomMover, RewardTally, RoomCode, RpsMove, RpsSession, Seat, SeededRng, SimulatedChannel,
};

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Seed from the caller, or from `Math.random()` when none is given
fn seed_or_random(seed: Option<u32>) -> u64 {
    match seed {
        Some(seed) => seed as u64,
        None => (js_sys::Math::random() * u32::MAX as f64) as u64,
    }
}

/// Config object from JS (as returned by `default_config`); `undefined` or
/// `null` means the defaults, missing fields take their default values.
fn config_from_js(config: JsValue) -> Result<ArcadeConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(ArcadeConfig::default());
    }
    let config: ArcadeConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

fn new_driver(config: JsValue) -> Result<MatchDriver<EventLog, RewardTally>, JsError> {
    let config = config_from_js(config)?;
    Ok(MatchDriver::from_config(&config, EventLog::default(), RewardTally::default())?)
}

/// Judge a pair of throws from the player's side
///
/// Returns `"Win"`, `"Lose"` or `"Tie"`.
#[wasm_bindgen]
pub fn judge_throws(player: &str, opponent: &str) -> Result<JsValue, JsError> {
    let player: RpsMove = player.parse()?;
    let opponent: RpsMove = opponent.parse()?;
    to_js(&judge(player, opponent))
}

/// The computer's throw
#[wasm_bindgen]
pub fn random_throw(seed: Option<u32>) -> String {
    let mut rng = SeededRng::new(seed_or_random(seed));
    RandomMover.throw(&mut rng).as_str().to_string()
}

/// Interim throws to flash while the computer "thinks"
#[wasm_bindgen]
pub fn thinking_throws(ticks: u32, seed: Option<u32>) -> Vec<String> {
    let mut rng = SeededRng::new(seed_or_random(seed));
    RandomMover
        .flicker(ticks, &mut rng)
        .into_iter()
        .map(|mv| mv.as_str().to_string())
        .collect()
}

/// Cell the computer plays as O on a board like `"X___O____"`
#[wasm_bindgen]
pub fn computer_cell(board: &str, seed: Option<u32>) -> Result<u32, JsError> {
    let board: Board = board.parse()?;
    let mut rng = SeededRng::new(seed_or_random(seed));
    let cell = PriorityMover::default().choose(&board, &mut rng)?;
    Ok(cell as u32)
}

#[wasm_bindgen]
pub fn new_room_code(seed: Option<u32>) -> String {
    let mut rng = SeededRng::new(seed_or_random(seed));
    RoomCode::generate(&mut rng).to_string()
}

/// Normalized room code, or an error message for the join dialog
#[wasm_bindgen]
pub fn normalize_room_code(input: &str) -> Result<String, JsError> {
    let code: RoomCode = input.parse()?;
    Ok(code.to_string())
}

#[wasm_bindgen]
pub fn default_config() -> Result<JsValue, JsError> {
    to_js(&ArcadeConfig::default())
}

/// Parse and validate a config document
#[wasm_bindgen]
pub fn parse_config(json: &str) -> Result<JsValue, JsError> {
    to_js(&ArcadeConfig::from_json(json)?)
}

/// Description of the computer opponent for `"rps"` or `"tictactoe"`
#[wasm_bindgen]
pub fn get_opponent_description(game: &str) -> Result<String, JsError> {
    let kind = match game {
        "rps" => GameKind::RockPaperScissors,
        "tictactoe" => GameKind::TicTacToe,
        _ => return Err(JsError::new(&format!("Unknown game: {}", game))),
    };
    Ok(describe_opponent(kind.opponent()).to_string())
}

/// Rock-Paper-Scissors against the simulated remote opponent
#[wasm_bindgen]
pub struct WebRpsMatch {
    session: RpsSession<SimulatedChannel<SeededRng>, EventLog, RewardTally>,
}

#[wasm_bindgen]
impl WebRpsMatch {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, seed: Option<u32>) -> Result<WebRpsMatch, JsError> {
        let driver = new_driver(config)?;
        let channel = SimulatedChannel::new(SeededRng::new(seed_or_random(seed)));
        Ok(WebRpsMatch {
            session: RpsSession::new(driver, channel),
        })
    }

    /// Submit a throw. Returns the round outcome, or `null` if ignored.
    pub fn choose(&mut self, throw: &str) -> Result<JsValue, JsError> {
        let outcome = self.session.choose_str(throw)?;
        to_js(&outcome)
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(self.session.state())
    }

    /// Events since the last call
    pub fn take_events(&mut self) -> Result<JsValue, JsError> {
        let events = self.session.driver_mut().observer_mut().drain();
        to_js(&events)
    }

    pub fn coins_awarded(&self) -> f64 {
        self.session.driver().sink().coins as f64
    }

    pub fn abandon(&mut self) {
        self.session.abandon();
    }

    pub fn restart(&mut self) -> Result<(), JsError> {
        Ok(self.session.restart()?)
    }
}

/// `KeyValueStore` over any JS object with `getItem`/`setItem`/`removeItem`
/// (`localStorage`, `sessionStorage`, or a test double)
struct JsStorage {
    inner: JsValue,
}

impl JsStorage {
    fn call(&self, method: &str, args: &[&JsValue]) -> Option<JsValue> {
        let function = js_sys::Reflect::get(&self.inner, &JsValue::from_str(method))
            .ok()?
            .dyn_into::<js_sys::Function>()
            .ok()?;
        let result = match args {
            [a] => function.call1(&self.inner, a),
            [a, b] => function.call2(&self.inner, a, b),
            _ => function.call0(&self.inner),
        };
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("storage.{} failed: {:?}", method, e);
                None
            }
        }
    }
}

impl KeyValueStore for JsStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.call("getItem", &[&JsValue::from_str(key)])?.as_string()
    }

    fn set(&mut self, key: &str, value: String) {
        self.call("setItem", &[&JsValue::from_str(key), &JsValue::from_str(&value)]);
    }

    fn remove(&mut self, key: &str) {
        self.call("removeItem", &[&JsValue::from_str(key)]);
    }
}

/// Two-player Rock-Paper-Scissors through shared storage
#[wasm_bindgen]
pub struct WebRoomMatch {
    session: RpsSession<PollingChannel<JsStorage>, EventLog, RewardTally>,
}

#[wasm_bindgen]
impl WebRoomMatch {
    #[wasm_bindgen(constructor)]
    pub fn new(storage: JsValue, room: &str, host: bool, config: JsValue) -> Result<WebRoomMatch, JsError> {
        let room: RoomCode = room.parse()?;
        let seat = if host { Seat::Host } else { Seat::Guest };
        let driver = new_driver(config)?;
        let channel = PollingChannel::new(JsStorage { inner: storage }, room, seat);
        Ok(WebRoomMatch {
            session: RpsSession::new(driver, channel),
        })
    }

    pub fn choose(&mut self, throw: &str) -> Result<JsValue, JsError> {
        let outcome = self.session.choose_str(throw)?;
        to_js(&outcome)
    }

    /// Poll for the other seat's throw; call on a timer while waiting
    pub fn pump(&mut self) -> Result<JsValue, JsError> {
        let outcome = self.session.pump()?;
        to_js(&outcome)
    }

    pub fn is_waiting(&self) -> bool {
        self.session.is_waiting()
    }

    pub fn room_code(&self) -> String {
        self.session.channel().room().to_string()
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(self.session.state())
    }

    pub fn take_events(&mut self) -> Result<JsValue, JsError> {
        let events = self.session.driver_mut().observer_mut().drain();
        to_js(&events)
    }

    pub fn coins_awarded(&self) -> f64 {
        self.session.driver().sink().coins as f64
    }

    pub fn abandon(&mut self) {
        self.session.abandon();
    }

    /// Rematch in the same room; both seats must call this
    pub fn restart(&mut self) -> Result<(), JsError> {
        Ok(self.session.restart()?)
    }
}
