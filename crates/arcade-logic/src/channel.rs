//! Move channels
//!
//! A [`MoveChannel`] carries the local player's throw out and the opponent's
//! throw in. The session only talks to the trait, so the simulated opponent,
//! the shared-store poller and the broadcast relay are interchangeable.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::opponent::RandomMover;
use crate::room::{RoomCode, Seat};
use crate::rules::RpsMove;
use crate::store::KeyValueStore;

pub trait MoveChannel {
    /// Publish the local move for `round`.
    fn submit_move(&mut self, round: u32, mv: RpsMove) -> Result<(), ArcadeError>;

    /// The opponent's move for `round`, once it has arrived.
    fn opponent_move(&mut self, round: u32) -> Result<Option<RpsMove>, ArcadeError>;

    /// Leave the room. Called when a match is abandoned.
    fn close(&mut self) {}

    /// Start the next match in the same room. Moves from earlier matches
    /// are never delivered again.
    fn next_match(&mut self) {
        self.close();
    }
}

/// Per-round slots. The round resolves only when both are filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundBarrier {
    player: Option<RpsMove>,
    opponent: Option<RpsMove>,
}

impl RoundBarrier {
    /// Returns false if the player already committed this round.
    pub fn submit_player(&mut self, mv: RpsMove) -> bool {
        if self.player.is_some() {
            return false;
        }
        self.player = Some(mv);
        true
    }

    pub fn deliver_opponent(&mut self, mv: RpsMove) {
        if self.opponent.is_none() {
            self.opponent = Some(mv);
        }
    }

    pub fn has_player_move(&self) -> bool {
        self.player.is_some()
    }

    pub fn has_opponent_move(&self) -> bool {
        self.opponent.is_some()
    }

    /// Both moves, clearing the slots for the next round
    pub fn take_pair(&mut self) -> Option<(RpsMove, RpsMove)> {
        match (self.player, self.opponent) {
            (Some(p), Some(o)) => {
                *self = RoundBarrier::default();
                Some((p, o))
            }
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        *self = RoundBarrier::default();
    }
}

/// Opponent simulated locally: a random throw once the player has moved.
///
/// The "waiting for opponent" pause is left to the UI (see
/// `PacingConfig::opponent_delay_ms`).
#[derive(Clone, Debug)]
pub struct SimulatedChannel<R> {
    rng: R,
    mover: RandomMover,
    answered: HashMap<u32, RpsMove>,
}

impl<R: Rng> SimulatedChannel<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            mover: RandomMover,
            answered: HashMap::new(),
        }
    }
}

impl<R: Rng> MoveChannel for SimulatedChannel<R> {
    fn submit_move(&mut self, round: u32, _mv: RpsMove) -> Result<(), ArcadeError> {
        let answer = self.mover.throw(&mut self.rng);
        self.answered.insert(round, answer);
        Ok(())
    }

    fn opponent_move(&mut self, round: u32) -> Result<Option<RpsMove>, ArcadeError> {
        Ok(self.answered.remove(&round))
    }

    fn close(&mut self) {
        self.answered.clear();
    }
}

fn slot_key(room: &RoomCode, generation: u32, round: u32, seat: Seat) -> String {
    format!("room:{}:match:{}:round:{}:{}", room, generation, round, seat.as_str())
}

/// Both seats share one key-value store and poll for each other's keys.
///
/// Keys carry the match generation, which both seats advance on
/// "play again", so a rematch never reads the previous match's moves.
#[derive(Clone, Debug)]
pub struct PollingChannel<S> {
    store: S,
    room: RoomCode,
    seat: Seat,
    generation: u32,
    written: Vec<String>,
}

impl<S: KeyValueStore> PollingChannel<S> {
    pub fn new(store: S, room: RoomCode, seat: Seat) -> Self {
        Self {
            store,
            room,
            seat,
            generation: 0,
            written: Vec::new(),
        }
    }

    pub fn room(&self) -> &RoomCode {
        &self.room
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    /// Matches started in this room so far, minus one
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl<S: KeyValueStore> MoveChannel for PollingChannel<S> {
    fn submit_move(&mut self, round: u32, mv: RpsMove) -> Result<(), ArcadeError> {
        let key = slot_key(&self.room, self.generation, round, self.seat);
        let value = serde_json::to_string(&mv).map_err(|e| ArcadeError::Channel(e.to_string()))?;
        log::debug!("{} wrote {}", key, value);
        self.store.set(&key, value);
        self.written.push(key);
        Ok(())
    }

    fn opponent_move(&mut self, round: u32) -> Result<Option<RpsMove>, ArcadeError> {
        let key = slot_key(&self.room, self.generation, round, self.seat.other());
        let Some(raw) = self.store.get(&key) else {
            return Ok(None);
        };
        match serde_json::from_str::<RpsMove>(&raw) {
            Ok(mv) => Ok(Some(mv)),
            Err(e) => {
                log::warn!("malformed move under {}: {:?}", key, raw);
                Err(ArcadeError::Channel(format!("malformed move under {}: {}", key, e)))
            }
        }
    }

    fn close(&mut self) {
        for key in self.written.drain(..) {
            self.store.remove(&key);
        }
    }

    /// Old keys stay until `close`; the other seat may still be reading the
    /// last round.
    fn next_match(&mut self) {
        self.generation += 1;
        log::debug!("room {} moved to match {}", self.room, self.generation);
    }
}

/// Broadcast transport owned by the embedding application
pub trait Transport {
    fn send(&mut self, message: String) -> Result<(), ArcadeError>;

    /// Messages received since the last call
    fn receive(&mut self) -> Vec<String>;
}

/// Wire form of one move on a broadcast transport
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub room: RoomCode,
    /// Match generation within the room
    #[serde(default)]
    pub generation: u32,
    pub round: u32,
    pub seat: Seat,
    pub choice: RpsMove,
}

/// Moves as JSON envelopes over a broadcast transport
#[derive(Debug)]
pub struct RelayChannel<T> {
    transport: T,
    room: RoomCode,
    seat: Seat,
    generation: u32,
    /// Keyed by (generation, round); a peer may already be in the next match
    inbox: HashMap<(u32, u32), RpsMove>,
}

impl<T: Transport> RelayChannel<T> {
    pub fn new(transport: T, room: RoomCode, seat: Seat) -> Self {
        Self {
            transport,
            room,
            seat,
            generation: 0,
            inbox: HashMap::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn drain_transport(&mut self) {
        for message in self.transport.receive() {
            let envelope: Envelope = match serde_json::from_str(&message) {
                Ok(envelope) => envelope,
                Err(e) => {
                    log::warn!("dropping malformed relay message: {}", e);
                    continue;
                }
            };
            if envelope.room != self.room || envelope.seat == self.seat || envelope.generation < self.generation {
                continue;
            }
            log::debug!(
                "relay: {} played round {} of match {}",
                envelope.seat.as_str(),
                envelope.round,
                envelope.generation
            );
            self.inbox
                .entry((envelope.generation, envelope.round))
                .or_insert(envelope.choice);
        }
    }
}

impl<T: Transport> MoveChannel for RelayChannel<T> {
    fn submit_move(&mut self, round: u32, mv: RpsMove) -> Result<(), ArcadeError> {
        let envelope = Envelope {
            room: self.room.clone(),
            generation: self.generation,
            round,
            seat: self.seat,
            choice: mv,
        };
        let message = serde_json::to_string(&envelope).map_err(|e| ArcadeError::Channel(e.to_string()))?;
        self.transport.send(message)
    }

    fn opponent_move(&mut self, round: u32) -> Result<Option<RpsMove>, ArcadeError> {
        self.drain_transport();
        Ok(self.inbox.remove(&(self.generation, round)))
    }

    fn close(&mut self) {
        self.inbox.clear();
    }

    fn next_match(&mut self) {
        // Pull in stragglers first so they are dropped with their generation
        self.drain_transport();
        self.generation += 1;
        let current = self.generation;
        self.inbox.retain(|(generation, _), _| *generation >= current);
    }
}
