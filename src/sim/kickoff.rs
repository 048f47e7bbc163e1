//! Kickoff / reset protocol
//!
//! A reset recentres everything at once and arms a delayed impulse. The delay
//! lets the renderer show the settled positions before the ball moves. Reset
//! counters only ever increase; a request that is not newer than the last
//! accepted one is dropped, so a stale delayed impulse can never land on top
//! of a fresher kickoff.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, MatchPhase, MatchState, PointerTargets, Side};
use crate::consts::*;

/// Which side takes the kickoff
///
/// The ball is sent toward the opponent's goal: `Player1` (bottom) kicks up
/// the pitch with negative vy, `Player2` kicks down with positive vy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum KickoffDirection {
    Player1,
    Player2,
    /// Coin flip between the two
    Random,
    /// Recentre only; the ball stays put
    #[default]
    None,
}

impl KickoffDirection {
    /// Vertical kick velocity, or `None` for no kick
    pub fn impulse(self, rng: &mut impl Rng) -> Option<f32> {
        match self {
            KickoffDirection::Player1 => Some(-INITIAL_BALL_SPEED),
            KickoffDirection::Player2 => Some(INITIAL_BALL_SPEED),
            KickoffDirection::Random => {
                let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                Some(sign * INITIAL_BALL_SPEED)
            }
            KickoffDirection::None => None,
        }
    }
}

/// External reset trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRequest {
    /// Must increase with every new request
    pub counter: u64,
    pub direction: KickoffDirection,
}

/// An armed kick waiting for its delay to run out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingKickoff {
    pub counter: u64,
    pub direction: KickoffDirection,
    pub remaining_ms: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KickoffState {
    /// Highest counter accepted so far (0 = none yet)
    pub last_counter: u64,
    pub pending: Option<PendingKickoff>,
}

/// Handle a reset request; returns whether it was accepted
pub fn request(state: &mut MatchState, req: ResetRequest) -> bool {
    if req.counter <= state.kickoff.last_counter {
        log::debug!(
            "Ignoring stale reset #{} (last accepted #{})",
            req.counter,
            state.kickoff.last_counter
        );
        return false;
    }

    state.kickoff.last_counter = req.counter;
    state.phase = MatchPhase::Live;

    let pitch = state.pitch;
    state.player1.recenter(&pitch);
    state.player2.recenter(&pitch);
    state.pointer = PointerTargets::centered(&pitch);

    state.ball.freeze_at(pitch.center());
    state.ball.rotation = 0.0;
    state.ball.hit_flash = 0.0;
    state.effects.clear_trail();
    state.effects.banner = None;

    state.kickoff.pending = Some(PendingKickoff {
        counter: req.counter,
        direction: req.direction,
        remaining_ms: KICKOFF_DELAY_MS,
    });
    log::info!("Reset #{} accepted, kickoff for {:?}", req.counter, req.direction);
    true
}

/// Count down the pending kick by `dt` frames and fire it when due
///
/// Runs whether or not the match is paused.
pub fn advance(state: &mut MatchState, dt: f32) {
    let Some(pending) = state.kickoff.pending.as_mut() else {
        return;
    };
    pending.remaining_ms -= dt * NOMINAL_FRAME_MS;
    if pending.remaining_ms > 0.0 {
        return;
    }

    let pending = *pending;
    state.kickoff.pending = None;
    if pending.counter != state.kickoff.last_counter {
        // Superseded; a newer reset owns the ball now
        return;
    }
    if let Some(vy) = pending.direction.impulse(&mut state.rng) {
        let side = if vy < 0.0 { Side::Player1 } else { Side::Player2 };
        state.ball.vel = glam::Vec2::new(0.0, vy);
        state.events.push(GameEvent::Kickoff { side, vy });
        log::info!("Kickoff #{}: vy = {}", pending.counter, vy);
    }
}
