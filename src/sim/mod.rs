//! Match simulation module
//!
//! All gameplay logic lives here. The simulation is frame-driven and
//! deterministic for a given seed and input sequence:
//! - Time advances in multiples of a nominal 60 Hz frame
//! - Seeded RNG only (particles, coin flips, banner picks)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod geometry;
pub mod kickoff;
pub mod state;
pub mod tick;

pub use collision::Collision;
pub use effects::Effects;
pub use geometry::{Corner, GoalEnd, Pitch, Segment};
pub use kickoff::{KickoffDirection, ResetRequest};
pub use state::{
    Ball, GameEvent, MatchPhase, MatchState, Paddle, PointerTargets, Side, SoundCue, Surface,
};
pub use tick::{FrameInput, frame_delta, tick};
