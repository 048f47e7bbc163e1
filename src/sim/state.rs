//! Match state and core simulation types
//!
//! Everything the frame update mutates lives in [`MatchState`]. The renderer
//! reads it after each tick but never writes to it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::Effects;
use super::geometry::Pitch;
use super::kickoff::KickoffState;
use crate::consts::*;
use crate::with_speed;
use crate::settings::{MatchSettings, TeamPalette};

/// One of the two sides of the pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Bottom paddle, always human
    Player1,
    /// Top paddle, AI or a second human
    Player2,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }

    pub fn is_top(self) -> bool {
        self == Side::Player2
    }

    /// Vertical direction a ball leaves this side's paddle in
    pub fn attack_direction(self) -> f32 {
        match self {
            Side::Player1 => -1.0,
            Side::Player2 => 1.0,
        }
    }
}

/// A paddle: round body with a flat striking bar facing the pitch centre
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    pub x: f32,
    /// Fixed body centre y
    pub y: f32,
    pub radius: f32,
    /// Width of the flat striking bar
    pub width: f32,
    pub prev_x: f32,
    /// Derived from position changes, never driven directly
    pub vel_x: f32,
    /// Reaction coefficient when the computer drives this paddle
    pub ai_reaction: Option<f32>,
    /// Hit animation (1.0 on contact, decays to 0)
    #[serde(default)]
    pub hit_animation: f32,
}

impl Paddle {
    pub fn new(side: Side, pitch: &Pitch, ai_reaction: Option<f32>) -> Self {
        let y = match side {
            Side::Player1 => pitch.height - PADDLE_BODY_RADIUS * 3.0,
            Side::Player2 => PADDLE_BODY_RADIUS * 3.0,
        };
        let x = pitch.width / 2.0;
        Self {
            side,
            x,
            y,
            radius: PADDLE_BODY_RADIUS,
            width: PADDLE_WIDTH,
            prev_x: x,
            vel_x: 0.0,
            ai_reaction,
            hit_animation: 0.0,
        }
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    /// y of the bar edge the ball strikes
    pub fn striking_line(&self) -> f32 {
        match self.side {
            Side::Player1 => self.y - self.radius + PADDLE_HEIGHT / 2.0,
            Side::Player2 => self.y + self.radius - PADDLE_HEIGHT * 1.5,
        }
    }

    /// Record velocity from the previous sub-step's motion
    ///
    /// Must run before this sub-step moves the paddle.
    pub fn estimate_velocity(&mut self, sub_dt: f32) {
        if sub_dt > 0.0 {
            self.vel_x = (self.x - self.prev_x) / sub_dt;
        }
        self.prev_x = self.x;
    }

    /// Exponential approach toward a pointer, frame-rate independent
    pub fn follow_pointer(&mut self, target_x: f32, sub_dt: f32) {
        let smoothing = 1.0 - (1.0 - PLAYER_SMOOTHING_FACTOR).powf(sub_dt);
        self.x += (target_x - self.x) * smoothing;
    }

    /// Reactive AI tracking
    ///
    /// Moves only while the ball heads for this paddle's goal. The step is
    /// proportional to the x-gap and capped by a reaction-scaled max speed.
    pub fn track_ball(&mut self, ball: &Ball, reaction: f32, sub_dt: f32) {
        let incoming = ball.vel.y * self.side.attack_direction() < 0.0;
        if !incoming {
            return;
        }
        let ideal = (ball.pos.x - self.x) * reaction * AI_MOVE_MULTIPLIER;
        let cap = AI_MAX_SPEED_PER_FRAME * (reaction / AI_BASE_REACTION);
        self.x += ideal.clamp(-cap, cap) * sub_dt;
    }

    pub fn recenter(&mut self, pitch: &Pitch) {
        self.x = pitch.width / 2.0;
        self.prev_x = self.x;
        self.vel_x = 0.0;
        self.hit_animation = 0.0;
    }
}

/// The match ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Signed spin; curves flight and is consumed by the next bounce
    pub spin: f32,
    /// Visual rotation (radians), integrated from spin
    pub rotation: f32,
    /// Flash after a paddle hit (1.0 on contact, decays to 0)
    #[serde(default)]
    pub hit_flash: f32,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            spin: 0.0,
            rotation: 0.0,
            hit_flash: 0.0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Keep a moving ball inside [MIN_BALL_SPEED, MAX_BALL_SPEED]
    ///
    /// A stationary ball is left alone.
    pub fn clamp_speed(&mut self) {
        let speed = self.speed();
        if speed <= 0.0 {
            return;
        }
        if speed < MIN_BALL_SPEED {
            self.vel = with_speed(self.vel, MIN_BALL_SPEED);
        } else if speed > MAX_BALL_SPEED {
            self.vel = with_speed(self.vel, MAX_BALL_SPEED);
        }
    }

    /// Stop dead at `pos`
    pub fn freeze_at(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.spin = 0.0;
    }
}

/// Goal latch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MatchPhase {
    /// Ball in play (or waiting for its kickoff impulse)
    #[default]
    Live,
    /// A goal was scored; physics is frozen until the next kickoff
    GoalScored { scorer: Side },
}

impl MatchPhase {
    pub fn is_live(&self) -> bool {
        matches!(self, MatchPhase::Live)
    }
}

/// Surfaces the ball can bounce off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Post,
    Corner,
    SideWall,
    EndWall,
    Crossbar,
}

/// Audio cues the sound collaborator plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Hit,
    Bounce,
    Goal,
}

/// Discrete things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Emitted once per goal; the match-flow layer updates the score
    Goal { scorer: Side },
    Bounce { surface: Surface, pos: Vec2 },
    PaddleHit { side: Side, speed: f32 },
    /// The delayed kickoff impulse was applied; `side` is the kicking side
    Kickoff { side: Side, vy: f32 },
}

impl GameEvent {
    pub fn cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Goal { .. } => Some(SoundCue::Goal),
            GameEvent::Bounce { .. } => Some(SoundCue::Bounce),
            GameEvent::PaddleHit { .. } => Some(SoundCue::Hit),
            GameEvent::Kickoff { .. } => None,
        }
    }
}

/// Latest pointer targets for the human paddles (logical x)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointerTargets {
    pub player1_x: f32,
    pub player2_x: f32,
}

impl PointerTargets {
    pub fn centered(pitch: &Pitch) -> Self {
        Self {
            player1_x: pitch.width / 2.0,
            player2_x: pitch.width / 2.0,
        }
    }
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete match state owned by the simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub pitch: Pitch,
    pub player1: Paddle,
    pub player2: Paddle,
    pub ball: Ball,
    pub pointer: PointerTargets,
    pub phase: MatchPhase,
    pub kickoff: KickoffState,
    pub palettes: [TeamPalette; 2],
    /// Frames simulated so far
    pub frame: u64,
    /// Visual effects (not gameplay-affecting)
    #[serde(skip)]
    pub effects: Effects,
    /// Events raised by the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip, default = "default_rng")]
    pub(crate) rng: Pcg32,
}

impl MatchState {
    pub fn new(settings: &MatchSettings) -> Self {
        let pitch = Pitch::default();
        Self {
            pitch,
            player1: Paddle::new(Side::Player1, &pitch, None),
            player2: Paddle::new(Side::Player2, &pitch, settings.ai_reaction()),
            ball: Ball::new(pitch.center()),
            pointer: PointerTargets::centered(&pitch),
            phase: MatchPhase::Live,
            kickoff: KickoffState::default(),
            palettes: [settings.player1, settings.player2],
            frame: 0,
            effects: Effects::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(settings.seed),
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Player1 => &self.player1,
            Side::Player2 => &self.player2,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Player1 => &mut self.player1,
            Side::Player2 => &mut self.player2,
        }
    }

    pub fn palette(&self, side: Side) -> TeamPalette {
        match side {
            Side::Player1 => self.palettes[0],
            Side::Player2 => self.palettes[1],
        }
    }

    /// Take the events raised by the last tick
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
