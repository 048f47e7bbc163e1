//! Pitch Duel - a two-paddle foosball/air-hockey hybrid
//!
//! Core modules:
//! - `sim`: Frame-driven match simulation (integration, collisions, goals, kickoff)
//! - `settings`: Match configuration (difficulty, palettes, visual style tags)
//! - `league`: Fixture generation and standings for the match-flow layer
//! - `error`: Configuration errors

pub mod error;
pub mod league;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{Difficulty, MatchSettings, Opponent, TeamPalette};

use glam::Vec2;

/// Gameplay tuning constants
///
/// Everything is expressed in logical pitch units and nominal frames
/// (one frame = `NOMINAL_FRAME_MS`), never in display pixels or seconds.
pub mod consts {
    /// Duration of one nominal frame; frame deltas are multiples of this
    pub const NOMINAL_FRAME_MS: f32 = 16.67;
    /// Largest frame multiplier accepted in one update
    pub const MAX_FRAME_DELTA: f32 = 4.0;
    /// Upper bound on sub-steps per frame
    pub const MAX_SUBSTEPS: u32 = 10;

    /// Pitch dimensions (fixed aspect, independent of display size)
    pub const PITCH_WIDTH: f32 = 400.0;
    pub const PITCH_HEIGHT: f32 = 640.0;
    pub const GOAL_WIDTH: f32 = 180.0;
    pub const GOAL_DEPTH: f32 = 15.0;
    pub const POST_RADIUS: f32 = 5.0;
    pub const CORNER_BARRIER_SIZE: f32 = 30.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 70.0;
    pub const PADDLE_HEIGHT: f32 = 8.0;
    pub const PADDLE_BODY_RADIUS: f32 = 18.0;
    /// Slack allowed between the ball edge and the striking line
    pub const PADDLE_CONTACT_TOLERANCE: f32 = 2.0;
    /// Human paddle smoothing toward the pointer (per nominal frame)
    pub const PLAYER_SMOOTHING_FACTOR: f32 = 0.75;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const INITIAL_BALL_SPEED: f32 = 8.0;
    pub const MIN_BALL_SPEED: f32 = 7.0;
    pub const MAX_BALL_SPEED: f32 = 22.0;

    /// Paddle hit response
    pub const PADDLE_POWER_MULTIPLIER: f32 = 0.2;
    pub const PADDLE_HIT_SPEED_BOOST: f32 = 0.8;
    /// Launch angle at the very edge of the paddle (60 degrees)
    pub const MAX_LAUNCH_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    pub const SPIN_FACTOR: f32 = 0.08;
    pub const SPIN_OFFSET_FACTOR: f32 = 0.05;
    /// Paddle speed above which a hit shakes the screen
    pub const HARD_HIT_THRESHOLD: f32 = 25.0;

    /// Ball dynamics
    pub const WALL_DAMPING: f32 = 0.97;
    pub const FRICTION: f32 = 0.997;
    pub const SPIN_DECAY: f32 = 0.01;
    pub const MAGNUS_COEFFICIENT: f32 = 0.005;
    pub const VERTICAL_ACCELERATION: f32 = 0.015;
    /// Visual rotation per unit of spin per frame
    pub const ROTATION_PER_SPIN: f32 = 0.1;

    /// AI tracking
    pub const AI_MOVE_MULTIPLIER: f32 = 5.0;
    pub const AI_MAX_SPEED_PER_FRAME: f32 = 9.0;
    /// Reaction coefficient the max speed is normalized against
    pub const AI_BASE_REACTION: f32 = 0.1;

    /// Kickoff
    pub const KICKOFF_DELAY_MS: f32 = 100.0;
}

/// Map a display-space pointer x to logical pitch x
///
/// `view_left`/`view_width` describe where the pitch is drawn on screen.
/// A zero-width view maps everything to the centre line.
#[inline]
pub fn pointer_to_logical(screen_x: f32, view_left: f32, view_width: f32) -> f32 {
    if view_width <= f32::EPSILON {
        return consts::PITCH_WIDTH / 2.0;
    }
    (screen_x - view_left) * (consts::PITCH_WIDTH / view_width)
}

/// Length-preserving rescale of `v` to `speed` (zero stays zero)
#[inline]
pub fn with_speed(v: Vec2, speed: f32) -> Vec2 {
    v.normalize_or_zero() * speed
}

/// Decide which paddle a pointer controls from its vertical screen position
///
/// Pointers below the control line (at `split_ratio` of the view height)
/// drive player 1 at the bottom; pointers above it drive player 2.
pub fn split_pointer(screen_y: f32, view_top: f32, view_height: f32, split_ratio: f32) -> sim::Side {
    let control_line = view_top + view_height * split_ratio.clamp(0.0, 1.0);
    if screen_y > control_line {
        sim::Side::Player1
    } else {
        sim::Side::Player2
    }
}
