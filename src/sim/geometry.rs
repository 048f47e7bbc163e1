//! Pitch geometry
//!
//! The pitch is an axis-aligned rectangle in logical units with the origin at
//! the top-left corner and y growing downward. Player 2 defends the top goal,
//! player 1 the bottom one. Every collision test works in this space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Side;
use crate::consts::*;

/// A line segment, used for the goal posts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Closest point on the segment to `p`
    ///
    /// A degenerate (zero-length) segment collapses to its start point.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let ab = self.b - self.a;
        let len_sq = ab.length_squared();
        if len_sq < 1e-8 {
            return self.a;
        }
        let t = ((p - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        self.a + ab * t
    }
}

/// One of the two goal ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalEnd {
    Top,
    Bottom,
}

impl GoalEnd {
    pub const BOTH: [GoalEnd; 2] = [GoalEnd::Top, GoalEnd::Bottom];

    /// Side awarded the goal when the ball goes in at this end
    pub fn scorer(self) -> Side {
        match self {
            GoalEnd::Top => Side::Player1,
            GoalEnd::Bottom => Side::Player2,
        }
    }

    /// Unit y pointing out of the pitch through this goal line
    pub fn outward(self) -> f32 {
        match self {
            GoalEnd::Top => -1.0,
            GoalEnd::Bottom => 1.0,
        }
    }
}

/// The four chamfered pitch corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Unit diagonal pointing from the pitch into this corner
    pub fn diagonal(self) -> Vec2 {
        match self {
            Corner::TopLeft => Vec2::new(-1.0, -1.0),
            Corner::TopRight => Vec2::new(1.0, -1.0),
            Corner::BottomLeft => Vec2::new(-1.0, 1.0),
            Corner::BottomRight => Vec2::new(1.0, 1.0),
        }
        .normalize()
    }

    /// Reflect a velocity off this corner's 45° barrier
    ///
    /// Swaps the components, negating both on the top-left/bottom-right
    /// diagonal.
    pub fn reflect(self, vel: Vec2) -> Vec2 {
        match self {
            Corner::TopLeft | Corner::BottomRight => Vec2::new(-vel.y, -vel.x),
            Corner::TopRight | Corner::BottomLeft => Vec2::new(vel.y, vel.x),
        }
    }
}

/// Fixed pitch dimensions for one match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pitch {
    pub width: f32,
    pub height: f32,
    pub goal_width: f32,
    pub goal_depth: f32,
    pub post_radius: f32,
    pub corner_size: f32,
}

impl Default for Pitch {
    fn default() -> Self {
        Self {
            width: PITCH_WIDTH,
            height: PITCH_HEIGHT,
            goal_width: GOAL_WIDTH,
            goal_depth: GOAL_DEPTH,
            post_radius: POST_RADIUS,
            corner_size: CORNER_BARRIER_SIZE,
        }
    }
}

impl Pitch {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// x-range between the two posts
    pub fn goal_mouth(&self) -> (f32, f32) {
        let half = self.goal_width / 2.0;
        (self.width / 2.0 - half, self.width / 2.0 + half)
    }

    /// Strictly between the posts
    pub fn in_goal_mouth(&self, x: f32) -> bool {
        let (start, end) = self.goal_mouth();
        x > start && x < end
    }

    /// y of the goal line at this end
    pub fn goal_line(&self, end: GoalEnd) -> f32 {
        match end {
            GoalEnd::Top => 0.0,
            GoalEnd::Bottom => self.height,
        }
    }

    /// The two posts at an end, running from the goal line into the pitch
    /// by the goal depth
    pub fn posts(&self, end: GoalEnd) -> [Segment; 2] {
        let (start, finish) = self.goal_mouth();
        let line = self.goal_line(end);
        let back = line - end.outward() * self.goal_depth;
        [
            Segment::new(Vec2::new(start, line), Vec2::new(start, back)),
            Segment::new(Vec2::new(finish, line), Vec2::new(finish, back)),
        ]
    }

    /// Whether a ball is close enough to an end for its posts to matter
    pub fn in_goal_band(&self, end: GoalEnd, pos: Vec2, radius: f32) -> bool {
        match end {
            GoalEnd::Top => pos.y - radius < self.goal_depth,
            GoalEnd::Bottom => pos.y + radius > self.height - self.goal_depth,
        }
    }

    /// Triangular barrier test for a corner
    ///
    /// The ball is inside the barrier square and the Manhattan distance from
    /// the corner is below `corner_size + radius`. This is a proxy for the
    /// chamfer, not a true distance to the diagonal.
    pub fn in_corner(&self, corner: Corner, pos: Vec2, radius: f32) -> bool {
        let b = self.corner_size;
        let dx = match corner {
            Corner::TopLeft | Corner::BottomLeft => pos.x,
            Corner::TopRight | Corner::BottomRight => self.width - pos.x,
        };
        let dy = match corner {
            Corner::TopLeft | Corner::TopRight => pos.y,
            Corner::BottomLeft | Corner::BottomRight => self.height - pos.y,
        };
        dx < b && dy < b && dx + dy < b + radius
    }

    /// Clamp a paddle centre so its flat width stays on the pitch
    pub fn clamp_paddle_x(&self, x: f32, width: f32) -> f32 {
        x.clamp(width / 2.0, self.width - width / 2.0)
    }
}
