//! Collision detection and response
//!
//! One pass per sub-step, in fixed priority: posts, corners, side walls, goal
//! lines, paddles. The first shape that reports contact claims the sub-step.
//! Posts come before the goal line on purpose: a ball clipping a post at the
//! mouth is a rebound, not a goal.
//!
//! Functions here only fix up the ball's kinematics. Side effects (events,
//! particles, damping, shake) are applied by the tick from the returned
//! [`Collision`].

use glam::Vec2;

use super::geometry::{Corner, GoalEnd, Pitch};
use super::state::{Ball, Paddle, Side, Surface};
use crate::consts::*;

/// What a sub-step's collision pass found
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collision {
    /// Ball rebounded; needs the shared bounce effects
    Bounce { surface: Surface, point: Vec2 },
    /// Ball crossed a goal line between the posts, heading out
    Goal { scorer: Side, point: Vec2 },
    /// Ball was struck by a paddle and relaunched
    PaddleHit { side: Side, offset: f32, speed: f32, point: Vec2 },
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Energy loss shared by every non-paddle bounce; also kills spin
pub fn damp_bounce(ball: &mut Ball) {
    ball.spin = 0.0;
    ball.vel *= WALL_DAMPING;
}

/// Run the full priority pass against the pitch and both paddles
pub fn resolve(ball: &mut Ball, pitch: &Pitch, paddles: [&Paddle; 2]) -> Option<Collision> {
    resolve_posts(ball, pitch)
        .or_else(|| resolve_corners(ball, pitch))
        .or_else(|| resolve_side_walls(ball, pitch))
        .or_else(|| resolve_goal_lines(ball, pitch))
        .or_else(|| paddles.iter().find_map(|paddle| resolve_paddle(ball, paddle)))
}

/// Goal posts as capsules: a segment swept by the post radius
pub fn resolve_posts(ball: &mut Ball, pitch: &Pitch) -> Option<Collision> {
    for end in GoalEnd::BOTH {
        if !pitch.in_goal_band(end, ball.pos, ball.radius) {
            continue;
        }
        for post in pitch.posts(end) {
            let closest = post.closest_point(ball.pos);
            let offset = ball.pos - closest;
            let dist = offset.length();
            let reach = ball.radius + pitch.post_radius;
            if dist >= reach {
                continue;
            }

            // Centre exactly on the post axis: push to whichever side the
            // ball sits on, defaulting to the left
            let normal = if dist > 1e-6 {
                offset / dist
            } else if ball.pos.x > post.a.x {
                Vec2::X
            } else {
                Vec2::NEG_X
            };

            ball.vel = reflect_velocity(ball.vel, normal);
            ball.pos += normal * (reach - dist);
            return Some(Collision::Bounce {
                surface: Surface::Post,
                point: ball.pos,
            });
        }
    }
    None
}

/// 45° chamfers in the four corners
///
/// Only a ball still heading into the corner is turned, so one that was
/// already deflected cannot be flipped back in on the next sub-step.
pub fn resolve_corners(ball: &mut Ball, pitch: &Pitch) -> Option<Collision> {
    let corner = Corner::ALL
        .into_iter()
        .find(|&c| pitch.in_corner(c, ball.pos, ball.radius))?;
    if ball.vel.dot(corner.diagonal()) <= 0.0 {
        return None;
    }
    // No positional correction: a ball past the touchline here is pulled back
    // by the new velocity within a few frames
    ball.vel = corner.reflect(ball.vel);
    Some(Collision::Bounce {
        surface: Surface::Corner,
        point: ball.pos,
    })
}

/// Left and right touchlines
pub fn resolve_side_walls(ball: &mut Ball, pitch: &Pitch) -> Option<Collision> {
    let r = ball.radius;
    if ball.pos.x - r < 0.0 {
        ball.vel.x = ball.vel.x.abs();
        ball.pos.x = r;
    } else if ball.pos.x + r > pitch.width {
        ball.vel.x = -ball.vel.x.abs();
        ball.pos.x = pitch.width - r;
    } else {
        return None;
    }
    Some(Collision::Bounce {
        surface: Surface::SideWall,
        point: ball.pos,
    })
}

/// Top and bottom edges: goal, crossbar or plain end-wall bounce
///
/// A goal leaves the ball untouched; freezing it is the goal handler's job.
pub fn resolve_goal_lines(ball: &mut Ball, pitch: &Pitch) -> Option<Collision> {
    let r = ball.radius;
    let end = if ball.pos.y - r < 0.0 {
        GoalEnd::Top
    } else if ball.pos.y + r > pitch.height {
        GoalEnd::Bottom
    } else {
        return None;
    };
    let line = pitch.goal_line(end);
    // Resting position just inside the pitch
    let inside_y = line - end.outward() * r;

    if !pitch.in_goal_mouth(ball.pos.x) {
        ball.vel.y = -end.outward() * ball.vel.y.abs();
        ball.pos.y = inside_y;
        return Some(Collision::Bounce {
            surface: Surface::EndWall,
            point: ball.pos,
        });
    }

    let heading_out = ball.vel.y * end.outward() >= 0.0;
    if heading_out {
        return Some(Collision::Goal {
            scorer: end.scorer(),
            point: Vec2::new(ball.pos.x, line),
        });
    }

    // Moving back toward the field from inside the mouth: the bar
    ball.vel.y = -ball.vel.y;
    ball.pos.y = inside_y;
    Some(Collision::Bounce {
        surface: Surface::Crossbar,
        point: Vec2::new(ball.pos.x, line),
    })
}

/// Flat striking bar of a paddle
///
/// The launch angle comes from where the ball meets the bar (centre sends it
/// straight, the edges at 60°), and the paddle's own speed adds power and
/// spin. Only a ball travelling toward the paddle's goal is struck.
pub fn resolve_paddle(ball: &mut Ball, paddle: &Paddle) -> Option<Collision> {
    let r = ball.radius;
    let line = paddle.striking_line();
    let aligned = if paddle.side.is_top() {
        ball.pos.y - r < line + PADDLE_CONTACT_TOLERANCE && ball.pos.y + r > paddle.y
    } else {
        ball.pos.y + r > line - PADDLE_CONTACT_TOLERANCE && ball.pos.y - r < paddle.y
    };
    let half = paddle.half_width();
    let overlaps = ball.pos.x + r > paddle.x - half && ball.pos.x - r < paddle.x + half;
    let incoming = ball.vel.y * paddle.side.attack_direction() < 0.0;
    if !(aligned && overlaps && incoming) {
        return None;
    }

    let offset = ((ball.pos.x - paddle.x) / half).clamp(-1.0, 1.0);
    let angle = offset * MAX_LAUNCH_ANGLE;
    let power = paddle.vel_x.abs() * PADDLE_POWER_MULTIPLIER;
    let speed = (ball.speed() + power + PADDLE_HIT_SPEED_BOOST).clamp(MIN_BALL_SPEED, MAX_BALL_SPEED);

    ball.vel = Vec2::new(
        speed * angle.sin(),
        paddle.side.attack_direction() * speed * angle.cos(),
    );
    ball.spin = paddle.vel_x * SPIN_FACTOR + offset * SPIN_OFFSET_FACTOR;

    Some(Collision::PaddleHit {
        side: paddle.side,
        offset,
        speed,
        point: Vec2::new(ball.pos.x, line),
    })
}
