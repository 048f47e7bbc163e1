//! Per-frame simulation update
//!
//! Called once per animation frame with the elapsed time expressed in nominal
//! frames. Effects always decay; paddles and ball only move while the match
//! is live and not paused. Motion is split into adaptive sub-steps so a fast
//! ball cannot tunnel through a post or paddle.

use glam::Vec2;

use super::collision::{self, Collision};
use super::kickoff::{self, ResetRequest};
use super::state::{Ball, GameEvent, MatchPhase, MatchState, Side, Surface};
use crate::consts::*;
use crate::settings::Rgb;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Elapsed time as a multiple of `NOMINAL_FRAME_MS`
    pub dt: f32,
    pub paused: bool,
    /// Latest pointer x for the bottom paddle, in logical units
    pub player1_x: Option<f32>,
    /// Latest pointer x for the top paddle (ignored when the AI drives it)
    pub player2_x: Option<f32>,
    pub reset: Option<ResetRequest>,
}

impl FrameInput {
    /// A plain frame of `dt` with no new input
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            ..Default::default()
        }
    }
}

/// Convert a raw frame delta in milliseconds to a frame multiplier
pub fn frame_delta(elapsed_ms: f32) -> f32 {
    elapsed_ms / NOMINAL_FRAME_MS
}

/// Number of motion sub-steps for a ball moving at `speed`
///
/// One sub-step per half ball radius of travel, between 1 and `MAX_SUBSTEPS`.
pub fn substep_count(speed: f32, radius: f32) -> u32 {
    let steps = (speed / (radius * 0.5)).ceil();
    if steps.is_finite() {
        (steps as u32).clamp(1, MAX_SUBSTEPS)
    } else {
        1
    }
}

/// Advance the match by one frame
pub fn tick(state: &mut MatchState, input: &FrameInput) {
    state.events.clear();

    // NaN and negative deltas count as no time passing
    let dt = if input.dt.is_finite() { input.dt.clamp(0.0, MAX_FRAME_DELTA) } else { 0.0 };

    if let Some(req) = input.reset {
        kickoff::request(state, req);
    }

    // Out-of-range pointers are clamped, not rejected
    let pitch = state.pitch;
    if let Some(x) = input.player1_x.filter(|x| x.is_finite()) {
        state.pointer.player1_x = pitch.clamp_paddle_x(x, state.player1.width);
    }
    if let Some(x) = input.player2_x.filter(|x| x.is_finite()) {
        state.pointer.player2_x = pitch.clamp_paddle_x(x, state.player2.width);
    }

    state.frame += 1;
    decay_effects(state, dt);

    if !input.paused && state.phase.is_live() && dt > 0.0 {
        step_motion(state, dt);

        if state.phase.is_live() {
            let ball = &state.ball;
            state.effects.record_trail(ball.pos);
            state.effects.spawn_speed_sparks(&mut state.rng, ball.pos, ball.vel, ball.radius);
            state.ball.rotation += state.ball.spin * ROTATION_PER_SPIN * dt;
        }
    }

    kickoff::advance(state, dt);
}

fn decay_effects(state: &mut MatchState, dt: f32) {
    state.effects.decay(dt);
    for paddle in [&mut state.player1, &mut state.player2] {
        paddle.hit_animation = (paddle.hit_animation - 0.08 * dt).max(0.0);
    }
    state.ball.hit_flash = (state.ball.hit_flash - 0.05 * dt).max(0.0);
}

/// Move paddles and ball through this frame's sub-steps
fn step_motion(state: &mut MatchState, dt: f32) {
    let sub_steps = substep_count(state.ball.speed(), state.ball.radius);
    let sub_dt = dt / sub_steps as f32;

    for _ in 0..sub_steps {
        move_paddles(state, sub_dt);
        integrate_ball(&mut state.ball, sub_dt);
        resolve_collisions(state);
        if !state.phase.is_live() {
            break;
        }
    }
}

fn move_paddles(state: &mut MatchState, sub_dt: f32) {
    state.player1.estimate_velocity(sub_dt);
    state.player2.estimate_velocity(sub_dt);

    state.player1.follow_pointer(state.pointer.player1_x, sub_dt);
    match state.player2.ai_reaction {
        Some(reaction) => state.player2.track_ball(&state.ball, reaction, sub_dt),
        None => state.player2.follow_pointer(state.pointer.player2_x, sub_dt),
    }

    let pitch = state.pitch;
    for paddle in [&mut state.player1, &mut state.player2] {
        paddle.x = pitch.clamp_paddle_x(paddle.x, paddle.width);
    }
}

/// One integration step of ball flight
///
/// Magnus coupling, spin decay, friction, the forward "momentum" push, then
/// position. Speed is clamped into the allowed band afterwards.
pub fn integrate_ball(ball: &mut Ball, sub_dt: f32) {
    let magnus = ball.spin * MAGNUS_COEFFICIENT * sub_dt;
    ball.vel.x += -ball.vel.y * magnus;
    ball.vel.y += ball.vel.x * magnus;
    ball.spin *= 1.0 - SPIN_DECAY * sub_dt;

    ball.vel *= 1.0 - (1.0 - FRICTION) * sub_dt;

    if ball.vel.y != 0.0 {
        ball.vel.y += ball.vel.y.signum() * VERTICAL_ACCELERATION * sub_dt;
    }

    ball.pos += ball.vel * sub_dt;
    ball.clamp_speed();
}

/// Run one collision pass and apply its consequences
///
/// Does nothing once the goal latch is set.
pub fn resolve_collisions(state: &mut MatchState) -> Option<Collision> {
    if !state.phase.is_live() {
        return None;
    }
    let hit = collision::resolve(
        &mut state.ball,
        &state.pitch,
        [&state.player1, &state.player2],
    )?;
    match hit {
        Collision::Bounce { surface, point } => on_bounce(state, surface, point),
        Collision::Goal { scorer, point } => on_goal(state, scorer, point),
        Collision::PaddleHit { side, speed, point, .. } => on_paddle_hit(state, side, speed, point),
    }
    Some(hit)
}

fn on_bounce(state: &mut MatchState, surface: Surface, point: Vec2) {
    let speed = state.ball.speed();
    state.events.push(GameEvent::Bounce { surface, pos: point });

    let count = 3 + ((speed / MAX_BALL_SPEED) * 10.0) as usize;
    state.effects.spawn_impacts(&mut state.rng, point, count, Rgb::WHITE);

    collision::damp_bounce(&mut state.ball);
    state.effects.clear_trail();

    if speed > MAX_BALL_SPEED * 0.9 {
        state.effects.shake(0.5, 5.0);
    }
}

fn on_goal(state: &mut MatchState, scorer: Side, point: Vec2) {
    // The latch is the only thing standing between one crossing and two goals
    if !state.phase.is_live() {
        return;
    }
    state.phase = MatchPhase::GoalScored { scorer };

    let center = state.pitch.center();
    state.ball.freeze_at(center);
    state.events.push(GameEvent::Goal { scorer });

    let conceding = state.palette(scorer.opponent()).colors();
    let scoring = state.palette(scorer).colors();
    state.effects.spawn_confetti(&mut state.rng, point, conceding);
    state.effects.spawn_shockwave(point, 100.0, Rgb::YELLOW);
    state.effects.show_banner(&mut state.rng, center.y, scoring);

    log::info!("Goal for {:?} at frame {}", scorer, state.frame);
}

fn on_paddle_hit(state: &mut MatchState, side: Side, speed: f32, point: Vec2) {
    state.events.push(GameEvent::PaddleHit { side, speed });

    let count = 10 + ((speed / MAX_BALL_SPEED) * 15.0) as usize;
    state.effects.spawn_impacts(&mut state.rng, point, count, Rgb::SPARK);
    state.effects.spawn_shockwave(point, 30.0, Rgb::WHITE);
    state.effects.clear_trail();
    state.ball.hit_flash = 1.0;

    let paddle = state.paddle_mut(side);
    paddle.hit_animation = 1.0;
    let hit_power = paddle.vel_x.abs();
    if hit_power > HARD_HIT_THRESHOLD {
        state
            .effects
            .shake((hit_power / HARD_HIT_THRESHOLD).min(2.0), (hit_power / 4.0).min(10.0));
    }
    log::debug!("{:?} hit at speed {:.2} (paddle power {:.1})", side, speed, hit_power);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MatchSettings;
    use crate::sim::effects::CONFETTI_BURST;
    use crate::sim::kickoff::KickoffDirection;

    fn new_match() -> MatchState {
        MatchState::new(&MatchSettings::default())
    }

    #[test]
    fn test_substep_count() {
        assert_eq!(substep_count(0.0, 10.0), 1);
        assert_eq!(substep_count(7.0, 10.0), 2);
        assert_eq!(substep_count(20.0, 10.0), 4);
        assert_eq!(substep_count(500.0, 10.0), MAX_SUBSTEPS);
        assert_eq!(substep_count(f32::NAN, 10.0), 1);
    }

    #[test]
    fn test_still_ball_stays_still() {
        let mut ball = Ball::new(Vec2::new(200.0, 320.0));
        integrate_ball(&mut ball, 1.0);
        assert_eq!(ball.vel, Vec2::ZERO);
        assert_eq!(ball.pos, Vec2::new(200.0, 320.0));
    }

    #[test]
    fn test_vertical_push_follows_travel() {
        let mut ball = Ball::new(Vec2::new(200.0, 320.0));
        ball.vel = Vec2::new(0.0, -10.0);
        integrate_ball(&mut ball, 1.0);
        let expected = -10.0 * FRICTION - VERTICAL_ACCELERATION;
        assert!((ball.vel.y - expected).abs() < 1e-5);
    }

    #[test]
    fn test_spin_curves_flight() {
        let mut ball = Ball::new(Vec2::new(200.0, 320.0));
        ball.vel = Vec2::new(0.0, -10.0);
        ball.spin = 1.0;
        integrate_ball(&mut ball, 1.0);
        assert!(ball.vel.x > 0.0);
        assert!(ball.spin < 1.0);
    }

    #[test]
    fn test_slow_ball_is_boosted_to_minimum() {
        let mut ball = Ball::new(Vec2::new(200.0, 320.0));
        ball.vel = Vec2::new(1.0, 1.0);
        integrate_ball(&mut ball, 1.0);
        assert!((ball.speed() - MIN_BALL_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_side_wall_reflection_law() {
        let mut state = new_match();
        state.ball.pos = Vec2::new(395.0, 320.0);
        state.ball.vel = Vec2::new(9.0, 0.0);
        let pre_vx = state.ball.vel.x;

        let hit = resolve_collisions(&mut state);
        assert!(matches!(hit, Some(Collision::Bounce { surface: Surface::SideWall, .. })));
        assert!((state.ball.vel.x - (-pre_vx * WALL_DAMPING)).abs() < 1e-5);
        assert_eq!(state.ball.vel.y, 0.0);
        assert_eq!(state.ball.spin, 0.0);
        assert!(state.effects.trail.is_empty());
        assert!(!state.effects.impacts.is_empty());
        assert!(matches!(state.events[0], GameEvent::Bounce { surface: Surface::SideWall, .. }));
    }

    #[test]
    fn test_fast_bounce_shakes() {
        let mut state = new_match();
        state.ball.pos = Vec2::new(4.0, 320.0);
        state.ball.vel = Vec2::new(-21.0, 0.0);
        resolve_collisions(&mut state);
        assert!(state.effects.shake.is_active());
        assert_eq!(state.effects.shake.intensity, 0.5);
    }

    #[test]
    fn test_goal_into_bottom_net() {
        let mut state = new_match();
        state.ball.pos = Vec2::new(200.0, PITCH_HEIGHT - BALL_RADIUS - 5.0);
        state.ball.vel = Vec2::new(0.0, 20.0);

        tick(&mut state, &FrameInput::idle(1.0));

        assert_eq!(state.phase, MatchPhase::GoalScored { scorer: Side::Player2 });
        assert_eq!(state.events, vec![GameEvent::Goal { scorer: Side::Player2 }]);
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert_eq!(state.ball.spin, 0.0);
        assert_eq!(state.ball.pos, state.pitch.center());
        assert_eq!(state.effects.confetti.len(), CONFETTI_BURST);
        // Confetti in the conceding (player 1) colours, banner in the scorer's
        let p1 = state.palette(Side::Player1).colors();
        assert!(state.effects.confetti.iter().all(|p| p1.contains(&p.color)));
        let banner = state.effects.banner.as_ref().unwrap();
        assert_eq!(banner.colors, state.palette(Side::Player2).colors());
        assert_eq!(banner.y, PITCH_HEIGHT / 2.0);
    }

    #[test]
    fn test_goal_latch_holds() {
        let mut state = new_match();
        state.ball.pos = Vec2::new(200.0, 15.0);
        state.ball.vel = Vec2::new(0.0, -20.0);
        tick(&mut state, &FrameInput::idle(1.0));
        assert_eq!(state.phase, MatchPhase::GoalScored { scorer: Side::Player1 });

        let frozen = state.ball.pos;
        let paddle_x = state.player1.x;
        for _ in 0..120 {
            let input = FrameInput {
                dt: 1.0,
                player1_x: Some(20.0),
                ..Default::default()
            };
            tick(&mut state, &input);
            assert!(state.events.iter().all(|e| !matches!(e, GameEvent::Goal { .. })));
            assert_eq!(state.ball.pos, frozen);
            assert_eq!(state.ball.vel, Vec2::ZERO);
        }
        assert_eq!(state.player1.x, paddle_x);
        // Effects kept animating while latched
        let banner = state.effects.banner.as_ref().unwrap();
        assert!(banner.progress > 0.5);
        assert!(state.effects.confetti.iter().all(|p| p.opacity < 0.5));
    }

    #[test]
    fn test_direct_goal_handler_respects_latch() {
        let mut state = new_match();
        on_goal(&mut state, Side::Player1, Vec2::new(200.0, 0.0));
        on_goal(&mut state, Side::Player2, Vec2::new(200.0, 640.0));
        let goals = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Goal { .. }))
            .count();
        assert_eq!(goals, 1);
        assert_eq!(state.phase, MatchPhase::GoalScored { scorer: Side::Player1 });
    }

    #[test]
    fn test_centered_hit_on_still_paddle() {
        let mut state = new_match();
        state.ball.pos = Vec2::new(200.0, 561.0);
        state.ball.vel = Vec2::new(0.0, MIN_BALL_SPEED);

        tick(&mut state, &FrameInput::idle(1.0));

        let hit_speed = state.events.iter().find_map(|e| match e {
            GameEvent::PaddleHit { side: Side::Player1, speed } => Some(*speed),
            _ => None,
        });
        assert!((hit_speed.unwrap() - (MIN_BALL_SPEED + PADDLE_HIT_SPEED_BOOST)).abs() < 1e-4);
        let expected = -(MIN_BALL_SPEED + PADDLE_HIT_SPEED_BOOST);
        // Half a frame of friction and push after the hit
        assert!((state.ball.vel.y - expected).abs() < 0.05);
        assert!(state.ball.vel.x.abs() < 1e-4);
        assert!(state.ball.spin.abs() < 1e-6);
        assert_eq!(state.ball.hit_flash, 1.0);
        assert_eq!(state.player1.hit_animation, 1.0);
    }

    #[test]
    fn test_hard_hit_shakes_screen() {
        let hit_with_paddle_moving = |from_x: f32| {
            let mut state = new_match();
            state.ball.pos = Vec2::new(200.0, 561.0);
            state.ball.vel = Vec2::new(0.0, MIN_BALL_SPEED);
            // Two sub-steps of 0.5 at this speed; the first hit sees (200 - from_x) / 0.5
            state.player1.prev_x = from_x;
            tick(&mut state, &FrameInput::idle(1.0));
            assert!(state.events.iter().any(|e| matches!(e, GameEvent::PaddleHit { .. })));
            state.effects.shake
        };

        let shake = hit_with_paddle_moving(180.0);
        assert!(shake.is_active());
        assert!((shake.intensity - 40.0 / HARD_HIT_THRESHOLD).abs() < 1e-4);
        assert!((shake.duration - 10.0).abs() < 1e-4);

        // 60 units/frame saturates both caps
        let shake = hit_with_paddle_moving(170.0);
        assert!((shake.intensity - 2.0).abs() < 1e-4);
        assert!((shake.duration - 10.0).abs() < 1e-4);

        // 10 units/frame is a soft touch
        let shake = hit_with_paddle_moving(195.0);
        assert!(!shake.is_active());
    }

    #[test]
    fn test_frame_delta_from_millis() {
        assert!((frame_delta(NOMINAL_FRAME_MS) - 1.0).abs() < 1e-6);
        assert!((frame_delta(33.34) - 2.0).abs() < 1e-4);
        assert_eq!(frame_delta(0.0), 0.0);
    }

    #[test]
    fn test_kickoff_toward_player1() {
        let mut state = new_match();
        let input = FrameInput {
            dt: 1.0,
            reset: Some(ResetRequest {
                counter: 1,
                direction: KickoffDirection::Player1,
            }),
            ..Default::default()
        };
        tick(&mut state, &input);
        for _ in 0..4 {
            tick(&mut state, &FrameInput::idle(1.0));
            assert_eq!(state.ball.vel, Vec2::ZERO);
        }
        tick(&mut state, &FrameInput::idle(1.0));
        assert_eq!(state.ball.vel.y, -INITIAL_BALL_SPEED);
        assert_eq!(state.ball.vel.x, 0.0);
        assert!(state.events.contains(&GameEvent::Kickoff {
            side: Side::Player1,
            vy: -INITIAL_BALL_SPEED
        }));
    }

    #[test]
    fn test_kickoff_fires_while_paused() {
        let mut state = new_match();
        let reset = ResetRequest {
            counter: 1,
            direction: KickoffDirection::Player2,
        };
        tick(
            &mut state,
            &FrameInput {
                dt: 1.0,
                paused: true,
                reset: Some(reset),
                ..Default::default()
            },
        );
        for _ in 0..6 {
            tick(&mut state, &FrameInput { dt: 1.0, paused: true, ..Default::default() });
        }
        assert_eq!(state.ball.vel, Vec2::new(0.0, INITIAL_BALL_SPEED));
        // Still paused: the ball has not moved
        assert_eq!(state.ball.pos, state.pitch.center());
    }

    #[test]
    fn test_pause_freezes_motion_but_not_effects() {
        let mut state = new_match();
        state.ball.vel = Vec2::new(3.0, 8.0);
        state.effects.shake(1.0, 3.0);
        let pos = state.ball.pos;

        tick(&mut state, &FrameInput { dt: 1.0, paused: true, ..Default::default() });
        assert_eq!(state.ball.pos, pos);
        assert_eq!(state.effects.shake.duration, 2.0);

        tick(&mut state, &FrameInput::idle(1.0));
        assert_ne!(state.ball.pos, pos);
        assert_eq!(state.effects.trail.len(), 1);
    }

    #[test]
    fn test_pointer_is_clamped() {
        let mut state = new_match();
        let input = FrameInput {
            dt: 1.0,
            player1_x: Some(-500.0),
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &input);
        }
        assert_eq!(state.pointer.player1_x, PADDLE_WIDTH / 2.0);
        assert!(state.player1.x >= PADDLE_WIDTH / 2.0);
        assert!((state.player1.x - PADDLE_WIDTH / 2.0).abs() < 0.01);
    }

    #[test]
    fn test_bad_frame_delta_does_nothing() {
        let mut state = new_match();
        state.ball.vel = Vec2::new(0.0, 8.0);
        let pos = state.ball.pos;
        tick(&mut state, &FrameInput::idle(f32::NAN));
        tick(&mut state, &FrameInput::idle(-3.0));
        assert_eq!(state.ball.pos, pos);
        assert!(state.player1.vel_x.is_finite());
    }

    #[test]
    fn test_human_opponent_follows_pointer() {
        let settings = MatchSettings {
            opponent: crate::settings::Opponent::Human,
            ..Default::default()
        };
        let mut state = MatchState::new(&settings);
        let input = FrameInput {
            dt: 1.0,
            player2_x: Some(300.0),
            ..Default::default()
        };
        tick(&mut state, &input);
        // 75% of the gap closed in one frame
        assert!((state.player2.x - 275.0).abs() < 1e-3);
    }

    #[test]
    fn test_same_seed_same_match() {
        let run = || {
            let mut state = new_match();
            let mut events = Vec::new();
            for frame in 0..400u64 {
                let input = FrameInput {
                    dt: 1.0,
                    player1_x: Some(120.0 + (frame % 90) as f32 * 2.0),
                    reset: (frame == 0).then_some(ResetRequest {
                        counter: 1,
                        direction: KickoffDirection::Random,
                    }),
                    ..Default::default()
                };
                tick(&mut state, &input);
                events.extend(state.take_events());
            }
            (state.ball.pos, state.ball.vel, state.effects.particle_count(), events)
        };
        assert_eq!(run(), run());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn speed_never_drops_below_floor(
                vx in -30.0f32..30.0,
                vy in -30.0f32..30.0,
                spin in -2.0f32..2.0,
                sub_dt in 0.05f32..4.0,
            ) {
                prop_assume!(vx.hypot(vy) > 0.1);
                let mut ball = Ball::new(Vec2::new(200.0, 320.0));
                ball.vel = Vec2::new(vx, vy);
                ball.spin = spin;
                integrate_ball(&mut ball, sub_dt);
                let speed = ball.speed();
                prop_assert!(speed >= MIN_BALL_SPEED - 1e-3, "speed {} below floor", speed);
                prop_assert!(speed <= MAX_BALL_SPEED + 1e-3, "speed {} above ceiling", speed);
            }

            #[test]
            fn paddles_stay_on_pitch(
                targets in proptest::collection::vec((-1000.0f32..1400.0, -1000.0f32..1400.0), 1..60),
                dt in 0.1f32..4.0,
                vx in -20.0f32..20.0,
            ) {
                let settings = MatchSettings {
                    opponent: crate::settings::Opponent::Human,
                    ..Default::default()
                };
                let mut state = MatchState::new(&settings);
                state.ball.vel = Vec2::new(vx, 9.0);
                let half = PADDLE_WIDTH / 2.0;
                for (p1, p2) in targets {
                    let input = FrameInput {
                        dt,
                        player1_x: Some(p1),
                        player2_x: Some(p2),
                        ..Default::default()
                    };
                    tick(&mut state, &input);
                    for paddle in [&state.player1, &state.player2] {
                        prop_assert!(paddle.x >= half - 1e-3 && paddle.x <= PITCH_WIDTH - half + 1e-3);
                    }
                }
            }

            #[test]
            fn ai_paddle_stays_on_pitch(
                ball_x in 0.0f32..400.0,
                reaction in 0.01f32..0.2,
                frames in 1usize..120,
            ) {
                let mut state = new_match();
                state.player2.ai_reaction = Some(reaction);
                state.ball.pos = Vec2::new(ball_x, 300.0);
                state.ball.vel = Vec2::new(0.0, -8.0);
                for _ in 0..frames {
                    tick(&mut state, &FrameInput::idle(1.0));
                    let x = state.player2.x;
                    prop_assert!(x >= PADDLE_WIDTH / 2.0 - 1e-3 && x <= PITCH_WIDTH - PADDLE_WIDTH / 2.0 + 1e-3);
                }
            }
        }
    }
}
