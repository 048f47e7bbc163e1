//! Pitch Duel - headless match runner
//!
//! Plays one match at a fixed frame time with scripted pointers standing
//! in for the humans, keeps score, and schedules each kickoff in favour of
//! the side that just conceded.
//!
//! Usage: `pitch-duel [settings.json]`
//!
//! Environment overrides: `PITCH_DUEL_DIFFICULTY`, `PITCH_DUEL_OPPONENT`,
//! `PITCH_DUEL_SEED`, `PITCH_DUEL_CONTROL_SPLIT_RATIO`, plus
//! `PITCH_DUEL_TARGET_SCORE`, `PITCH_DUEL_MAX_FRAMES` and `PITCH_DUEL_FRAME_MS`
//! (simulated frame time) for the run itself.

#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use pitch_duel::consts::NOMINAL_FRAME_MS;
#[cfg(not(target_arch = "wasm32"))]
use pitch_duel::sim::{FrameInput, GameEvent, KickoffDirection, MatchState, ResetRequest, Side, frame_delta, tick};
#[cfg(not(target_arch = "wasm32"))]
use pitch_duel::{ConfigError, MatchSettings, Opponent};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TARGET_SCORE: u32 = 5;
/// Ten minutes of play at 60 Hz
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_MAX_FRAMES: u64 = 36_000;
/// Settle time between a goal and the next reset (banner, confetti)
#[cfg(not(target_arch = "wasm32"))]
const GOAL_PAUSE_FRAMES: u32 = 90;

/// Settings keys that can be overridden from the environment
#[cfg(not(target_arch = "wasm32"))]
const ENV_OVERRIDES: [(&str, &str); 4] = [
    ("PITCH_DUEL_DIFFICULTY", "difficulty"),
    ("PITCH_DUEL_OPPONENT", "opponent"),
    ("PITCH_DUEL_SEED", "seed"),
    ("PITCH_DUEL_CONTROL_SPLIT_RATIO", "control_split_ratio"),
];

#[cfg(not(target_arch = "wasm32"))]
struct RunLimits {
    target_score: u32,
    max_frames: u64,
    /// Frame multiplier fed to every tick
    dt: f32,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct Scoreboard {
    player1: u32,
    player2: u32,
    hits: u32,
    bounces: u32,
}

#[cfg(not(target_arch = "wasm32"))]
impl Scoreboard {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Goal { scorer: Side::Player1 } => self.player1 += 1,
            GameEvent::Goal { scorer: Side::Player2 } => self.player2 += 1,
            GameEvent::PaddleHit { .. } => self.hits += 1,
            GameEvent::Bounce { .. } => self.bounces += 1,
            GameEvent::Kickoff { .. } => {}
        }
    }

    fn leader_reached(&self, target: u32) -> bool {
        self.player1 >= target || self.player2 >= target
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings() -> Result<MatchSettings, ConfigError> {
    let mut settings = match std::env::args().nth(1) {
        Some(path) => MatchSettings::load(path)?,
        None => MatchSettings::default(),
    };
    for (var, key) in ENV_OVERRIDES {
        if let Ok(value) = std::env::var(var) {
            settings.set(key, &value)?;
            log::info!("{} override: {}={}", var, key, value);
        }
    }
    Ok(settings)
}

#[cfg(not(target_arch = "wasm32"))]
fn env_number<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue { key: var, value }),
        Err(_) => Ok(default),
    }
}

/// Scripted pointer: chase the ball with a little lag
#[cfg(not(target_arch = "wasm32"))]
fn scripted_pointer(state: &MatchState, side: Side) -> f32 {
    let paddle = state.paddle(side);
    let lead = state.ball.vel.x * 4.0;
    paddle.x + (state.ball.pos.x + lead - paddle.x) * 0.6
}

#[cfg(not(target_arch = "wasm32"))]
fn run_match(settings: &MatchSettings, limits: &RunLimits) -> Scoreboard {
    let mut state = MatchState::new(settings);
    let mut score = Scoreboard::default();
    let mut reset_counter = 1;
    let mut goal_pause: Option<(u32, Side)> = None;

    let mut first = Some(ResetRequest {
        counter: reset_counter,
        direction: KickoffDirection::Random,
    });

    while state.frame < limits.max_frames {
        let mut reset = first.take();
        if let Some((frames_left, conceded)) = goal_pause {
            if frames_left == 0 {
                reset_counter += 1;
                let direction = match conceded {
                    Side::Player1 => KickoffDirection::Player1,
                    Side::Player2 => KickoffDirection::Player2,
                };
                reset = Some(ResetRequest {
                    counter: reset_counter,
                    direction,
                });
                goal_pause = None;
            } else {
                goal_pause = Some((frames_left - 1, conceded));
            }
        }

        let input = FrameInput {
            dt: limits.dt,
            paused: false,
            player1_x: Some(scripted_pointer(&state, Side::Player1)),
            player2_x: (settings.opponent == Opponent::Human).then(|| scripted_pointer(&state, Side::Player2)),
            reset,
        };
        tick(&mut state, &input);

        for event in state.take_events() {
            score.record(&event);
            if let GameEvent::Goal { scorer } = event {
                log::info!(
                    "Score {}-{} after {:.1}s",
                    score.player1,
                    score.player2,
                    state.frame as f32 * limits.dt * NOMINAL_FRAME_MS / 1000.0
                );
                goal_pause = Some((GOAL_PAUSE_FRAMES, scorer.opponent()));
            }
        }

        if score.leader_reached(limits.target_score) {
            break;
        }
    }
    log::info!(
        "Match over after {} frames: {} paddle hits, {} bounces",
        state.frame,
        score.hits,
        score.bounces
    );
    score
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pitch Duel (headless) starting...");

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Invalid settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let limits = match (
        env_number("PITCH_DUEL_TARGET_SCORE", DEFAULT_TARGET_SCORE),
        env_number("PITCH_DUEL_MAX_FRAMES", DEFAULT_MAX_FRAMES),
        env_number("PITCH_DUEL_FRAME_MS", NOMINAL_FRAME_MS),
    ) {
        (Ok(target_score), Ok(max_frames), Ok(frame_ms)) => RunLimits {
            target_score: target_score.max(1),
            max_frames,
            dt: frame_delta(frame_ms),
        },
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
            log::error!("Invalid run limit: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Seed {}, difficulty {}, opponent {:?}, first to {}",
        settings.seed,
        settings.difficulty.as_str(),
        settings.opponent,
        limits.target_score
    );
    let score = run_match(&settings, &limits);

    let verdict = match score.player1.cmp(&score.player2) {
        std::cmp::Ordering::Greater => "Player 1 wins",
        std::cmp::Ordering::Less => "Player 2 wins",
        std::cmp::Ordering::Equal => "Draw",
    };
    log::info!("Final score {}-{}: {}", score.player1, score.player2, verdict);
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds drive `pitch_duel::sim::tick` from the host's frame loop
}
