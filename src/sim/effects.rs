//! Transient visual effects
//!
//! Trail, particles, shockwaves, the goal banner and screen shake. Events
//! spawn them and they remove themselves once faded. None of this feeds back
//! into physics.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_BALL_SPEED;
use crate::settings::Rgb;

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 10;
pub const MAX_CONFETTI: usize = 512;
pub const MAX_IMPACT_PARTICLES: usize = 256;
pub const MAX_SPEED_SPARKS: usize = 128;
pub const MAX_SHOCKWAVES: usize = 16;
/// Confetti pieces per goal
pub const CONFETTI_BURST: usize = 150;
/// Banner progress at which it has scrolled fully off screen
pub const BANNER_END: f32 = 1.2;
/// Frames a banner takes to cross the pitch once
pub const BANNER_FRAMES: f32 = 210.0;

pub const GOAL_TEXTS: [&str; 3] = ["GOOOOOOOOOOL!", "WHAT A GOAL!", "BRILLIANT!"];

/// Fixed-capacity ring buffer; pushing into a full pool evicts the oldest
#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> Pool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub opacity: f32,
}

/// A spark, confetti piece or speed spark
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Rgb,
    /// 0-1, removed at 0
    pub opacity: f32,
}

/// Expanding ring
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Shockwave {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub opacity: f32,
    /// Stroke width at full opacity
    pub width: f32,
    pub color: Rgb,
}

/// How the goal banner animates its letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BannerStyle {
    DefaultScroll,
    WaveScroll,
    ZoomScroll,
}

impl BannerStyle {
    pub const ALL: [BannerStyle; 3] = [
        BannerStyle::DefaultScroll,
        BannerStyle::WaveScroll,
        BannerStyle::ZoomScroll,
    ];
}

/// Scrolling goal text
#[derive(Debug, Clone, Serialize)]
pub struct GoalBanner {
    pub style: BannerStyle,
    pub text: &'static str,
    /// 0 = entering from the left, 1 = fully crossed; removed at BANNER_END
    pub progress: f32,
    pub y: f32,
    pub colors: [Rgb; 2],
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    pub intensity: f32,
    /// Frames remaining
    pub duration: f32,
}

impl ScreenShake {
    pub fn is_active(&self) -> bool {
        self.duration > 0.0
    }
}

/// All effect state for a match
#[derive(Debug, Clone)]
pub struct Effects {
    /// Newest first
    pub trail: VecDeque<TrailPoint>,
    pub confetti: Pool<Particle>,
    pub impacts: Pool<Particle>,
    pub speed_sparks: Pool<Particle>,
    pub shockwaves: Pool<Shockwave>,
    pub banner: Option<GoalBanner>,
    pub shake: ScreenShake,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
            confetti: Pool::with_capacity(MAX_CONFETTI),
            impacts: Pool::with_capacity(MAX_IMPACT_PARTICLES),
            speed_sparks: Pool::with_capacity(MAX_SPEED_SPARKS),
            shockwaves: Pool::with_capacity(MAX_SHOCKWAVES),
            banner: None,
            shake: ScreenShake::default(),
        }
    }
}

impl Effects {
    /// Advance every effect by `dt` frames and drop the faded ones
    pub fn decay(&mut self, dt: f32) {
        for point in self.trail.iter_mut() {
            point.opacity -= 0.01 * dt;
        }
        self.trail.retain(|p| p.opacity > 0.0);

        for p in self.confetti.iter_mut() {
            p.vel.y += 0.5 * dt;
            p.vel *= 0.99;
            p.pos += p.vel * dt;
            p.opacity -= 0.005 * dt;
        }
        self.confetti.retain(|p| p.opacity > 0.0);

        for p in self.impacts.iter_mut() {
            p.pos += p.vel * dt;
            p.opacity -= 0.05 * dt;
        }
        self.impacts.retain(|p| p.opacity > 0.0);

        for p in self.speed_sparks.iter_mut() {
            p.pos += p.vel * dt;
            p.opacity -= 0.04 * dt;
        }
        self.speed_sparks.retain(|p| p.opacity > 0.0);

        for s in self.shockwaves.iter_mut() {
            s.radius += 2.0 * dt;
            s.opacity -= 0.04 * dt;
        }
        self.shockwaves.retain(|s| s.opacity > 0.0 && s.radius < s.max_radius);

        if let Some(banner) = &mut self.banner {
            banner.progress += dt / BANNER_FRAMES;
            if banner.progress >= BANNER_END {
                self.banner = None;
            }
        }

        if self.shake.duration > 0.0 {
            self.shake.duration -= dt;
            if self.shake.duration <= 0.0 {
                self.shake = ScreenShake::default();
            }
        }
    }

    /// Record the ball position at the head of the trail
    pub fn record_trail(&mut self, pos: Vec2) {
        self.trail.push_front(TrailPoint { pos, opacity: 1.0 });
        self.trail.truncate(TRAIL_LENGTH);
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Small burst of sparks scattered in every direction
    pub fn spawn_impacts(&mut self, rng: &mut impl Rng, pos: Vec2, count: usize, color: Rgb) {
        for _ in 0..count {
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 4.0,
                (rng.random::<f32>() - 0.5) * 4.0,
            );
            self.impacts.push(Particle {
                pos,
                vel,
                radius: rng.random::<f32>() * 1.5 + 0.5,
                color,
                opacity: 1.0,
            });
        }
    }

    /// Goal celebration, biased upward so it fountains before falling
    pub fn spawn_confetti(&mut self, rng: &mut impl Rng, pos: Vec2, colors: [Rgb; 2]) {
        for _ in 0..CONFETTI_BURST {
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 25.0,
                (rng.random::<f32>() - 0.7) * 25.0,
            );
            let color = if rng.random_bool(0.5) { colors[0] } else { colors[1] };
            self.confetti.push(Particle {
                pos,
                vel,
                radius: rng.random::<f32>() * 4.0 + 2.0,
                color,
                opacity: 1.0,
            });
        }
    }

    /// Sparks shed behind a fast ball
    pub fn spawn_speed_sparks(&mut self, rng: &mut impl Rng, pos: Vec2, vel: Vec2, radius: f32) {
        let speed = vel.length();
        if speed <= MAX_BALL_SPEED * 0.8 {
            return;
        }
        let dir = vel / speed;
        let count = ((speed / MAX_BALL_SPEED) * 2.0).floor() as usize;
        for _ in 0..count {
            let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 2.0;
            let color = if rng.random_bool(0.5) { Rgb::GOLD } else { Rgb::ORANGE };
            self.speed_sparks.push(Particle {
                pos: pos - dir * radius,
                vel: -vel * 0.1 + jitter,
                radius: rng.random::<f32>() * 1.5 + 0.5,
                color,
                opacity: 0.8,
            });
        }
    }

    pub fn spawn_shockwave(&mut self, pos: Vec2, max_radius: f32, color: Rgb) {
        self.shockwaves.push(Shockwave {
            pos,
            radius: 0.0,
            max_radius,
            opacity: 1.0,
            width: max_radius * 0.2,
            color,
        });
    }

    /// Replace any running banner with a randomly styled one
    pub fn show_banner(&mut self, rng: &mut impl Rng, y: f32, colors: [Rgb; 2]) {
        let style = BannerStyle::ALL
            .choose(rng)
            .copied()
            .unwrap_or(BannerStyle::DefaultScroll);
        let text = GOAL_TEXTS.choose(rng).copied().unwrap_or(GOAL_TEXTS[0]);
        self.banner = Some(GoalBanner {
            style,
            text,
            progress: 0.0,
            y,
            colors,
        });
    }

    /// Start a shake, overriding whatever was running
    pub fn shake(&mut self, intensity: f32, duration: f32) {
        self.shake = ScreenShake {
            intensity,
            duration,
        };
    }

    /// Total live particles across all pools
    pub fn particle_count(&self) -> usize {
        self.confetti.len() + self.impacts.len() + self.speed_sparks.len()
    }
}
