//! Match settings
//!
//! Static configuration handed to the simulator when a match starts. Only the
//! difficulty and opponent kind affect simulation; palettes colour effects and
//! the style tags are passed through for the renderer.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// AI difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    #[default]
    Normal,
    Hard,
    VeryHard,
    Impossible,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::VeryHard,
        Difficulty::Impossible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "very-easy",
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::VeryHard => "very-hard",
            Difficulty::Impossible => "impossible",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "very-easy" => Some(Difficulty::VeryEasy),
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "very-hard" => Some(Difficulty::VeryHard),
            "impossible" => Some(Difficulty::Impossible),
            _ => None,
        }
    }

    /// AI reaction coefficient
    ///
    /// Scales both the proportional tracking gain and the per-frame speed cap.
    /// Kept below 0.2 so the tracking gain stays under one per frame.
    pub fn reaction(&self) -> f32 {
        match self {
            Difficulty::VeryEasy => 0.05,
            Difficulty::Easy => 0.07,
            Difficulty::Normal => 0.1,
            Difficulty::Hard => 0.12,
            Difficulty::VeryHard => 0.15,
            Difficulty::Impossible => 0.18,
        }
    }
}

/// Who controls the top paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Opponent {
    #[default]
    Ai,
    Human,
}

/// Trail rendering style (opaque to the simulation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrailEffect {
    #[default]
    Default,
    Flame,
    Pixel,
    None,
}

/// An sRGB colour parsed from `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const YELLOW: Rgb = Rgb::new(0xFF, 0xFF, 0x00);
    pub const SPARK: Rgb = Rgb::new(0xFF, 0xEB, 0x3B);
    pub const GOLD: Rgb = Rgb::new(0xFF, 0xD7, 0x00);
    pub const ORANGE: Rgb = Rgb::new(0xFF, 0x8C, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

/// A team's two kit colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPalette {
    pub primary: Rgb,
    pub secondary: Rgb,
}

impl TeamPalette {
    pub const fn new(primary: Rgb, secondary: Rgb) -> Self {
        Self { primary, secondary }
    }

    pub fn colors(&self) -> [Rgb; 2] {
        [self.primary, self.secondary]
    }
}

/// Everything the simulator needs to know before kickoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// AI difficulty (ignored against a human opponent)
    pub difficulty: Difficulty,
    /// Top paddle controller
    pub opponent: Opponent,
    /// Bottom side colours
    pub player1: TeamPalette,
    /// Top side colours
    pub player2: TeamPalette,
    /// Seed for particle spread, banner picks and random kickoffs
    pub seed: u64,
    /// Fraction of the view height splitting player 1 and player 2 pointers
    pub control_split_ratio: f32,

    // === Renderer pass-through ===
    pub ball_design: String,
    pub trail_effect: TrailEffect,
    pub field_design: String,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            opponent: Opponent::Ai,
            player1: TeamPalette::new(Rgb::new(0xE5, 0x39, 0x35), Rgb::WHITE),
            player2: TeamPalette::new(Rgb::new(0x1E, 0x88, 0xE5), Rgb::new(0x0D, 0x47, 0xA1)),
            seed: 0x5EED,
            control_split_ratio: 0.5,
            ball_design: "default".to_string(),
            trail_effect: TrailEffect::Default,
            field_design: "classic_day".to_string(),
        }
    }
}

impl MatchSettings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {} (difficulty {}, opponent {:?})",
            path.display(),
            settings.difficulty.as_str(),
            settings.opponent
        );
        Ok(settings)
    }

    /// Apply a single `key=value` override (used for env vars and CLI flags)
    pub fn set(&mut self, key: &'static str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        };
        match key {
            "difficulty" => {
                self.difficulty = Difficulty::from_str(value)
                    .ok_or_else(|| ConfigError::UnknownDifficulty(value.to_string()))?;
            }
            "opponent" => {
                self.opponent = match value.to_lowercase().as_str() {
                    "ai" | "cpu" => Opponent::Ai,
                    "human" => Opponent::Human,
                    _ => return Err(invalid()),
                };
            }
            "seed" => self.seed = value.parse().map_err(|_| invalid())?,
            "control_split_ratio" => {
                self.control_split_ratio = value.parse().map_err(|_| invalid())?;
            }
            _ => return Err(invalid()),
        }
        Ok(())
    }

    /// AI reaction coefficient, or `None` when both paddles are human
    pub fn ai_reaction(&self) -> Option<f32> {
        match self.opponent {
            Opponent::Ai => Some(self.difficulty.reaction()),
            Opponent::Human => None,
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&self.control_split_ratio) {
            return Err(ConfigError::InvalidValue {
                key: "control_split_ratio",
                value: self.control_split_ratio.to_string(),
            });
        }
        Ok(self)
    }
}
