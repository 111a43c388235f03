//! Tuning configuration.
//!
//! All gameplay and generation constants live here, loadable from a RON
//! file with compiled-in defaults. Values are validated once at load; a
//! degenerate configuration (checkpoint schedule that cannot fit, chance
//! outside [0, 1]) is rejected up front instead of failing mid-generation.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::rect::Rect;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Validation(String),
}

/// Top-level tuning, grouped the way the systems consume it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Downward acceleration applied to every physics entity.
    pub gravity: f32,
    /// Collision step size in pixels; bounds how far a body can move
    /// between intersection tests.
    pub move_step: f32,
    pub player: PlayerConfig,
    pub generator: GeneratorConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 1000.0,
            move_step: 8.0,
            player: PlayerConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Acceleration added per held direction key.
    pub move_speed: f32,
    /// Upward velocity applied on jump.
    pub jump_speed: f32,
    /// Per-axis speed clamp.
    pub max_speed: Vec2,
    /// Collision rectangle in sprite-local texels.
    pub collider: Rect,
    pub scale: Vec2,
    /// Sprite sheet layout, in texels.
    pub frame_size: (u32, u32),
    pub sheet_size: (u32, u32),
    pub texture: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 400.0,
            jump_speed: 550.0,
            max_speed: Vec2::new(400.0, 400.0),
            collider: Rect::new(0.0, 0.0, 50.0, 37.0),
            scale: Vec2::new(10.0, 10.0),
            frame_size: (50, 37),
            sheet_size: (350, 444),
            texture: String::from("adventurer"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub platform_count: usize,
    pub platform_width: f32,
    pub platform_height: f32,
    /// Horizontal gap between consecutive platforms.
    pub jump_length: f32,
    /// Vertical rise/drop between consecutive platforms.
    pub jump_height: f32,
    /// Position of the first platform.
    pub origin: Vec2,
    /// Platforms at the start of the level that stay plain.
    pub grace_platforms: usize,
    /// Per-step chance of a lethal platform between two jumps.
    pub hazard_chance: f64,
    /// Per-step chance of converting a platform into a moving one.
    pub moving_platform_chance: f64,
    /// Horizontal travel span of a moving platform.
    pub moving_platform_span: f32,
    pub moving_platform_speed: f32,
    /// Pause at each endpoint before reversing.
    pub moving_platform_pause: f32,
    /// A checkpoint lands every this many platforms past the grace count.
    pub checkpoint_interval: usize,
    /// Total checkpoints; the last one is the win trigger.
    pub checkpoint_count: usize,
    /// Activation distance between player and checkpoint.
    pub checkpoint_radius: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            platform_count: 100,
            platform_width: 500.0,
            platform_height: 50.0,
            jump_length: 200.0,
            jump_height: 100.0,
            origin: Vec2::new(25.0, 500.0),
            grace_platforms: 3,
            hazard_chance: 0.3,
            moving_platform_chance: 0.2,
            moving_platform_span: 300.0,
            moving_platform_speed: 120.0,
            moving_platform_pause: 1.5,
            checkpoint_interval: 10,
            checkpoint_count: 5,
            checkpoint_radius: 200.0,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(value: f32, name: &str) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Validation(format!(
                    "{name} must be positive, got {value}"
                )))
            }
        }

        fn chance(value: f64, name: &str) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::Validation(format!(
                    "{name} must be within [0, 1], got {value}"
                )))
            }
        }

        positive(self.gravity, "gravity")?;
        positive(self.move_step, "move_step")?;

        positive(self.player.move_speed, "player.move_speed")?;
        positive(self.player.jump_speed, "player.jump_speed")?;
        positive(self.player.max_speed.x, "player.max_speed.x")?;
        positive(self.player.max_speed.y, "player.max_speed.y")?;
        positive(self.player.collider.w, "player.collider.w")?;
        positive(self.player.collider.h, "player.collider.h")?;
        positive(self.player.scale.x, "player.scale.x")?;
        positive(self.player.scale.y, "player.scale.y")?;
        if self.player.frame_size.0 == 0 || self.player.frame_size.1 == 0 {
            return Err(ConfigError::Validation(String::from(
                "player.frame_size must be non-zero",
            )));
        }

        let generator = &self.generator;
        if generator.platform_count == 0 {
            return Err(ConfigError::Validation(String::from(
                "generator.platform_count must be at least 1",
            )));
        }
        positive(generator.platform_width, "generator.platform_width")?;
        positive(generator.platform_height, "generator.platform_height")?;
        positive(generator.jump_length, "generator.jump_length")?;
        positive(generator.jump_height, "generator.jump_height")?;
        chance(generator.hazard_chance, "generator.hazard_chance")?;
        chance(
            generator.moving_platform_chance,
            "generator.moving_platform_chance",
        )?;
        positive(generator.moving_platform_span, "generator.moving_platform_span")?;
        positive(
            generator.moving_platform_speed,
            "generator.moving_platform_speed",
        )?;
        if generator.moving_platform_pause < 0.0 {
            return Err(ConfigError::Validation(String::from(
                "generator.moving_platform_pause must not be negative",
            )));
        }
        positive(generator.checkpoint_radius, "generator.checkpoint_radius")?;
        if generator.checkpoint_interval == 0 {
            return Err(ConfigError::Validation(String::from(
                "generator.checkpoint_interval must be at least 1",
            )));
        }
        if generator.checkpoint_count == 0 {
            return Err(ConfigError::Validation(String::from(
                "generator.checkpoint_count must be at least 1",
            )));
        }

        // Checkpoints land at grace + interval, grace + 2*interval, ...;
        // the whole schedule has to fit inside the platform sequence.
        let last_checkpoint =
            generator.grace_platforms + generator.checkpoint_interval * generator.checkpoint_count;
        if last_checkpoint >= generator.platform_count {
            return Err(ConfigError::Validation(format!(
                "checkpoint schedule needs platform {last_checkpoint} but only {} are generated",
                generator.platform_count
            )));
        }

        Ok(())
    }
}

/// Load and validate a RON config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GameConfig, ConfigError> {
    let text = fs::read_to_string(path)?;
    let config: GameConfig = ron::from_str(&text)?;
    config.validate()?;
    Ok(config)
}
