//! Physics and level balance
//!
//! Loaded from JSON so balance can change without a rebuild. Every field has a
//! default, so a tuning file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading tuning data
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// What happens when a target particle is lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LossRule {
    /// Levels can only be won; lost particles just stay lost
    #[default]
    None,
    /// Any target particle ending anywhere but a safe target fails the level
    AnyTargetLost,
}

impl LossRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            LossRule::None => "none",
            LossRule::AnyTargetLost => "any_target_lost",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Some(LossRule::None),
            "any_target_lost" | "strict" => Some(LossRule::AnyTargetLost),
            _ => None,
        }
    }
}

/// Simulation tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play field ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Physics ===
    /// Gravitational constant
    pub gravity: f32,
    /// Speed cap, units per reference tick
    pub max_velocity: f32,
    /// Drag length per unit of launch speed
    pub launch_scale: f32,
    /// Distance floor for the force calculation
    pub distance_epsilon: f32,

    // === Particles ===
    pub particle_radius: f32,
    pub pick_radius: f32,
    pub trail_length: usize,

    // === Progression ===
    pub target_reward: u64,
    pub level_complete_delay_ticks: u32,
    pub loss_rule: LossRule,

    // === Generation ===
    pub placement_attempts: u32,

    // === Aiming ===
    pub preview_ticks: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            gravity: GRAVITY_CONSTANT,
            max_velocity: MAX_VELOCITY,
            launch_scale: LAUNCH_SCALE,
            distance_epsilon: DISTANCE_EPSILON,

            particle_radius: PARTICLE_RADIUS,
            pick_radius: PICK_RADIUS,
            trail_length: TRAIL_LENGTH,

            target_reward: TARGET_REWARD,
            level_complete_delay_ticks: LEVEL_COMPLETE_DELAY_TICKS,
            loss_rule: LossRule::None,

            placement_attempts: PLACEMENT_ATTEMPTS,

            preview_ticks: PREVIEW_TICKS,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starter tuning file)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reject values the physics cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("gravity", self.gravity),
            ("max_velocity", self.max_velocity),
            ("launch_scale", self.launch_scale),
            ("distance_epsilon", self.distance_epsilon),
            ("particle_radius", self.particle_radius),
            ("pick_radius", self.pick_radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                });
            }
        }
        if self.trail_length == 0 {
            return Err(ConfigError::Invalid {
                field: "trail_length",
                reason: "must hold at least one point",
            });
        }
        if self.placement_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "placement_attempts",
                reason: "must allow at least one attempt",
            });
        }
        Ok(())
    }

    /// True if `pos` lies inside the play field (edges inclusive)
    #[inline]
    pub fn in_bounds(&self, pos: glam::Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.canvas_width && pos.y >= 0.0 && pos.y <= self.canvas_height
    }
}
