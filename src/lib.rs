//! Gravity Well - a multi-attractor gravity puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, physics, capture, launch, progression)
//! - `tuning`: Data-driven physics and level balance

pub mod sim;
pub mod tuning;

pub use sim::{Level, LevelView, Session, init, launch, snapshot, step};
pub use tuning::{ConfigError, LossRule, Tuning};

use glam::Vec2;

/// Simulation configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Reference timestep; velocities are expressed in units per reference tick
    pub const SIM_DT: f32 = 0.016;

    /// Play field dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Gravitational constant applied to attractor mass
    pub const GRAVITY_CONSTANT: f32 = 50.0;
    /// Particle speed cap (units per reference tick)
    pub const MAX_VELOCITY: f32 = 8.0;
    /// Drag length (units) per unit of launch speed
    pub const LAUNCH_SCALE: f32 = 25.0;
    /// Distance floor for the inverse-square force
    pub const DISTANCE_EPSILON: f32 = 1.0;

    /// Particle collision radius used for target landing
    pub const PARTICLE_RADIUS: f32 = 10.0;
    /// Pointer hit radius for selecting a particle
    pub const PICK_RADIUS: f32 = 20.0;
    /// Number of trail points kept per particle
    pub const TRAIL_LENGTH: usize = 20;

    /// Score for landing a target particle on a safe target
    pub const TARGET_REWARD: u64 = 100;
    /// Delay between win detection and the next level (~2 s at the reference rate)
    pub const LEVEL_COMPLETE_DELAY_TICKS: u32 = 125;
    /// Placement retries before an overlapping target is accepted
    pub const PLACEMENT_ATTEMPTS: u32 = 10;
    /// Ticks of trajectory shown while aiming
    pub const PREVIEW_TICKS: usize = 90;
}

/// Unit vector from `from` toward `to` and the distance between them,
/// with the distance floored at `epsilon`.
///
/// Coincident points yield a zero direction rather than NaN.
#[inline]
pub fn direction_and_distance(from: Vec2, to: Vec2, epsilon: f32) -> (Vec2, f32) {
    let delta = to - from;
    let raw = delta.length();
    let distance = raw.max(epsilon);
    let dir = if raw > 0.0 { delta / raw } else { Vec2::ZERO };
    (dir, distance)
}

/// Rescale `v` so its length does not exceed `max`, preserving direction.
///
/// The result's length is never above `max`, even after rounding.
#[inline]
pub fn clamp_speed(v: Vec2, max: f32) -> Vec2 {
    let speed = v.length();
    if speed <= max || speed.is_nan() {
        return v;
    }
    let mut out = v * (max / speed);
    // `max / speed` can round up by an ulp
    while out.length() > max {
        out *= 1.0 - f32::EPSILON;
    }
    out
}
