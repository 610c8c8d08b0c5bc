//! Level generation
//!
//! Layout bands are fractions of the play field, so a resized canvas keeps
//! the same puzzle shape: particles spawn on the left edge, attractors fill
//! the middle in columns, hazards sit in the middle lane and safe targets
//! line the right edge.

use std::ops::Range;

use glam::Vec2;
use rand::Rng;

use super::rng::RandomSource;
use super::state::Level;
use crate::tuning::Tuning;

/// Attractor mass range
pub const ATTRACTOR_MASS: Range<f32> = 100.0..150.0;
/// Attractor capture radius range
pub const ATTRACTOR_RADIUS: Range<f32> = 30.0..50.0;
/// Safe target radius
pub const SAFE_TARGET_RADIUS: f32 = 20.0;
/// Hazard target radius
pub const HAZARD_RADIUS: f32 = 15.0;

/// Horizontal band shared by attractor columns (fraction of width)
const ATTRACTOR_BAND_X: Range<f32> = 0.25..0.75;
/// Vertical band for attractors (fraction of height)
const ATTRACTOR_BAND_Y: Range<f32> = 0.25..0.75;
/// Horizontal band for safe targets
const SAFE_BAND_X: Range<f32> = 0.75..0.9375;
/// Horizontal band for hazards
const HAZARD_BAND_X: Range<f32> = 0.375..0.625;
/// Vertical band for all targets
const TARGET_BAND_Y: Range<f32> = (1.0 / 6.0)..(5.0 / 6.0);
/// Spawn column for particles
const SPAWN_X: f32 = 0.0625;

/// Number of attractors on a level
pub fn attractor_count(index: u32) -> u32 {
    index.saturating_add(1)
}

/// Number of safe targets on a level
pub fn safe_target_count(index: u32) -> u32 {
    index.saturating_add(2)
}

/// Number of hazards on a level
pub fn hazard_count(index: u32) -> u32 {
    index
}

/// Number of particles on a level (the first `target_particle_count` are targets)
pub fn particle_count(index: u32) -> u32 {
    index.saturating_add(3)
}

/// Number of particles that must land to win
pub fn target_particle_count(index: u32) -> u32 {
    index.saturating_add(2)
}

/// Scale a fractional band to field coordinates
fn band(fraction: &Range<f32>, extent: f32) -> Range<f32> {
    (fraction.start * extent)..(fraction.end * extent)
}

/// Build the level for `index`, drawing every random value from `rng`.
///
/// The same index and rng state always produce the same level. The returned
/// level has identity 0; the session assigns a real identity.
pub fn generate_level<R: Rng>(index: u32, rng: &mut R, tuning: &Tuning) -> Level {
    let mut level = Level::new(index);
    let w = tuning.canvas_width;
    let h = tuning.canvas_height;

    // Attractors, one per column across the middle band
    let count = attractor_count(index);
    let band_x = band(&ATTRACTOR_BAND_X, w);
    let band_y = band(&ATTRACTOR_BAND_Y, h);
    let column = (band_x.end - band_x.start) / count as f32;
    for i in 0..count {
        let x = band_x.start + column * i as f32 + rng.random_range(0.0..column * 0.5);
        let y = rng.random_range(band_y.clone());
        let mass = rng.random_range(ATTRACTOR_MASS);
        let radius = rng.random_range(ATTRACTOR_RADIUS);
        level.add_attractor(Vec2::new(x, y), mass, radius);
    }

    // Safe targets, then hazards
    let target_y = band(&TARGET_BAND_Y, h);
    let safe_x = band(&SAFE_BAND_X, w);
    for _ in 0..safe_target_count(index) {
        let pos = place_target(&level, rng, &safe_x, &target_y, SAFE_TARGET_RADIUS, tuning);
        level.add_target(pos, SAFE_TARGET_RADIUS, true);
    }
    let hazard_x = band(&HAZARD_BAND_X, w);
    for _ in 0..hazard_count(index) {
        let pos = place_target(&level, rng, &hazard_x, &target_y, HAZARD_RADIUS, tuning);
        level.add_target(pos, HAZARD_RADIUS, false);
    }

    // Particles stacked evenly along the spawn column
    let particles = particle_count(index);
    let targets = target_particle_count(index);
    let spacing = h / (particles as f32 + 1.0);
    for i in 0..particles {
        let pos = Vec2::new(SPAWN_X * w, spacing * (i + 1) as f32);
        level.add_particle(pos, tuning.particle_radius, i < targets, tuning.trail_length);
    }

    log::info!(
        "Level {}: {} attractors, {} safe targets, {} hazards, {} particles ({} targets)",
        index,
        level.attractors.len(),
        safe_target_count(index),
        hazard_count(index),
        particles,
        targets
    );

    level
}

/// Generate level `index` from a fresh source seeded with `seed`, using
/// default tuning. The level gets identity 1.
pub fn init(index: u32, seed: u64) -> Level {
    init_with(index, seed, &Tuning::default())
}

/// Like [`init`], with explicit tuning
pub fn init_with(index: u32, seed: u64, tuning: &Tuning) -> Level {
    let mut rng = RandomSource::new(seed);
    let mut level = generate_level(index, &mut rng, tuning);
    level.id = 1;
    level
}

/// Pick a target position, retrying a bounded number of times to avoid
/// overlapping attractors and earlier targets. The last draw is kept even if
/// it still overlaps.
fn place_target<R: Rng>(
    level: &Level,
    rng: &mut R,
    xs: &Range<f32>,
    ys: &Range<f32>,
    radius: f32,
    tuning: &Tuning,
) -> Vec2 {
    let attempts = tuning.placement_attempts.max(1);
    let mut pos = Vec2::ZERO;
    for attempt in 0..attempts {
        pos = Vec2::new(rng.random_range(xs.clone()), rng.random_range(ys.clone()));
        if !overlaps(level, pos, radius) {
            return pos;
        }
        log::trace!("Target placement {} overlaps, retrying", attempt + 1);
    }
    log::debug!("Accepting overlapping target at {:?} after {} attempts", pos, attempts);
    pos
}

fn overlaps(level: &Level, pos: Vec2, radius: f32) -> bool {
    let hits_attractor = level
        .attractors
        .iter()
        .any(|a| a.pos.distance(pos) < a.radius + radius);
    let hits_target = level
        .targets
        .iter()
        .any(|t| t.pos.distance(pos) < t.radius + radius);
    hits_attractor || hits_target
}
