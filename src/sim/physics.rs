//! Gravity integration
//!
//! Semi-implicit Euler: accumulate inverse-square pull from every active
//! attractor, update velocity, cap speed, then move. Only particles in free
//! flight are touched; terminal particles stay frozen.

use glam::Vec2;

use super::state::{Attractor, Level, Particle};
use crate::consts::SIM_DT;
use crate::tuning::Tuning;
use crate::{clamp_speed, direction_and_distance};

/// Summed gravitational acceleration at `pos` from all active attractors
pub fn gravity_at(pos: Vec2, attractors: &[Attractor], tuning: &Tuning) -> Vec2 {
    attractors
        .iter()
        .filter(|a| a.active)
        .fold(Vec2::ZERO, |force, a| {
            let (dir, distance) = direction_and_distance(pos, a.pos, tuning.distance_epsilon);
            force + dir * (tuning.gravity * a.mass / (distance * distance))
        })
}

/// Advance a single particle by `dt`, ignoring its state tag.
///
/// Velocity is in units per reference tick, so displacement is scaled by
/// `dt / SIM_DT`; at the reference timestep a particle moves by exactly its
/// velocity.
pub fn advance(particle: &mut Particle, attractors: &[Attractor], dt: f32, tuning: &Tuning) {
    let force = gravity_at(particle.pos, attractors, tuning);
    particle.vel = clamp_speed(particle.vel + force * dt, tuning.max_velocity);
    particle.pos += particle.vel * (dt / SIM_DT);
    particle.trail.push(particle.pos);
}

/// Step every launched particle on the level
pub fn integrate(level: &mut Level, dt: f32, tuning: &Tuning) {
    let attractors = &level.attractors;
    for particle in level.particles.iter_mut().filter(|p| p.in_flight()) {
        advance(particle, attractors, dt, tuning);
    }
}
