//! Capture resolution
//!
//! Runs after integration on every particle still in flight. Rules are
//! checked in a fixed order and the first match wins:
//! 1. inside an active attractor's radius
//! 2. outside the play field
//! 3. overlapping a target (safe + target particle scores, hazard destroys,
//!    safe + decoy passes through)

use glam::Vec2;

use super::state::{Attractor, Level, Particle, ParticleState, SimEvent, Target};
use crate::tuning::Tuning;

/// Outcome of checking one particle against the capture rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    Attractor { attractor_id: u32 },
    Boundary,
    Hazard { target_id: u32 },
    Landed { target_id: u32 },
}

impl Capture {
    /// Terminal state this capture puts the particle in
    pub fn state(&self) -> ParticleState {
        match self {
            Capture::Attractor { .. } => ParticleState::CapturedByAttractor,
            Capture::Boundary => ParticleState::CapturedByBoundary,
            Capture::Hazard { .. } => ParticleState::CapturedByHazard,
            Capture::Landed { .. } => ParticleState::CapturedByTargetSuccess,
        }
    }
}

/// Check if a point is inside an active attractor's capture radius
pub fn attractor_capture(pos: Vec2, attractors: &[Attractor]) -> Option<u32> {
    attractors
        .iter()
        .filter(|a| a.active)
        .find(|a| pos.distance(a.pos) < a.radius)
        .map(|a| a.id)
}

/// Check the particle against every target, in id order.
///
/// A decoy overlapping a safe target is explicitly ignored and the search
/// continues, so a decoy touching both a safe target and a hazard is still
/// destroyed.
pub fn target_contact(pos: Vec2, radius: f32, is_target: bool, targets: &[Target]) -> Option<Capture> {
    for target in targets {
        if pos.distance(target.pos) >= target.radius + radius {
            continue;
        }
        match (target.safe, is_target) {
            (false, _) => return Some(Capture::Hazard { target_id: target.id }),
            (true, true) => return Some(Capture::Landed { target_id: target.id }),
            (true, false) => continue,
        }
    }
    None
}

/// Apply the capture rules, in precedence order, to one particle position
pub fn classify(particle: &Particle, level: &Level, tuning: &Tuning) -> Option<Capture> {
    if let Some(attractor_id) = attractor_capture(particle.pos, &level.attractors) {
        return Some(Capture::Attractor { attractor_id });
    }
    if !tuning.in_bounds(particle.pos) {
        return Some(Capture::Boundary);
    }
    target_contact(particle.pos, particle.radius, particle.is_target, &level.targets)
}

/// Resolve captures for every particle in flight, updating states and score.
///
/// Returns the events produced, in particle id order.
pub fn resolve(level: &mut Level, tuning: &Tuning) -> Vec<SimEvent> {
    let captures: Vec<(usize, Capture)> = level
        .particles
        .iter()
        .enumerate()
        .filter(|(_, p)| p.in_flight())
        .filter_map(|(i, p)| classify(p, level, tuning).map(|c| (i, c)))
        .collect();

    let mut events = Vec::with_capacity(captures.len());
    for (i, capture) in captures {
        let particle = &mut level.particles[i];
        particle.state = capture.state();
        log::debug!("Particle {} {:?} at {:?}", particle.id, capture, particle.pos);

        if let Capture::Landed { target_id } = capture {
            level.score += tuning.target_reward;
            events.push(SimEvent::Scored {
                particle_id: particle.id,
                target_id,
                points: tuning.target_reward,
            });
        }
        events.push(SimEvent::Captured {
            particle_id: particle.id,
            state: particle.state,
        });
    }
    events
}
