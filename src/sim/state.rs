//! Level state and core simulation types
//!
//! A `Level` owns every entity in play. Entities are stored in id order and
//! mutated in place each tick; renderers read them through `LevelView`.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identity of a generated level instance (distinct from its index)
pub type LevelId = u64;

/// Lifecycle of a particle, from spawn to capture
///
/// The four `Captured*` states are terminal: a particle that reaches one is
/// frozen for the rest of the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleState {
    /// Waiting at spawn, no velocity
    Idle,
    /// Picked by the pointer, not yet dragged
    Selected,
    /// Drag in progress, aim preview active
    Dragging,
    /// Free flight under gravity
    Launched,
    /// Swallowed by an attractor
    CapturedByAttractor,
    /// Left the play field
    CapturedByBoundary,
    /// Hit a hazard target
    CapturedByHazard,
    /// Target particle landed on a safe target
    CapturedByTargetSuccess,
}

impl ParticleState {
    /// True for the four capture states
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ParticleState::CapturedByAttractor
                | ParticleState::CapturedByBoundary
                | ParticleState::CapturedByHazard
                | ParticleState::CapturedByTargetSuccess
        )
    }

    /// True if a launch may still be committed for this particle
    pub fn is_launchable(&self) -> bool {
        matches!(
            self,
            ParticleState::Idle | ParticleState::Selected | ParticleState::Dragging
        )
    }
}

/// Notable things that happened during a tick (for audio/UI hooks and logs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A pending launch was applied
    Launched { particle_id: u32, vel: Vec2 },
    /// A particle entered a terminal state
    Captured {
        particle_id: u32,
        state: ParticleState,
    },
    /// A target particle landed safely
    Scored {
        particle_id: u32,
        target_id: u32,
        points: u64,
    },
    /// Every target particle landed; transition pending
    LevelComplete { index: u32 },
    /// A target particle was lost under a strict loss rule
    LevelFailed { index: u32 },
    /// A new level replaced the old one
    LevelStarted { index: u32 },
}

/// Fixed-capacity history of recent positions (oldest evicted first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a point, dropping the oldest when full
    pub fn push(&mut self, pos: Vec2) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(pos);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Points from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }

    /// Most recently recorded point
    pub fn newest(&self) -> Option<Vec2> {
        self.points.back().copied()
    }
}

/// A fixed gravitational source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attractor {
    pub id: u32,
    pub pos: Vec2,
    /// Strictly positive
    pub mass: f32,
    /// Capture radius, strictly positive
    pub radius: f32,
    /// Inactive attractors neither pull nor capture
    pub active: bool,
}

impl Attractor {
    pub fn new(id: u32, pos: Vec2, mass: f32, radius: f32) -> Self {
        debug_assert!(mass > 0.0 && radius > 0.0);
        Self {
            id,
            pos,
            mass,
            radius,
            active: true,
        }
    }
}

/// A landing zone; safe targets win, hazards destroy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub safe: bool,
}

impl Target {
    pub fn new(id: u32, pos: Vec2, radius: f32, safe: bool) -> Self {
        debug_assert!(radius > 0.0);
        Self {
            id,
            pos,
            radius,
            safe,
        }
    }
}

/// A launchable particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision radius for target landing
    pub radius: f32,
    pub state: ParticleState,
    /// Must land on a safe target to win the level
    pub is_target: bool,
    /// Recent positions for rendering
    pub trail: Trail,
}

impl Particle {
    pub fn new(id: u32, pos: Vec2, radius: f32, is_target: bool, trail_length: usize) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            state: ParticleState::Idle,
            is_target,
            trail: Trail::new(trail_length),
        }
    }

    /// True while the particle is in free flight
    #[inline]
    pub fn in_flight(&self) -> bool {
        self.state == ParticleState::Launched
    }
}

/// One puzzle level: every entity in play plus its score and clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Instance identity, used to reject stale transitions
    pub id: LevelId,
    /// Difficulty index (0-based)
    pub index: u32,
    /// Attractors (sorted by id)
    pub attractors: Vec<Attractor>,
    /// Safe targets then hazards (sorted by id)
    pub targets: Vec<Target>,
    /// Particles (sorted by id)
    pub particles: Vec<Particle>,
    /// Score earned on this level
    pub score: u64,
    /// Ticks simulated on this level
    pub time_ticks: u64,
    next_id: u32,
}

impl Level {
    /// Create an empty level
    pub fn new(index: u32) -> Self {
        Self {
            id: 0,
            index,
            attractors: Vec::new(),
            targets: Vec::new(),
            particles: Vec::new(),
            score: 0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_attractor(&mut self, pos: Vec2, mass: f32, radius: f32) -> u32 {
        let id = self.next_entity_id();
        self.attractors.push(Attractor::new(id, pos, mass, radius));
        id
    }

    pub fn add_target(&mut self, pos: Vec2, radius: f32, safe: bool) -> u32 {
        let id = self.next_entity_id();
        self.targets.push(Target::new(id, pos, radius, safe));
        id
    }

    pub fn add_particle(
        &mut self,
        pos: Vec2,
        radius: f32,
        is_target: bool,
        trail_length: usize,
    ) -> u32 {
        let id = self.next_entity_id();
        self.particles
            .push(Particle::new(id, pos, radius, is_target, trail_length));
        id
    }

    pub fn particle(&self, id: u32) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn particle_mut(&mut self, id: u32) -> Option<&mut Particle> {
        self.particles.iter_mut().find(|p| p.id == id)
    }

    /// Particles that must land for the level to be won
    pub fn target_particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_evicts_oldest() {
        let mut trail = Trail::new(3);
        for i in 0..5 {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), 3);
        let xs: Vec<f32> = trail.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
        assert_eq!(trail.newest(), Some(Vec2::new(4.0, 0.0)));
    }

    #[test]
    fn test_trail_zero_capacity_clamped() {
        let mut trail = Trail::new(0);
        trail.push(Vec2::ONE);
        trail.push(Vec2::ZERO);
        assert_eq!(trail.capacity(), 1);
        assert_eq!(trail.len(), 1);
        assert_eq!(trail.newest(), Some(Vec2::ZERO));
    }

    #[test]
    fn test_state_classification() {
        use ParticleState::*;
        for s in [Idle, Selected, Dragging] {
            assert!(s.is_launchable());
            assert!(!s.is_terminal());
        }
        assert!(!Launched.is_launchable());
        assert!(!Launched.is_terminal());
        for s in [
            CapturedByAttractor,
            CapturedByBoundary,
            CapturedByHazard,
            CapturedByTargetSuccess,
        ] {
            assert!(s.is_terminal());
            assert!(!s.is_launchable());
        }
    }

    #[test]
    fn test_entity_ids_unique_and_ordered() {
        let mut level = Level::new(0);
        let a = level.add_attractor(Vec2::new(100.0, 100.0), 120.0, 30.0);
        let t = level.add_target(Vec2::new(700.0, 300.0), 20.0, true);
        let p = level.add_particle(Vec2::new(50.0, 100.0), 10.0, true, 20);
        assert!(a < t && t < p);
        assert_eq!(level.particle(p).map(|p| p.state), Some(ParticleState::Idle));
        assert!(level.particle(999).is_none());
    }
}
