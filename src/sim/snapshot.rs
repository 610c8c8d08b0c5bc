//! Read-only views for renderers
//!
//! The simulation mutates its level in place; a renderer gets an owned copy
//! taken once per frame and can never write back.

use glam::Vec2;
use serde::Serialize;

use super::launch::AimPreview;
use super::state::{Level, LevelId, ParticleState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttractorView {
    pub id: u32,
    pub pos: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub safe: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: ParticleState,
    pub is_target: bool,
    /// Oldest to newest
    pub trail: Vec<Vec2>,
}

/// Immutable copy of a level for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelView {
    pub level_id: LevelId,
    pub index: u32,
    pub time_ticks: u64,
    /// Score earned on this level
    pub score: u64,
    pub attractors: Vec<AttractorView>,
    pub targets: Vec<TargetView>,
    pub particles: Vec<ParticleView>,
    /// Drag line and predicted path, while aiming
    pub aim: Option<AimPreview>,
}

impl LevelView {
    /// Serialize for an out-of-process renderer
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Copy the level into a read-only view
pub fn snapshot(level: &Level) -> LevelView {
    LevelView {
        level_id: level.id,
        index: level.index,
        time_ticks: level.time_ticks,
        score: level.score,
        attractors: level
            .attractors
            .iter()
            .map(|a| AttractorView {
                id: a.id,
                pos: a.pos,
                mass: a.mass,
                radius: a.radius,
                active: a.active,
            })
            .collect(),
        targets: level
            .targets
            .iter()
            .map(|t| TargetView {
                id: t.id,
                pos: t.pos,
                radius: t.radius,
                safe: t.safe,
            })
            .collect(),
        particles: level
            .particles
            .iter()
            .map(|p| ParticleView {
                id: p.id,
                pos: p.pos,
                vel: p.vel,
                radius: p.radius,
                state: p.state,
                is_target: p.is_target,
                trail: p.trail.iter().copied().collect(),
            })
            .collect(),
        aim: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_detached_copy() {
        let mut level = Level::new(2);
        level.add_attractor(Vec2::new(300.0, 300.0), 120.0, 35.0);
        level.add_target(Vec2::new(700.0, 200.0), 20.0, true);
        let id = level.add_particle(Vec2::new(50.0, 100.0), 10.0, true, 4);
        level.particle_mut(id).unwrap().trail.push(Vec2::new(1.0, 2.0));

        let view = snapshot(&level);
        level.particle_mut(id).unwrap().pos = Vec2::new(999.0, 999.0);
        level.particle_mut(id).unwrap().trail.push(Vec2::new(3.0, 4.0));

        assert_eq!(view.index, 2);
        assert_eq!(view.attractors.len(), 1);
        assert_eq!(view.targets.len(), 1);
        assert_eq!(view.particles[0].pos, Vec2::new(50.0, 100.0));
        assert_eq!(view.particles[0].trail, vec![Vec2::new(1.0, 2.0)]);
        assert!(view.aim.is_none());
    }

    #[test]
    fn test_view_serializes() {
        let mut level = Level::new(0);
        level.add_particle(Vec2::new(50.0, 100.0), 10.0, false, 4);
        let json = snapshot(&level).to_json().expect("serializable");
        assert!(json.contains("\"Idle\""));
        assert!(json.contains("\"is_target\":false"));
    }
}
