//! Drag-to-launch input handling
//!
//! Pointer input never touches velocities directly. The controller tracks the
//! selection and drag, and a committed launch is queued as a pending
//! descriptor that the tick applies before integration.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::capture::classify;
use super::physics::advance;
use super::state::{Level, Particle, ParticleState, SimEvent, Trail};
use crate::clamp_speed;
use crate::consts::SIM_DT;
use crate::tuning::Tuning;

/// Why a launch request was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("No particle with id {0}")]
    UnknownParticle(u32),
    #[error("Particle {particle_id} cannot launch from {state:?}")]
    NotLaunchable {
        particle_id: u32,
        state: ParticleState,
    },
    #[error("Particle {0} already has a launch queued")]
    AlreadyQueued(u32),
    #[error("Drag vector for particle {0} has zero length")]
    ZeroDrag(u32),
    #[error("No particle is selected")]
    NothingSelected,
}

/// A committed launch waiting for the next tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingLaunch {
    pub particle_id: u32,
    pub vel: Vec2,
}

/// Aim line and predicted path while dragging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AimPreview {
    pub particle_id: u32,
    /// Particle position
    pub origin: Vec2,
    /// Current pointer position
    pub pointer: Vec2,
    /// Velocity a release here would assign
    pub vel: Vec2,
    /// Predicted positions, ending at the first capture
    pub path: Vec<Vec2>,
}

/// Convert a drag vector into a launch velocity.
///
/// Direction follows the drag; speed is `|drag| / launch_scale`, capped at
/// `max_velocity`. Returns `None` for a zero-length drag.
pub fn launch_velocity(drag: Vec2, tuning: &Tuning) -> Option<Vec2> {
    let length = drag.length();
    if length <= 0.0 || !length.is_finite() {
        return None;
    }
    let speed = (length / tuning.launch_scale).min(tuning.max_velocity);
    Some(clamp_speed(drag / length * speed, tuning.max_velocity))
}

fn check_launchable(level: &Level, particle_id: u32) -> Result<&Particle, LaunchError> {
    let particle = level
        .particle(particle_id)
        .ok_or(LaunchError::UnknownParticle(particle_id))?;
    if !particle.state.is_launchable() {
        return Err(LaunchError::NotLaunchable {
            particle_id,
            state: particle.state,
        });
    }
    Ok(particle)
}

/// Launch a particle immediately, without going through the input queue
pub fn launch(level: &mut Level, particle_id: u32, drag: Vec2, tuning: &Tuning) -> Result<(), LaunchError> {
    check_launchable(level, particle_id)?;
    let vel = launch_velocity(drag, tuning).ok_or(LaunchError::ZeroDrag(particle_id))?;
    if let Some(particle) = level.particle_mut(particle_id) {
        particle.vel = vel;
        particle.state = ParticleState::Launched;
        log::debug!("Particle {} launched with {:?}", particle_id, vel);
    }
    Ok(())
}

/// Predict where a particle would go if launched with `vel`.
///
/// Runs the integrator on a scratch copy for up to `ticks` steps and stops at
/// the first tick where a capture rule would fire.
pub fn predict_path(level: &Level, particle: &Particle, vel: Vec2, ticks: usize, tuning: &Tuning) -> Vec<Vec2> {
    let mut ghost = Particle {
        vel,
        state: ParticleState::Launched,
        trail: Trail::new(1),
        ..particle.clone()
    };
    let mut path = Vec::with_capacity(ticks);
    for _ in 0..ticks {
        advance(&mut ghost, &level.attractors, SIM_DT, tuning);
        path.push(ghost.pos);
        if classify(&ghost, level, tuning).is_some() {
            break;
        }
    }
    path
}

/// Selection and drag state machine for one pointer
#[derive(Debug, Clone, Default)]
pub struct LaunchController {
    selected: Option<u32>,
    pointer: Option<Vec2>,
    pending: Vec<PendingLaunch>,
}

impl LaunchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected particle, if any
    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// Launches waiting for the next tick
    pub fn pending(&self) -> &[PendingLaunch] {
        &self.pending
    }

    /// Find the launchable particle under a pointer position
    pub fn particle_at(&self, level: &Level, point: Vec2, tuning: &Tuning) -> Option<u32> {
        level
            .particles
            .iter()
            .filter(|p| p.state.is_launchable() && !self.is_queued(p.id))
            .find(|p| p.pos.distance(point) < tuning.pick_radius)
            .map(|p| p.id)
    }

    fn is_queued(&self, particle_id: u32) -> bool {
        self.pending.iter().any(|l| l.particle_id == particle_id)
    }

    /// Select a particle (Idle → Selected). Any previous selection is released.
    pub fn begin_select(&mut self, level: &mut Level, particle_id: u32) -> Result<(), LaunchError> {
        check_launchable(level, particle_id)?;
        if self.is_queued(particle_id) {
            return Err(LaunchError::AlreadyQueued(particle_id));
        }
        if self.selected.is_some_and(|id| id != particle_id) {
            self.cancel(level);
        }
        if let Some(particle) = level.particle_mut(particle_id) {
            particle.state = ParticleState::Selected;
        }
        self.selected = Some(particle_id);
        self.pointer = None;
        Ok(())
    }

    /// Move the drag point (Selected → Dragging). Ignored with no selection.
    pub fn update_drag(&mut self, level: &mut Level, point: Vec2) {
        let Some(id) = self.selected else {
            return;
        };
        match level.particle_mut(id) {
            Some(particle) if particle.state.is_launchable() => {
                particle.state = ParticleState::Dragging;
                self.pointer = Some(point);
            }
            // Selection went stale (level replaced or particle gone)
            _ => {
                self.selected = None;
                self.pointer = None;
            }
        }
    }

    /// Release the pointer at `point`, committing a launch toward it.
    ///
    /// A release without a usable drag cancels the selection.
    pub fn release(&mut self, level: &mut Level, point: Vec2, tuning: &Tuning) -> Result<Vec2, LaunchError> {
        let Some(id) = self.selected else {
            return Err(LaunchError::NothingSelected);
        };
        let origin = match level.particle(id) {
            Some(p) => p.pos,
            None => {
                self.cancel(level);
                return Err(LaunchError::UnknownParticle(id));
            }
        };
        let result = self.commit_launch(level, id, point - origin, tuning);
        if result.is_err() {
            self.cancel(level);
        }
        result
    }

    /// Queue a launch for `particle_id` with the given drag vector.
    ///
    /// Returns the velocity the particle will receive at the start of the
    /// next tick. Launched, terminal, or already queued particles are
    /// rejected and left untouched.
    pub fn commit_launch(
        &mut self,
        level: &mut Level,
        particle_id: u32,
        drag: Vec2,
        tuning: &Tuning,
    ) -> Result<Vec2, LaunchError> {
        check_launchable(level, particle_id)?;
        if self.is_queued(particle_id) {
            return Err(LaunchError::AlreadyQueued(particle_id));
        }
        let vel = launch_velocity(drag, tuning).ok_or(LaunchError::ZeroDrag(particle_id))?;
        self.pending.push(PendingLaunch { particle_id, vel });
        if self.selected == Some(particle_id) {
            self.selected = None;
            self.pointer = None;
        }
        log::debug!("Queued launch for particle {} with {:?}", particle_id, vel);
        Ok(vel)
    }

    /// Drop the selection, returning the particle to Idle
    pub fn cancel(&mut self, level: &mut Level) {
        if let Some(particle) = self.selected.and_then(|id| level.particle_mut(id)) {
            if matches!(particle.state, ParticleState::Selected | ParticleState::Dragging) {
                particle.state = ParticleState::Idle;
            }
        }
        self.selected = None;
        self.pointer = None;
    }

    /// Forget everything (level replaced). Does not touch any level.
    pub fn clear(&mut self) {
        self.selected = None;
        self.pointer = None;
        self.pending.clear();
    }

    /// Apply queued launches. Called at the start of a tick, before integration.
    pub fn drain(&mut self, level: &mut Level) -> Vec<SimEvent> {
        let mut events = Vec::with_capacity(self.pending.len());
        for launch in self.pending.drain(..) {
            match level.particle_mut(launch.particle_id) {
                Some(particle) if particle.state.is_launchable() => {
                    particle.vel = launch.vel;
                    particle.state = ParticleState::Launched;
                    events.push(SimEvent::Launched {
                        particle_id: launch.particle_id,
                        vel: launch.vel,
                    });
                }
                Some(particle) => log::warn!(
                    "Dropping queued launch for particle {} in state {:?}",
                    launch.particle_id,
                    particle.state
                ),
                None => log::warn!("Dropping queued launch for unknown particle {}", launch.particle_id),
            }
        }
        events
    }

    /// Current aim line and predicted path, while dragging
    pub fn aim(&self, level: &Level, tuning: &Tuning) -> Option<AimPreview> {
        let id = self.selected?;
        let pointer = self.pointer?;
        let particle = level.particle(id)?;
        let vel = launch_velocity(pointer - particle.pos, tuning)?;
        Some(AimPreview {
            particle_id: id,
            origin: particle.pos,
            pointer,
            vel,
            path: predict_path(level, particle, vel, tuning.preview_ticks, tuning),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_with_particle() -> (Level, u32) {
        let mut level = Level::new(0);
        let id = level.add_particle(Vec2::new(50.0, 150.0), 10.0, true, 20);
        (level, id)
    }

    #[test]
    fn test_launch_velocity_scaling() {
        let tuning = Tuning::default();
        let v = launch_velocity(Vec2::new(100.0, 0.0), &tuning).unwrap();
        assert!((v - Vec2::new(4.0, 0.0)).length() < 1e-6);

        // 200 / 25 = 8, exactly the cap
        let v = launch_velocity(Vec2::new(200.0, 0.0), &tuning).unwrap();
        assert!((v - Vec2::new(8.0, 0.0)).length() < 1e-6);

        let v = launch_velocity(Vec2::new(0.0, -1000.0), &tuning).unwrap();
        assert!((v - Vec2::new(0.0, -8.0)).length() < 1e-6);

        assert!(launch_velocity(Vec2::ZERO, &tuning).is_none());
    }

    #[test]
    fn test_full_power_drag_stays_under_cap() {
        let tuning = Tuning::default();
        for i in 0..20_000 {
            let angle = i as f32 * 0.000_314;
            let length = 200.0 + (i % 991) as f32 * 0.37;
            let v = launch_velocity(Vec2::from_angle(angle) * length, &tuning).unwrap();
            assert!(v.length() <= tuning.max_velocity, "drag {} gave {}", length, v.length());
        }
    }

    #[test]
    fn test_direct_launch() {
        let tuning = Tuning::default();
        let (mut level, id) = level_with_particle();

        launch(&mut level, id, Vec2::new(50.0, 0.0), &tuning).unwrap();
        let p = level.particle(id).unwrap();
        assert_eq!(p.state, ParticleState::Launched);
        assert!((p.vel - Vec2::new(2.0, 0.0)).length() < 1e-6);

        // Second launch is rejected and changes nothing
        let err = launch(&mut level, id, Vec2::new(0.0, 500.0), &tuning).unwrap_err();
        assert_eq!(
            err,
            LaunchError::NotLaunchable {
                particle_id: id,
                state: ParticleState::Launched
            }
        );
        assert!((level.particle(id).unwrap().vel - Vec2::new(2.0, 0.0)).length() < 1e-6);

        assert_eq!(
            launch(&mut level, 42, Vec2::X, &tuning),
            Err(LaunchError::UnknownParticle(42))
        );
    }

    #[test]
    fn test_select_drag_release_flow() {
        let tuning = Tuning::default();
        let (mut level, id) = level_with_particle();
        let mut ctl = LaunchController::new();

        ctl.begin_select(&mut level, id).unwrap();
        assert_eq!(level.particle(id).unwrap().state, ParticleState::Selected);

        ctl.update_drag(&mut level, Vec2::new(150.0, 150.0));
        assert_eq!(level.particle(id).unwrap().state, ParticleState::Dragging);
        assert!(ctl.aim(&level, &tuning).is_some());

        let vel = ctl.release(&mut level, Vec2::new(150.0, 150.0), &tuning).unwrap();
        assert!((vel - Vec2::new(4.0, 0.0)).length() < 1e-6);
        assert_eq!(ctl.selected(), None);
        assert_eq!(ctl.pending().len(), 1);
        // Velocity is only applied when drained
        assert_eq!(level.particle(id).unwrap().vel, Vec2::ZERO);

        let events = ctl.drain(&mut level);
        assert_eq!(events.len(), 1);
        let p = level.particle(id).unwrap();
        assert_eq!(p.state, ParticleState::Launched);
        assert_eq!(p.vel, vel);
        assert!(ctl.pending().is_empty());
    }

    #[test]
    fn test_double_commit_rejected() {
        let tuning = Tuning::default();
        let (mut level, id) = level_with_particle();
        let mut ctl = LaunchController::new();

        ctl.commit_launch(&mut level, id, Vec2::X * 100.0, &tuning).unwrap();
        assert_eq!(
            ctl.commit_launch(&mut level, id, Vec2::Y * 100.0, &tuning),
            Err(LaunchError::AlreadyQueued(id))
        );
        ctl.drain(&mut level);
        assert!(matches!(
            ctl.commit_launch(&mut level, id, Vec2::Y * 100.0, &tuning),
            Err(LaunchError::NotLaunchable { .. })
        ));
        assert!((level.particle(id).unwrap().vel - Vec2::new(4.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_zero_drag_release_cancels() {
        let tuning = Tuning::default();
        let (mut level, id) = level_with_particle();
        let mut ctl = LaunchController::new();

        ctl.begin_select(&mut level, id).unwrap();
        let err = ctl.release(&mut level, Vec2::new(50.0, 150.0), &tuning).unwrap_err();
        assert_eq!(err, LaunchError::ZeroDrag(id));
        assert_eq!(level.particle(id).unwrap().state, ParticleState::Idle);
        assert_eq!(ctl.selected(), None);
        assert!(ctl.pending().is_empty());
    }

    #[test]
    fn test_reselect_releases_previous() {
        let (mut level, first) = level_with_particle();
        let second = level.add_particle(Vec2::new(50.0, 300.0), 10.0, true, 20);
        let mut ctl = LaunchController::new();

        ctl.begin_select(&mut level, first).unwrap();
        ctl.begin_select(&mut level, second).unwrap();

        assert_eq!(level.particle(first).unwrap().state, ParticleState::Idle);
        assert_eq!(level.particle(second).unwrap().state, ParticleState::Selected);
        assert_eq!(ctl.selected(), Some(second));
    }

    #[test]
    fn test_particle_at_pick_radius() {
        let tuning = Tuning::default();
        let (mut level, id) = level_with_particle();
        let ctl = LaunchController::new();

        assert_eq!(ctl.particle_at(&level, Vec2::new(60.0, 160.0), &tuning), Some(id));
        assert_eq!(ctl.particle_at(&level, Vec2::new(80.0, 150.0), &tuning), None);

        level.particle_mut(id).unwrap().state = ParticleState::CapturedByBoundary;
        assert_eq!(ctl.particle_at(&level, Vec2::new(50.0, 150.0), &tuning), None);
    }

    #[test]
    fn test_drag_without_selection_ignored() {
        let (mut level, id) = level_with_particle();
        let mut ctl = LaunchController::new();
        ctl.update_drag(&mut level, Vec2::new(300.0, 300.0));
        assert_eq!(level.particle(id).unwrap().state, ParticleState::Idle);
    }

    #[test]
    fn test_predicted_path_stops_at_capture() {
        let tuning = Tuning::default();
        let (mut level, id) = level_with_particle();
        level.add_target(Vec2::new(250.0, 150.0), 20.0, true);
        let particle = level.particle(id).unwrap().clone();

        let path = predict_path(&level, &particle, Vec2::new(8.0, 0.0), 200, &tuning);

        // 50 → within 30 of 250 after 22 steps of 8
        assert_eq!(path.len(), 22);
        assert!(path.iter().all(|p| p.is_finite()));
        // Preview never mutates the level
        assert_eq!(level.particle(id).unwrap().state, ParticleState::Idle);
    }
}
