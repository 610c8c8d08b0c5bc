//! Play session: the active level plus everything that outlives it
//!
//! Owns the random source, the launch controller, the pending level
//! transition and the running score. A level is replaced wholesale when the
//! session advances or resets.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::generate::generate_level;
use super::launch::{LaunchController, LaunchError};
use super::progress::LevelProgression;
use super::rng::RandomSource;
use super::snapshot::{LevelView, snapshot};
use super::state::{Level, LevelId, SimEvent};
use crate::tuning::Tuning;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation running, level not yet won
    Playing,
    /// Simulation frozen
    Paused,
    /// Level won; waiting out the display delay
    LevelComplete,
    /// A target particle was lost under a strict loss rule; reset to continue
    Failed,
}

/// A running game
#[derive(Debug, Clone)]
pub struct Session {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub level: Level,
    pub launcher: LaunchController,
    pub progression: LevelProgression,
    pub phase: GamePhase,
    /// Score banked from finished levels
    pub banked_score: u64,
    /// Events from the most recent tick
    pub events: Vec<SimEvent>,
    /// Phase to return to when unpausing
    pub(crate) resume_phase: GamePhase,
    rng: RandomSource,
    next_level_id: LevelId,
}

impl Session {
    /// Start a session at level 0
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut session = Self {
            seed,
            tuning,
            level: Level::new(0),
            launcher: LaunchController::new(),
            progression: LevelProgression::new(),
            phase: GamePhase::Playing,
            banked_score: 0,
            events: Vec::new(),
            resume_phase: GamePhase::Playing,
            rng: RandomSource::new(seed),
            next_level_id: 1,
        };
        session.start_level(0);
        session
    }

    /// Total score: banked levels plus the current one
    pub fn score(&self) -> u64 {
        self.banked_score + self.level.score
    }

    /// Replace the active level with a freshly generated one.
    ///
    /// Any pending transition and input state belong to the old level and
    /// are discarded.
    pub fn start_level(&mut self, index: u32) {
        let mut level = generate_level(index, &mut self.rng, &self.tuning);
        level.id = self.next_level_id;
        self.next_level_id += 1;

        self.level = level;
        self.launcher.clear();
        self.progression.cancel();
        self.phase = GamePhase::Playing;
        self.resume_phase = GamePhase::Playing;
        self.events.push(SimEvent::LevelStarted { index });
    }

    /// Bank the current level's score and move to `index`
    pub(crate) fn advance_to(&mut self, index: u32) {
        self.banked_score += self.level.score;
        log::info!("Advancing to level {} (score {})", index, self.banked_score);
        self.start_level(index);
    }

    /// Back to level 0 with score cleared and the seed replayed
    pub fn reset(&mut self) {
        log::info!("Resetting session (seed {})", self.seed);
        self.banked_score = 0;
        self.rng.reseed(self.seed);
        self.start_level(0);
    }

    /// Pointer pressed: select the launchable particle under `point`, if any
    pub fn pointer_down(&mut self, point: Vec2) -> Option<u32> {
        let id = self.launcher.particle_at(&self.level, point, &self.tuning)?;
        match self.launcher.begin_select(&mut self.level, id) {
            Ok(()) => Some(id),
            Err(err) => {
                log::warn!("Select ignored: {}", err);
                None
            }
        }
    }

    /// Pointer moved while held
    pub fn pointer_move(&mut self, point: Vec2) {
        self.launcher.update_drag(&mut self.level, point);
    }

    /// Pointer released: queue a launch toward `point`
    pub fn pointer_up(&mut self, point: Vec2) -> Result<Vec2, LaunchError> {
        self.launcher.release(&mut self.level, point, &self.tuning)
    }

    /// Pointer left the play field or the gesture was aborted
    pub fn pointer_cancel(&mut self) {
        self.launcher.cancel(&mut self.level);
    }

    /// Queue a launch directly by particle id (for scripted input)
    pub fn queue_launch(&mut self, particle_id: u32, drag: Vec2) -> Result<Vec2, LaunchError> {
        self.launcher
            .commit_launch(&mut self.level, particle_id, drag, &self.tuning)
    }

    /// Read-only view for rendering, including the aim preview
    pub fn snapshot(&self) -> LevelView {
        let mut view = snapshot(&self.level);
        view.aim = self.launcher.aim(&self.level, &self.tuning);
        view
    }
}
