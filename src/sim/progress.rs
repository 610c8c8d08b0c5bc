//! Win detection and level transitions
//!
//! A level is won when every target particle has landed on a safe target.
//! The switch to the next level waits out a display delay; the pending
//! transition remembers which level it belongs to and is dropped if that
//! level is no longer active when it fires.

use serde::{Deserialize, Serialize};

use super::state::{Level, LevelId, ParticleState};
use crate::tuning::LossRule;

/// Result of checking a level's target particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Completion {
    /// The level is won
    pub complete: bool,
    /// Every target particle is `CapturedByTargetSuccess`
    pub all_targets_landed: bool,
    /// Every target particle is in some terminal state
    pub settled: bool,
    /// Target particles that ended anywhere but a safe target
    pub targets_lost: u32,
}

/// Check the win condition.
///
/// A level without target particles is never complete.
pub fn check_completion(level: &Level) -> Completion {
    let mut total = 0u32;
    let mut landed = 0u32;
    let mut terminal = 0u32;
    for particle in level.target_particles() {
        total += 1;
        if particle.state.is_terminal() {
            terminal += 1;
        }
        if particle.state == ParticleState::CapturedByTargetSuccess {
            landed += 1;
        }
    }
    let all_targets_landed = landed == total;
    Completion {
        complete: total > 0 && all_targets_landed,
        all_targets_landed,
        settled: terminal == total,
        targets_lost: terminal - landed,
    }
}

/// Whether the level counts as failed under `rule`
pub fn is_failed(completion: &Completion, rule: LossRule) -> bool {
    match rule {
        LossRule::None => false,
        LossRule::AnyTargetLost => completion.targets_lost > 0,
    }
}

/// A scheduled switch to the next level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransition {
    /// Level this transition was scheduled for
    pub level_id: LevelId,
    /// Index to generate when the delay elapses
    pub next_index: u32,
    /// Ticks left before firing
    pub remaining_ticks: u32,
}

/// Tracks the pending transition between levels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelProgression {
    pending: Option<PendingTransition>,
}

impl LevelProgression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    /// Schedule the transition for a won level. Re-scheduling the same level
    /// keeps the original countdown.
    pub fn schedule(&mut self, level: &Level, delay_ticks: u32) {
        if self.pending.is_some_and(|p| p.level_id == level.id) {
            return;
        }
        log::info!(
            "Level {} complete, advancing in {} ticks",
            level.index,
            delay_ticks
        );
        self.pending = Some(PendingTransition {
            level_id: level.id,
            next_index: level.index.saturating_add(1),
            remaining_ticks: delay_ticks,
        });
    }

    /// Discard any pending transition (reset or manual level change)
    pub fn cancel(&mut self) {
        if let Some(p) = self.pending.take() {
            log::debug!("Cancelled transition from level id {}", p.level_id);
        }
    }

    /// Advance the countdown by one tick.
    ///
    /// Returns the index to generate once the delay has elapsed and the
    /// transition still belongs to `current`. A transition for any other
    /// level is discarded silently.
    pub fn poll(&mut self, current: &Level) -> Option<u32> {
        let pending = self.pending.as_mut()?;
        if pending.remaining_ticks > 0 {
            pending.remaining_ticks -= 1;
            return None;
        }
        let fired = self.pending.take()?;
        if fired.level_id != current.id {
            log::debug!(
                "Dropping stale transition for level id {} (active is {})",
                fired.level_id,
                current.id
            );
            return None;
        }
        Some(fired.next_index)
    }
}
