//! Simulation tick
//!
//! Order within a tick is fixed: queued launches are applied, particles are
//! integrated, captures are resolved, and only then is the win condition
//! checked. One tick always leaves the world fully resolved.

use super::capture::resolve;
use super::physics::integrate;
use super::progress::{check_completion, is_failed};
use super::session::{GamePhase, Session};
use super::state::{Level, SimEvent};
use crate::tuning::Tuning;

/// One-shot commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
    /// Back to level 0 with the score cleared
    pub reset: bool,
    /// Skip to next level (debug/testing)
    pub skip_level: bool,
}

/// Integrate and resolve one tick on a bare level.
///
/// Returns capture and scoring events in particle id order.
pub fn step(level: &mut Level, dt: f32, tuning: &Tuning) -> Vec<SimEvent> {
    level.time_ticks += 1;
    integrate(level, dt, tuning);
    resolve(level, tuning)
}

/// Advance the session by one timestep
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) {
    session.events.clear();

    if input.reset {
        session.reset();
        return;
    }

    // Handle pause toggle
    if input.pause {
        match session.phase {
            GamePhase::Playing | GamePhase::LevelComplete => {
                session.resume_phase = session.phase;
                session.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => {
                session.phase = session.resume_phase;
            }
            GamePhase::Failed => {}
        }
    }

    // Don't tick if paused or failed
    match session.phase {
        GamePhase::Paused | GamePhase::Failed => return,
        _ => {}
    }

    // Debug: skip to next level
    if input.skip_level {
        let next = session.level.index.saturating_add(1);
        session.advance_to(next);
        return;
    }

    let launched = session.launcher.drain(&mut session.level);
    session.events.extend(launched);

    let resolved = step(&mut session.level, dt, &session.tuning);
    session.events.extend(resolved);

    if session.phase == GamePhase::Playing {
        let completion = check_completion(&session.level);
        if completion.complete {
            session
                .progression
                .schedule(&session.level, session.tuning.level_complete_delay_ticks);
            session.phase = GamePhase::LevelComplete;
            session.events.push(SimEvent::LevelComplete {
                index: session.level.index,
            });
        } else if is_failed(&completion, session.tuning.loss_rule) {
            log::info!(
                "Level {} failed ({} targets lost)",
                session.level.index,
                completion.targets_lost
            );
            session.phase = GamePhase::Failed;
            session.events.push(SimEvent::LevelFailed {
                index: session.level.index,
            });
        }
    }

    // Count down the display delay; fires only for the level it was scheduled on
    if session.phase == GamePhase::LevelComplete {
        if let Some(next) = session.progression.poll(&session.level) {
            session.advance_to(next);
        }
    }
}
