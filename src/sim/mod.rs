//! Deterministic simulation module
//!
//! All puzzle logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, passed in explicitly
//! - Stable iteration order (by entity ID)
//! - In-place mutation; renderers only see snapshots
//! - No rendering or platform dependencies

pub mod capture;
pub mod generate;
pub mod launch;
pub mod physics;
pub mod progress;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use capture::{Capture, classify, resolve};
pub use generate::{generate_level, init, init_with};
pub use launch::{AimPreview, LaunchController, LaunchError, PendingLaunch, launch, launch_velocity, predict_path};
pub use physics::{gravity_at, integrate};
pub use progress::{Completion, LevelProgression, PendingTransition, check_completion, is_failed};
pub use rng::RandomSource;
pub use session::{GamePhase, Session};
pub use snapshot::{LevelView, ParticleView, snapshot};
pub use state::{Attractor, Level, LevelId, Particle, ParticleState, SimEvent, Target, Trail};
pub use tick::{TickInput, step, tick};
