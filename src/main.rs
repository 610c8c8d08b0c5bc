//! Gravity Well entry point
//!
//! Headless native run: plays a seeded session with a naive auto-aimer and
//! prints the final snapshot as JSON.
//!
//! Usage: `gravity-well [seed] [tuning.json|-] [none|strict]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gravity_well::{LossRule, Tuning};
    use gravity_well::consts::SIM_DT;
    use gravity_well::sim::{GamePhase, Session, SimEvent, TickInput, tick};

    /// Hard stop for the demo run
    const MAX_TICKS: u32 = 20_000;
    /// Ticks between auto-launches
    const LAUNCH_INTERVAL: u32 = 90;
    /// Levels to play before stopping
    const LEVELS: u32 = 3;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            eprintln!("Invalid seed: {}", err);
            std::process::exit(2);
        }
        None => 0x5eed,
    };
    let mut tuning = match args.next() {
        Some(path) if path != "-" => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(2);
            }
        },
        _ => Tuning::default(),
    };
    if let Some(rule) = args.next() {
        match LossRule::from_str(&rule) {
            Some(rule) => tuning.loss_rule = rule,
            None => {
                eprintln!("Unknown loss rule: {}", rule);
                std::process::exit(2);
            }
        }
    }

    log::info!(
        "Gravity Well (native) starting with seed {} (loss rule: {})",
        seed,
        tuning.loss_rule.as_str()
    );
    let mut session = Session::new(seed, tuning);
    let input = TickInput::default();

    for t in 0..MAX_TICKS {
        if t % LAUNCH_INTERVAL == 0 && session.phase == GamePhase::Playing {
            auto_launch(&mut session);
        }

        tick(&mut session, &input, SIM_DT);

        for event in &session.events {
            match event {
                SimEvent::LevelStarted { index } => log::info!("Level {} started", index),
                SimEvent::Scored { particle_id, points, .. } => {
                    log::info!("Particle {} landed (+{})", particle_id, points)
                }
                other => log::debug!("{:?}", other),
            }
        }

        if session.level.index >= LEVELS || session.phase == GamePhase::Failed {
            break;
        }

        // Nothing left to launch and nothing in flight: stuck on this level
        let idle = session.level.particles.iter().any(|p| p.is_target && p.state.is_launchable());
        let flying = session.level.particles.iter().any(|p| p.in_flight());
        if session.phase == GamePhase::Playing && !idle && !flying {
            log::info!("Level {} cannot be completed, stopping", session.level.index);
            break;
        }
    }

    println!("Final score: {}", session.score());
    match session.snapshot().to_json() {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("Snapshot serialization failed: {}", err),
    }
}

/// Launch the first idle target particle straight at the nearest safe target
#[cfg(not(target_arch = "wasm32"))]
fn auto_launch(session: &mut gravity_well::Session) {
    let tuning = &session.tuning;
    let level = &session.level;
    let Some(particle) = level
        .particles
        .iter()
        .find(|p| p.is_target && p.state.is_launchable())
    else {
        return;
    };
    let Some(target) = level.targets.iter().filter(|t| t.safe).min_by(|a, b| {
        a.pos
            .distance(particle.pos)
            .partial_cmp(&b.pos.distance(particle.pos))
            .unwrap_or(std::cmp::Ordering::Equal)
    }) else {
        return;
    };

    // Full-power drag toward the target
    let drag = (target.pos - particle.pos).normalize_or_zero() * tuning.launch_scale * tuning.max_velocity;
    let id = particle.id;
    if let Err(err) = session.queue_launch(id, drag) {
        log::warn!("Auto-launch skipped: {}", err);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No native entry point on the web; embed the library instead
}
