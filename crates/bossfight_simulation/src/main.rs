//! Headless симуляция боя с боссом
//!
//! Прогоняет фазы боя без рендера и печатает состояние encounter'а

use std::time::Duration;

use bevy::time::TimeUpdateStrategy;
use bossfight_simulation::{
    create_headless_app, encounter_snapshot, log_info, BattlePhase, BossEncounter, EncounterConfig,
};

const SECONDS_PER_PHASE: u32 = 30;

fn main() {
    let config = EncounterConfig::default();
    println!("Starting bossfight headless simulation (seed: {})", config.seed);

    let mut app = create_headless_app(config);
    // Детерминированное время: один FixedUpdate на app.update()
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / config.tick_hz,
    )));

    let ticks_per_phase = SECONDS_PER_PHASE * config.tick_hz as u32;

    for phase in [
        BattlePhase::Battle1,
        BattlePhase::Battle2,
        BattlePhase::Battle3,
        BattlePhase::Battle4,
    ] {
        if let Some(mut encounter) = app.world_mut().get_non_send_resource_mut::<BossEncounter>() {
            encounter.enter_phase(phase);
        }

        for tick in 0..ticks_per_phase {
            app.update();

            if tick % (config.tick_hz as u32 * 5) == 0 {
                if let Some(snapshot) = encounter_snapshot(app.world()) {
                    println!(
                        "{:?} t={:.1}s pattern={:?} hp={} hits={} effects={}",
                        snapshot.phase,
                        snapshot.elapsed,
                        snapshot.current_pattern,
                        snapshot.player_health,
                        snapshot.total_hits,
                        snapshot.active_effects.len()
                    );
                }
            }
        }

        log_info(&format!("{:?} complete", phase));
    }

    println!("Simulation complete!");
}
