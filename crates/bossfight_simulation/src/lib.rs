//! Bossfight Simulation Core
//!
//! Движок паттернов атак босса: таймлайны атак и перемещений, очередь
//! паттернов с кулдауном, атаки с предупреждением и live-фазой.
//!
//! Слои:
//! - pattern / controller / attack = логика боя (frame-stepped, `Rc<RefCell<..>>`)
//! - effects = граница рендера (provider эффектов, headless-реализация для тестов)
//! - encounter = Bevy host (FixedUpdate, события попаданий)

use bevy::prelude::*;

pub mod attack;
pub mod character;
pub mod components;
pub mod config;
pub mod controller;
pub mod effects;
pub mod encounter;
pub mod factory;
pub mod logger;
pub mod movement;
pub mod pattern;
pub mod phase;

#[cfg(test)]
mod test_support;

// Re-export основных типов
pub use attack::{Attack, AttackHit, BeamAttack, CircleAttack, DEFAULT_ATTACK_DAMAGE};
pub use character::{character_handle, Character, CharacterHandle, Combatant, WeakCharacter};
pub use components::*;
pub use config::{BoundaryPolicy, ControllerConfig, EncounterConfig, PatternTuning};
pub use controller::EnemyAttackController;
pub use effects::{EffectError, EffectKind, EffectProvider, HeadlessEffects, SharedEffects, VisualEffect};
pub use encounter::{BossEncounter, BossFightPlugin, EncounterSnapshot, PlayerHit};
pub use factory::{PatternFactory, SweepParams};
pub use logger::*;
pub use movement::EnemyMovement;
pub use pattern::{AttackPattern, PatternState};
pub use phase::BattlePhase;

/// Создаёт minimal Bevy App для headless симуляции боя
pub fn create_headless_app(config: EncounterConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(BossFightPlugin { config });

    app
}

/// Snapshot encounter'а из мира (None, если плагин не установлен)
pub fn encounter_snapshot(world: &World) -> Option<EncounterSnapshot> {
    world
        .get_non_send_resource::<BossEncounter>()
        .map(BossEncounter::snapshot)
}
