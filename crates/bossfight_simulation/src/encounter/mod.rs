//! Boss encounter — bridges the pattern engine into a Bevy app.
//!
//! ECS ответственность: фиксированный тик (FixedUpdate), события `PlayerHit`.
//! Движок паттернов живёт на `Rc<RefCell<..>>`, поэтому encounter — это
//! non-send resource и тикается только на главном потоке.

use std::cell::RefCell;
use std::rc::Rc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::attack::AttackHit;
use crate::character::{Character, CharacterHandle, Combatant};
use crate::config::EncounterConfig;
use crate::controller::EnemyAttackController;
use crate::effects::{HeadlessEffects, SharedEffects};
use crate::factory::{PatternFactory, BOSS_HOME};
use crate::phase::BattlePhase;

#[cfg(test)]
mod encounter_tests;

pub const PLAYER_SPAWN: Vec2 = Vec2::new(0.0, -300.0);
pub const BOSS_MAX_HEALTH: u32 = 1000;

/// Fired for every attack hit that landed on the player this tick.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerHit {
    pub sequence_number: u32,
    pub damage: u32,
    pub position: Vec2,
    /// Player health after the hit was applied
    pub player_health: u32,
}

/// Comparable view of the encounter (determinism checks, debug dumps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub phase: BattlePhase,
    pub elapsed: f32,
    pub player_position: (f32, f32),
    pub player_health: u32,
    pub enemy_position: (f32, f32),
    pub enemy_visible: bool,
    pub current_pattern: Option<String>,
    pub pattern_elapsed: Option<f32>,
    pub in_cooldown: bool,
    pub queued_patterns: usize,
    pub total_hits: u32,
    pub loops: u32,
    /// Positions of playing effects, in pool order
    pub active_effects: Vec<(f32, f32)>,
}

pub struct BossEncounter {
    controller: EnemyAttackController,
    player: Rc<RefCell<Combatant>>,
    player_handle: CharacterHandle,
    enemy: Rc<RefCell<Combatant>>,
    effects: Rc<RefCell<HeadlessEffects>>,
    phase: BattlePhase,
    elapsed: f32,
    total_hits: u32,
    loops: u32,
}

impl BossEncounter {
    pub fn new(config: &EncounterConfig) -> Self {
        let player = Rc::new(RefCell::new(Combatant::new(
            "rabbit",
            PLAYER_SPAWN,
            config.player_health,
        )));
        let enemy = Rc::new(RefCell::new(Combatant::new("boss", BOSS_HOME, BOSS_MAX_HEALTH)));
        let effects = HeadlessEffects::shared(config.effect_pool_per_kind);

        let shared_effects: SharedEffects = effects.clone();
        let enemy_handle: CharacterHandle = enemy.clone();
        let player_handle: CharacterHandle = player.clone();

        let factory = PatternFactory::new(shared_effects, config.pattern, config.seed);
        let controller = EnemyAttackController::new(enemy_handle, factory, config.controller);

        Self {
            controller,
            player,
            player_handle,
            enemy,
            effects,
            phase: BattlePhase::Start,
            elapsed: 0.0,
            total_hits: 0,
            loops: 0,
        }
    }

    /// Reset the controller and run the pattern set of `phase`.
    pub fn enter_phase(&mut self, phase: BattlePhase) {
        self.controller.reset();
        self.phase = phase;
        self.loops = 0;

        if phase.has_patterns() {
            self.controller.init_phase_patterns(phase);
            self.controller.start();
        }

        crate::log_info(&format!(
            "BossEncounter: entered {:?} ({} patterns queued)",
            phase,
            self.controller.queued_patterns()
        ));
    }

    /// One simulation step. Hits are already applied to the player.
    pub fn tick(&mut self, delta: f32) -> Vec<AttackHit> {
        self.elapsed += delta;

        // Невидимый босс не атакует
        let enemy_visible = self.enemy.borrow().is_visible();
        let hits = if enemy_visible {
            self.controller.update(delta, &self.player_handle)
        } else {
            Vec::new()
        };

        if !hits.is_empty() {
            let mut player = self.player.borrow_mut();
            let was_alive = player.is_alive();
            for hit in &hits {
                player.take_damage(hit.damage);
            }
            self.total_hits += hits.len() as u32;

            if was_alive && !player.is_alive() {
                crate::log_warning(&format!(
                    "BossEncounter: player down at {:.2}s",
                    self.elapsed
                ));
            }
        }

        if self.phase.has_patterns() && self.controller.is_all_patterns_completed() {
            self.loops += 1;
            crate::log(&format!(
                "BossEncounter: {:?} patterns exhausted, loop #{}",
                self.phase, self.loops
            ));
            self.controller.init_phase_patterns(self.phase);
            self.controller.start();
        }

        self.effects.borrow_mut().update(delta);
        hits
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn controller(&self) -> &EnemyAttackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut EnemyAttackController {
        &mut self.controller
    }

    pub fn player(&self) -> &Rc<RefCell<Combatant>> {
        &self.player
    }

    pub fn enemy(&self) -> &Rc<RefCell<Combatant>> {
        &self.enemy
    }

    pub fn effects(&self) -> &Rc<RefCell<HeadlessEffects>> {
        &self.effects
    }

    pub fn player_health(&self) -> u32 {
        self.player.borrow().health.current
    }

    pub fn total_hits(&self) -> u32 {
        self.total_hits
    }

    pub fn loops(&self) -> u32 {
        self.loops
    }

    pub fn snapshot(&self) -> EncounterSnapshot {
        let player = self.player.borrow();
        let enemy = self.enemy.borrow();
        let current = self.controller.current_pattern();

        EncounterSnapshot {
            phase: self.phase,
            elapsed: self.elapsed,
            player_position: (player.position.x, player.position.y),
            player_health: player.health.current,
            enemy_position: (enemy.position.x, enemy.position.y),
            enemy_visible: enemy.visible,
            current_pattern: current.map(|pattern| pattern.name().to_string()),
            pattern_elapsed: current.map(|pattern| pattern.elapsed()),
            in_cooldown: self.controller.is_in_cooldown(),
            queued_patterns: self.controller.queued_patterns(),
            total_hits: self.total_hits,
            loops: self.loops,
            active_effects: self
                .effects
                .borrow()
                .active_positions()
                .into_iter()
                .map(|(_, position)| (position.x, position.y))
                .collect(),
        }
    }
}

/// FixedUpdate system: tick the encounter and publish hits.
pub fn tick_boss_encounter(
    encounter: Option<NonSendMut<BossEncounter>>,
    time: Res<Time>,
    mut hit_events: EventWriter<PlayerHit>,
) {
    let Some(mut encounter) = encounter else {
        return;
    };

    let hits = encounter.tick(time.delta_secs());
    if hits.is_empty() {
        return;
    }

    let player_health = encounter.player_health();
    for hit in hits {
        hit_events.write(PlayerHit {
            sequence_number: hit.sequence_number,
            damage: hit.damage,
            position: hit.position,
            player_health,
        });
    }
}

/// Logs hits (debug level).
pub fn log_player_hits(mut hit_events: EventReader<PlayerHit>) {
    for hit in hit_events.read() {
        crate::log(&format!(
            "PlayerHit: attack #{} for {} (hp {})",
            hit.sequence_number, hit.damage, hit.player_health
        ));
    }
}

/// Boss fight plugin
///
/// Вставляет `BossEncounter` (non-send) и регистрирует системы в FixedUpdate:
/// 1. tick_boss_encounter — контроллер → паттерны → атаки
/// 2. log_player_hits — лог попаданий
///
/// Фазу выбирает хост: `BossEncounter::enter_phase`.
#[derive(Default)]
pub struct BossFightPlugin {
    pub config: EncounterConfig,
}

impl Plugin for BossFightPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerHit>()
            .insert_resource(Time::<Fixed>::from_hz(self.config.tick_hz))
            .insert_non_send_resource(BossEncounter::new(&self.config));

        app.add_systems(
            FixedUpdate,
            (tick_boss_encounter, log_player_hits).chain(),
        );
    }
}
