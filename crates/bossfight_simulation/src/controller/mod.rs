//! EnemyAttackController — queue of patterns with a cooldown between them.
//!
//! # State machine
//!
//! ```text
//! Inactive ──start──→ Active ┬─ RunningPattern ──pattern finished──→ Cooldown
//!    ↑                       ├─ Cooldown ──elapsed ≥ T──→ switch → RunningPattern | Idle
//!    └─────────stop──────────┴─ Idle (queue drained)
//! ```
//!
//! Кулдаун и тик паттерна никогда не совпадают в одном кадре: кадр, в
//! котором кулдаун закончился, только переключает паттерн.

use std::collections::VecDeque;

use crate::attack::AttackHit;
use crate::character::CharacterHandle;
use crate::config::ControllerConfig;
use crate::factory::{PatternFactory, SweepParams, ARENA_CENTER};
use crate::pattern::AttackPattern;
use crate::phase::BattlePhase;


pub struct EnemyAttackController {
    queue: VecDeque<AttackPattern>,
    current: Option<AttackPattern>,
    is_active: bool,
    is_in_cooldown: bool,
    cooldown_elapsed: f32,
    config: ControllerConfig,
    enemy: CharacterHandle,
    factory: PatternFactory,
}

impl EnemyAttackController {
    pub fn new(enemy: CharacterHandle, factory: PatternFactory, config: ControllerConfig) -> Self {
        Self {
            queue: VecDeque::new(),
            current: None,
            is_active: false,
            is_in_cooldown: false,
            cooldown_elapsed: 0.0,
            config,
            enemy,
            factory,
        }
    }

    /// Rebind the enemy; applies from the next pattern start.
    pub fn set_enemy(&mut self, enemy: CharacterHandle) {
        self.enemy = enemy;
    }

    pub fn add_pattern(&mut self, pattern: AttackPattern) {
        crate::log(&format!(
            "EnemyAttackController: queued '{}' ({} in queue)",
            pattern.name(),
            self.queue.len() + 1
        ));
        self.queue.push_back(pattern);
    }

    pub fn clear_patterns(&mut self) {
        self.queue.clear();
        self.current = None;
        self.is_in_cooldown = false;
        self.cooldown_elapsed = 0.0;
    }

    pub fn init_battle1_patterns(&mut self) {
        self.clear_patterns();
        let opener = self.factory.battle1_pattern();
        let ring = self
            .factory
            .circular_pattern(ARENA_CENTER, 200.0, 80.0, 6, 2.0, 0.4);
        self.add_pattern(opener);
        self.add_pattern(ring);
        crate::log_info("EnemyAttackController: battle 1 patterns ready");
    }

    pub fn init_battle2_patterns(&mut self) {
        self.clear_patterns();
        let cross = self
            .factory
            .cross_rotating_beam_pattern(ARENA_CENTER, 1500.0, 60.0, 0.2, 16.0, 3.0);
        self.add_pattern(cross);
        crate::log_info("EnemyAttackController: battle 2 patterns ready");
    }

    fn init_battle3_patterns(&mut self) {
        self.clear_patterns();
        let sweep = self.factory.sweeping_circles_pattern(SweepParams::default());
        self.add_pattern(sweep);
        crate::log_info("EnemyAttackController: battle 3 patterns ready");
    }

    fn init_battle4_patterns(&mut self) {
        self.clear_patterns();
        let scatter = self
            .factory
            .scatter_pattern(ARENA_CENTER, 400.0, 10, 70.0, 1.2, 0.3);
        let ring = self
            .factory
            .circular_pattern(ARENA_CENTER, 320.0, 90.0, 8, 1.5, 0.25);
        self.add_pattern(scatter);
        self.add_pattern(ring);
        crate::log_info("EnemyAttackController: battle 4 patterns ready");
    }

    /// Clear, then queue the named sequence of `phase` (empty for non-combat phases).
    pub fn init_phase_patterns(&mut self, phase: BattlePhase) {
        match phase {
            BattlePhase::Battle1 => self.init_battle1_patterns(),
            BattlePhase::Battle2 => self.init_battle2_patterns(),
            BattlePhase::Battle3 => self.init_battle3_patterns(),
            BattlePhase::Battle4 => self.init_battle4_patterns(),
            BattlePhase::Start | BattlePhase::Store => self.clear_patterns(),
        }
    }

    pub fn start(&mut self) {
        self.is_active = true;

        if let Some(pattern) = self.current.as_mut() {
            pattern.start(&self.enemy);
        } else if self.is_in_cooldown {
            crate::log(&format!(
                "EnemyAttackController: resuming cooldown at {:.2}s",
                self.cooldown_elapsed
            ));
        } else {
            self.switch_to_next_pattern();
        }
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        if let Some(pattern) = self.current.as_mut() {
            pattern.stop();
        }
    }

    pub fn reset(&mut self) {
        self.stop();
        self.clear_patterns();
    }

    pub fn update(&mut self, delta: f32, player: &CharacterHandle) -> Vec<AttackHit> {
        if !self.is_active {
            return Vec::new();
        }

        if self.is_in_cooldown {
            self.cooldown_elapsed += delta;
            if self.cooldown_elapsed >= self.config.cooldown_duration {
                self.is_in_cooldown = false;
                self.cooldown_elapsed = 0.0;
                self.switch_to_next_pattern();
            }
            return Vec::new();
        }

        let Some(pattern) = self.current.as_mut() else {
            self.switch_to_next_pattern();
            return Vec::new();
        };

        let hits = pattern.update(delta, player);
        if pattern.is_finished() {
            crate::log(&format!(
                "EnemyAttackController: '{}' finished, cooldown {:.2}s",
                pattern.name(),
                self.config.cooldown_duration
            ));
            self.current = None;
            self.is_in_cooldown = true;
            self.cooldown_elapsed = 0.0;
        }

        hits
    }

    pub fn switch_to_next_pattern(&mut self) {
        self.current = self.queue.pop_front();

        match self.current.as_mut() {
            Some(pattern) => {
                crate::log(&format!(
                    "EnemyAttackController: switching to '{}'",
                    pattern.name()
                ));
                if self.is_active {
                    pattern.start(&self.enemy);
                }
            }
            None => crate::log("EnemyAttackController: no more patterns"),
        }
    }

    pub fn is_all_patterns_completed(&self) -> bool {
        self.current.is_none() && self.queue.is_empty() && !self.is_in_cooldown
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_in_cooldown(&self) -> bool {
        self.is_in_cooldown
    }

    pub fn cooldown_elapsed(&self) -> f32 {
        self.cooldown_elapsed
    }

    pub fn current_pattern(&self) -> Option<&AttackPattern> {
        self.current.as_ref()
    }

    pub fn queued_patterns(&self) -> usize {
        self.queue.len()
    }

    pub fn enemy(&self) -> &CharacterHandle {
        &self.enemy
    }
}
