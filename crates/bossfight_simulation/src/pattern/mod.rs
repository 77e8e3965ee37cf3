//! AttackPattern — timeline of timed attacks and enemy movements.
//!
//! # Tick order
//!
//! ```text
//! elapsed += dt
//!   ↓
//! elapsed ≥ total_duration? → Finished (entries crossed on this tick: see BoundaryPolicy)
//!   ↓
//! attacks (ascending start_time): fire due → update started & unfinished
//!   ↓
//! movements (ascending start_time): fire due exactly once against the bound enemy
//! ```
//!
//! Каждый entry срабатывает ровно один раз; большой `dt` стреляет всеми
//! созревшими entry за один тик (без sub-stepping).

use std::rc::{Rc, Weak};

use crate::attack::{Attack, AttackHit};
use crate::character::{CharacterHandle, WeakCharacter};
use crate::config::{BoundaryPolicy, PatternTuning};
use crate::movement::EnemyMovement;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternState {
    #[default]
    Idle,
    Running,
    Finished,
}

struct TimedAttack {
    attack: Box<dyn Attack>,
    start_time: f32,
    started: bool,
}

struct TimedMovement {
    movement: EnemyMovement,
    start_time: f32,
    executed: bool,
}

pub struct AttackPattern {
    name: String,
    attacks: Vec<TimedAttack>,
    movements: Vec<TimedMovement>,
    /// Latest `start_time + delay + settle_margin` over all attacks
    attack_span: f32,
    requested_duration: f32,
    total_duration: f32,
    elapsed: f32,
    state: PatternState,
    enemy: Option<WeakCharacter>,
    tuning: PatternTuning,
}

impl Default for AttackPattern {
    fn default() -> Self {
        Self::new("pattern")
    }
}

fn sanitize_start_time(name: &str, start_time: f32) -> f32 {
    if start_time.is_finite() && start_time >= 0.0 {
        return start_time;
    }
    crate::log_warning(&format!(
        "AttackPattern '{}': start time {} clamped to 0",
        name, start_time
    ));
    0.0
}

impl AttackPattern {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attacks: Vec::new(),
            movements: Vec::new(),
            attack_span: 0.0,
            requested_duration: 0.0,
            total_duration: 0.0,
            elapsed: 0.0,
            state: PatternState::Idle,
            enemy: None,
            tuning: PatternTuning::default(),
        }
    }

    pub fn with_tuning(mut self, tuning: PatternTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_attack(&mut self, attack: Box<dyn Attack>, start_time: f32) {
        let start_time = sanitize_start_time(&self.name, start_time);
        let attack_end = start_time + attack.delay() + self.tuning.settle_margin;

        self.attacks.push(TimedAttack {
            attack,
            start_time,
            started: false,
        });
        self.attacks
            .sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        if attack_end > self.attack_span {
            self.attack_span = attack_end;
        }
        self.total_duration = self.attack_span.max(self.requested_duration);
    }

    /// Movements do not extend the duration: schedule them inside it.
    pub fn add_enemy_movement(&mut self, movement: EnemyMovement, start_time: f32) {
        let start_time = sanitize_start_time(&self.name, start_time);

        self.movements.push(TimedMovement {
            movement,
            start_time,
            executed: false,
        });
        self.movements
            .sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    }

    /// Stretch the pattern to at least `seconds` (never below the attack span).
    pub fn set_duration(&mut self, seconds: f32) {
        if !seconds.is_finite() {
            crate::log_warning(&format!(
                "AttackPattern '{}': ignoring duration {}",
                self.name, seconds
            ));
            return;
        }
        self.requested_duration = seconds.max(0.0);
        self.total_duration = self.attack_span.max(self.requested_duration);
    }

    pub fn start(&mut self, enemy: &CharacterHandle) {
        if self.state != PatternState::Idle {
            crate::log(&format!(
                "AttackPattern '{}': already running or finished ({:?}), start ignored",
                self.name, self.state
            ));
            return;
        }

        self.enemy = Some(Rc::downgrade(enemy));
        self.state = PatternState::Running;
        self.elapsed = 0.0;

        for entry in &mut self.attacks {
            entry.started = false;
        }
        for entry in &mut self.movements {
            entry.executed = false;
        }

        crate::log(&format!(
            "AttackPattern '{}' started ({} attacks, {} movements, {:.2}s)",
            self.name,
            self.attacks.len(),
            self.movements.len(),
            self.total_duration
        ));
    }

    pub fn stop(&mut self) {
        if self.state != PatternState::Running {
            return;
        }
        self.state = PatternState::Finished;
        crate::log(&format!("AttackPattern '{}' stopped", self.name));
    }

    /// Advance the timeline. Returns hits reported by live attacks this tick.
    pub fn update(&mut self, delta: f32, player: &CharacterHandle) -> Vec<AttackHit> {
        if self.state != PatternState::Running {
            return Vec::new();
        }

        self.elapsed += delta;

        if self.elapsed >= self.total_duration {
            let hits = match self.tuning.boundary {
                BoundaryPolicy::FinishFirst => Vec::new(),
                BoundaryPolicy::FlushDue => self.run_due_entries(delta, player),
            };
            self.state = PatternState::Finished;
            crate::log(&format!(
                "AttackPattern '{}' completed at {:.2}s",
                self.name, self.elapsed
            ));
            return hits;
        }

        self.run_due_entries(delta, player)
    }

    fn run_due_entries(&mut self, delta: f32, player: &CharacterHandle) -> Vec<AttackHit> {
        let mut hits = Vec::new();

        for entry in &mut self.attacks {
            if !entry.started && self.elapsed >= entry.start_time {
                entry.started = true;
                entry.attack.set_target(Rc::downgrade(player));
                crate::log(&format!(
                    "AttackPattern '{}': attack #{} fired at {:.2}s",
                    self.name,
                    entry.attack.sequence_number(),
                    self.elapsed
                ));
            }

            // Свежесработавшая атака получает первый update в этом же тике
            if entry.started && !entry.attack.is_finished() {
                if let Some(hit) = entry.attack.update(delta) {
                    hits.push(hit);
                }
            }
        }

        let bound_enemy = self.enemy.as_ref().and_then(Weak::upgrade);
        for entry in &mut self.movements {
            if entry.executed || self.elapsed < entry.start_time {
                continue;
            }
            // Флаг гасится даже без врага: без ретраев
            entry.executed = true;

            let Some(enemy) = bound_enemy.as_ref() else {
                crate::log_warning(&format!(
                    "AttackPattern '{}': enemy gone, movement {:?} skipped",
                    self.name, entry.movement
                ));
                continue;
            };

            match enemy.try_borrow_mut() {
                Ok(mut enemy) => {
                    entry.movement.apply(&mut *enemy);
                    crate::log(&format!(
                        "AttackPattern '{}': enemy movement {:?} at {:.2}s",
                        self.name, entry.movement, self.elapsed
                    ));
                }
                Err(_) => crate::log_warning(&format!(
                    "AttackPattern '{}': enemy busy, movement {:?} skipped",
                    self.name, entry.movement
                )),
            }
        }

        hits
    }

    pub fn state(&self) -> PatternState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PatternState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == PatternState::Finished
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    pub fn attack_count(&self) -> usize {
        self.attacks.len()
    }

    pub fn movement_count(&self) -> usize {
        self.movements.len()
    }

    pub fn fired_attacks(&self) -> usize {
        self.attacks.iter().filter(|entry| entry.started).count()
    }

    pub fn executed_movements(&self) -> usize {
        self.movements.iter().filter(|entry| entry.executed).count()
    }

    pub fn attack_start_times(&self) -> Vec<f32> {
        self.attacks.iter().map(|entry| entry.start_time).collect()
    }

    pub fn movement_start_times(&self) -> Vec<f32> {
        self.movements.iter().map(|entry| entry.start_time).collect()
    }
}
