//! Shared attack state: phases, timers, target, hit bookkeeping, effect requests.

use std::rc::Rc;

use bevy::prelude::*;

use super::{AttackHit, DEFAULT_ATTACK_DAMAGE};
use crate::character::{Character, CharacterHandle, WeakCharacter};
use crate::effects::{EffectError, EffectKind, SharedEffects, VisualEffect, WeakEffect};

/// Base z-index of attack visuals (above the arena, below UI)
pub const BASE_Z_INDEX: f32 = 10.0;

/// Live time of an attack once its warning ends (seconds)
pub const DEFAULT_ACTIVE_DURATION: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPhase {
    /// Added to a pattern, entry not fired yet
    Pending,
    /// Telegraph visual playing, no collision
    Warning,
    /// Live visual playing, collision enabled
    Active,
    Finished,
}

/// Result of one `AttackCore::tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseChange {
    Unchanged,
    /// Warning → Active this tick
    WentLive,
    /// Active → Finished this tick
    Finished,
}

/// State every concrete attack embeds.
///
/// Инвариант: фаза двигается только вперёд (Pending → Warning → Active → Finished).
pub struct AttackCore {
    pub position: Vec2,
    pub delay: f32,
    pub z_index: f32,
    pub sequence_number: u32,
    pub damage: u32,
    pub active_duration: f32,
    /// `None` — one hit per attack; `Some(t)` — re-arm after `t` seconds
    pub rehit_interval: Option<f32>,
    phase: AttackPhase,
    phase_timer: f32,
    since_hit: Option<f32>,
    target: Option<WeakCharacter>,
    effects: SharedEffects,
}

impl AttackCore {
    pub fn new(position: Vec2, delay: f32, sequence_number: u32, effects: SharedEffects) -> Self {
        Self {
            position,
            delay: delay.max(0.0),
            z_index: BASE_Z_INDEX,
            sequence_number,
            damage: DEFAULT_ATTACK_DAMAGE,
            active_duration: DEFAULT_ACTIVE_DURATION,
            rehit_interval: None,
            phase: AttackPhase::Pending,
            phase_timer: 0.0,
            since_hit: None,
            target: None,
            effects,
        }
    }

    pub fn phase(&self) -> AttackPhase {
        self.phase
    }

    /// Time left in the current phase
    pub fn phase_timer(&self) -> f32 {
        self.phase_timer
    }

    pub fn is_live(&self) -> bool {
        self.phase == AttackPhase::Active
    }

    pub fn is_finished(&self) -> bool {
        self.phase == AttackPhase::Finished
    }

    /// Pending → Warning. Returns `true` only on the transition.
    pub fn begin(&mut self) -> bool {
        if self.phase != AttackPhase::Pending {
            return false;
        }
        self.phase = AttackPhase::Warning;
        self.phase_timer = self.delay;
        true
    }

    /// Advance phase timers by `delta`.
    pub fn tick(&mut self, delta: f32) -> PhaseChange {
        match self.phase {
            AttackPhase::Warning => {
                self.phase_timer -= delta;
                if self.phase_timer <= 0.0 {
                    // Перелёт за delay засчитывается в live-окно
                    self.phase = AttackPhase::Active;
                    self.phase_timer += self.active_duration;
                    PhaseChange::WentLive
                } else {
                    PhaseChange::Unchanged
                }
            }
            AttackPhase::Active => {
                if let Some(elapsed) = self.since_hit.as_mut() {
                    *elapsed += delta;
                }
                self.phase_timer -= delta;
                if self.phase_timer <= 0.0 {
                    self.phase = AttackPhase::Finished;
                    self.phase_timer = 0.0;
                    PhaseChange::Finished
                } else {
                    PhaseChange::Unchanged
                }
            }
            AttackPhase::Pending | AttackPhase::Finished => PhaseChange::Unchanged,
        }
    }

    pub fn set_target(&mut self, target: WeakCharacter) {
        self.target = Some(target);
    }

    /// Target, if bound and still alive as an object.
    pub fn target(&self) -> Option<CharacterHandle> {
        self.target.as_ref()?.upgrade()
    }

    /// Run `test` against the living target.
    pub fn target_collides(&self, test: impl FnOnce(&dyn Character) -> bool) -> bool {
        let Some(target) = self.target() else {
            return false;
        };
        let target = target.borrow();
        target.is_alive() && test(&*target)
    }

    /// Turn a collision into a hit, respecting the re-hit window.
    pub fn report_hit(&mut self, collided: bool) -> Option<AttackHit> {
        if !collided {
            return None;
        }

        let armed = match (self.since_hit, self.rehit_interval) {
            (None, _) => true,
            (Some(elapsed), Some(interval)) => elapsed >= interval,
            (Some(_), None) => false,
        };
        if !armed {
            return None;
        }

        self.since_hit = Some(0.0);
        Some(AttackHit {
            sequence_number: self.sequence_number,
            damage: self.damage,
            position: self.position,
        })
    }

    /// Acquire and configure an effect through the injected provider.
    ///
    /// Ошибка провайдера/конфигурации логируется и глотается: фазы и таймеры
    /// атаки от неё не зависят.
    pub fn request_effect<F>(&self, kind: EffectKind, label: &str, configure: F) -> Option<WeakEffect>
    where
        F: FnOnce(&mut dyn VisualEffect) -> Result<(), EffectError>,
    {
        let acquired = self.effects.borrow_mut().acquire(kind);
        let handle = match acquired {
            Ok(handle) => handle,
            Err(err) => {
                crate::log_error(&format!(
                    "Attack #{}: failed to acquire {} effect: {}",
                    self.sequence_number, label, err
                ));
                return None;
            }
        };

        let configured = configure(&mut *handle.borrow_mut());
        match configured {
            Ok(()) => Some(Rc::downgrade(&handle)),
            Err(err) => {
                crate::log_error(&format!(
                    "Attack #{}: {} effect rejected configuration: {}",
                    self.sequence_number, label, err
                ));
                None
            }
        }
    }
}
