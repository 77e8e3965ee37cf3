//! Test doubles shared by unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use bevy::prelude::*;

use crate::attack::{Attack, AttackHit};
use crate::character::{character_handle, Character, CharacterHandle, Combatant, WeakCharacter};
use crate::effects::{EffectError, EffectHandle, EffectKind, EffectProvider, HeadlessEffects};

/// What a `ProbeAttack` saw.
#[derive(Debug, Default)]
pub struct ProbeLog {
    pub updates: Vec<f32>,
    pub targets_bound: u32,
}

/// Attack that records calls and finishes after `lifetime` seconds of updates.
pub struct ProbeAttack {
    pub log: Rc<RefCell<ProbeLog>>,
    pub delay: f32,
    pub lifetime: f32,
    pub sequence_number: u32,
    lived: f32,
    hit_every_update: bool,
}

impl ProbeAttack {
    pub fn new(delay: f32, sequence_number: u32) -> (Self, Rc<RefCell<ProbeLog>>) {
        let log = Rc::new(RefCell::new(ProbeLog::default()));
        let probe = Self {
            log: Rc::clone(&log),
            delay,
            lifetime: f32::INFINITY,
            sequence_number,
            lived: 0.0,
            hit_every_update: false,
        };
        (probe, log)
    }

    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn hitting(mut self) -> Self {
        self.hit_every_update = true;
        self
    }
}

impl Attack for ProbeAttack {
    fn update(&mut self, delta: f32) -> Option<AttackHit> {
        self.log.borrow_mut().updates.push(delta);
        self.lived += delta;
        self.hit_every_update.then_some(AttackHit {
            sequence_number: self.sequence_number,
            damage: 1,
            position: Vec2::ZERO,
        })
    }

    fn is_finished(&self) -> bool {
        self.lived >= self.lifetime
    }

    fn set_target(&mut self, _target: WeakCharacter) {
        self.log.borrow_mut().targets_bound += 1;
    }

    fn check_collision(&self, _character: &dyn Character) -> bool {
        false
    }

    fn delay(&self) -> f32 {
        self.delay
    }

    fn position(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn z_index(&self) -> f32 {
        0.0
    }

    fn sequence_number(&self) -> u32 {
        self.sequence_number
    }
}

/// Provider double: records requested kinds, optionally refuses everything.
pub struct RecordingEffects {
    pub requested: Vec<EffectKind>,
    pub fail: bool,
    inner: HeadlessEffects,
}

impl RecordingEffects {
    pub fn shared(fail: bool) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            requested: Vec::new(),
            fail,
            inner: HeadlessEffects::new(64),
        }))
    }
}

impl EffectProvider for RecordingEffects {
    fn acquire(&mut self, kind: EffectKind) -> Result<EffectHandle, EffectError> {
        self.requested.push(kind);
        if self.fail {
            return Err(EffectError::InvalidParameter("renderer offline".to_string()));
        }
        self.inner.acquire(kind)
    }
}

pub fn player_at(position: Vec2) -> CharacterHandle {
    character_handle(Combatant::new("rabbit", position, 100))
}

pub fn boss_at(position: Vec2) -> CharacterHandle {
    character_handle(Combatant::new("boss", position, 100))
}
