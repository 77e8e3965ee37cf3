//! Rotating rectangular beam.
//!
//! Прямоугольник (width × height при rotation = 0) вокруг центра, вращается
//! со скоростью `rotation_speed` рад/сек пока живой. Попадание повторяется
//! не чаще чем раз в `rehit_interval`.

use bevy::prelude::*;

use super::lifecycle::{AttackCore, PhaseChange};
use super::{Attack, AttackHit};
use crate::character::{Character, WeakCharacter};
use crate::effects::{
    active_position, EdgeKind, EdgeModifier, EffectKind, EffectShape, FillModifier, Rgba,
    SharedEffects, WeakEffect,
};

/// Damage tick of a beam that keeps touching the target
pub const BEAM_REHIT_INTERVAL: f32 = 1.0;

const WARNING_COLOR: Rgba = Rgba::new(1.0, 0.2, 0.2, 0.15);
const BEAM_COLOR: Rgba = Rgba::new(1.0, 0.1, 0.1, 0.8);

pub struct BeamAttack {
    core: AttackCore,
    size: Vec2,
    rotation: f32,
    rotation_speed: f32,
    warning_effect: Option<WeakEffect>,
    attack_effect: Option<WeakEffect>,
}

impl BeamAttack {
    pub fn new(
        center: Vec2,
        size: Vec2,
        rotation: f32,
        delay: f32,
        sequence_number: u32,
        effects: SharedEffects,
    ) -> Self {
        let mut core = AttackCore::new(center, delay, sequence_number, effects);
        core.rehit_interval = Some(BEAM_REHIT_INTERVAL);
        Self {
            core,
            size,
            rotation,
            rotation_speed: 0.0,
            warning_effect: None,
            attack_effect: None,
        }
    }

    /// Spin while live (radians per second)
    pub fn with_rotation_speed(mut self, rotation_speed: f32) -> Self {
        self.rotation_speed = rotation_speed;
        self
    }

    pub fn with_active_duration(mut self, seconds: f32) -> Self {
        self.core.active_duration = seconds.max(0.0);
        self
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.core.damage = damage;
        self
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn core(&self) -> &AttackCore {
        &self.core
    }

    fn shape(&self, color: Rgba, rotation_speed: f32) -> EffectShape {
        EffectShape::Rectangle {
            size: self.size,
            rotation: self.rotation,
            rotation_speed,
            color,
        }
    }

    fn create_warning_effect(&mut self) {
        // Предупреждение не вращается — показывает стартовую позицию луча
        let shape = self.shape(WARNING_COLOR, 0.0);
        let duration = self.core.delay;
        let position = self.core.position;
        let z_index = self.core.z_index - 0.1;

        self.warning_effect = self
            .core
            .request_effect(EffectKind::RectBeam, "warning", |effect| {
                effect.set_shape(shape)?;
                effect.set_fill(FillModifier::Hollow)?;
                effect.set_duration(duration)?;
                effect.play(position, z_index)
            });
    }

    fn create_attack_effect(&mut self) {
        let shape = self.shape(BEAM_COLOR, self.rotation_speed);
        let duration = self.core.active_duration;
        let position = self.core.position;
        let z_index = self.core.z_index + 0.2;

        self.attack_effect = self
            .core
            .request_effect(EffectKind::RectBeam, "attack", |effect| {
                effect.set_shape(shape)?;
                effect.set_fill(FillModifier::Solid)?;
                effect.set_edge(EdgeModifier {
                    kind: EdgeKind::Glow,
                    width: 0.01,
                    color: BEAM_COLOR,
                })?;
                effect.set_duration(duration)?;
                effect.play(position, z_index)
            });
    }

    /// Drop effect handles so the pool can hand the instances out again.
    fn release_effects(&mut self) {
        self.warning_effect = None;
        self.attack_effect = None;
    }

    pub fn sync_with_effect(&mut self) {
        if let Some(position) = self.attack_effect.as_ref().and_then(active_position) {
            self.core.position = position;
        }
    }
}

impl Attack for BeamAttack {
    fn update(&mut self, delta: f32) -> Option<AttackHit> {
        if self.core.begin() && self.core.delay > 0.0 {
            self.create_warning_effect();
        }

        let was_live = self.core.is_live();
        match self.core.tick(delta) {
            PhaseChange::WentLive => self.create_attack_effect(),
            PhaseChange::Finished => self.release_effects(),
            PhaseChange::Unchanged => {}
        }

        if !self.core.is_live() {
            return None;
        }

        // Вращение только за время, прожитое в Active
        if was_live {
            self.rotation += self.rotation_speed * delta;
        }

        self.sync_with_effect();
        let collided = self.core.target_collides(|target| self.check_collision(target));
        self.core.report_hit(collided)
    }

    fn is_finished(&self) -> bool {
        self.core.is_finished()
    }

    fn set_target(&mut self, target: WeakCharacter) {
        self.core.set_target(target);
    }

    /// Target inside the rotated rectangle (edges inclusive).
    fn check_collision(&self, character: &dyn Character) -> bool {
        let offset = character.position() - self.core.position;
        let local = Vec2::from_angle(-self.rotation).rotate(offset);
        let half = self.size * 0.5;
        local.x.abs() <= half.x && local.y.abs() <= half.y
    }

    fn delay(&self) -> f32 {
        self.core.delay
    }

    fn position(&self) -> Vec2 {
        self.core.position
    }

    fn z_index(&self) -> f32 {
        self.core.z_index
    }

    fn sequence_number(&self) -> u32 {
        self.core.sequence_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{character_handle, Combatant};
    use crate::effects::HeadlessEffects;
    use std::f32::consts::FRAC_PI_2;
    use std::rc::Rc;

    fn beam(rotation: f32) -> BeamAttack {
        let effects: SharedEffects = HeadlessEffects::shared(8);
        BeamAttack::new(Vec2::ZERO, Vec2::new(1500.0, 60.0), rotation, 3.0, 1, effects)
    }

    #[test]
    fn test_horizontal_beam_collision() {
        let beam = beam(0.0);

        assert!(beam.check_collision(&Combatant::new("a", Vec2::new(700.0, 29.0), 10)));
        assert!(beam.check_collision(&Combatant::new("b", Vec2::new(-750.0, -30.0), 10)));
        assert!(!beam.check_collision(&Combatant::new("c", Vec2::new(0.0, 31.0), 10)));
        assert!(!beam.check_collision(&Combatant::new("d", Vec2::new(751.0, 0.0), 10)));
    }

    #[test]
    fn test_rotated_beam_collision() {
        let beam = beam(FRAC_PI_2);

        // Повёрнут на 90° — теперь вертикальный
        assert!(beam.check_collision(&Combatant::new("a", Vec2::new(0.0, 700.0), 10)));
        assert!(!beam.check_collision(&Combatant::new("b", Vec2::new(700.0, 0.0), 10)));
    }

    #[test]
    fn test_beam_rotates_only_while_live() {
        let mut beam = beam(0.0).with_rotation_speed(0.5).with_active_duration(10.0);

        beam.update(2.0);
        assert_eq!(beam.rotation(), 0.0);

        // Warning закончился на этом тике — вращения ещё нет
        beam.update(1.0);
        assert!(beam.core().is_live());
        assert_eq!(beam.rotation(), 0.0);

        beam.update(1.0);
        assert_eq!(beam.rotation(), 0.5);
    }

    #[test]
    fn test_beam_rehits_after_interval() {
        let mut beam = beam(0.0).with_active_duration(10.0);
        let player = character_handle(Combatant::new("rabbit", Vec2::new(100.0, 0.0), 100));
        beam.set_target(Rc::downgrade(&player));

        assert_eq!(beam.update(2.0), None); // warning
        assert!(beam.update(1.0).is_some()); // live, первый hit
        assert!(beam.update(0.5).is_none());
        assert!(beam.update(0.5).is_some());
    }
}
