//! Circular area attack.
//!
//! Красный полупрозрачный круг-предупреждение на время `delay`, затем живой
//! круг с коллизией. Если задано движение, живой эффект сам едет по прямой
//! (movement modifier), а атака каждый тик забирает его позицию — то, что
//! видит игрок, и есть хитбокс.

use bevy::prelude::*;

use super::lifecycle::{AttackCore, PhaseChange};
use super::{Attack, AttackHit};
use crate::character::{Character, WeakCharacter};
use crate::effects::{
    active_position, EdgeKind, EdgeModifier, EffectKind, EffectShape, FillModifier,
    MovementModifier, Rgba, SharedEffects, WeakEffect,
};

/// Circle radius inside the effect quad
const NORMALIZED_RADIUS: f32 = 0.35;
/// Quad size per unit of collision radius
const VISUAL_SCALE: f32 = 2.5;
/// Warning outlives the delay so it overlaps the live circle's fade-in
const WARNING_EXTRA_TIME: f32 = 1.0;

const WARNING_COLOR: Rgba = Rgba::new(1.0, 0.0, 0.0, 0.2);
const EDGE_COLOR: Rgba = Rgba::new(1.0, 0.0, 0.0, 0.7);
const EDGE_WIDTH: f32 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleMotion {
    pub direction: Vec2,
    pub speed: f32,
    pub distance: f32,
}

pub struct CircleAttack {
    core: AttackCore,
    radius: f32,
    color: Rgba,
    motion: Option<CircleMotion>,
    warning_effect: Option<WeakEffect>,
    attack_effect: Option<WeakEffect>,
}

impl CircleAttack {
    pub fn new(
        position: Vec2,
        delay: f32,
        radius: f32,
        sequence_number: u32,
        effects: SharedEffects,
    ) -> Self {
        Self {
            core: AttackCore::new(position, delay, sequence_number, effects),
            radius,
            color: Rgba::new(1.0, 1.0, 1.0, 0.3),
            motion: None,
            warning_effect: None,
            attack_effect: None,
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.core.damage = damage;
        self
    }

    /// Make the live circle travel; extends the live phase to cover the motion.
    pub fn with_motion(mut self, direction: Vec2, speed: f32, distance: f32) -> Self {
        let motion = CircleMotion {
            direction,
            speed,
            distance,
        };
        if speed > 0.0 {
            self.core.active_duration = self.core.active_duration.max(distance / speed);
        }
        self.motion = Some(motion);
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn core(&self) -> &AttackCore {
        &self.core
    }

    pub fn active_duration(&self) -> f32 {
        self.core.active_duration
    }

    fn circle_shape(&self, color: Rgba) -> EffectShape {
        let visual_size = self.radius * VISUAL_SCALE;
        EffectShape::Circle {
            normalized_radius: NORMALIZED_RADIUS,
            size: Vec2::splat(visual_size),
            color,
        }
    }

    fn create_warning_effect(&mut self) {
        let shape = self.circle_shape(WARNING_COLOR);
        let duration = self.core.delay + WARNING_EXTRA_TIME;
        let position = self.core.position;
        let z_index = self.core.z_index - 0.1;

        self.warning_effect = self
            .core
            .request_effect(EffectKind::EnemyAttack2, "warning", |effect| {
                effect.set_shape(shape)?;
                effect.set_fill(FillModifier::Solid)?;
                effect.set_edge(EdgeModifier {
                    kind: EdgeKind::Glow,
                    width: EDGE_WIDTH,
                    color: EDGE_COLOR,
                })?;
                effect.set_duration(duration)?;
                effect.play(position, z_index)
            });
    }

    fn create_attack_effect(&mut self) {
        let shape = self.circle_shape(self.color);
        let duration = self.core.active_duration;
        let position = self.core.position;
        let z_index = self.core.z_index + 0.2;
        let movement = self.motion.map(|motion| {
            crate::log(&format!(
                "CircleAttack #{}: moving speed={} distance={} duration={}",
                self.core.sequence_number, motion.speed, motion.distance, duration
            ));
            MovementModifier::new(motion.direction, motion.speed, motion.distance)
                .with_start_position(position)
        });

        self.attack_effect = self
            .core
            .request_effect(EffectKind::EnemyAttack2, "attack", |effect| {
                effect.set_shape(shape)?;
                effect.set_fill(FillModifier::Solid)?;
                effect.set_edge(EdgeModifier {
                    kind: EdgeKind::Glow,
                    width: EDGE_WIDTH,
                    color: EDGE_COLOR,
                })?;
                if let Some(movement) = movement {
                    effect.set_movement(movement)?;
                }
                effect.set_duration(duration)?;
                effect.play(position, z_index)
            });
    }

    /// Drop effect handles so the pool can hand the instances out again.
    fn release_effects(&mut self) {
        self.warning_effect = None;
        self.attack_effect = None;
    }

    /// Adopt the live effect's rendered position while it plays.
    pub fn sync_with_effect(&mut self) {
        if let Some(position) = self.attack_effect.as_ref().and_then(active_position) {
            self.core.position = position;
        }
    }

    pub fn has_warning_effect(&self) -> bool {
        self.warning_effect.is_some()
    }

    pub fn has_attack_effect(&self) -> bool {
        self.attack_effect.is_some()
    }
}

impl Attack for CircleAttack {
    fn update(&mut self, delta: f32) -> Option<AttackHit> {
        if self.core.begin() {
            self.create_warning_effect();
        }

        match self.core.tick(delta) {
            PhaseChange::WentLive => self.create_attack_effect(),
            PhaseChange::Finished => self.release_effects(),
            PhaseChange::Unchanged => {}
        }

        if !self.core.is_live() {
            return None;
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

    fn check_collision(&self, character: &dyn Character) -> bool {
        character.position().distance(self.core.position) <= self.radius
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
    use crate::effects::{EffectProvider, HeadlessEffects};
    use std::rc::Rc;

    fn circle(position: Vec2, delay: f32, radius: f32) -> (CircleAttack, Rc<std::cell::RefCell<HeadlessEffects>>) {
        let effects = HeadlessEffects::shared(16);
        let shared: SharedEffects = effects.clone();
        (CircleAttack::new(position, delay, radius, 1, shared), effects)
    }

    #[test]
    fn test_collision_boundary_is_inclusive() {
        let (attack, _effects) = circle(Vec2::ZERO, 1.0, 80.0);

        let on_edge = Combatant::new("edge", Vec2::new(80.0, 0.0), 10);
        let outside = Combatant::new("out", Vec2::new(80.0 + 1e-3, 0.0), 10);
        let diagonal = Combatant::new("diag", Vec2::new(48.0, 64.0), 10); // 3-4-5 → 80

        assert!(attack.check_collision(&on_edge));
        assert!(attack.check_collision(&diagonal));
        assert!(!attack.check_collision(&outside));
    }

    #[test]
    fn test_warning_then_live_effects() {
        let (mut attack, effects) = circle(Vec2::ZERO, 1.0, 50.0);

        attack.update(0.1);
        assert!(attack.has_warning_effect());
        assert!(!attack.has_attack_effect());
        assert_eq!(effects.borrow().active_count(), 1);

        attack.update(1.0);
        assert!(attack.has_attack_effect());
        assert!(attack.core().is_live());
        assert_eq!(effects.borrow().active_count(), 2);
    }

    #[test]
    fn test_warning_never_hits() {
        let (mut attack, _effects) = circle(Vec2::ZERO, 1.0, 50.0);
        let player = character_handle(Combatant::new("rabbit", Vec2::ZERO, 100));
        attack.set_target(Rc::downgrade(&player));

        // Весь delay игрок стоит в центре — урона нет
        assert_eq!(attack.update(0.5), None);
        assert_eq!(attack.update(0.4), None);

        let hit = attack.update(0.2).expect("live circle hits");
        assert_eq!(hit.sequence_number, 1);

        // Одно попадание на атаку
        assert_eq!(attack.update(0.1), None);
    }

    #[test]
    fn test_moving_circle_follows_effect() {
        let (attack, effects) = circle(Vec2::new(-200.0, 0.0), 0.0, 40.0);
        let mut attack = attack.with_motion(Vec2::X, 100.0, 400.0);
        assert_eq!(attack.active_duration(), 4.0);

        let player = character_handle(Combatant::new("rabbit", Vec2::new(0.0, 0.0), 100));
        attack.set_target(Rc::downgrade(&player));

        // Live сразу (delay 0), круг далеко от игрока
        assert_eq!(attack.update(0.0), None);
        assert_eq!(attack.position(), Vec2::new(-200.0, 0.0));

        effects.borrow_mut().update(1.0);
        assert_eq!(attack.update(1.0), None);
        assert_eq!(attack.position(), Vec2::new(-100.0, 0.0));

        effects.borrow_mut().update(1.0);
        assert!(attack.update(1.0).is_some());
        assert_eq!(attack.position(), Vec2::ZERO);
    }

    #[test]
    fn test_position_kept_when_effect_missing() {
        let effects = HeadlessEffects::shared(0); // пул пуст → эффекты не выдаются
        let shared: SharedEffects = effects.clone();
        let mut attack =
            CircleAttack::new(Vec2::new(5.0, 5.0), 0.0, 10.0, 3, shared).with_motion(Vec2::Y, 10.0, 10.0);

        attack.update(0.0);
        attack.update(0.5);

        assert!(!attack.has_attack_effect());
        assert_eq!(attack.position(), Vec2::new(5.0, 5.0));
        assert!(attack.core().is_live());
    }

    #[test]
    fn test_expired_effect_stays_with_its_attack() {
        let effects = HeadlessEffects::shared(16);
        let shared: SharedEffects = effects.clone();
        let player = character_handle(Combatant::new("rabbit", Vec2::ZERO, 100));

        let mut far = CircleAttack::new(Vec2::new(-1000.0, 0.0), 0.0, 50.0, 1, shared.clone());
        far.set_target(Rc::downgrade(&player));
        assert_eq!(far.update(0.0), None);
        assert!(far.core().is_live());

        // Live-эффект отыграл, но атака ещё Active
        effects.borrow_mut().update(0.5);
        let pooled = effects.borrow().pooled_count();

        let mut near = CircleAttack::new(Vec2::ZERO, 5.0, 50.0, 2, shared);
        near.update(0.0);
        assert!(near.has_warning_effect());
        assert_eq!(effects.borrow().pooled_count(), pooled + 1);

        assert_eq!(far.update(0.1), None);
        assert_eq!(far.position(), Vec2::new(-1000.0, 0.0));

        // Finished → handles отпущены, экземпляр снова в обороте
        far.update(0.5);
        assert!(far.core().is_finished());
        assert!(!far.has_attack_effect());
        let reused = effects.borrow_mut().acquire(EffectKind::EnemyAttack2);
        assert!(reused.is_ok());
        assert_eq!(effects.borrow().pooled_count(), pooled + 1);
    }
}
