//! Enemy movements — one-shot actions a pattern performs on the boss.
//!
//! Tagged variant вместо захватывающих лямбд: данные движения лежат в самом
//! значении, никакой неявной связи с внешним scope.

use std::fmt;

use bevy::prelude::*;

use crate::character::Character;

pub enum EnemyMovement {
    /// Move to an absolute arena position
    Teleport(Vec2),
    /// Move relative to the current position
    Shift(Vec2),
    SetVisible(bool),
    Custom(Box<dyn FnMut(&mut dyn Character)>),
}

impl EnemyMovement {
    pub fn custom(action: impl FnMut(&mut dyn Character) + 'static) -> Self {
        Self::Custom(Box::new(action))
    }

    pub fn apply(&mut self, enemy: &mut dyn Character) {
        match self {
            EnemyMovement::Teleport(position) => enemy.set_position(*position),
            EnemyMovement::Shift(offset) => {
                let position = enemy.position() + *offset;
                enemy.set_position(position);
            }
            EnemyMovement::SetVisible(visible) => enemy.set_visible(*visible),
            EnemyMovement::Custom(action) => action(enemy),
        }
    }
}

impl fmt::Debug for EnemyMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnemyMovement::Teleport(position) => f.debug_tuple("Teleport").field(position).finish(),
            EnemyMovement::Shift(offset) => f.debug_tuple("Shift").field(offset).finish(),
            EnemyMovement::SetVisible(visible) => f.debug_tuple("SetVisible").field(visible).finish(),
            EnemyMovement::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Combatant;

    #[test]
    fn test_teleport_and_shift() {
        let mut boss = Combatant::new("boss", Vec2::new(197.5, -3.5), 100);

        EnemyMovement::Teleport(Vec2::ZERO).apply(&mut boss);
        assert_eq!(boss.position, Vec2::ZERO);

        EnemyMovement::Shift(Vec2::new(-10.0, 3.0)).apply(&mut boss);
        assert_eq!(boss.position, Vec2::new(-10.0, 3.0));
    }

    #[test]
    fn test_custom_movement() {
        let mut boss = Combatant::new("boss", Vec2::ZERO, 100);
        let mut movement = EnemyMovement::custom(|enemy| {
            enemy.set_visible(false);
            enemy.take_damage(1);
        });

        movement.apply(&mut boss);
        assert!(!boss.visible);
        assert_eq!(boss.health.current, 99);
        assert_eq!(format!("{:?}", movement), "Custom(..)");
    }
}
