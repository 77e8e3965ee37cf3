//! Character provider — то, что движок паттернов знает об игроке и боссе.
//!
//! Движок не владеет персонажами: контроллер держит сильный handle на босса,
//! паттерны и атаки — только `Weak`, с проверкой живости на каждом тике.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bevy::prelude::*;

use crate::components::Health;

/// Player/enemy contract consumed by attacks and movements.
pub trait Character {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
    fn take_damage(&mut self, amount: u32);
    fn is_alive(&self) -> bool;
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
}

pub type CharacterHandle = Rc<RefCell<dyn Character>>;
pub type WeakCharacter = Weak<RefCell<dyn Character>>;

/// Wrap a concrete character into a shared handle.
pub fn character_handle<C: Character + 'static>(character: C) -> CharacterHandle {
    Rc::new(RefCell::new(character))
}

/// Basic character used by the headless host and tests.
#[derive(Debug, Clone)]
pub struct Combatant {
    pub name: String,
    pub position: Vec2,
    pub health: Health,
    pub visible: bool,
}

impl Combatant {
    pub fn new(name: impl Into<String>, position: Vec2, max_health: u32) -> Self {
        Self {
            name: name.into(),
            position,
            health: Health::new(max_health),
            visible: true,
        }
    }
}

impl Character for Combatant {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn take_damage(&mut self, amount: u32) {
        self.health.take_damage(amount);
    }

    fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
