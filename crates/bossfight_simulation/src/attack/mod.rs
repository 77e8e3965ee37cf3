//! Attack capability contract + concrete boss attacks.
//!
//! # Lifecycle
//!
//! ```text
//! Pending ──first update──> Warning (telegraph effect, `delay` seconds)
//!   ↓
//! Active (live effect, collision vs target, `active_duration` seconds)
//!   ↓
//! Finished
//! ```
//!
//! Атака только сообщает о попадании (`AttackHit`); урон применяет хост.

use bevy::prelude::*;

use crate::character::{Character, WeakCharacter};

pub mod beam;
pub mod circle;
pub mod lifecycle;


pub use beam::BeamAttack;
pub use circle::CircleAttack;
pub use lifecycle::{AttackCore, AttackPhase, PhaseChange};

/// Default damage of one boss attack hit.
pub const DEFAULT_ATTACK_DAMAGE: u32 = 10;

/// Collision reported by an attack during its live phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackHit {
    pub sequence_number: u32,
    pub damage: u32,
    pub position: Vec2,
}

/// Polymorphic attack driven by an `AttackPattern` timeline.
pub trait Attack {
    /// Per-frame update. Returns a hit when the live attack touched its target.
    fn update(&mut self, delta: f32) -> Option<AttackHit>;

    fn is_finished(&self) -> bool;

    /// Bound when the timeline entry fires.
    fn set_target(&mut self, target: WeakCharacter);

    /// Pure geometric test, no game consequences.
    fn check_collision(&self, character: &dyn Character) -> bool;

    /// Seconds between firing and becoming live
    fn delay(&self) -> f32;

    fn position(&self) -> Vec2;

    fn z_index(&self) -> f32;

    fn sequence_number(&self) -> u32;
}
