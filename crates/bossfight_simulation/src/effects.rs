//! Visual-effect boundary.
//!
//! Движок не рисует и не владеет эффектами: атака запрашивает эффект у
//! провайдера, конфигурирует его, запускает и дальше держит только `Weak`
//! для чтения позиции. Ошибки конфигурации — `Result<_, EffectError>`,
//! вызывающая сторона логирует и продолжает тик.
//!
//! `HeadlessEffects` — провайдер для headless прогонов и тестов: пул
//! эффектов с таймерами и movement modifier без рендера.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Тип эффекта в каталоге провайдера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Small burst (debug/test trigger)
    EnemyAttack1,
    /// Circle area (warning + live circle attacks)
    EnemyAttack2,
    /// Rectangle beam
    RectBeam,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EffectError {
    #[error("effect pool for {0:?} is exhausted")]
    PoolExhausted(EffectKind),

    #[error("effect {kind:?} does not accept a {shape} shape")]
    UnsupportedShape { kind: EffectKind, shape: &'static str },

    #[error("invalid effect parameter: {0}")]
    InvalidParameter(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }
}

/// Opaque shape configuration forwarded to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectShape {
    Circle {
        /// Radius inside the unit quad (shader space)
        normalized_radius: f32,
        size: Vec2,
        color: Rgba,
    },
    Rectangle {
        size: Vec2,
        rotation: f32,
        rotation_speed: f32,
        color: Rgba,
    },
}

impl EffectShape {
    fn name(&self) -> &'static str {
        match self {
            EffectShape::Circle { .. } => "circle",
            EffectShape::Rectangle { .. } => "rectangle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillModifier {
    #[default]
    Solid,
    Hollow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Glow,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeModifier {
    pub kind: EdgeKind,
    pub width: f32,
    pub color: Rgba,
}

/// Straight-line motion the effect performs on its own after `play`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementModifier {
    pub direction: Vec2,
    pub speed: f32,
    pub distance: f32,
    /// Overrides the `play` position as the motion origin
    pub start_position: Option<Vec2>,
}

impl MovementModifier {
    pub fn new(direction: Vec2, speed: f32, distance: f32) -> Self {
        Self {
            direction,
            speed,
            distance,
            start_position: None,
        }
    }

    pub fn with_start_position(mut self, start: Vec2) -> Self {
        self.start_position = Some(start);
        self
    }

    /// Seconds needed to cover `distance`
    pub fn travel_time(&self) -> f32 {
        if self.speed <= 0.0 {
            return 0.0;
        }
        self.distance / self.speed
    }
}

/// Handle-side contract of one effect instance.
pub trait VisualEffect {
    fn play(&mut self, position: Vec2, z_index: f32) -> Result<(), EffectError>;
    fn set_duration(&mut self, seconds: f32) -> Result<(), EffectError>;
    fn set_shape(&mut self, shape: EffectShape) -> Result<(), EffectError>;
    fn set_fill(&mut self, fill: FillModifier) -> Result<(), EffectError>;
    fn set_edge(&mut self, edge: EdgeModifier) -> Result<(), EffectError>;
    fn set_movement(&mut self, movement: MovementModifier) -> Result<(), EffectError>;
    fn is_active(&self) -> bool;
    /// Current rendered position
    fn position(&self) -> Vec2;
}

pub type EffectHandle = Rc<RefCell<dyn VisualEffect>>;
pub type WeakEffect = Weak<RefCell<dyn VisualEffect>>;

pub trait EffectProvider {
    fn acquire(&mut self, kind: EffectKind) -> Result<EffectHandle, EffectError>;
}

/// Injected provider shared by attacks and the pattern factory.
pub type SharedEffects = Rc<RefCell<dyn EffectProvider>>;

/// Position of a weakly held effect, if it is still alive and playing.
pub fn active_position(effect: &WeakEffect) -> Option<Vec2> {
    let effect = effect.upgrade()?;
    let effect = effect.borrow();
    effect.is_active().then(|| effect.position())
}

// ============================================================================
// Headless provider
// ============================================================================

/// Effect instance simulated without rendering.
#[derive(Debug, Clone)]
pub struct HeadlessEffect {
    kind: EffectKind,
    shape: Option<EffectShape>,
    fill: FillModifier,
    edge: Option<EdgeModifier>,
    movement: Option<MovementModifier>,
    duration: f32,
    elapsed: f32,
    active: bool,
    origin: Vec2,
    position: Vec2,
    z_index: f32,
    travelled: f32,
}

impl HeadlessEffect {
    fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            shape: None,
            fill: FillModifier::default(),
            edge: None,
            movement: None,
            duration: 0.0,
            elapsed: 0.0,
            active: false,
            origin: Vec2::ZERO,
            position: Vec2::ZERO,
            z_index: 0.0,
            travelled: 0.0,
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn z_index(&self) -> f32 {
        self.z_index
    }

    pub fn shape(&self) -> Option<&EffectShape> {
        self.shape.as_ref()
    }

    pub fn fill(&self) -> FillModifier {
        self.fill
    }

    pub fn edge(&self) -> Option<EdgeModifier> {
        self.edge
    }

    /// Advance playback: timer, movement modifier, auto-rotation.
    pub fn advance(&mut self, delta: f32) {
        if !self.active {
            return;
        }

        self.elapsed += delta;

        if let Some(movement) = self.movement {
            self.travelled = (self.travelled + movement.speed * delta).min(movement.distance);
            self.position = self.origin + movement.direction.normalize_or_zero() * self.travelled;
        }

        if let Some(EffectShape::Rectangle {
            rotation,
            rotation_speed,
            ..
        }) = self.shape.as_mut()
        {
            *rotation += *rotation_speed * delta;
        }

        if self.elapsed >= self.duration {
            self.active = false;
        }
    }
}

fn check_finite(name: &str, value: f32) -> Result<(), EffectError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EffectError::InvalidParameter(format!("{name} is not finite")))
    }
}

impl VisualEffect for HeadlessEffect {
    fn play(&mut self, position: Vec2, z_index: f32) -> Result<(), EffectError> {
        if self.duration <= 0.0 {
            return Err(EffectError::InvalidParameter(
                "duration must be set before play".to_string(),
            ));
        }

        self.origin = self
            .movement
            .and_then(|movement| movement.start_position)
            .unwrap_or(position);
        self.position = self.origin;
        self.z_index = z_index;
        self.elapsed = 0.0;
        self.travelled = 0.0;
        self.active = true;
        Ok(())
    }

    fn set_duration(&mut self, seconds: f32) -> Result<(), EffectError> {
        check_finite("duration", seconds)?;
        if seconds < 0.0 {
            return Err(EffectError::InvalidParameter(format!(
                "negative duration {seconds}"
            )));
        }
        self.duration = seconds;
        Ok(())
    }

    fn set_shape(&mut self, shape: EffectShape) -> Result<(), EffectError> {
        let accepted = matches!(
            (self.kind, &shape),
            (EffectKind::EnemyAttack1 | EffectKind::EnemyAttack2, EffectShape::Circle { .. })
                | (EffectKind::RectBeam, EffectShape::Rectangle { .. })
        );
        if !accepted {
            return Err(EffectError::UnsupportedShape {
                kind: self.kind,
                shape: shape.name(),
            });
        }
        self.shape = Some(shape);
        Ok(())
    }

    fn set_fill(&mut self, fill: FillModifier) -> Result<(), EffectError> {
        self.fill = fill;
        Ok(())
    }

    fn set_edge(&mut self, edge: EdgeModifier) -> Result<(), EffectError> {
        check_finite("edge width", edge.width)?;
        self.edge = Some(edge);
        Ok(())
    }

    fn set_movement(&mut self, movement: MovementModifier) -> Result<(), EffectError> {
        check_finite("speed", movement.speed)?;
        check_finite("distance", movement.distance)?;
        if movement.speed <= 0.0 || movement.distance < 0.0 {
            return Err(EffectError::InvalidParameter(format!(
                "movement speed {} / distance {}",
                movement.speed, movement.distance
            )));
        }
        self.movement = Some(movement);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}

/// Pool-backed provider for headless runs.
///
/// Инвариант: на каждый `EffectKind` не больше `capacity_per_kind` экземпляров.
/// Экземпляр переиспользуется, когда он неактивен и никто, кроме пула, не
/// держит на него ссылку (ни сильную, ни `Weak`).
pub struct HeadlessEffects {
    capacity_per_kind: usize,
    pool: Vec<Rc<RefCell<HeadlessEffect>>>,
    acquired_total: u64,
}

impl HeadlessEffects {
    pub fn new(capacity_per_kind: usize) -> Self {
        Self {
            capacity_per_kind,
            pool: Vec::new(),
            acquired_total: 0,
        }
    }

    pub fn shared(capacity_per_kind: usize) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(capacity_per_kind)))
    }

    /// Advance every playing effect.
    pub fn update(&mut self, delta: f32) {
        for effect in &self.pool {
            effect.borrow_mut().advance(delta);
        }
    }

    pub fn active_count(&self) -> usize {
        self.pool
            .iter()
            .filter(|effect| effect.borrow().is_active())
            .count()
    }

    pub fn pooled_count(&self) -> usize {
        self.pool.len()
    }

    pub fn acquired_total(&self) -> u64 {
        self.acquired_total
    }

    /// Positions of playing effects, for snapshots/debug output.
    pub fn active_positions(&self) -> Vec<(EffectKind, Vec2)> {
        self.pool
            .iter()
            .filter_map(|effect| {
                let effect = effect.borrow();
                effect.is_active().then(|| (effect.kind, effect.position))
            })
            .collect()
    }
}

impl EffectProvider for HeadlessEffects {
    fn acquire(&mut self, kind: EffectKind) -> Result<EffectHandle, EffectError> {
        let reusable = self.pool.iter().find(|effect| {
            Rc::strong_count(effect) == 1 && Rc::weak_count(effect) == 0 && {
                let effect = effect.borrow();
                effect.kind == kind && !effect.active
            }
        });

        let effect = match reusable {
            Some(effect) => {
                *effect.borrow_mut() = HeadlessEffect::new(kind);
                Rc::clone(effect)
            }
            None => {
                let in_pool = self
                    .pool
                    .iter()
                    .filter(|effect| effect.borrow().kind == kind)
                    .count();
                if in_pool >= self.capacity_per_kind {
                    return Err(EffectError::PoolExhausted(kind));
                }
                let effect = Rc::new(RefCell::new(HeadlessEffect::new(kind)));
                self.pool.push(Rc::clone(&effect));
                effect
            }
        };

        self.acquired_total += 1;
        Ok(effect)
    }
}
