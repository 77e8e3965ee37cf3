//! PatternFactory — named attack patterns used by the battle phases.
//!
//! Фабрика владеет provider'ом эффектов (attacks получают его clone) и
//! seeded RNG: одинаковый seed → одинаковые scatter-паттерны.

use std::f32::consts::{FRAC_PI_2, TAU};

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::attack::{BeamAttack, CircleAttack};
use crate::config::PatternTuning;
use crate::effects::{Rgba, SharedEffects};
use crate::movement::EnemyMovement;
use crate::pattern::AttackPattern;


/// Arena anchor points (world units, boss arena centred on the origin)
pub const ARENA_CENTER: Vec2 = Vec2::ZERO;
pub const BOSS_HOME: Vec2 = Vec2::new(0.0, 200.0);

const SWEEP_COLOR: Rgba = Rgba::new(1.0, 100.0 / 255.0, 0.0, 200.0 / 255.0);
const SCATTER_COLOR: Rgba = Rgba::new(0.8, 0.2, 1.0, 0.35);

/// Rows of circles crossing the arena horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepParams {
    pub rows: u32,
    pub start_x: f32,
    pub end_x: f32,
    pub first_row_y: f32,
    pub row_spacing: f32,
    pub speed: f32,
    pub radius: f32,
    pub delay: f32,
    /// Gap between two rows' start times
    pub stagger: f32,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            rows: 5,
            start_x: -800.0,
            end_x: 800.0,
            first_row_y: -200.0,
            row_spacing: 100.0,
            speed: 350.0,
            radius: 80.0,
            delay: 2.0,
            stagger: 0.5,
        }
    }
}

pub struct PatternFactory {
    effects: SharedEffects,
    tuning: PatternTuning,
    rng: ChaCha8Rng,
    seed: u64,
}

impl PatternFactory {
    pub fn new(effects: SharedEffects, tuning: PatternTuning, seed: u64) -> Self {
        Self {
            effects,
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> PatternTuning {
        self.tuning
    }

    fn pattern(&self, name: &str) -> AttackPattern {
        AttackPattern::new(name).with_tuning(self.tuning)
    }

    fn circle(&self, position: Vec2, delay: f32, radius: f32, sequence_number: u32) -> CircleAttack {
        CircleAttack::new(position, delay, radius, sequence_number, self.effects.clone())
    }

    /// Scripted opener: the boss appears, a lane of circles, a centre blast,
    /// then the boss steps aside for a diagonal line.
    pub fn battle1_pattern(&mut self) -> AttackPattern {
        let mut pattern = self.pattern("battle1");
        let mut sequence = 0u32;
        let mut next = || {
            sequence += 1;
            sequence
        };

        pattern.add_enemy_movement(EnemyMovement::Teleport(BOSS_HOME), 0.0);
        pattern.add_enemy_movement(EnemyMovement::SetVisible(true), 0.0);

        for x in [-300.0, 0.0, 300.0] {
            let attack = self.circle(Vec2::new(x, 0.0), 1.5, 90.0, next());
            pattern.add_attack(Box::new(attack), 0.0);
        }

        let blast = self.circle(ARENA_CENTER, 1.0, 160.0, next());
        pattern.add_attack(Box::new(blast), 1.5);

        pattern.add_enemy_movement(EnemyMovement::Shift(Vec2::new(-250.0, 0.0)), 2.5);
        for step in 0..4 {
            let offset = step as f32 * 120.0;
            let attack = self.circle(Vec2::new(-360.0 + offset, -180.0 + offset), 1.0, 70.0, next());
            pattern.add_attack(Box::new(attack), 3.0 + step as f32 * 0.25);
        }
        pattern.add_enemy_movement(EnemyMovement::Teleport(BOSS_HOME), 5.0);

        pattern
    }

    /// `count` circles evenly spaced on a ring, fired one every `interval` seconds.
    pub fn circular_pattern(
        &mut self,
        center: Vec2,
        ring_radius: f32,
        attack_radius: f32,
        count: u32,
        delay: f32,
        interval: f32,
    ) -> AttackPattern {
        let mut pattern = self.pattern("circular");
        if count == 0 {
            crate::log_warning("PatternFactory: circular pattern with zero attacks");
            return pattern;
        }

        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let position = center + Vec2::from_angle(angle) * ring_radius;
            let attack = self.circle(position, delay, attack_radius, i + 1);
            pattern.add_attack(Box::new(attack), i as f32 * interval);
        }

        pattern
    }

    /// Two perpendicular beams crossing at `center`, spinning together.
    pub fn cross_rotating_beam_pattern(
        &mut self,
        center: Vec2,
        width: f32,
        height: f32,
        rotation_speed: f32,
        duration: f32,
        countdown: f32,
    ) -> AttackPattern {
        let mut pattern = self.pattern("cross_rotating_beam");
        let size = Vec2::new(width, height);

        pattern.add_enemy_movement(EnemyMovement::Teleport(center), 0.0);

        for (i, rotation) in [0.0, FRAC_PI_2].into_iter().enumerate() {
            let beam = BeamAttack::new(center, size, rotation, countdown, i as u32 + 1, self.effects.clone())
                .with_rotation_speed(rotation_speed)
                .with_active_duration(duration);
            pattern.add_attack(Box::new(beam), 0.0);
        }

        pattern.set_duration(countdown + duration + self.tuning.settle_margin);
        pattern
    }

    /// Rows of circles sweeping from `start_x` to `end_x`.
    pub fn sweeping_circles_pattern(&mut self, params: SweepParams) -> AttackPattern {
        let mut pattern = self.pattern("sweeping_circles");
        pattern.add_enemy_movement(EnemyMovement::Teleport(BOSS_HOME), 0.0);

        let distance = (params.end_x - params.start_x).abs();
        let direction = Vec2::new(params.end_x - params.start_x, 0.0).normalize_or_zero();
        let travel_time = if params.speed > 0.0 { distance / params.speed } else { 0.0 };
        let mut last_end = 0.0f32;

        for row in 0..params.rows {
            let start = Vec2::new(
                params.start_x,
                params.first_row_y + row as f32 * params.row_spacing,
            );
            let start_time = row as f32 * params.stagger;
            let attack = self
                .circle(start, params.delay, params.radius, row + 1)
                .with_color(SWEEP_COLOR)
                .with_motion(direction, params.speed, distance);
            pattern.add_attack(Box::new(attack), start_time);
            last_end = last_end.max(start_time + params.delay + travel_time);
        }

        // Движущийся круг живёт дольше delay: растягиваем паттерн под полёт
        pattern.set_duration(last_end + self.tuning.settle_margin);
        pattern
    }

    /// `count` circles at seeded random positions within `spread` of `center`.
    pub fn scatter_pattern(
        &mut self,
        center: Vec2,
        spread: f32,
        count: u32,
        radius: f32,
        delay: f32,
        interval: f32,
    ) -> AttackPattern {
        let mut pattern = self.pattern("scatter");
        let spread = spread.abs();

        for i in 0..count {
            let offset = if spread > 0.0 {
                Vec2::new(
                    self.rng.gen_range(-spread..=spread),
                    self.rng.gen_range(-spread..=spread),
                )
            } else {
                Vec2::ZERO
            };
            let attack = self
                .circle(center + offset, delay, radius, i + 1)
                .with_color(SCATTER_COLOR);
            pattern.add_attack(Box::new(attack), i as f32 * interval);
        }

        pattern
    }
}
