//! Настройки движка паттернов.
//!
//! Все структуры с `Default` (значения боя по умолчанию) и serde, чтобы хост
//! мог грузить их из своего формата конфигов.

use serde::{Deserialize, Serialize};

/// What happens to entries that come due on the tick that ends a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Duration check first: entries crossed on the terminating tick never fire.
    #[default]
    FinishFirst,
    /// Fire and update every due entry, then finish.
    FlushDue,
}

/// Per-pattern timeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternTuning {
    /// Added after an attack's delay when extending the pattern duration (seconds)
    pub settle_margin: f32,
    pub boundary: BoundaryPolicy,
}

impl Default for PatternTuning {
    fn default() -> Self {
        Self {
            settle_margin: 0.5,
            boundary: BoundaryPolicy::FinishFirst,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Mandatory gap between two patterns (seconds)
    pub cooldown_duration: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cooldown_duration: 1.0,
        }
    }
}

/// Headless encounter settings (host side).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncounterConfig {
    pub seed: u64,
    /// Simulation tick rate (FixedUpdate)
    pub tick_hz: f64,
    pub effect_pool_per_kind: usize,
    pub player_health: u32,
    pub controller: ControllerConfig,
    pub pattern: PatternTuning,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
            effect_pool_per_kind: 64,
            player_health: 100,
            controller: ControllerConfig::default(),
            pattern: PatternTuning::default(),
        }
    }
}
