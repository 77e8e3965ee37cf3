//! Здоровье участников боя (игрок, босс)

use serde::{Deserialize, Serialize};

/// Здоровье
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Полное восстановление с новым максимумом (переход между фазами боя)
    pub fn refill(&mut self, max: u32) {
        self.max = max;
        self.current = max;
    }

    pub fn percent(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100);
        assert_eq!(health.current, 100);

        health.take_damage(30);
        assert_eq!(health.current, 70);
        assert!(health.is_alive());

        health.take_damage(100); // Saturating sub
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_refill() {
        let mut health = Health::new(100);
        health.take_damage(100);
        assert!(!health.is_alive());

        health.refill(30);
        assert_eq!(health.current, 30);
        assert_eq!(health.max, 30);
        assert_eq!(health.percent(), 1.0);
    }

    #[test]
    fn test_health_percent_zero_max() {
        let health = Health { current: 0, max: 0 };
        assert_eq!(health.percent(), 0.0);
    }
}
