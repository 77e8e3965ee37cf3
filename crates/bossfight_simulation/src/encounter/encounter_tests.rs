//! Tests for BossEncounter phases and ticking.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::attack::AttackHit;
    use crate::config::EncounterConfig;
    use crate::encounter::BossEncounter;
    use crate::phase::BattlePhase;

    const TICK: f32 = 1.0 / 60.0;

    fn run(encounter: &mut BossEncounter, seconds: f32) -> Vec<AttackHit> {
        let ticks = (seconds / TICK).round() as u32;
        let mut hits = Vec::new();
        for _ in 0..ticks {
            hits.extend(encounter.tick(TICK));
        }
        hits
    }

    #[test]
    fn test_start_phase_is_quiet() {
        let mut encounter = BossEncounter::new(&EncounterConfig::default());
        encounter.enter_phase(BattlePhase::Start);

        let hits = run(&mut encounter, 5.0);
        assert!(hits.is_empty());
        assert_eq!(encounter.loops(), 0);
        assert!(encounter.controller().is_all_patterns_completed());
        assert!(!encounter.controller().is_active());
    }

    #[test]
    fn test_enter_battle1_starts_opener() {
        let mut encounter = BossEncounter::new(&EncounterConfig::default());
        encounter.enter_phase(BattlePhase::Battle1);

        let snapshot = encounter.snapshot();
        assert_eq!(snapshot.phase, BattlePhase::Battle1);
        assert_eq!(snapshot.current_pattern.as_deref(), Some("battle1"));
        assert_eq!(snapshot.queued_patterns, 1);
        assert!(encounter.controller().is_active());
    }

    #[test]
    fn test_phase_loops_after_queue_drains() {
        let mut encounter = BossEncounter::new(&EncounterConfig::default());
        encounter.enter_phase(BattlePhase::Battle1);

        // battle1 (5.25s) + cooldown + ring (4.5s) + cooldown ≈ 11.75s
        run(&mut encounter, 14.0);
        assert_eq!(encounter.loops(), 1);
        assert_eq!(
            encounter.controller().current_pattern().map(|p| p.name()),
            Some("battle1")
        );
    }

    #[test]
    fn test_hidden_boss_does_not_attack() {
        let mut encounter = BossEncounter::new(&EncounterConfig::default());
        encounter.enter_phase(BattlePhase::Battle1);
        encounter.enemy().borrow_mut().visible = false;

        run(&mut encounter, 3.0);
        let snapshot = encounter.snapshot();
        assert_eq!(snapshot.pattern_elapsed, Some(0.0));
        assert_eq!(snapshot.total_hits, 0);
    }

    #[test]
    fn test_hits_damage_player() {
        let mut encounter = BossEncounter::new(&EncounterConfig::default());
        encounter.enter_phase(BattlePhase::Battle1);
        // Центр арены: сюда бьют и лейн, и центральный взрыв
        encounter.player().borrow_mut().position = Vec2::ZERO;

        let hits = run(&mut encounter, 3.5);
        assert!(hits.len() >= 2);
        assert_eq!(encounter.total_hits() as usize, hits.len());

        let damage: u32 = hits.iter().map(|hit| hit.damage).sum();
        assert_eq!(encounter.player_health(), 100 - damage);
    }

    #[test]
    fn test_reentering_phase_restarts_sequence() {
        let mut encounter = BossEncounter::new(&EncounterConfig::default());
        encounter.enter_phase(BattlePhase::Battle1);
        run(&mut encounter, 2.0);

        encounter.enter_phase(BattlePhase::Battle2);
        let snapshot = encounter.snapshot();
        assert_eq!(snapshot.current_pattern.as_deref(), Some("cross_rotating_beam"));
        assert_eq!(snapshot.queued_patterns, 0);
        assert!(!snapshot.in_cooldown);
    }

    #[test]
    fn test_effects_expire_after_store_phase() {
        let mut encounter = BossEncounter::new(&EncounterConfig::default());
        encounter.enter_phase(BattlePhase::Battle1);
        run(&mut encounter, 1.0);
        assert!(!encounter.snapshot().active_effects.is_empty());

        encounter.enter_phase(BattlePhase::Store);
        run(&mut encounter, 5.0);
        assert!(encounter.snapshot().active_effects.is_empty());
    }
}
