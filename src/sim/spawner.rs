//! Timer-driven spawning of enemy bullets and the bonus target

use rand::Rng;

use super::entity::{Entity, LoopToken};
use super::state::{GameEvent, GameState};
use crate::consts::MAX_ENEMY_BULLETS;

/// Concurrent enemy bullets allowed on a wave
pub fn enemy_bullet_cap(wave: u32) -> usize {
    wave.min(MAX_ENEMY_BULLETS) as usize
}

/// Top up live enemy bullets to the wave's cap.
///
/// Each live enemy fires at most once per event, picked uniformly from the
/// ones that have not fired yet. Returns the number of bullets spawned.
pub fn fire_enemy_bullets(state: &mut GameState) -> usize {
    let cap = enemy_bullet_cap(state.round.wave);
    let mut shooters = state.formation.live_indices();
    let mut fired = 0;

    while state.enemy_bullets.len() < cap && !shooters.is_empty() {
        let pick = state.rng.random_range(0..shooters.len());
        let unit = shooters.swap_remove(pick);
        let origin = state.formation.units[unit].rect.bottom_center();
        let id = state.next_entity_id();
        state.enemy_bullets.push(Entity::enemy_bullet(id, origin));
        fired += 1;
    }

    if fired > 0 {
        log::debug!(
            "Enemy volley: {fired} fired, {}/{cap} live",
            state.enemy_bullets.len()
        );
        state.events.push(GameEvent::EnemyFired {
            count: fired as u32,
        });
    }
    fired
}

/// Spawn a bonus target unless one is already present (alive or dying)
pub fn spawn_bonus(state: &mut GameState) -> bool {
    if state.bonus.is_some() {
        return false;
    }
    let id = state.next_entity_id();
    let loop_id = state.next_loop_id();
    state.bonus = Some(Entity::bonus(id, LoopToken::new(loop_id)));
    state.events.push(GameEvent::BonusLoopStarted { loop_id });
    log::debug!("Bonus target {id} arrived (loop {loop_id})");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_scales_with_wave() {
        assert_eq!(enemy_bullet_cap(1), 1);
        assert_eq!(enemy_bullet_cap(4), 4);
        assert_eq!(enemy_bullet_cap(5), 5);
        assert_eq!(enemy_bullet_cap(80), 5);
    }

    #[test]
    fn test_fire_tops_up_to_cap() {
        let mut state = GameState::new(3);
        state.round.wave = 3;
        assert_eq!(fire_enemy_bullets(&mut state), 3);
        assert_eq!(state.enemy_bullets.len(), 3);

        // Already at cap: nothing more
        assert_eq!(fire_enemy_bullets(&mut state), 0);

        state.enemy_bullets.pop();
        assert_eq!(fire_enemy_bullets(&mut state), 1);
        assert_eq!(state.enemy_bullets.len(), 3);
    }

    #[test]
    fn test_fire_limited_by_live_enemies() {
        let mut state = GameState::new(3);
        state.round.wave = 5;
        state.formation.units.truncate(3);
        state.formation.units[0].start_dying(0);
        assert_eq!(fire_enemy_bullets(&mut state), 2);
    }

    #[test]
    fn test_bullet_spawns_under_shooter() {
        let mut state = GameState::new(3);
        state.formation.units.truncate(1);
        fire_enemy_bullets(&mut state);
        let shooter = state.formation.units[0].rect;
        let bullet = state.enemy_bullets[0].rect;
        assert_eq!(bullet.center(), shooter.bottom_center());
    }

    #[test]
    fn test_no_fire_from_empty_formation() {
        let mut state = GameState::new(3);
        state.formation.units.clear();
        assert_eq!(fire_enemy_bullets(&mut state), 0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_single_bonus_at_a_time() {
        let mut state = GameState::new(3);
        assert!(spawn_bonus(&mut state));
        assert!(!spawn_bonus(&mut state));
        assert_eq!(
            state.events,
            vec![GameEvent::BonusLoopStarted { loop_id: 1 }]
        );
    }
}
