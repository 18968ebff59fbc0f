//! Collision resolution between entity groups
//!
//! Rules run in a fixed order. Each rule works on a snapshot taken when the
//! rule starts and applies all of its consumptions in one batch, so hits never
//! cascade within a rule.

use super::entity::Entity;
use super::formation::Formation;
use super::state::{DeathCause, GameEvent, GameState};
use crate::consts::{BONUS_SCORE, ENEMY_SCORE, SCREEN_HEIGHT};

/// What the scoring rules did this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Bullet pairs that annihilated
    pub annihilated: usize,
    pub enemies_killed: u32,
    pub bonus_killed: bool,
    pub score_gained: u64,
}

/// Drop every entity whose mark is set
fn remove_marked(group: &mut Vec<Entity>, marks: &[bool]) {
    let mut i = 0;
    group.retain(|_| {
        let keep = !marks[i];
        i += 1;
        keep
    });
}

/// Rule 1: overlapping enemy and player bullets destroy each other
pub fn annihilate_bullets(
    enemy_bullets: &mut Vec<Entity>,
    player_bullets: &mut Vec<Entity>,
) -> usize {
    let mut enemy_hit = vec![false; enemy_bullets.len()];
    let mut player_hit = vec![false; player_bullets.len()];
    let mut pairs = 0;

    for (ei, eb) in enemy_bullets.iter().enumerate() {
        for (pi, pb) in player_bullets.iter().enumerate() {
            if eb.rect.intersects(&pb.rect) {
                enemy_hit[ei] = true;
                player_hit[pi] = true;
                pairs += 1;
            }
        }
    }

    if pairs > 0 {
        remove_marked(enemy_bullets, &enemy_hit);
        remove_marked(player_bullets, &player_hit);
    }
    pairs
}

/// Rule 2: player bullets against live enemy units.
///
/// A bullet kills at most one unit: the first overlapping unit in spawn order
/// among those live when the rule started. Returns the number of units killed.
pub fn hit_enemies(
    player_bullets: &mut Vec<Entity>,
    formation: &mut Formation,
    now_ms: u64,
) -> u32 {
    let live = formation.live_indices();
    let mut consumed = vec![false; player_bullets.len()];
    let mut doomed = vec![false; formation.units.len()];

    for (bi, bullet) in player_bullets.iter().enumerate() {
        let target = live
            .iter()
            .copied()
            .find(|&ui| bullet.rect.intersects(&formation.units[ui].rect));
        if let Some(ui) = target {
            consumed[bi] = true;
            doomed[ui] = true;
        }
    }

    let mut killed = 0;
    for (unit, _) in formation.units.iter_mut().zip(&doomed).filter(|(_, d)| **d) {
        unit.start_dying(now_ms);
        killed += 1;
    }
    remove_marked(player_bullets, &consumed);
    killed
}

/// Rule 3: player bullets against the bonus target. Returns true on a kill.
pub fn hit_bonus(
    player_bullets: &mut Vec<Entity>,
    bonus: Option<&mut Entity>,
    now_ms: u64,
) -> bool {
    let Some(bonus) = bonus else {
        return false;
    };
    if !bonus.is_live() {
        return false;
    }

    let consumed: Vec<bool> = player_bullets
        .iter()
        .map(|b| b.rect.intersects(&bonus.rect))
        .collect();
    if !consumed.contains(&true) {
        return false;
    }

    bonus.start_dying(now_ms);
    remove_marked(player_bullets, &consumed);
    true
}

/// Rules 1–3 in order, applying score and events to the state
pub fn resolve(state: &mut GameState) -> CollisionReport {
    let now = state.now_ms();
    let mut report = CollisionReport {
        annihilated: annihilate_bullets(&mut state.enemy_bullets, &mut state.player_bullets),
        ..Default::default()
    };

    report.enemies_killed = hit_enemies(&mut state.player_bullets, &mut state.formation, now);
    if report.enemies_killed > 0 {
        let gained = ENEMY_SCORE * report.enemies_killed as u64;
        state.round.score += gained;
        report.score_gained += gained;
        state.events.push(GameEvent::EnemiesDestroyed {
            count: report.enemies_killed,
        });
    }

    report.bonus_killed = hit_bonus(&mut state.player_bullets, state.bonus.as_mut(), now);
    if report.bonus_killed {
        state.round.score += BONUS_SCORE;
        report.score_gained += BONUS_SCORE;
        // Loop stops on the hit, not when the death animation ends
        state.release_bonus_sound();
        state.events.push(GameEvent::BonusDestroyed);
        log::debug!("Bonus target destroyed");
    }

    report
}

/// Rule 4: first matching player death trigger, checked in fixed order
pub fn player_death_cause(state: &GameState) -> Option<DeathCause> {
    let player = &state.player.rect;

    if state.enemy_bullets.iter().any(|b| b.rect.intersects(player)) {
        return Some(DeathCause::EnemyBullet);
    }
    if state.formation.live_units().any(|u| u.rect.intersects(player)) {
        return Some(DeathCause::EnemyContact);
    }
    // Landing counts dying units too; bounces keep pushing them down
    if state
        .formation
        .units
        .iter()
        .any(|u| u.rect.bottom() >= SCREEN_HEIGHT)
    {
        return Some(DeathCause::EnemyLanded);
    }
    None
}
