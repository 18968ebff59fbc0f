//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::{player_death_cause, resolve};
use super::entity::{Entity, Step};
use super::spawner::{fire_enemy_bullets, spawn_bonus};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::platform::{InputProvider, Key};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Fire key held; a shot goes out on the press, not while held
    pub fire: bool,
    /// Stop the round
    pub quit: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Sample the held keys once for this tick
    pub fn sample(keys: &impl InputProvider) -> Self {
        Self {
            left: keys.is_key_down(Key::Left),
            right: keys.is_key_down(Key::Right),
            fire: keys.is_key_down(Key::Fire),
            quit: keys.is_key_down(Key::Quit),
            idle_mode: false,
        }
    }

    pub fn with_idle(mut self, idle_mode: bool) -> Self {
        self.idle_mode = idle_mode;
        self
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    if !state.round.running {
        return;
    }

    if input.quit {
        log::info!(
            "Quit requested at wave {}, score {}",
            state.round.wave,
            state.round.score
        );
        if let GamePhase::PlayerDying { .. } = state.phase {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver);
        }
        end_round(state);
        return;
    }

    state.clock.advance(dt_ms);
    state.time_ticks += 1;
    let now = state.now_ms();

    match state.phase {
        GamePhase::Running => run_frame(state, input, dt_ms),
        GamePhase::PlayerDying { since_ms, .. } => {
            if now.saturating_sub(since_ms) >= PLAYER_DEATH_HOLD_MS {
                log::info!(
                    "Game over: wave {}, score {}",
                    state.round.wave,
                    state.round.score
                );
                state.phase = GamePhase::GameOver;
                state.events.push(GameEvent::GameOver);
                end_round(state);
            }
        }
        GamePhase::GameOver | GamePhase::Won => {}
    }
}

/// Stop the loop and release anything still held
fn end_round(state: &mut GameState) {
    state.release_bonus_sound();
    state.round.running = false;
}

fn run_frame(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    let now = state.now_ms();
    let dt = crate::ms_to_secs(dt_ms);

    // Alarms due since the last tick
    if state.alarms.enemy_fire.poll(now) {
        fire_enemy_bullets(state);
    }
    if state.alarms.bonus_spawn.poll(now) {
        spawn_bonus(state);
    }

    let input = if input.idle_mode {
        autopilot(state)
    } else {
        *input
    };
    apply_input(state, &input, dt);

    // Advance everything that moves
    state
        .player_bullets
        .retain_mut(|b| b.update(now, dt) == Step::Keep);
    state
        .enemy_bullets
        .retain_mut(|b| b.update(now, dt) == Step::Keep);
    state.formation.step(now, dt);
    let bonus_expired = state
        .bonus
        .as_mut()
        .is_some_and(|b| b.update(now, dt) == Step::Expired);
    if bonus_expired {
        state.retire_bonus();
    }

    state.formation.check_edge_and_bounce();

    resolve(state);

    if let Some(cause) = player_death_cause(state) {
        log::info!("Player killed ({cause:?}) at wave {}", state.round.wave);
        state.phase = GamePhase::PlayerDying {
            since_ms: now,
            cause,
        };
        state.events.push(GameEvent::PlayerKilled { cause });
        return;
    }

    if state.formation.is_cleared() {
        state.round.wave += 1;
        if state.round.wave > FINAL_WAVE {
            log::info!("All waves cleared, final score {}", state.round.score);
            state.phase = GamePhase::Won;
            state.round.won = true;
            state.events.push(GameEvent::Won);
            end_round(state);
        } else {
            log::info!(
                "Wave {} begins (score {})",
                state.round.wave,
                state.round.score
            );
            state.respawn_formation();
            state.events.push(GameEvent::WaveStarted {
                wave: state.round.wave,
            });
        }
    }
}

fn apply_input(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player.rect;
    if input.left {
        player.min.x -= PLAYER_SPEED * dt;
    }
    if input.right {
        player.min.x += PLAYER_SPEED * dt;
    }
    player.min.x = player.min.x.clamp(0.0, SCREEN_WIDTH - player.size.x);

    let pressed = input.fire && !state.fire_held;
    state.fire_held = input.fire;
    if pressed && state.player_bullets.len() < MAX_PLAYER_BULLETS {
        let origin = glam::Vec2::new(state.player.rect.center().x, state.player.rect.top());
        let id = state.next_entity_id();
        state.player_bullets.push(Entity::player_bullet(id, origin));
        state.events.push(GameEvent::PlayerShot);
    }
}

/// Demo player: dodge incoming fire, otherwise chase a target and shoot
fn autopilot(state: &GameState) -> TickInput {
    let player = state.player.rect;
    let px = player.center().x;

    // Dodge the closest threatening enemy bullet
    let threat = state
        .enemy_bullets
        .iter()
        .filter(|b| b.rect.bottom() < player.bottom() && player.top() - b.rect.bottom() < 160.0)
        .filter(|b| (b.rect.center().x - px).abs() < player.size.x)
        .min_by(|a, b| {
            (player.top() - a.rect.bottom())
                .partial_cmp(&(player.top() - b.rect.bottom()))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let target_x = if let Some(bullet) = threat {
        let bx = bullet.rect.center().x;
        let away = if bx < px { px + 80.0 } else { px - 80.0 };
        // Prefer the side with room to move
        if away < player.size.x / 2.0 || away > SCREEN_WIDTH - player.size.x / 2.0 {
            if bx < px { px - 80.0 } else { px + 80.0 }
        } else {
            away
        }
    } else if let Some(bonus) = state.bonus.as_ref().filter(|b| b.is_live()) {
        bonus.rect.center().x
    } else {
        state
            .formation
            .live_units()
            .map(|u| u.rect.center().x)
            .min_by(|a, b| {
                (a - px)
                    .abs()
                    .partial_cmp(&(b - px).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(px)
    };

    let dx = target_x - px;
    TickInput {
        left: dx < -4.0,
        right: dx > 4.0,
        // Release every other tick so each press registers
        fire: threat.is_none() && state.time_ticks.is_multiple_of(2),
        quit: false,
        idle_mode: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeldKeys;

    fn idle() -> TickInput {
        TickInput::default()
    }

    /// Round with the enemy-fire alarm disabled
    fn quiet(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.alarms.enemy_fire.next_due_ms = u64::MAX;
        state
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let mut state = GameState::new(1);
        let start = state.player.rect.min.x;
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &left, 100);
        assert!((state.player.rect.min.x - (start - 30.0)).abs() < 1e-3);

        for _ in 0..200 {
            tick(&mut state, &left, SIM_DT_MS);
        }
        assert_eq!(state.player.rect.min.x, 0.0);
    }

    #[test]
    fn test_fire_on_press_only() {
        let mut state = GameState::new(1);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT_MS);
        assert_eq!(state.player_bullets.len(), 1);
        assert!(state.events.contains(&GameEvent::PlayerShot));

        // Held: no second shot even after the first leaves
        state.player_bullets.clear();
        tick(&mut state, &fire, SIM_DT_MS);
        assert!(state.player_bullets.is_empty());

        // Release and press again
        tick(&mut state, &idle(), SIM_DT_MS);
        tick(&mut state, &fire, SIM_DT_MS);
        assert_eq!(state.player_bullets.len(), 1);
    }

    #[test]
    fn test_one_player_bullet_at_a_time() {
        let mut state = GameState::new(1);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT_MS);
        tick(&mut state, &idle(), SIM_DT_MS);
        tick(&mut state, &fire, SIM_DT_MS);
        assert_eq!(state.player_bullets.len(), 1);
    }

    #[test]
    fn test_enemy_fire_alarm_at_three_seconds() {
        let mut state = GameState::new(1);
        tick(&mut state, &idle(), ENEMY_FIRE_INTERVAL_MS - 1);
        assert!(state.enemy_bullets.is_empty());
        tick(&mut state, &idle(), 1);
        assert_eq!(state.enemy_bullets.len(), 1);
    }

    #[test]
    fn test_bonus_alarm_at_fifteen_seconds() {
        let mut state = quiet(1);
        while state.now_ms() < BONUS_SPAWN_INTERVAL_MS - SIM_DT_MS {
            tick(&mut state, &idle(), SIM_DT_MS);
        }
        assert!(state.bonus.is_none());
        while state.now_ms() < BONUS_SPAWN_INTERVAL_MS {
            tick(&mut state, &idle(), SIM_DT_MS);
        }
        assert!(state.round.running);
        assert!(state.bonus.is_some());
        assert!(
            state
                .events
                .contains(&GameEvent::BonusLoopStarted { loop_id: 1 })
        );
    }

    #[test]
    fn test_bonus_leaving_screen_stops_loop() {
        let mut state = GameState::new(1);
        spawn_bonus(&mut state);
        state.drain_events();
        if let Some(bonus) = state.bonus.as_mut() {
            bonus.rect.min.x = -BONUS_WIDTH + 0.5;
        }
        tick(&mut state, &idle(), SIM_DT_MS);
        assert!(state.bonus.is_none());
        assert_eq!(
            state.events,
            vec![GameEvent::BonusLoopStopped { loop_id: 1 }]
        );
    }

    #[test]
    fn test_quit_stops_round_and_releases_loop() {
        let mut state = GameState::new(1);
        spawn_bonus(&mut state);
        state.drain_events();
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &quit, SIM_DT_MS);
        assert!(state.is_finished());
        assert_eq!(
            state.events,
            vec![GameEvent::BonusLoopStopped { loop_id: 1 }]
        );

        // Further ticks are ignored
        let ticks = state.time_ticks;
        tick(&mut state, &idle(), SIM_DT_MS);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_quit_while_dying_ends_in_game_over() {
        let mut state = GameState::new(1);
        let last = state.formation.units.len() - 1;
        state.formation.units[last].rect.min.y = SCREEN_HEIGHT - ENEMY_SIZE;
        tick(&mut state, &idle(), SIM_DT_MS);
        assert!(matches!(state.phase, GamePhase::PlayerDying { .. }));
        state.drain_events();

        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &quit, SIM_DT_MS);
        assert!(state.is_finished());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.snapshot().phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::GameOver]);
    }

    #[test]
    fn test_sample_from_provider() {
        let mut keys = HeldKeys::default();
        keys.press(Key::Right);
        keys.press(Key::Fire);
        let input = TickInput::sample(&keys);
        assert!(input.right && input.fire);
        assert!(!input.left && !input.quit);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let demo = TickInput::default().with_idle(true);

        for _ in 0..2000 {
            tick(&mut state1, &demo, SIM_DT_MS);
            tick(&mut state2, &demo, SIM_DT_MS);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.round, state2.round);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.enemy_bullets, state2.enemy_bullets);
        assert_eq!(state1.player.rect, state2.player.rect);
    }

    #[test]
    fn test_autopilot_scores() {
        let mut state = GameState::new(7);
        let demo = TickInput::default().with_idle(true);
        for _ in 0..600 {
            tick(&mut state, &demo, SIM_DT_MS);
        }
        assert!(state.round.score > 0);
    }
}
