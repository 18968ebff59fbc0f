//! Game state and core simulation types
//!
//! Everything a round needs lives in [`GameState`]; the tick function is the
//! only thing that mutates it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{Alarms, SimClock};
use super::entity::{Entity, IdAllocator};
use super::formation::Formation;
use crate::consts::*;
use crate::platform::Clock;

/// What killed the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    EnemyBullet,
    EnemyContact,
    EnemyLanded,
}

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Death frame is shown, world frozen until the hold elapses
    PlayerDying { since_ms: u64, cause: DeathCause },
    /// Round lost
    GameOver,
    /// Final wave cleared
    Won,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }
}

/// Score and progression for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u64,
    /// Current wave (1-based)
    pub wave: u32,
    /// Cleared when the round ends or the player quits
    pub running: bool,
    pub won: bool,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            score: 0,
            wave: 1,
            running: true,
            won: false,
        }
    }
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    PlayerShot,
    /// One batch of enemy kills in a single frame
    EnemiesDestroyed { count: u32 },
    BonusDestroyed,
    EnemyFired { count: u32 },
    BonusLoopStarted { loop_id: u32 },
    BonusLoopStopped { loop_id: u32 },
    PlayerKilled { cause: DeathCause },
    WaveStarted { wave: u32 },
    GameOver,
    Won,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub clock: SimClock,
    pub alarms: Alarms,
    pub round: RoundState,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Entity,
    pub formation: Formation,
    pub player_bullets: Vec<Entity>,
    pub enemy_bullets: Vec<Entity>,
    pub bonus: Option<Entity>,
    /// Decorative; never collide
    pub shields: Vec<Entity>,
    /// Pending events, drained by the frontend
    pub events: Vec<GameEvent>,
    /// Fire key state from the previous tick (shots fire on key-down)
    pub(crate) fire_held: bool,
    ids: IdAllocator,
    next_loop_id: u32,
}

impl GameState {
    /// Create a new round with the given seed
    pub fn new(seed: u64) -> Self {
        let clock = SimClock::new();
        let mut ids = IdAllocator::default();
        let player = Entity::player(ids.next_id());
        let formation = Formation::spawn(1, clock.now_ms(), &mut ids);
        let shields = [0.25f32, 0.5, 0.75]
            .iter()
            .map(|&f| Entity::shield(ids.next_id(), SCREEN_WIDTH * f))
            .collect();

        log::info!("New round (seed {seed})");

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock,
            alarms: Alarms::new(clock.now_ms()),
            round: RoundState::default(),
            phase: GamePhase::Running,
            time_ticks: 0,
            player,
            formation,
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            bonus: None,
            shields,
            events: Vec::new(),
            fire_held: false,
            ids,
            next_loop_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    pub(crate) fn next_loop_id(&mut self) -> u32 {
        let id = self.next_loop_id;
        self.next_loop_id += 1;
        id
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Replace the formation with a fresh grid for the current wave
    pub fn respawn_formation(&mut self) {
        let now = self.clock.now_ms();
        self.formation = Formation::spawn(self.round.wave, now, &mut self.ids);
    }

    /// Release the bonus loop sound if the bonus still holds it
    pub(crate) fn release_bonus_sound(&mut self) {
        if let Some(loop_id) = self.bonus.as_mut().and_then(Entity::release_sound) {
            log::debug!("Bonus loop {loop_id} stopped");
            self.events.push(GameEvent::BonusLoopStopped { loop_id });
        }
    }

    /// Remove the bonus target, releasing its sound on the way out
    pub(crate) fn retire_bonus(&mut self) {
        self.release_bonus_sound();
        self.bonus = None;
    }

    /// Round is over (lost, won, or quit)
    pub fn is_finished(&self) -> bool {
        !self.round.running
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_defaults() {
        let state = GameState::new(1);
        assert_eq!(state.round.wave, 1);
        assert_eq!(state.round.score, 0);
        assert!(state.round.running);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.formation.units.len(), FORMATION_ROWS * FORMATION_COLS);
        assert_eq!(state.shields.len(), 3);
        assert!(state.bonus.is_none());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let state = GameState::new(1);
        let mut ids: Vec<u32> = state
            .formation
            .units
            .iter()
            .chain(state.shields.iter())
            .map(|e| e.id)
            .collect();
        ids.push(state.player.id);
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_round_state_serializes() {
        let round = RoundState::default();
        let json = serde_json::to_string(&round).unwrap();
        let back: RoundState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, round);
    }
}
