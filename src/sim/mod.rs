//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod entity;
pub mod formation;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::{Alarm, Alarms, SimClock};
pub use collision::{CollisionReport, player_death_cause, resolve};
pub use entity::{Entity, EntityKind, Life, LoopToken, Rect, Step};
pub use formation::Formation;
pub use snapshot::{FrameSnapshot, SpriteKind, SpriteView};
pub use spawner::{enemy_bullet_cap, fire_enemy_bullets, spawn_bonus};
pub use state::{DeathCause, GameEvent, GamePhase, GameState, RoundState};
pub use tick::{TickInput, tick};
