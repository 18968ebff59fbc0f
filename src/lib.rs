//! Star Invaders - a wave-based arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, formation, spawning, collisions, state machine)
//! - `renderer`: Presentation adapter (render sink trait, frame composition)
//! - `audio`: Sound event routing to an audio sink
//! - `assets`: Sprite/sound loading with placeholder fallback
//! - `platform`: Input and clock abstraction, frame pacing
//! - `settings`: Runtime configuration

pub mod assets;
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const SIM_DT_MS: u64 = 16;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 64.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;
    /// Gap between the ship's bottom edge and the screen bottom
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;
    /// Horizontal speed (px/s), 5 px per 60 Hz frame
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Live player bullets allowed at once
    pub const MAX_PLAYER_BULLETS: usize = 1;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 20.0;
    pub const PLAYER_BULLET_SPEED: f32 = 600.0;
    pub const ENEMY_BULLET_SPEED: f32 = 300.0;

    /// Enemy formation grid
    pub const FORMATION_ROWS: usize = 3;
    pub const FORMATION_COLS: usize = 10;
    pub const FORMATION_SPACING_X: f32 = 60.0;
    pub const FORMATION_SPACING_Y: f32 = 60.0;
    pub const FORMATION_OFFSET_X: f32 = 50.0;
    pub const FORMATION_OFFSET_Y: f32 = 50.0;
    pub const ENEMY_SIZE: f32 = 40.0;
    /// Starting horizontal speed (px/s), 1.125 px per 60 Hz frame
    pub const ENEMY_BASE_SPEED: f32 = 67.5;
    /// Speed multiplier applied on every edge bounce
    pub const BOUNCE_SPEEDUP: f32 = 1.1;
    /// Vertical drop applied on every edge bounce
    pub const BOUNCE_DESCENT: f32 = 20.0;
    /// Animation frame cadence
    pub const ENEMY_ANIM_MS: u64 = 1000;

    /// Bonus target
    pub const BONUS_WIDTH: f32 = 60.0;
    pub const BONUS_HEIGHT: f32 = 30.0;
    pub const BONUS_Y: f32 = 40.0;
    /// Time the bonus target needs to cross the whole screen
    pub const BONUS_CROSSING_MS: u64 = 10_000;

    /// Shields (decorative)
    pub const SHIELD_WIDTH: f32 = 80.0;
    pub const SHIELD_HEIGHT: f32 = 40.0;
    pub const SHIELD_CENTER_Y: f32 = SCREEN_HEIGHT - 100.0;

    /// Death animation length for enemies and the bonus target
    pub const DEATH_ANIM_MS: u64 = 500;
    /// Freeze after the player is hit, before the round ends
    pub const PLAYER_DEATH_HOLD_MS: u64 = 1000;
    /// How long the victory screen stays up in real-time mode
    pub const WIN_SCREEN_HOLD_MS: u64 = 3000;

    /// Timers
    pub const ENEMY_FIRE_INTERVAL_MS: u64 = 3000;
    pub const BONUS_SPAWN_INTERVAL_MS: u64 = 15_000;

    /// Scoring and progression
    pub const ENEMY_SCORE: u64 = 1;
    pub const BONUS_SCORE: u64 = 10;
    pub const MAX_ENEMY_BULLETS: u32 = 5;
    pub const FINAL_WAVE: u32 = 99;
}

/// Milliseconds to seconds for velocity integration
#[inline]
pub fn ms_to_secs(ms: u64) -> f32 {
    ms as f32 / 1000.0
}
