//! Basket Catcher - a fruit-catching arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, game state)
//! - `sprites`: Procedurally painted sprite and backdrop buffers
//! - `highscores`: Persisted top-10 leaderboard
//! - `settings`: Player preferences
//! - `persistence`: LocalStorage access with native stubs

pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod sprites;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;

pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions (logical pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Basket defaults - fixed height above the bottom edge
    pub const PLAYER_WIDTH: f32 = 80.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;
    /// Horizontal speed before difficulty scaling (pixels/s)
    pub const PLAYER_BASE_SPEED: f32 = 300.0;

    /// Falling object defaults
    pub const OBJECT_WIDTH: f32 = 40.0;
    pub const OBJECT_HEIGHT: f32 = 40.0;
    /// Fall speed before difficulty scaling (pixels/s)
    pub const OBJECT_BASE_FALL_SPEED: f32 = 180.0;

    /// Chance that a spawned object is a bomb
    pub const BOMB_PROBABILITY: f64 = 0.2;

    /// Points awarded per caught fruit
    pub const POINTS_PER_FRUIT: u32 = 10;
    /// Catches needed to advance a level
    pub const FRUITS_PER_LEVEL: u32 = 5;

    /// Speed multiplier gained per level past the first
    pub const SPEED_PER_LEVEL: f32 = 0.2;
    /// Speed multiplier gained per `SCORE_SPEED_STEP` points
    pub const SPEED_PER_SCORE_STEP: f32 = 0.1;
    pub const SCORE_SPEED_STEP: u32 = 50;
    /// Hard cap on the global speed multiplier
    pub const MAX_GAME_SPEED: f32 = 3.0;

    /// Spawn cadence: starts slow, tightens per level, floors at 400 ms
    pub const BASE_SPAWN_INTERVAL_MS: f32 = 2000.0;
    pub const SPAWN_INTERVAL_STEP_MS: f32 = 200.0;
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 400.0;
}
