//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, overlaps};
pub use difficulty::{spawn_interval_ms, speed_multiplier};
pub use spawn::try_spawn;
pub use state::{
    FallingObject, FruitKind, GameEvent, GameOverCause, GamePhase, GameState, ObjectKind, Player,
};
pub use tick::{FixedStep, TickInput, tick};
