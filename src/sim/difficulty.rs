//! Difficulty curve
//!
//! One scalar speed multiplier and one spawn cadence, both derived from
//! level and score. Pure functions; `apply` writes the results back into
//! the state and the player's effective speed.

use super::state::GameState;
use crate::consts::*;

/// Global speed multiplier for a given level and score.
///
/// `min(1 + (level-1)*0.2 + floor(score/50)*0.1, 3.0)` - monotonically
/// non-decreasing in both inputs, hard-capped so late game stays playable.
pub fn speed_multiplier(level: u32, score: u32) -> f32 {
    let level_bonus = (level.saturating_sub(1)) as f32 * SPEED_PER_LEVEL;
    let score_bonus = (score / SCORE_SPEED_STEP) as f32 * SPEED_PER_SCORE_STEP;
    (1.0 + level_bonus + score_bonus).min(MAX_GAME_SPEED)
}

/// Spawn cadence for a given level.
///
/// `max(400, 2000 - (level-1)*200)` ms - each level shaves 200 ms until
/// the 400 ms floor.
pub fn spawn_interval_ms(level: u32) -> f32 {
    let reduction = (level.saturating_sub(1)) as f32 * SPAWN_INTERVAL_STEP_MS;
    (BASE_SPAWN_INTERVAL_MS - reduction).max(MIN_SPAWN_INTERVAL_MS)
}

/// Recompute difficulty for the current state and rederive the player's
/// effective speed
pub fn apply(state: &mut GameState) {
    state.game_speed = speed_multiplier(state.level, state.score);
    state.spawn_interval_ms = spawn_interval_ms(state.level);
    state.player.speed = state.player.base_speed * state.game_speed;
}
