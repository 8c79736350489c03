//! Time-gated object spawner
//!
//! At most one object per firing. Randomness is derived from the session
//! seed salted with the running spawn count, so a session replays
//! identically from its seed regardless of wall-clock timing.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{FallingObject, FruitKind, GameState, ObjectKind};
use crate::consts::*;

/// RNG for the next spawn decision
fn spawn_rng(state: &GameState) -> Pcg32 {
    let salt = (state.spawn_count as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    Pcg32::seed_from_u64(state.seed ^ salt)
}

/// Spawn one falling object if the cadence interval has elapsed.
///
/// Kind is a bomb with probability 0.2, else a uniformly chosen fruit;
/// x is uniform across the field, y starts just above the visible top.
/// Returns whether an object was created.
pub fn try_spawn(state: &mut GameState) -> bool {
    if state.elapsed_ms - state.last_spawn_ms <= f64::from(state.spawn_interval_ms) {
        return false;
    }

    let mut rng = spawn_rng(state);
    let kind = if rng.random_bool(BOMB_PROBABILITY) {
        ObjectKind::Bomb
    } else {
        ObjectKind::Fruit(FruitKind::ALL[rng.random_range(0..FruitKind::ALL.len())])
    };
    let x = rng.random_range(0.0..FIELD_WIDTH - OBJECT_WIDTH);

    state.objects.push(FallingObject::new(x, kind, state.game_speed));
    state.last_spawn_ms = state.elapsed_ms;
    state.spawn_count += 1;
    true
}
