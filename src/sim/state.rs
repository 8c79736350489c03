//! Game state and core simulation types
//!
//! Everything that defines one play session lives here. The state is
//! serializable and fully determined by its seed plus the input stream.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the start screen
    Ready,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Session ended; only a full reset leaves this phase
    GameOver,
}

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// A bomb landed in the basket
    BombCaught,
    /// A fruit fell past the basket and hit the ground
    FruitMissed,
}

impl GameOverCause {
    /// Player-facing message for the game-over screen
    pub fn message(&self) -> &'static str {
        match self {
            GameOverCause::BombCaught => "You hit a bomb!",
            GameOverCause::FruitMissed => "A fruit hit the ground!",
        }
    }
}

/// Fruit varieties (cosmetic - gameplay only distinguishes fruit from bomb)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FruitKind {
    Strawberry,
    Apple,
    Orange,
    Banana,
    Watermelon,
}

impl FruitKind {
    pub const ALL: [FruitKind; 5] = [
        FruitKind::Strawberry,
        FruitKind::Apple,
        FruitKind::Orange,
        FruitKind::Banana,
        FruitKind::Watermelon,
    ];
}

/// What a falling object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Fruit(FruitKind),
    Bomb,
}

impl ObjectKind {
    /// True for objects the player wants to catch
    #[inline]
    pub fn is_good(&self) -> bool {
        matches!(self, ObjectKind::Fruit(_))
    }
}

/// The player's basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner; y never changes after creation
    pub pos: Vec2,
    pub size: Vec2,
    /// Movement speed before difficulty scaling (pixels/s)
    pub base_speed: f32,
    /// Effective speed, rederived every tick from the game speed
    pub speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                FIELD_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                FIELD_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
            ),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            base_speed: PLAYER_BASE_SPEED,
            speed: PLAYER_BASE_SPEED,
        }
    }
}

impl Player {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Apply held movement keys for one tick, clamped to the field bounds
    pub fn apply_input(&mut self, left: bool, right: bool, dt: f32) {
        if left {
            self.pos.x -= self.speed * dt;
        }
        if right {
            self.pos.x += self.speed * dt;
        }
        self.pos.x = self.pos.x.clamp(0.0, FIELD_WIDTH - self.size.x);
    }
}

/// A fruit or bomb falling through the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    /// Top-left corner; spawns just above the visible field
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ObjectKind,
    /// Fall speed before difficulty scaling (pixels/s)
    pub base_speed: f32,
    /// Effective speed, rederived from the game speed as it falls
    pub speed: f32,
}

impl FallingObject {
    pub fn new(x: f32, kind: ObjectKind, game_speed: f32) -> Self {
        Self {
            pos: Vec2::new(x, -OBJECT_HEIGHT),
            size: Vec2::new(OBJECT_WIDTH, OBJECT_HEIGHT),
            kind,
            base_speed: OBJECT_BASE_FALL_SPEED,
            speed: OBJECT_BASE_FALL_SPEED * game_speed,
        }
    }

    /// Advance one tick; speed tracks the current global game speed
    pub fn advance(&mut self, game_speed: f32, dt: f32) {
        self.speed = self.base_speed * game_speed;
        self.pos.y += self.speed * dt;
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Bottom edge, used for the ground-exit check
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Discrete events emitted by the simulation and drained by the shell
/// (sounds, screen transitions, score persistence)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    /// A fruit was caught
    Collected { kind: FruitKind },
    /// Five fruits collected; difficulty stepped up
    LevelUp { level: u32 },
    /// Terminal: the session is over
    GameOver { score: u32, level: u32, cause: GameOverCause },
}

/// Complete game state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed; spawn randomness derives from it
    pub seed: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Score (+10 per caught fruit)
    pub score: u32,
    /// Level, starting at 1
    pub level: u32,
    /// Fruits caught since the last level-up (0..5)
    pub fruits_collected: u32,
    /// Global speed multiplier, capped at 3.0
    pub game_speed: f32,
    /// Current spawn cadence in milliseconds
    pub spawn_interval_ms: f32,
    /// Simulated time since session start (ms, accumulated from the fixed dt)
    pub elapsed_ms: f64,
    /// Simulated time of the most recent spawn (ms)
    pub last_spawn_ms: f64,
    /// Number of objects spawned so far; salts per-spawn randomness
    pub spawn_count: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// The player's basket
    pub player: Player,
    /// Live falling objects, oldest first
    pub objects: Vec<FallingObject>,
    /// Events queued this frame, drained by the shell
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh session in the `Ready` phase
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Ready,
            score: 0,
            level: 1,
            fruits_collected: 0,
            game_speed: 1.0,
            spawn_interval_ms: BASE_SPAWN_INTERVAL_MS,
            elapsed_ms: 0.0,
            last_spawn_ms: 0.0,
            spawn_count: 0,
            time_ticks: 0,
            player: Player::default(),
            objects: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Terminal transition; no tick runs after this within the frame
    pub(crate) fn fail(&mut self, cause: GameOverCause) {
        self.phase = GamePhase::GameOver;
        self.push_event(GameEvent::GameOver {
            score: self.score,
            level: self.level,
            cause,
        });
        log::info!(
            "Game over at level {} with score {}: {}",
            self.level,
            self.score,
            cause.message()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.fruits_collected, 0);
        assert_eq!(state.game_speed, 1.0);
        assert_eq!(state.spawn_interval_ms, BASE_SPAWN_INTERVAL_MS);
        assert!(state.objects.is_empty());
    }

    #[test]
    fn test_player_starts_centered_above_bottom() {
        let player = Player::default();
        assert_eq!(player.pos.x, FIELD_WIDTH / 2.0 - PLAYER_WIDTH / 2.0);
        assert_eq!(
            player.pos.y,
            FIELD_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN
        );
    }

    #[test]
    fn test_player_clamps_to_field_edges() {
        let mut player = Player::default();
        player.pos.x = 2.0;
        // A long-held left press cannot push past the left edge
        for _ in 0..30 {
            player.apply_input(true, false, 1.0 / 60.0);
        }
        assert_eq!(player.pos.x, 0.0);

        for _ in 0..600 {
            player.apply_input(false, true, 1.0 / 60.0);
        }
        assert_eq!(player.pos.x, FIELD_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_object_spawns_above_field() {
        let obj = FallingObject::new(100.0, ObjectKind::Bomb, 1.0);
        assert_eq!(obj.pos.y, -OBJECT_HEIGHT);
        assert_eq!(obj.bottom(), 0.0);
    }

    #[test]
    fn test_object_speed_tracks_game_speed() {
        let mut obj = FallingObject::new(0.0, ObjectKind::Fruit(FruitKind::Apple), 1.0);
        obj.advance(2.0, 1.0);
        assert_eq!(obj.speed, OBJECT_BASE_FALL_SPEED * 2.0);
        assert_eq!(obj.pos.y, -OBJECT_HEIGHT + OBJECT_BASE_FALL_SPEED * 2.0);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(1);
        state.push_event(GameEvent::Started);
        state.push_event(GameEvent::Paused);
        let drained = state.drain_events();
        assert_eq!(drained.len(), 2);
        assert!(state.events.is_empty());
    }
}
