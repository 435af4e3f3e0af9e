use super::{
    action::Direction,
    config::GameConfig,
    state::{CollisionType, GameState, Position, SessionPhase, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::time::Duration;
use tracing::{debug, warn};

/// Rejection sampling gives up after this many tries per grid cell and falls
/// back to scanning for free cells.
const SAMPLING_ATTEMPTS_PER_CELL: usize = 4;

/// What a single tick did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is paused, not started or over; nothing changed
    Idle,
    /// Snake moved one cell, length unchanged
    Moved,
    /// Snake ate the food and grew by one segment
    AteFood {
        /// New tick interval when this bite crossed a speed-up threshold
        new_speed: Option<Duration>,
    },
    /// Snake ran into a wall or itself; the session is over
    Collided(CollisionType),
    /// Snake covers every cell, so no food can be placed; the session is over
    BoardFull,
}

/// The game engine that handles all game logic
///
/// The engine keeps no session data of its own: every operation takes the
/// `GameState` it acts on, so ticks can be driven by a timer or by a test.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh session: centred snake heading right, score zero,
    /// initial speed and food on a free cell
    ///
    /// If the starting snake already covers the grid there is nowhere for
    /// food to go, and the session starts out over, like a `BoardFull` tick.
    pub fn initialize(&mut self) -> GameState {
        let center = (self.config.tile_count / 2) as i32;

        let snake = Snake::new(
            Position::new(center, center),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let food = self.spawn_food_avoid_snake(&snake);
        let mut state = GameState::new(
            snake,
            food.unwrap_or(Position::new(0, 0)),
            self.config.tile_count,
            self.config.initial_speed_ms,
        );

        if food.is_none() {
            warn!(tiles = self.config.tile_count, "no free cell for food, session over");
            state.phase = SessionPhase::GameOver;
        }

        state
    }

    /// Queue a turn for the next tick
    ///
    /// A turn straight back onto the committed direction is dropped. The
    /// check is against the committed direction, not the last queued one, so
    /// two quick turns between ticks can still chain into a reversal.
    pub fn set_pending_direction(&self, state: &mut GameState, direction: Direction) -> bool {
        if !state.is_running() || state.direction().is_opposite(direction) {
            return false;
        }
        state.pending_direction = direction;
        true
    }

    /// Flip between running and paused; returns whether the state is paused
    pub fn toggle_pause(&self, state: &mut GameState) -> bool {
        state.phase = match state.phase {
            SessionPhase::Running => SessionPhase::Paused,
            SessionPhase::Paused => SessionPhase::Running,
            other => other,
        };
        state.is_paused()
    }

    /// Execute one tick of the game
    pub fn advance(&mut self, state: &mut GameState) -> TickOutcome {
        if state.phase != SessionPhase::Running {
            return TickOutcome::Idle;
        }

        state.snake.direction = state.pending_direction;
        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        // The tail has not moved yet, so stepping onto it is a collision too.
        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.phase = SessionPhase::GameOver;
            return TickOutcome::Collided(collision_type);
        }

        state.snake.push_head(new_head);

        if new_head != state.food {
            state.snake.pop_tail();
            return TickOutcome::Moved;
        }

        state.score += 1;
        let new_speed = self.speed_up(state);

        match self.spawn_food_avoid_snake(&state.snake) {
            Some(food) => {
                state.food = food;
                TickOutcome::AteFood { new_speed }
            }
            None => {
                state.phase = SessionPhase::GameOver;
                TickOutcome::BoardFull
            }
        }
    }

    /// Shorten the tick interval when the score crosses a threshold
    fn speed_up(&self, state: &mut GameState) -> Option<Duration> {
        let config = &self.config;
        if state.score % config.speedup_every != 0 || state.speed_ms <= config.min_speed_ms {
            return None;
        }

        let speed_ms = state
            .speed_ms
            .saturating_sub(config.speed_step_ms)
            .max(config.min_speed_ms);
        if speed_ms == state.speed_ms {
            return None;
        }

        state.speed_ms = speed_ms;
        debug!(score = state.score, speed_ms = state.speed_ms, "speed up");

        Some(state.tick_interval())
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Spawn food at a random empty position
    ///
    /// Samples uniformly until it hits a free cell, then after a bounded
    /// number of misses picks uniformly among the remaining free cells.
    /// Returns `None` only when the snake covers the whole grid.
    fn spawn_food_avoid_snake(&mut self, snake: &Snake) -> Option<Position> {
        let size = self.config.tile_count;
        let attempts = size * size * SAMPLING_ATTEMPTS_PER_CELL;

        for _ in 0..attempts {
            let x = self.rng.gen_range(0..size) as i32;
            let y = self.rng.gen_range(0..size) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (0..size as i32)
            .flat_map(|y| (0..size as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();
        debug!(free_cells = free.len(), "food sampling fell back to scan");

        free.choose(&mut self.rng).copied()
    }
}
