//! Movement engine: grid state, turn handling, the fixed-interval step,
//! collision checks, and food placement. No rendering or input here; the
//! scene in `main.rs` projects this state onto the screen.

use log::error;
use rand::Rng;
use thiserror::Error;

/// Side length of one grid cell in pixels. Only the presentation layer
/// cares about pixels; everything in here works in cell coordinates.
pub const CELL_SIZE: i16 = 20;

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Grid width in cells, including the one-cell wall border.
    pub grid_width: i16,
    /// Grid height in cells, including the one-cell wall border.
    pub grid_height: i16,
    pub initial_length: usize,
    pub initial_interval_ms: u64,
    pub food_reward: u32,
    /// Interval reduction per food eaten.
    pub speed_up_ms: u64,
    /// The interval never drops below this.
    pub min_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        // 800x600 window at 20px cells.
        Config {
            grid_width: 40,
            grid_height: 30,
            initial_length: 5,
            initial_interval_ms: 150,
            food_reward: 10,
            speed_up_ms: 2,
            min_interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub x: i16,
    pub y: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i16, i16) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    GameOver,
}

/// What a committed step did, for the presentation layer to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    Ate { score: u32, food: Pos },
    Died { score: u32 },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no free cell for food after {0} attempts")]
    GridExhausted(u32),
}

pub struct Engine {
    config: Config,
    /// Body cells, head first, tail last.
    body: Vec<Pos>,
    heading: Direction,
    /// Buffered turn request, committed at the start of the next step.
    /// A single value: later requests overwrite earlier ones.
    pending: Direction,
    food: Pos,
    score: u32,
    state: GameState,
    interval_ms: u64,
    last_step_ms: u64,
    rng: rand::rngs::ThreadRng,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self, EngineError> {
        let head = Pos {
            x: config.grid_width / 2,
            y: config.grid_height / 2,
        };
        let body = (0..config.initial_length as i16)
            .map(|i| Pos {
                x: head.x - i,
                y: head.y,
            })
            .collect();

        let mut engine = Engine {
            config,
            body,
            heading: Direction::Right,
            pending: Direction::Right,
            food: Pos { x: 0, y: 0 },
            score: 0,
            state: GameState::Running,
            interval_ms: config.initial_interval_ms,
            last_step_ms: 0,
            rng: rand::thread_rng(),
        };
        engine.food = engine.spawn_food()?;
        Ok(engine)
    }

    pub fn segments(&self) -> &[Pos] {
        &self.body
    }

    pub fn food(&self) -> Pos {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Buffer a turn for the next step. A request that would reverse the
    /// *current* heading is ignored, so no sequence of inputs inside one
    /// interval can drive the head back into the neck.
    pub fn request_turn(&mut self, direction: Direction) {
        if self.state == GameState::GameOver {
            return;
        }
        if direction != self.heading.opposite() {
            self.pending = direction;
        }
    }

    /// Advance the simulation. `now_ms` is monotonic time since start; a
    /// step commits once per elapsed interval, otherwise this returns
    /// `Ok(None)`. After game over every call is a no-op.
    pub fn tick(&mut self, now_ms: u64) -> Result<Option<Step>, EngineError> {
        if self.state == GameState::GameOver {
            return Ok(None);
        }
        if now_ms < self.last_step_ms + self.interval_ms {
            return Ok(None);
        }
        self.last_step_ms = now_ms;
        self.heading = self.pending;

        let (dx, dy) = self.heading.delta();
        let head = self.body[0];
        let new_head = Pos {
            x: head.x + dx,
            y: head.y + dy,
        };

        // Wall first, then self, then food.
        if self.hits_wall(new_head) || self.hits_body(new_head) {
            self.state = GameState::GameOver;
            return Ok(Some(Step::Died { score: self.score }));
        }

        self.body.insert(0, new_head);
        if new_head == self.food {
            // Tail stays put: the snake grows by one.
            self.score += self.config.food_reward;
            self.food = self.spawn_food()?;
            self.interval_ms = self
                .interval_ms
                .saturating_sub(self.config.speed_up_ms)
                .max(self.config.min_interval_ms);
            return Ok(Some(Step::Ate {
                score: self.score,
                food: self.food,
            }));
        }
        self.body.pop();
        Ok(Some(Step::Moved))
    }

    fn hits_wall(&self, pos: Pos) -> bool {
        pos.x <= 0
            || pos.x >= self.config.grid_width - 1
            || pos.y <= 0
            || pos.y >= self.config.grid_height - 1
    }

    /// The tail cell is excluded: it vacates this step. When the snake is
    /// about to grow instead, the target cell is the food cell, which is
    /// never on the body, so the exclusion cannot mask a real collision.
    fn hits_body(&self, pos: Pos) -> bool {
        self.body[..self.body.len() - 1].contains(&pos)
    }

    /// Rejection-sample a free interior cell. The retry bound is far beyond
    /// anything reachable; hitting it means the occupancy invariant broke.
    fn spawn_food(&mut self) -> Result<Pos, EngineError> {
        let max_attempts = self.config.grid_width as u32 * self.config.grid_height as u32 * 10;
        for _ in 0..max_attempts {
            let pos = Pos {
                x: self.rng.gen_range(1..self.config.grid_width - 1),
                y: self.rng.gen_range(1..self.config.grid_height - 1),
            };
            if !self.body.contains(&pos) {
                return Ok(pos);
            }
        }
        error!("food placement failed after {max_attempts} attempts, grid exhausted");
        Err(EngineError::GridExhausted(max_attempts))
    }
}
