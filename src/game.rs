//! The simulation engine: one board, one snake, one piece of food.
//!
//! [`Game`] only changes through [`Game::start`], [`Game::set_direction`]
//! and [`Game::tick`]. Everything a front end needs to draw comes out of
//! [`Game::snapshot`].

use std::collections::{HashSet, VecDeque};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::error::{Error, Result};
use crate::snake::{Cell, Direction, Snake};

const START_DIRECTION: Direction = Direction::Right;

/// Random draws tried before falling back to listing every free cell.
const FOOD_SAMPLE_ATTEMPTS: usize = 64;

/// Square board measured in pixels, split into `cell_size` squares.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Grid {
    canvas_size: i32,
    cell_size: i32,
}

impl Grid {
    pub fn new(canvas_size: u32, cell_size: u32) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidGrid { reason: reason.to_owned() };

        if cell_size == 0 {
            return Err(invalid("cell_size must be at least 1"));
        }
        if canvas_size % cell_size != 0 {
            return Err(invalid("canvas_size must be a multiple of cell_size"));
        }
        if canvas_size / cell_size < 2 {
            return Err(invalid("the board needs at least 2 cells per side"));
        }

        let canvas_size = i32::try_from(canvas_size).map_err(|_| invalid("canvas_size is too large"))?;
        let cell_size = i32::try_from(cell_size).map_err(|_| invalid("cell_size is too large"))?;

        Ok(Grid { canvas_size, cell_size })
    }

    pub fn canvas_size(&self) -> i32 {
        self.canvas_size
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn cells_per_side(&self) -> i32 {
        self.canvas_size / self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        let side = self.cells_per_side() as usize;
        side * side
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.canvas_size).contains(&cell.x) && (0..self.canvas_size).contains(&cell.y)
    }

    pub fn is_aligned(&self, cell: Cell) -> bool {
        cell.x % self.cell_size == 0 && cell.y % self.cell_size == 0
    }

    /// Row-major walk over every cell of the board.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (side, size) = (self.cells_per_side(), self.cell_size);
        (0..side).flat_map(move |row| (0..side).map(move |col| Cell::new(col * size, row * size)))
    }

    fn random_cell<R: Rng>(&self, rng: &mut R) -> Cell {
        let side = self.cells_per_side();
        Cell::new(rng.gen_range(0..side) * self.cell_size, rng.gen_range(0..side) * self.cell_size)
    }

    fn check_cell(&self, cell: Cell, what: &str) -> Result<()> {
        if !self.contains(cell) || !self.is_aligned(cell) {
            return Err(Error::InvalidState { reason: format!("{what} {cell} is not a cell of the board") });
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    NotStarted,
    Running,
    /// Ended by a collision.
    Over,
    /// Ended because the snake covers every cell and no food fits.
    Won,
}

impl GameStatus {
    pub fn is_running(self) -> bool {
        self == GameStatus::Running
    }

    pub fn is_finished(self) -> bool {
        matches!(self, GameStatus::Over | GameStatus::Won)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

/// What a single [`Game::tick`] did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not running; nothing changed.
    Idle,
    Moved { new_head: Cell, old_tail: Option<Cell> },
    Ate { new_head: Cell, food: Cell },
    Crashed(Collision),
    /// The last free cell was eaten.
    Filled,
}

/// Read-only copy of the game for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Head first.
    pub body: Vec<Cell>,
    /// `None` before the first start and after the board is filled.
    pub food: Option<Cell>,
    pub score: u32,
    pub status: GameStatus,
    pub direction: Direction,
    pub grid: Grid,
}

impl Snapshot {
    pub fn head(&self) -> Cell {
        self.body[0]
    }
}

pub struct Game {
    grid: Grid,
    snake: Snake,
    food: Option<Cell>,
    score: u32,
    status: GameStatus,
    rng: StdRng,
}

impl Game {
    pub fn new(grid: Grid) -> Self {
        Self::with_rng(grid, StdRng::from_entropy())
    }

    /// Same as [`Game::new`] with reproducible food placement.
    pub fn with_seed(grid: Grid, seed: u64) -> Self {
        Self::with_rng(grid, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: Grid, rng: StdRng) -> Self {
        Game {
            grid,
            snake: Snake::new(Cell::ORIGIN, START_DIRECTION),
            food: None,
            score: 0,
            status: GameStatus::NotStarted,
            rng,
        }
    }

    /// Restores a running game from explicit parts. Fails with
    /// [`Error::InvalidState`] if the body is empty, repeats a cell or leaves
    /// the board, or if the food is off the board or on the body.
    pub fn from_parts(grid: Grid, body: Vec<Cell>, direction: Direction, food: Cell, score: u32) -> Result<Self> {
        if body.is_empty() {
            return Err(Error::InvalidState { reason: "body needs at least one cell".to_owned() });
        }

        let mut seen = HashSet::with_capacity(body.len());
        for &cell in &body {
            grid.check_cell(cell, "body cell")?;
            if !seen.insert(cell) {
                return Err(Error::InvalidState { reason: format!("body cell {cell} appears twice") });
            }
        }

        grid.check_cell(food, "food")?;
        if seen.contains(&food) {
            return Err(Error::InvalidState { reason: format!("food {food} is on the body") });
        }

        let mut game = Game::new(grid);
        game.snake = Snake::from_cells(VecDeque::from(body), direction);
        game.food = Some(food);
        game.score = score;
        game.status = GameStatus::Running;
        Ok(game)
    }

    pub fn start(&mut self) {
        self.snake = Snake::new(Cell::ORIGIN, START_DIRECTION);
        self.score = 0;
        self.food = self.place_food();
        self.status = GameStatus::Running;

        info!(food = ?self.food, "game started");
    }

    /// Queues a turn for the next tick. Ignored while the game is not
    /// running and when `direction` reverses the current heading.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if !self.status.is_running() {
            return false;
        }

        let accepted = self.snake.set_direction(direction);
        if !accepted {
            debug!(?direction, heading = ?self.snake.heading(), "reversal ignored");
        }
        accepted
    }

    /// Advances the game by one cell.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.status.is_running() {
            return TickOutcome::Idle;
        }

        let new_head = self.snake.next_head(self.grid.cell_size);

        if !self.grid.contains(new_head) {
            return self.crash(Collision::Wall, new_head);
        }
        if self.snake.contains(&new_head) {
            return self.crash(Collision::Body, new_head);
        }

        let ate = self.food == Some(new_head);
        let old_tail = self.snake.advance(new_head, ate);

        if !ate {
            trace!(head = %new_head, "moved");
            return TickOutcome::Moved { new_head, old_tail };
        }

        self.score += 1;
        self.food = self.place_food();

        match self.food {
            Some(food) => {
                debug!(score = self.score, food = %food, "food eaten");
                TickOutcome::Ate { new_head, food }
            }
            None => {
                self.status = GameStatus::Won;
                info!(score = self.score, "board filled");
                TickOutcome::Filled
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            body: self.snake.body().copied().collect(),
            food: self.food,
            score: self.score,
            status: self.status,
            direction: self.snake.direction(),
            grid: self.grid,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn crash(&mut self, collision: Collision, new_head: Cell) -> TickOutcome {
        self.status = GameStatus::Over;
        info!(?collision, head = %new_head, score = self.score, "game over");
        TickOutcome::Crashed(collision)
    }

    fn place_food(&mut self) -> Option<Cell> {
        if self.snake.len() >= self.grid.cell_count() {
            return None;
        }

        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let candidate = self.grid.random_cell(&mut self.rng);
            if !self.snake.contains(&candidate) {
                return Some(candidate);
            }
        }

        // Crowded board: pick straight from the free cells.
        let free: Vec<Cell> = self.grid.cells().filter(|cell| !self.snake.contains(cell)).collect();
        debug!(free = free.len(), "food sampling missed, choosing from free cells");
        free.choose(&mut self.rng).copied()
    }
}
