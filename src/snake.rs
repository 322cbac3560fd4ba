use std::collections::VecDeque;

use log::debug;

use crate::cell::{Cell, Direction, direction_change_is_valid};
use crate::config::{GameConfig, RESET_BODY_LEN};

/// Read-only view of the playing field consulted on every step.
pub trait Terrain {
    fn in_bounds(&self, cell: Cell) -> bool;

    /// Returns true when the cell holds a wall.
    fn is_blocked(&self, cell: Cell) -> bool;
}

/// Adapts a plain occupancy predicate and a grid size into a [`Terrain`].
#[derive(Debug, Clone, Copy)]
pub struct Walls<F> {
    pub size: u16,
    pub blocked: F,
}

impl<F: Fn(Cell) -> bool> Terrain for Walls<F> {
    fn in_bounds(&self, cell: Cell) -> bool {
        cell.is_within(self.size)
    }

    fn is_blocked(&self, cell: Cell) -> bool {
        (self.blocked)(cell)
    }
}

/// Why the snake died.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathCause {
    OutOfBounds,
    Blocked,
    SelfCollision,
}

/// Result of one simulation step.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepStatus {
    Alive,
    Dead(DeathCause),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct StepOutcome {
    pub status: StepStatus,
    pub ate_fruit: bool,
}

impl StepOutcome {
    fn dead(cause: DeathCause) -> Self {
        Self {
            status: StepStatus::Dead(cause),
            ate_fruit: false,
        }
    }

    #[must_use]
    pub fn is_dead(self) -> bool {
        matches!(self.status, StepStatus::Dead(_))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum EngineState {
    Running,
    Dead(DeathCause),
}

/// Snake simulation advancing one cell per step.
#[derive(Debug, Clone)]
pub struct SnakeEngine {
    body: VecDeque<Cell>,
    direction: Direction,
    pending_direction: Direction,
    max_len: usize,
    base_len: usize,
    growth_cap: usize,
    state: EngineState,
}

impl SnakeEngine {
    /// Creates a running snake centered on a grid of `grid_size`.
    #[must_use]
    pub fn new(grid_size: u16, base_len: usize, growth_cap: usize) -> Self {
        let mut snake = Self {
            body: VecDeque::with_capacity(growth_cap + 1),
            direction: Direction::Right,
            pending_direction: Direction::Right,
            max_len: base_len,
            base_len,
            growth_cap,
            state: EngineState::Running,
        };
        snake.reset(grid_size);
        snake
    }

    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.initial_size, config.base_len, config.growth_cap)
    }

    /// Places a three-cell horizontal body through the grid center, heading
    /// right, and brings the engine back to running.
    pub fn reset(&mut self, grid_size: u16) {
        let center = Cell::center(grid_size);
        self.body.clear();
        self.body
            .extend((0..RESET_BODY_LEN as i32).map(|i| center.offset(-i, 0)));
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.max_len = self.base_len;
        self.state = EngineState::Running;
    }

    /// Queues `direction` for the next step. Reversals are dropped at commit
    /// time, so only the latest call before a step matters.
    pub fn set_direction(&mut self, direction: Direction) {
        self.pending_direction = direction;
    }

    /// Advances the snake by exactly one cell.
    ///
    /// A dead snake stays where it is until [`Self::reset`].
    pub fn step<T: Terrain + ?Sized>(&mut self, terrain: &T, fruit: Option<Cell>) -> StepOutcome {
        if let EngineState::Dead(cause) = self.state {
            return StepOutcome::dead(cause);
        }

        if direction_change_is_valid(self.direction, self.pending_direction) {
            self.direction = self.pending_direction;
        } else {
            debug!(
                "ignoring reversal from {:?} to {:?}",
                self.direction, self.pending_direction
            );
        }

        let next = self.head().step(self.direction);

        if let Some(cause) = self.collision_at(terrain, next) {
            debug!("snake died at ({}, {}): {cause:?}", next.x, next.z);
            self.state = EngineState::Dead(cause);
            return StepOutcome::dead(cause);
        }

        let ate_fruit = fruit == Some(next);
        if ate_fruit {
            self.max_len = (self.max_len + 1).min(self.growth_cap);
        }

        self.body.push_front(next);
        while self.body.len() > self.max_len {
            let _ = self.body.pop_back();
        }

        StepOutcome {
            status: StepStatus::Alive,
            ate_fruit,
        }
    }

    // The current tail never counts as a collision, including on a step that
    // eats fruit and therefore keeps the tail in place.
    fn collision_at<T: Terrain + ?Sized>(&self, terrain: &T, next: Cell) -> Option<DeathCause> {
        if !terrain.in_bounds(next) {
            return Some(DeathCause::OutOfBounds);
        }
        if terrain.is_blocked(next) {
            return Some(DeathCause::Blocked);
        }

        let without_tail = self.body.len().saturating_sub(1);
        if self.body.iter().take(without_tail).any(|segment| *segment == next) {
            return Some(DeathCause::SelfCollision);
        }

        None
    }

    /// Returns the current head cell.
    #[must_use]
    pub fn head(&self) -> Cell {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Iterates over body cells from head to tail.
    pub fn body(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    /// Returns an owned, ordered copy of the body.
    #[must_use]
    pub fn body_snapshot(&self) -> Vec<Cell> {
        self.body.iter().copied().collect()
    }

    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state == EngineState::Running
    }

    #[must_use]
    pub fn death_cause(&self) -> Option<DeathCause> {
        match self.state {
            EngineState::Running => None,
            EngineState::Dead(cause) => Some(cause),
        }
    }
}
