use std::time::Duration;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cell::{Cell, Direction};
use crate::config::{
    GameConfig, POINTS_PER_CLEARED_TILE, POINTS_PER_FRUIT, POINTS_PER_MATCHED_TILE,
    TILE_FADE_FRAMES,
};
use crate::fruit::spawn_position;
use crate::grid::{RemovedTile, Resize, TileGrid};
use crate::input::GameInput;
use crate::snake::{DeathCause, SnakeEngine, StepStatus};
use crate::timestep::StepClock;

/// Which interaction the directional input drives.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PlayMode {
    /// Cursor, select and swap tiles to clear matches.
    Clear,
    /// Steer the snake; tiles are walls.
    Snake,
}

/// What the grow/shrink command does next.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResizeMode {
    Grow,
    Shrink,
}

/// A removed tile kept around for a few frames so it can be drawn fading.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FadingTile {
    pub tile: RemovedTile,
    pub frames_left: u8,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub grid: TileGrid,
    pub snake: SnakeEngine,
    pub fruit: Option<Cell>,
    pub score: u32,
    pub cursor: Cell,
    pub selected: Option<Cell>,
    pub fading: Vec<FadingTile>,
    pub message: Option<String>,
    pub last_death: Option<DeathCause>,
    play_mode: PlayMode,
    resize_mode: ResizeMode,
    clock: StepClock,
    config: GameConfig,
    rng: StdRng,
}

impl GameState {
    /// Creates a state seeded from system entropy.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible sessions.
    #[must_use]
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let grid = TileGrid::from_config(&config);
        let snake = SnakeEngine::from_config(&config);
        let clock = StepClock::new(config.step_interval());

        let mut state = Self {
            cursor: Cell::center(grid.size()),
            grid,
            snake,
            fruit: None,
            score: 0,
            selected: None,
            fading: Vec::new(),
            message: None,
            last_death: None,
            play_mode: PlayMode::Clear,
            resize_mode: ResizeMode::Grow,
            clock,
            config,
            rng,
        };
        state.reset();
        state
    }

    /// Clears score and tiles, reseeds the wall field and returns to clear mode.
    pub fn reset(&mut self) {
        self.score = 0;
        self.grid.reset();
        self.fading.clear();
        let seeded =
            self.grid
                .seed_tiles(&mut self.rng, self.config.fill_ratio, self.config.palette_size);

        self.cursor = Cell::center(self.grid.size());
        self.selected = None;
        self.snake.reset(self.grid.size());
        self.fruit = None;
        self.clock.reset();
        self.set_play_mode(PlayMode::Clear);

        info!(
            "game reset: {0}x{0} grid with {seeded} tiles",
            self.grid.size()
        );
    }

    /// Applies one external input event. `Quit` and `ToggleHelp` belong to
    /// the front end and are ignored here.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => self.handle_direction(direction),
            GameInput::Action => self.handle_action(),
            GameInput::PlaceTile => self.place_tile_at_cursor(),
            GameInput::GrowOrShrink => self.grow_or_shrink(),
            GameInput::ToggleResizeMode => self.set_resize_mode(match self.resize_mode {
                ResizeMode::Grow => ResizeMode::Shrink,
                ResizeMode::Shrink => ResizeMode::Grow,
            }),
            GameInput::TogglePlayMode => self.set_play_mode(match self.play_mode {
                PlayMode::Clear => PlayMode::Snake,
                PlayMode::Snake => PlayMode::Clear,
            }),
            GameInput::ClearAll => self.clear_all(),
            GameInput::Reset => self.reset(),
            GameInput::ToggleHelp | GameInput::Quit => {}
        }
    }

    pub fn set_play_mode(&mut self, mode: PlayMode) {
        self.play_mode = mode;
        match mode {
            PlayMode::Snake => {
                self.selected = None;
                self.clock.reset();
                if self.fruit.is_none() {
                    self.respawn_fruit();
                }
                self.flash("Snake mode: tiles are walls. Eat fruit!");
            }
            PlayMode::Clear => {
                self.fruit = None;
                self.flash("Clear mode: select and swap to clear 3+ matches.");
            }
        }
        info!("play mode set to {mode:?}");
    }

    pub fn set_resize_mode(&mut self, mode: ResizeMode) {
        self.resize_mode = mode;
    }

    /// Steers the snake in snake mode, moves the cursor in clear mode.
    pub fn handle_direction(&mut self, direction: Direction) {
        match self.play_mode {
            PlayMode::Snake => self.snake.set_direction(direction),
            PlayMode::Clear => {
                self.cursor = self.cursor.step(direction).clamped(self.grid.size());
            }
        }
    }

    /// Selects the tile under the cursor, or swaps/moves the selection with
    /// the cursor cell. Reverts when the swap forms no match.
    pub fn handle_action(&mut self) {
        if self.play_mode != PlayMode::Clear {
            return;
        }

        let here = self.cursor;
        let Some(selected) = self.selected else {
            if self.grid.has_tile(here) {
                self.selected = Some(here);
                self.flash("Selected. Move to a neighbour and press again.");
            } else {
                self.flash("Select a tile first (fill empty cells with Z).");
            }
            return;
        };

        if !selected.is_adjacent(here) {
            if self.grid.has_tile(here) {
                self.selected = Some(here);
                self.flash("Selection changed. Swap/move must be adjacent.");
            } else {
                self.flash("Swap/move must be adjacent.");
            }
            return;
        }

        self.selected = None;
        let outcome = match self.grid.swap_or_move(selected, here) {
            Ok(outcome) => outcome,
            Err(error) => {
                self.flash(format!("Invalid swap/move: {error}"));
                return;
            }
        };

        let cleared = self.grid.find_and_clear_matches();
        if cleared > 0 {
            self.score_matches(cleared);
            return;
        }

        match outcome.revert(&mut self.grid) {
            Ok(()) => self.flash("No match formed. Move reverted."),
            Err(error) => self.flash(format!("Revert failed: {error}")),
        }
    }

    /// Drops a random-colored tile on the empty cell under the cursor.
    pub fn place_tile_at_cursor(&mut self) {
        if self.play_mode != PlayMode::Clear {
            return;
        }

        let color_index = self.rng.gen_range(0..self.config.palette_size.max(1));
        if let Err(error) = self.grid.place_tile(self.cursor, color_index) {
            self.flash(error.to_string());
            return;
        }

        let cleared = self.grid.find_and_clear_matches();
        if cleared > 0 {
            self.score_matches(cleared);
        } else {
            self.flash("Placed a tile.");
        }
    }

    pub fn grow_or_shrink(&mut self) {
        match self.resize_mode {
            ResizeMode::Grow => self.grow_grid(),
            ResizeMode::Shrink => self.shrink_grid(),
        }
    }

    pub fn grow_grid(&mut self) {
        match self.grid.resize(Resize::Grow) {
            Ok(()) => {
                self.after_resize();
                self.flash("Grid grew!");
            }
            Err(error) => self.flash(format!("Grow blocked: {error}")),
        }
    }

    /// Shrinks when the border is clear. In snake mode the head must also be
    /// off the border.
    pub fn shrink_grid(&mut self) {
        if self.play_mode == PlayMode::Snake && self.snake.head().is_on_border(self.grid.size()) {
            self.flash("Move the snake off the border before shrinking.");
            return;
        }

        match self.grid.resize(Resize::Shrink) {
            Ok(()) => {
                self.after_resize();
                self.flash("Grid shrank!");
            }
            Err(error) => self.flash(format!("Shrink blocked: {error}")),
        }
    }

    fn after_resize(&mut self) {
        let size = self.grid.size();
        self.cursor = self.cursor.clamped(size);
        self.selected = None;
        self.fading.clear();
        self.snake.reset(size);
        self.clock.reset();
        if self.play_mode == PlayMode::Snake {
            self.respawn_fruit();
        }
    }

    /// Removes every tile at once for a small reward.
    pub fn clear_all(&mut self) {
        let cleared = self.grid.clear_all_tiles();
        self.score += points(cleared, POINTS_PER_CLEARED_TILE);
        self.collect_removals();
        self.flash(format!("Cleared {cleared} tiles"));

        if self.play_mode == PlayMode::Snake {
            self.respawn_fruit();
        }
    }

    /// Advances wall-clock time by one frame and runs the snake steps due.
    ///
    /// Death resets the whole game. Returns the number of steps taken.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.age_fades();
        if self.play_mode != PlayMode::Snake {
            return 0;
        }

        let steps = self.clock.advance(elapsed);
        for taken in 1..=steps {
            let outcome = self.snake.step(&self.grid, self.fruit);

            if let StepStatus::Dead(cause) = outcome.status {
                info!("snake died ({cause:?}) with score {}", self.score);
                self.last_death = Some(cause);
                self.reset();
                self.flash(death_message(cause));
                return taken;
            }

            if outcome.ate_fruit {
                self.score += POINTS_PER_FRUIT;
                self.respawn_fruit();
            }
        }

        steps
    }

    #[must_use]
    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    #[must_use]
    pub fn resize_mode(&self) -> ResizeMode {
        self.resize_mode
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn respawn_fruit(&mut self) {
        self.fruit = spawn_position(&mut self.rng, &self.grid, &self.snake);
    }

    fn score_matches(&mut self, cleared: usize) {
        self.score += points(cleared, POINTS_PER_MATCHED_TILE);
        self.collect_removals();
        self.flash(format!("Match cleared: {cleared} tiles"));
    }

    fn collect_removals(&mut self) {
        self.fading
            .extend(self.grid.drain_removals().into_iter().map(|tile| FadingTile {
                tile,
                frames_left: TILE_FADE_FRAMES,
            }));
    }

    fn age_fades(&mut self) {
        self.collect_removals();
        for fading in &mut self.fading {
            fading.frames_left = fading.frames_left.saturating_sub(1);
        }
        self.fading.retain(|fading| fading.frames_left > 0);
    }

    fn flash(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }
}

fn points(tiles: usize, per_tile: u32) -> u32 {
    u32::try_from(tiles)
        .unwrap_or(u32::MAX)
        .saturating_mul(per_tile)
}

fn death_message(cause: DeathCause) -> &'static str {
    match cause {
        DeathCause::OutOfBounds => "The snake left the grid. Resetting…",
        DeathCause::Blocked => "The snake hit a tile. Resetting…",
        DeathCause::SelfCollision => "The snake bit itself. Resetting…",
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{GameState, PlayMode, ResizeMode};
    use crate::cell::{Cell, Direction};
    use crate::config::{GameConfig, POINTS_PER_FRUIT, TILE_FADE_FRAMES};
    use crate::input::GameInput;
    use crate::snake::DeathCause;

    fn empty_state() -> GameState {
        let config = GameConfig {
            fill_ratio: 0.0,
            ..GameConfig::default()
        };
        GameState::new_with_seed(config, 1)
    }

    #[test]
    fn reset_seeds_walls_and_starts_in_clear_mode() {
        let state = GameState::new_with_seed(GameConfig::default(), 5);

        assert_eq!(state.play_mode(), PlayMode::Clear);
        assert_eq!(state.grid.size(), 9);
        assert_eq!(state.grid.tile_count(), 60);
        assert_eq!(state.cursor, Cell::new(4, 4));
        assert_eq!(state.fruit, None);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn cursor_is_clamped_to_grid() {
        let mut state = empty_state();

        for _ in 0..20 {
            state.apply_input(GameInput::Direction(Direction::Left));
        }

        assert_eq!(state.cursor, Cell::new(0, 4));
    }

    #[test]
    fn swap_that_forms_match_scores_and_clears() {
        let mut state = empty_state();
        for (x, color) in [(0, 1), (1, 1), (2, 2), (3, 1)] {
            state
                .grid
                .place_tile(Cell::new(x, 0), color)
                .expect("placement");
        }

        state.cursor = Cell::new(2, 0);
        state.handle_action();
        assert_eq!(state.selected, Some(Cell::new(2, 0)));

        state.cursor = Cell::new(3, 0);
        state.handle_action();

        assert_eq!(state.score, 30);
        assert_eq!(state.grid.tile_count(), 1);
        assert_eq!(state.grid.color(Cell::new(3, 0)), Some(2));
        assert_eq!(state.selected, None);
        assert_eq!(state.fading.len(), 3);
    }

    #[test]
    fn swap_without_match_is_reverted() {
        let mut state = empty_state();
        state.grid.place_tile(Cell::new(4, 4), 0).expect("placement");
        state.grid.place_tile(Cell::new(5, 4), 1).expect("placement");

        state.cursor = Cell::new(4, 4);
        state.handle_action();
        state.cursor = Cell::new(5, 4);
        state.handle_action();

        assert_eq!(state.grid.color(Cell::new(4, 4)), Some(0));
        assert_eq!(state.grid.color(Cell::new(5, 4)), Some(1));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn move_into_empty_without_match_is_reverted() {
        let mut state = empty_state();
        state.grid.place_tile(Cell::new(4, 4), 2).expect("placement");

        state.cursor = Cell::new(4, 4);
        state.handle_action();
        state.cursor = Cell::new(4, 5);
        state.handle_action();

        assert_eq!(state.grid.color(Cell::new(4, 4)), Some(2));
        assert!(!state.grid.has_tile(Cell::new(4, 5)));
    }

    #[test]
    fn selecting_an_empty_cell_does_nothing() {
        let mut state = empty_state();

        state.handle_action();

        assert_eq!(state.selected, None);
        assert!(state.message.is_some());
    }

    #[test]
    fn placing_a_tile_fills_empty_cursor_cell() {
        let mut state = empty_state();

        state.apply_input(GameInput::PlaceTile);
        assert!(state.grid.has_tile(state.cursor));

        state.apply_input(GameInput::PlaceTile);
        assert_eq!(state.grid.tile_count(), 1);
    }

    #[test]
    fn resize_follows_resize_mode() {
        let mut state = empty_state();

        state.apply_input(GameInput::GrowOrShrink);
        assert_eq!(state.grid.size(), 11);

        state.apply_input(GameInput::ToggleResizeMode);
        assert_eq!(state.resize_mode(), ResizeMode::Shrink);
        state.apply_input(GameInput::GrowOrShrink);
        state.apply_input(GameInput::GrowOrShrink);
        assert_eq!(state.grid.size(), 7);
    }

    #[test]
    fn snake_mode_spawns_fruit_and_steps_on_clock() {
        let mut state = empty_state();

        state.apply_input(GameInput::TogglePlayMode);
        assert_eq!(state.play_mode(), PlayMode::Snake);
        assert!(state.fruit.is_some());

        let steps = state.advance(Duration::from_millis(150));
        assert_eq!(steps, 1);
        assert_eq!(state.snake.head(), Cell::new(5, 4));
    }

    #[test]
    fn eating_fruit_scores_and_respawns() {
        let mut state = empty_state();
        state.set_play_mode(PlayMode::Snake);
        state.fruit = Some(Cell::new(5, 4));

        state.advance(Duration::from_millis(150));

        assert_eq!(state.score, POINTS_PER_FRUIT);
        assert_eq!(state.snake.max_len(), 7);
        assert!(state.fruit.is_some());
        assert_ne!(state.fruit, Some(Cell::new(5, 4)));
    }

    #[test]
    fn death_resets_into_clear_mode() {
        let mut state = empty_state();
        state.grid.place_tile(Cell::new(5, 4), 0).expect("placement");
        state.set_play_mode(PlayMode::Snake);

        state.advance(Duration::from_millis(150));

        assert_eq!(state.last_death, Some(DeathCause::Blocked));
        assert_eq!(state.play_mode(), PlayMode::Clear);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn shrink_is_refused_with_head_on_border() {
        let mut state = empty_state();
        state.set_play_mode(PlayMode::Snake);
        state.fruit = None;
        for _ in 0..4 {
            state.advance(Duration::from_millis(150));
        }
        assert_eq!(state.snake.head(), Cell::new(8, 4));

        state.shrink_grid();

        assert_eq!(state.grid.size(), 9);
    }

    #[test]
    fn fades_expire_after_fixed_frames() {
        let mut state = empty_state();
        for x in 0..3 {
            state.grid.place_tile(Cell::new(x, 2), 3).expect("placement");
        }
        state.clear_all();
        assert_eq!(state.fading.len(), 3);

        for _ in 0..TILE_FADE_FRAMES {
            state.advance(Duration::from_millis(16));
        }

        assert!(state.fading.is_empty());
    }
}
