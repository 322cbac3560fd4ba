use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};
use rand::Rng;

use crate::cell::Cell;
use crate::config::GameConfig;
use crate::error::GridError;
use crate::snake::Terrain;

/// Shortest run of equal colors that clears.
pub const MATCH_LEN: usize = 3;

/// Colored occupant of a cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Tile {
    pub color_index: u8,
}

/// Removal event handed to the presentation and scoring side.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RemovedTile {
    pub cell: Cell,
    pub color_index: u8,
}

/// What a [`TileGrid::swap_or_move`] call did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SwapOutcome {
    /// Both cells held tiles; their colors were exchanged.
    Swap { a: Cell, b: Cell },
    /// One tile moved into the empty cell.
    Move { from: Cell, to: Cell },
}

impl SwapOutcome {
    /// Undoes the mutation: swaps again, or moves the tile back.
    pub fn revert(self, grid: &mut TileGrid) -> Result<(), GridError> {
        match self {
            Self::Swap { a, b } => grid.swap_or_move(a, b).map(|_| ()),
            Self::Move { from, to } => grid.move_tile(to, from),
        }
    }
}

/// Direction of a [`TileGrid::resize`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Resize {
    Grow,
    Shrink,
}

/// Square, odd-sized cell space holding colored tiles.
#[derive(Debug, Clone)]
pub struct TileGrid {
    size: u16,
    min_size: u16,
    max_size: u16,
    tiles: HashMap<Cell, Tile>,
    removals: Vec<RemovedTile>,
}

impl TileGrid {
    /// Creates an empty grid. Sizes are expected to be validated already
    /// (see [`GameConfig::validate`]).
    #[must_use]
    pub fn new(size: u16, min_size: u16, max_size: u16) -> Self {
        debug_assert!(size % 2 == 1 && (min_size..=max_size).contains(&size));

        Self {
            size,
            min_size,
            max_size,
            tiles: HashMap::new(),
            removals: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.initial_size, config.min_size, config.max_size)
    }

    #[must_use]
    pub fn size(&self) -> u16 {
        self.size
    }

    #[must_use]
    pub fn min_size(&self) -> u16 {
        self.min_size
    }

    #[must_use]
    pub fn max_size(&self) -> u16 {
        self.max_size
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Iterates over occupied cells in no particular order.
    pub fn tiles(&self) -> impl Iterator<Item = (Cell, Tile)> + '_ {
        self.tiles.iter().map(|(cell, tile)| (*cell, *tile))
    }

    #[must_use]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.is_within(self.size)
    }

    /// Maps a cell to a planar coordinate centered on the grid.
    #[must_use]
    pub fn cell_to_world_offset(&self, cell: Cell) -> (f32, f32) {
        cell.world_offset(self.size)
    }

    #[must_use]
    pub fn has_tile(&self, cell: Cell) -> bool {
        self.tiles.contains_key(&cell)
    }

    /// Any tile is a wall for the snake.
    #[must_use]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.has_tile(cell)
    }

    /// Returns the tile color, or `None` for an empty cell.
    #[must_use]
    pub fn color(&self, cell: Cell) -> Option<u8> {
        self.tiles.get(&cell).map(|tile| tile.color_index)
    }

    pub fn place_tile(&mut self, cell: Cell, color_index: u8) -> Result<(), GridError> {
        if !self.in_bounds(cell) {
            return Err(GridError::InvalidCoordinate(cell));
        }
        if self.has_tile(cell) {
            return Err(GridError::CellOccupied(cell));
        }

        self.tiles.insert(cell, Tile { color_index });
        Ok(())
    }

    pub fn set_color(&mut self, cell: Cell, color_index: u8) -> Result<(), GridError> {
        let tile = self
            .tiles
            .get_mut(&cell)
            .ok_or(GridError::CellEmpty(cell))?;
        tile.color_index = color_index;
        Ok(())
    }

    /// Removes the tile at `cell` and queues a removal event for it.
    pub fn remove_tile(&mut self, cell: Cell) -> Result<RemovedTile, GridError> {
        let tile = self.tiles.remove(&cell).ok_or(GridError::CellEmpty(cell))?;
        let removed = RemovedTile {
            cell,
            color_index: tile.color_index,
        };
        self.removals.push(removed);
        Ok(removed)
    }

    /// Hands every queued removal event to the caller.
    pub fn drain_removals(&mut self) -> Vec<RemovedTile> {
        std::mem::take(&mut self.removals)
    }

    /// Relocates a tile into an empty in-bounds cell, keeping its color.
    pub fn move_tile(&mut self, from: Cell, to: Cell) -> Result<(), GridError> {
        if !self.has_tile(from) {
            return Err(GridError::CellEmpty(from));
        }
        if self.has_tile(to) {
            return Err(GridError::CellOccupied(to));
        }
        if !self.in_bounds(to) {
            return Err(GridError::InvalidCoordinate(to));
        }

        if let Some(tile) = self.tiles.remove(&from) {
            self.tiles.insert(to, tile);
        }
        Ok(())
    }

    /// Swaps two tiles' colors, or moves a tile into an empty neighbour.
    ///
    /// Matching is never run here; the caller checks for matches and uses
    /// [`SwapOutcome::revert`] when nothing cleared.
    pub fn swap_or_move(&mut self, a: Cell, b: Cell) -> Result<SwapOutcome, GridError> {
        match (self.color(a), self.color(b)) {
            (Some(color_a), Some(color_b)) => {
                self.set_color(a, color_b)?;
                self.set_color(b, color_a)?;
                Ok(SwapOutcome::Swap { a, b })
            }
            (Some(_), None) => {
                self.move_tile(a, b)?;
                Ok(SwapOutcome::Move { from: a, to: b })
            }
            (None, Some(_)) => {
                self.move_tile(b, a)?;
                Ok(SwapOutcome::Move { from: b, to: a })
            }
            (None, None) => Err(GridError::CellEmpty(a)),
        }
    }

    /// Clears every run of [`MATCH_LEN`] or more equal colors along rows and
    /// columns in one batch. Returns the number of distinct cells cleared.
    pub fn find_and_clear_matches(&mut self) -> usize {
        let size = i32::from(self.size);
        let mut to_clear = HashSet::new();

        for z in 0..size {
            self.collect_runs((0..size).map(|x| Cell::new(x, z)), &mut to_clear);
        }
        for x in 0..size {
            self.collect_runs((0..size).map(|z| Cell::new(x, z)), &mut to_clear);
        }

        let mut cleared: Vec<Cell> = to_clear.into_iter().collect();
        cleared.sort_unstable_by_key(|cell| (cell.z, cell.x));
        for cell in &cleared {
            let _ = self.remove_tile(*cell);
        }

        if !cleared.is_empty() {
            debug!("cleared {} matched tiles", cleared.len());
        }
        cleared.len()
    }

    fn collect_runs(&self, line: impl Iterator<Item = Cell>, to_clear: &mut HashSet<Cell>) {
        let mut run: Vec<Cell> = Vec::new();
        let mut run_color = None;

        for cell in line {
            let color = self.color(cell);
            if color.is_some() && color == run_color {
                run.push(cell);
                continue;
            }

            if run.len() >= MATCH_LEN {
                to_clear.extend(run.iter().copied());
            }
            run.clear();
            run_color = color;
            if color.is_some() {
                run.push(cell);
            }
        }

        if run.len() >= MATCH_LEN {
            to_clear.extend(run);
        }
    }

    /// Returns true when no tile sits on the outer ring.
    #[must_use]
    pub fn border_is_clear(&self) -> bool {
        !self.tiles.keys().any(|cell| cell.is_on_border(self.size))
    }

    /// Grows or shrinks the grid by one ring, remapping every tile.
    ///
    /// Growing shifts tiles by `(+1, +1)` so the new border is empty.
    /// Shrinking requires an empty border and shifts tiles by `(-1, -1)`.
    /// A failed resize leaves the grid untouched.
    pub fn resize(&mut self, resize: Resize) -> Result<(), GridError> {
        let (new_size, shift) = match resize {
            Resize::Grow => {
                if self.size >= self.max_size {
                    return Err(GridError::LimitReached { size: self.size });
                }
                (self.size + 2, 1)
            }
            Resize::Shrink => {
                if self.size <= self.min_size {
                    return Err(GridError::LimitReached { size: self.size });
                }
                if !self.border_is_clear() {
                    return Err(GridError::BoundaryNotClear);
                }
                (self.size - 2, -1)
            }
        };

        let snapshot: Vec<(Cell, Tile)> = self.tiles.drain().collect();
        self.size = new_size;

        for (cell, tile) in snapshot {
            let shifted = cell.offset(shift, shift);
            if let Err(error) = self.place_tile(shifted, tile.color_index) {
                warn!("dropping tile during resize: {error}");
            }
        }

        info!("grid resized ({resize:?}) to {0}x{0}", self.size);
        Ok(())
    }

    /// Drops every tile and pending removal event. The size is kept.
    pub fn reset(&mut self) {
        self.tiles.clear();
        self.removals.clear();
    }

    /// Removes every tile through [`Self::remove_tile`], returning the count.
    pub fn clear_all_tiles(&mut self) -> usize {
        let cells: Vec<Cell> = self.tiles.keys().copied().collect();
        for cell in &cells {
            let _ = self.remove_tile(*cell);
        }
        cells.len()
    }

    /// Fills random empty cells with random colors until `fill_ratio` of the
    /// grid is covered or the attempt budget runs out. Returns tiles placed.
    pub fn seed_tiles<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        fill_ratio: f64,
        palette_size: u8,
    ) -> usize {
        let total = usize::from(self.size) * usize::from(self.size);
        let target = ((total as f64) * fill_ratio.clamp(0.0, 1.0)).floor() as usize;
        let before = self.tiles.len();
        let size = i32::from(self.size);
        let palette_size = palette_size.max(1);

        let mut attempts = 0;
        while self.tiles.len() < target && attempts < target * 20 {
            attempts += 1;
            let cell = Cell::new(rng.gen_range(0..size), rng.gen_range(0..size));
            if self.has_tile(cell) {
                continue;
            }
            let color_index = rng.gen_range(0..palette_size);
            let _ = self.place_tile(cell, color_index);
        }

        self.tiles.len() - before
    }
}

impl Terrain for TileGrid {
    fn in_bounds(&self, cell: Cell) -> bool {
        TileGrid::in_bounds(self, cell)
    }

    fn is_blocked(&self, cell: Cell) -> bool {
        TileGrid::is_blocked(self, cell)
    }
}
