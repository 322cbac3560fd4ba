use rand::Rng;

use crate::cell::Cell;
use crate::grid::TileGrid;
use crate::snake::SnakeEngine;

/// Picks a random cell that holds no tile and no snake segment.
///
/// Returns `None` when every cell is taken; the caller then shows no fruit.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    grid: &TileGrid,
    snake: &SnakeEngine,
) -> Option<Cell> {
    let size = i32::from(grid.size());
    let mut candidates = Vec::new();

    for z in 0..size {
        for x in 0..size {
            let cell = Cell::new(x, z);
            if !grid.has_tile(cell) && !snake.occupies(cell) {
                candidates.push(cell);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}
