use std::io;

use thiserror::Error;

use crate::cell::Cell;

/// Expected, recoverable outcomes of grid mutations.
///
/// These are normal play outcomes: callers retry elsewhere, tell the player,
/// or revert. None of them leave the grid half-modified.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum GridError {
    #[error("cell {0} is outside the grid")]
    InvalidCoordinate(Cell),
    #[error("cell {0} already holds a tile")]
    CellOccupied(Cell),
    #[error("cell {0} holds no tile")]
    CellEmpty(Cell),
    #[error("the border ring must be clear before shrinking")]
    BoundaryNotClear,
    #[error("grid size {size} is already at its limit")]
    LimitReached { size: u16 },
}

/// Problems found while loading or validating a [`crate::config::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be odd, got {value}")]
    EvenSize { field: &'static str, value: u16 },
    #[error("{field} = {value} is outside {min}..={max}")]
    SizeOutOfRange {
        field: &'static str,
        value: u16,
        min: u16,
        max: u16,
    },
    #[error("palette_size must be between 1 and {max}, got {value}")]
    Palette { value: u8, max: u8 },
    #[error("snake lengths are inconsistent: base_len {base_len}, growth_cap {growth_cap}")]
    SnakeLength { base_len: usize, growth_cap: usize },
    #[error("step_interval_secs must be a positive number, got {0}")]
    StepInterval(f64),
    #[error("fill_ratio must be within 0.0..=1.0, got {0}")]
    FillRatio(f64),
}

#[cfg(test)]
mod tests {
    use super::GridError;
    use crate::cell::Cell;

    #[test]
    fn grid_errors_name_the_cell() {
        let message = GridError::CellOccupied(Cell::new(2, 5)).to_string();
        assert_eq!(message, "cell (2, 5) already holds a tile");

        let message = GridError::LimitReached { size: 15 }.to_string();
        assert!(message.contains("15"));
    }
}
