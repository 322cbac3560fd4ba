use std::fmt;

/// Grid position in logical cell coordinates.
///
/// `x` runs left to right, `z` runs top to bottom. Coordinates are signed so
/// that a step off the edge is representable and rejected by bounds checks.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns true when the cell lies inside a square grid of `size`.
    #[must_use]
    pub fn is_within(self, size: u16) -> bool {
        let size = i32::from(size);
        self.x >= 0 && self.z >= 0 && self.x < size && self.z < size
    }

    /// Returns true when the cell sits on the outer ring of a grid of `size`.
    #[must_use]
    pub fn is_on_border(self, size: u16) -> bool {
        let last = i32::from(size) - 1;
        self.x == 0 || self.z == 0 || self.x == last || self.z == last
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dz) = direction.offset();
        self.offset(dx, dz)
    }

    #[must_use]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
    }

    /// Returns true when `other` shares an edge with this cell.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }

    /// Clamps both axes into `0..size`.
    #[must_use]
    pub fn clamped(self, size: u16) -> Self {
        let last = (i32::from(size) - 1).max(0);
        Self {
            x: self.x.clamp(0, last),
            z: self.z.clamp(0, last),
        }
    }

    /// Maps the cell to a planar offset centered on the grid, one unit per cell.
    #[must_use]
    pub fn world_offset(self, size: u16) -> (f32, f32) {
        let half = (f32::from(size) - 1.0) * 0.5;
        (self.x as f32 - half, self.z as f32 - half)
    }

    /// Returns the center cell of a grid of `size`.
    #[must_use]
    pub fn center(size: u16) -> Self {
        let mid = i32::from(size / 2);
        Self { x: mid, z: mid }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Canonical movement directions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit vector as `(dx, dz)`.
    #[must_use]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}
