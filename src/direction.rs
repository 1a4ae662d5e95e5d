use core::fmt;
use std::ops::Add;

/// Number of rows and columns of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    pub fn new(rows: usize, cols: usize) -> GridSize {
        GridSize { rows, cols }
    }
    /// Checks whether `pos` lies within `[0, rows) x [0, cols)`.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.rows
            && (pos.col as usize) < self.cols
    }
    /// Number of cells, or [None] if `rows * cols` does not fit in a [usize].
    pub fn area(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }
    /// Checks whether every cell of `self` is also a cell of `other`.
    pub fn fits_within(&self, other: GridSize) -> bool {
        self.rows <= other.rows && self.cols <= other.cols
    }
}

impl Default for GridSize {
    fn default() -> GridSize {
        GridSize::new(20, 20)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A cell on the grid, addressed as (row, column). Coordinates are signed so that
/// a step off the grid edge can be represented and rejected by [GridSize::contains].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Position {
        Position { row, col }
    }
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Position {
        Position::new(row, col)
    }
}

impl Add<Direction> for Position {
    type Output = Position;
    fn add(self, dir: Direction) -> Position {
        let (dr, dc) = dir.delta();
        Position::new(self.row + dr, self.col + dc)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four cardinal directions. The declaration order is the rotation cycle: turning
/// right moves to the next variant, turning left to the previous one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit step as (row delta, column delta).
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }
    pub fn rotate_left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::East => Direction::North,
            Direction::South => Direction::East,
            Direction::West => Direction::South,
        }
    }
    pub fn rotate_right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }
    /// The direction of the unit step from `from` to `to`, or [None] if the two
    /// positions are not 4-neighbours.
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        let delta = (to.row - from.row, to.col - from.col);
        Direction::ALL.into_iter().find(|d| d.delta() == delta)
    }
}

/// Classification of the change of heading at a path cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    Left,
    Straight,
    Right,
}

/// 2D cross product of the incoming and outgoing step, taken as
/// `in.col * out.row - in.row * out.col`. Positive is a right turn, negative a left
/// turn and zero means the heading is unchanged.
pub fn turn_sign(dir_in: Direction, dir_out: Direction) -> i32 {
    let (in_row, in_col) = dir_in.delta();
    let (out_row, out_col) = dir_out.delta();
    in_col * out_row - in_row * out_col
}

impl Turn {
    pub fn classify(dir_in: Direction, dir_out: Direction) -> Turn {
        match turn_sign(dir_in, dir_out) {
            s if s < 0 => Turn::Left,
            0 => Turn::Straight,
            _ => Turn::Right,
        }
    }
}
