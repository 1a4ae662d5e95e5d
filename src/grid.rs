use core::fmt;

use crate::direction::{GridSize, Position, Turn};
use crate::walker::{interior_turns, Walk};

/// Tile type of a single grid cell, as consumed by a track renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellCode {
    #[default]
    Empty = 0,
    Straight = 1,
    LeftTurn = 2,
    RightTurn = 3,
}

impl CellCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<Turn> for CellCode {
    fn from(turn: Turn) -> CellCode {
        match turn {
            Turn::Left => CellCode::LeftTurn,
            Turn::Straight => CellCode::Straight,
            Turn::Right => CellCode::RightTurn,
        }
    }
}

impl TryFrom<u8> for CellCode {
    type Error = u8;
    fn try_from(value: u8) -> Result<CellCode, u8> {
        match value {
            0 => Ok(CellCode::Empty),
            1 => Ok(CellCode::Straight),
            2 => Ok(CellCode::LeftTurn),
            3 => Ok(CellCode::RightTurn),
            other => Err(other),
        }
    }
}

/// Row-major grid of [CellCode]s. Generation only ever writes the cells a path covers, so
/// several paths can be drawn into the same grid one after another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackGrid {
    size: GridSize,
    cells: Vec<CellCode>,
}

impl Default for TrackGrid {
    fn default() -> TrackGrid {
        TrackGrid::from_size(GridSize::default())
    }
}

impl TrackGrid {
    pub fn new(rows: usize, cols: usize) -> TrackGrid {
        TrackGrid::from_size(GridSize::new(rows, cols))
    }
    /// An empty grid of the given size.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows [usize], the same way allocating an oversized [Vec]
    /// does.
    pub fn from_size(size: GridSize) -> TrackGrid {
        let area = size.area().unwrap_or(usize::MAX);
        TrackGrid {
            size,
            cells: vec![CellCode::Empty; area],
        }
    }
    pub fn size(&self) -> GridSize {
        self.size
    }
    fn ix(&self, pos: Position) -> Option<usize> {
        self.size
            .contains(pos)
            .then(|| pos.row as usize * self.size.cols + pos.col as usize)
    }
    pub fn get(&self, pos: Position) -> Option<CellCode> {
        self.ix(pos).map(|ix| self.cells[ix])
    }
    /// Writes `code` at `pos`. Returns `false` and leaves the grid unchanged if `pos` is
    /// outside the grid.
    pub fn set(&mut self, pos: Position, code: CellCode) -> bool {
        match self.ix(pos) {
            Some(ix) => {
                self.cells[ix] = code;
                true
            }
            None => false,
        }
    }
    pub fn rows(&self) -> impl Iterator<Item = &[CellCode]> + '_ {
        self.cells.chunks(self.size.cols.max(1))
    }
    pub fn count(&self, code: CellCode) -> usize {
        self.cells.iter().filter(|c| **c == code).count()
    }
    pub fn clear(&mut self) {
        self.cells.fill(CellCode::Empty);
    }
}

/// Writes the tiles for the path of `walk` into `grid`. The start and end cell are always
/// [CellCode::Straight]; every other cell gets the tile matching the turn taken there.
/// A path of a single cell only marks that cell. The final cell of a stuck walk is not the
/// end and has no outgoing step, so it is left as it was.
pub fn rasterize<'a>(grid: &'a mut TrackGrid, walk: &Walk) -> &'a mut TrackGrid {
    let Some(&start) = walk.path.first() else {
        return grid;
    };
    grid.set(start, CellCode::Straight);
    for (pos, turn) in interior_turns(&walk.path) {
        grid.set(pos, turn.into());
    }
    if walk.is_reached() && walk.len() >= 2 {
        if let Some(&end) = walk.path.last() {
            grid.set(end, CellCode::Straight);
        }
    }
    grid
}

/// Framed dump of the grid where empty cells show as `.` and track cells as `X`.
pub fn render_ascii(grid: &TrackGrid) -> String {
    grid.to_string()
}

impl fmt::Display for TrackGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let border = "-".repeat(self.size.cols * 2 + 3);
        writeln!(f, "{border}")?;
        if self.size.cols > 0 {
            for row in self.rows() {
                write!(f, "| ")?;
                for cell in row {
                    let c = if *cell == CellCode::Empty { '.' } else { 'X' };
                    write!(f, "{c} ")?;
                }
                writeln!(f, "|")?;
            }
        }
        writeln!(f, "{border}")
    }
}
