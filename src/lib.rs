//! # track_grid
//!
//! Procedural track layouts on a grid. A constrained random walk connects a start cell to
//! an end cell, going straight for a minimum number of cells after every turn, and the
//! resulting path is rasterized into a grid of tile codes
//! ([Empty](CellCode::Empty), [Straight](CellCode::Straight),
//! [LeftTurn](CellCode::LeftTurn), [RightTurn](CellCode::RightTurn)) that a tile-based
//! renderer can place track pieces from.
//!
//! All randomness comes from a caller-supplied [rand::Rng], so a seeded generator
//! reproduces the same layout.
pub mod direction;
pub mod error;
pub mod grid;
pub mod walker;

pub use direction::{turn_sign, Direction, GridSize, Position, Turn};
pub use error::GenerationError;
pub use grid::{rasterize, render_ascii, CellCode, TrackGrid};
pub use walker::{walk, Path, Walk, WalkConfig, WalkStatus};

use log::info;
use rand::Rng;

/// Walks from `start` to `end` and draws the result into `grid`, leaving every other cell
/// untouched. The walk is confined to `size`, which must fit within the grid. An endpoint
/// outside `size`, or a `size` larger than the grid, fails with
/// [GenerationError::OutOfBounds] and the grid is not modified. In the second case the
/// error names the far corner of `size` and the grid's own size.
///
/// A walk that gets stuck is still drawn and returned with [WalkStatus::Stuck]; it is up to
/// the caller to retry with another seed or accept the partial track.
pub fn generate_path_grid<R: Rng + ?Sized>(
    grid: &mut TrackGrid,
    start: Position,
    end: Position,
    size: GridSize,
    config: &WalkConfig,
    rng: &mut R,
) -> Result<Walk, GenerationError> {
    if !size.fits_within(grid.size()) {
        let corner = |n: usize| i32::try_from(n.saturating_sub(1)).unwrap_or(i32::MAX);
        return Err(GenerationError::OutOfBounds {
            position: Position::new(corner(size.rows), corner(size.cols)),
            size: grid.size(),
        });
    }
    let walk = walk(size, start, end, config, rng)?;
    rasterize(grid, &walk);
    Ok(walk)
}

/// Draws one path per `(start, end)` route into the same grid, in order. Later paths
/// overwrite the cells they share with earlier ones. Stops at the first route that fails
/// [generate_path_grid]; routes drawn before it stay in the grid.
pub fn generate_paths<R: Rng + ?Sized>(
    grid: &mut TrackGrid,
    routes: &[(Position, Position)],
    size: GridSize,
    config: &WalkConfig,
    rng: &mut R,
) -> Result<Vec<Walk>, GenerationError> {
    routes
        .iter()
        .map(|&(start, end)| {
            let walk = generate_path_grid(grid, start, end, size, config, rng)?;
            info!(
                "Route {} -> {}: {:?} after {} cells",
                start,
                end,
                walk.status,
                walk.len()
            );
            Ok(walk)
        })
        .collect()
}
