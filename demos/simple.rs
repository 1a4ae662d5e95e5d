use rand::{rngs::StdRng, SeedableRng};
use track_grid::{generate_path_grid, GridSize, Position, TrackGrid, WalkConfig};

// Draws a single track across a 15x30 grid, from the left edge to the right edge:
//
// - tile codes are printed row by row (0 empty, 1 straight, 2 left turn, 3 right turn)
// - followed by the framed ASCII view
//
// Pass a seed as the first argument to get a different layout.

fn main() {
    env_logger::init();
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);
    let size = GridSize::new(15, 30);
    let mut grid = TrackGrid::from_size(size);
    let mut rng = StdRng::seed_from_u64(seed);
    let walk = generate_path_grid(
        &mut grid,
        Position::new(7, 1),
        Position::new(7, 28),
        size,
        &WalkConfig::new(4),
        &mut rng,
    )
    .unwrap();
    println!("{:?} after {} cells, {} turns", walk.status, walk.len(), walk.turn_count());
    for row in grid.rows() {
        let codes = row.iter().map(|c| c.code()).collect::<Vec<u8>>();
        println!("{:?}", codes);
    }
    print!("{}", grid);
}
