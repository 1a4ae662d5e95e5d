use rand::{rngs::StdRng, SeedableRng};
use track_grid::{generate_paths, render_ascii, GridSize, Position, TrackGrid, WalkConfig};

// Three tracks drawn into one grid, each running from column 1 to column 28 on
// rows 1, 4 and 10. Paths may cross; a later path overwrites the tiles of an
// earlier one where they meet.

fn main() {
    env_logger::init();
    let size = GridSize::new(15, 30);
    let mut grid = TrackGrid::from_size(size);
    let routes = [1, 4, 10].map(|row| (Position::new(row, 1), Position::new(row, 28)));
    let mut rng = StdRng::seed_from_u64(2024);
    let walks = generate_paths(&mut grid, &routes, size, &WalkConfig::new(4), &mut rng).unwrap();
    for ((start, end), walk) in routes.iter().zip(&walks) {
        println!("{} -> {}: {:?}", start, end, walk.status);
    }
    print!("{}", render_ascii(&grid));
}
