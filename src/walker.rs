//! Constrained random walk from a start cell to an end cell.
//!
//! The walk never revisits a cell and never leaves the grid. After every turn (and at the
//! very start) it is forced to go straight until it has covered
//! [min_straight_before_turn](WalkConfig::min_straight_before_turn) cells in the same
//! direction. Once turning is allowed, the next heading is drawn from
//! {left, straight, right} with weights biased towards going straight and towards the goal.
//! Because there is no backtracking the walk can paint itself into a corner, in which case it
//! ends with [WalkStatus::Stuck] and the partial path.
use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use itertools::Itertools;
use log::{debug, trace, warn};
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;
use smallvec::{smallvec, SmallVec};

use crate::direction::{Direction, GridSize, Position, Turn};
use crate::error::GenerationError;

type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// Cells visited by a walk in visiting order. Set semantics guarantee no cell repeats.
pub type Path = FxIndexSet<Position>;

/// Tunables of the walk. [WalkConfig::default] matches the reference generator: two cells
/// straight before a turn, weights 0.2/0.6/0.2 for left/straight/right and a 0.5 bonus for
/// moves that get closer to the end.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkConfig {
    pub min_straight_before_turn: usize,
    pub turn_weight: f64,
    pub straight_weight: f64,
    pub goal_bonus: f64,
}

impl WalkConfig {
    pub fn new(min_straight_before_turn: usize) -> WalkConfig {
        WalkConfig {
            min_straight_before_turn,
            ..WalkConfig::default()
        }
    }
    /// Checks that every weight is finite and non-negative, and that the largest possible
    /// total of one draw (both turns and going straight, each with the goal bonus) is finite.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let weights = [self.turn_weight, self.straight_weight, self.goal_bonus];
        let max_total = 2.0 * self.turn_weight + self.straight_weight + 3.0 * self.goal_bonus;
        if weights.iter().all(|w| w.is_finite() && *w >= 0.0) && max_total.is_finite() {
            Ok(())
        } else {
            Err(GenerationError::InvalidWeights(WeightedError::InvalidWeight))
        }
    }
}

impl Default for WalkConfig {
    fn default() -> WalkConfig {
        WalkConfig {
            min_straight_before_turn: 2,
            turn_weight: 0.2,
            straight_weight: 0.6,
            goal_bonus: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WalkStatus {
    Reached,
    Stuck,
}

/// Result of [walk]: the visited cells and whether the end was reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Walk {
    pub path: Path,
    pub status: WalkStatus,
}

impl Walk {
    pub fn is_reached(&self) -> bool {
        self.status == WalkStatus::Reached
    }
    pub fn len(&self) -> usize {
        self.path.len()
    }
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
    pub fn positions(&self) -> impl Iterator<Item = &Position> + '_ {
        self.path.iter()
    }
    /// Number of interior cells where the heading changes.
    pub fn turn_count(&self) -> usize {
        interior_turns(&self.path)
            .filter(|(_, turn)| *turn != Turn::Straight)
            .count()
    }
}

/// Classifies every interior cell of `path` by comparing the incoming and outgoing step.
/// The first and last cell have no classification. Cells whose neighbours in the path are
/// not adjacent on the grid are skipped.
pub fn interior_turns(path: &Path) -> impl Iterator<Item = (Position, Turn)> + '_ {
    path.iter().tuple_windows().filter_map(|(&prev, &cur, &next)| {
        let dir_in = Direction::between(prev, cur)?;
        let dir_out = Direction::between(cur, next)?;
        Some((cur, Turn::classify(dir_in, dir_out)))
    })
}

/// Heading at the start of the walk. Goes along the axis with the larger distance to cover;
/// ties go horizontal. When there is no column offset at all the walk starts heading south,
/// even if the end lies to the north or coincides with the start.
pub fn initial_direction(start: Position, end: Position) -> Direction {
    let dr = end.row - start.row;
    let dc = end.col - start.col;
    if dr.abs() > dc.abs() {
        if dr > 0 {
            Direction::South
        } else {
            Direction::North
        }
    } else if dc > 0 {
        Direction::East
    } else if dc < 0 {
        Direction::West
    } else {
        Direction::South
    }
}

fn check_bounds(size: GridSize, position: Position) -> Result<(), GenerationError> {
    if size.contains(position) {
        Ok(())
    } else {
        Err(GenerationError::OutOfBounds { position, size })
    }
}

struct WalkState {
    position: Position,
    direction: Direction,
    straight_run: usize,
}

/// Walks from `start` to `end` inside a grid of the given `size`, drawing every random
/// decision from `rng`. Seeding `rng` makes the result reproducible.
///
/// Fails with [GenerationError::OutOfBounds] before doing anything else if either endpoint
/// is outside the grid, and with [GenerationError::InvalidWeights] if `config` fails
/// [WalkConfig::validate]. Getting stuck is not an error: the partial path is returned with
/// [WalkStatus::Stuck].
pub fn walk<R: Rng + ?Sized>(
    size: GridSize,
    start: Position,
    end: Position,
    config: &WalkConfig,
    rng: &mut R,
) -> Result<Walk, GenerationError> {
    check_bounds(size, start)?;
    check_bounds(size, end)?;
    config.validate()?;

    let mut path = Path::default();
    path.insert(start);
    let mut state = WalkState {
        position: start,
        direction: initial_direction(start, end),
        straight_run: 1,
    };
    debug!(
        "Walking from {} to {} on a {} grid, heading {:?}",
        start, end, size, state.direction
    );

    while state.position != end {
        let candidates = candidates(&state, size, end, config);
        let Some(direction) = choose_unvisited(&state, candidates, &path, size, rng)? else {
            warn!(
                "Walk from {} to {} got stuck at {} after {} cells",
                start,
                end,
                state.position,
                path.len()
            );
            return Ok(Walk {
                path,
                status: WalkStatus::Stuck,
            });
        };
        if direction == state.direction {
            state.straight_run += 1;
        } else {
            state.straight_run = 1;
        }
        state.direction = direction;
        state.position = state.position + direction;
        trace!("Step {:?} to {}", direction, state.position);
        path.insert(state.position);
    }
    debug!("Reached {} in {} cells", end, path.len());
    Ok(Walk {
        path,
        status: WalkStatus::Reached,
    })
}

/// Headings the walk may take next, with their selection weights.
fn candidates(
    state: &WalkState,
    size: GridSize,
    end: Position,
    config: &WalkConfig,
) -> SmallVec<[(Direction, f64); 3]> {
    if state.straight_run < config.min_straight_before_turn {
        return smallvec![(state.direction, 1.0)];
    }
    let dist_to_end = state.position.manhattan_distance(&end);
    let mut weighted: SmallVec<[(Direction, f64); 3]> = smallvec![
        (state.direction.rotate_left(), config.turn_weight),
        (state.direction, config.straight_weight),
        (state.direction.rotate_right(), config.turn_weight),
    ];
    for (dir, weight) in weighted.iter_mut() {
        let next = state.position + *dir;
        if !size.contains(next) {
            *weight = 0.0;
        } else if next.manhattan_distance(&end) < dist_to_end {
            *weight += config.goal_bonus;
        }
    }
    weighted
}

/// Draws candidates by weight until one leads to a free cell, zeroing the weight of every
/// rejected draw. Returns [None] once no weight is left.
fn choose_unvisited<R: Rng + ?Sized>(
    state: &WalkState,
    mut candidates: SmallVec<[(Direction, f64); 3]>,
    path: &Path,
    size: GridSize,
    rng: &mut R,
) -> Result<Option<Direction>, GenerationError> {
    loop {
        let dist = match WeightedIndex::<f64>::new(candidates.iter().map(|(_, w)| *w)) {
            Ok(dist) => dist,
            Err(WeightedError::AllWeightsZero) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let ix = dist.sample(rng);
        let (dir, _) = candidates[ix];
        let next = state.position + dir;
        if size.contains(next) && !path.contains(&next) {
            return Ok(Some(dir));
        }
        candidates[ix].1 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_valid_path(walk: &Walk, size: GridSize, start: Position) {
        assert_eq!(walk.path.first(), Some(&start));
        for p in walk.positions() {
            assert!(size.contains(*p));
        }
        for (a, b) in walk.positions().tuple_windows() {
            assert_eq!(a.manhattan_distance(b), 1);
        }
    }

    #[test]
    fn initial_direction_follows_larger_axis() {
        let o = Position::new(5, 5);
        assert_eq!(initial_direction(o, Position::new(9, 6)), Direction::South);
        assert_eq!(initial_direction(o, Position::new(0, 6)), Direction::North);
        assert_eq!(initial_direction(o, Position::new(6, 9)), Direction::East);
        assert_eq!(initial_direction(o, Position::new(6, 0)), Direction::West);
        // Equal offsets go horizontal
        assert_eq!(initial_direction(o, Position::new(8, 8)), Direction::East);
    }

    /// With no column offset the walk heads south, even when the end is to the north.
    /// Kept as-is to reproduce reference layouts.
    #[test]
    fn initial_direction_zero_column_offset_heads_south() {
        let o = Position::new(5, 5);
        assert_eq!(initial_direction(o, o), Direction::South);
        // |dr| > |dc| still picks the vertical direction toward the end
        assert_eq!(initial_direction(o, Position::new(2, 5)), Direction::North);
        assert_eq!(initial_direction(o, Position::new(8, 5)), Direction::South);
    }

    #[test]
    fn out_of_bounds_endpoints() {
        let size = GridSize::new(15, 30);
        let mut rng = StdRng::seed_from_u64(0);
        let config = WalkConfig::new(4);
        let err = walk(size, Position::new(20, 1), Position::new(7, 28), &config, &mut rng);
        assert_eq!(
            err,
            Err(GenerationError::OutOfBounds {
                position: Position::new(20, 1),
                size
            })
        );
        let err = walk(size, Position::new(7, 1), Position::new(7, 30), &config, &mut rng);
        assert!(matches!(err, Err(GenerationError::OutOfBounds { .. })));
        let err = walk(size, Position::new(-1, 1), Position::new(7, 3), &config, &mut rng);
        assert!(matches!(err, Err(GenerationError::OutOfBounds { .. })));
    }

    /// Only the cells actually walked are stored, however large the grid is.
    #[test]
    fn short_walk_on_huge_grid() {
        let size = GridSize::new(1, usize::MAX);
        let start = Position::new(0, 0);
        let end = Position::new(0, 5);
        let mut rng = StdRng::seed_from_u64(0);
        let walk = walk(size, start, end, &WalkConfig::new(1), &mut rng).unwrap();
        assert!(walk.is_reached());
        assert_eq!(walk.len(), 6);
        assert_valid_path(&walk, size, start);
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let size = GridSize::new(10, 10);
        let start = Position::new(0, 0);
        let end = Position::new(9, 9);
        let invalid = [
            WalkConfig {
                turn_weight: -0.2,
                ..WalkConfig::default()
            },
            WalkConfig {
                goal_bonus: f64::NAN,
                ..WalkConfig::default()
            },
            WalkConfig {
                straight_weight: f64::INFINITY,
                ..WalkConfig::default()
            },
            WalkConfig {
                turn_weight: f64::MAX,
                straight_weight: f64::MAX,
                ..WalkConfig::default()
            },
        ];
        let mut rng = StdRng::seed_from_u64(0);
        for config in invalid {
            assert_eq!(
                walk(size, start, end, &config, &mut rng),
                Err(GenerationError::InvalidWeights(WeightedError::InvalidWeight))
            );
        }
        assert_eq!(WalkConfig::default().validate(), Ok(()));
    }

    /// All weights zero is a valid configuration: the walk can only go straight and gets
    /// stuck at the first point where it is allowed to turn.
    #[test]
    fn zero_weights_get_stuck() {
        let config = WalkConfig {
            min_straight_before_turn: 3,
            turn_weight: 0.0,
            straight_weight: 0.0,
            goal_bonus: 0.0,
        };
        let size = GridSize::new(10, 10);
        let start = Position::new(0, 0);
        let mut rng = StdRng::seed_from_u64(0);
        let walk = walk(size, start, Position::new(0, 9), &config, &mut rng).unwrap();
        assert_eq!(walk.status, WalkStatus::Stuck);
        assert_eq!(walk.len(), 3);
    }

    #[test]
    fn start_equals_end() {
        let size = GridSize::new(5, 5);
        let p = Position::new(2, 2);
        let mut rng = StdRng::seed_from_u64(1);
        let walk = walk(size, p, p, &WalkConfig::default(), &mut rng).unwrap();
        assert!(walk.is_reached());
        assert_eq!(walk.len(), 1);
    }

    /// A straight line with a large minimum run is always reached without turning.
    #[test]
    fn straight_corridor() {
        let size = GridSize::new(1, 10);
        let start = Position::new(0, 0);
        let end = Position::new(0, 9);
        let mut rng = StdRng::seed_from_u64(7);
        let walk = walk(size, start, end, &WalkConfig::new(3), &mut rng).unwrap();
        assert!(walk.is_reached());
        assert_eq!(walk.len(), 10);
        assert_eq!(walk.turn_count(), 0);
        assert_valid_path(&walk, size, start);
    }

    /// The forced straight run hits the grid edge before a turn is allowed.
    #[test]
    fn stuck_in_small_grid() {
        let size = GridSize::new(2, 2);
        let start = Position::new(0, 0);
        let mut rng = StdRng::seed_from_u64(3);
        let walk = walk(size, start, Position::new(1, 1), &WalkConfig::new(10), &mut rng).unwrap();
        assert_eq!(walk.status, WalkStatus::Stuck);
        assert_eq!(
            walk.positions().copied().collect::<Vec<_>>(),
            vec![Position::new(0, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn same_seed_same_walk() {
        let size = GridSize::new(15, 30);
        let start = Position::new(7, 1);
        let end = Position::new(7, 28);
        let config = WalkConfig::new(4);
        let a = walk(size, start, end, &config, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = walk(size, start, end, &config, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
        assert_valid_path(&a, size, start);
    }

    #[test]
    fn reached_paths_end_at_goal() {
        let size = GridSize::new(15, 30);
        let start = Position::new(7, 1);
        let end = Position::new(7, 28);
        let config = WalkConfig::new(4);
        let mut rng = StdRng::seed_from_u64(0);
        let mut reached = 0;
        for _ in 0..200 {
            let walk = walk(size, start, end, &config, &mut rng).unwrap();
            assert_valid_path(&walk, size, start);
            if walk.is_reached() {
                reached += 1;
                assert_eq!(walk.path.last(), Some(&end));
            } else {
                assert!(!walk.path.contains(&end));
            }
        }
        assert!(reached > 0);
    }

    #[test]
    fn forced_candidate_is_current_direction() {
        let state = WalkState {
            position: Position::new(3, 3),
            direction: Direction::East,
            straight_run: 1,
        };
        let size = GridSize::new(10, 10);
        let c = candidates(&state, size, Position::new(9, 9), &WalkConfig::new(4));
        assert_eq!(c.as_slice(), &[(Direction::East, 1.0)]);
    }

    #[test]
    fn candidate_weights() {
        let state = WalkState {
            position: Position::new(0, 3),
            direction: Direction::East,
            straight_run: 4,
        };
        let size = GridSize::new(10, 10);
        // Left (north) leaves the grid, straight and right both approach the end
        let c = candidates(&state, size, Position::new(9, 9), &WalkConfig::new(4));
        let dirs = c.iter().map(|(d, _)| *d).collect::<Vec<_>>();
        assert_eq!(dirs, vec![Direction::North, Direction::East, Direction::South]);
        for (got, expected) in c.iter().map(|(_, w)| *w).zip([0.0, 1.1, 0.7]) {
            assert!((got - expected).abs() < 1e-9);
        }
    }
}
