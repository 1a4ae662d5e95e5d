use core::fmt;

use rand::distributions::WeightedError;

use crate::direction::{GridSize, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// A start or end position lies outside the grid.
    OutOfBounds { position: Position, size: GridSize },
    /// The walk weights cannot be drawn from: negative, NaN, infinite, or summing to infinity.
    InvalidWeights(WeightedError),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::OutOfBounds { position, size } => {
                write!(f, "position {position} is outside the {size} grid")
            }
            GenerationError::InvalidWeights(err) => write!(f, "invalid walk weights: {err}"),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::InvalidWeights(err) => Some(err),
            GenerationError::OutOfBounds { .. } => None,
        }
    }
}

impl From<WeightedError> for GenerationError {
    fn from(err: WeightedError) -> GenerationError {
        GenerationError::InvalidWeights(err)
    }
}
