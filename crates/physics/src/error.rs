use thiserror::Error;

use crate::collision::ShapeKind;

#[derive(Error, Debug)]
pub enum PhysicsError {
    /// The body could not exist, e.g. its computed mass is not positive.
    #[error("impossible object: {0}")]
    ImpossibleObject(String),
    /// The two shape kinds cannot meaningfully interact.
    #[error("impossible pair: {first:?} with {second:?}")]
    ImpossiblePair { first: ShapeKind, second: ShapeKind },
    /// A geometric query had no well-defined answer.
    #[error("geometric degeneracy: {0}")]
    Degenerate(&'static str),
    /// A handle or key names no body of this simulation.
    #[error("no {kind:?} with index {index}")]
    UnknownBody { kind: ShapeKind, index: usize },
    #[error("unknown material index {0}")]
    UnknownMaterial(usize),
    #[error("malformed scene: {0}")]
    Scene(#[from] serde_json::Error),
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
