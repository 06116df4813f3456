use crate::ExerciseID;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SequenceError {
    #[error("flat index {index} is out of range ({len} states)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("flat list has {actual} states, but the blocks hold {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum NavigationError {
    #[error("sequence is empty")]
    EmptySequence,
    #[error("start index {index} is out of range ({len} states)")]
    StartIndexOutOfRange { index: usize, len: usize },
    #[error("{state} state at index {index} is not navigable")]
    BoundaryState { index: usize, state: &'static str },
    #[error("no container for exercise {0:?}")]
    ExerciseNotFound(ExerciseID),
    #[error("no container at position {0}")]
    ContainerNotFound(usize),
    #[error("container at position {0} is not an exercise")]
    NotAnExercise(usize),
    #[error("container at position {0} is not a superset")]
    NotASuperset(usize),
    #[error("no child item {child_index} in container {container_index}")]
    ChildItemNotFound {
        container_index: usize,
        child_index: usize,
    },
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}
