//! Mapping a persisted checkpoint back to a position after a restart.
//!
//! The sequence of a resumed session is rebuilt from scratch, so the state the
//! user was at may have moved, changed its id or vanished. The resolver tries
//! increasingly loose criteria and always yields a position.

use log::{debug, warn};
use strum::{Display, EnumString};

use crate::{ExecutionState, ExerciseID, SetID};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum CheckpointStateType {
    #[strum(to_string = "SET")]
    Set,
    #[strum(to_string = "REST")]
    Rest,
    #[strum(to_string = "CALIBRATION_LOAD")]
    CalibrationLoad,
    #[strum(to_string = "CALIBRATION_RIR")]
    CalibrationRIR,
}

/// Descriptor of the state the user was at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub state_type: CheckpointStateType,
    pub exercise_id: Option<ExerciseID>,
    pub set_id: Option<SetID>,
    pub set_index: Option<u32>,
    pub rest_order: Option<u32>,
}

impl Checkpoint {
    #[must_use]
    pub fn new(state_type: CheckpointStateType) -> Self {
        Self {
            state_type,
            exercise_id: None,
            set_id: None,
            set_index: None,
            rest_order: None,
        }
    }

    /// Describes `state`. Session boundaries have no checkpoint.
    #[must_use]
    pub fn from_state(state: &ExecutionState) -> Option<Self> {
        match state {
            ExecutionState::Set(set) => Some(Self {
                exercise_id: Some(set.exercise_id),
                set_id: Some(set.planned.id),
                set_index: Some(set.set_index),
                ..Self::new(CheckpointStateType::Set)
            }),
            ExecutionState::Rest(rest) => Some(Self {
                exercise_id: rest.exercise_id,
                set_id: Some(rest.set_id),
                rest_order: Some(rest.order),
                ..Self::new(CheckpointStateType::Rest)
            }),
            ExecutionState::CalibrationLoadSelection(selection) => Some(Self {
                exercise_id: Some(selection.exercise_id),
                set_id: Some(selection.calibration_set.id),
                set_index: Some(selection.set_index),
                ..Self::new(CheckpointStateType::CalibrationLoad)
            }),
            ExecutionState::CalibrationRIRSelection(selection) => Some(Self {
                exercise_id: Some(selection.exercise_id),
                set_id: Some(selection.calibration_set.id),
                set_index: Some(selection.set_index),
                ..Self::new(CheckpointStateType::CalibrationRIR)
            }),
            ExecutionState::Preparing | ExecutionState::Completed => None,
        }
    }
}

/// The criterion that produced a resolved position, from strictest to loosest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RecoveryTier {
    Exact,
    TypeNarrowed,
    CalibrationSet,
    SetFallback,
    FirstState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPosition {
    pub index: usize,
    pub tier: RecoveryTier,
}

#[must_use]
pub fn resolve_checkpoint(states: &[ExecutionState], checkpoint: &Checkpoint) -> ResolvedPosition {
    let resolved = find(states, |s| exact_match(checkpoint, s), RecoveryTier::Exact)
        .or_else(|| {
            find(states, |s| type_narrowed_match(checkpoint, s), RecoveryTier::TypeNarrowed)
        })
        .or_else(|| {
            find(states, |s| calibration_set_match(checkpoint, s), RecoveryTier::CalibrationSet)
        })
        .or_else(|| {
            find(states, |s| preceding_set_match(checkpoint, s), RecoveryTier::SetFallback)
        })
        .or_else(|| find(states, |s| set_fallback_match(checkpoint, s), RecoveryTier::SetFallback))
        .unwrap_or_else(|| first_state(states, checkpoint));

    if resolved.tier == RecoveryTier::FirstState {
        warn!("no state matches checkpoint {checkpoint:?}, resuming at index {}", resolved.index);
    } else {
        debug!(
            "resolved checkpoint {checkpoint:?} to index {} ({:?})",
            resolved.index, resolved.tier
        );
    }

    resolved
}

fn find(
    states: &[ExecutionState],
    predicate: impl Fn(&ExecutionState) -> bool,
    tier: RecoveryTier,
) -> Option<ResolvedPosition> {
    states
        .iter()
        .position(predicate)
        .map(|index| ResolvedPosition { index, tier })
}

fn matches<T: PartialEq>(expected: Option<T>, actual: T) -> bool {
    expected.is_none_or(|expected| expected == actual)
}

fn exact_match(checkpoint: &Checkpoint, state: &ExecutionState) -> bool {
    match (checkpoint.state_type, state) {
        (CheckpointStateType::Set, ExecutionState::Set(set)) => {
            matches(checkpoint.exercise_id, set.exercise_id)
                && matches(checkpoint.set_id, set.planned.id)
                && matches(checkpoint.set_index, set.set_index)
        }
        (CheckpointStateType::Rest, ExecutionState::Rest(rest)) => {
            checkpoint
                .exercise_id
                .is_none_or(|id| rest.exercise_id == Some(id))
                && matches(checkpoint.set_id, rest.set_id)
                && matches(checkpoint.rest_order, rest.order)
        }
        (CheckpointStateType::CalibrationLoad, ExecutionState::CalibrationLoadSelection(s)) => {
            matches(checkpoint.exercise_id, s.exercise_id)
                && matches(checkpoint.set_id, s.calibration_set.id)
                && matches(checkpoint.set_index, s.set_index)
        }
        (CheckpointStateType::CalibrationRIR, ExecutionState::CalibrationRIRSelection(s)) => {
            matches(checkpoint.exercise_id, s.exercise_id)
                && matches(checkpoint.set_id, s.calibration_set.id)
                && matches(checkpoint.set_index, s.set_index)
        }
        _ => false,
    }
}

fn type_narrowed_match(checkpoint: &Checkpoint, state: &ExecutionState) -> bool {
    match (checkpoint.state_type, state) {
        (CheckpointStateType::CalibrationLoad, ExecutionState::CalibrationLoadSelection(s)) => {
            matches(checkpoint.exercise_id, s.exercise_id)
        }
        _ => false,
    }
}

fn calibration_set_match(checkpoint: &Checkpoint, state: &ExecutionState) -> bool {
    match (checkpoint.state_type, state) {
        (CheckpointStateType::CalibrationRIR, ExecutionState::Set(set)) => {
            set.is_calibration_set()
                && matches(checkpoint.exercise_id, set.exercise_id)
                && matches(checkpoint.set_id, set.planned.id)
                && matches(checkpoint.set_index, set.set_index)
        }
        _ => false,
    }
}

/// The set a rest follows. Rests carry no set index, so the generic fallback would pick the
/// first set of the exercise.
fn preceding_set_match(checkpoint: &Checkpoint, state: &ExecutionState) -> bool {
    match (checkpoint.state_type, checkpoint.set_id, state) {
        (CheckpointStateType::Rest, Some(set_id), ExecutionState::Set(set)) => {
            set.planned.id == set_id && matches(checkpoint.exercise_id, set.exercise_id)
        }
        _ => false,
    }
}

fn set_fallback_match(checkpoint: &Checkpoint, state: &ExecutionState) -> bool {
    let Some(exercise_id) = checkpoint.exercise_id else {
        return false;
    };
    match state {
        ExecutionState::Set(set) => {
            // Resuming a load selection inside the calibration set would skip the selection.
            !(checkpoint.state_type == CheckpointStateType::CalibrationLoad
                && set.is_calibration_set())
                && set.exercise_id == exercise_id
                && matches(checkpoint.set_index, set.set_index)
        }
        _ => false,
    }
}

fn first_state(states: &[ExecutionState], checkpoint: &Checkpoint) -> ResolvedPosition {
    let index = if checkpoint.state_type == CheckpointStateType::CalibrationLoad {
        states
            .iter()
            .position(|s| !s.is_calibration_set())
            .unwrap_or(0)
    } else {
        0
    };
    ResolvedPosition {
        index,
        tier: RecoveryTier::FirstState,
    }
}
