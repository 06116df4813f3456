use std::collections::HashSet;

use crate::{ExecutionState, ExerciseID, SetID};

impl ExecutionState {
    #[must_use]
    pub fn exercise_id(&self) -> Option<ExerciseID> {
        match self {
            ExecutionState::Set(set) => Some(set.exercise_id),
            ExecutionState::Rest(rest) => rest.exercise_id,
            ExecutionState::CalibrationLoadSelection(selection) => Some(selection.exercise_id),
            ExecutionState::CalibrationRIRSelection(selection) => Some(selection.exercise_id),
            ExecutionState::Preparing | ExecutionState::Completed => None,
        }
    }

    /// The id of the set, of the set a rest follows, or of the calibration set a selection
    /// belongs to.
    #[must_use]
    pub fn set_id(&self) -> Option<SetID> {
        match self {
            ExecutionState::Set(set) => Some(set.planned.id),
            ExecutionState::Rest(rest) => Some(rest.set_id),
            ExecutionState::CalibrationLoadSelection(selection) => {
                Some(selection.calibration_set.id)
            }
            ExecutionState::CalibrationRIRSelection(selection) => {
                Some(selection.calibration_set.id)
            }
            ExecutionState::Preparing | ExecutionState::Completed => None,
        }
    }

    #[must_use]
    pub fn is_calibration_state(&self) -> bool {
        match self {
            ExecutionState::Set(set) => set.is_calibration_set(),
            ExecutionState::CalibrationLoadSelection(_)
            | ExecutionState::CalibrationRIRSelection(_) => true,
            ExecutionState::Rest(_) | ExecutionState::Preparing | ExecutionState::Completed => {
                false
            }
        }
    }

    #[must_use]
    pub fn is_calibration_set(&self) -> bool {
        matches!(self, ExecutionState::Set(set) if set.is_calibration_set())
    }

    #[must_use]
    pub fn is_rest_like(&self) -> bool {
        matches!(self, ExecutionState::Rest(_))
    }

    #[must_use]
    pub fn is_unilateral_set(&self) -> bool {
        matches!(self, ExecutionState::Set(set) if set.side.is_some())
    }

    /// Whether executing the state produces an entry in the training history.
    #[must_use]
    pub fn is_persisted_in_history(&self) -> bool {
        match self {
            ExecutionState::Set(set) => !set.skipped,
            ExecutionState::Rest(rest) => !rest.is_intra_set,
            ExecutionState::CalibrationLoadSelection(_)
            | ExecutionState::CalibrationRIRSelection(_)
            | ExecutionState::Preparing
            | ExecutionState::Completed => false,
        }
    }
}

/// Ids of all states in order of first appearance.
#[must_use]
pub fn ordered_unique_set_ids<'a>(
    states: impl IntoIterator<Item = &'a ExecutionState>,
) -> Vec<SetID> {
    unique(states.into_iter().filter_map(ExecutionState::set_id))
}

/// Ids of executed sets in order of first appearance.
///
/// Calibration selections and rests are ignored, calibration sets are counted. Both halves of a
/// unilateral set share one id and are counted once.
#[must_use]
pub fn ordered_unique_logical_set_ids<'a>(
    states: impl IntoIterator<Item = &'a ExecutionState>,
) -> Vec<SetID> {
    unique(states.into_iter().filter_map(|state| match state {
        ExecutionState::Set(set) => Some(set.planned.id),
        _ => None,
    }))
}

fn unique(ids: impl Iterator<Item = SetID>) -> Vec<SetID> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

/// First index after `from` whose state satisfies `predicate`.
pub fn find_next_index(
    states: &[ExecutionState],
    from: usize,
    predicate: impl Fn(&ExecutionState) -> bool,
) -> Option<usize> {
    states
        .iter()
        .enumerate()
        .skip(from.saturating_add(1))
        .find(|&(_, state)| predicate(state))
        .map(|(index, _)| index)
}

/// Last index before `from` whose state satisfies `predicate`.
pub fn find_previous_index(
    states: &[ExecutionState],
    from: usize,
    predicate: impl Fn(&ExecutionState) -> bool,
) -> Option<usize> {
    states
        .iter()
        .take(from.min(states.len()))
        .rposition(predicate)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{fixtures::*, sequence::flatten};

    use super::*;

    #[rstest]
    #[case(set(1, 10, 0), Some(1.into()), Some(10.into()))]
    #[case(exercise_rest(2, 20, 0), Some(2.into()), Some(20.into()))]
    #[case(rest(13, 0), None, Some(13.into()))]
    #[case(load_selection(1, 10, 0), Some(1.into()), Some(10.into()))]
    #[case(rir_selection(1, 10, 0), Some(1.into()), Some(10.into()))]
    #[case(ExecutionState::Preparing, None, None)]
    #[case(ExecutionState::Completed, None, None)]
    fn test_ids(
        #[case] state: ExecutionState,
        #[case] exercise_id: Option<ExerciseID>,
        #[case] set_id: Option<SetID>,
    ) {
        assert_eq!(state.exercise_id(), exercise_id);
        assert_eq!(state.set_id(), set_id);
    }

    #[rstest]
    #[case(set(1, 10, 0), false, false, false)]
    #[case(calibration_set(1, 10, 0), true, false, false)]
    #[case(load_selection(1, 10, 0), true, false, false)]
    #[case(rir_selection(1, 10, 0), true, false, false)]
    #[case(exercise_rest(1, 10, 0), false, true, false)]
    #[case(intra_set_rest(1, 10, 0), false, true, false)]
    #[case(unilateral_set(1, 10, 0, crate::Side::Left), false, false, true)]
    fn test_classification(
        #[case] state: ExecutionState,
        #[case] calibration: bool,
        #[case] rest_like: bool,
        #[case] unilateral: bool,
    ) {
        assert_eq!(state.is_calibration_state(), calibration);
        assert_eq!(state.is_rest_like(), rest_like);
        assert_eq!(state.is_unilateral_set(), unilateral);
    }

    #[rstest]
    #[case(set(1, 10, 0), true)]
    #[case(exercise_rest(1, 10, 0), true)]
    #[case(intra_set_rest(1, 10, 0), false)]
    #[case(load_selection(1, 10, 0), false)]
    fn test_is_persisted_in_history(#[case] state: ExecutionState, #[case] expected: bool) {
        assert_eq!(state.is_persisted_in_history(), expected);
    }

    #[test]
    fn test_ordered_unique_set_ids() {
        let states = flatten(&session());

        assert_eq!(
            ordered_unique_set_ids(&states),
            [10_u128, 11, 12, 13, 20, 21, 30, 40, 31, 41]
                .map(SetID::from)
                .to_vec()
        );
    }

    #[test]
    fn test_ordered_unique_logical_set_ids() {
        let states = vec![
            load_selection(1, 10, 0),
            warm_up_set(1, 11, 0),
            calibration_set(1, 10, 0),
            rir_selection(1, 10, 0),
            unilateral_set(2, 20, 0, crate::Side::Left),
            intra_set_rest(2, 20, 0),
            unilateral_set(2, 20, 0, crate::Side::Right),
            exercise_rest(2, 99, 1),
        ];

        assert_eq!(
            ordered_unique_logical_set_ids(&states),
            [11_u128, 10, 20].map(SetID::from).to_vec()
        );
    }

    #[rstest]
    #[case(0, Some(3))]
    #[case(3, Some(6))]
    #[case(6, Some(8))]
    #[case(16, None)]
    #[case(usize::MAX, None)]
    fn test_find_next_index(#[case] from: usize, #[case] expected: Option<usize>) {
        let states = flatten(&session());

        assert_eq!(
            find_next_index(&states, from, ExecutionState::is_rest_like),
            expected
        );
    }

    #[rstest]
    #[case(6, Some(3))]
    #[case(3, None)]
    #[case(100, Some(16))]
    fn test_find_previous_index(#[case] from: usize, #[case] expected: Option<usize>) {
        let states = flatten(&session());

        assert_eq!(
            find_previous_index(&states, from, ExecutionState::is_rest_like),
            expected
        );
    }
}
