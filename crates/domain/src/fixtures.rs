use crate::{
    CalibrationLoadSelectionState, CalibrationRIRSelectionState, ChildItem, ExecutionState,
    PlannedSet, Reps, RestState, SequenceItem, SetData, SetKind, SetState, Side, Weight,
};

fn target() -> SetData {
    SetData {
        reps: Some(Reps::new(8).unwrap()),
        weight: Some(Weight::new(60.0).unwrap()),
        time: None,
        rir: None,
    }
}

fn planned(set_id: u128, kind: SetKind) -> PlannedSet {
    PlannedSet::new(set_id.into(), kind, target())
}

pub fn set(exercise_id: u128, set_id: u128, set_index: u32) -> ExecutionState {
    ExecutionState::Set(SetState::new(
        exercise_id.into(),
        planned(set_id, SetKind::Work),
        set_index,
    ))
}

pub fn warm_up_set(exercise_id: u128, set_id: u128, set_index: u32) -> ExecutionState {
    ExecutionState::Set(SetState::new(
        exercise_id.into(),
        planned(set_id, SetKind::WarmUp),
        set_index,
    ))
}

pub fn calibration_set(exercise_id: u128, set_id: u128, set_index: u32) -> ExecutionState {
    ExecutionState::Set(SetState::new(
        exercise_id.into(),
        planned(set_id, SetKind::Calibration),
        set_index,
    ))
}

pub fn unilateral_set(
    exercise_id: u128,
    set_id: u128,
    set_index: u32,
    side: Side,
) -> ExecutionState {
    ExecutionState::Set(
        SetState::new(exercise_id.into(), planned(set_id, SetKind::Work), set_index)
            .with_side(side),
    )
}

pub fn rest(set_id: u128, order: u32) -> ExecutionState {
    ExecutionState::Rest(RestState::new(set_id.into(), 120, order))
}

pub fn exercise_rest(exercise_id: u128, set_id: u128, order: u32) -> ExecutionState {
    ExecutionState::Rest(RestState::new(set_id.into(), 90, order).for_exercise(exercise_id.into()))
}

pub fn intra_set_rest(exercise_id: u128, set_id: u128, order: u32) -> ExecutionState {
    ExecutionState::Rest(
        RestState::new(set_id.into(), 15, order)
            .for_exercise(exercise_id.into())
            .intra_set(),
    )
}

pub fn load_selection(exercise_id: u128, set_id: u128, set_index: u32) -> ExecutionState {
    ExecutionState::CalibrationLoadSelection(CalibrationLoadSelectionState {
        exercise_id: exercise_id.into(),
        calibration_set: planned(set_id, SetKind::Calibration),
        set_index,
        previous: None,
        selected_weight: None,
    })
}

pub fn rir_selection(exercise_id: u128, set_id: u128, set_index: u32) -> ExecutionState {
    ExecutionState::CalibrationRIRSelection(CalibrationRIRSelectionState {
        exercise_id: exercise_id.into(),
        calibration_set: planned(set_id, SetKind::Calibration),
        set_index,
        executed: target(),
        rir: None,
    })
}

/// Flat layout:
///
/// ```text
///  0- 1  exercise 1, load selection block
///  2- 4  exercise 1, calibration execution block
///  5- 7  exercise 1, set, rest, set
///     8  rest between exercises
///  9-11  exercise 2, unilateral block
/// 12-13  exercise 2, rest, set
/// 14-18  superset of exercises 3 and 4
/// ```
pub fn session() -> Vec<SequenceItem> {
    vec![
        SequenceItem::exercise(
            1.into(),
            vec![
                ChildItem::LoadSelectionBlock(vec![
                    load_selection(1, 10, 0),
                    warm_up_set(1, 11, 0),
                ]),
                ChildItem::CalibrationExecutionBlock(vec![
                    calibration_set(1, 10, 0),
                    exercise_rest(1, 10, 0),
                    rir_selection(1, 10, 0),
                ]),
                ChildItem::Normal(set(1, 12, 1)),
                ChildItem::Normal(exercise_rest(1, 12, 1)),
                ChildItem::Normal(set(1, 13, 2)),
            ],
        ),
        SequenceItem::rest_between_exercises(RestState::new(13.into(), 180, 0)),
        SequenceItem::exercise(
            2.into(),
            vec![
                ChildItem::UnilateralSetBlock(vec![
                    unilateral_set(2, 20, 0, Side::Left),
                    intra_set_rest(2, 20, 0),
                    unilateral_set(2, 20, 0, Side::Right),
                ]),
                ChildItem::Normal(exercise_rest(2, 20, 1)),
                ChildItem::Normal(set(2, 21, 1)),
            ],
        ),
        SequenceItem::superset(
            3.into(),
            vec![
                set(3, 30, 0),
                set(4, 40, 0),
                exercise_rest(4, 40, 0),
                set(3, 31, 1),
                set(4, 41, 1),
            ],
        ),
    ]
}
