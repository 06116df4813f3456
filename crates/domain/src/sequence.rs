//! Structural operations on the container tree.
//!
//! A sequence is a list of [`SequenceItem`]s whose depth-first projection is
//! the flat list of execution states the user steps through. None of the
//! functions here change the kind or the cardinality of a block.

use std::{collections::HashMap, hash::Hash};

use crate::{
    BlockKind, ChildItem, Container, ExecutionState, ExerciseState, SequenceError, SequenceItem,
    SupersetState,
};

pub fn iter_states(sequence: &[SequenceItem]) -> impl Iterator<Item = &ExecutionState> {
    sequence.iter().flat_map(SequenceItem::states)
}

#[must_use]
pub fn flatten(sequence: &[SequenceItem]) -> Vec<ExecutionState> {
    iter_states(sequence).cloned().collect()
}

#[must_use]
pub fn flat_len(sequence: &[SequenceItem]) -> usize {
    sequence.iter().map(SequenceItem::len).sum()
}

#[must_use]
pub fn map_states(
    sequence: &[SequenceItem],
    mut f: impl FnMut(&ExecutionState) -> ExecutionState,
) -> Vec<SequenceItem> {
    map_states_indexed(sequence, |_, state| f(state))
}

/// Like [`map_states`], but also passes the flat index of each state.
#[must_use]
pub fn map_states_indexed(
    sequence: &[SequenceItem],
    mut f: impl FnMut(usize, &ExecutionState) -> ExecutionState,
) -> Vec<SequenceItem> {
    let mut index = 0;
    let mut apply = |state: &ExecutionState| {
        let mapped = f(index, state);
        index += 1;
        mapped
    };
    sequence
        .iter()
        .map(|item| match item {
            SequenceItem::Container(Container::Exercise(exercise)) => {
                SequenceItem::Container(Container::Exercise(ExerciseState {
                    exercise_id: exercise.exercise_id,
                    child_items: exercise
                        .child_items
                        .iter()
                        .map(|child| {
                            let mapped = child.map_states(&mut apply);
                            debug_assert_eq!(mapped.len(), child.len());
                            mapped
                        })
                        .collect(),
                }))
            }
            SequenceItem::Container(Container::Superset(superset)) => {
                SequenceItem::Container(Container::Superset(SupersetState {
                    superset_id: superset.superset_id,
                    child_states: superset.child_states.iter().map(&mut apply).collect(),
                }))
            }
            SequenceItem::RestBetweenExercises(rest) => {
                SequenceItem::RestBetweenExercises(apply(rest))
            }
        })
        .collect()
}

/// Replaces the state at a flat index. All other states and all blocks stay untouched.
pub fn update_at_flat_index(
    sequence: &[SequenceItem],
    index: usize,
    new_state: ExecutionState,
) -> Result<Vec<SequenceItem>, SequenceError> {
    let len = flat_len(sequence);
    if index >= len {
        return Err(SequenceError::IndexOutOfRange { index, len });
    }

    let mut result = sequence.to_vec();
    let mut offset = 0;
    for item in &mut result {
        let item_len = item.len();
        if index < offset + item_len {
            *state_mut(item, index - offset) = new_state;
            break;
        }
        offset += item_len;
    }

    Ok(result)
}

fn state_mut(item: &mut SequenceItem, local_index: usize) -> &mut ExecutionState {
    match item {
        SequenceItem::Container(Container::Exercise(exercise)) => {
            let mut offset = 0;
            for child in &mut exercise.child_items {
                let child_len = child.len();
                if local_index < offset + child_len {
                    return &mut child.states_mut()[local_index - offset];
                }
                offset += child_len;
            }
            unreachable!("local index {local_index} exceeds exercise of {offset} states")
        }
        SequenceItem::Container(Container::Superset(superset)) => {
            &mut superset.child_states[local_index]
        }
        SequenceItem::RestBetweenExercises(rest) => rest,
    }
}

/// Splits a flat list back into the blocks of `child_items`, in their original order and sizes.
pub fn rebuild_child_items_from_flat(
    child_items: &[ChildItem],
    flat_states: Vec<ExecutionState>,
) -> Result<Vec<ChildItem>, SequenceError> {
    let expected = child_items.iter().map(ChildItem::len).sum();
    let actual = flat_states.len();
    if actual != expected {
        return Err(SequenceError::LengthMismatch { expected, actual });
    }

    let mut states = flat_states.into_iter();
    child_items
        .iter()
        .map(|child| {
            let chunk = states.by_ref().take(child.len()).collect::<Vec<_>>();
            ChildItem::from_kind(child.kind(), chunk)
                .ok_or(SequenceError::LengthMismatch { expected, actual })
        })
        .collect()
}

/// Substitutes every state whose id is a key of `replacements`.
#[must_use]
pub fn replace_states_by_id<K: Eq + Hash>(
    sequence: &[SequenceItem],
    id_of: impl Fn(&ExecutionState) -> Option<K>,
    replacements: &HashMap<K, ExecutionState>,
) -> Vec<SequenceItem> {
    map_states(sequence, |state| {
        id_of(state)
            .and_then(|id| replacements.get(&id))
            .unwrap_or(state)
            .clone()
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemShape {
    Exercise(Vec<(BlockKind, usize)>),
    Superset(usize),
    RestBetweenExercises,
}

/// Kind and cardinality of every item and block, ignoring the states themselves.
#[must_use]
pub fn shape(sequence: &[SequenceItem]) -> Vec<ItemShape> {
    sequence
        .iter()
        .map(|item| match item {
            SequenceItem::Container(Container::Exercise(exercise)) => ItemShape::Exercise(
                exercise
                    .child_items
                    .iter()
                    .map(|child| (child.kind(), child.len()))
                    .collect(),
            ),
            SequenceItem::Container(Container::Superset(superset)) => {
                ItemShape::Superset(superset.child_states.len())
            }
            SequenceItem::RestBetweenExercises(_) => ItemShape::RestBetweenExercises,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{SetID, fixtures::*};

    use super::*;

    fn skip(state: &ExecutionState) -> ExecutionState {
        match state {
            ExecutionState::Set(set) => ExecutionState::Set(crate::SetState {
                skipped: true,
                ..set.clone()
            }),
            _ => state.clone(),
        }
    }

    fn exercise_child_items(sequence: &[SequenceItem], position: usize) -> &[ChildItem] {
        match &sequence[position] {
            SequenceItem::Container(Container::Exercise(exercise)) => &exercise.child_items,
            _ => panic!("no exercise at position {position}"),
        }
    }

    #[test]
    fn test_flatten() {
        let sequence = session();
        let states = flatten(&sequence);

        assert_eq!(states.len(), 19);
        assert_eq!(flat_len(&sequence), 19);
        assert_eq!(states[0], load_selection(1, 10, 0));
        assert_eq!(states[2], calibration_set(1, 10, 0));
        assert_eq!(states[4], rir_selection(1, 10, 0));
        assert_eq!(states[10], intra_set_rest(2, 20, 0));
        assert_eq!(states[14], set(3, 30, 0));
        assert_eq!(states[18], set(4, 41, 1));
        assert_eq!(flatten(&sequence), states);
    }

    #[test]
    fn test_flatten_empty() {
        assert!(flatten(&[]).is_empty());
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    fn test_rebuild_child_items_from_flat_round_trip(#[case] position: usize) {
        let sequence = session();
        let child_items = exercise_child_items(&sequence, position);
        let flat_states = child_items
            .iter()
            .flat_map(ChildItem::states)
            .cloned()
            .collect::<Vec<_>>();

        assert_eq!(
            rebuild_child_items_from_flat(child_items, flat_states),
            Ok(child_items.to_vec())
        );
    }

    #[test]
    fn test_rebuild_child_items_from_flat_keeps_block_sizes() {
        let sequence = session();
        let child_items = exercise_child_items(&sequence, 0);
        let flat_states = (0..8).map(|i| set(1, 100 + i, 0)).collect::<Vec<_>>();

        let rebuilt = rebuild_child_items_from_flat(child_items, flat_states).unwrap();

        assert_eq!(
            rebuilt.iter().map(|c| (c.kind(), c.len())).collect::<Vec<_>>(),
            vec![
                (BlockKind::LoadSelection, 2),
                (BlockKind::CalibrationExecution, 3),
                (BlockKind::Normal, 1),
                (BlockKind::Normal, 1),
                (BlockKind::Normal, 1),
            ]
        );
        assert_eq!(rebuilt[1].states()[0], set(1, 102, 0));
        assert_eq!(rebuilt[4], ChildItem::Normal(set(1, 107, 0)));
    }

    #[rstest]
    #[case(7)]
    #[case(9)]
    #[case(0)]
    fn test_rebuild_child_items_from_flat_length_mismatch(#[case] len: u128) {
        let sequence = session();
        let child_items = exercise_child_items(&sequence, 0);
        let flat_states = (0..len).map(|i| set(1, i, 0)).collect::<Vec<_>>();

        assert_eq!(
            rebuild_child_items_from_flat(child_items, flat_states),
            Err(SequenceError::LengthMismatch {
                expected: 8,
                actual: usize::try_from(len).unwrap()
            })
        );
    }

    #[test]
    fn test_map_states_preserves_shape() {
        let sequence = session();

        let mapped = map_states(&sequence, skip);

        assert_eq!(shape(&mapped), shape(&sequence));
        assert_eq!(
            flatten(&mapped),
            flatten(&sequence).iter().map(skip).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_map_states_indexed_passes_flat_index() {
        let sequence = session();
        let mut indices = vec![];

        let mapped = map_states_indexed(&sequence, |index, state| {
            indices.push(index);
            if index >= 5 { skip(state) } else { state.clone() }
        });

        assert_eq!(indices, (0..19).collect::<Vec<_>>());
        let states = flatten(&mapped);
        assert_eq!(states[2], calibration_set(1, 10, 0));
        assert_eq!(states[5], skip(&set(1, 12, 1)));
    }

    #[test]
    fn test_update_at_flat_index_inside_block() {
        let sequence = session();
        let new_state = exercise_rest(1, 10, 7);

        let updated = update_at_flat_index(&sequence, 3, new_state.clone()).unwrap();

        assert_eq!(shape(&updated), shape(&sequence));
        let mut expected = flatten(&sequence);
        expected[3] = new_state;
        assert_eq!(flatten(&updated), expected);
    }

    #[rstest]
    #[case(8)]
    #[case(16)]
    #[case(18)]
    fn test_update_at_flat_index_outside_exercise(#[case] index: usize) {
        let sequence = session();

        let updated = update_at_flat_index(&sequence, index, rest(99, 0)).unwrap();

        assert_eq!(flatten(&updated)[index], rest(99, 0));
        assert_eq!(shape(&updated), shape(&sequence));
    }

    #[test]
    fn test_update_at_flat_index_identity() {
        let sequence = session();
        let state = flatten(&sequence)[9].clone();

        assert_eq!(update_at_flat_index(&sequence, 9, state), Ok(sequence));
    }

    #[test]
    fn test_update_at_flat_index_out_of_range() {
        assert_eq!(
            update_at_flat_index(&session(), 19, rest(1, 0)),
            Err(SequenceError::IndexOutOfRange { index: 19, len: 19 })
        );
    }

    #[test]
    fn test_replace_states_by_id() {
        let sequence = session();
        let replacement = set(2, 21, 5);
        let replacements = HashMap::from([(SetID::from(21), replacement.clone())]);

        let replaced = replace_states_by_id(
            &sequence,
            |state| match state {
                ExecutionState::Set(set) => Some(set.planned.id),
                _ => None,
            },
            &replacements,
        );

        assert_eq!(shape(&replaced), shape(&sequence));
        let mut expected = flatten(&sequence);
        expected[13] = replacement;
        assert_eq!(flatten(&replaced), expected);
    }

    #[test]
    fn test_shape() {
        assert_eq!(
            shape(&session()),
            vec![
                ItemShape::Exercise(vec![
                    (BlockKind::LoadSelection, 2),
                    (BlockKind::CalibrationExecution, 3),
                    (BlockKind::Normal, 1),
                    (BlockKind::Normal, 1),
                    (BlockKind::Normal, 1),
                ]),
                ItemShape::RestBetweenExercises,
                ItemShape::Exercise(vec![
                    (BlockKind::UnilateralSet, 3),
                    (BlockKind::Normal, 1),
                    (BlockKind::Normal, 1),
                ]),
                ItemShape::Superset(5),
            ]
        );
    }
}
