//! The steppable view of a workout.
//!
//! A [`WorkoutStateMachine`] pairs a sequence with a position in its flat
//! projection. Every operation returns a new machine and leaves the old one
//! untouched, so a previous value can still be inspected after an update.
//! Sequence and projection are shared, which makes stepping cheap.

use std::{collections::HashMap, sync::Arc};

use log::{debug, warn};

use crate::{
    ChildItem, Container, ExecutionState, ExerciseID, NavigationError, SequenceItem, SetID,
    query, sequence,
};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutStateMachine {
    sequence: Arc<[SequenceItem]>,
    states: Arc<[ExecutionState]>,
    current_index: usize,
}

/// Location of a flat index inside the container tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerPosition {
    /// Position of the container in the sequence.
    pub container_index: usize,
    /// Child item of an exercise or child state of a superset.
    pub child_index: usize,
    /// Offset inside the child item, always 0 for supersets.
    pub index_within_child: usize,
}

impl WorkoutStateMachine {
    pub fn from_sequence(
        sequence: Vec<SequenceItem>,
        start_index: usize,
    ) -> Result<Self, NavigationError> {
        let states = sequence::flatten(&sequence);

        if states.is_empty() {
            return Err(NavigationError::EmptySequence);
        }

        if start_index >= states.len() {
            return Err(NavigationError::StartIndexOutOfRange {
                index: start_index,
                len: states.len(),
            });
        }

        if let Some((index, state)) = states.iter().enumerate().find(|(_, s)| s.is_boundary()) {
            return Err(NavigationError::BoundaryState {
                index,
                state: state.name(),
            });
        }

        Ok(Self {
            sequence: sequence.into(),
            states: states.into(),
            current_index: start_index,
        })
    }

    fn rebuild(&self, sequence: Vec<SequenceItem>, index: usize) -> Result<Self, NavigationError> {
        let len = sequence::flat_len(&sequence);
        Self::from_sequence(sequence, index.min(len.saturating_sub(1)))
    }

    fn at(&self, index: usize) -> Self {
        Self {
            sequence: Arc::clone(&self.sequence),
            states: Arc::clone(&self.states),
            current_index: index,
        }
    }

    #[must_use]
    pub fn sequence(&self) -> &[SequenceItem] {
        &self.sequence
    }

    /// The flat projection of the sequence.
    #[must_use]
    pub fn states(&self) -> &[ExecutionState] {
        &self.states
    }

    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_state(&self) -> &ExecutionState {
        &self.states[self.current_index]
    }

    #[must_use]
    pub fn history(&self) -> &[ExecutionState] {
        &self.states[..self.current_index]
    }

    #[must_use]
    pub fn next_states(&self) -> &[ExecutionState] {
        &self.states[self.current_index + 1..]
    }

    #[must_use]
    pub fn upcoming_next(&self) -> Option<&ExecutionState> {
        self.states.get(self.current_index + 1)
    }

    #[must_use]
    pub fn is_at_start(&self) -> bool {
        self.current_index == 0
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.current_index == self.states.len() - 1
    }

    /// The state following the rest at `index`, or `None` if there is no rest at `index`.
    #[must_use]
    pub fn state_after_rest(&self, index: usize) -> Option<&ExecutionState> {
        match self.states.get(index) {
            Some(ExecutionState::Rest(_)) => self.states.get(index + 1),
            _ => None,
        }
    }

    pub fn find_next_index(&self, predicate: impl Fn(&ExecutionState) -> bool) -> Option<usize> {
        query::find_next_index(&self.states, self.current_index, predicate)
    }

    pub fn find_previous_index(
        &self,
        predicate: impl Fn(&ExecutionState) -> bool,
    ) -> Option<usize> {
        query::find_previous_index(&self.states, self.current_index, predicate)
    }

    #[must_use]
    pub fn set_ids(&self) -> Vec<SetID> {
        query::ordered_unique_set_ids(self.states.iter())
    }

    #[must_use]
    pub fn logical_set_ids(&self) -> Vec<SetID> {
        query::ordered_unique_logical_set_ids(self.states.iter())
    }

    #[must_use]
    pub fn next(&self) -> Self {
        if self.is_completed() {
            return self.clone();
        }
        self.at(self.current_index + 1)
    }

    #[must_use]
    pub fn undo(&self) -> Self {
        if self.is_at_start() {
            return self.clone();
        }
        self.at(self.current_index - 1)
    }

    /// Moves to the first following state matching `predicate`, or to the last state.
    #[must_use]
    pub fn skip_until(&self, predicate: impl Fn(&ExecutionState) -> bool) -> Self {
        let index = self
            .find_next_index(predicate)
            .unwrap_or(self.states.len() - 1);
        self.at(index)
    }

    /// Moves to the first state with the given set id at or after the current position.
    #[must_use]
    pub fn reposition_to_set_id(&self, set_id: SetID) -> Self {
        match self
            .states
            .iter()
            .enumerate()
            .skip(self.current_index)
            .find(|(_, state)| state.set_id() == Some(set_id))
        {
            Some((index, _)) => self.at(index),
            None => {
                debug!("set {set_id:?} not found at or after index {}", self.current_index);
                self.clone()
            }
        }
    }

    /// Inserts `states` into the container of an exercise.
    ///
    /// `after_flat_index_in_container` is relative to the first state of the container. If it
    /// points inside a block, the block grows. Otherwise the states are added as normal items
    /// after the child item at that position. Without a position, the states are appended to an
    /// exercise or placed after the last state of the exercise in a superset.
    ///
    /// If the states end up at or before the current position, the position moves along so that
    /// the current state stays the same.
    pub fn insert_states_into_exercise(
        &self,
        exercise_id: ExerciseID,
        states: Vec<ExecutionState>,
        after_flat_index_in_container: Option<usize>,
    ) -> Result<Self, NavigationError> {
        if states.is_empty() {
            return Ok(self.clone());
        }

        let container_index = self
            .sequence
            .iter()
            .position(|item| {
                matches!(
                    item,
                    SequenceItem::Container(Container::Exercise(exercise))
                        if exercise.exercise_id == exercise_id
                )
            })
            .or_else(|| {
                self.sequence.iter().position(|item| {
                    matches!(item, SequenceItem::Container(Container::Superset(_)))
                        && item.states().any(|s| s.exercise_id() == Some(exercise_id))
                })
            })
            .ok_or(NavigationError::ExerciseNotFound(exercise_id))?;

        let container_offset = self.container_offset(container_index);
        let inserted_count = states.len();
        let mut sequence = self.sequence.to_vec();

        let after = match after_flat_index_in_container {
            Some(index) if index >= sequence[container_index].len() => {
                warn!("insertion point {index} exceeds container of {exercise_id:?}, appending");
                None
            }
            after => after,
        };

        let local_index = match &mut sequence[container_index] {
            SequenceItem::Container(Container::Exercise(exercise)) => match after {
                Some(index) => {
                    let (child_index, within) = locate_child(&exercise.child_items, index);
                    let inside_block = within + 1 < exercise.child_items[child_index].len();
                    if let (true, Some(block)) = (
                        inside_block,
                        exercise.child_items[child_index].block_states_mut(),
                    ) {
                        insert_at(block, within + 1, states);
                    } else {
                        insert_at(
                            &mut exercise.child_items,
                            child_index + 1,
                            states.into_iter().map(ChildItem::Normal),
                        );
                    }
                    index + 1
                }
                None => {
                    let len = exercise.len();
                    exercise
                        .child_items
                        .extend(states.into_iter().map(ChildItem::Normal));
                    len
                }
            },
            SequenceItem::Container(Container::Superset(superset)) => {
                let position = match after {
                    Some(index) => index + 1,
                    None => superset
                        .child_states
                        .iter()
                        .rposition(|s| s.exercise_id() == Some(exercise_id))
                        .map_or(superset.child_states.len(), |index| index + 1),
                };
                insert_at(&mut superset.child_states, position, states);
                position
            }
            SequenceItem::RestBetweenExercises(_) => {
                unreachable!("container search only matches exercises and supersets")
            }
        };

        let inserted_at = container_offset + local_index;
        let current_index = if inserted_at <= self.current_index {
            self.current_index + inserted_count
        } else {
            self.current_index
        };
        debug!(
            "inserted {inserted_count} states for exercise {exercise_id:?} at index {inserted_at}"
        );

        Self::from_sequence(sequence, current_index)
    }

    /// Inverse of flattening. `None` for rests between exercises and for indices out of range.
    #[must_use]
    pub fn get_container_and_child_index(&self, flat_index: usize) -> Option<ContainerPosition> {
        let mut offset = 0;
        for (container_index, item) in self.sequence.iter().enumerate() {
            let len = item.len();
            if flat_index < offset + len {
                let local_index = flat_index - offset;
                return match item {
                    SequenceItem::Container(Container::Exercise(exercise)) => {
                        let (child_index, index_within_child) =
                            locate_child(&exercise.child_items, local_index);
                        Some(ContainerPosition {
                            container_index,
                            child_index,
                            index_within_child,
                        })
                    }
                    SequenceItem::Container(Container::Superset(_)) => Some(ContainerPosition {
                        container_index,
                        child_index: local_index,
                        index_within_child: 0,
                    }),
                    SequenceItem::RestBetweenExercises(_) => None,
                };
            }
            offset += len;
        }
        None
    }

    pub fn update_current_state(&self, new_state: ExecutionState) -> Result<Self, NavigationError> {
        let sequence =
            sequence::update_at_flat_index(&self.sequence, self.current_index, new_state)?;
        Self::from_sequence(sequence, self.current_index)
    }

    /// Replaces every set whose id is a key of `replacements`.
    ///
    /// Both halves of a unilateral set share one id and are replaced alike.
    pub fn replace_by_set_id(
        &self,
        replacements: &HashMap<SetID, ExecutionState>,
    ) -> Result<Self, NavigationError> {
        let sequence = sequence::replace_states_by_id(
            &self.sequence,
            |state| match state {
                ExecutionState::Set(set) => Some(set.planned.id),
                _ => None,
            },
            replacements,
        );
        Self::from_sequence(sequence, self.current_index)
    }

    /// Applies `f` to every state of an exercise. `f` receives the flat index of the state.
    pub fn map_states_for_exercise(
        &self,
        exercise_id: ExerciseID,
        mut f: impl FnMut(usize, &ExecutionState) -> ExecutionState,
    ) -> Result<Self, NavigationError> {
        let sequence = sequence::map_states_indexed(&self.sequence, |index, state| {
            if state.exercise_id() == Some(exercise_id) {
                f(index, state)
            } else {
                state.clone()
            }
        });
        Self::from_sequence(sequence, self.current_index)
    }

    /// Replaces all states of an exercise container, keeping its blocks.
    ///
    /// `flat_states` must hold exactly as many states as the container.
    pub fn replace_exercise_states(
        &self,
        container_index: usize,
        flat_states: Vec<ExecutionState>,
    ) -> Result<Self, NavigationError> {
        let mut sequence = self.sequence.to_vec();
        match sequence.get_mut(container_index) {
            Some(SequenceItem::Container(Container::Exercise(exercise))) => {
                exercise.child_items =
                    sequence::rebuild_child_items_from_flat(&exercise.child_items, flat_states)?;
            }
            Some(_) => return Err(NavigationError::NotAnExercise(container_index)),
            None => return Err(NavigationError::ContainerNotFound(container_index)),
        }
        Self::from_sequence(sequence, self.current_index)
    }

    /// Replaces a whole child item of an exercise.
    ///
    /// A position behind the item moves along with a change of its size, like an insertion does.
    /// A position inside the item stays at its offset, limited to the new size.
    pub fn update_exercise_child_item(
        &self,
        container_index: usize,
        child_index: usize,
        child_item: ChildItem,
    ) -> Result<Self, NavigationError> {
        let mut sequence = self.sequence.to_vec();
        let start = self.container_offset(container_index);
        let (start, old_len, new_len) = match sequence.get_mut(container_index) {
            Some(SequenceItem::Container(Container::Exercise(exercise))) => {
                let child_offset = exercise
                    .child_items
                    .iter()
                    .take(child_index)
                    .map(ChildItem::len)
                    .sum::<usize>();
                match exercise.child_items.get_mut(child_index) {
                    Some(item) => {
                        let old_len = item.len();
                        let new_len = child_item.len();
                        *item = child_item;
                        (start + child_offset, old_len, new_len)
                    }
                    None => {
                        return Err(NavigationError::ChildItemNotFound {
                            container_index,
                            child_index,
                        });
                    }
                }
            }
            Some(_) => return Err(NavigationError::NotAnExercise(container_index)),
            None => return Err(NavigationError::ContainerNotFound(container_index)),
        };
        self.rebuild(sequence, self.shifted_index(start, old_len, new_len))
    }

    /// Replaces the states of a superset. The position is adjusted as in
    /// [`WorkoutStateMachine::update_exercise_child_item`].
    pub fn update_superset_child_states(
        &self,
        container_index: usize,
        child_states: Vec<ExecutionState>,
    ) -> Result<Self, NavigationError> {
        let mut sequence = self.sequence.to_vec();
        let start = self.container_offset(container_index);
        let (old_len, new_len) = match sequence.get_mut(container_index) {
            Some(SequenceItem::Container(Container::Superset(superset))) => {
                let old_len = superset.child_states.len();
                let new_len = child_states.len();
                superset.child_states = child_states;
                (old_len, new_len)
            }
            Some(_) => return Err(NavigationError::NotASuperset(container_index)),
            None => return Err(NavigationError::ContainerNotFound(container_index)),
        };
        self.rebuild(sequence, self.shifted_index(start, old_len, new_len))
    }

    fn container_offset(&self, container_index: usize) -> usize {
        self.sequence
            .iter()
            .take(container_index)
            .map(SequenceItem::len)
            .sum()
    }

    /// Current index after the `old_len` states at `start` were replaced by `new_len` states.
    fn shifted_index(&self, start: usize, old_len: usize, new_len: usize) -> usize {
        let current = self.current_index;
        if current >= start + old_len {
            current - old_len + new_len
        } else if current >= start {
            start + (current - start).min(new_len.saturating_sub(1))
        } else {
            current
        }
    }
}

/// Child item containing `local_index` and the offset inside it.
fn locate_child(child_items: &[ChildItem], local_index: usize) -> (usize, usize) {
    let mut offset = 0;
    for (child_index, child) in child_items.iter().enumerate() {
        if local_index < offset + child.len() {
            return (child_index, local_index - offset);
        }
        offset += child.len();
    }
    unreachable!("local index {local_index} exceeds container of {offset} states")
}

fn insert_at<T>(items: &mut Vec<T>, position: usize, new_items: impl IntoIterator<Item = T>) {
    let tail = items.split_off(position);
    items.extend(new_items);
    items.extend(tail);
}
