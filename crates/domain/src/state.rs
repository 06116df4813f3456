use chrono::{DateTime, Utc};

use crate::{ExerciseID, RIR, Reps, SetID, SupersetID, Weight};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetKind {
    WarmUp,
    Work,
    Calibration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Payload of a set, either prescribed by the planner or entered by the user.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SetData {
    pub reps: Option<Reps>,
    pub weight: Option<Weight>,
    /// Seconds
    pub time: Option<u32>,
    pub rir: Option<RIR>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedSet {
    pub id: SetID,
    pub kind: SetKind,
    pub target: SetData,
}

impl PlannedSet {
    #[must_use]
    pub fn new(id: SetID, kind: SetKind, target: SetData) -> Self {
        Self { id, kind, target }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetState {
    pub exercise_id: ExerciseID,
    pub planned: PlannedSet,
    /// Position of the set within its exercise.
    pub set_index: u32,
    /// The corresponding set of the previous session.
    pub previous: Option<SetData>,
    pub current: SetData,
    pub start_time: Option<DateTime<Utc>>,
    pub skipped: bool,
    pub side: Option<Side>,
    pub intra_set_total: Option<u32>,
    pub intra_set_counter: u32,
    /// The load of this set is derived from a calibration that has not been performed yet.
    pub awaits_calibration: bool,
}

impl SetState {
    #[must_use]
    pub fn new(exercise_id: ExerciseID, planned: PlannedSet, set_index: u32) -> Self {
        Self {
            exercise_id,
            current: planned.target,
            planned,
            set_index,
            previous: None,
            start_time: None,
            skipped: false,
            side: None,
            intra_set_total: None,
            intra_set_counter: 0,
            awaits_calibration: false,
        }
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    #[must_use]
    pub fn with_current(mut self, current: SetData) -> Self {
        self.current = current;
        self
    }

    #[must_use]
    pub fn is_calibration_set(&self) -> bool {
        self.planned.kind == SetKind::Calibration
    }

    #[must_use]
    pub fn is_warm_up(&self) -> bool {
        self.planned.kind == SetKind::WarmUp
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestState {
    /// The set this rest follows.
    pub set_id: SetID,
    pub exercise_id: Option<ExerciseID>,
    /// Seconds
    pub time: u32,
    /// Position of the rest within its exercise.
    pub order: u32,
    pub start_time: Option<DateTime<Utc>>,
    /// Rest between unilateral halves or intra-set clusters.
    pub is_intra_set: bool,
}

impl RestState {
    #[must_use]
    pub fn new(set_id: SetID, time: u32, order: u32) -> Self {
        Self {
            set_id,
            exercise_id: None,
            time,
            order,
            start_time: None,
            is_intra_set: false,
        }
    }

    #[must_use]
    pub fn for_exercise(mut self, exercise_id: ExerciseID) -> Self {
        self.exercise_id = Some(exercise_id);
        self
    }

    #[must_use]
    pub fn intra_set(mut self) -> Self {
        self.is_intra_set = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationLoadSelectionState {
    pub exercise_id: ExerciseID,
    pub calibration_set: PlannedSet,
    pub set_index: u32,
    pub previous: Option<SetData>,
    pub selected_weight: Option<Weight>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationRIRSelectionState {
    pub exercise_id: ExerciseID,
    pub calibration_set: PlannedSet,
    pub set_index: u32,
    pub executed: SetData,
    pub rir: Option<RIR>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionState {
    Set(SetState),
    Rest(RestState),
    CalibrationLoadSelection(CalibrationLoadSelectionState),
    CalibrationRIRSelection(CalibrationRIRSelectionState),
    /// Session boundary before the first state. Not navigable.
    Preparing,
    /// Session boundary after the last state. Not navigable.
    Completed,
}

impl ExecutionState {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionState::Set(_) => "Set",
            ExecutionState::Rest(_) => "Rest",
            ExecutionState::CalibrationLoadSelection(_) => "CalibrationLoadSelection",
            ExecutionState::CalibrationRIRSelection(_) => "CalibrationRIRSelection",
            ExecutionState::Preparing => "Preparing",
            ExecutionState::Completed => "Completed",
        }
    }

    #[must_use]
    pub fn is_boundary(&self) -> bool {
        matches!(self, ExecutionState::Preparing | ExecutionState::Completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Normal,
    CalibrationExecution,
    LoadSelection,
    UnilateralSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChildItem {
    Normal(ExecutionState),
    /// Calibration set, optional rest, RIR selection.
    CalibrationExecutionBlock(Vec<ExecutionState>),
    /// Load selection, optional warm-up set, optional rest.
    LoadSelectionBlock(Vec<ExecutionState>),
    /// Left set, optional rest, right set.
    UnilateralSetBlock(Vec<ExecutionState>),
}

impl ChildItem {
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        match self {
            ChildItem::Normal(_) => BlockKind::Normal,
            ChildItem::CalibrationExecutionBlock(_) => BlockKind::CalibrationExecution,
            ChildItem::LoadSelectionBlock(_) => BlockKind::LoadSelection,
            ChildItem::UnilateralSetBlock(_) => BlockKind::UnilateralSet,
        }
    }

    #[must_use]
    pub fn states(&self) -> &[ExecutionState] {
        match self {
            ChildItem::Normal(state) => std::slice::from_ref(state),
            ChildItem::CalibrationExecutionBlock(states)
            | ChildItem::LoadSelectionBlock(states)
            | ChildItem::UnilateralSetBlock(states) => states,
        }
    }

    pub fn states_mut(&mut self) -> &mut [ExecutionState] {
        match self {
            ChildItem::Normal(state) => std::slice::from_mut(state),
            ChildItem::CalibrationExecutionBlock(states)
            | ChildItem::LoadSelectionBlock(states)
            | ChildItem::UnilateralSetBlock(states) => states,
        }
    }

    /// The state list of a multi-state block, `None` for a normal item.
    pub fn block_states_mut(&mut self) -> Option<&mut Vec<ExecutionState>> {
        match self {
            ChildItem::Normal(_) => None,
            ChildItem::CalibrationExecutionBlock(states)
            | ChildItem::LoadSelectionBlock(states)
            | ChildItem::UnilateralSetBlock(states) => Some(states),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states().is_empty()
    }

    #[must_use]
    pub fn into_states(self) -> Vec<ExecutionState> {
        match self {
            ChildItem::Normal(state) => vec![state],
            ChildItem::CalibrationExecutionBlock(states)
            | ChildItem::LoadSelectionBlock(states)
            | ChildItem::UnilateralSetBlock(states) => states,
        }
    }

    /// Maps every state of the item while keeping its kind and cardinality.
    #[must_use]
    pub fn map_states(&self, mut f: impl FnMut(&ExecutionState) -> ExecutionState) -> Self {
        match self {
            ChildItem::Normal(state) => ChildItem::Normal(f(state)),
            ChildItem::CalibrationExecutionBlock(states) => {
                ChildItem::CalibrationExecutionBlock(states.iter().map(f).collect())
            }
            ChildItem::LoadSelectionBlock(states) => {
                ChildItem::LoadSelectionBlock(states.iter().map(f).collect())
            }
            ChildItem::UnilateralSetBlock(states) => {
                ChildItem::UnilateralSetBlock(states.iter().map(f).collect())
            }
        }
    }

    /// Creates an item of the given kind. A normal item must hold exactly one state.
    #[must_use]
    pub fn from_kind(kind: BlockKind, mut states: Vec<ExecutionState>) -> Option<Self> {
        match kind {
            BlockKind::Normal => {
                if states.len() == 1 {
                    states.pop().map(ChildItem::Normal)
                } else {
                    None
                }
            }
            BlockKind::CalibrationExecution => Some(ChildItem::CalibrationExecutionBlock(states)),
            BlockKind::LoadSelection => Some(ChildItem::LoadSelectionBlock(states)),
            BlockKind::UnilateralSet => Some(ChildItem::UnilateralSetBlock(states)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseState {
    pub exercise_id: ExerciseID,
    pub child_items: Vec<ChildItem>,
}

impl ExerciseState {
    #[must_use]
    pub fn new(exercise_id: ExerciseID, child_items: Vec<ChildItem>) -> Self {
        Self {
            exercise_id,
            child_items,
        }
    }

    pub fn states(&self) -> impl Iterator<Item = &ExecutionState> {
        self.child_items.iter().flat_map(ChildItem::states)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.child_items.iter().map(ChildItem::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sets of multiple exercises interleaved round-robin.
#[derive(Debug, Clone, PartialEq)]
pub struct SupersetState {
    pub superset_id: SupersetID,
    pub child_states: Vec<ExecutionState>,
}

impl SupersetState {
    #[must_use]
    pub fn new(superset_id: SupersetID, child_states: Vec<ExecutionState>) -> Self {
        Self {
            superset_id,
            child_states,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    Exercise(ExerciseState),
    Superset(SupersetState),
}

impl Container {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Container::Exercise(exercise) => exercise.len(),
            Container::Superset(superset) => superset.child_states.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn states(&self) -> Box<dyn Iterator<Item = &ExecutionState> + '_> {
        match self {
            Container::Exercise(exercise) => Box::new(exercise.states()),
            Container::Superset(superset) => Box::new(superset.child_states.iter()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SequenceItem {
    Container(Container),
    /// Rest not owned by any single exercise container. Holds an `ExecutionState::Rest`.
    RestBetweenExercises(ExecutionState),
}

impl SequenceItem {
    #[must_use]
    pub fn exercise(exercise_id: ExerciseID, child_items: Vec<ChildItem>) -> Self {
        SequenceItem::Container(Container::Exercise(ExerciseState::new(
            exercise_id,
            child_items,
        )))
    }

    #[must_use]
    pub fn superset(superset_id: SupersetID, child_states: Vec<ExecutionState>) -> Self {
        SequenceItem::Container(Container::Superset(SupersetState::new(
            superset_id,
            child_states,
        )))
    }

    #[must_use]
    pub fn rest_between_exercises(rest: RestState) -> Self {
        SequenceItem::RestBetweenExercises(ExecutionState::Rest(rest))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            SequenceItem::Container(container) => container.len(),
            SequenceItem::RestBetweenExercises(_) => 1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn states(&self) -> Box<dyn Iterator<Item = &ExecutionState> + '_> {
        match self {
            SequenceItem::Container(container) => container.states(),
            SequenceItem::RestBetweenExercises(rest) => Box::new(std::iter::once(rest)),
        }
    }
}
