//! Ownership of the running workout.
//!
//! The controller holds the only writable machine. Every transition replaces it
//! as a whole, so snapshots handed out earlier keep describing the position
//! they were taken at.

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use stride_domain::{
    Checkpoint, ExecutionState, NavigationError, RecoveryTier, SequenceItem, WorkoutStateMachine,
    resolve_checkpoint, sequence,
};

use crate::{
    checkpoint::{CheckpointError, CheckpointRepository, SessionCheckpoint},
    settings::Settings,
};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error("failed to store checkpoint: {0}")]
    Storage(String),
}

#[derive(Debug, Clone)]
pub struct SessionController {
    workout_id: u128,
    started_at: DateTime<Utc>,
    state_started_at: DateTime<Utc>,
    machine: WorkoutStateMachine,
    settings: Settings,
}

impl SessionController {
    pub fn start(
        workout_id: u128,
        sequence: Vec<SequenceItem>,
        settings: Settings,
    ) -> Result<Self, SessionError> {
        let machine = WorkoutStateMachine::from_sequence(sequence, 0).inspect_err(|err| {
            error!("failed to start workout {workout_id}: {err}");
        })?;
        let now = Utc::now();
        info!(
            "started workout {workout_id} with {} states",
            machine.state_count()
        );
        Ok(Self {
            workout_id,
            started_at: now,
            state_started_at: now,
            machine,
            settings,
        })
    }

    /// Continues a workout from a persisted checkpoint on a freshly built sequence.
    pub fn resume(
        sequence: Vec<SequenceItem>,
        record: &SessionCheckpoint,
        settings: Settings,
    ) -> Result<Self, SessionError> {
        let (index, tier) = if settings.resume_on_restart {
            let checkpoint = Checkpoint::try_from(record).inspect_err(|err| {
                error!("failed to decode checkpoint of workout {}: {err}", record.workout_id);
            })?;
            let resolved = resolve_checkpoint(&sequence::flatten(&sequence), &checkpoint);
            (resolved.index, resolved.tier)
        } else {
            (0, RecoveryTier::FirstState)
        };

        let machine = WorkoutStateMachine::from_sequence(sequence, index).inspect_err(|err| {
            error!("failed to resume workout {}: {err}", record.workout_id);
        })?;
        info!(
            "resumed workout {} at index {index} ({tier:?})",
            record.workout_id
        );

        Ok(Self {
            workout_id: record.workout_id,
            started_at: record.started_at,
            state_started_at: if tier == RecoveryTier::Exact {
                record.state_started_at
            } else {
                Utc::now()
            },
            machine,
            settings,
        })
    }

    #[must_use]
    pub fn workout_id(&self) -> u128 {
        self.workout_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn state_started_at(&self) -> DateTime<Utc> {
        self.state_started_at
    }

    #[must_use]
    pub fn machine(&self) -> &WorkoutStateMachine {
        &self.machine
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.settings
    }

    #[must_use]
    pub fn snapshot(&self) -> WorkoutStateMachine {
        self.machine.clone()
    }

    /// Replaces the machine with the result of `op`, keeping the current one on error.
    pub fn apply(
        &mut self,
        op: impl FnOnce(&WorkoutStateMachine) -> Result<WorkoutStateMachine, NavigationError>,
    ) -> Result<(), SessionError> {
        match op(&self.machine) {
            Ok(machine) => {
                self.replace(machine);
                Ok(())
            }
            Err(err) => {
                error!("failed to update workout {}: {err}", self.workout_id);
                Err(err.into())
            }
        }
    }

    pub fn next(&mut self) {
        self.replace(self.machine.next());
    }

    pub fn undo(&mut self) {
        self.replace(self.machine.undo());
    }

    fn replace(&mut self, machine: WorkoutStateMachine) {
        if machine.current_index() != self.machine.current_index()
            || machine.current_state() != self.machine.current_state()
        {
            self.state_started_at = Utc::now();
        }
        self.machine = machine;
    }

    /// Describes the current position for persistence.
    #[must_use]
    pub fn checkpoint(&self) -> Option<SessionCheckpoint> {
        let state = match self.machine.current_state() {
            ExecutionState::Rest(rest)
                if rest.is_intra_set && !self.settings.checkpoint_intra_set_rests =>
            {
                self.machine
                    .find_previous_index(|state| matches!(state, ExecutionState::Set(_)))
                    .map_or(self.machine.current_state(), |index| {
                        &self.machine.states()[index]
                    })
            }
            state => state,
        };
        let checkpoint = Checkpoint::from_state(state)?;
        Some(SessionCheckpoint::new(
            self.workout_id,
            self.started_at,
            &checkpoint,
            self.state_started_at,
        ))
    }

    pub async fn save(&self, repository: &impl CheckpointRepository) -> Result<(), SessionError> {
        let checkpoint = self.checkpoint();
        if checkpoint.is_none() {
            debug!("no checkpoint for state {}", self.machine.current_state().name());
        }
        repository
            .write_checkpoint(checkpoint)
            .await
            .map_err(|err| {
                error!("failed to save workout {}: {err}", self.workout_id);
                SessionError::Storage(err)
            })
    }
}
