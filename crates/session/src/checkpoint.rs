use chrono::{DateTime, Utc};
use stride_domain::{Checkpoint, CheckpointStateType};

#[allow(async_fn_in_trait)]
pub trait CheckpointRepository {
    async fn read_checkpoint(&self) -> Result<Option<SessionCheckpoint>, String>;
    async fn write_checkpoint(&self, checkpoint: Option<SessionCheckpoint>) -> Result<(), String>;
}

/// Persisted position of an ongoing workout.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionCheckpoint {
    pub workout_id: u128,
    pub started_at: DateTime<Utc>,
    pub state_type: String,
    pub exercise_id: Option<u128>,
    pub set_id: Option<u128>,
    pub set_index: Option<u32>,
    pub rest_order: Option<u32>,
    pub state_started_at: DateTime<Utc>,
}

impl SessionCheckpoint {
    #[must_use]
    pub fn new(
        workout_id: u128,
        started_at: DateTime<Utc>,
        checkpoint: &Checkpoint,
        state_started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            workout_id,
            started_at,
            state_type: checkpoint.state_type.to_string(),
            exercise_id: checkpoint.exercise_id.map(u128::from),
            set_id: checkpoint.set_id.map(u128::from),
            set_index: checkpoint.set_index,
            rest_order: checkpoint.rest_order,
            state_started_at,
        }
    }
}

impl TryFrom<&SessionCheckpoint> for Checkpoint {
    type Error = CheckpointError;

    fn try_from(value: &SessionCheckpoint) -> Result<Self, Self::Error> {
        let state_type = value
            .state_type
            .parse::<CheckpointStateType>()
            .map_err(|_| CheckpointError::UnknownStateType(value.state_type.clone()))?;
        Ok(Checkpoint {
            state_type,
            exercise_id: value.exercise_id.map(Into::into),
            set_id: value.set_id.map(Into::into),
            set_index: value.set_index,
            rest_order: value.rest_order,
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("unknown state type: {0}")]
    UnknownStateType(String),
}
