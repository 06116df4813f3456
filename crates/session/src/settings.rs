#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Continue at the checkpointed state instead of the first state after a restart.
    pub resume_on_restart: bool,
    /// Checkpoint rests between the halves of a unilateral set as rests.
    pub checkpoint_intra_set_rests: bool,
    /// Maximum number of retained log entries.
    pub log_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resume_on_restart: true,
            checkpoint_intra_set_rests: false,
            log_capacity: 100,
        }
    }
}
