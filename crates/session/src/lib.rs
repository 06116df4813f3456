#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod checkpoint;
pub mod controller;
pub mod log;
pub mod settings;

pub use checkpoint::{CheckpointError, CheckpointRepository, SessionCheckpoint};
pub use controller::{SessionController, SessionError};
pub use settings::{Settings, SettingsRepository};
