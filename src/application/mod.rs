//! Application layer - Use cases and orchestration

pub mod clean;
pub mod init;

pub use clean::{resolve_settings, CleanOptions, CleanReport, CleanService, SettingsOverrides};
pub use init::InitService;
