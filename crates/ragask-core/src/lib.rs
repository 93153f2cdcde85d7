//! ragask core: settings, environment loading and the shared error type.

pub mod config;
pub mod error;

pub use config::{load_dotenv, ConfigReport, ServerConfig, Settings, SettingsSource};
pub use error::{Error, Result};
