//! debuglog core - Shared constants, configuration, error handling and log events

pub mod config;
pub mod constants;
pub mod error;
pub mod event;

pub use config::*;
pub use constants::*;
pub use error::{Error, Result};
pub use event::{ListenerId, LogBus, LogEvent, LogListener};
