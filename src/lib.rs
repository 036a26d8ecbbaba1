//! Pingbeat - periodic HTTP liveness pinger

pub mod config;
pub mod error;
pub mod fetch;
pub mod heartbeat;

pub use config::PingConfig;
pub use error::{BeatError, Result};
pub use heartbeat::HeartbeatService;
