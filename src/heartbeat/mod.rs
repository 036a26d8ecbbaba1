//! Heartbeat service - the periodic ping loop and its lifecycle.

mod service;

pub use service::HeartbeatService;
