//! HTTP host for the title ranking engine.

pub mod api;
pub mod metrics;
pub mod poller;
pub mod state;
