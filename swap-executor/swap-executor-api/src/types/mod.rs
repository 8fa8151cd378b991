//! API type definitions for the aggregator backend and the persisted history

pub mod config;
pub mod exchange;
pub mod history;
