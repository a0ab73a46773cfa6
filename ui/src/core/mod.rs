//! Platform-agnostic building blocks: settings, formatting, persistence and timing.

pub mod collections;
pub mod config;
pub mod csv;
pub mod error;
pub mod format;
pub mod platform;
pub mod storage;
pub mod timing;
