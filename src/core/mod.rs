//! Core functionality for file intake, queue management, merging, and configuration

pub mod config;
pub mod intake;
pub mod merge;
pub mod queue;
pub mod ui_state;
