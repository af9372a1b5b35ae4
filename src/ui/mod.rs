//! UI components for Bindery

pub mod drag;
pub mod drop_zone;
pub mod file_list;
pub mod modal;
