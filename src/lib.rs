//! dirwatcher - poll a directory and report lines containing a magic string.

pub mod config;
pub mod display;
pub mod shutdown;
pub mod watcher;
