//! Core entity definitions for the learning tracker.
//!
//! This crate defines the task record shared by every storage backend,
//! the sparse patch used for partial updates, and date scheduling helpers.

mod patch;
pub mod schedule;
mod task;

pub use patch::*;
pub use task::*;
