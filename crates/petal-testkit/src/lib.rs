//! petal-testkit
//!
//! Fixtures and collaborator doubles for scenario tests. Never a
//! `[dependencies]` entry of a production crate.

pub mod fixtures;
mod updater;

pub use fixtures::*;
pub use updater::{AlwaysFailing, RecordingUpdater, ScriptedUpdater};
