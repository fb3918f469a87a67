//! petal-status
//!
//! Order status / assignment control for one card: pure transition
//! planning, the per-card update session, and the async persistence
//! collaborator it submits to.

pub mod controller;
pub mod session;
mod updater;

pub use controller::{plan, CardAction};
pub use session::{CardError, CardSession, SessionState};
pub use updater::OrderUpdater;
