//! Per-card update session.
//!
//! # States
//!
//! ```text
//!            begin(action)              settle(Ok)
//!   Idle ───────────────────► Updating ───────────► Idle (patch applied)
//!    ▲                          │
//!    │        settle(Err)       │
//!    └──────────────────────────┘  (notes draft reverted)
//! ```
//!
//! While `Updating`, every control on the card is disabled and a second
//! `begin` is refused with [`CardError::Busy`]. Status and assignment are
//! never applied optimistically; only the notes draft is, and only the
//! notes draft is reverted on failure.

use petal_schemas::{OrderRecord, OrderUpdate};

use crate::controller::{plan, CardAction};
use crate::updater::OrderUpdater;

// ---------------------------------------------------------------------------
// CardError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    /// An update for this card is still outstanding.
    Busy { order_id: String },
    /// `settle` called with nothing in flight.
    NotUpdating { order_id: String },
    /// The collaborator rejected the update; local edits were reverted.
    UpdateFailed { order_id: String, reason: String },
}

impl std::fmt::Display for CardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardError::Busy { order_id } => {
                write!(f, "CARD_BUSY: order {order_id} has an update in flight")
            }
            CardError::NotUpdating { order_id } => {
                write!(f, "CARD_NOT_UPDATING: order {order_id} has no update in flight")
            }
            CardError::UpdateFailed { order_id, reason } => {
                write!(f, "CARD_UPDATE_FAILED: order {order_id}: {reason}")
            }
        }
    }
}

impl std::error::Error for CardError {}

// ---------------------------------------------------------------------------
// CardSession
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Updating { pending: OrderUpdate },
}

#[derive(Debug, Clone)]
pub struct CardSession {
    snapshot: OrderRecord,
    state: SessionState,
    notes_draft: String,
    notes_known_good: String,
}

impl CardSession {
    pub fn new(snapshot: OrderRecord) -> Self {
        let notes = snapshot.notes.clone().unwrap_or_default();
        Self {
            snapshot,
            state: SessionState::Idle,
            notes_draft: notes.clone(),
            notes_known_good: notes,
        }
    }

    pub fn snapshot(&self) -> &OrderRecord {
        &self.snapshot
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_updating(&self) -> bool {
        matches!(self.state, SessionState::Updating { .. })
    }

    pub fn controls_enabled(&self) -> bool {
        !self.is_updating()
    }

    pub fn notes_draft(&self) -> &str {
        &self.notes_draft
    }

    /// Operator typing into the notes editor.
    pub fn edit_notes(&mut self, text: impl Into<String>) {
        self.notes_draft = text.into();
    }

    /// Plan `action` and enter `Updating`. Returns the update to submit.
    pub fn begin(&mut self, action: CardAction) -> Result<OrderUpdate, CardError> {
        if self.is_updating() {
            tracing::debug!(order_id = %self.snapshot.id, action = action.name(), "card busy");
            return Err(CardError::Busy {
                order_id: self.snapshot.id.clone(),
            });
        }
        if let CardAction::SaveNotes { notes } = &action {
            self.notes_draft = notes.clone();
        }
        let update = OrderUpdate {
            order_id: self.snapshot.id.clone(),
            patch: plan(&self.snapshot, &action),
        };
        self.state = SessionState::Updating {
            pending: update.clone(),
        };
        Ok(update)
    }

    /// Record the collaborator's verdict for the in-flight update.
    pub fn settle(&mut self, outcome: anyhow::Result<()>) -> Result<(), CardError> {
        let pending = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Updating { pending } => pending,
            SessionState::Idle => {
                return Err(CardError::NotUpdating {
                    order_id: self.snapshot.id.clone(),
                })
            }
        };

        match outcome {
            Ok(()) => {
                pending.patch.apply_to(&mut self.snapshot);
                if let Some(notes) = &pending.patch.notes {
                    self.notes_known_good = notes.clone();
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    order_id = %pending.order_id,
                    error = %err,
                    "order update failed; reverting local edits"
                );
                self.notes_draft = self.notes_known_good.clone();
                Err(CardError::UpdateFailed {
                    order_id: pending.order_id,
                    reason: format!("{err:#}"),
                })
            }
        }
    }

    /// begin → update_order → settle.
    pub async fn submit(
        &mut self,
        action: CardAction,
        updater: &dyn OrderUpdater,
    ) -> Result<(), CardError> {
        let update = self.begin(action)?;
        let outcome = updater.update_order(&update).await;
        self.settle(outcome)
    }

    /// Fresh snapshot from the realtime feed. The notes draft follows it only
    /// while idle, so an in-flight edit is not clobbered.
    pub fn refresh(&mut self, snapshot: OrderRecord) {
        let notes = snapshot.notes.clone().unwrap_or_default();
        self.notes_known_good = notes.clone();
        if !self.is_updating() {
            self.notes_draft = notes;
        }
        self.snapshot = snapshot;
    }
}
