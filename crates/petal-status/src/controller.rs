//! Status / assignment transition planning.
//!
//! Any status is reachable from any other. The only rules are the side
//! effects on `assignedTo`:
//!
//! | Action | status | assignedTo |
//! |---|---|---|
//! | status → assigned / completed, acting user known | as chosen | acting user (auto-claim) |
//! | status → assigned / completed, no acting user | as chosen | unchanged |
//! | status → unassigned | unassigned | cleared |
//! | selector, non-empty assignee | assigned | assignee |
//! | selector, empty assignee | unassigned | cleared |
//!
//! [`plan`] is pure; it never touches the order it reads.

use serde::{Deserialize, Serialize};

use petal_schemas::{OrderPatch, OrderRecord, OrderStatus};

/// One operator action on a card's controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CardAction {
    /// Status buttons.
    SetStatus {
        status: OrderStatus,
        #[serde(default, rename = "actingUser", skip_serializing_if = "Option::is_none")]
        acting_user: Option<String>,
    },
    /// Assignee selector. `None` or blank means "nobody".
    Reassign {
        #[serde(default)]
        assignee: Option<String>,
    },
    /// Notes editor.
    SaveNotes { notes: String },
}

impl CardAction {
    pub fn name(&self) -> &'static str {
        match self {
            CardAction::SetStatus { .. } => "set_status",
            CardAction::Reassign { .. } => "reassign",
            CardAction::SaveNotes { .. } => "save_notes",
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Patch to submit for `action` on `order`.
pub fn plan(order: &OrderRecord, action: &CardAction) -> OrderPatch {
    let patch = match action {
        CardAction::SetStatus {
            status: OrderStatus::Unassigned,
            ..
        } => OrderPatch {
            status: Some(OrderStatus::Unassigned),
            assigned_to: Some(None),
            ..OrderPatch::default()
        },
        CardAction::SetStatus {
            status,
            acting_user,
        } => OrderPatch {
            status: Some(*status),
            assigned_to: non_blank(acting_user.as_deref()).map(Some),
            ..OrderPatch::default()
        },
        CardAction::Reassign { assignee } => match non_blank(assignee.as_deref()) {
            Some(who) => OrderPatch {
                status: Some(OrderStatus::Assigned),
                assigned_to: Some(Some(who)),
                ..OrderPatch::default()
            },
            None => OrderPatch {
                status: Some(OrderStatus::Unassigned),
                assigned_to: Some(None),
                ..OrderPatch::default()
            },
        },
        CardAction::SaveNotes { notes } => OrderPatch {
            notes: Some(notes.clone()),
            ..OrderPatch::default()
        },
    };

    tracing::debug!(
        order_id = %order.id,
        action = action.name(),
        from = order.status.as_str(),
        to = patch.status.map(|s| s.as_str()).unwrap_or(order.status.as_str()),
        "planned card update"
    );
    patch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: OrderStatus, assignee: Option<&str>) -> OrderRecord {
        let mut o = OrderRecord::new("o1");
        o.status = status;
        o.assigned_to = assignee.map(str::to_string);
        o
    }

    fn set_status(status: OrderStatus, user: Option<&str>) -> CardAction {
        CardAction::SetStatus {
            status,
            acting_user: user.map(str::to_string),
        }
    }

    #[test]
    fn assigning_auto_claims_for_acting_user() {
        let p = plan(
            &order(OrderStatus::Unassigned, None),
            &set_status(OrderStatus::Assigned, Some("U42")),
        );
        assert_eq!(p.status, Some(OrderStatus::Assigned));
        assert_eq!(p.assigned_to, Some(Some("U42".to_string())));
    }

    #[test]
    fn completing_claims_even_when_someone_else_held_it() {
        let p = plan(
            &order(OrderStatus::Assigned, Some("U7")),
            &set_status(OrderStatus::Completed, Some("U42")),
        );
        assert_eq!(p.status, Some(OrderStatus::Completed));
        assert_eq!(p.assigned_to, Some(Some("U42".to_string())));
    }

    #[test]
    fn no_acting_user_changes_status_only() {
        let p = plan(
            &order(OrderStatus::Assigned, Some("U7")),
            &set_status(OrderStatus::Completed, None),
        );
        assert_eq!(p.status, Some(OrderStatus::Completed));
        assert_eq!(p.assigned_to, None);
    }

    #[test]
    fn unassigning_clears_assignee() {
        let p = plan(
            &order(OrderStatus::Completed, Some("U7")),
            &set_status(OrderStatus::Unassigned, Some("U42")),
        );
        assert_eq!(p.status, Some(OrderStatus::Unassigned));
        assert_eq!(p.assigned_to, Some(None));
    }

    #[test]
    fn selector_drives_status_from_assignee() {
        for prior in [
            OrderStatus::Unassigned,
            OrderStatus::Assigned,
            OrderStatus::Completed,
        ] {
            let o = order(prior, Some("U7"));
            for blank in [None, Some(""), Some("   ")] {
                let p = plan(
                    &o,
                    &CardAction::Reassign {
                        assignee: blank.map(str::to_string),
                    },
                );
                assert_eq!(p.status, Some(OrderStatus::Unassigned), "prior {prior:?}");
                assert_eq!(p.assigned_to, Some(None));
            }
            let p = plan(
                &o,
                &CardAction::Reassign {
                    assignee: Some("U9".into()),
                },
            );
            assert_eq!(p.status, Some(OrderStatus::Assigned));
            assert_eq!(p.assigned_to, Some(Some("U9".to_string())));
        }
    }

    #[test]
    fn notes_touch_nothing_else() {
        let p = plan(
            &order(OrderStatus::Assigned, Some("U7")),
            &CardAction::SaveNotes {
                notes: "ring twice".into(),
            },
        );
        assert_eq!(p.status, None);
        assert_eq!(p.assigned_to, None);
        assert_eq!(p.notes.as_deref(), Some("ring twice"));
    }

    #[test]
    fn action_wire_format() {
        let a: CardAction = serde_json::from_str(
            r#"{ "kind": "setStatus", "status": "completed", "actingUser": "U42" }"#,
        )
        .unwrap();
        assert_eq!(a, set_status(OrderStatus::Completed, Some("U42")));
        let r: CardAction = serde_json::from_str(r#"{ "kind": "reassign" }"#).unwrap();
        assert_eq!(r, CardAction::Reassign { assignee: None });
    }
}
