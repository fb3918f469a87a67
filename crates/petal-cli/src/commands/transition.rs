//! `petal transition`: print the `OrderUpdate` a card control would submit.
//!
//! Planning only. Nothing is persisted.

use anyhow::{Context, Result};
use tracing::info;

use petal_schemas::{OrderStatus, OrderUpdate};
use petal_status::{plan, CardAction};

use super::load_order;

/// Map the mutually exclusive CLI flags onto one card action.
pub fn action_from_flags(
    status: Option<&str>,
    user: Option<String>,
    assign: Option<String>,
    unassign: bool,
    notes: Option<String>,
) -> Result<CardAction> {
    if let Some(raw) = status {
        let status = OrderStatus::parse(raw).ok_or_else(|| {
            anyhow::anyhow!(
                "invalid --status '{}'. expected one of: unassigned | assigned | completed",
                raw
            )
        })?;
        return Ok(CardAction::SetStatus {
            status,
            acting_user: user,
        });
    }
    if unassign {
        return Ok(CardAction::Reassign { assignee: None });
    }
    if let Some(assignee) = assign {
        return Ok(CardAction::Reassign {
            assignee: Some(assignee),
        });
    }
    match notes {
        Some(notes) => Ok(CardAction::SaveNotes { notes }),
        None => anyhow::bail!("one of --status, --assign, --unassign or --notes is required"),
    }
}

pub fn run(order_path: &str, action: CardAction) -> Result<()> {
    let order = load_order(order_path)?;
    let update = OrderUpdate {
        order_id: order.id.clone(),
        patch: plan(&order, &action),
    };
    info!(order_id = %update.order_id, action = action.name(), "card action planned");

    let json = serde_json::to_string_pretty(&update).context("serialize order update failed")?;
    println!("{json}");
    Ok(())
}
