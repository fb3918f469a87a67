use serde::{Deserialize, Deserializer, Serialize};

use crate::{OrderRecord, OrderStatus};

/// `partial<Order>` submitted to the persistence collaborator.
///
/// `assigned_to` distinguishes "leave alone" (`None`) from "clear"
/// (`Some(None)`, serialized as JSON `null`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub assigned_to: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.assigned_to.is_none() && self.notes.is_none()
    }

    /// Apply a confirmed patch to a local snapshot.
    pub fn apply_to(&self, order: &mut OrderRecord) {
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(assignee) = &self.assigned_to {
            order.assigned_to = assignee.clone();
        }
        if let Some(notes) = &self.notes {
            order.notes = Some(notes.clone());
        }
    }
}

fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// One update submission: which order, and what changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub order_id: String,
    pub patch: OrderPatch,
}
