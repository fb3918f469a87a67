//! In-memory `OrderUpdater` doubles.
//!
//! No I/O. Every submitted update is recorded, whether it succeeds or not,
//! so tests can assert on exactly what left the card.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use petal_schemas::OrderUpdate;
use petal_status::OrderUpdater;

/// Accepts every update.
#[derive(Debug, Default)]
pub struct RecordingUpdater {
    seen: Mutex<Vec<OrderUpdate>>,
}

impl RecordingUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> Vec<OrderUpdate> {
        self.seen.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().map(|v| v.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl OrderUpdater for RecordingUpdater {
    async fn update_order(&self, update: &OrderUpdate) -> Result<()> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(update.clone());
        }
        Ok(())
    }
}

/// Replays a fixed script of outcomes, one per call. `Err(msg)` entries
/// fail with that message. Once the script runs out every call succeeds.
#[derive(Debug, Default)]
pub struct ScriptedUpdater {
    script: Mutex<VecDeque<std::result::Result<(), String>>>,
    seen: Mutex<Vec<OrderUpdate>>,
}

impl ScriptedUpdater {
    pub fn new(script: impl IntoIterator<Item = std::result::Result<(), String>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call with `message`.
    pub fn always_failing(message: &str) -> AlwaysFailing {
        AlwaysFailing {
            message: message.to_string(),
        }
    }

    pub fn submitted(&self) -> Vec<OrderUpdate> {
        self.seen.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl OrderUpdater for ScriptedUpdater {
    async fn update_order(&self, update: &OrderUpdate) -> Result<()> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(update.clone());
        }
        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut s| s.pop_front())
            .unwrap_or(Ok(()));
        next.map_err(|msg| anyhow!(msg))
    }
}

#[derive(Debug, Clone)]
pub struct AlwaysFailing {
    message: String,
}

#[async_trait::async_trait]
impl OrderUpdater for AlwaysFailing {
    async fn update_order(&self, update: &OrderUpdate) -> Result<()> {
        Err(anyhow!("{} (order {})", self.message, update.order_id))
    }
}
