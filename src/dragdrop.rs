//! Drag-drop status machine.
//!
//! One drag may be in flight board-wide; the dragged key lives in a single
//! mutable slot. A drop applies the status change to the cache first (the
//! card visibly lands at the tail of its new lane) and persists afterwards.
//! A persist failure is surfaced and logged but the visual move is not
//! rolled back; the next full refresh reconciles.
//!
//! Lane validation happens at the type boundary: anything that parses into
//! a [`Status`] is one of the four lanes.

use tracing::{debug, warn};

use crate::cache::TaskCache;
use crate::error::{Error, Result};
use crate::store::RecordStore;
use crate::task::{Status, TaskPatch};

/// Idle / Dragging slot for the board's single in-flight drag.
#[derive(Debug, Clone, Default)]
pub struct DragMachine {
    dragging: Option<String>,
}

impl DragMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key currently being dragged, if any.
    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    /// Start dragging `key`. Fails while another drag is in flight or when
    /// the key is not on the board.
    pub fn begin(&mut self, cache: &TaskCache, key: &str) -> Result<()> {
        if let Some(current) = &self.dragging {
            return Err(Error::DragInFlight(current.clone()));
        }
        if cache.find_by_key(key).is_none() {
            return Err(Error::State(key.to_string()));
        }
        self.dragging = Some(key.to_string());
        Ok(())
    }

    /// Abort the gesture (drop outside any lane). The cache is untouched.
    pub fn cancel(&mut self) {
        self.dragging = None;
    }

    /// Drop the dragged card on `lane`.
    ///
    /// The cache change is applied optimistically before the store call;
    /// on store failure the error propagates but the move stays visible.
    /// The drag slot clears in every outcome.
    pub async fn drop_on(
        &mut self,
        cache: &mut TaskCache,
        store: &dyn RecordStore,
        lane: Status,
    ) -> Result<()> {
        let key = self
            .dragging
            .take()
            .ok_or_else(|| Error::State("no drag in flight".to_string()))?;

        let task = cache
            .find_by_key_mut(&key)
            .ok_or_else(|| Error::State(key.clone()))?;
        task.status = lane;
        cache.move_to_end(&key);
        debug!(key = %key, lane = %lane, "drop applied to cache");

        if let Err(err) = store.patch(&key, &TaskPatch::status_only(lane)).await {
            warn!(key = %key, lane = %lane, error = %err, "drop did not persist");
            return Err(err);
        }
        Ok(())
    }
}
