// Panel store - Owns every PanelState and applies completed refreshes
use crate::application::view_builder::PanelOutcome;
use crate::domain::panel::{PanelId, PanelState, PanelStatus, RefreshTrigger};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tokio::sync::broadcast;

const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// A refresh that has been started but not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub panel: PanelId,
    pub seq: u64,
    pub input: Option<String>,
}

#[derive(Debug)]
struct PanelSlot {
    state: PanelState,
    latest_seq: u64,
    applied_seq: u64,
}

/// Per-panel state with last-request-wins semantics.
///
/// Every trigger is numbered when it begins. A completion is applied only if it
/// is newer than the last applied one and was made for the input the panel
/// currently asks for, so a slow response for a superseded input is dropped.
pub struct PanelStore {
    slots: HashMap<PanelId, Mutex<PanelSlot>>,
    updates: broadcast::Sender<PanelState>,
}

impl PanelStore {
    pub fn new(panels: impl IntoIterator<Item = (PanelId, Option<String>)>) -> Self {
        let slots = panels
            .into_iter()
            .map(|(panel, input)| {
                let slot = PanelSlot {
                    state: PanelState::idle(panel, input),
                    latest_seq: 0,
                    applied_seq: 0,
                };
                (panel, Mutex::new(slot))
            })
            .collect();
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);

        Self { slots, updates }
    }

    /// Register a trigger: adopt its input (if any), mark the panel Loading and
    /// hand out the next request number. `None` if the panel is not on this dashboard.
    pub fn begin(&self, trigger: &RefreshTrigger) -> Option<PendingRequest> {
        let slot = self.slots.get(&trigger.panel)?;
        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(input) = trigger.input.as_deref().map(str::trim) {
            if !input.is_empty() && slot.state.input.as_deref() != Some(input) {
                // Data for the previous input must not be shown under the new one
                slot.state.input = Some(input.to_string());
                slot.state.view = None;
                slot.state.error = None;
                slot.state.last_fetched_at = None;
            }
        }
        slot.latest_seq += 1;
        slot.state.status = PanelStatus::Loading;

        let request = PendingRequest {
            panel: trigger.panel,
            seq: slot.latest_seq,
            input: slot.state.input.clone(),
        };
        self.publish(slot.state.clone());
        Some(request)
    }

    /// Apply a finished refresh. Returns false when the result was stale and dropped.
    pub fn complete(&self, request: &PendingRequest, outcome: PanelOutcome) -> bool {
        let Some(slot) = self.slots.get(&request.panel) else {
            return false;
        };
        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if request.seq <= slot.applied_seq || request.input != slot.state.input {
            tracing::debug!(
                "Discarding stale {} result (request #{}, input {:?}); panel is at #{} for {:?}",
                request.panel,
                request.seq,
                request.input,
                slot.latest_seq,
                slot.state.input
            );
            return false;
        }

        slot.applied_seq = request.seq;
        slot.state = PanelState {
            panel: request.panel,
            input: request.input.clone(),
            status: outcome.status,
            last_fetched_at: Some(Utc::now()),
            view: Some(outcome.view),
            error: outcome.error,
            request_seq: request.seq,
        };
        self.publish(slot.state.clone());
        true
    }

    pub fn snapshot(&self, panel: PanelId) -> Option<PanelState> {
        self.slots.get(&panel).map(|slot| {
            slot.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .state
                .clone()
        })
    }

    /// All panels in dashboard order.
    pub fn snapshot_all(&self) -> Vec<PanelState> {
        PanelId::ALL
            .into_iter()
            .filter_map(|panel| self.snapshot(panel))
            .collect()
    }

    pub fn contains(&self, panel: PanelId) -> bool {
        self.slots.contains_key(&panel)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelState> {
        self.updates.subscribe()
    }

    fn publish(&self, state: PanelState) {
        // No subscribers is fine
        let _ = self.updates.send(state);
    }
}
