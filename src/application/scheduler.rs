// Refresh scheduler - Timers and manual requests feeding one dispatch loop
use crate::application::data_client::DataClient;
use crate::application::panel_store::{PanelStore, PendingRequest};
use crate::application::view_builder::build_view;
use crate::domain::panel::{PanelId, RefreshTrigger};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// How often a panel refreshes on its own and what it starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSchedule {
    pub panel: PanelId,
    pub interval: Duration,
    pub default_input: Option<String>,
}

impl PanelSchedule {
    pub fn new(panel: PanelId, interval: Duration, default_input: Option<String>) -> Self {
        Self {
            panel,
            interval,
            default_input,
        }
    }
}

pub struct RefreshScheduler {
    clients: HashMap<PanelId, Arc<dyn DataClient>>,
    store: Arc<PanelStore>,
}

impl RefreshScheduler {
    pub fn new(clients: Vec<Arc<dyn DataClient>>, store: Arc<PanelStore>) -> Self {
        let clients = clients.into_iter().map(|c| (c.panel(), c)).collect();
        Self { clients, store }
    }

    /// Start one refresh. The request is numbered before this returns, so the
    /// order of `dispatch` calls is the order that wins in the store.
    /// The spawned task resolves to whether its result was applied.
    pub fn dispatch(&self, trigger: RefreshTrigger) -> Option<JoinHandle<bool>> {
        let Some(client) = self.clients.get(&trigger.panel).cloned() else {
            tracing::warn!("No data client registered for panel {}", trigger.panel);
            return None;
        };
        let request = self.store.begin(&trigger)?;
        tracing::debug!(
            "Refreshing {} ({:?}, request #{}, input {:?})",
            request.panel,
            trigger.kind,
            request.seq,
            request.input
        );

        let store = self.store.clone();
        Some(tokio::spawn(refresh_panel(client, store, request)))
    }

    /// Consume triggers until the channel closes or shutdown is signalled.
    pub async fn run(
        self: Arc<Self>,
        mut triggers: mpsc::Receiver<RefreshTrigger>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                trigger = triggers.recv() => match trigger {
                    Some(trigger) => {
                        self.dispatch(trigger);
                    }
                    None => break,
                },
                _ = shutdown.changed() => break,
            }
        }
        tracing::info!("Refresh scheduler stopped");
    }
}

async fn refresh_panel(
    client: Arc<dyn DataClient>,
    store: Arc<PanelStore>,
    request: PendingRequest,
) -> bool {
    let started = Instant::now();
    let result = client.fetch(request.input.as_deref()).await;
    let outcome = build_view(request.panel, request.input.as_deref(), result);
    let status = outcome.status;
    let applied = store.complete(&request, outcome);

    tracing::debug!(
        "{} request #{} finished as {:?} in {}ms (applied: {})",
        request.panel,
        request.seq,
        status,
        started.elapsed().as_millis(),
        applied
    );
    applied
}

/// One repeating timer per panel. The first tick fires immediately so every
/// panel renders at start-up; ticks missed while the channel is busy are
/// delayed, not bursted.
pub fn spawn_timers(
    schedules: &[PanelSchedule],
    triggers: mpsc::Sender<RefreshTrigger>,
    shutdown: watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    schedules
        .iter()
        .map(|schedule| {
            let panel = schedule.panel;
            let period = schedule.interval;
            let triggers = triggers.clone();
            let mut shutdown = shutdown.clone();

            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            if triggers.send(RefreshTrigger::timer_tick(panel)).await.is_err() {
                                break;
                            }
                        }
                        _ = shutdown.changed() => break,
                    }
                }
                tracing::debug!("Timer for {} stopped", panel);
            })
        })
        .collect()
}
