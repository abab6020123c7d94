// Dashboard context - One running dashboard: store, scheduler loop, timers
use crate::application::data_client::DataClient;
use crate::application::panel_store::PanelStore;
use crate::application::scheduler::{spawn_timers, PanelSchedule, RefreshScheduler};
use crate::domain::panel::{PanelId, RefreshTrigger};
use anyhow::Context;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

const TRIGGER_CHANNEL_CAPACITY: usize = 64;

/// Everything one dashboard instance owns. Created at start-up and handed to
/// the HTTP layer; several can run side by side.
pub struct DashboardContext {
    store: Arc<PanelStore>,
    triggers: mpsc::Sender<RefreshTrigger>,
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl DashboardContext {
    /// Build the store, start the scheduler loop and one timer per schedule.
    /// Must be called inside a tokio runtime.
    pub fn start(clients: Vec<Arc<dyn DataClient>>, schedules: Vec<PanelSchedule>) -> Self {
        let store = Arc::new(PanelStore::new(
            schedules
                .iter()
                .map(|s| (s.panel, s.default_input.clone())),
        ));
        let scheduler = Arc::new(RefreshScheduler::new(clients, store.clone()));

        let (triggers, trigger_rx) = mpsc::channel(TRIGGER_CHANNEL_CAPACITY);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let mut tasks = vec![tokio::spawn(scheduler.run(trigger_rx, shutdown_rx.clone()))];
        tasks.extend(spawn_timers(&schedules, triggers.clone(), shutdown_rx));

        tracing::info!("Dashboard started with {} panels", schedules.len());
        for schedule in &schedules {
            tracing::info!(
                "  {} every {}s (input: {:?})",
                schedule.panel,
                schedule.interval.as_secs(),
                schedule.default_input
            );
        }

        Self {
            store,
            triggers,
            shutdown,
            tasks: Mutex::new(tasks),
        }
    }

    pub fn store(&self) -> &Arc<PanelStore> {
        &self.store
    }

    /// Flips to `true` once `shutdown` has been called.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Queue a manual refresh, optionally with new input for the panel.
    pub async fn request_refresh(&self, panel: PanelId, input: Option<String>) -> anyhow::Result<()> {
        self.triggers
            .send(RefreshTrigger::manual(panel, input))
            .await
            .context("Refresh scheduler is no longer running")
    }

    /// Stop timers and the scheduler loop and wait for them to finish.
    /// In-flight fetches are left to complete on their own.
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner));
        for task in tasks {
            if let Err(e) = task.await {
                tracing::error!("Dashboard task ended abnormally: {}", e);
            }
        }
        tracing::info!("Dashboard stopped");
    }
}
