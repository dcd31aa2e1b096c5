//! Controller layer: intents, reducer-driven state transitions, and the event loop
//! that executes their effects.

pub mod events;
pub mod poller;
pub mod reducer;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use crossbeam_channel::{Sender, TrySendError};
use shared::domain::{OrderId, OrderStatus, VendorId};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{config::ControllerSettings, OrderApi};
use events::UiEvent;
use poller::Poller;
use reducer::{Effect, Event, Intent, Transition, ViewState};

/// How often a state update that found the UI queue full is retried.
const STATE_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Owns the screen state. Runs as a single task; every mutation goes through
/// [`reducer::reduce`].
pub struct VendorOrdersController {
    api: Arc<dyn OrderApi>,
    settings: ControllerSettings,
    state: ViewState,
    poller: Option<Poller>,
    events_tx: UnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
    ui_tx: Sender<UiEvent>,
    /// Latest state that could not be queued yet; newer states replace it.
    pending_state: Option<ViewState>,
}

impl VendorOrdersController {
    pub fn spawn(
        api: Arc<dyn OrderApi>,
        settings: ControllerSettings,
        ui_tx: Sender<UiEvent>,
    ) -> ControllerHandle {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let controller = Self {
            api,
            settings,
            state: ViewState::default(),
            poller: None,
            events_tx: events_tx.clone(),
            events_rx,
            ui_tx,
            pending_state: None,
        };
        ControllerHandle {
            events_tx,
            task: Some(tokio::spawn(controller.run())),
        }
    }

    async fn run(mut self) -> ViewState {
        info!(
            poll_interval_secs = self.settings.poll_interval.as_secs(),
            "vendor orders controller started"
        );
        loop {
            let next = if self.pending_state.is_some() {
                tokio::select! {
                    event = self.events_rx.recv() => event,
                    () = tokio::time::sleep(STATE_RETRY_INTERVAL) => {
                        self.flush_pending_state();
                        continue;
                    }
                }
            } else {
                self.events_rx.recv().await
            };
            let Some(event) = next else {
                break;
            };
            let teardown = matches!(event, Event::Intent(Intent::Teardown));
            self.dispatch(event);
            if teardown {
                break;
            }
        }
        self.poller = None;
        self.flush_pending_state();
        info!("vendor orders controller stopped");
        self.state
    }

    fn dispatch(&mut self, event: Event) {
        if let Event::FetchCompleted { seq, .. } = &event {
            if *seq != self.state.latest_fetch() {
                debug!(
                    seq,
                    latest = self.state.latest_fetch(),
                    "discarding superseded fetch result"
                );
            }
        }

        let previous = self.state.clone();
        let Transition { state, effects } = reducer::reduce(std::mem::take(&mut self.state), event);
        self.state = state;
        if self.state != previous {
            self.publish_state(self.state.clone());
        }

        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Fetch { seq, vendor_id } => self.spawn_fetch(seq, vendor_id),
            Effect::StartPolling => {
                debug!(
                    vendor_id = ?self.state.vendor_id,
                    "arming order polling"
                );
                self.poller = Some(Poller::start(
                    self.settings.poll_interval,
                    self.events_tx.clone(),
                ));
            }
            Effect::StopPolling => {
                if self.poller.take().is_some() {
                    debug!("order polling disarmed");
                }
            }
            Effect::SubmitStatus { order_id, status } => self.spawn_status_update(order_id, status),
            Effect::Notify(notice) => self.emit(UiEvent::Notice(notice)),
        }
    }

    fn spawn_fetch(&self, seq: u64, vendor_id: VendorId) {
        debug!(seq, vendor_id = %vendor_id, "fetching vendor orders");
        let api = Arc::clone(&self.api);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_orders(&vendor_id).await;
            if let Err(err) = &result {
                warn!(seq, vendor_id = %vendor_id, "vendor orders fetch failed: {err}");
            }
            let _ = events_tx.send(Event::FetchCompleted { seq, result });
        });
    }

    fn spawn_status_update(&self, order_id: OrderId, status: OrderStatus) {
        debug!(order_id = %order_id, status = %status, "submitting order status");
        let api = Arc::clone(&self.api);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.update_order_status(order_id, &status).await;
            let _ = events_tx.send(Event::StatusUpdateCompleted { order_id, result });
        });
    }

    fn publish_state(&mut self, state: ViewState) {
        // Anything still pending is superseded.
        self.pending_state = Some(state);
        self.flush_pending_state();
    }

    fn flush_pending_state(&mut self) {
        let Some(state) = self.pending_state.take() else {
            return;
        };
        match self.ui_tx.try_send(UiEvent::StateChanged(state)) {
            Ok(()) => {}
            Err(TrySendError::Full(UiEvent::StateChanged(state))) => {
                debug!("ui event queue is full; holding latest state");
                self.pending_state = Some(state);
            }
            Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => debug!("ui event receiver disconnected"),
        }
    }

    fn emit(&self, event: UiEvent) {
        match self.ui_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => warn!("ui event queue is full; dropping event"),
            Err(TrySendError::Disconnected(_)) => debug!("ui event receiver disconnected"),
        }
    }
}

/// Presentation-side handle. Dropping it tears the controller down.
pub struct ControllerHandle {
    events_tx: UnboundedSender<Event>,
    task: Option<JoinHandle<ViewState>>,
}

impl ControllerHandle {
    /// Returns false once the controller has stopped.
    pub fn send(&self, intent: Intent) -> bool {
        let name = intent.name();
        match self.events_tx.send(Event::Intent(intent)) {
            Ok(()) => {
                debug!(intent = name, "queued controller intent");
                true
            }
            Err(_) => {
                warn!(intent = name, "controller is no longer running");
                false
            }
        }
    }

    pub fn set_vendor_id(&self, raw: impl Into<String>) -> bool {
        self.send(Intent::SetVendorId(raw.into()))
    }

    pub fn fetch_orders(&self) -> bool {
        self.send(Intent::Fetch)
    }

    pub fn update_status(&self, order_id: OrderId, status: OrderStatus) -> bool {
        self.send(Intent::UpdateStatus { order_id, status })
    }

    pub fn accept(&self, order_id: OrderId) -> bool {
        self.update_status(order_id, OrderStatus::Completed)
    }

    pub fn reject(&self, order_id: OrderId) -> bool {
        self.update_status(order_id, OrderStatus::Cancelled)
    }

    /// Stops polling, waits for the loop to exit and returns the final state.
    pub async fn shutdown(mut self) -> Result<ViewState> {
        let _ = self.events_tx.send(Event::Intent(Intent::Teardown));
        let task = self
            .task
            .take()
            .context("controller task was already joined")?;
        task.await.context("controller task panicked")
    }
}

impl Drop for ControllerHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.events_tx.send(Event::Intent(Intent::Teardown));
        }
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
