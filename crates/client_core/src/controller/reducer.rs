//! Pure state transitions for the vendor orders screen.
//!
//! `reduce` never performs I/O. It returns the next state together with the
//! effects the runtime has to carry out (requests, timer changes, notices).

use shared::{
    domain::{Order, OrderId, OrderStatus, VendorId},
    error::ValidationError,
};

use crate::{
    controller::events::Notice,
    error::{FetchError, UpdateError},
    OrdersFetch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No vendor identifier set.
    #[default]
    Idle,
    Loading,
    Loaded,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub vendor_id: Option<VendorId>,
    pub orders: Vec<Order>,
    pub phase: Phase,
    /// Sequence number of the most recently issued fetch.
    latest_fetch: u64,
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn latest_fetch(&self) -> u64 {
        self.latest_fetch
    }

    fn begin_fetch(&mut self, vendor_id: VendorId) -> Effect {
        self.latest_fetch += 1;
        self.phase = Phase::Loading;
        Effect::Fetch {
            seq: self.latest_fetch,
            vendor_id,
        }
    }
}

/// Intents emitted by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Raw input text; blank input clears the identifier.
    SetVendorId(String),
    Fetch,
    UpdateStatus {
        order_id: OrderId,
        status: OrderStatus,
    },
    Teardown,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetVendorId(_) => "set_vendor_id",
            Self::Fetch => "fetch",
            Self::UpdateStatus { .. } => "update_status",
            Self::Teardown => "teardown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Intent(Intent),
    PollTick,
    FetchCompleted {
        seq: u64,
        result: Result<OrdersFetch, FetchError>,
    },
    StatusUpdateCompleted {
        order_id: OrderId,
        result: Result<String, UpdateError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { seq: u64, vendor_id: VendorId },
    /// Replaces any running timer.
    StartPolling,
    StopPolling,
    SubmitStatus {
        order_id: OrderId,
        status: OrderStatus,
    },
    Notify(Notice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ViewState,
    pub effects: Vec<Effect>,
}

pub fn reduce(mut state: ViewState, event: Event) -> Transition {
    let mut effects = Vec::new();

    match event {
        Event::Intent(Intent::SetVendorId(raw)) => match VendorId::parse(&raw) {
            Ok(vendor_id) => {
                if state.vendor_id.as_ref() != Some(&vendor_id) {
                    state.vendor_id = Some(vendor_id.clone());
                    effects.push(state.begin_fetch(vendor_id));
                    effects.push(Effect::StartPolling);
                }
            }
            Err(ValidationError::EmptyVendorId) => {
                if state.vendor_id.take().is_some() {
                    // Anything still in flight belongs to the old identifier.
                    state.latest_fetch += 1;
                    state.phase = Phase::Idle;
                    effects.push(Effect::StopPolling);
                }
            }
        },
        Event::Intent(Intent::Fetch) => match state.vendor_id.clone() {
            Some(vendor_id) => effects.push(state.begin_fetch(vendor_id)),
            None => effects.push(Effect::Notify(Notice::Validation(
                ValidationError::EmptyVendorId.to_string(),
            ))),
        },
        Event::PollTick => {
            if let Some(vendor_id) = state.vendor_id.clone() {
                effects.push(state.begin_fetch(vendor_id));
            }
        }
        Event::Intent(Intent::UpdateStatus { order_id, status }) => {
            effects.push(Effect::SubmitStatus { order_id, status });
        }
        Event::Intent(Intent::Teardown) => {
            effects.push(Effect::StopPolling);
        }
        Event::FetchCompleted { seq, result } => {
            if seq != state.latest_fetch {
                return Transition { state, effects };
            }
            state.phase = Phase::Loaded;
            match result {
                Ok(OrdersFetch::Orders(orders)) => state.orders = orders,
                Ok(OrdersFetch::NoOrders) => {
                    state.orders.clear();
                    effects.push(Effect::Notify(Notice::NoOrders));
                }
                Err(err) => {
                    state.orders.clear();
                    effects.push(Effect::Notify(Notice::from_fetch_error(&err)));
                }
            }
        }
        Event::StatusUpdateCompleted { result, .. } => match result {
            Ok(message) => {
                effects.push(Effect::Notify(Notice::StatusUpdated(message)));
                match state.vendor_id.clone() {
                    Some(vendor_id) => effects.push(state.begin_fetch(vendor_id)),
                    None => effects.push(Effect::Notify(Notice::Validation(
                        ValidationError::EmptyVendorId.to_string(),
                    ))),
                }
            }
            Err(err) => effects.push(Effect::Notify(Notice::from_update_error(&err))),
        },
    }

    Transition { state, effects }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
