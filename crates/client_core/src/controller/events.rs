//! Events and notices flowing from the controller to the presentation layer.

use crate::{
    controller::reducer::ViewState,
    error::{FetchError, UpdateError},
};

const NO_ORDERS_MESSAGE: &str = "No orders found for this vendor.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    StateChanged(ViewState),
    Notice(Notice),
}

/// User-facing notice. Each failure mode of the screen maps to exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Validation(String),
    /// Well-formed response without orders; not a failure.
    NoOrders,
    FetchFailed(String),
    StatusUpdated(String),
    UpdateFailed(String),
}

impl Notice {
    pub fn from_fetch_error(err: &FetchError) -> Self {
        Self::FetchFailed(format!("Failed to fetch orders: {err}"))
    }

    pub fn from_update_error(err: &UpdateError) -> Self {
        match err {
            UpdateError::Rejected(message) => Self::UpdateFailed(message.clone()),
            UpdateError::Transport(message) => Self::UpdateFailed(format!("Failed: {message}")),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::NoOrders => "No Orders",
            Self::StatusUpdated(_) => "Success",
            Self::Validation(_) | Self::FetchFailed(_) | Self::UpdateFailed(_) => "Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NoOrders => NO_ORDERS_MESSAGE,
            Self::Validation(message)
            | Self::FetchFailed(message)
            | Self::StatusUpdated(message)
            | Self::UpdateFailed(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::FetchFailed(_) | Self::UpdateFailed(_)
        )
    }
}
