use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{
    domain::{Order, OrderId, OrderStatus, VendorId},
    protocol::{StatusUpdateRequest, StatusUpdateResponse, VendorOrdersResponse},
};
use tracing::{info, warn};
use url::Url;

pub mod config;
pub mod controller;
pub mod error;

pub use config::{ClientConfig, ControllerSettings};
pub use controller::{
    events::{Notice, UiEvent},
    reducer::{Intent, Phase, ViewState},
    ControllerHandle, VendorOrdersController,
};
pub use error::{ConfigError, FetchError, UpdateError};

const UPDATE_CONFIRMED_FALLBACK: &str = "Order status updated";
const UPDATE_REJECTED_FALLBACK: &str = "Failed to update order";

/// Outcome of a well-formed vendor orders response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrdersFetch {
    Orders(Vec<Order>),
    /// `success` was false or `orders` was not a list.
    NoOrders,
}

impl OrdersFetch {
    pub fn into_orders(self) -> Vec<Order> {
        match self {
            Self::Orders(orders) => orders,
            Self::NoOrders => Vec::new(),
        }
    }
}

#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn fetch_orders(&self, vendor_id: &VendorId) -> Result<OrdersFetch, FetchError>;
    /// Returns the server's confirmation message. Does not refresh anything.
    async fn update_order_status(
        &self,
        order_id: OrderId,
        status: &OrderStatus,
    ) -> Result<String, UpdateError>;
}

pub struct HttpOrderClient {
    http: Client,
    api_base: Url,
}

impl HttpOrderClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            api_base: config.api_base,
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        // ClientConfig rejects cannot-be-a-base urls, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl OrderApi for HttpOrderClient {
    async fn fetch_orders(&self, vendor_id: &VendorId) -> Result<OrdersFetch, FetchError> {
        let url = self.endpoint(&["vendor-orders", vendor_id.as_str()]);
        let body = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let fetched = decode_vendor_orders(&body)?;
        match &fetched {
            OrdersFetch::Orders(orders) => {
                info!(vendor_id = %vendor_id, count = orders.len(), "fetched vendor orders")
            }
            OrdersFetch::NoOrders => info!(vendor_id = %vendor_id, "vendor has no orders"),
        }
        Ok(fetched)
    }

    async fn update_order_status(
        &self,
        order_id: OrderId,
        status: &OrderStatus,
    ) -> Result<String, UpdateError> {
        let body = self
            .http
            .post(self.endpoint(&["update-order-status"]))
            .json(&StatusUpdateRequest {
                order_id,
                status: status.clone(),
            })
            .send()
            .await
            .map_err(|err| UpdateError::Transport(err.to_string()))?
            .bytes()
            .await
            .map_err(|err| UpdateError::Transport(err.to_string()))?;

        let outcome = decode_status_update(&body);
        match &outcome {
            Ok(_) => info!(order_id = %order_id, status = %status, "order status updated"),
            Err(err) => warn!(order_id = %order_id, status = %status, "order status update failed: {err}"),
        }
        outcome
    }
}

pub fn decode_vendor_orders(body: &[u8]) -> Result<OrdersFetch, FetchError> {
    let response: VendorOrdersResponse =
        serde_json::from_slice(body).map_err(|err| FetchError::Malformed(err.to_string()))?;

    match response.orders {
        Value::Array(items) if response.success => {
            let orders: Vec<Order> = serde_json::from_value(Value::Array(items))
                .map_err(|err| FetchError::Malformed(err.to_string()))?;
            Ok(OrdersFetch::Orders(orders))
        }
        _ => Ok(OrdersFetch::NoOrders),
    }
}

pub fn decode_status_update(body: &[u8]) -> Result<String, UpdateError> {
    let response: StatusUpdateResponse =
        serde_json::from_slice(body).map_err(|err| UpdateError::Transport(err.to_string()))?;

    if response.success {
        Ok(response
            .message
            .unwrap_or_else(|| UPDATE_CONFIRMED_FALLBACK.to_string()))
    } else {
        Err(UpdateError::Rejected(
            response
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| UPDATE_REJECTED_FALLBACK.to_string()),
        ))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
