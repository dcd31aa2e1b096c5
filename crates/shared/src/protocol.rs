use serde::{Deserialize, Serialize};

use crate::domain::{OrderId, OrderStatus};

/// Body of `GET /vendor-orders/{vendor_id}`.
///
/// `orders` stays untyped until `success` has been checked: the server sends
/// `false`, `null` or an object when it has nothing to report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorOrdersResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub orders: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
