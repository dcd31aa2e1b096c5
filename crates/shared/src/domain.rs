use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "RawInteger")]
        pub struct $name(pub i64);

        impl TryFrom<RawInteger> for $name {
            type Error = String;

            fn try_from(value: RawInteger) -> Result<Self, Self::Error> {
                value.into_i64().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Integers the server sends either as JSON numbers or as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawInteger {
    Number(i64),
    Text(String),
}

impl RawInteger {
    fn into_i64(self) -> Result<i64, String> {
        match self {
            Self::Number(value) => Ok(value),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| format!("expected an integer, got \"{text}\"")),
        }
    }
}

id_newtype!(OrderId);

/// Vendor identifier as typed by the user. Never empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VendorId(String);

impl VendorId {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyVendorId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A missing or null status decodes to `Other("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Processing,
    Completed,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(value) => value,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decimal amount kept exactly as the server formatted it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawAmount")]
pub struct Amount(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawAmount> for Amount {
    fn from(value: RawAmount) -> Self {
        match value {
            RawAmount::Text(text) => Self(text),
            RawAmount::Number(number) => Self(number.to_string()),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub quantity: i64,
    #[serde(rename = "total", default)]
    pub line_total: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: OrderStatus,
    #[serde(default)]
    pub total: Amount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_created: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<LineItem>,
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawInteger>::deserialize(deserializer)? {
        Some(raw) => raw.into_i64().map_err(serde::de::Error::custom),
        None => Ok(0),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_id_rejects_blank_input() {
        for raw in ["", " ", "\t\n", "   "] {
            assert_eq!(VendorId::parse(raw), Err(ValidationError::EmptyVendorId));
        }
    }

    #[test]
    fn vendor_id_is_trimmed() {
        let vendor_id = VendorId::parse("  123 ").expect("vendor id");
        assert_eq!(vendor_id.as_str(), "123");
    }

    #[test]
    fn unknown_statuses_survive_round_trip() {
        let status: OrderStatus = serde_json::from_str("\"on-hold\"").expect("status");
        assert_eq!(status, OrderStatus::Other("on-hold".to_string()));
        assert_eq!(serde_json::to_string(&status).expect("json"), "\"on-hold\"");

        let status: OrderStatus = serde_json::from_str("\"completed\"").expect("status");
        assert_eq!(status, OrderStatus::Completed);
    }

    #[test]
    fn amount_accepts_strings_and_numbers() {
        let text: Amount = serde_json::from_str("\"250.00\"").expect("text amount");
        let number: Amount = serde_json::from_str("99.5").expect("number amount");
        assert_eq!(text.0, "250.00");
        assert_eq!(number.0, "99.5");
    }

    #[test]
    fn order_decodes_server_shape() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "order_id": 1,
            "status": "processing",
            "total": "250",
            "date_created": "2024-01-01",
            "items": [{ "name": "Widget", "quantity": 2, "total": "250" }]
        }))
        .expect("order");

        assert_eq!(order.order_id, OrderId(1));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].name, "Widget");
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].line_total, Amount("250".to_string()));
    }

    #[test]
    fn order_without_items_defaults_to_empty() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "order_id": 9,
            "status": "completed",
            "total": 10
        }))
        .expect("order");
        assert!(order.items.is_empty());
        assert!(order.date_created.is_empty());
    }

    #[test]
    fn order_tolerates_string_ids_and_null_fields() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "order_id": "2",
            "status": null,
            "total": "40",
            "date_created": null,
            "items": null
        }))
        .expect("order");
        assert_eq!(order.order_id, OrderId(2));
        assert_eq!(order.status, OrderStatus::Other(String::new()));
        assert!(order.date_created.is_empty());
        assert!(order.items.is_empty());
    }

    #[test]
    fn line_item_quantity_accepts_numeric_strings() {
        let item: LineItem =
            serde_json::from_value(serde_json::json!({ "name": "Bolt", "quantity": " 3 " }))
                .expect("item");
        assert_eq!(item.quantity, 3);

        let err = serde_json::from_value::<LineItem>(serde_json::json!({ "quantity": "lots" }))
            .expect_err("non-numeric quantity");
        assert!(err.to_string().contains("lots"));
    }
}
