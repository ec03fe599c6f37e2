//! Customer orders as seen by the admin.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::error::{CoreError, Result};

/// Order status. Values the server sends that are not known here are kept
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Fulfilled,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Fulfilled => "fulfilled",
            Self::Cancelled => "cancelled",
            Self::Other(s) => s,
        }
    }

    /// Fulfilled and cancelled orders can no longer be changed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Fulfilled | Self::Cancelled)
    }

    /// Check that an admin may move an order from `self` to `target`. Only an
    /// open order may change, and only to a terminal status.
    pub fn ensure_transition(&self, target: &OrderStatus) -> Result<()> {
        if self.is_terminal() || !target.is_terminal() {
            return Err(CoreError::invalid_transition(
                format!("mark order {target}"),
                format!("order is {self}"),
            ));
        }
        Ok(())
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "fulfilled" => Self::Fulfilled,
            "cancelled" => Self::Cancelled,
            _ => Self::Other(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: EntityId,
    pub order_id: EntityId,
    pub product_version_size_id: EntityId,
    pub quantity: i64,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub product_name: String,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: EntityId,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_image: String,
    pub user_id: EntityId,
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub shipping_address: String,
    pub total_amount: f64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
