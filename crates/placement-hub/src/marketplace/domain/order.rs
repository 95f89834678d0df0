use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{HasStatus, Vocabulary};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Unshipped,
    Cancelled,
    Sent,
}

impl Vocabulary for OrderStatus {
    fn ordered() -> &'static [Self] {
        &[Self::Pending, Self::Unshipped, Self::Cancelled, Self::Sent]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Unshipped => "unshipped",
            Self::Cancelled => "cancelled",
            Self::Sent => "sent",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Unshipped => "Unshipped",
            Self::Cancelled => "Cancelled",
            Self::Sent => "Sent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPriority {
    Normal,
    Prime,
    Business,
}

impl Vocabulary for OrderPriority {
    fn ordered() -> &'static [Self] {
        &[Self::Normal, Self::Prime, Self::Business]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Prime => "prime",
            Self::Business => "business",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Prime => "Prime",
            Self::Business => "Business",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    pub sku: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub product: ProductSummary,
    pub customer: CustomerSummary,
    pub status: OrderStatus,
    pub amount: f64,
    pub quantity: u32,
    pub priority: OrderPriority,
    /// Precomputed by the store; never derived here.
    #[serde(default)]
    pub is_late: bool,
    #[serde(default)]
    pub is_verge_of_cancellation: bool,
    pub order_date: NaiveDate,
    pub ship_by_date: NaiveDate,
}

impl HasStatus for Order {
    type Status = OrderStatus;

    fn status(&self) -> OrderStatus {
        self.status
    }
}
