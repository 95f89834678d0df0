use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::super::domain::{Order, OrderPriority, OrderStatus, Vocabulary};
use super::super::lifecycle::Lifecycle;
use super::views::QuickFilterCount;

/// One-click order filters shown above the order table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderQuickFilter {
    ShipByToday,
    PrimeUnshipped,
    Late,
    VergeOfCancellation,
    Business,
}

impl OrderQuickFilter {
    pub fn matches(self, order: &Order, as_of: NaiveDate) -> bool {
        let open = !order.status.is_terminal();
        match self {
            Self::ShipByToday => order.ship_by_date == as_of && open,
            Self::PrimeUnshipped => {
                order.status == OrderStatus::Unshipped && order.priority == OrderPriority::Prime
            }
            Self::Late => order.is_late && open,
            Self::VergeOfCancellation => order.is_verge_of_cancellation && open,
            Self::Business => order.priority == OrderPriority::Business && open,
        }
    }
}

impl Vocabulary for OrderQuickFilter {
    fn ordered() -> &'static [Self] {
        &[
            Self::ShipByToday,
            Self::PrimeUnshipped,
            Self::Late,
            Self::VergeOfCancellation,
            Self::Business,
        ]
    }

    fn code(self) -> &'static str {
        match self {
            Self::ShipByToday => "ship_by_today",
            Self::PrimeUnshipped => "prime_unshipped",
            Self::Late => "late",
            Self::VergeOfCancellation => "verge_of_cancellation",
            Self::Business => "business",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::ShipByToday => "Ship by today",
            Self::PrimeUnshipped => "Unshipped Prime",
            Self::Late => "Late",
            Self::VergeOfCancellation => "Verge of cancellation",
            Self::Business => "Business orders",
        }
    }
}

impl FromStr for OrderQuickFilter {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        <Self as Vocabulary>::parse(raw).ok_or_else(|| format!("unknown quick filter '{raw}'"))
    }
}

/// Count every quick filter against the full collection.
pub fn quick_filter_counts(orders: &[Order], as_of: NaiveDate) -> Vec<QuickFilterCount> {
    OrderQuickFilter::ordered()
        .iter()
        .map(|&filter| QuickFilterCount {
            filter,
            label: filter.label(),
            count: orders
                .iter()
                .filter(|order| filter.matches(order, as_of))
                .count(),
        })
        .collect()
}
