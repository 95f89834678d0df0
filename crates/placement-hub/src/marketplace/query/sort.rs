use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::debug;

use super::super::domain::{Application, Internship, Order, Vocabulary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Flip the comparator result, never the input order, so ties stay stable both ways.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// Selectable sort field, parsed from request values.
pub trait SortField: Copy + Default + FromStr {
    fn natural_direction(self) -> SortDirection {
        SortDirection::Ascending
    }
}

/// Orderable attribute of a record type.
pub trait SortKey<R>: SortField {
    fn compare(&self, left: &R, right: &R) -> Ordering;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K> SortSpec<K> {
    pub fn new(key: K, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

impl<K: SortField> SortSpec<K> {
    /// Parse request values; unknown keys fall back to the default key and an
    /// unknown or missing direction falls back to that key's natural direction.
    pub fn parse(key: Option<&str>, direction: Option<&str>) -> Self {
        let key = match key.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => raw.parse::<K>().unwrap_or_else(|_| {
                debug!(sort_key = raw, "unknown sort key, using default");
                K::default()
            }),
            None => K::default(),
        };
        let direction = direction
            .and_then(|raw| raw.parse::<SortDirection>().ok())
            .unwrap_or_else(|| key.natural_direction());
        Self { key, direction }
    }
}

/// Stable sort of record references.
pub fn sort_records<R, K>(records: &mut [&R], spec: SortSpec<K>)
where
    K: SortKey<R>,
{
    records.sort_by(|left, right| spec.direction.apply(spec.key.compare(left, right)));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSortKey {
    #[default]
    ShipByDate,
    OrderDate,
    Amount,
    CustomerName,
}

impl SortField for OrderSortKey {}

impl SortKey<Order> for OrderSortKey {
    fn compare(&self, left: &Order, right: &Order) -> Ordering {
        match self {
            Self::ShipByDate => left.ship_by_date.cmp(&right.ship_by_date),
            Self::OrderDate => left.order_date.cmp(&right.order_date),
            Self::Amount => left.amount.total_cmp(&right.amount),
            Self::CustomerName => left.customer.name.cmp(&right.customer.name),
        }
    }
}

impl FromStr for OrderSortKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ship_by_date" | "shipbydate" | "ship_by" => Ok(Self::ShipByDate),
            "order_date" | "orderdate" => Ok(Self::OrderDate),
            "amount" => Ok(Self::Amount),
            "customer_name" | "customer" => Ok(Self::CustomerName),
            other => Err(format!("unknown order sort key '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternshipSortKey {
    #[default]
    CreatedAt,
    Title,
    Applicants,
    Views,
    Deadline,
}

impl SortKey<Internship> for InternshipSortKey {
    fn compare(&self, left: &Internship, right: &Internship) -> Ordering {
        match self {
            Self::CreatedAt => left.created_at.cmp(&right.created_at),
            Self::Title => left.title.cmp(&right.title),
            Self::Applicants => left.applicants.cmp(&right.applicants),
            Self::Views => left.views.cmp(&right.views),
            // Postings without a deadline go last.
            Self::Deadline => match (left.application_deadline, right.application_deadline) {
                (Some(left), Some(right)) => left.cmp(&right),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl SortField for InternshipSortKey {
    fn natural_direction(self) -> SortDirection {
        match self {
            Self::CreatedAt | Self::Applicants | Self::Views => SortDirection::Descending,
            Self::Title | Self::Deadline => SortDirection::Ascending,
        }
    }
}

impl FromStr for InternshipSortKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "created_at" | "newest" | "recent" => Ok(Self::CreatedAt),
            "title" => Ok(Self::Title),
            "applicants" => Ok(Self::Applicants),
            "views" => Ok(Self::Views),
            "deadline" | "application_deadline" => Ok(Self::Deadline),
            other => Err(format!("unknown internship sort key '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationSortKey {
    #[default]
    AppliedAt,
    ApplicantName,
    Status,
}

fn status_rank<S: Vocabulary>(status: S) -> usize {
    S::ordered()
        .iter()
        .position(|candidate| *candidate == status)
        .unwrap_or(usize::MAX)
}

impl SortKey<Application> for ApplicationSortKey {
    fn compare(&self, left: &Application, right: &Application) -> Ordering {
        match self {
            Self::AppliedAt => left.applied_at.cmp(&right.applied_at),
            Self::ApplicantName => (&left.applicant.last_name, &left.applicant.first_name)
                .cmp(&(&right.applicant.last_name, &right.applicant.first_name)),
            Self::Status => status_rank(left.status).cmp(&status_rank(right.status)),
        }
    }
}

impl SortField for ApplicationSortKey {
    fn natural_direction(self) -> SortDirection {
        match self {
            Self::AppliedAt => SortDirection::Descending,
            Self::ApplicantName | Self::Status => SortDirection::Ascending,
        }
    }
}

impl FromStr for ApplicationSortKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "applied_at" | "newest" => Ok(Self::AppliedAt),
            "applicant_name" | "name" => Ok(Self::ApplicantName),
            "status" => Ok(Self::Status),
            other => Err(format!("unknown application sort key '{other}'")),
        }
    }
}

impl<K: SortField> Default for SortSpec<K> {
    fn default() -> Self {
        let key = K::default();
        Self {
            key,
            direction: key.natural_direction(),
        }
    }
}
