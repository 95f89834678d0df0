use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

use super::super::analytics::OrderQuickFilter;
use super::super::domain::{
    Application, ApplicationStatus, InternshipId, Internship, InternshipStatus, Order,
    OrderPriority, OrderStatus, StipendKind, Vocabulary,
};

/// Predicate over a single record. Filters compose conjunctively.
pub trait Criteria<R> {
    fn matches(&self, record: &R) -> bool;
}

/// Keep the records matching `criteria`, in their original order.
pub fn filter_records<'a, R, C>(records: &'a [R], criteria: &C) -> Vec<&'a R>
where
    C: Criteria<R> + ?Sized,
{
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

/// A categorical filter dimension: either everything, or one exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: Copy + PartialEq> Selection<T> {
    pub fn admits(&self, value: T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == value,
        }
    }
}

impl<T: Vocabulary> Selection<T> {
    /// Parse a raw request value; `"all"`, blanks and unknown values select everything.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::All;
        };
        if raw.eq_ignore_ascii_case("all") {
            return Self::All;
        }
        match T::parse(raw) {
            Some(value) => Self::Only(value),
            None => {
                debug!(value = raw, "ignoring unknown filter value");
                Self::All
            }
        }
    }
}

/// Case-insensitive substring needle. A blank query is inactive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SearchQuery(Option<String>);

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            Self(None)
        } else {
            Self(Some(needle))
        }
    }

    pub fn from_option(raw: Option<&str>) -> Self {
        raw.map(Self::new).unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }

    pub fn matches_any<'f>(&self, fields: impl IntoIterator<Item = &'f str>) -> bool {
        match &self.0 {
            None => true,
            Some(needle) => fields
                .into_iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Free-text dimension such as category or location; `"all"` or blank disables it.
fn text_dimension(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

/// Paid/unpaid split based on the stipend text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StipendFilter {
    #[default]
    All,
    Paid,
    Unpaid,
}

impl StipendFilter {
    pub fn admits(self, internship: &Internship) -> bool {
        match self {
            Self::All => true,
            Self::Paid => internship.is_paid(),
            Self::Unpaid => !internship.is_paid(),
        }
    }
}

impl FromStr for StipendFilter {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "paid" => Ok(Self::Paid),
            "unpaid" => Ok(Self::Unpaid),
            other => Err(format!("unknown stipend filter '{other}'")),
        }
    }
}

/// Trailing window of days ending at an explicit reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateWindow {
    #[default]
    All,
    LastDays(u32),
}

impl DateWindow {
    pub fn contains(self, date: NaiveDate, as_of: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::LastDays(days) => {
                // Windows reaching past the calendar start are unbounded below.
                let start = as_of
                    .checked_sub_signed(Duration::days(i64::from(days)))
                    .unwrap_or(NaiveDate::MIN);
                start <= date && date <= as_of
            }
        }
    }
}

impl FromStr for DateWindow {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        raw.parse::<u32>()
            .map(Self::LastDays)
            .map_err(|_| format!("date window must be 'all' or a number of days, got '{raw}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct InternshipFilter {
    pub search: SearchQuery,
    pub status: Selection<InternshipStatus>,
    /// Matched against the category and every listed skill.
    pub category: Option<String>,
    pub location: Option<String>,
    pub stipend: StipendFilter,
    pub stipend_kind: Selection<StipendKind>,
    pub remote_only: bool,
}

impl InternshipFilter {
    pub fn with_category(mut self, raw: Option<&str>) -> Self {
        self.category = text_dimension(raw);
        self
    }

    pub fn with_location(mut self, raw: Option<&str>) -> Self {
        self.location = text_dimension(raw);
        self
    }
}

impl Criteria<Internship> for InternshipFilter {
    fn matches(&self, internship: &Internship) -> bool {
        let searched = self.search.matches_any(
            [
                internship.title.as_str(),
                internship.company.as_str(),
                internship.description.as_str(),
            ]
            .into_iter()
            .chain(internship.skills.iter().map(String::as_str)),
        );

        let category = self.category.as_deref().map_or(true, |wanted| {
            contains_ignore_case(&internship.category, wanted)
                || internship
                    .skills
                    .iter()
                    .any(|skill| contains_ignore_case(skill, wanted))
        });

        let location = self
            .location
            .as_deref()
            .map_or(true, |wanted| contains_ignore_case(&internship.location, wanted));

        searched
            && category
            && location
            && self.status.admits(internship.status)
            && self.stipend.admits(internship)
            && self.stipend_kind.admits(internship.stipend_kind)
            && (!self.remote_only || internship.is_remote)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ApplicationFilter {
    pub search: SearchQuery,
    pub status: Selection<ApplicationStatus>,
    pub internship: Option<InternshipId>,
}

impl Criteria<Application> for ApplicationFilter {
    fn matches(&self, application: &Application) -> bool {
        let full_name = application.applicant.full_name();
        let searched = self.search.matches_any([
            full_name.as_str(),
            application.applicant.email.as_str(),
            application.internship_title.as_str(),
            application.company.as_str(),
        ]);

        searched
            && self.status.admits(application.status)
            && self
                .internship
                .as_ref()
                .map_or(true, |id| *id == application.internship_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderFilter {
    pub search: SearchQuery,
    pub status: Selection<OrderStatus>,
    pub priority: Selection<OrderPriority>,
    pub window: DateWindow,
    pub quick: Option<OrderQuickFilter>,
    /// Reference date for the window and quick filters.
    pub as_of: NaiveDate,
}

impl OrderFilter {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            search: SearchQuery::default(),
            status: Selection::All,
            priority: Selection::All,
            window: DateWindow::All,
            quick: None,
            as_of,
        }
    }
}

impl Criteria<Order> for OrderFilter {
    fn matches(&self, order: &Order) -> bool {
        self.search.matches_any([
            order.id.0.as_str(),
            order.product.name.as_str(),
            order.customer.name.as_str(),
        ]) && self.status.admits(order.status)
            && self.priority.admits(order.priority)
            && self.window.contains(order.order_date, self.as_of)
            && self
                .quick
                .map_or(true, |quick| quick.matches(order, self.as_of))
    }
}
