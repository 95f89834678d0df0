use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{HasStatus, Vocabulary};

/// Stipend text that marks an internship as unpaid.
pub const UNPAID_STIPEND: &str = "Unpaid";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InternshipId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternshipStatus {
    Active,
    Inactive,
    Draft,
    Expired,
}

impl Vocabulary for InternshipStatus {
    fn ordered() -> &'static [Self] {
        &[Self::Active, Self::Inactive, Self::Draft, Self::Expired]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Draft => "draft",
            Self::Expired => "expired",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Draft => "Draft",
            Self::Expired => "Expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StipendKind {
    Paid,
    Unpaid,
    PerformanceBased,
}

impl Vocabulary for StipendKind {
    fn ordered() -> &'static [Self] {
        &[Self::Paid, Self::Unpaid, Self::PerformanceBased]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::PerformanceBased => "performance_based",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
            Self::PerformanceBased => "Performance Based",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Internship posting as returned by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Internship {
    pub id: InternshipId,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub category: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub duration: String,
    /// Free-form amount such as "15000/month", or [`UNPAID_STIPEND`].
    pub stipend: String,
    pub stipend_kind: StipendKind,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: InternshipStatus,
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub applicants: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_applicants: Option<u32>,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub contact: ContactInfo,
}

impl Internship {
    /// Binary paid/unpaid classification driven by the stipend text alone.
    pub fn is_paid(&self) -> bool {
        self.stipend != UNPAID_STIPEND
    }
}

impl HasStatus for Internship {
    type Status = InternshipStatus;

    fn status(&self) -> InternshipStatus {
        self.status
    }
}
