use serde::Serialize;

use super::super::domain::{
    ApplicationStatus, InternshipId, InternshipStatus, OrderStatus, StudentApplicationStatus,
    Vocabulary,
};
use super::quick::OrderQuickFilter;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare<S> {
    pub status: S,
    pub label: &'static str,
    pub count: usize,
    pub percentage: f64,
}

/// Count and share of every status in a vocabulary, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusDistribution<S> {
    pub total: usize,
    pub entries: Vec<StatusShare<S>>,
}

impl<S: Vocabulary> StatusDistribution<S> {
    pub fn count(&self, status: S) -> usize {
        self.share(status).map_or(0, |share| share.count)
    }

    pub fn percentage(&self, status: S) -> f64 {
        self.share(status).map_or(0.0, |share| share.percentage)
    }

    fn share(&self, status: S) -> Option<&StatusShare<S>> {
        self.entries.iter().find(|share| share.status == status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickFilterCount {
    pub filter: OrderQuickFilter,
    pub label: &'static str,
    pub count: usize,
}

/// Bar for a "most applicants" style widget, scaled against the collection maximum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceBar {
    pub internship_id: InternshipId,
    pub title: String,
    pub company: String,
    pub value: u64,
    pub relative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternshipOverview {
    pub total_posted: usize,
    pub active_internships: usize,
    pub total_applicants: u64,
    pub total_views: u64,
    pub average_applicants: f64,
    pub status: StatusDistribution<InternshipStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub most_applied: Vec<PerformanceBar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InternshipApplicantCount {
    pub internship_id: InternshipId,
    pub internship_title: String,
    pub applications: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationAnalytics {
    pub total: usize,
    pub status: StatusDistribution<ApplicationStatus>,
    /// Shortlisted or accepted, as a share of all applications.
    pub shortlisted_ratio: f64,
    pub acceptance_ratio: f64,
    pub per_internship: Vec<InternshipApplicantCount>,
    /// Same applications in the student-facing vocabulary, for student sessions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_status: Option<StatusDistribution<StudentApplicationStatus>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub status: StatusDistribution<OrderStatus>,
    pub quick_filters: Vec<QuickFilterCount>,
    /// Sum of amounts over orders that were not cancelled.
    pub revenue: f64,
    pub units: u64,
}
