use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::super::domain::{
    Application, ApplicationStatus, HasStatus, Internship, InternshipId, InternshipStatus, Order,
    OrderStatus, StudentApplicationStatus, Vocabulary,
};
use super::quick::quick_filter_counts;
use super::views::{
    ApplicationAnalytics, InternshipApplicantCount, InternshipOverview, OrderSummary,
    PerformanceBar, StatusDistribution, StatusShare,
};

/// `100 * part / whole` rounded to one decimal; zero when `whole` is zero.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_tenths(part as f64 * 100.0 / whole as f64)
}

/// `total / count` rounded to one decimal; zero when `count` is zero.
pub fn average(total: u64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_tenths(total as f64 / count as f64)
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn distribution_of<S: Vocabulary>(statuses: impl IntoIterator<Item = S>) -> StatusDistribution<S> {
    let mut counts = vec![0usize; S::ordered().len()];
    let mut total = 0usize;
    for status in statuses {
        if let Some(slot) = S::ordered().iter().position(|candidate| *candidate == status) {
            counts[slot] += 1;
        }
        total += 1;
    }

    let entries = S::ordered()
        .iter()
        .zip(counts)
        .map(|(&status, count)| StatusShare {
            status,
            label: status.label(),
            count,
            percentage: percentage(count as u64, total as u64),
        })
        .collect();

    StatusDistribution { total, entries }
}

pub fn status_distribution<R: HasStatus>(records: &[R]) -> StatusDistribution<R::Status> {
    distribution_of(records.iter().map(|record| record.status()))
}

/// Distribution in the student vocabulary; withdrawn applications are left out.
pub fn student_status_distribution(
    applications: &[Application],
) -> StatusDistribution<StudentApplicationStatus> {
    distribution_of(
        applications
            .iter()
            .filter_map(|application| application.status.student_view()),
    )
}

/// Pair every record with its metric and the metric relative to the collection maximum.
pub fn relative_bars<'a, R>(records: &'a [R], metric: impl Fn(&R) -> u64) -> Vec<(&'a R, u64, f64)> {
    let max = records.iter().map(&metric).max().unwrap_or(0);
    records
        .iter()
        .map(|record| {
            let value = metric(record);
            (record, value, percentage(value, max))
        })
        .collect()
}

pub fn internship_overview(internships: &[Internship], top: usize) -> InternshipOverview {
    let total_posted = internships.len();
    let active_internships = internships
        .iter()
        .filter(|internship| internship.status == InternshipStatus::Active)
        .count();
    let total_applicants: u64 = internships
        .iter()
        .map(|internship| u64::from(internship.applicants))
        .sum();
    let total_views: u64 = internships
        .iter()
        .map(|internship| u64::from(internship.views))
        .sum();

    let mut bars = relative_bars(internships, |internship| u64::from(internship.applicants));
    bars.sort_by(|left, right| right.1.cmp(&left.1));
    let most_applied = bars
        .into_iter()
        .take(top)
        .map(|(internship, value, relative)| PerformanceBar {
            internship_id: internship.id.clone(),
            title: internship.title.clone(),
            company: internship.company.clone(),
            value,
            relative,
        })
        .collect();

    InternshipOverview {
        total_posted,
        active_internships,
        total_applicants,
        total_views,
        average_applicants: average(total_applicants, total_posted as u64),
        status: status_distribution(internships),
        most_applied,
    }
}

pub fn application_analytics(applications: &[Application]) -> ApplicationAnalytics {
    let total = applications.len() as u64;
    let status = status_distribution(applications);
    let shortlisted = status.count(ApplicationStatus::Shortlisted)
        + status.count(ApplicationStatus::Accepted);
    let accepted = status.count(ApplicationStatus::Accepted);

    let mut grouped: BTreeMap<&InternshipId, InternshipApplicantCount> = BTreeMap::new();
    for application in applications {
        grouped
            .entry(&application.internship_id)
            .or_insert_with(|| InternshipApplicantCount {
                internship_id: application.internship_id.clone(),
                internship_title: application.internship_title.clone(),
                applications: 0,
            })
            .applications += 1;
    }
    let mut per_internship: Vec<InternshipApplicantCount> = grouped.into_values().collect();
    per_internship.sort_by(|left, right| right.applications.cmp(&left.applications));

    ApplicationAnalytics {
        total: applications.len(),
        status,
        shortlisted_ratio: percentage(shortlisted as u64, total),
        acceptance_ratio: percentage(accepted as u64, total),
        per_internship,
        student_status: None,
    }
}

pub fn order_summary(orders: &[Order], as_of: NaiveDate) -> OrderSummary {
    let billable = orders
        .iter()
        .filter(|order| order.status != OrderStatus::Cancelled);
    let (revenue, units) = billable.fold((0.0, 0u64), |(revenue, units), order| {
        (revenue + order.amount, units + u64::from(order.quantity))
    });

    OrderSummary {
        status: status_distribution(orders),
        quick_filters: quick_filter_counts(orders, as_of),
        revenue,
        units,
    }
}
