//! Synchronous checks run before anything is sent to the record store.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use super::domain::{StipendKind, UNPAID_STIPEND};
use super::store::{ApplicationDraft, InternshipDraft, MessageDraft};

pub const MAX_COVER_LETTER_CHARS: usize = 5_000;
pub const MAX_MESSAGE_CHARS: usize = 2_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub problem: String,
}

/// Every problem found in a payload, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&'static str> {
        self.issues.iter().map(|issue| issue.field).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid submission: ")?;
        for (index, issue) in self.issues.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{} {}", issue.field, issue.problem)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Default)]
struct Issues(Vec<FieldIssue>);

impl Issues {
    fn push(&mut self, field: &'static str, problem: impl Into<String>) {
        self.0.push(FieldIssue {
            field,
            problem: problem.into(),
        });
    }

    fn required(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        }
    }

    fn email(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        } else if !looks_like_email(value) {
            self.push(field, "must be an email address");
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues: self.0 })
        }
    }
}

fn looks_like_email(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

pub fn validate_internship(draft: &InternshipDraft, as_of: NaiveDate) -> Result<(), ValidationError> {
    let mut issues = Issues::default();
    issues.required("title", &draft.title);
    issues.required("company", &draft.company);
    issues.required("description", &draft.description);
    issues.required("location", &draft.location);
    issues.required("category", &draft.category);
    issues.required("duration", &draft.duration);
    issues.required("stipend", &draft.stipend);
    issues.email("contact.email", &draft.contact.email);

    if draft.stipend_kind == StipendKind::Unpaid && draft.stipend != UNPAID_STIPEND {
        issues.push("stipend", format!("must read '{UNPAID_STIPEND}' for unpaid postings"));
    }
    if draft.max_applicants == Some(0) {
        issues.push("max_applicants", "must be greater than zero");
    }
    if let Some(deadline) = draft.application_deadline {
        if deadline < as_of {
            issues.push("application_deadline", "cannot be in the past");
        }
    }
    if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
        if end < start {
            issues.push("end_date", "cannot be before start_date");
        }
    }

    issues.finish()
}

pub fn validate_application(draft: &ApplicationDraft) -> Result<(), ValidationError> {
    let mut issues = Issues::default();
    issues.required("internship_id", &draft.internship_id.0);
    issues.required("applicant.first_name", &draft.applicant.first_name);
    issues.required("applicant.last_name", &draft.applicant.last_name);
    issues.email("applicant.email", &draft.applicant.email);

    if let Some(letter) = &draft.cover_letter {
        if letter.chars().count() > MAX_COVER_LETTER_CHARS {
            issues.push(
                "cover_letter",
                format!("must be at most {MAX_COVER_LETTER_CHARS} characters"),
            );
        }
    }

    issues.finish()
}

pub fn validate_message(draft: &MessageDraft) -> Result<(), ValidationError> {
    let mut issues = Issues::default();
    issues.required("body", &draft.body);
    if draft.body.chars().count() > MAX_MESSAGE_CHARS {
        issues.push("body", format!("must be at most {MAX_MESSAGE_CHARS} characters"));
    }
    issues.finish()
}
