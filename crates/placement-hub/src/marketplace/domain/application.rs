use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::internship::InternshipId;
use super::{HasStatus, Vocabulary};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Canonical application status used by the management view and the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Interviewed,
    Accepted,
    Rejected,
    Withdrawn,
}

impl Vocabulary for ApplicationStatus {
    fn ordered() -> &'static [Self] {
        &[
            Self::Pending,
            Self::Reviewed,
            Self::Shortlisted,
            Self::Interviewed,
            Self::Accepted,
            Self::Rejected,
            Self::Withdrawn,
        ]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Shortlisted => "shortlisted",
            Self::Interviewed => "interviewed",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Reviewed => "Reviewed",
            Self::Shortlisted => "Shortlisted",
            Self::Interviewed => "Interviewed",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::Withdrawn => "Withdrawn",
        }
    }
}

impl ApplicationStatus {
    /// Projection into the student-facing vocabulary.
    ///
    /// Withdrawn applications have no student-facing status and return `None`.
    pub const fn student_view(self) -> Option<StudentApplicationStatus> {
        match self {
            Self::Pending | Self::Reviewed => Some(StudentApplicationStatus::Applied),
            Self::Shortlisted => Some(StudentApplicationStatus::Shortlisted),
            Self::Interviewed => Some(StudentApplicationStatus::InterviewScheduled),
            Self::Accepted => Some(StudentApplicationStatus::Selected),
            Self::Rejected => Some(StudentApplicationStatus::Rejected),
            Self::Withdrawn => None,
        }
    }
}

/// Status vocabulary shown on the student's own application list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentApplicationStatus {
    Applied,
    Shortlisted,
    InterviewScheduled,
    Selected,
    Rejected,
}

impl Vocabulary for StudentApplicationStatus {
    fn ordered() -> &'static [Self] {
        &[
            Self::Applied,
            Self::Shortlisted,
            Self::InterviewScheduled,
            Self::Selected,
            Self::Rejected,
        ]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Shortlisted => "shortlisted",
            Self::InterviewScheduled => "interview_scheduled",
            Self::Selected => "selected",
            Self::Rejected => "rejected",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Shortlisted => "Shortlisted",
            Self::InterviewScheduled => "Interview Scheduled",
            Self::Selected => "Selected",
            Self::Rejected => "Rejected",
        }
    }
}

impl From<StudentApplicationStatus> for ApplicationStatus {
    fn from(value: StudentApplicationStatus) -> Self {
        match value {
            StudentApplicationStatus::Applied => Self::Pending,
            StudentApplicationStatus::Shortlisted => Self::Shortlisted,
            StudentApplicationStatus::InterviewScheduled => Self::Interviewed,
            StudentApplicationStatus::Selected => Self::Accepted,
            StudentApplicationStatus::Rejected => Self::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Applicant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSender {
    Student,
    Employer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: MessageSender,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub internship_id: InternshipId,
    pub internship_title: String,
    pub company: String,
    pub applicant: Applicant,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Oldest first.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl HasStatus for Application {
    type Status = ApplicationStatus;

    fn status(&self) -> ApplicationStatus {
        self.status
    }
}
