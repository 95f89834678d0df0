use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    Applicant, Application, ApplicationId, ApplicationStatus, ContactInfo, Internship,
    InternshipId, InternshipStatus, MessageSender, Order, OrderId, OrderStatus, StipendKind,
};
use crate::context::{Role, SessionContext};

/// Which applications a caller may list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationScope {
    All,
    Company(String),
    Applicant { email: String },
    Nothing,
}

impl ApplicationScope {
    pub fn for_session(session: &SessionContext) -> Self {
        let Some(user) = &session.user else {
            return Self::Nothing;
        };
        match user.role {
            Role::Admin => Self::All,
            Role::Employer => match &user.company {
                Some(company) => Self::Company(company.clone()),
                None => Self::Nothing,
            },
            Role::Student => Self::Applicant {
                email: user.email.clone(),
            },
        }
    }

    pub fn admits(&self, application: &Application) -> bool {
        match self {
            Self::All => true,
            Self::Company(company) => application.company.eq_ignore_ascii_case(company),
            Self::Applicant { email } => application.applicant.email.eq_ignore_ascii_case(email),
            Self::Nothing => false,
        }
    }
}

fn default_posting_status() -> InternshipStatus {
    InternshipStatus::Active
}

/// Payload for posting a new internship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternshipDraft {
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub category: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub duration: String,
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
    #[serde(default = "default_posting_status")]
    pub status: InternshipStatus,
    #[serde(default)]
    pub max_applicants: Option<u32>,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub application_deadline: Option<NaiveDate>,
    pub contact: ContactInfo,
}

/// Payload for a student applying to an internship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub internship_id: InternshipId,
    pub applicant: Applicant,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub sender: MessageSender,
    pub body: String,
}

/// Backend that owns the marketplace records.
pub trait RecordStore: Send + Sync {
    fn list_internships(
        &self,
        status: Option<InternshipStatus>,
    ) -> Result<Vec<Internship>, RequestError>;
    fn list_applications(&self, scope: &ApplicationScope)
        -> Result<Vec<Application>, RequestError>;
    fn list_orders(&self) -> Result<Vec<Order>, RequestError>;
    fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, RequestError>;
    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<Application>, RequestError>;
    fn create_internship(&self, draft: InternshipDraft) -> Result<Internship, RequestError>;
    fn create_application(&self, draft: ApplicationDraft) -> Result<Application, RequestError>;
    fn send_message(&self, thread: &ApplicationId, message: MessageDraft)
        -> Result<(), RequestError>;
    /// Set `to` only while the stored status still equals `from`; otherwise `StatusChanged`.
    fn update_order_status(
        &self,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Order, RequestError>;
    fn update_application_status(
        &self,
        id: &ApplicationId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Application, RequestError>;
}

/// Failure reported by the record store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("record already exists")]
    Conflict,
    #[error("status changed to {current} since it was read")]
    StatusChanged { current: &'static str },
    #[error("record not found")]
    NotFound,
}
