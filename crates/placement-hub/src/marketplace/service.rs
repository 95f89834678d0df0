use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::analytics::views::{ApplicationAnalytics, InternshipOverview, OrderSummary};
use super::analytics::{
    application_analytics, internship_overview, order_summary, student_status_distribution,
};
use super::domain::{
    Application, ApplicationId, ApplicationStatus, Internship, InternshipStatus, MessageSender,
    Order, OrderId, OrderStatus, Vocabulary,
};
use super::lifecycle::{validate_transition, TransitionError};
use super::store::{
    ApplicationDraft, ApplicationScope, InternshipDraft, MessageDraft, RecordStore, RequestError,
};
use super::validation::{
    validate_application, validate_internship, validate_message, ValidationError,
};
use crate::config::BoardConfig;
use crate::context::{CurrentUser, Role, SessionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// User-visible, dismissible message produced at the page boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    pub dismissible: bool,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
            dismissible: true,
        }
    }
}

impl From<&BoardError> for Notification {
    fn from(error: &BoardError) -> Self {
        let (level, title) = match error {
            BoardError::Retrieval { .. } => (NoticeLevel::Warning, "Could not load data"),
            BoardError::Submission(_) => (NoticeLevel::Error, "Submission failed"),
            BoardError::Validation(_) => (NoticeLevel::Warning, "Please review the form"),
            BoardError::Transition(_) => (NoticeLevel::Warning, "Status change not allowed"),
            BoardError::NotFound { .. } => (NoticeLevel::Error, "Not found"),
            BoardError::Forbidden { .. } => (NoticeLevel::Error, "Not permitted"),
        };
        Self {
            level,
            title: title.to_string(),
            message: error.to_string(),
            dismissible: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("could not load {what}: {source}")]
    Retrieval {
        what: &'static str,
        #[source]
        source: RequestError,
    },
    #[error("submission failed: {0}")]
    Submission(#[source] RequestError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("{what} '{id}' not found")]
    NotFound { what: &'static str, id: String },
    #[error("{who} may not {action}")]
    Forbidden {
        who: &'static str,
        action: &'static str,
    },
}

impl BoardError {
    pub fn notification(&self) -> Notification {
        Notification::from(self)
    }

    fn forbidden(session: &SessionContext, action: &'static str) -> Self {
        Self::Forbidden {
            who: session.role().map_or("Anonymous caller", Role::label),
            action,
        }
    }

    fn submission(what: &'static str, id: &str, source: RequestError) -> Self {
        match source {
            RequestError::NotFound => Self::NotFound {
                what,
                id: id.to_string(),
            },
            other => Self::Submission(other),
        }
    }
}

/// A listing that always yields a collection; failures become an empty list plus a notice.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub notice: Option<Notification>,
}

impl<T> Loaded<T> {
    fn from_result(what: &'static str, result: Result<Vec<T>, RequestError>) -> Self {
        match result {
            Ok(records) => Self {
                records,
                notice: None,
            },
            Err(source) => {
                warn!(what, error = %source, "listing failed, showing an empty collection");
                let error = BoardError::Retrieval { what, source };
                Self {
                    records: Vec::new(),
                    notice: Some(error.notification()),
                }
            }
        }
    }
}

/// Page-level operations over a record store.
pub struct MarketplaceService<S> {
    store: Arc<S>,
    board: BoardConfig,
}

impl<S> MarketplaceService<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>, board: BoardConfig) -> Self {
        Self { store, board }
    }

    pub fn board_config(&self) -> BoardConfig {
        self.board
    }

    pub fn internships(&self, status: Option<InternshipStatus>) -> Loaded<Internship> {
        Loaded::from_result("internships", self.store.list_internships(status))
    }

    pub fn applications(&self, session: &SessionContext) -> Loaded<Application> {
        let scope = ApplicationScope::for_session(session);
        if scope == ApplicationScope::Nothing {
            return Loaded {
                records: Vec::new(),
                notice: None,
            };
        }
        Loaded::from_result("applications", self.store.list_applications(&scope))
    }

    pub fn orders(&self) -> Loaded<Order> {
        Loaded::from_result("orders", self.store.list_orders())
    }

    pub fn internship_overview(&self) -> (InternshipOverview, Option<Notification>) {
        let Loaded { records, notice } = self.internships(None);
        (internship_overview(&records, self.board.top_performers), notice)
    }

    pub fn application_analytics(
        &self,
        session: &SessionContext,
    ) -> (ApplicationAnalytics, Option<Notification>) {
        let Loaded { records, notice } = self.applications(session);
        let mut analytics = application_analytics(&records);
        if session.role() == Some(Role::Student) {
            analytics.student_status = Some(student_status_distribution(&records));
        }
        (analytics, notice)
    }

    pub fn order_summary(&self, session: &SessionContext) -> (OrderSummary, Option<Notification>) {
        let Loaded { records, notice } = self.orders();
        (order_summary(&records, session.as_of), notice)
    }

    pub fn post_internship(
        &self,
        session: &SessionContext,
        draft: InternshipDraft,
    ) -> Result<Internship, BoardError> {
        let user = staff(session, "post internships")?;
        if user.role == Role::Employer
            && !user
                .company
                .as_deref()
                .is_some_and(|company| company.eq_ignore_ascii_case(draft.company.trim()))
        {
            return Err(BoardError::forbidden(session, "post for another company"));
        }
        validate_internship(&draft, session.as_of)?;
        let internship = self
            .store
            .create_internship(draft)
            .map_err(BoardError::Submission)?;
        info!(internship_id = %internship.id.0, company = %internship.company, "internship posted");
        Ok(internship)
    }

    pub fn apply(&self, draft: ApplicationDraft) -> Result<Application, BoardError> {
        validate_application(&draft)?;
        let internship_id = draft.internship_id.0.clone();
        let application = self
            .store
            .create_application(draft)
            .map_err(|source| BoardError::submission("internship", &internship_id, source))?;
        info!(
            application_id = %application.id.0,
            internship_id = %internship_id,
            "application received"
        );
        Ok(application)
    }

    /// Append a message to an application thread the caller can see, as the caller's own party.
    pub fn send_message(
        &self,
        session: &SessionContext,
        thread: &ApplicationId,
        message: MessageDraft,
    ) -> Result<(), BoardError> {
        let Some(user) = &session.user else {
            return Err(BoardError::forbidden(session, "send messages"));
        };
        let speaks_as = match user.role {
            Role::Admin => true,
            Role::Employer => message.sender == MessageSender::Employer,
            Role::Student => message.sender == MessageSender::Student,
        };
        if !speaks_as {
            return Err(BoardError::forbidden(session, "send messages for the other party"));
        }
        validate_message(&message)?;
        self.visible_application(session, thread, "send messages on this application")?;

        self.store
            .send_message(thread, message)
            .map_err(|source| BoardError::submission("application", &thread.0, source))
    }

    pub fn change_order_status(
        &self,
        session: &SessionContext,
        id: &OrderId,
        next: OrderStatus,
    ) -> Result<Order, BoardError> {
        staff(session, "change order status")?;
        let current = self
            .store
            .fetch_order(id)
            .map_err(BoardError::Submission)?
            .ok_or_else(|| BoardError::NotFound {
                what: "order",
                id: id.0.clone(),
            })?;
        validate_transition(current.status, next)?;

        let updated = self
            .store
            .update_order_status(id, current.status, next)
            .map_err(|source| BoardError::submission("order", &id.0, source))?;
        info!(
            order_id = %id.0,
            from = current.status.label(),
            to = next.label(),
            "order status changed"
        );
        Ok(updated)
    }

    /// Staff move applications along the pipeline; students may only withdraw their own.
    pub fn change_application_status(
        &self,
        session: &SessionContext,
        id: &ApplicationId,
        next: ApplicationStatus,
    ) -> Result<Application, BoardError> {
        let student = match session.role() {
            None => return Err(BoardError::forbidden(session, "change application status")),
            Some(role) => role == Role::Student,
        };
        if student && next != ApplicationStatus::Withdrawn {
            return Err(BoardError::forbidden(session, "change application status"));
        }
        let current = self.visible_application(session, id, "change this application")?;
        validate_transition(current.status, next)?;

        let updated = self
            .store
            .update_application_status(id, current.status, next)
            .map_err(|source| BoardError::submission("application", &id.0, source))?;
        info!(
            application_id = %id.0,
            from = current.status.label(),
            to = next.label(),
            "application status changed"
        );
        Ok(updated)
    }

    fn visible_application(
        &self,
        session: &SessionContext,
        id: &ApplicationId,
        action: &'static str,
    ) -> Result<Application, BoardError> {
        let application = self
            .store
            .fetch_application(id)
            .map_err(BoardError::Submission)?
            .ok_or_else(|| BoardError::NotFound {
                what: "application",
                id: id.0.clone(),
            })?;
        if ApplicationScope::for_session(session).admits(&application) {
            Ok(application)
        } else {
            Err(BoardError::forbidden(session, action))
        }
    }
}

fn staff<'s>(session: &'s SessionContext, action: &'static str) -> Result<&'s CurrentUser, BoardError> {
    match &session.user {
        Some(user) if matches!(user.role, Role::Admin | Role::Employer) => Ok(user),
        _ => Err(BoardError::forbidden(session, action)),
    }
}
