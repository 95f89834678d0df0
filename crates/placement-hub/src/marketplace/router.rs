use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::CONTENT_LANGUAGE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    Application, ApplicationId, ApplicationStatus, Internship, InternshipId, Order, OrderId,
    OrderStatus, StudentApplicationStatus, Vocabulary,
};
use super::query::{
    ApplicationFilter, BoardQuery, BoardView, DateWindow, DisplayLimit, InternshipFilter,
    OrderFilter, SearchQuery, Selection, SortSpec, StipendFilter,
};
use super::service::{BoardError, MarketplaceService, Notification};
use super::store::{ApplicationDraft, InternshipDraft, MessageDraft, RecordStore, RequestError};
use crate::context::{CurrentUser, Role, SessionContext};

/// Router builder exposing the marketplace list, analytics and mutation endpoints.
pub fn marketplace_router<S>(service: Arc<MarketplaceService<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/internships",
            get(list_internships::<S>).post(post_internship::<S>),
        )
        .route(
            "/api/v1/internships/overview",
            get(internship_overview_handler::<S>),
        )
        .route(
            "/api/v1/applications",
            get(list_applications::<S>).post(submit_application::<S>),
        )
        .route(
            "/api/v1/applications/analytics",
            get(application_analytics_handler::<S>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            post(change_application_status::<S>),
        )
        .route(
            "/api/v1/applications/:application_id/messages",
            post(send_message::<S>),
        )
        .route("/api/v1/orders", get(list_orders::<S>))
        .route("/api/v1/orders/summary", get(order_summary_handler::<S>))
        .route(
            "/api/v1/orders/:order_id/status",
            post(change_order_status::<S>),
        )
        .with_state(service)
}

/// Build the request context from identity headers; `x-as-of` pins the reference date.
pub fn session_from_headers(headers: &HeaderMap) -> SessionContext {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let as_of = header("x-as-of")
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .unwrap_or_else(|| Local::now().date_naive());

    let user = header("x-user-role")
        .and_then(|raw| raw.parse::<Role>().ok())
        .map(|role| CurrentUser {
            id: header("x-user-id").unwrap_or_default().to_string(),
            email: header("x-user-email").unwrap_or_default().to_string(),
            role,
            company: header("x-user-company").map(str::to_string),
        });

    let locale = header("accept-language")
        .and_then(|raw| raw.split([',', ';']).next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .unwrap_or("en")
        .to_string();

    SessionContext {
        user,
        locale,
        as_of,
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub matched: usize,
    pub total: usize,
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notification>,
}

impl<T> ListResponse<T> {
    fn from_view<R>(
        view: BoardView<'_, R>,
        limit: DisplayLimit,
        notice: Option<Notification>,
        row: impl Fn(&R) -> T,
    ) -> Self {
        Self {
            items: view.records.into_iter().map(row).collect(),
            matched: view.matched,
            total: view.total,
            limit: limit.get(),
            notice,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InternshipListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub stipend: Option<String>,
    pub stipend_kind: Option<String>,
    #[serde(default)]
    pub remote: bool,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub limit: Option<String>,
}

impl InternshipListParams {
    pub fn to_query(
        &self,
        default_limit: DisplayLimit,
    ) -> BoardQuery<InternshipFilter, super::query::InternshipSortKey> {
        let filter = InternshipFilter {
            search: SearchQuery::from_option(self.search.as_deref()),
            status: Selection::parse(self.status.as_deref()),
            stipend: self
                .stipend
                .as_deref()
                .and_then(|raw| raw.parse::<StipendFilter>().ok())
                .unwrap_or_default(),
            stipend_kind: Selection::parse(self.stipend_kind.as_deref()),
            remote_only: self.remote,
            ..InternshipFilter::default()
        }
        .with_category(self.category.as_deref())
        .with_location(self.location.as_deref());

        BoardQuery {
            filter,
            sort: SortSpec::parse(self.sort.as_deref(), self.direction.as_deref()),
            limit: DisplayLimit::parse_or(self.limit.as_deref(), default_limit),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub internship_id: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub limit: Option<String>,
}

impl ApplicationListParams {
    pub fn to_query(
        &self,
        default_limit: DisplayLimit,
    ) -> BoardQuery<ApplicationFilter, super::query::ApplicationSortKey> {
        BoardQuery {
            filter: ApplicationFilter {
                search: SearchQuery::from_option(self.search.as_deref()),
                status: Selection::parse(self.status.as_deref()),
                internship: self
                    .internship_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|raw| !raw.is_empty() && !raw.eq_ignore_ascii_case("all"))
                    .map(|raw| InternshipId(raw.to_string())),
            },
            sort: SortSpec::parse(self.sort.as_deref(), self.direction.as_deref()),
            limit: DisplayLimit::parse_or(self.limit.as_deref(), default_limit),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub window: Option<String>,
    pub quick: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub limit: Option<String>,
}

impl OrderListParams {
    pub fn to_query(
        &self,
        as_of: NaiveDate,
        default_limit: DisplayLimit,
    ) -> BoardQuery<OrderFilter, super::query::OrderSortKey> {
        let filter = OrderFilter {
            search: SearchQuery::from_option(self.search.as_deref()),
            status: Selection::parse(self.status.as_deref()),
            priority: Selection::parse(self.priority.as_deref()),
            window: self
                .window
                .as_deref()
                .and_then(|raw| raw.parse::<DateWindow>().ok())
                .unwrap_or_default(),
            quick: self
                .quick
                .as_deref()
                .filter(|raw| !raw.trim().eq_ignore_ascii_case("all"))
                .and_then(|raw| raw.parse().ok()),
            ..OrderFilter::new(as_of)
        };

        BoardQuery {
            filter,
            sort: SortSpec::parse(self.sort.as_deref(), self.direction.as_deref()),
            limit: DisplayLimit::parse_or(self.limit.as_deref(), default_limit),
        }
    }
}

/// Application row with the student-facing status alongside the canonical one.
#[derive(Debug, Serialize)]
pub struct ApplicationRow {
    #[serde(flatten)]
    pub application: Application,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_status: Option<StudentApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_status_label: Option<&'static str>,
}

impl ApplicationRow {
    fn new(application: &Application, session: &SessionContext) -> Self {
        let student_status = match session.role() {
            Some(Role::Student) => application.status.student_view(),
            _ => None,
        };
        Self {
            application: application.clone(),
            student_status,
            student_status_label: student_status.map(StudentApplicationStatus::label),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusChange<T> {
    pub status: T,
}

fn default_limit<S: RecordStore + 'static>(service: &MarketplaceService<S>) -> DisplayLimit {
    DisplayLimit::new(service.board_config().display_limit).unwrap_or_default()
}

pub(crate) async fn list_internships<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    Query(params): Query<InternshipListParams>,
) -> Response
where
    S: RecordStore + 'static,
{
    let query = params.to_query(default_limit(&service));
    let loaded = service.internships(None);
    let view = query.run(&loaded.records);
    let body = ListResponse::from_view(view, query.limit, loaded.notice, Internship::clone);
    (StatusCode::OK, axum::Json(body)).into_response()
}

pub(crate) async fn post_internship<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<InternshipDraft>,
) -> Response
where
    S: RecordStore + 'static,
{
    let session = session_from_headers(&headers);
    let response = match service.post_internship(&session, draft) {
        Ok(internship) => {
            let notification = Notification::success(
                "Internship posted",
                format!("{} is now listed", internship.title),
            );
            let payload = json!({ "internship": internship, "notification": notification });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    };
    localized(&session, response)
}

pub(crate) async fn internship_overview_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
) -> Response
where
    S: RecordStore + 'static,
{
    let (overview, notice) = service.internship_overview();
    let payload = json!({ "overview": overview, "notice": notice });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn list_applications<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
    Query(params): Query<ApplicationListParams>,
) -> Response
where
    S: RecordStore + 'static,
{
    let session = session_from_headers(&headers);
    let query = params.to_query(default_limit(&service));
    let loaded = service.applications(&session);
    let view = query.run(&loaded.records);
    let body = ListResponse::from_view(view, query.limit, loaded.notice, |application| {
        ApplicationRow::new(application, &session)
    });
    localized(&session, (StatusCode::OK, axum::Json(body)).into_response())
}

pub(crate) async fn submit_application<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    axum::Json(draft): axum::Json<ApplicationDraft>,
) -> Response
where
    S: RecordStore + 'static,
{
    match service.apply(draft) {
        Ok(application) => {
            let notification = Notification::success(
                "Application sent",
                format!("Your application for {} was received", application.internship_title),
            );
            let payload = json!({ "application": application, "notification": notification });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn application_analytics_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
{
    let session = session_from_headers(&headers);
    let (analytics, notice) = service.application_analytics(&session);
    let payload = json!({ "analytics": analytics, "notice": notice });
    localized(&session, (StatusCode::OK, axum::Json(payload)).into_response())
}

pub(crate) async fn change_application_status<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
    axum::Json(change): axum::Json<StatusChange<ApplicationStatus>>,
) -> Response
where
    S: RecordStore + 'static,
{
    let session = session_from_headers(&headers);
    let id = ApplicationId(application_id);
    let response = match service.change_application_status(&session, &id, change.status) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    };
    localized(&session, response)
}

pub(crate) async fn send_message<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
    axum::Json(message): axum::Json<MessageDraft>,
) -> Response
where
    S: RecordStore + 'static,
{
    let session = session_from_headers(&headers);
    let id = ApplicationId(application_id);
    let response = match service.send_message(&session, &id, message) {
        Ok(()) => {
            let payload = json!({ "application_id": id.0, "status": "sent" });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    };
    localized(&session, response)
}

pub(crate) async fn list_orders<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
    Query(params): Query<OrderListParams>,
) -> Response
where
    S: RecordStore + 'static,
{
    let session = session_from_headers(&headers);
    let query = params.to_query(session.as_of, default_limit(&service));
    let loaded = service.orders();
    let view = query.run(&loaded.records);
    let body = ListResponse::from_view(view, query.limit, loaded.notice, Order::clone);
    localized(&session, (StatusCode::OK, axum::Json(body)).into_response())
}

pub(crate) async fn order_summary_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
{
    let session = session_from_headers(&headers);
    let (summary, notice) = service.order_summary(&session);
    let payload = json!({ "as_of": session.as_of, "summary": summary, "notice": notice });
    localized(&session, (StatusCode::OK, axum::Json(payload)).into_response())
}

pub(crate) async fn change_order_status<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
    axum::Json(change): axum::Json<StatusChange<OrderStatus>>,
) -> Response
where
    S: RecordStore + 'static,
{
    let session = session_from_headers(&headers);
    let id = OrderId(order_id);
    let response = match service.change_order_status(&session, &id, change.status) {
        Ok(order) => (StatusCode::OK, axum::Json(order)).into_response(),
        Err(error) => error_response(error),
    };
    localized(&session, response)
}

/// Tag the response with the caller's language from `accept-language`.
fn localized(session: &SessionContext, mut response: Response) -> Response {
    if let Ok(value) = HeaderValue::from_str(&session.locale) {
        response.headers_mut().insert(CONTENT_LANGUAGE, value);
    }
    response
}

fn error_response(error: BoardError) -> Response {
    let status = match &error {
        BoardError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BoardError::Transition(_)
        | BoardError::Submission(RequestError::Conflict | RequestError::StatusChanged { .. }) => {
            StatusCode::CONFLICT
        }
        BoardError::NotFound { .. } => StatusCode::NOT_FOUND,
        BoardError::Forbidden { .. } => StatusCode::FORBIDDEN,
        BoardError::Retrieval { .. } | BoardError::Submission(_) => StatusCode::BAD_GATEWAY,
    };

    let mut payload = json!({
        "error": error.to_string(),
        "notification": error.notification(),
    });
    if let BoardError::Validation(invalid) = &error {
        payload["issues"] = json!(invalid.issues);
    }
    (status, axum::Json(payload)).into_response()
}
