use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::config::BoardConfig;
use crate::context::{CurrentUser, Role, SessionContext};
use crate::marketplace::domain::{
    Applicant, Application, ApplicationId, ApplicationStatus, ContactInfo, Internship,
    InternshipId, InternshipStatus, Message, Order, OrderId, OrderPriority, OrderStatus,
    CustomerSummary, ProductSummary, StipendKind, Vocabulary,
};
use crate::marketplace::store::{
    ApplicationDraft, ApplicationScope, InternshipDraft, MessageDraft, RecordStore, RequestError,
};
use crate::marketplace::MarketplaceService;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn as_of() -> NaiveDate {
    date(2024, 1, 15)
}

pub(super) fn internship(id: &str, title: &str) -> Internship {
    Internship {
        id: InternshipId(id.to_string()),
        title: title.to_string(),
        company: "Acme Labs".to_string(),
        description: "Work alongside the product team.".to_string(),
        location: "Bengaluru".to_string(),
        category: "Engineering".to_string(),
        skills: vec!["Rust".to_string()],
        duration: "3 months".to_string(),
        stipend: "15000/month".to_string(),
        stipend_kind: StipendKind::Paid,
        requirements: Vec::new(),
        responsibilities: Vec::new(),
        benefits: Vec::new(),
        tags: Vec::new(),
        status: InternshipStatus::Active,
        views: 0,
        applicants: 0,
        max_applicants: None,
        is_remote: false,
        is_urgent: false,
        start_date: None,
        end_date: None,
        application_deadline: None,
        created_at: at(2024, 1, 1),
        updated_at: at(2024, 1, 1),
        contact: ContactInfo {
            email: "jobs@acme.io".to_string(),
            phone: None,
            website: None,
        },
    }
}

pub(super) fn unpaid(mut internship: Internship) -> Internship {
    internship.stipend = "Unpaid".to_string();
    internship.stipend_kind = StipendKind::Unpaid;
    internship
}

pub(super) fn order(id: &str, status: OrderStatus, ship_by: NaiveDate) -> Order {
    Order {
        id: OrderId(id.to_string()),
        product: ProductSummary {
            name: "Desk Lamp".to_string(),
            sku: "LMP-01".to_string(),
        },
        customer: CustomerSummary {
            name: "Dana Whitfield".to_string(),
            email: None,
        },
        status,
        amount: 49.5,
        quantity: 1,
        priority: OrderPriority::Normal,
        is_late: false,
        is_verge_of_cancellation: false,
        order_date: ship_by - chrono::Duration::days(3),
        ship_by_date: ship_by,
    }
}

pub(super) fn application(id: &str, internship_id: &str, status: ApplicationStatus) -> Application {
    Application {
        id: ApplicationId(id.to_string()),
        internship_id: InternshipId(internship_id.to_string()),
        internship_title: format!("Internship {internship_id}"),
        company: "Acme Labs".to_string(),
        applicant: Applicant {
            first_name: "Priya".to_string(),
            last_name: "Raman".to_string(),
            email: "priya@student.edu".to_string(),
        },
        status,
        applied_at: at(2024, 1, 10),
        cover_letter: None,
        resume_url: None,
        portfolio_url: None,
        notes: None,
        messages: Vec::new(),
    }
}

pub(super) fn internship_draft() -> InternshipDraft {
    InternshipDraft {
        title: "Backend Intern".to_string(),
        company: "Acme Labs".to_string(),
        description: "Build APIs in Rust.".to_string(),
        location: "Remote".to_string(),
        category: "Engineering".to_string(),
        skills: vec!["Rust".to_string(), "SQL".to_string()],
        duration: "6 months".to_string(),
        stipend: "20000/month".to_string(),
        stipend_kind: StipendKind::Paid,
        requirements: Vec::new(),
        responsibilities: Vec::new(),
        benefits: Vec::new(),
        tags: Vec::new(),
        status: InternshipStatus::Active,
        max_applicants: Some(40),
        is_remote: true,
        is_urgent: false,
        start_date: Some(date(2024, 2, 1)),
        end_date: Some(date(2024, 8, 1)),
        application_deadline: Some(date(2024, 1, 31)),
        contact: ContactInfo {
            email: "jobs@acme.io".to_string(),
            phone: None,
            website: None,
        },
    }
}

pub(super) fn application_draft(internship_id: &str) -> ApplicationDraft {
    ApplicationDraft {
        internship_id: InternshipId(internship_id.to_string()),
        applicant: Applicant {
            first_name: "Arjun".to_string(),
            last_name: "Mehta".to_string(),
            email: "arjun@student.edu".to_string(),
        },
        cover_letter: Some("I would love to join.".to_string()),
        resume_url: None,
        portfolio_url: None,
    }
}

pub(super) fn admin_session() -> SessionContext {
    SessionContext::for_user(
        CurrentUser {
            id: "u-admin".to_string(),
            email: "ops@acme.io".to_string(),
            role: Role::Admin,
            company: None,
        },
        as_of(),
    )
}

pub(super) fn student_session(email: &str) -> SessionContext {
    SessionContext::for_user(
        CurrentUser {
            id: "u-student".to_string(),
            email: email.to_string(),
            role: Role::Student,
            company: None,
        },
        as_of(),
    )
}

pub(super) fn employer_session(company: &str) -> SessionContext {
    SessionContext::for_user(
        CurrentUser {
            id: "u-employer".to_string(),
            email: "talent@example.org".to_string(),
            role: Role::Employer,
            company: Some(company.to_string()),
        },
        as_of(),
    )
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) internships: Mutex<Vec<Internship>>,
    pub(super) applications: Mutex<Vec<Application>>,
    pub(super) orders: Mutex<Vec<Order>>,
    sequence: AtomicU64,
}

impl MemoryStore {
    pub(super) fn with(
        internships: Vec<Internship>,
        applications: Vec<Application>,
        orders: Vec<Order>,
    ) -> Self {
        Self {
            internships: Mutex::new(internships),
            applications: Mutex::new(applications),
            orders: Mutex::new(orders),
            sequence: AtomicU64::new(1),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-{id:04}")
    }
}

impl RecordStore for MemoryStore {
    fn list_internships(
        &self,
        status: Option<InternshipStatus>,
    ) -> Result<Vec<Internship>, RequestError> {
        let guard = self.internships.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .filter(|internship| status.map_or(true, |wanted| internship.status == wanted))
            .cloned()
            .collect())
    }

    fn list_applications(
        &self,
        scope: &ApplicationScope,
    ) -> Result<Vec<Application>, RequestError> {
        let guard = self.applications.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .filter(|application| scope.admits(application))
            .cloned()
            .collect())
    }

    fn list_orders(&self) -> Result<Vec<Order>, RequestError> {
        Ok(self.orders.lock().expect("store mutex poisoned").clone())
    }

    fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, RequestError> {
        let guard = self.orders.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|order| order.id == *id).cloned())
    }

    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<Application>, RequestError> {
        let guard = self.applications.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|application| application.id == *id).cloned())
    }

    fn create_internship(&self, draft: InternshipDraft) -> Result<Internship, RequestError> {
        let created = at(2024, 1, 15);
        let internship = Internship {
            id: InternshipId(self.next_id("int")),
            title: draft.title,
            company: draft.company,
            description: draft.description,
            location: draft.location,
            category: draft.category,
            skills: draft.skills,
            duration: draft.duration,
            stipend: draft.stipend,
            stipend_kind: draft.stipend_kind,
            requirements: draft.requirements,
            responsibilities: draft.responsibilities,
            benefits: draft.benefits,
            tags: draft.tags,
            status: draft.status,
            views: 0,
            applicants: 0,
            max_applicants: draft.max_applicants,
            is_remote: draft.is_remote,
            is_urgent: draft.is_urgent,
            start_date: draft.start_date,
            end_date: draft.end_date,
            application_deadline: draft.application_deadline,
            created_at: created,
            updated_at: created,
            contact: draft.contact,
        };
        self.internships
            .lock()
            .expect("store mutex poisoned")
            .push(internship.clone());
        Ok(internship)
    }

    fn create_application(&self, draft: ApplicationDraft) -> Result<Application, RequestError> {
        let mut internships = self.internships.lock().expect("store mutex poisoned");
        let internship = internships
            .iter_mut()
            .find(|internship| internship.id == draft.internship_id)
            .ok_or(RequestError::NotFound)?;
        internship.applicants += 1;

        let application = Application {
            id: ApplicationId(self.next_id("app")),
            internship_id: internship.id.clone(),
            internship_title: internship.title.clone(),
            company: internship.company.clone(),
            applicant: draft.applicant,
            status: ApplicationStatus::Pending,
            applied_at: at(2024, 1, 15),
            cover_letter: draft.cover_letter,
            resume_url: draft.resume_url,
            portfolio_url: draft.portfolio_url,
            notes: None,
            messages: Vec::new(),
        };
        self.applications
            .lock()
            .expect("store mutex poisoned")
            .push(application.clone());
        Ok(application)
    }

    fn send_message(&self, thread: &ApplicationId, message: MessageDraft) -> Result<(), RequestError> {
        let mut guard = self.applications.lock().expect("store mutex poisoned");
        let application = guard
            .iter_mut()
            .find(|application| application.id == *thread)
            .ok_or(RequestError::NotFound)?;
        application.messages.push(Message {
            sender: message.sender,
            body: message.body,
            sent_at: at(2024, 1, 15),
        });
        Ok(())
    }

    fn update_order_status(
        &self,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Order, RequestError> {
        let mut guard = self.orders.lock().expect("store mutex poisoned");
        let order = guard
            .iter_mut()
            .find(|order| order.id == *id)
            .ok_or(RequestError::NotFound)?;
        if order.status != from {
            return Err(RequestError::StatusChanged {
                current: order.status.label(),
            });
        }
        order.status = to;
        Ok(order.clone())
    }

    fn update_application_status(
        &self,
        id: &ApplicationId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Application, RequestError> {
        let mut guard = self.applications.lock().expect("store mutex poisoned");
        let application = guard
            .iter_mut()
            .find(|application| application.id == *id)
            .ok_or(RequestError::NotFound)?;
        if application.status != from {
            return Err(RequestError::StatusChanged {
                current: application.status.label(),
            });
        }
        application.status = to;
        Ok(application.clone())
    }
}

/// Store whose every call fails as if the backend were down.
pub(super) struct UnavailableStore;

impl UnavailableStore {
    fn down<T>() -> Result<T, RequestError> {
        Err(RequestError::Unavailable("connection refused".to_string()))
    }
}

impl RecordStore for UnavailableStore {
    fn list_internships(&self, _: Option<InternshipStatus>) -> Result<Vec<Internship>, RequestError> {
        Self::down()
    }

    fn list_applications(&self, _: &ApplicationScope) -> Result<Vec<Application>, RequestError> {
        Self::down()
    }

    fn list_orders(&self) -> Result<Vec<Order>, RequestError> {
        Self::down()
    }

    fn fetch_order(&self, _: &OrderId) -> Result<Option<Order>, RequestError> {
        Self::down()
    }

    fn fetch_application(&self, _: &ApplicationId) -> Result<Option<Application>, RequestError> {
        Self::down()
    }

    fn create_internship(&self, _: InternshipDraft) -> Result<Internship, RequestError> {
        Self::down()
    }

    fn create_application(&self, _: ApplicationDraft) -> Result<Application, RequestError> {
        Self::down()
    }

    fn send_message(&self, _: &ApplicationId, _: MessageDraft) -> Result<(), RequestError> {
        Self::down()
    }

    fn update_order_status(
        &self,
        _: &OrderId,
        _: OrderStatus,
        _: OrderStatus,
    ) -> Result<Order, RequestError> {
        Self::down()
    }

    fn update_application_status(
        &self,
        _: &ApplicationId,
        _: ApplicationStatus,
        _: ApplicationStatus,
    ) -> Result<Application, RequestError> {
        Self::down()
    }
}

pub(super) fn sample_store() -> MemoryStore {
    let mut frontend = internship("int-1", "Frontend Developer Intern");
    frontend.description = "Ship UI features with React and TypeScript.".to_string();
    frontend.skills = vec!["React".to_string(), "TypeScript".to_string()];
    frontend.applicants = 12;
    frontend.views = 340;

    let mut research = unpaid(internship("int-2", "Research Assistant"));
    research.company = "Open Science Trust".to_string();
    research.applicants = 3;
    research.views = 90;

    let mut data = internship("int-3", "Data Analyst Intern");
    data.status = InternshipStatus::Draft;

    let mut urgent = order("ORD-1", OrderStatus::Pending, date(2024, 1, 18));
    urgent.priority = OrderPriority::Prime;
    let early = order("ORD-2", OrderStatus::Pending, date(2024, 1, 13));
    let mut prime = order("ORD-3", OrderStatus::Unshipped, as_of());
    prime.priority = OrderPriority::Prime;
    prime.is_late = true;

    let mut shortlisted = application("app-1", "int-1", ApplicationStatus::Shortlisted);
    shortlisted.applicant.email = "meera@student.edu".to_string();

    MemoryStore::with(
        vec![frontend, research, data],
        vec![
            shortlisted,
            application("app-2", "int-1", ApplicationStatus::Pending),
            application("app-3", "int-2", ApplicationStatus::Rejected),
        ],
        vec![urgent, early, prime],
    )
}

pub(super) fn build_service() -> (MarketplaceService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(sample_store());
    let service = MarketplaceService::new(store.clone(), BoardConfig::default());
    (service, store)
}
