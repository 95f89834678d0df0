use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use placement_hub::marketplace::domain::{
    Applicant, Application, ApplicationId, ApplicationStatus, ContactInfo, CustomerSummary,
    Internship, InternshipId, InternshipStatus, Message, MessageSender, Order, OrderId,
    OrderPriority, OrderStatus, ProductSummary, StipendKind, Vocabulary, UNPAID_STIPEND,
};
use placement_hub::marketplace::{
    ApplicationDraft, ApplicationScope, InternshipDraft, MessageDraft, RecordStore, RequestError,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local record store used by `serve` and `demo`.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    internships: Arc<Mutex<BTreeMap<InternshipId, Internship>>>,
    applications: Arc<Mutex<BTreeMap<ApplicationId, Application>>>,
    orders: Arc<Mutex<BTreeMap<OrderId, Order>>>,
    sequence: Arc<AtomicU64>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RequestError> {
    mutex
        .lock()
        .map_err(|_| RequestError::Unavailable("record store lock poisoned".to_string()))
}

impl InMemoryRecordStore {
    /// Store pre-populated with sample postings, applications and orders around `as_of`.
    pub(crate) fn seeded(as_of: NaiveDate) -> Self {
        let store = Self::default();
        store.sequence.store(100, Ordering::Relaxed);
        if let Ok(mut guard) = store.internships.lock() {
            guard.extend(
                sample_internships(as_of)
                    .into_iter()
                    .map(|internship| (internship.id.clone(), internship)),
            );
        }
        if let Ok(mut guard) = store.applications.lock() {
            guard.extend(
                sample_applications(as_of)
                    .into_iter()
                    .map(|application| (application.id.clone(), application)),
            );
        }
        if let Ok(mut guard) = store.orders.lock() {
            guard.extend(
                sample_orders(as_of)
                    .into_iter()
                    .map(|order| (order.id.clone(), order)),
            );
        }
        store
    }

    fn next_id(&self, prefix: &str) -> String {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-{id}")
    }
}

impl RecordStore for InMemoryRecordStore {
    fn list_internships(
        &self,
        status: Option<InternshipStatus>,
    ) -> Result<Vec<Internship>, RequestError> {
        let guard = lock(&self.internships)?;
        Ok(guard
            .values()
            .filter(|internship| status.map_or(true, |wanted| internship.status == wanted))
            .cloned()
            .collect())
    }

    fn list_applications(
        &self,
        scope: &ApplicationScope,
    ) -> Result<Vec<Application>, RequestError> {
        let guard = lock(&self.applications)?;
        Ok(guard
            .values()
            .filter(|application| scope.admits(application))
            .cloned()
            .collect())
    }

    fn list_orders(&self) -> Result<Vec<Order>, RequestError> {
        Ok(lock(&self.orders)?.values().cloned().collect())
    }

    fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, RequestError> {
        Ok(lock(&self.orders)?.get(id).cloned())
    }

    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<Application>, RequestError> {
        Ok(lock(&self.applications)?.get(id).cloned())
    }

    fn create_internship(&self, draft: InternshipDraft) -> Result<Internship, RequestError> {
        let now = Utc::now();
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
            created_at: now,
            updated_at: now,
            contact: draft.contact,
        };
        lock(&self.internships)?.insert(internship.id.clone(), internship.clone());
        Ok(internship)
    }

    fn create_application(&self, draft: ApplicationDraft) -> Result<Application, RequestError> {
        let mut internships = lock(&self.internships)?;
        let mut applications = lock(&self.applications)?;

        let internship = internships
            .get_mut(&draft.internship_id)
            .ok_or(RequestError::NotFound)?;
        let duplicate = applications.values().any(|existing| {
            existing.internship_id == draft.internship_id
                && existing
                    .applicant
                    .email
                    .eq_ignore_ascii_case(&draft.applicant.email)
        });
        if duplicate {
            return Err(RequestError::Conflict);
        }
        if internship
            .max_applicants
            .is_some_and(|cap| internship.applicants >= cap)
        {
            return Err(RequestError::Rejected(format!(
                "{} is no longer accepting applications",
                internship.title
            )));
        }
        internship.applicants += 1;

        let application = Application {
            id: ApplicationId(self.next_id("app")),
            internship_id: internship.id.clone(),
            internship_title: internship.title.clone(),
            company: internship.company.clone(),
            applicant: draft.applicant,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
            cover_letter: draft.cover_letter,
            resume_url: draft.resume_url,
            portfolio_url: draft.portfolio_url,
            notes: None,
            messages: Vec::new(),
        };
        applications.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn send_message(&self, thread: &ApplicationId, message: MessageDraft) -> Result<(), RequestError> {
        let mut guard = lock(&self.applications)?;
        let application = guard.get_mut(thread).ok_or(RequestError::NotFound)?;
        application.messages.push(Message {
            sender: message.sender,
            body: message.body,
            sent_at: Utc::now(),
        });
        Ok(())
    }

    fn update_order_status(
        &self,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Order, RequestError> {
        let mut guard = lock(&self.orders)?;
        let order = guard.get_mut(id).ok_or(RequestError::NotFound)?;
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
        let mut guard = lock(&self.applications)?;
        let application = guard.get_mut(id).ok_or(RequestError::NotFound)?;
        if application.status != from {
            return Err(RequestError::StatusChanged {
                current: application.status.label(),
            });
        }
        application.status = to;
        Ok(application.clone())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn days_before(as_of: NaiveDate, days: i64) -> NaiveDate {
    as_of - Duration::days(days)
}

fn stamp(as_of: NaiveDate, days_ago: i64) -> DateTime<Utc> {
    days_before(as_of, days_ago)
        .and_time(NaiveTime::MIN)
        .and_utc()
}

struct Posting<'a> {
    id: &'a str,
    title: &'a str,
    company: &'a str,
    description: &'a str,
    location: &'a str,
    category: &'a str,
    skills: &'a [&'a str],
    stipend: &'a str,
    status: InternshipStatus,
    views: u32,
    applicants: u32,
    is_remote: bool,
    age_days: i64,
    deadline_in: Option<i64>,
}

impl Posting<'_> {
    fn build(&self, as_of: NaiveDate) -> Internship {
        let stipend_kind = if self.stipend == UNPAID_STIPEND {
            StipendKind::Unpaid
        } else {
            StipendKind::Paid
        };
        Internship {
            id: InternshipId(self.id.to_string()),
            title: self.title.to_string(),
            company: self.company.to_string(),
            description: self.description.to_string(),
            location: self.location.to_string(),
            category: self.category.to_string(),
            skills: self.skills.iter().map(|skill| skill.to_string()).collect(),
            duration: "3 months".to_string(),
            stipend: self.stipend.to_string(),
            stipend_kind,
            requirements: Vec::new(),
            responsibilities: Vec::new(),
            benefits: Vec::new(),
            tags: Vec::new(),
            status: self.status,
            views: self.views,
            applicants: self.applicants,
            max_applicants: None,
            is_remote: self.is_remote,
            is_urgent: self.deadline_in.is_some_and(|days| days <= 3),
            start_date: None,
            end_date: None,
            application_deadline: self.deadline_in.map(|days| days_before(as_of, -days)),
            created_at: stamp(as_of, self.age_days),
            updated_at: stamp(as_of, self.age_days),
            contact: ContactInfo {
                email: format!("careers@{}.example", self.company.to_lowercase().replace(' ', "")),
                phone: None,
                website: None,
            },
        }
    }
}

pub(crate) fn sample_internships(as_of: NaiveDate) -> Vec<Internship> {
    [
        Posting {
            id: "int-1",
            title: "Frontend Developer Intern",
            company: "Brightpath",
            description: "Ship dashboard features with React and TypeScript.",
            location: "Bengaluru",
            category: "Engineering",
            skills: &["React", "TypeScript"],
            stipend: "15000/month",
            status: InternshipStatus::Active,
            views: 420,
            applicants: 3,
            is_remote: false,
            age_days: 12,
            deadline_in: Some(2),
        },
        Posting {
            id: "int-2",
            title: "Data Analyst Intern",
            company: "Brightpath",
            description: "Build weekly retention reports in SQL.",
            location: "Remote",
            category: "Data Science",
            skills: &["SQL", "Python"],
            stipend: "12000/month",
            status: InternshipStatus::Active,
            views: 260,
            applicants: 2,
            is_remote: true,
            age_days: 6,
            deadline_in: Some(20),
        },
        Posting {
            id: "int-3",
            title: "Research Assistant",
            company: "Open Science Trust",
            description: "Support literature reviews for a climate study.",
            location: "Pune",
            category: "Research",
            skills: &["Writing"],
            stipend: UNPAID_STIPEND,
            status: InternshipStatus::Active,
            views: 95,
            applicants: 1,
            is_remote: false,
            age_days: 30,
            deadline_in: None,
        },
        Posting {
            id: "int-4",
            title: "Marketing Intern",
            company: "Loomcraft",
            description: "Plan social campaigns for a product launch.",
            location: "Mumbai",
            category: "Marketing",
            skills: &["Copywriting"],
            stipend: "8000/month",
            status: InternshipStatus::Expired,
            views: 150,
            applicants: 0,
            is_remote: false,
            age_days: 60,
            deadline_in: Some(-10),
        },
        Posting {
            id: "int-5",
            title: "Backend Engineering Intern",
            company: "Loomcraft",
            description: "Draft posting for the platform team.",
            location: "Remote",
            category: "Engineering",
            skills: &["Rust", "PostgreSQL"],
            stipend: "20000/month",
            status: InternshipStatus::Draft,
            views: 0,
            applicants: 0,
            is_remote: true,
            age_days: 1,
            deadline_in: None,
        },
    ]
    .iter()
    .map(|posting| posting.build(as_of))
    .collect()
}

fn sample_application(
    id: &str,
    internship: (&str, &str, &str),
    applicant: (&str, &str),
    status: ApplicationStatus,
    applied: DateTime<Utc>,
) -> Application {
    let (internship_id, internship_title, company) = internship;
    let (first_name, last_name) = applicant;
    Application {
        id: ApplicationId(id.to_string()),
        internship_id: InternshipId(internship_id.to_string()),
        internship_title: internship_title.to_string(),
        company: company.to_string(),
        applicant: Applicant {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!("{}@student.example", first_name.to_lowercase()),
        },
        status,
        applied_at: applied,
        cover_letter: None,
        resume_url: None,
        portfolio_url: None,
        notes: None,
        messages: Vec::new(),
    }
}

pub(crate) fn sample_applications(as_of: NaiveDate) -> Vec<Application> {
    let frontend = ("int-1", "Frontend Developer Intern", "Brightpath");
    let data = ("int-2", "Data Analyst Intern", "Brightpath");
    let research = ("int-3", "Research Assistant", "Open Science Trust");

    let mut shortlisted = sample_application(
        "app-1",
        frontend,
        ("Priya", "Raman"),
        ApplicationStatus::Shortlisted,
        stamp(as_of, 9),
    );
    shortlisted.messages.push(Message {
        sender: MessageSender::Employer,
        body: "Could you share a portfolio link?".to_string(),
        sent_at: stamp(as_of, 7),
    });

    vec![
        shortlisted,
        sample_application(
            "app-2",
            frontend,
            ("Arjun", "Mehta"),
            ApplicationStatus::Pending,
            stamp(as_of, 3),
        ),
        sample_application(
            "app-3",
            frontend,
            ("Sara", "Khan"),
            ApplicationStatus::Rejected,
            stamp(as_of, 10),
        ),
        sample_application(
            "app-4",
            data,
            ("Priya", "Raman"),
            ApplicationStatus::Interviewed,
            stamp(as_of, 5),
        ),
        sample_application(
            "app-5",
            data,
            ("Dev", "Nair"),
            ApplicationStatus::Accepted,
            stamp(as_of, 4),
        ),
        sample_application(
            "app-6",
            research,
            ("Lena", "Ortiz"),
            ApplicationStatus::Withdrawn,
            stamp(as_of, 20),
        ),
    ]
}

struct Shipment<'a> {
    id: &'a str,
    product: (&'a str, &'a str),
    customer: &'a str,
    status: OrderStatus,
    amount: f64,
    priority: OrderPriority,
    ship_by_in: i64,
    late: bool,
}

impl Shipment<'_> {
    fn build(&self, as_of: NaiveDate) -> Order {
        let (name, sku) = self.product;
        let ship_by_date = days_before(as_of, -self.ship_by_in);
        Order {
            id: OrderId(self.id.to_string()),
            product: ProductSummary {
                name: name.to_string(),
                sku: sku.to_string(),
            },
            customer: CustomerSummary {
                name: self.customer.to_string(),
                email: None,
            },
            status: self.status,
            amount: self.amount,
            quantity: 1,
            priority: self.priority,
            is_late: self.late,
            is_verge_of_cancellation: self.late && self.status == OrderStatus::Pending,
            order_date: days_before(ship_by_date, 4),
            ship_by_date,
        }
    }
}

pub(crate) fn sample_orders(as_of: NaiveDate) -> Vec<Order> {
    let shipment = |id, product, customer, status, amount, priority, ship_by_in, late| Shipment {
        id,
        product,
        customer,
        status,
        amount,
        priority,
        ship_by_in,
        late,
    };

    [
        shipment("ORD-1001", ("Desk Lamp", "LMP-01"), "Dana Whitfield", OrderStatus::Pending, 49.5, OrderPriority::Prime, 3, false),
        shipment("ORD-1002", ("Standing Desk", "DSK-20"), "Omar Haddad", OrderStatus::Pending, 389.0, OrderPriority::Normal, -2, true),
        shipment("ORD-1003", ("Monitor Arm", "ARM-07"), "Keiko Sato", OrderStatus::Unshipped, 79.9, OrderPriority::Prime, 0, false),
        shipment("ORD-1004", ("Office Chair", "CHR-11"), "Lucas Moreau", OrderStatus::Unshipped, 249.0, OrderPriority::Business, 1, false),
        shipment("ORD-1005", ("Cable Tray", "CBL-03"), "Dana Whitfield", OrderStatus::Sent, 24.0, OrderPriority::Normal, -5, false),
        shipment("ORD-1006", ("Keyboard", "KBD-44"), "Nia Brooks", OrderStatus::Cancelled, 119.0, OrderPriority::Normal, -1, true),
        shipment("ORD-1007", ("Webcam", "CAM-02"), "Omar Haddad", OrderStatus::Pending, 64.0, OrderPriority::Business, 0, false),
        shipment("ORD-1008", ("Footrest", "FTR-05"), "Keiko Sato", OrderStatus::Sent, 35.5, OrderPriority::Normal, -30, false),
    ]
    .iter()
    .map(|shipment| shipment.build(as_of))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
    }

    fn draft(internship_id: &str, email: &str) -> ApplicationDraft {
        ApplicationDraft {
            internship_id: InternshipId(internship_id.to_string()),
            applicant: Applicant {
                first_name: "Noor".to_string(),
                last_name: "Ali".to_string(),
                email: email.to_string(),
            },
            cover_letter: None,
            resume_url: None,
            portfolio_url: None,
        }
    }

    #[test]
    fn seeded_store_lists_every_collection() {
        let store = InMemoryRecordStore::seeded(as_of());
        assert_eq!(store.list_internships(None).expect("list").len(), 5);
        assert_eq!(
            store
                .list_internships(Some(InternshipStatus::Active))
                .expect("list")
                .len(),
            3
        );
        assert_eq!(store.list_orders().expect("list").len(), 8);
        assert_eq!(
            store
                .list_applications(&ApplicationScope::All)
                .expect("list")
                .len(),
            6
        );
        assert!(store
            .list_applications(&ApplicationScope::Nothing)
            .expect("list")
            .is_empty());
    }

    #[test]
    fn duplicate_application_conflicts() {
        let store = InMemoryRecordStore::seeded(as_of());
        let created = store
            .create_application(draft("int-2", "noor@student.example"))
            .expect("first application");
        assert_eq!(created.status, ApplicationStatus::Pending);
        assert_eq!(
            store.create_application(draft("int-2", "NOOR@student.example")),
            Err(RequestError::Conflict)
        );
        assert_eq!(
            store.create_application(draft("int-404", "noor@student.example")),
            Err(RequestError::NotFound)
        );
    }

    #[test]
    fn status_update_requires_the_status_that_was_read() {
        let store = InMemoryRecordStore::seeded(as_of());
        let id = OrderId("ORD-1001".to_string());
        store
            .update_order_status(&id, OrderStatus::Pending, OrderStatus::Cancelled)
            .expect("pending order cancels");

        assert_eq!(
            store.update_order_status(&id, OrderStatus::Pending, OrderStatus::Unshipped),
            Err(RequestError::StatusChanged {
                current: "Cancelled"
            })
        );
        let orders = store.list_orders().expect("list");
        let order = orders.iter().find(|order| order.id == id).expect("seeded order");
        assert_eq!(order.status, OrderStatus::Cancelled);

        let application = ApplicationId("app-6".to_string());
        assert!(matches!(
            store.update_application_status(
                &application,
                ApplicationStatus::Pending,
                ApplicationStatus::Reviewed
            ),
            Err(RequestError::StatusChanged { .. })
        ));
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(parse_date(" 2024-01-15 "), Ok(as_of()));
        assert!(parse_date("15/01/2024").is_err());
    }
}
