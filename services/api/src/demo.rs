use crate::infra::InMemoryRecordStore;
use chrono::{Local, NaiveDate};
use clap::Args;
use placement_hub::config::AppConfig;
use placement_hub::context::{CurrentUser, Role, SessionContext};
use placement_hub::error::AppError;
use placement_hub::marketplace::domain::{
    OrderId, OrderStatus, StudentApplicationStatus, Vocabulary,
};
use placement_hub::marketplace::query::DisplayLimit;
use placement_hub::marketplace::router::OrderListParams;
use placement_hub::marketplace::{MarketplaceService, StatusDistribution};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for ship-by and date-window checks (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Free-text search applied to the order board.
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Rows to show on the order board (defaults to the configured display limit).
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let store = Arc::new(InMemoryRecordStore::seeded(as_of));
    let service = MarketplaceService::new(store, config.board);
    let session = SessionContext::for_user(
        CurrentUser {
            id: "demo-admin".to_string(),
            email: "ops@placementhub.example".to_string(),
            role: Role::Admin,
            company: None,
        },
        as_of,
    );

    println!("Placement hub demo (as of {as_of})");

    let fallback = DisplayLimit::new(config.board.display_limit).unwrap_or_default();
    render_order_board(&service, &args, as_of, fallback);
    render_order_summary(&service, &session);
    render_internship_overview(&service);
    render_application_analytics(&service, &session);
    render_status_changes(&service, &session)?;

    Ok(())
}

fn render_order_board(
    service: &MarketplaceService<InMemoryRecordStore>,
    args: &DemoArgs,
    as_of: NaiveDate,
    fallback: DisplayLimit,
) {
    let params = OrderListParams {
        search: args.search.clone(),
        limit: args.limit.map(|rows| rows.to_string()),
        ..OrderListParams::default()
    };
    let query = params.to_query(as_of, fallback);

    let loaded = service.orders();
    let view = query.run(&loaded.records);

    println!(
        "\nOrder board ({} of {} matching, {} total, sorted by ship-by date)",
        view.records.len(),
        view.matched,
        view.total
    );
    for order in &view.records {
        println!(
            "  {:<9} ship by {}  {:<10} {:<9} {:<15} {:>8.2}{}",
            order.id.0,
            order.ship_by_date,
            order.status.label(),
            order.priority.label(),
            order.customer.name,
            order.amount,
            if order.is_late { "  LATE" } else { "" }
        );
    }
    if let Some(notice) = loaded.notice {
        println!("  {}: {}", notice.title, notice.message);
    }
}

fn render_distribution<S: Vocabulary>(distribution: &StatusDistribution<S>) {
    for entry in &distribution.entries {
        println!(
            "    {:<22} {:>3} ({:.1}%)",
            entry.label, entry.count, entry.percentage
        );
    }
}

fn render_order_summary(service: &MarketplaceService<InMemoryRecordStore>, session: &SessionContext) {
    let (summary, _) = service.order_summary(session);
    println!("\nOrder summary");
    println!(
        "  Revenue {:.2} across {} units (cancelled orders excluded)",
        summary.revenue, summary.units
    );
    println!("  Status mix:");
    render_distribution(&summary.status);
    println!("  Quick filters:");
    for entry in &summary.quick_filters {
        println!("    {:<22} {:>3}", entry.label, entry.count);
    }
}

fn render_internship_overview(service: &MarketplaceService<InMemoryRecordStore>) {
    let (overview, _) = service.internship_overview();
    println!("\nInternship overview");
    println!(
        "  {} posted, {} active, {} applicants, {} views, {:.1} applicants per posting",
        overview.total_posted,
        overview.active_internships,
        overview.total_applicants,
        overview.total_views,
        overview.average_applicants
    );
    println!("  Most applied:");
    for bar in &overview.most_applied {
        let width = (bar.relative / 5.0).round() as usize;
        println!(
            "    {:<28} {:<20} {:>3} {}",
            bar.title,
            bar.company,
            bar.value,
            "#".repeat(width)
        );
    }
}

fn render_application_analytics(
    service: &MarketplaceService<InMemoryRecordStore>,
    session: &SessionContext,
) {
    let (analytics, _) = service.application_analytics(session);
    println!("\nApplication analytics");
    println!(
        "  {} applications, {:.1}% shortlisted, {:.1}% accepted",
        analytics.total, analytics.shortlisted_ratio, analytics.acceptance_ratio
    );
    render_distribution(&analytics.status);

    let email = "priya@student.example";
    let student = SessionContext::for_user(
        CurrentUser {
            id: "demo-student".to_string(),
            email: email.to_string(),
            role: Role::Student,
            company: None,
        },
        session.as_of,
    );
    let own = service.applications(&student);
    println!("  Student view for {email}:");
    let (mine, _) = service.application_analytics(&student);
    if let Some(mix) = &mine.student_status {
        render_distribution(mix);
    }
    for application in &own.records {
        let label = application
            .status
            .student_view()
            .map(StudentApplicationStatus::label)
            .unwrap_or("Withdrawn");
        println!("    {:<28} {}", application.internship_title, label);
    }
}

fn render_status_changes(
    service: &MarketplaceService<InMemoryRecordStore>,
    session: &SessionContext,
) -> Result<(), AppError> {
    println!("\nStatus changes");
    let shipped = OrderId("ORD-1005".to_string());
    if let Err(rejected) = service.change_order_status(session, &shipped, OrderStatus::Pending) {
        let notice = rejected.notification();
        println!("  {} -> pending: {} ({})", shipped.0, notice.title, notice.message);
    }

    let pending = OrderId("ORD-1001".to_string());
    let updated = service.change_order_status(session, &pending, OrderStatus::Unshipped)?;
    println!("  {} -> {}", updated.id.0, updated.status.label());
    Ok(())
}
