use super::common::*;

use crate::marketplace::domain::{Order, OrderStatus};
use crate::marketplace::query::{
    BoardQuery, DisplayLimit, OrderBoard, OrderFilter, OrderSortKey, SearchQuery, Selection,
    SortDirection, SortSpec,
};

fn orders(count: usize) -> Vec<Order> {
    (0..count)
        .map(|index| {
            let day = 1 + (index as u32 * 7) % 28;
            let status = if index % 3 == 0 {
                OrderStatus::Sent
            } else {
                OrderStatus::Pending
            };
            order(&format!("ORD-{index:03}"), status, date(2024, 2, day))
        })
        .collect()
}

fn query(limit: usize) -> BoardQuery<OrderFilter, OrderSortKey> {
    BoardQuery {
        filter: OrderFilter {
            status: Selection::Only(OrderStatus::Pending),
            ..OrderFilter::new(as_of())
        },
        sort: SortSpec::new(OrderSortKey::ShipByDate, SortDirection::Ascending),
        limit: DisplayLimit::new(limit).expect("positive limit"),
    }
}

#[test]
fn truncation_happens_after_filter_and_sort() {
    let records = orders(40);
    let view = query(15).run(&records);

    assert_eq!(view.total, 40);
    assert_eq!(view.matched, 26);
    assert_eq!(view.records.len(), 15);
    assert!(view
        .records
        .iter()
        .all(|order| order.status == OrderStatus::Pending));
    assert!(view
        .records
        .windows(2)
        .all(|pair| pair[0].ship_by_date <= pair[1].ship_by_date));

    let earliest_pending = records
        .iter()
        .filter(|order| order.status == OrderStatus::Pending)
        .map(|order| order.ship_by_date)
        .min()
        .expect("pending orders present");
    assert_eq!(view.records[0].ship_by_date, earliest_pending);
}

#[test]
fn board_memoizes_until_the_collection_changes() {
    let mut board = OrderBoard::new(orders(10));
    let query = query(30);

    let first: Vec<String> = board.view(&query).records.iter().map(|o| o.id.0.clone()).collect();
    assert!(board.is_cached(&query));
    let second: Vec<String> = board.view(&query).records.iter().map(|o| o.id.0.clone()).collect();
    assert_eq!(first, second);

    board.update(|records| records[1].status = OrderStatus::Cancelled);
    assert!(!board.is_cached(&query));
    assert_eq!(board.revision(), 1);

    let after: Vec<String> = board.view(&query).records.iter().map(|o| o.id.0.clone()).collect();
    assert_eq!(after.len(), first.len() - 1);
    assert!(!after.contains(&"ORD-001".to_string()));
}

#[test]
fn cached_view_matches_fresh_computation() {
    let mut board = OrderBoard::new(orders(25));
    let mut query = query(50);
    query.filter.search = SearchQuery::new("ord-01");

    let fresh: Vec<String> = query.run(board.records()).records.iter().map(|o| o.id.0.clone()).collect();
    let _ = board.view(&query);
    let cached: Vec<String> = board.view(&query).records.iter().map(|o| o.id.0.clone()).collect();
    assert_eq!(fresh, cached);
}

#[test]
fn changing_the_query_recomputes() {
    let mut board = OrderBoard::new(orders(12));
    let small = query(2);
    let large = query(100);

    assert_eq!(board.view(&small).records.len(), 2);
    assert!(!board.is_cached(&large));
    assert_eq!(board.view(&large).records.len(), 8);

    board.replace(Vec::new());
    let view = board.view(&large);
    assert_eq!(view.total, 0);
    assert!(view.records.is_empty());
}

#[test]
fn display_limit_parsing_keeps_fallback() {
    let fallback = DisplayLimit::default();
    assert_eq!(fallback.get(), 15);
    assert_eq!(DisplayLimit::parse_or(Some("50"), fallback).get(), 50);
    assert_eq!(DisplayLimit::parse_or(Some("0"), fallback), fallback);
    assert_eq!(DisplayLimit::parse_or(Some("lots"), fallback), fallback);
    assert_eq!(DisplayLimit::parse_or(None, fallback), fallback);
    assert!(DisplayLimit::new(0).is_none());
}
