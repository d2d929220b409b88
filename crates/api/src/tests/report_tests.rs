// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{FixtureStore, card, completed_ticket, credential, with_amc, with_warranty};
use crate::{ReportKind, StatusFilter, period_report};
use amc_book_domain::{CardType, PeriodMonth, PeriodStatus};
use time::macros::date;

fn period(s: &str) -> PeriodMonth {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_amc_report_lists_due_cards() {
    let store = FixtureStore {
        cards: vec![
            with_amc(card(1, "south")),
            with_amc(card(2, "south")),
            card(3, "south"),
        ],
        tickets: vec![completed_ticket(2, date!(2025 - 05 - 12))],
    };

    let rows = period_report(
        &store,
        &store,
        &credential(),
        ReportKind::Amc,
        period("2025-05"),
        None,
        StatusFilter::All,
    )
    .await
    .unwrap();

    // Card 3 has no term and is excluded entirely.
    assert_eq!(rows.len(), 2);

    let row1 = rows.iter().find(|r| r.card_id == 1).unwrap();
    assert_eq!(row1.status, PeriodStatus::NotDone);
    assert_eq!(row1.service_date, Some(date!(2025 - 05 - 10)));

    let row2 = rows.iter().find(|r| r.card_id == 2).unwrap();
    assert_eq!(row2.status, PeriodStatus::Done);
    assert_eq!(row2.service_date, Some(date!(2025 - 05 - 12)));
}

#[tokio::test]
async fn test_status_filter_narrows_rows() {
    let store = FixtureStore {
        cards: vec![with_amc(card(1, "south")), with_amc(card(2, "south"))],
        tickets: vec![completed_ticket(2, date!(2025 - 05 - 12))],
    };

    let done = period_report(
        &store,
        &store,
        &credential(),
        ReportKind::Amc,
        period("2025-05"),
        None,
        StatusFilter::Done,
    )
    .await
    .unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].card_id, 2);

    let not_done = period_report(
        &store,
        &store,
        &credential(),
        ReportKind::Amc,
        period("2025-05"),
        None,
        StatusFilter::NotDone,
    )
    .await
    .unwrap();
    assert_eq!(not_done.len(), 1);
    assert_eq!(not_done[0].card_id, 1);
}

#[tokio::test]
async fn test_region_filter() {
    let store = FixtureStore {
        cards: vec![with_amc(card(1, "south")), with_amc(card(2, "north"))],
        tickets: Vec::new(),
    };

    let rows = period_report(
        &store,
        &store,
        &credential(),
        ReportKind::Amc,
        period("2025-05"),
        Some("north"),
        StatusFilter::All,
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].card_id, 2);
}

#[tokio::test]
async fn test_warranty_report_excludes_other_machines() {
    let mut om = with_warranty(card(2, "south"));
    om.card_type = CardType::OtherMachine;

    let store = FixtureStore {
        cards: vec![with_warranty(card(1, "south")), om],
        tickets: Vec::new(),
    };

    // The 3-month milestone of a 2025-02-15 warranty lands in May.
    let rows = period_report(
        &store,
        &store,
        &credential(),
        ReportKind::Warranty,
        period("2025-05"),
        None,
        StatusFilter::All,
    )
    .await
    .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].card_id, 1);
    assert_eq!(rows[0].service_date, Some(date!(2025 - 05 - 15)));
}

#[tokio::test]
async fn test_amc_report_ignores_warranty_only_cards() {
    let store = FixtureStore {
        cards: vec![with_warranty(card(1, "south"))],
        tickets: Vec::new(),
    };

    let rows = period_report(
        &store,
        &store,
        &credential(),
        ReportKind::Amc,
        period("2025-05"),
        None,
        StatusFilter::All,
    )
    .await
    .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_months_without_milestones_yield_no_rows() {
    let store = FixtureStore {
        cards: vec![with_amc(card(1, "south"))],
        tickets: Vec::new(),
    };

    // The 4-month cycle from 2025-01-10 has nothing due in March.
    let rows = period_report(
        &store,
        &store,
        &credential(),
        ReportKind::Amc,
        period("2025-03"),
        None,
        StatusFilter::All,
    )
    .await
    .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_status_filter_parse() {
    assert_eq!(StatusFilter::parse("all").unwrap(), StatusFilter::All);
    assert_eq!(StatusFilter::parse("done").unwrap(), StatusFilter::Done);
    assert_eq!(
        StatusFilter::parse("not_done").unwrap(),
        StatusFilter::NotDone
    );
    assert!(StatusFilter::parse("pending").is_err());
}
