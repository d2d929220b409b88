// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AmcTerm, Card, CardType, DomainError, Feedback, IntervalUnit, MilestoneKey, PeriodMonth,
    ServiceInterval, StartConvention, VisitType, WarrantyTerm,
};
use time::macros::date;

#[test]
fn test_period_month_parse_and_display() {
    let period: PeriodMonth = "2025-05".parse().unwrap();
    assert_eq!(period.year(), 2025);
    assert_eq!(period.month(), 5);
    assert_eq!(format!("{period}"), "2025-05");
}

#[test]
fn test_period_month_rejects_garbage() {
    assert!("2025".parse::<PeriodMonth>().is_err());
    assert!("2025-13".parse::<PeriodMonth>().is_err());
    assert!("2025-00".parse::<PeriodMonth>().is_err());
    assert!("may-2025".parse::<PeriodMonth>().is_err());
}

#[test]
fn test_period_month_bounds_and_contains() {
    let period: PeriodMonth = "2024-02".parse().unwrap();
    assert_eq!(period.first_day().unwrap(), date!(2024 - 02 - 01));
    // Leap year February.
    assert_eq!(period.last_day().unwrap(), date!(2024 - 02 - 29));

    assert!(period.contains(date!(2024 - 02 - 15)));
    assert!(!period.contains(date!(2024 - 03 - 01)));
    assert!(!period.contains(date!(2023 - 02 - 15)));
}

#[test]
fn test_interval_unit_round_trip() {
    assert_eq!(IntervalUnit::parse("days").unwrap(), IntervalUnit::Days);
    assert_eq!(IntervalUnit::parse("months").unwrap(), IntervalUnit::Months);
    assert_eq!(
        IntervalUnit::parse("weeks"),
        Err(DomainError::InvalidIntervalUnit(String::from("weeks")))
    );
}

#[test]
fn test_service_interval_rejects_zero() {
    assert_eq!(
        ServiceInterval::new(IntervalUnit::Months, 0),
        Err(DomainError::InvalidInterval { value: 0 })
    );
    let interval = ServiceInterval::new(IntervalUnit::Months, 4).unwrap();
    assert_eq!(interval.value(), 4);
    assert_eq!(interval.unit(), IntervalUnit::Months);
}

#[test]
fn test_warranty_default_end_conventions() {
    let exclusive =
        WarrantyTerm::with_default_end(date!(2025 - 03 - 15), StartConvention::ExclusiveStart)
            .unwrap();
    assert_eq!(exclusive.end_date(), date!(2026 - 03 - 14));

    let inclusive =
        WarrantyTerm::with_default_end(date!(2025 - 03 - 15), StartConvention::InclusiveStart)
            .unwrap();
    assert_eq!(inclusive.end_date(), date!(2026 - 03 - 15));
}

#[test]
fn test_warranty_rejects_inverted_dates() {
    assert!(WarrantyTerm::new(date!(2026 - 01 - 01), date!(2025 - 01 - 01)).is_err());
}

#[test]
fn test_amc_term_open_ended() {
    let interval = ServiceInterval::new(IntervalUnit::Months, 4).unwrap();
    let term = AmcTerm::new(date!(2025 - 01 - 10), None, interval).unwrap();
    assert_eq!(term.end_date(), None);
    assert_eq!(term.start_date(), date!(2025 - 01 - 10));
}

#[test]
fn test_card_type_codes() {
    assert_eq!(CardType::parse("normal").unwrap(), CardType::Normal);
    assert_eq!(CardType::parse("om").unwrap(), CardType::OtherMachine);
    assert_eq!(CardType::OtherMachine.as_str(), "om");
    assert!(CardType::parse("unknown").is_err());
}

#[test]
fn test_visit_type_codes() {
    let pairs = vec![
        (VisitType::Installation, "I"),
        (VisitType::Complaint, "C"),
        (VisitType::MandatoryService, "MS"),
        (VisitType::ContractService, "CS"),
        (VisitType::CourtesyCall, "CC"),
    ];
    for (visit_type, code) in pairs {
        assert_eq!(visit_type.code(), code);
        assert_eq!(VisitType::parse(code).unwrap(), visit_type);
    }
    assert!(VisitType::parse("XX").is_err());
}

#[test]
fn test_feedback_rating_bounds() {
    assert!(Feedback::new(0, String::new()).is_err());
    assert!(Feedback::new(6, String::new()).is_err());
    let feedback = Feedback::new(3, String::from("ok")).unwrap();
    assert_eq!(feedback.rating(), 3);
    assert_eq!(feedback.comment(), "ok");
}

#[test]
fn test_milestone_key_display() {
    let key = MilestoneKey::new(42, 3);
    assert_eq!(format!("{key}"), "42#3");
}

#[test]
fn test_card_has_no_term() {
    let mut card = Card {
        card_id: 1,
        customer_id: 2,
        customer_name: String::from("A. Kumar"),
        customer_phone: String::from("9000000000"),
        model: String::from("AquaPure 900"),
        card_type: CardType::Normal,
        region: String::from("south"),
        address: String::from("1 Main Street"),
        city: String::from("Chennai"),
        warranty: None,
        amc: None,
    };
    assert!(card.has_no_term());

    card.warranty = Some(
        WarrantyTerm::with_default_end(date!(2025 - 01 - 01), StartConvention::ExclusiveStart)
            .unwrap(),
    );
    assert!(!card.has_no_term());
}
