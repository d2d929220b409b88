// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Milestone projection for warranty and AMC terms.
//!
//! A milestone is a derived service due date. It is recomputed on demand
//! and never stored, so editing a term's dates cannot leave stale
//! milestones behind.
//!
//! ## Invariants
//!
//! - The sequence starts at the term's start date (`k = 0` included).
//! - Dates are strictly increasing and stay strictly before the term end;
//!   the end date marks the day the term lapses, so no service falls on it.
//! - Month stepping preserves the day-of-month where possible and clamps
//!   to the last valid day of shorter months; each step is taken from the
//!   previous milestone date (2024-01-31 steps to 2024-02-29, then
//!   2024-03-29).
//! - Open-ended terms require a caller-supplied bound; the projector never
//!   yields an unbounded sequence.

use crate::error::DomainError;
use crate::types::{AmcTerm, IntervalUnit, Milestone, MilestoneKey, WarrantyTerm};
use chrono::{Datelike, Duration, Months, NaiveDate};
use std::collections::HashSet;

/// Adds a number of calendar months to a date, clamping the day-of-month
/// to the last valid day of the target month.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the result is outside
/// the representable date range.
pub fn add_months_clamped(date: time::Date, months: u32) -> Result<time::Date, DomainError> {
    let naive: NaiveDate = to_naive(date)?;
    let stepped: NaiveDate = naive.checked_add_months(Months::new(months)).ok_or_else(|| {
        DomainError::DateArithmeticOverflow {
            operation: format!("adding {months} months to {date}"),
        }
    })?;
    from_naive(stepped)
}

/// Adds a number of days to a date.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the result is outside
/// the representable date range.
pub fn add_days(date: time::Date, days: u32) -> Result<time::Date, DomainError> {
    let naive: NaiveDate = to_naive(date)?;
    let stepped: NaiveDate = naive
        .checked_add_signed(Duration::days(i64::from(days)))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("adding {days} days to {date}"),
        })?;
    from_naive(stepped)
}

/// Projects the full milestone sequence of an AMC term.
///
/// The sequence begins at the term start date and steps by the term
/// interval while the date stays strictly before the term end; the end
/// date is the day the term lapses and never carries a service. For
/// open-ended terms the caller must supply `bound` (typically the end of
/// the requested period plus a lookahead window); the bound is a
/// projection horizon and is itself included.
///
/// # Arguments
///
/// * `term` - The AMC term to project
/// * `card_id` - The owning card, used to mint stable milestone keys
/// * `bound` - Upper bound for open-ended terms
///
/// # Returns
///
/// The ordered, strictly increasing milestone sequence.
///
/// # Errors
///
/// Returns an error if:
/// - The term is open-ended and no bound was supplied
/// - Date arithmetic overflows
pub fn project_amc(
    term: &AmcTerm,
    card_id: i64,
    bound: Option<time::Date>,
) -> Result<Vec<Milestone>, DomainError> {
    let end_date: Option<time::Date> = term.end_date();
    let horizon: time::Date = match end_date {
        Some(end) => end,
        None => bound.ok_or(DomainError::MissingProjectionBound { card_id })?,
    };
    let in_range = |date: time::Date| {
        if end_date.is_some() {
            date < horizon
        } else {
            date <= horizon
        }
    };

    let interval = term.interval();
    let mut milestones: Vec<Milestone> = Vec::new();
    let mut current: time::Date = term.start_date();
    let mut index: u32 = 0;

    while in_range(current) {
        milestones.push(Milestone::new(MilestoneKey::new(card_id, index), current));

        current = match interval.unit() {
            IntervalUnit::Days => add_days(current, interval.value())?,
            IntervalUnit::Months => add_months_clamped(current, interval.value())?,
        };
        index = index
            .checked_add(1)
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("projecting milestones for card {card_id}"),
            })?;
    }

    Ok(milestones)
}

/// Projects the free-service milestones of a warranty term.
///
/// Warranty coverage yields fixed milestones at 3, 6 and 9 months after
/// the start date. Milestones falling past the coverage end are dropped.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if date arithmetic overflows.
pub fn project_warranty(
    term: &WarrantyTerm,
    card_id: i64,
) -> Result<Vec<Milestone>, DomainError> {
    let mut milestones: Vec<Milestone> = Vec::new();

    for (index, offset) in WarrantyTerm::FREE_SERVICE_OFFSETS_MONTHS.iter().enumerate() {
        let date: time::Date = add_months_clamped(term.start_date(), *offset)?;
        if date > term.end_date() {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let key = MilestoneKey::new(card_id, index as u32);
        milestones.push(Milestone::new(key, date));
    }

    Ok(milestones)
}

/// Returns the earliest milestone not yet covered by a completed service.
///
/// `covered` holds the milestone keys referenced by completed tickets;
/// matching is by stable key, never by date proximity.
#[must_use]
pub fn next_due<'a>(
    milestones: &'a [Milestone],
    covered: &HashSet<MilestoneKey>,
) -> Option<&'a Milestone> {
    milestones.iter().find(|m| !covered.contains(&m.key))
}

fn to_naive(date: time::Date) -> Result<NaiveDate, DomainError> {
    NaiveDate::from_ymd_opt(
        date.year(),
        u32::from(u8::from(date.month())),
        u32::from(date.day()),
    )
    .ok_or_else(|| DomainError::DateArithmeticOverflow {
        operation: format!("converting {date} for calendar arithmetic"),
    })
}

fn from_naive(naive: NaiveDate) -> Result<time::Date, DomainError> {
    #[allow(clippy::cast_possible_truncation)]
    let month: time::Month =
        time::Month::try_from(naive.month() as u8).map_err(|_| {
            DomainError::DateArithmeticOverflow {
                operation: format!("converting month of {naive}"),
            }
        })?;
    #[allow(clippy::cast_possible_truncation)]
    time::Date::from_calendar_date(naive.year(), month, naive.day() as u8).map_err(|_| {
        DomainError::DateArithmeticOverflow {
            operation: format!("converting {naive} back to a calendar date"),
        }
    })
}
