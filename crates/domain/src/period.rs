// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Period selection: reduce a card's milestone sequence to one calendar
//! month's view.
//!
//! The selector is pure. Given the same card, period and ticket set it
//! always yields the same view, so reports can recompute it freely.

use crate::error::DomainError;
use crate::milestone::{project_amc, project_warranty};
use crate::ticket::{ServiceStatus, ServiceTicket};
use crate::types::{Card, Milestone, PeriodMonth};
use serde::{Deserialize, Serialize};

/// Whether the card's due service for the period has been carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// A completed service falls inside the period.
    Done,
    /// No completed service inside the period.
    NotDone,
}

impl PeriodStatus {
    /// Returns the string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::NotDone => "not_done",
        }
    }
}

/// One card's service picture for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodView {
    /// The card the view describes.
    pub card_id: i64,
    /// The calendar month.
    pub period: PeriodMonth,
    /// Done or not done for the period.
    pub status: PeriodStatus,
    /// The full projected milestone sequence for the card's terms.
    pub all_milestones: Vec<Milestone>,
    /// The milestones falling inside the period.
    pub in_period: Vec<Milestone>,
    /// The date shown to the operator: the completed ticket's actual
    /// service date when done, otherwise the earliest in-period milestone.
    pub primary_date: Option<time::Date>,
}

impl PeriodView {
    /// Returns true when the card has nothing scheduled and nothing done
    /// in the period. Such views are excluded from listings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.in_period.is_empty() && self.status == PeriodStatus::NotDone
    }
}

/// Builds the period view for one card.
///
/// A card with no warranty and no AMC term yields an empty view; that is
/// not an error. Open-ended AMC terms are projected up to the end of the
/// requested period.
///
/// A completed ticket whose `scheduled_date` falls inside the period marks
/// the period done, and its actual date overrides the theoretical milestone
/// for display. When several in-period milestones exist the earliest wins.
///
/// # Errors
///
/// Returns an error if milestone projection fails.
pub fn select(
    card: &Card,
    period: PeriodMonth,
    tickets: &[ServiceTicket],
) -> Result<PeriodView, DomainError> {
    let mut all_milestones: Vec<Milestone> = Vec::new();

    if let Some(warranty) = card.warranty.as_ref() {
        all_milestones.extend(project_warranty(warranty, card.card_id)?);
    }
    if let Some(amc) = card.amc.as_ref() {
        let bound: time::Date = period.last_day()?;
        all_milestones.extend(project_amc(amc, card.card_id, Some(bound))?);
    }
    all_milestones.sort_by_key(|m| m.date);

    let in_period: Vec<Milestone> = all_milestones
        .iter()
        .filter(|m| period.contains(m.date))
        .copied()
        .collect();

    // Earliest completed service inside the period wins the display slot.
    let completed_date: Option<time::Date> = tickets
        .iter()
        .filter(|t| t.card_id == card.card_id)
        .filter(|t| t.status == ServiceStatus::Completed)
        .map(|t| t.scheduled_date)
        .filter(|d| period.contains(*d))
        .min();

    let (status, primary_date) = match completed_date {
        Some(date) => (PeriodStatus::Done, Some(date)),
        None => (
            PeriodStatus::NotDone,
            in_period.first().map(|m| m.date),
        ),
    };

    Ok(PeriodView {
        card_id: card.card_id,
        period,
        status,
        all_milestones,
        in_period,
        primary_date,
    })
}
