// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking requests and per-item outcomes.

use crate::error::CoreError;
use crate::stores::TicketCreate;
use amc_book_domain::{MilestoneKey, ServiceKind, VisitType, validate_booking_dates};

/// One requested booking, typically one row of a bulk run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// The card to book against.
    pub card_id: i64,
    /// The owning customer.
    pub customer_id: i64,
    /// Billable or covered visit.
    pub kind: ServiceKind,
    /// The enumerated visit reason.
    pub visit_type: VisitType,
    /// Who requested the visit.
    pub requested_by: i64,
    /// The staff member to assign. Items without one are skipped.
    pub staff_id: Option<i64>,
    /// The customer's preferred visit date.
    pub preferred_date: time::Date,
    /// The scheduled visit date.
    pub scheduled_date: time::Date,
    /// The milestone the booking covers, for recurring terms.
    pub milestone: Option<MilestoneKey>,
    /// Work description.
    pub description: String,
}

impl BookingRequest {
    /// Validates the request's dates against today.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DomainViolation` if either date lies in the past.
    pub fn validate(&self, today: time::Date) -> Result<(), CoreError> {
        validate_booking_dates(self.preferred_date, self.scheduled_date, today)?;
        Ok(())
    }

    /// Converts the request into a conditional-create payload.
    ///
    /// Returns `None` when no staff member was chosen; such items are
    /// skipped rather than dispatched.
    #[must_use]
    pub fn into_create(self) -> Option<TicketCreate> {
        let staff_id: i64 = self.staff_id?;
        Some(TicketCreate {
            card_id: self.card_id,
            customer_id: self.customer_id,
            kind: self.kind,
            visit_type: self.visit_type,
            requested_by: self.requested_by,
            staff_id,
            preferred_date: self.preferred_date,
            scheduled_date: self.scheduled_date,
            milestone: self.milestone,
            description: self.description,
        })
    }
}

/// The terminal outcome of one bulk-booking item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// The ticket was created.
    Booked {
        /// The created ticket's id.
        ticket_id: i64,
        /// The card booked against.
        card_id: i64,
        /// The milestone covered, if any.
        milestone: Option<MilestoneKey>,
    },
    /// The item was dispatched and failed. Failures are data, not aborts.
    Failed {
        /// The card the item targeted.
        card_id: i64,
        /// The milestone targeted, if any.
        milestone: Option<MilestoneKey>,
        /// Why the item failed.
        reason: String,
    },
    /// The item was never dispatched (no staff chosen).
    Skipped {
        /// The card the item targeted.
        card_id: i64,
        /// The milestone targeted, if any.
        milestone: Option<MilestoneKey>,
        /// Why the item was skipped.
        reason: String,
    },
}

impl BookingOutcome {
    /// Returns the card the outcome describes.
    #[must_use]
    pub const fn card_id(&self) -> i64 {
        match self {
            Self::Booked { card_id, .. }
            | Self::Failed { card_id, .. }
            | Self::Skipped { card_id, .. } => *card_id,
        }
    }
}
