// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store traits at the persistence seam.
//!
//! Implementations live elsewhere; the engine only depends on these
//! contracts. Every call takes an explicit [`BearerCredential`].

use crate::credential::BearerCredential;
use crate::error::CoreError;
use amc_book_domain::{
    AttendanceStatus, Card, Feedback, MilestoneKey, ServiceKind, ServiceStatus, ServiceTicket,
    Staff, VisitType,
};
use std::collections::HashMap;

/// Errors surfaced by store implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A conditional write lost to an existing open or completed ticket.
    Conflict {
        /// The card the write targeted.
        card_id: i64,
        /// The milestone the write targeted, when it targeted one.
        milestone: Option<MilestoneKey>,
    },
    /// The presented credential was rejected.
    CredentialRejected,
    /// The call failed in a way that may succeed on retry.
    Transient(String),
    /// The requested entity does not exist.
    NotFound {
        /// The kind of entity looked up.
        entity: &'static str,
        /// The identifier that was not found.
        id: i64,
    },
    /// The store rejected the write for a domain reason.
    Rejected(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict { card_id, milestone } => match milestone {
                Some(key) => write!(
                    f,
                    "Conditional write for milestone {key} on card {card_id} lost"
                ),
                None => write!(f, "Conditional write for card {card_id} lost"),
            },
            Self::CredentialRejected => write!(f, "Store rejected the presented credential"),
            Self::Transient(reason) => write!(f, "Transient store failure: {reason}"),
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::Rejected(reason) => write!(f, "Store rejected the write: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { card_id, milestone } => Self::Conflict { card_id, milestone },
            StoreError::CredentialRejected => {
                Self::Credential(String::from("store rejected the presented credential"))
            }
            StoreError::Transient(reason) => Self::Transient(reason),
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::Rejected(reason) => Self::Transient(reason),
        }
    }
}

/// The payload of a conditional ticket create.
///
/// Bulk-booked tickets are created directly in the assigned state; the
/// staff member was chosen before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketCreate {
    /// The card the ticket belongs to.
    pub card_id: i64,
    /// The owning customer.
    pub customer_id: i64,
    /// Billable or covered visit.
    pub kind: ServiceKind,
    /// The enumerated visit reason.
    pub visit_type: VisitType,
    /// Who requested the visit.
    pub requested_by: i64,
    /// The staff member to assign.
    pub staff_id: i64,
    /// The customer's preferred visit date.
    pub preferred_date: time::Date,
    /// The scheduled visit date.
    pub scheduled_date: time::Date,
    /// The milestone the ticket covers, for recurring terms.
    pub milestone: Option<MilestoneKey>,
    /// Work description.
    pub description: String,
}

/// The payload of a ticket status patch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusPatch {
    /// The requested status, when the patch changes status.
    pub status: Option<ServiceStatus>,
    /// Staff to assign, for assignment patches.
    pub staff_id: Option<i64>,
    /// New scheduled date, for assignment patches.
    pub scheduled_date: Option<time::Date>,
    /// Phone the confirmation code was dispatched to.
    pub otp_phone: Option<String>,
    /// Feedback recorded on completion.
    pub feedback: Option<Feedback>,
    /// Forward hint for the next visit, recorded on completion.
    pub next_service_date: Option<time::Date>,
    /// Operator force edit: skip lifecycle ordering (completed still
    /// cannot be left).
    pub force: bool,
}

/// Applies a status patch to a ticket, routing through the domain
/// lifecycle methods.
///
/// Store implementations share this so every write path enforces the same
/// transition rules. A patch with no status and only feedback records
/// feedback on a completed ticket.
///
/// # Errors
///
/// Returns the domain error of the rejected transition.
pub fn apply_patch(
    ticket: &mut ServiceTicket,
    patch: &StatusPatch,
) -> Result<(), amc_book_domain::DomainError> {
    use amc_book_domain::DomainError;

    let Some(status) = patch.status else {
        if let Some(feedback) = patch.feedback.clone() {
            return ticket.record_feedback(feedback);
        }
        return Ok(());
    };

    if patch.force {
        return ticket.force_status(status);
    }

    match status {
        ServiceStatus::Assigned => {
            let staff_id: i64 = patch.staff_id.ok_or(DomainError::InvalidStatusTransition {
                from: ticket.status.as_str().to_string(),
                to: status.as_str().to_string(),
                reason: String::from("assignment requires a staff member"),
            })?;
            let scheduled: time::Date = patch.scheduled_date.unwrap_or(ticket.scheduled_date);
            ticket.assign(staff_id, scheduled)
        }
        ServiceStatus::InProgress => ticket.start(),
        ServiceStatus::AwaitingConfirmation => {
            let phone: String = patch.otp_phone.clone().unwrap_or_default();
            ticket.request_confirmation(phone)
        }
        ServiceStatus::Completed => {
            ticket.complete(patch.feedback.clone(), patch.next_service_date)
        }
        ServiceStatus::Cancelled => ticket.cancel(),
        ServiceStatus::Booked => Err(DomainError::InvalidStatusTransition {
            from: ticket.status.as_str().to_string(),
            to: status.as_str().to_string(),
            reason: String::from("tickets cannot return to the booked state"),
        }),
    }
}

/// Read access to cards and their terms.
pub trait CardStore: Send + Sync {
    /// Fetches one card by id.
    fn get_card(
        &self,
        credential: &BearerCredential,
        card_id: i64,
    ) -> impl Future<Output = Result<Card, StoreError>> + Send;

    /// Lists cards, optionally restricted to one region.
    fn list_cards(
        &self,
        credential: &BearerCredential,
        region: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Card>, StoreError>> + Send;
}

/// Read and conditional-write access to service tickets.
pub trait TicketStore: Send + Sync {
    /// Lists tickets for one card, optionally filtered by status.
    fn list_tickets(
        &self,
        credential: &BearerCredential,
        card_id: i64,
        status: Option<ServiceStatus>,
    ) -> impl Future<Output = Result<Vec<ServiceTicket>, StoreError>> + Send;

    /// Creates a ticket if and only if no open or completed ticket already
    /// covers the payload's milestone. Never a blind insert.
    fn create_ticket_checked(
        &self,
        credential: &BearerCredential,
        payload: &TicketCreate,
    ) -> impl Future<Output = Result<ServiceTicket, StoreError>> + Send;

    /// Applies a status patch to one ticket. The store enforces the
    /// lifecycle transition rules.
    fn patch_status(
        &self,
        credential: &BearerCredential,
        ticket_id: i64,
        patch: &StatusPatch,
    ) -> impl Future<Output = Result<ServiceTicket, StoreError>> + Send;
}

/// Lookup of assignable field staff.
pub trait StaffDirectory: Send + Sync {
    /// Lists all assignable workers.
    fn list_workers(
        &self,
        credential: &BearerCredential,
    ) -> impl Future<Output = Result<Vec<Staff>, StoreError>> + Send;

    /// Finds workers by phone number prefix.
    fn find_by_phone(
        &self,
        credential: &BearerCredential,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Staff>, StoreError>> + Send;
}

/// Read access to same-day attendance records.
pub trait AttendanceStore: Send + Sync {
    /// Returns the attendance map for one date. Only today's map carries
    /// usable data.
    fn attendance_on(
        &self,
        credential: &BearerCredential,
        date: time::Date,
    ) -> impl Future<Output = Result<HashMap<i64, AttendanceStatus>, StoreError>> + Send;
}
