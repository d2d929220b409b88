// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service ticket lifecycle and transition logic.
//!
//! A ticket moves `booked -> assigned -> in_progress ->
//! awaiting_confirmation -> completed`, with `cancelled` reachable from
//! every non-terminal state. All status changes, including operator
//! "force status" edits, go through `validate_transition`, so a completed
//! ticket can never be reopened.

use crate::error::DomainError;
use crate::types::{Feedback, MilestoneKey, ServiceKind, VisitType};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of a service ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// Booking recorded, no staff chosen yet.
    Booked,
    /// Staff assigned and a visit date scheduled.
    Assigned,
    /// Staff has started the visit.
    InProgress,
    /// Confirmation code dispatched to the customer.
    AwaitingConfirmation,
    /// Visit completed and confirmed (terminal).
    Completed,
    /// Booking cancelled (terminal).
    Cancelled,
}

impl ServiceStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// Accepts "pending" as a legacy alias for `Booked`.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "booked" | "pending" => Ok(Self::Booked),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "awaiting_confirmation" => Ok(Self::AwaitingConfirmation),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is
    /// not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        // Terminal states never transition. Completed in particular is the
        // one hard invariant enforced regardless of entry point.
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from a terminal state".to_string(),
            });
        }

        let valid = match self {
            Self::Booked => matches!(new_status, Self::Assigned | Self::Completed | Self::Cancelled),
            Self::Assigned => {
                matches!(new_status, Self::InProgress | Self::Completed | Self::Cancelled)
            }
            Self::InProgress => matches!(
                new_status,
                Self::AwaitingConfirmation | Self::Completed | Self::Cancelled
            ),
            Self::AwaitingConfirmation => {
                matches!(new_status, Self::Completed | Self::Cancelled)
            }
            Self::Completed | Self::Cancelled => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by the service lifecycle".to_string(),
            })
        }
    }
}

impl FromStr for ServiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A service ticket created against a card, and for recurring terms,
/// against one milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTicket {
    /// The ticket identifier.
    pub id: i64,
    /// The card this ticket belongs to.
    pub card_id: i64,
    /// The owning customer.
    pub customer_id: i64,
    /// Billable or covered visit.
    pub kind: ServiceKind,
    /// The enumerated visit reason.
    pub visit_type: VisitType,
    /// Who requested the visit.
    pub requested_by: i64,
    /// The assigned staff member, if any.
    pub assigned_staff: Option<i64>,
    /// The customer's preferred visit date.
    pub preferred_date: time::Date,
    /// The scheduled visit date.
    pub scheduled_date: time::Date,
    /// Lifecycle status.
    pub status: ServiceStatus,
    /// The milestone this ticket covers, for recurring terms.
    pub milestone: Option<MilestoneKey>,
    /// Work description.
    pub description: String,
    /// Phone number the confirmation code was dispatched to (display/audit only).
    pub otp_phone: Option<String>,
    /// Optional forward hint for the next visit.
    pub next_service_date: Option<time::Date>,
    /// Customer feedback, set only in the terminal completed state.
    pub feedback: Option<Feedback>,
}

impl ServiceTicket {
    /// Assigns a staff member and records the scheduled date.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the ticket is not
    /// in a state that can be assigned.
    pub fn assign(&mut self, staff_id: i64, scheduled_date: time::Date) -> Result<(), DomainError> {
        // Re-assignment while still assigned is an operator correction,
        // not a lifecycle change.
        if self.status != ServiceStatus::Assigned {
            self.status.validate_transition(ServiceStatus::Assigned)?;
        }
        self.assigned_staff = Some(staff_id);
        self.scheduled_date = scheduled_date;
        self.status = ServiceStatus::Assigned;
        Ok(())
    }

    /// Marks the visit as started by the assigned staff member.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the ticket has not
    /// been assigned.
    pub fn start(&mut self) -> Result<(), DomainError> {
        self.status.validate_transition(ServiceStatus::InProgress)?;
        self.status = ServiceStatus::InProgress;
        Ok(())
    }

    /// Records that a confirmation code was dispatched to the customer.
    ///
    /// The verification mechanism itself is an external collaborator; the
    /// ticket only carries the dispatch phone for display and audit.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the visit is not
    /// in progress.
    pub fn request_confirmation(&mut self, otp_phone: String) -> Result<(), DomainError> {
        self.status
            .validate_transition(ServiceStatus::AwaitingConfirmation)?;
        self.otp_phone = Some(otp_phone);
        self.status = ServiceStatus::AwaitingConfirmation;
        Ok(())
    }

    /// Completes the ticket, optionally recording feedback and a forward
    /// hint for the next visit.
    ///
    /// After completion the assigned staff, scheduled date and description
    /// are immutable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the ticket is
    /// already terminal.
    pub fn complete(
        &mut self,
        feedback: Option<Feedback>,
        next_service_date: Option<time::Date>,
    ) -> Result<(), DomainError> {
        self.status.validate_transition(ServiceStatus::Completed)?;
        self.status = ServiceStatus::Completed;
        self.feedback = feedback;
        self.next_service_date = next_service_date;
        Ok(())
    }

    /// Cancels the ticket.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the ticket is
    /// already terminal.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.status.validate_transition(ServiceStatus::Cancelled)?;
        self.status = ServiceStatus::Cancelled;
        Ok(())
    }

    /// Operator "force status" edit outside the normal lifecycle verbs.
    ///
    /// Force edits may skip intermediate states, but the completed state
    /// can never be left regardless of entry point.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TicketTerminal` when the ticket is completed
    /// and the edit would change its status.
    pub fn force_status(&mut self, new_status: ServiceStatus) -> Result<(), DomainError> {
        if self.status == ServiceStatus::Completed && new_status != ServiceStatus::Completed {
            return Err(DomainError::TicketTerminal {
                ticket_id: self.id,
                status: self.status.as_str().to_string(),
            });
        }
        self.status = new_status;
        Ok(())
    }

    /// Records customer feedback on a completed ticket.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FeedbackNotAllowed` if the ticket is not completed.
    pub fn record_feedback(&mut self, feedback: Feedback) -> Result<(), DomainError> {
        if self.status != ServiceStatus::Completed {
            return Err(DomainError::FeedbackNotAllowed {
                status: self.status.as_str().to_string(),
            });
        }
        self.feedback = Some(feedback);
        Ok(())
    }

    /// Returns true when the ticket still counts against the
    /// one-open-ticket-per-milestone invariant.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }
}
