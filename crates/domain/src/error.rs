// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Service interval value is zero or otherwise unusable.
    InvalidInterval {
        /// The invalid interval value.
        value: u32,
    },
    /// Interval unit string is not recognized.
    InvalidIntervalUnit(String),
    /// Term end date falls before its start date.
    TermEndBeforeStart {
        /// The term start date.
        start: time::Date,
        /// The invalid end date.
        end: time::Date,
    },
    /// An open-ended term was projected without a caller-supplied bound.
    MissingProjectionBound {
        /// The card the term belongs to.
        card_id: i64,
    },
    /// Failed to parse a reporting period from a string.
    InvalidPeriod(String),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// A ticket status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },
    /// Attempt to modify a ticket that is already in a terminal state.
    TicketTerminal {
        /// The ticket identifier.
        ticket_id: i64,
        /// The terminal status the ticket is in.
        status: String,
    },
    /// Ticket status string is not recognized.
    InvalidStatus(String),
    /// Visit type code is not recognized.
    InvalidVisitType(String),
    /// Service kind string is not recognized.
    InvalidServiceKind(String),
    /// Card type string is not recognized.
    InvalidCardType(String),
    /// Attendance status string is not recognized.
    InvalidAttendanceStatus(String),
    /// Feedback rating outside the 1-5 range.
    InvalidRating {
        /// The invalid rating value.
        rating: u8,
    },
    /// A booking date lies in the past.
    DateInPast {
        /// The field that carried the past date.
        field: &'static str,
        /// The offending date.
        date: time::Date,
    },
    /// Feedback supplied for a ticket that is not completed.
    FeedbackNotAllowed {
        /// The status the ticket is in.
        status: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInterval { value } => {
                write!(f, "Invalid service interval: {value}. Must be at least 1")
            }
            Self::InvalidIntervalUnit(unit) => {
                write!(
                    f,
                    "Invalid interval unit '{unit}'. Expected 'days' or 'months'"
                )
            }
            Self::TermEndBeforeStart { start, end } => {
                write!(f, "Term end date {end} falls before start date {start}")
            }
            Self::MissingProjectionBound { card_id } => {
                write!(
                    f,
                    "Card {card_id} has an open-ended term; a projection bound is required"
                )
            }
            Self::InvalidPeriod(value) => {
                write!(f, "Invalid reporting period '{value}'. Expected YYYY-MM")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(
                    f,
                    "Cannot transition service from '{from}' to '{to}': {reason}"
                )
            }
            Self::TicketTerminal { ticket_id, status } => {
                write!(
                    f,
                    "Service ticket {ticket_id} is already '{status}' and cannot change"
                )
            }
            Self::InvalidStatus(status) => {
                write!(f, "Invalid service status: {status}")
            }
            Self::InvalidVisitType(code) => {
                write!(f, "Invalid visit type code: {code}")
            }
            Self::InvalidServiceKind(kind) => {
                write!(f, "Invalid service kind: {kind}")
            }
            Self::InvalidCardType(card_type) => {
                write!(f, "Invalid card type: {card_type}")
            }
            Self::InvalidAttendanceStatus(status) => {
                write!(f, "Invalid attendance status: {status}")
            }
            Self::InvalidRating { rating } => {
                write!(
                    f,
                    "Invalid feedback rating: {rating}. Must be between 1 and 5"
                )
            }
            Self::DateInPast { field, date } => {
                write!(f, "{field} {date} cannot be in the past")
            }
            Self::FeedbackNotAllowed { status } => {
                write!(
                    f,
                    "Feedback may only be recorded on a completed service, not '{status}'"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
