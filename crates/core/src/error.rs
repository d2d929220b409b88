// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use amc_book_domain::{DomainError, MilestoneKey};

/// Errors that can occur while orchestrating bookings and reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A conditional write lost: the milestone is already covered by an
    /// open or completed ticket.
    Conflict {
        /// The card the write targeted.
        card_id: i64,
        /// The milestone the write targeted, when it targeted one.
        milestone: Option<MilestoneKey>,
    },
    /// A store call failed in a way that may succeed on retry.
    Transient(String),
    /// No valid credential could be obtained or the store rejected it.
    Credential(String),
    /// A requested entity does not exist.
    NotFound {
        /// The kind of entity looked up.
        entity: &'static str,
        /// The identifier that was not found.
        id: i64,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Conflict { card_id, milestone } => match milestone {
                Some(key) => write!(
                    f,
                    "Milestone {key} on card {card_id} is already covered by a ticket"
                ),
                None => write!(f, "Card {card_id} already has a conflicting ticket"),
            },
            Self::Transient(reason) => write!(f, "Transient store failure: {reason}"),
            Self::Credential(reason) => write!(f, "Credential failure: {reason}"),
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
