// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use amc_book::CoreError;
use amc_book_domain::DomainError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The write conflicted with existing state.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An upstream store failed in a retryable way.
    ServiceUnavailable {
        /// A description of the failure.
        message: String,
    },
    /// No valid credential could be obtained for store calls.
    CredentialFailure {
        /// A description of the credential failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => {
                write!(f, "Conflict: {message}")
            }
            Self::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {message}")
            }
            Self::CredentialFailure { message } => {
                write!(f, "Credential failure: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let rule: &str = match &err {
            DomainError::InvalidInterval { .. } | DomainError::InvalidIntervalUnit(_) => {
                "service_interval"
            }
            DomainError::TermEndBeforeStart { .. } => "term_dates",
            DomainError::MissingProjectionBound { .. } => "projection_bound",
            DomainError::InvalidPeriod(_) => "reporting_period",
            DomainError::DateArithmeticOverflow { .. } => "date_arithmetic",
            DomainError::InvalidStatusTransition { .. } | DomainError::TicketTerminal { .. } => {
                "service_lifecycle"
            }
            DomainError::InvalidStatus(_)
            | DomainError::InvalidVisitType(_)
            | DomainError::InvalidServiceKind(_)
            | DomainError::InvalidCardType(_)
            | DomainError::InvalidAttendanceStatus(_) => "enumeration",
            DomainError::InvalidRating { .. } | DomainError::FeedbackNotAllowed { .. } => {
                "feedback"
            }
            DomainError::DateInPast { .. } => "booking_dates",
        };
        Self::DomainRuleViolation {
            rule: rule.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DomainViolation(domain_err) => domain_err.into(),
            CoreError::Conflict { .. } => Self::Conflict {
                message: err.to_string(),
            },
            CoreError::Transient(message) => Self::ServiceUnavailable { message },
            CoreError::Credential(message) => Self::CredentialFailure { message },
            CoreError::NotFound { entity, id } => Self::ResourceNotFound {
                resource_type: entity.to_string(),
                message: format!("{entity} {id} does not exist"),
            },
        }
    }
}
