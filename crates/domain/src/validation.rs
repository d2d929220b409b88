// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared validation rules for term dates and booking inputs.

use crate::error::DomainError;

/// Validates that a term's end date does not precede its start date.
///
/// # Errors
///
/// Returns `DomainError::TermEndBeforeStart` if `end` falls before `start`.
pub fn validate_term_dates(start: time::Date, end: time::Date) -> Result<(), DomainError> {
    if end < start {
        return Err(DomainError::TermEndBeforeStart { start, end });
    }
    Ok(())
}

/// Validates the date pair on a booking request.
///
/// Mirrors the admin-create rules: neither the preferred nor the scheduled
/// date may lie in the past relative to `today`.
///
/// # Errors
///
/// Returns `DomainError::DateInPast` naming the offending field.
pub fn validate_booking_dates(
    preferred_date: time::Date,
    scheduled_date: time::Date,
    today: time::Date,
) -> Result<(), DomainError> {
    if preferred_date < today {
        return Err(DomainError::DateInPast {
            field: "preferred_date",
            date: preferred_date,
        });
    }
    if scheduled_date < today {
        return Err(DomainError::DateInPast {
            field: "scheduled_date",
            date: scheduled_date,
        });
    }
    Ok(())
}
