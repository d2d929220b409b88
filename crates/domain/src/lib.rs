// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod attendance;
mod error;
mod milestone;
mod period;
mod ticket;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use attendance::{AttendanceCheck, check};
pub use milestone::{add_days, add_months_clamped, next_due, project_amc, project_warranty};
pub use period::{PeriodStatus, PeriodView, select};
pub use ticket::{ServiceStatus, ServiceTicket};

// Re-export public types
pub use error::DomainError;
pub use types::{
    AmcTerm, AttendanceStatus, Card, CardType, Feedback, IntervalUnit, Milestone, MilestoneKey,
    PeriodMonth, ServiceInterval, ServiceKind, Staff, StartConvention, VisitType, WarrantyTerm,
};
pub use validation::{validate_booking_dates, validate_term_dates};
