// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance checks against the assignment workflow.
//!
//! Attendance data only exists for the current day, so a check against any
//! other date is `Unknown`. The result is advisory; it never blocks an
//! assignment.

use crate::types::AttendanceStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The advisory outcome of an attendance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceCheck {
    /// The staff member is marked present today.
    Present,
    /// The staff member is marked absent today.
    Absent,
    /// No usable attendance data for the requested date.
    Unknown,
}

impl AttendanceCheck {
    /// Returns the string representation of this outcome.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Unknown => "unknown",
        }
    }
}

/// Checks a staff member's attendance for an assignment date.
///
/// Returns `Unknown` unless `target_date` is `today` and a record exists
/// for the staff member.
#[must_use]
pub fn check(
    staff_id: i64,
    target_date: time::Date,
    today: time::Date,
    records: &HashMap<i64, AttendanceStatus>,
) -> AttendanceCheck {
    if target_date != today {
        return AttendanceCheck::Unknown;
    }
    match records.get(&staff_id) {
        Some(AttendanceStatus::Present) => AttendanceCheck::Present,
        Some(AttendanceStatus::Absent) => AttendanceCheck::Absent,
        None => AttendanceCheck::Unknown,
    }
}
