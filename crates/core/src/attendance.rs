// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session-scoped attendance lookups.
//!
//! Attendance is advisory and only meaningful for today, so one session
//! loads today's map at most once and answers every later check from the
//! cache. Staleness of minutes is acceptable.

use crate::credential::BearerCredential;
use crate::error::CoreError;
use crate::stores::AttendanceStore;
use amc_book_domain::{AttendanceCheck, AttendanceStatus};
use std::collections::HashMap;

/// A per-session cache over an [`AttendanceStore`].
#[derive(Debug)]
pub struct AttendanceSession {
    today: time::Date,
    cached: Option<HashMap<i64, AttendanceStatus>>,
}

impl AttendanceSession {
    /// Creates a session anchored to today's date.
    #[must_use]
    pub const fn new(today: time::Date) -> Self {
        Self {
            today,
            cached: None,
        }
    }

    /// Checks a staff member's attendance for an assignment date.
    ///
    /// Checks against any date other than the session's anchor day return
    /// `Unknown` without touching the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the first load of today's attendance map fails.
    pub async fn check<S: AttendanceStore>(
        &mut self,
        store: &S,
        credential: &BearerCredential,
        staff_id: i64,
        target_date: time::Date,
    ) -> Result<AttendanceCheck, CoreError> {
        if target_date != self.today {
            return Ok(AttendanceCheck::Unknown);
        }

        if self.cached.is_none() {
            let records: HashMap<i64, AttendanceStatus> =
                store.attendance_on(credential, self.today).await?;
            tracing::debug!(records = records.len(), "loaded today's attendance map");
            self.cached = Some(records);
        }

        let records: &HashMap<i64, AttendanceStatus> =
            self.cached.get_or_insert_with(HashMap::new);
        Ok(amc_book_domain::check(
            staff_id,
            target_date,
            self.today,
            records,
        ))
    }
}
