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
mod booking;
mod bulk;
mod credential;
mod error;
mod stores;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use attendance::AttendanceSession;
pub use booking::{BookingOutcome, BookingRequest};
pub use bulk::{BulkBookingReport, bulk_book};
pub use credential::{BearerCredential, CredentialProvider, acquire};
pub use error::CoreError;
pub use stores::{
    AttendanceStore, CardStore, StaffDirectory, StatusPatch, StoreError, TicketCreate,
    TicketStore, apply_patch,
};
