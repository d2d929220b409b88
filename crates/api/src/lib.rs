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
    clippy::all
)]

mod auth;
mod confirmation;
mod error;
mod export;
mod report;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, resolve_actor};
pub use confirmation::{ConfirmationDispatch, DispatchMode, dispatch_code, generate_code};
pub use error::{ApiError, AuthError};
pub use export::{ExportError, render_csv};
pub use report::{ReportKind, ReportRow, StatusFilter, period_report};
pub use request_response::{
    AmcTermRequest, BookingItemRequest, BulkBookingRequestBody, BulkBookingResponse,
    CardCreateRequest, OutcomeResponse, StatusPatchRequest, WarrantyTermRequest,
};
