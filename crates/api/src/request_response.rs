// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response payloads for the HTTP surface.
//!
//! Dates serialize as `YYYY-MM-DD` strings and enumerations as their
//! domain string codes; conversion functions translate parse failures into
//! field-level `ApiError`s.

use crate::error::ApiError;
use amc_book::{BookingOutcome, BookingRequest, BulkBookingReport, StatusPatch};
use amc_book_domain::{
    AmcTerm, CardType, Feedback, IntervalUnit, MilestoneKey, ServiceInterval, ServiceKind,
    ServiceStatus, StartConvention, VisitType, WarrantyTerm,
};
use serde::{Deserialize, Serialize};

/// Request body for creating a card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardCreateRequest {
    /// The owning customer's identifier.
    pub customer_id: i64,
    /// The customer's display name.
    pub customer_name: String,
    /// The customer's contact phone.
    pub customer_phone: String,
    /// The equipment model.
    pub model: String,
    /// Card classification code (`normal` or `om`).
    pub card_type: String,
    /// Region code the card is serviced from.
    pub region: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
}

impl CardCreateRequest {
    /// Parses the card type code.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if the code is not recognized.
    pub fn card_type(&self) -> Result<CardType, ApiError> {
        CardType::parse(&self.card_type).map_err(|err| ApiError::InvalidInput {
            field: String::from("card_type"),
            message: err.to_string(),
        })
    }
}

/// Request body for setting a card's warranty term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WarrantyTermRequest {
    /// The first day of coverage.
    pub start_date: time::Date,
    /// Explicit coverage end. Omitted for the default one-year term.
    pub end_date: Option<time::Date>,
    /// Whether the default end counts the start day. Defaults to the
    /// exclusive-start convention.
    pub inclusive_start: Option<bool>,
}

impl WarrantyTermRequest {
    /// Builds the warranty term.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::DomainRuleViolation` if the dates are invalid.
    pub fn into_term(self) -> Result<WarrantyTerm, ApiError> {
        match self.end_date {
            Some(end) => Ok(WarrantyTerm::new(self.start_date, end)?),
            None => {
                let convention: StartConvention = if self.inclusive_start.unwrap_or(false) {
                    StartConvention::InclusiveStart
                } else {
                    StartConvention::ExclusiveStart
                };
                Ok(WarrantyTerm::with_default_end(self.start_date, convention)?)
            }
        }
    }
}

/// Request body for setting a card's AMC term.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AmcTermRequest {
    /// The first service due date.
    pub start_date: time::Date,
    /// The last covered day. Omitted for open-ended contracts.
    pub end_date: Option<time::Date>,
    /// Recurrence unit (`days` or `months`).
    pub interval_unit: String,
    /// Recurrence step count.
    pub interval_value: u32,
}

impl AmcTermRequest {
    /// Builds the AMC term.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for an unknown unit and
    /// `ApiError::DomainRuleViolation` for invalid dates or interval.
    pub fn into_term(self) -> Result<AmcTerm, ApiError> {
        let unit: IntervalUnit =
            IntervalUnit::parse(&self.interval_unit).map_err(|err| ApiError::InvalidInput {
                field: String::from("interval_unit"),
                message: err.to_string(),
            })?;
        let interval: ServiceInterval = ServiceInterval::new(unit, self.interval_value)?;
        Ok(AmcTerm::new(self.start_date, self.end_date, interval)?)
    }
}

/// One item of a bulk booking request body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookingItemRequest {
    /// The card to book against.
    pub card_id: i64,
    /// The owning customer.
    pub customer_id: i64,
    /// Billable or covered visit (`normal` or `free`).
    pub kind: String,
    /// Visit reason code (`I`, `C`, `MS`, `CS`, `CC`).
    pub visit_type: String,
    /// The staff member to assign. Items without one are skipped.
    pub staff_id: Option<i64>,
    /// The customer's preferred visit date.
    pub preferred_date: time::Date,
    /// The scheduled visit date.
    pub scheduled_date: time::Date,
    /// The milestone index the booking covers, for recurring terms.
    pub milestone_index: Option<u32>,
    /// Work description.
    #[serde(default)]
    pub description: String,
}

impl BookingItemRequest {
    /// Converts the item into a core booking request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for unknown kind or visit type codes.
    pub fn into_booking(self, requested_by: i64) -> Result<BookingRequest, ApiError> {
        let kind: ServiceKind =
            ServiceKind::parse(&self.kind).map_err(|err| ApiError::InvalidInput {
                field: String::from("kind"),
                message: err.to_string(),
            })?;
        let visit_type: VisitType =
            VisitType::parse(&self.visit_type).map_err(|err| ApiError::InvalidInput {
                field: String::from("visit_type"),
                message: err.to_string(),
            })?;
        Ok(BookingRequest {
            card_id: self.card_id,
            customer_id: self.customer_id,
            kind,
            visit_type,
            requested_by,
            staff_id: self.staff_id,
            preferred_date: self.preferred_date,
            scheduled_date: self.scheduled_date,
            milestone: self
                .milestone_index
                .map(|index| MilestoneKey::new(self.card_id, index)),
            description: self.description,
        })
    }
}

/// Request body for a bulk booking run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BulkBookingRequestBody {
    /// The items to book.
    pub items: Vec<BookingItemRequest>,
}

/// Request body for patching a ticket's status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct StatusPatchRequest {
    /// The requested status, when the patch changes status.
    pub status: Option<String>,
    /// Staff to assign, for assignment patches.
    pub staff_id: Option<i64>,
    /// New scheduled date, for assignment patches.
    pub scheduled_date: Option<time::Date>,
    /// Phone the confirmation code was dispatched to.
    pub otp_phone: Option<String>,
    /// Feedback rating (1-5), recorded on completion.
    pub rating: Option<u8>,
    /// Feedback comment.
    pub comment: Option<String>,
    /// Forward hint for the next visit.
    pub next_service_date: Option<time::Date>,
    /// Operator force edit.
    #[serde(default)]
    pub force: bool,
}

impl StatusPatchRequest {
    /// Converts the request into a store status patch.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for an unknown status string and
    /// `ApiError::DomainRuleViolation` for an out-of-range rating.
    pub fn into_patch(self) -> Result<StatusPatch, ApiError> {
        let status: Option<ServiceStatus> = match self.status.as_deref() {
            Some(s) => Some(s.parse().map_err(
                |err: amc_book_domain::DomainError| ApiError::InvalidInput {
                    field: String::from("status"),
                    message: err.to_string(),
                },
            )?),
            None => None,
        };
        let feedback: Option<Feedback> = match self.rating {
            Some(rating) => Some(Feedback::new(rating, self.comment.unwrap_or_default())?),
            None => None,
        };
        Ok(StatusPatch {
            status,
            staff_id: self.staff_id,
            scheduled_date: self.scheduled_date,
            otp_phone: self.otp_phone,
            feedback,
            next_service_date: self.next_service_date,
            force: self.force,
        })
    }
}

/// One item outcome in a bulk booking response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeResponse {
    /// The card the item targeted.
    pub card_id: i64,
    /// The outcome (`booked`, `failed` or `skipped`).
    pub outcome: String,
    /// The created ticket's id, for booked items.
    pub ticket_id: Option<i64>,
    /// The milestone targeted, as `card#index`.
    pub milestone: Option<String>,
    /// Why the item failed or was skipped.
    pub reason: Option<String>,
}

impl From<&BookingOutcome> for OutcomeResponse {
    fn from(outcome: &BookingOutcome) -> Self {
        match outcome {
            BookingOutcome::Booked {
                ticket_id,
                card_id,
                milestone,
            } => Self {
                card_id: *card_id,
                outcome: String::from("booked"),
                ticket_id: Some(*ticket_id),
                milestone: milestone.map(|k| k.to_string()),
                reason: None,
            },
            BookingOutcome::Failed {
                card_id,
                milestone,
                reason,
            } => Self {
                card_id: *card_id,
                outcome: String::from("failed"),
                ticket_id: None,
                milestone: milestone.map(|k| k.to_string()),
                reason: Some(reason.clone()),
            },
            BookingOutcome::Skipped {
                card_id,
                milestone,
                reason,
            } => Self {
                card_id: *card_id,
                outcome: String::from("skipped"),
                ticket_id: None,
                milestone: milestone.map(|k| k.to_string()),
                reason: Some(reason.clone()),
            },
        }
    }
}

/// Response body for a bulk booking run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkBookingResponse {
    /// Number of booked items.
    pub booked: usize,
    /// Number of failed items.
    pub failed: usize,
    /// Number of skipped items.
    pub skipped: usize,
    /// Per-item outcomes.
    pub outcomes: Vec<OutcomeResponse>,
}

impl From<&BulkBookingReport> for BulkBookingResponse {
    fn from(report: &BulkBookingReport) -> Self {
        Self {
            booked: report.booked(),
            failed: report.failed(),
            skipped: report.skipped(),
            outcomes: report.outcomes.iter().map(OutcomeResponse::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_warranty_request_default_end_is_exclusive_start() {
        let request = WarrantyTermRequest {
            start_date: date!(2025 - 03 - 15),
            end_date: None,
            inclusive_start: None,
        };
        let term = request.into_term().unwrap();
        assert_eq!(term.end_date(), date!(2026 - 03 - 14));
    }

    #[test]
    fn test_amc_request_rejects_unknown_unit() {
        let request = AmcTermRequest {
            start_date: date!(2025 - 01 - 10),
            end_date: None,
            interval_unit: String::from("weeks"),
            interval_value: 2,
        };
        assert!(matches!(
            request.into_term(),
            Err(ApiError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_booking_item_milestone_key() {
        let item = BookingItemRequest {
            card_id: 7,
            customer_id: 70,
            kind: String::from("free"),
            visit_type: String::from("MS"),
            staff_id: Some(3),
            preferred_date: date!(2025 - 06 - 20),
            scheduled_date: date!(2025 - 06 - 22),
            milestone_index: Some(2),
            description: String::new(),
        };
        let booking = item.into_booking(1).unwrap();
        assert_eq!(booking.milestone, Some(MilestoneKey::new(7, 2)));
        assert_eq!(booking.visit_type, VisitType::MandatoryService);
    }

    #[test]
    fn test_status_patch_request_builds_feedback() {
        let request = StatusPatchRequest {
            status: Some(String::from("completed")),
            rating: Some(5),
            comment: Some(String::from("Prompt")),
            ..StatusPatchRequest::default()
        };
        let patch = request.into_patch().unwrap();
        assert_eq!(patch.status, Some(ServiceStatus::Completed));
        assert_eq!(patch.feedback.unwrap().rating(), 5);
    }

    #[test]
    fn test_status_patch_request_rejects_unknown_status() {
        let request = StatusPatchRequest {
            status: Some(String::from("done")),
            ..StatusPatchRequest::default()
        };
        assert!(matches!(
            request.into_patch(),
            Err(ApiError::InvalidInput { .. })
        ));
    }
}
