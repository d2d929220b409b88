// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The bulk booking orchestrator.
//!
//! A bulk run fans one request list out into independent conditional
//! creates. Items are dispatched concurrently, each bounded by the
//! caller's per-item timeout budget. One item's failure never aborts its
//! siblings; failures come back as data in the report.
//!
//! Re-running a partially failed run is safe: the conditional create is
//! keyed on the milestone, so already-booked items come back as conflicts,
//! not duplicates.

use crate::booking::{BookingOutcome, BookingRequest};
use crate::credential::{BearerCredential, CredentialProvider, acquire};
use crate::error::CoreError;
use crate::stores::{StoreError, TicketCreate, TicketStore};
use amc_book_audit::{Action, Actor, AuditEvent, BookingSnapshot, Cause};
use futures::future::join_all;
use std::time::Duration;

/// The collected result of one bulk booking run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkBookingReport {
    /// Per-item outcomes, in no particular order.
    pub outcomes: Vec<BookingOutcome>,
    /// One audit event per successful booking.
    pub audit_events: Vec<AuditEvent>,
}

impl BulkBookingReport {
    /// Returns the number of booked items.
    #[must_use]
    pub fn booked(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, BookingOutcome::Booked { .. }))
            .count()
    }

    /// Returns the number of failed items.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, BookingOutcome::Failed { .. }))
            .count()
    }

    /// Returns the number of skipped items.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, BookingOutcome::Skipped { .. }))
            .count()
    }
}

/// Books every request in one concurrent run and reports per-item outcomes.
///
/// Items without a staff member are skipped before dispatch. A credential
/// is acquired once up front, with a single refresh attempt; if none can be
/// obtained every dispatchable item is failed with the credential reason.
///
/// # Arguments
///
/// * `tickets` - The ticket store to create against
/// * `provider` - Supplies the bearer credential for the run
/// * `actor` - Who initiated the run
/// * `cause` - Why the run happened (shared by every item's audit event)
/// * `requests` - The items to book
/// * `today` - Today's date, for booking-date validation
/// * `budget` - Per-item timeout
pub async fn bulk_book<T, P>(
    tickets: &T,
    provider: &P,
    actor: &Actor,
    cause: &Cause,
    requests: Vec<BookingRequest>,
    today: time::Date,
    budget: Duration,
) -> BulkBookingReport
where
    T: TicketStore,
    P: CredentialProvider,
{
    let total: usize = requests.len();
    let mut outcomes: Vec<BookingOutcome> = Vec::with_capacity(total);
    let mut dispatchable: Vec<TicketCreate> = Vec::with_capacity(total);

    for request in requests {
        if let Err(err) = request.validate(today) {
            outcomes.push(BookingOutcome::Failed {
                card_id: request.card_id,
                milestone: request.milestone,
                reason: err.to_string(),
            });
            continue;
        }
        let card_id: i64 = request.card_id;
        let milestone = request.milestone;
        match request.into_create() {
            Some(create) => dispatchable.push(create),
            None => outcomes.push(BookingOutcome::Skipped {
                card_id,
                milestone,
                reason: String::from("no staff member chosen"),
            }),
        }
    }

    tracing::info!(
        total,
        dispatchable = dispatchable.len(),
        skipped = outcomes.len(),
        "starting bulk booking run"
    );

    if dispatchable.is_empty() {
        return BulkBookingReport {
            outcomes,
            audit_events: Vec::new(),
        };
    }

    let credential: BearerCredential = match acquire(provider).await {
        Ok(credential) => credential,
        Err(err) => {
            // Nothing was dispatched; fail every remaining item with the
            // credential reason.
            tracing::warn!(error = %err, "bulk run aborted before dispatch");
            let reason: String = err.to_string();
            for create in dispatchable {
                outcomes.push(BookingOutcome::Failed {
                    card_id: create.card_id,
                    milestone: create.milestone,
                    reason: reason.clone(),
                });
            }
            return BulkBookingReport {
                outcomes,
                audit_events: Vec::new(),
            };
        }
    };

    let items = dispatchable
        .into_iter()
        .map(|create| book_one(tickets, &credential, actor, cause, create, budget));
    let results: Vec<(BookingOutcome, Option<AuditEvent>)> = join_all(items).await;

    let mut audit_events: Vec<AuditEvent> = Vec::new();
    for (outcome, event) in results {
        if let BookingOutcome::Failed { card_id, reason, .. } = &outcome {
            tracing::warn!(card_id, %reason, "bulk booking item failed");
        }
        if let Some(event) = event {
            audit_events.push(event);
        }
        outcomes.push(outcome);
    }

    let report = BulkBookingReport {
        outcomes,
        audit_events,
    };
    tracing::info!(
        booked = report.booked(),
        failed = report.failed(),
        skipped = report.skipped(),
        "bulk booking run finished"
    );
    report
}

/// Dispatches one item: snapshot, conditional create, audit event.
async fn book_one<T: TicketStore>(
    tickets: &T,
    credential: &BearerCredential,
    actor: &Actor,
    cause: &Cause,
    create: TicketCreate,
    budget: Duration,
) -> (BookingOutcome, Option<AuditEvent>) {
    let card_id: i64 = create.card_id;
    let milestone = create.milestone;

    let attempt = async {
        let before: BookingSnapshot = snapshot(tickets, credential, card_id).await;
        let ticket = tickets.create_ticket_checked(credential, &create).await?;
        Ok::<_, StoreError>((before, ticket))
    };

    match tokio::time::timeout(budget, attempt).await {
        Ok(Ok((before, ticket))) => {
            let after = BookingSnapshot::new(
                before.open_tickets.saturating_add(1),
                before.completed_tickets,
            );
            let event = AuditEvent::new(
                actor.clone(),
                cause.clone(),
                Action::new(
                    String::from("BookService"),
                    Some(format!("ticket {}", ticket.id)),
                ),
                card_id,
                milestone,
                before,
                after,
            );
            (
                BookingOutcome::Booked {
                    ticket_id: ticket.id,
                    card_id,
                    milestone,
                },
                Some(event),
            )
        }
        Ok(Err(err)) => {
            let reason: String = CoreError::from(err).to_string();
            (
                BookingOutcome::Failed {
                    card_id,
                    milestone,
                    reason,
                },
                None,
            )
        }
        Err(_) => (
            BookingOutcome::Failed {
                card_id,
                milestone,
                reason: format!("timed out after {budget:?}"),
            },
            None,
        ),
    }
}

/// Counts one card's open and completed tickets for an audit snapshot.
///
/// Snapshot reads are best-effort; a failed read degrades to zero counts
/// rather than failing the booking.
async fn snapshot<T: TicketStore>(
    tickets: &T,
    credential: &BearerCredential,
    card_id: i64,
) -> BookingSnapshot {
    match tickets.list_tickets(credential, card_id, None).await {
        Ok(existing) => {
            let open: u32 = count(existing.iter().filter(|t| t.is_open()).count());
            let completed: u32 = count(
                existing
                    .iter()
                    .filter(|t| t.status == amc_book_domain::ServiceStatus::Completed)
                    .count(),
            );
            BookingSnapshot::new(open, completed)
        }
        Err(err) => {
            tracing::warn!(card_id, error = %err, "audit snapshot read failed");
            BookingSnapshot::new(0, 0)
        }
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
