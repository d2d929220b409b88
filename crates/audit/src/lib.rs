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

use amc_book_domain::MilestoneKey;

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change.
/// This could be an operator, a worker, or the bulk-booking run itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin", "worker", "bulk-run").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Represents the reason or trigger for an action.
///
/// A cause describes why a state change was initiated. For bulk booking
/// every item in one run shares the run's cause id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, bulk run ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
///
/// An action describes what state change occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`BookService`", "`CompleteService`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of one card's booking state at a point in time.
///
/// Counts are per card and recomputed from the ticket store, so a pair of
/// snapshots shows exactly what a booking changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingSnapshot {
    /// Tickets in a non-terminal state.
    pub open_tickets: u32,
    /// Tickets in the completed state.
    pub completed_tickets: u32,
}

impl BookingSnapshot {
    /// Creates a new `BookingSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `open_tickets` - The number of non-terminal tickets
    /// * `completed_tickets` - The number of completed tickets
    #[must_use]
    pub const fn new(open_tickets: u32, completed_tickets: u32) -> Self {
        Self {
            open_tickets,
            completed_tickets,
        }
    }
}

/// An immutable audit event representing a booking state transition.
///
/// Every successful booking must produce exactly one audit event.
/// Audit events are immutable once created and capture:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The card and milestone the action touched
/// - The booking state before and after the transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The card the action touched.
    pub card_id: i64,
    /// The milestone the action covered, when the action targets one.
    pub milestone: Option<MilestoneKey>,
    /// The booking state before the transition.
    pub before: BookingSnapshot,
    /// The booking state after the transition.
    pub after: BookingSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `card_id` - The card the action touched
    /// * `milestone` - The milestone covered, if any
    /// * `before` - The booking state before the transition
    /// * `after` - The booking state after the transition
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        card_id: i64,
        milestone: Option<MilestoneKey>,
        before: BookingSnapshot,
        after: BookingSnapshot,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            card_id,
            milestone,
            before,
            after,
        }
    }
}
