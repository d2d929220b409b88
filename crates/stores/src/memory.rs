// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use amc_book::{
    AttendanceStore, BearerCredential, CardStore, StaffDirectory, StatusPatch, StoreError,
    TicketCreate, TicketStore, apply_patch,
};
use amc_book_domain::{
    AmcTerm, AttendanceStatus, Card, ServiceStatus, ServiceTicket, Staff, WarrantyTerm,
};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

/// An in-memory implementation of every store trait.
///
/// One instance holds cards, tickets, staff and attendance behind
/// per-collection locks. All trait calls verify the presented credential
/// against the token configured at construction.
pub struct MemoryStore {
    token: String,
    cards: RwLock<HashMap<i64, Card>>,
    tickets: RwLock<Vec<ServiceTicket>>,
    staff: RwLock<Vec<Staff>>,
    attendance: RwLock<HashMap<time::Date, HashMap<i64, AttendanceStatus>>>,
    next_card_id: AtomicI64,
    next_ticket_id: AtomicI64,
}

impl MemoryStore {
    /// Creates an empty store that accepts `token` on every call.
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token,
            cards: RwLock::new(HashMap::new()),
            tickets: RwLock::new(Vec::new()),
            staff: RwLock::new(Vec::new()),
            attendance: RwLock::new(HashMap::new()),
            next_card_id: AtomicI64::new(1),
            next_ticket_id: AtomicI64::new(1),
        }
    }

    fn verify(&self, credential: &BearerCredential) -> Result<(), StoreError> {
        if credential.token() == self.token {
            Ok(())
        } else {
            Err(StoreError::CredentialRejected)
        }
    }

    fn lock_poisoned() -> StoreError {
        StoreError::Transient(String::from("store lock poisoned"))
    }

    /// Inserts a card and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns a transient error if the store lock is poisoned.
    pub fn insert_card(&self, mut card: Card) -> Result<Card, StoreError> {
        card.card_id = self.next_card_id.fetch_add(1, Ordering::SeqCst);
        let mut cards = self.cards.write().map_err(|_| Self::lock_poisoned())?;
        cards.insert(card.card_id, card.clone());
        Ok(card)
    }

    /// Sets or replaces a card's warranty term.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the card does not exist.
    pub fn set_warranty(&self, card_id: i64, term: WarrantyTerm) -> Result<Card, StoreError> {
        let mut cards = self.cards.write().map_err(|_| Self::lock_poisoned())?;
        let card = cards.get_mut(&card_id).ok_or(StoreError::NotFound {
            entity: "card",
            id: card_id,
        })?;
        card.warranty = Some(term);
        Ok(card.clone())
    }

    /// Sets or replaces a card's AMC term.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the card does not exist.
    pub fn set_amc(&self, card_id: i64, term: AmcTerm) -> Result<Card, StoreError> {
        let mut cards = self.cards.write().map_err(|_| Self::lock_poisoned())?;
        let card = cards.get_mut(&card_id).ok_or(StoreError::NotFound {
            entity: "card",
            id: card_id,
        })?;
        card.amc = Some(term);
        Ok(card.clone())
    }

    /// Adds a staff member to the directory.
    ///
    /// # Errors
    ///
    /// Returns a transient error if the store lock is poisoned.
    pub fn add_staff(&self, staff: Staff) -> Result<(), StoreError> {
        let mut directory = self.staff.write().map_err(|_| Self::lock_poisoned())?;
        directory.push(staff);
        Ok(())
    }

    /// Records a staff member's attendance for one date.
    ///
    /// # Errors
    ///
    /// Returns a transient error if the store lock is poisoned.
    pub fn mark_attendance(
        &self,
        date: time::Date,
        staff_id: i64,
        status: AttendanceStatus,
    ) -> Result<(), StoreError> {
        let mut attendance = self.attendance.write().map_err(|_| Self::lock_poisoned())?;
        attendance.entry(date).or_default().insert(staff_id, status);
        Ok(())
    }

    /// Fetches one ticket by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the ticket does not exist.
    pub fn get_ticket(&self, ticket_id: i64) -> Result<ServiceTicket, StoreError> {
        let tickets = self.tickets.read().map_err(|_| Self::lock_poisoned())?;
        tickets
            .iter()
            .find(|t| t.id == ticket_id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "ticket",
                id: ticket_id,
            })
    }
}

impl CardStore for MemoryStore {
    fn get_card(
        &self,
        credential: &BearerCredential,
        card_id: i64,
    ) -> impl Future<Output = Result<Card, StoreError>> + Send {
        async move {
            self.verify(credential)?;
            let cards = self.cards.read().map_err(|_| Self::lock_poisoned())?;
            cards.get(&card_id).cloned().ok_or(StoreError::NotFound {
                entity: "card",
                id: card_id,
            })
        }
    }

    fn list_cards(
        &self,
        credential: &BearerCredential,
        region: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Card>, StoreError>> + Send {
        let region: Option<String> = region.map(ToString::to_string);
        async move {
            self.verify(credential)?;
            let cards = self.cards.read().map_err(|_| Self::lock_poisoned())?;
            let mut listed: Vec<Card> = cards
                .values()
                .filter(|c| region.as_deref().is_none_or(|r| c.region == r))
                .cloned()
                .collect();
            listed.sort_by_key(|c| c.card_id);
            Ok(listed)
        }
    }
}

impl TicketStore for MemoryStore {
    fn list_tickets(
        &self,
        credential: &BearerCredential,
        card_id: i64,
        status: Option<ServiceStatus>,
    ) -> impl Future<Output = Result<Vec<ServiceTicket>, StoreError>> + Send {
        async move {
            self.verify(credential)?;
            let tickets = self.tickets.read().map_err(|_| Self::lock_poisoned())?;
            Ok(tickets
                .iter()
                .filter(|t| t.card_id == card_id)
                .filter(|t| status.is_none_or(|s| t.status == s))
                .cloned()
                .collect())
        }
    }

    fn create_ticket_checked(
        &self,
        credential: &BearerCredential,
        payload: &TicketCreate,
    ) -> impl Future<Output = Result<ServiceTicket, StoreError>> + Send {
        async move {
            self.verify(credential)?;

            {
                let cards = self.cards.read().map_err(|_| Self::lock_poisoned())?;
                if !cards.contains_key(&payload.card_id) {
                    return Err(StoreError::NotFound {
                        entity: "card",
                        id: payload.card_id,
                    });
                }
            }

            // Check and insert under one write lock so concurrent creates
            // for the same milestone cannot both pass the check.
            let mut tickets = self.tickets.write().map_err(|_| Self::lock_poisoned())?;
            if let Some(key) = payload.milestone {
                let covered: bool = tickets.iter().any(|t| {
                    t.milestone == Some(key)
                        && (t.is_open() || t.status == ServiceStatus::Completed)
                });
                if covered {
                    return Err(StoreError::Conflict {
                        card_id: payload.card_id,
                        milestone: Some(key),
                    });
                }
            }

            let ticket = ServiceTicket {
                id: self.next_ticket_id.fetch_add(1, Ordering::SeqCst),
                card_id: payload.card_id,
                customer_id: payload.customer_id,
                kind: payload.kind,
                visit_type: payload.visit_type,
                requested_by: payload.requested_by,
                assigned_staff: Some(payload.staff_id),
                preferred_date: payload.preferred_date,
                scheduled_date: payload.scheduled_date,
                status: ServiceStatus::Assigned,
                milestone: payload.milestone,
                description: payload.description.clone(),
                otp_phone: None,
                next_service_date: None,
                feedback: None,
            };
            tickets.push(ticket.clone());
            tracing::debug!(ticket_id = ticket.id, card_id = ticket.card_id, "created ticket");
            Ok(ticket)
        }
    }

    fn patch_status(
        &self,
        credential: &BearerCredential,
        ticket_id: i64,
        patch: &StatusPatch,
    ) -> impl Future<Output = Result<ServiceTicket, StoreError>> + Send {
        async move {
            self.verify(credential)?;
            let mut tickets = self.tickets.write().map_err(|_| Self::lock_poisoned())?;
            let ticket = tickets
                .iter_mut()
                .find(|t| t.id == ticket_id)
                .ok_or(StoreError::NotFound {
                    entity: "ticket",
                    id: ticket_id,
                })?;
            apply_patch(ticket, patch).map_err(|err| StoreError::Rejected(err.to_string()))?;
            Ok(ticket.clone())
        }
    }
}

impl StaffDirectory for MemoryStore {
    fn list_workers(
        &self,
        credential: &BearerCredential,
    ) -> impl Future<Output = Result<Vec<Staff>, StoreError>> + Send {
        async move {
            self.verify(credential)?;
            let directory = self.staff.read().map_err(|_| Self::lock_poisoned())?;
            Ok(directory.clone())
        }
    }

    fn find_by_phone(
        &self,
        credential: &BearerCredential,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Staff>, StoreError>> + Send {
        let query: String = query.to_string();
        async move {
            self.verify(credential)?;
            let directory = self.staff.read().map_err(|_| Self::lock_poisoned())?;
            Ok(directory
                .iter()
                .filter(|s| s.phone.starts_with(&query))
                .cloned()
                .collect())
        }
    }
}

impl AttendanceStore for MemoryStore {
    fn attendance_on(
        &self,
        credential: &BearerCredential,
        date: time::Date,
    ) -> impl Future<Output = Result<HashMap<i64, AttendanceStatus>, StoreError>> + Send {
        async move {
            self.verify(credential)?;
            let attendance = self.attendance.read().map_err(|_| Self::lock_poisoned())?;
            Ok(attendance.get(&date).cloned().unwrap_or_default())
        }
    }
}
