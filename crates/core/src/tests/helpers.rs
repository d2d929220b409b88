// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::credential::{BearerCredential, CredentialProvider};
use crate::error::CoreError;
use crate::stores::{
    AttendanceStore, StatusPatch, StoreError, TicketCreate, TicketStore, apply_patch,
};
use amc_book_domain::{
    AttendanceStatus, MilestoneKey, ServiceKind, ServiceStatus, ServiceTicket, VisitType,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;
use time::macros::date;

pub fn create_test_actor() -> amc_book_audit::Actor {
    amc_book_audit::Actor::new(String::from("admin-7"), String::from("admin"))
}

pub fn create_test_cause() -> amc_book_audit::Cause {
    amc_book_audit::Cause::new(
        String::from("bulk-2025-06"),
        String::from("Bulk booking for 2025-06"),
    )
}

pub fn create_test_request(card_id: i64, staff_id: Option<i64>) -> crate::BookingRequest {
    crate::BookingRequest {
        card_id,
        customer_id: card_id * 10,
        kind: ServiceKind::Free,
        visit_type: VisitType::MandatoryService,
        requested_by: 1,
        staff_id,
        preferred_date: date!(2025 - 06 - 20),
        scheduled_date: date!(2025 - 06 - 22),
        milestone: Some(MilestoneKey::new(card_id, 1)),
        description: String::from("AMC visit"),
    }
}

pub const TEST_TODAY: time::Date = date!(2025 - 06 - 15);

/// In-memory ticket store with scriptable failure modes.
pub struct MockTicketStore {
    tickets: Mutex<Vec<ServiceTicket>>,
    next_id: AtomicI64,
    pub create_calls: AtomicUsize,
    /// Cards whose creates fail transiently.
    pub transient_cards: HashSet<i64>,
    /// Cards whose creates stall long enough to trip any timeout.
    pub slow_cards: HashSet<i64>,
    /// When set, every call is rejected as unauthenticated.
    pub reject_credential: bool,
}

impl MockTicketStore {
    pub fn new() -> Self {
        Self {
            tickets: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            create_calls: AtomicUsize::new(0),
            transient_cards: HashSet::new(),
            slow_cards: HashSet::new(),
            reject_credential: false,
        }
    }

    pub fn seed(&self, ticket: ServiceTicket) {
        self.tickets.lock().unwrap().push(ticket);
    }

    pub fn ticket_count(&self) -> usize {
        self.tickets.lock().unwrap().len()
    }
}

pub fn create_seed_ticket(
    card_id: i64,
    milestone: Option<MilestoneKey>,
    status: ServiceStatus,
) -> ServiceTicket {
    ServiceTicket {
        id: 9000 + card_id,
        card_id,
        customer_id: card_id * 10,
        kind: ServiceKind::Free,
        visit_type: VisitType::MandatoryService,
        requested_by: 1,
        assigned_staff: Some(3),
        preferred_date: date!(2025 - 05 - 10),
        scheduled_date: date!(2025 - 05 - 10),
        status,
        milestone,
        description: String::from("Seeded ticket"),
        otp_phone: None,
        next_service_date: None,
        feedback: None,
    }
}

impl TicketStore for MockTicketStore {
    fn list_tickets(
        &self,
        _credential: &BearerCredential,
        card_id: i64,
        status: Option<ServiceStatus>,
    ) -> impl Future<Output = Result<Vec<ServiceTicket>, StoreError>> + Send {
        async move {
            let tickets = self.tickets.lock().unwrap();
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
        _credential: &BearerCredential,
        payload: &TicketCreate,
    ) -> impl Future<Output = Result<ServiceTicket, StoreError>> + Send {
        async move {
            self.create_calls.fetch_add(1, Ordering::SeqCst);

            if self.slow_cards.contains(&payload.card_id) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.reject_credential {
                return Err(StoreError::CredentialRejected);
            }
            if self.transient_cards.contains(&payload.card_id) {
                return Err(StoreError::Transient(String::from("connection reset")));
            }

            let mut tickets = self.tickets.lock().unwrap();
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
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
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
            Ok(ticket)
        }
    }

    fn patch_status(
        &self,
        _credential: &BearerCredential,
        ticket_id: i64,
        patch: &StatusPatch,
    ) -> impl Future<Output = Result<ServiceTicket, StoreError>> + Send {
        async move {
            let mut tickets = self.tickets.lock().unwrap();
            let ticket = tickets
                .iter_mut()
                .find(|t| t.id == ticket_id)
                .ok_or(StoreError::NotFound {
                    entity: "ticket",
                    id: ticket_id,
                })?;
            apply_patch(ticket, patch).map_err(|e| StoreError::Rejected(e.to_string()))?;
            Ok(ticket.clone())
        }
    }
}

/// Credential provider with a scripted current/refresh behavior.
pub struct MockCredentialProvider {
    current_ok: bool,
    refresh_ok: bool,
    pub refresh_calls: AtomicUsize,
}

impl MockCredentialProvider {
    pub fn healthy() -> Self {
        Self {
            current_ok: true,
            refresh_ok: true,
            refresh_calls: AtomicUsize::new(0),
        }
    }

    pub fn expired_then_refreshable() -> Self {
        Self {
            current_ok: false,
            refresh_ok: true,
            refresh_calls: AtomicUsize::new(0),
        }
    }

    pub fn dead() -> Self {
        Self {
            current_ok: false,
            refresh_ok: false,
            refresh_calls: AtomicUsize::new(0),
        }
    }
}

impl CredentialProvider for MockCredentialProvider {
    fn current(&self) -> impl Future<Output = Result<BearerCredential, CoreError>> + Send {
        async move {
            if self.current_ok {
                Ok(BearerCredential::new(String::from("token-current")))
            } else {
                Err(CoreError::Credential(String::from("token expired")))
            }
        }
    }

    fn refresh(&self) -> impl Future<Output = Result<BearerCredential, CoreError>> + Send {
        async move {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            if self.refresh_ok {
                Ok(BearerCredential::new(String::from("token-refreshed")))
            } else {
                Err(CoreError::Credential(String::from("refresh rejected")))
            }
        }
    }
}

/// Attendance store that counts loads.
pub struct MockAttendanceStore {
    pub records: HashMap<i64, AttendanceStatus>,
    pub load_calls: AtomicUsize,
}

impl MockAttendanceStore {
    pub fn new(records: HashMap<i64, AttendanceStatus>) -> Self {
        Self {
            records,
            load_calls: AtomicUsize::new(0),
        }
    }
}

impl AttendanceStore for MockAttendanceStore {
    fn attendance_on(
        &self,
        _credential: &BearerCredential,
        _date: time::Date,
    ) -> impl Future<Output = Result<HashMap<i64, AttendanceStatus>, StoreError>> + Send {
        async move {
            self.load_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }
    }
}
