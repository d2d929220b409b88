// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use amc_book::{BearerCredential, CardStore, StatusPatch, StoreError, TicketCreate, TicketStore};
use amc_book_domain::{
    AmcTerm, Card, CardType, IntervalUnit, MilestoneKey, ServiceInterval, ServiceKind,
    ServiceStatus, ServiceTicket, StartConvention, VisitType, WarrantyTerm,
};
use time::macros::date;

pub fn credential() -> BearerCredential {
    BearerCredential::new(String::from("token"))
}

pub fn card(card_id: i64, region: &str) -> Card {
    Card {
        card_id,
        customer_id: card_id * 10,
        customer_name: format!("Customer {card_id}"),
        customer_phone: String::from("9000000001"),
        model: String::from("AquaPure 900"),
        card_type: CardType::Normal,
        region: region.to_string(),
        address: String::from("12 Lake Road"),
        city: String::from("Coimbatore"),
        warranty: None,
        amc: None,
    }
}

pub fn with_amc(mut c: Card) -> Card {
    let interval = ServiceInterval::new(IntervalUnit::Months, 4).unwrap();
    c.amc = Some(AmcTerm::new(date!(2025 - 01 - 10), Some(date!(2026 - 01 - 10)), interval).unwrap());
    c
}

pub fn with_warranty(mut c: Card) -> Card {
    c.warranty = Some(
        WarrantyTerm::with_default_end(date!(2025 - 02 - 15), StartConvention::ExclusiveStart)
            .unwrap(),
    );
    c
}

pub fn completed_ticket(card_id: i64, scheduled: time::Date) -> ServiceTicket {
    ServiceTicket {
        id: 500 + card_id,
        card_id,
        customer_id: card_id * 10,
        kind: ServiceKind::Free,
        visit_type: VisitType::MandatoryService,
        requested_by: 1,
        assigned_staff: Some(3),
        preferred_date: scheduled,
        scheduled_date: scheduled,
        status: ServiceStatus::Completed,
        milestone: Some(MilestoneKey::new(card_id, 1)),
        description: String::from("AMC visit"),
        otp_phone: None,
        next_service_date: None,
        feedback: None,
    }
}

/// Fixed in-memory stores for report tests.
pub struct FixtureStore {
    pub cards: Vec<Card>,
    pub tickets: Vec<ServiceTicket>,
}

impl CardStore for FixtureStore {
    fn get_card(
        &self,
        _credential: &BearerCredential,
        card_id: i64,
    ) -> impl Future<Output = Result<Card, StoreError>> + Send {
        async move {
            self.cards
                .iter()
                .find(|c| c.card_id == card_id)
                .cloned()
                .ok_or(StoreError::NotFound {
                    entity: "card",
                    id: card_id,
                })
        }
    }

    fn list_cards(
        &self,
        _credential: &BearerCredential,
        region: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Card>, StoreError>> + Send {
        let region: Option<String> = region.map(ToString::to_string);
        async move {
            Ok(self
                .cards
                .iter()
                .filter(|c| region.as_deref().is_none_or(|r| c.region == r))
                .cloned()
                .collect())
        }
    }
}

impl TicketStore for FixtureStore {
    fn list_tickets(
        &self,
        _credential: &BearerCredential,
        card_id: i64,
        status: Option<ServiceStatus>,
    ) -> impl Future<Output = Result<Vec<ServiceTicket>, StoreError>> + Send {
        async move {
            Ok(self
                .tickets
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
        let card_id: i64 = payload.card_id;
        async move {
            Err(StoreError::Rejected(format!(
                "fixture store is read-only (card {card_id})"
            )))
        }
    }

    fn patch_status(
        &self,
        _credential: &BearerCredential,
        ticket_id: i64,
        _patch: &StatusPatch,
    ) -> impl Future<Output = Result<ServiceTicket, StoreError>> + Send {
        async move {
            Err(StoreError::NotFound {
                entity: "ticket",
                id: ticket_id,
            })
        }
    }
}
