// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Period reports: which cards are due this month and which are done.

use crate::error::ApiError;
use amc_book::{BearerCredential, CardStore, TicketStore};
use amc_book_domain::{Card, CardType, PeriodMonth, PeriodStatus, PeriodView, ServiceTicket};
use serde::Serialize;

/// Which term class a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Recurring AMC milestones.
    Amc,
    /// Warranty free-service milestones. Excludes "other machine" cards.
    Warranty,
}

/// Optional done/not-done filter on report rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Keep every row.
    All,
    /// Keep only rows whose period is done.
    Done,
    /// Keep only rows whose period is not done.
    NotDone,
}

impl StatusFilter {
    /// Parses a filter from its query-string form.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if the value is not recognized.
    pub fn parse(s: &str) -> Result<Self, ApiError> {
        match s {
            "all" => Ok(Self::All),
            "done" => Ok(Self::Done),
            "not_done" => Ok(Self::NotDone),
            _ => Err(ApiError::InvalidInput {
                field: String::from("status"),
                message: format!("unknown status filter '{s}'"),
            }),
        }
    }

    const fn keeps(self, status: PeriodStatus) -> bool {
        match self {
            Self::All => true,
            Self::Done => matches!(status, PeriodStatus::Done),
            Self::NotDone => matches!(status, PeriodStatus::NotDone),
        }
    }
}

/// One flat row of a period report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// The card the row describes.
    pub card_id: i64,
    /// The customer's display name.
    pub customer_name: String,
    /// The customer's contact phone.
    pub customer_phone: String,
    /// The equipment model.
    pub model: String,
    /// Region code.
    pub region: String,
    /// City.
    pub city: String,
    /// The reporting period.
    pub period: PeriodMonth,
    /// Done or not done.
    pub status: PeriodStatus,
    /// The displayed service date: actual when done, theoretical otherwise.
    pub service_date: Option<time::Date>,
}

/// Builds the period report for one term class.
///
/// Cards without the relevant term, and cards whose view is empty for the
/// period, are excluded. Warranty reports additionally exclude
/// "other machine" cards.
///
/// # Errors
///
/// Returns an error if a store call or milestone projection fails.
pub async fn period_report<C, T>(
    cards: &C,
    tickets: &T,
    credential: &BearerCredential,
    kind: ReportKind,
    period: PeriodMonth,
    region: Option<&str>,
    filter: StatusFilter,
) -> Result<Vec<ReportRow>, ApiError>
where
    C: CardStore,
    T: TicketStore,
{
    let all_cards: Vec<Card> = cards
        .list_cards(credential, region)
        .await
        .map_err(amc_book::CoreError::from)?;

    let mut rows: Vec<ReportRow> = Vec::new();
    for card in all_cards {
        let Some(scoped) = scope_card(card, kind) else {
            continue;
        };

        let card_tickets: Vec<ServiceTicket> = tickets
            .list_tickets(credential, scoped.card_id, None)
            .await
            .map_err(amc_book::CoreError::from)?;

        let view: PeriodView = amc_book_domain::select(&scoped, period, &card_tickets)?;
        if view.is_empty() || !filter.keeps(view.status) {
            continue;
        }

        rows.push(ReportRow {
            card_id: scoped.card_id,
            customer_name: scoped.customer_name,
            customer_phone: scoped.customer_phone,
            model: scoped.model,
            region: scoped.region,
            city: scoped.city,
            period,
            status: view.status,
            service_date: view.primary_date,
        });
    }

    tracing::debug!(rows = rows.len(), %period, "built period report");
    Ok(rows)
}

/// Restricts a card to the term class the report covers.
///
/// Returns `None` when the card does not participate in this report.
fn scope_card(mut card: Card, kind: ReportKind) -> Option<Card> {
    match kind {
        ReportKind::Amc => {
            card.amc.as_ref()?;
            card.warranty = None;
        }
        ReportKind::Warranty => {
            if card.card_type == CardType::OtherMachine {
                return None;
            }
            card.warranty.as_ref()?;
            card.amc = None;
        }
    }
    Some(card)
}
