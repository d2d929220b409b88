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
#![allow(clippy::multiple_crate_versions)]

use amc_book::{
    AttendanceSession, BearerCredential, BookingRequest, CardStore, CoreError, StaffDirectory,
    StatusPatch, StoreError, TicketStore, acquire, bulk_book,
};
use amc_book_api::{
    AmcTermRequest, ApiError, AuthenticatedActor, AuthorizationService, BulkBookingRequestBody,
    BulkBookingResponse, CardCreateRequest, ConfirmationDispatch, DispatchMode, ReportKind,
    ReportRow, StatusFilter, StatusPatchRequest, WarrantyTermRequest, dispatch_code,
    period_report, render_csv, resolve_actor,
};
use amc_book_audit::Cause;
use amc_book_domain::{
    Card, Milestone, PeriodMonth, ServiceStatus, ServiceTicket, Staff, project_amc,
    project_warranty,
};
use amc_book_stores::{MemoryStore, StaticCredentialProvider};
use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// AMC Book Server - HTTP server for the maintenance booking engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Bearer token the in-memory stores accept
    #[arg(long, default_value = "dev-token")]
    store_token: String,

    /// Per-item timeout for bulk booking dispatch, in milliseconds
    #[arg(long, default_value_t = 5000)]
    booking_timeout_ms: u64,

    /// Return confirmation codes in responses instead of dispatching SMS
    #[arg(long, default_value_t = false)]
    dev_codes: bool,
}

/// Application state shared across handlers.
///
/// The store is shared behind an `Arc`; its collections carry their own
/// locks, so handlers never serialize on a single outer mutex.
#[derive(Clone)]
struct AppState {
    /// The in-memory card, ticket, staff and attendance store.
    store: Arc<MemoryStore>,
    /// Supplies the bearer credential presented on every store call.
    provider: StaticCredentialProvider,
    /// Whether confirmation codes go out over SMS or ride back in responses.
    dispatch_mode: DispatchMode,
    /// Per-item timeout for bulk booking dispatch.
    booking_budget: Duration,
}

/// A card's warranty term as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WarrantyTermResponse {
    /// The first day of coverage.
    start_date: time::Date,
    /// The last day of coverage.
    end_date: time::Date,
}

/// A card's AMC term as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AmcTermResponse {
    /// The first service due date.
    start_date: time::Date,
    /// The last covered day, absent for open-ended contracts.
    end_date: Option<time::Date>,
    /// Recurrence unit (`days` or `months`).
    interval_unit: String,
    /// Recurrence step count.
    interval_value: u32,
}

/// A card as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CardResponse {
    /// The card identifier.
    card_id: i64,
    /// The owning customer's identifier.
    customer_id: i64,
    /// The customer's display name.
    customer_name: String,
    /// The customer's contact phone.
    customer_phone: String,
    /// The equipment model.
    model: String,
    /// Card classification code.
    card_type: String,
    /// Region code the card is serviced from.
    region: String,
    /// Street address.
    address: String,
    /// City.
    city: String,
    /// Warranty coverage, if any.
    warranty: Option<WarrantyTermResponse>,
    /// AMC coverage, if any.
    amc: Option<AmcTermResponse>,
}

/// Response for GET `/cards`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CardsResponse {
    /// The matching cards, ordered by id.
    cards: Vec<CardResponse>,
}

/// One projected milestone as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MilestoneResponse {
    /// The zero-based step index within the term's sequence.
    index: u32,
    /// The computed due date.
    date: time::Date,
}

/// Response for GET `/cards/{card_id}/milestones`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MilestonesResponse {
    /// The card the milestones belong to.
    card_id: i64,
    /// Free-service milestones of the warranty term, if any.
    warranty: Vec<MilestoneResponse>,
    /// The projected AMC sequence, if any.
    amc: Vec<MilestoneResponse>,
}

/// Feedback recorded on a completed ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FeedbackResponse {
    /// Rating, 1-5.
    rating: u8,
    /// Free-text comment.
    comment: String,
}

/// A service ticket as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TicketResponse {
    /// The ticket identifier.
    ticket_id: i64,
    /// The card the ticket belongs to.
    card_id: i64,
    /// The owning customer.
    customer_id: i64,
    /// Billable or covered visit (`normal` or `free`).
    kind: String,
    /// Visit reason code.
    visit_type: String,
    /// Who requested the visit.
    requested_by: i64,
    /// The assigned staff member, if any.
    assigned_staff: Option<i64>,
    /// The customer's preferred visit date.
    preferred_date: time::Date,
    /// The scheduled visit date.
    scheduled_date: time::Date,
    /// Lifecycle state.
    status: String,
    /// The milestone covered, as `card#index`.
    milestone: Option<String>,
    /// Work description.
    description: String,
    /// Phone the confirmation code went to, once dispatched.
    otp_phone: Option<String>,
    /// Forward hint for the next visit.
    next_service_date: Option<time::Date>,
    /// Feedback recorded on completion.
    feedback: Option<FeedbackResponse>,
}

/// Response for GET `/tickets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TicketsResponse {
    /// The matching tickets.
    tickets: Vec<TicketResponse>,
}

/// Request body for POST `/tickets/{ticket_id}/confirmation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfirmationApiRequest {
    /// The phone to send the code to. Defaults to the card's customer phone.
    #[serde(default)]
    phone: Option<String>,
}

/// Response for POST `/tickets/{ticket_id}/confirmation`.
#[derive(Debug, Clone, Serialize)]
struct ConfirmationApiResponse {
    /// The ticket after moving to the awaiting-confirmation state.
    ticket: TicketResponse,
    /// The dispatch record; the code is present only in development mode.
    dispatch: ConfirmationDispatch,
}

/// Request body for POST `/bookings/bulk`.
#[derive(Debug, Clone, Deserialize)]
struct BulkBookApiRequest {
    /// The cause ID for this run.
    cause_id: String,
    /// The cause description, shared by every item's audit event.
    cause_description: String,
    /// The items to book.
    #[serde(flatten)]
    body: BulkBookingRequestBody,
}

/// Response for the period report endpoints.
#[derive(Debug, Clone, Serialize)]
struct ReportResponse {
    /// The matching report rows.
    rows: Vec<ReportRow>,
}

/// A staff member as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StaffResponse {
    /// The staff member's identifier.
    staff_id: i64,
    /// Display name.
    name: String,
    /// Contact phone number.
    phone: String,
}

/// Response for the staff listing and search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StaffListResponse {
    /// The matching staff members.
    staff: Vec<StaffResponse>,
}

/// Response for GET `/attendance/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AttendanceCheckResponse {
    /// The staff member checked.
    staff_id: i64,
    /// The assignment date checked against.
    date: time::Date,
    /// `present`, `absent` or `unknown`.
    result: String,
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// Query parameters for GET `/cards`.
#[derive(Debug, Clone, Deserialize)]
struct CardsQuery {
    /// Restrict the listing to one region.
    region: Option<String>,
}

/// Query parameters for GET `/cards/{card_id}/milestones`.
#[derive(Debug, Clone, Deserialize)]
struct MilestonesQuery {
    /// Projection bound for open-ended AMC terms.
    bound: Option<time::Date>,
}

/// Query parameters for GET `/tickets`.
#[derive(Debug, Clone, Deserialize)]
struct TicketsQuery {
    /// The card whose tickets to list.
    card_id: i64,
    /// Restrict the listing to one lifecycle state.
    status: Option<String>,
}

/// Query parameters for the report and export endpoints.
#[derive(Debug, Clone, Deserialize)]
struct ReportQuery {
    /// The reporting period, as `YYYY-MM`.
    period: String,
    /// Restrict the report to one region.
    region: Option<String>,
    /// Done/not-done filter (`all`, `done` or `not_done`).
    status: Option<String>,
}

/// Query parameters for GET `/staff/search`.
#[derive(Debug, Clone, Deserialize)]
struct StaffSearchQuery {
    /// Phone number prefix to match.
    phone: String,
}

/// Query parameters for GET `/attendance/check`.
#[derive(Debug, Clone, Deserialize)]
struct AttendanceQuery {
    /// The staff member to check.
    staff_id: i64,
    /// The assignment date.
    date: time::Date,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::CredentialFailure { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        Self::from(ApiError::from(CoreError::from(err)))
    }
}

/// Resolves the authenticated actor from the `Authorization` header.
fn authenticate(headers: &HeaderMap) -> Result<AuthenticatedActor, HttpError> {
    let token: &str = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            HttpError::from(ApiError::AuthenticationFailed {
                reason: String::from("missing bearer token"),
            })
        })?;
    resolve_actor(token).map_err(|err| HttpError::from(ApiError::from(err)))
}

/// Acquires a store credential, refreshing once if needed.
async fn obtain_credential(state: &AppState) -> Result<BearerCredential, HttpError> {
    acquire(&state.provider)
        .await
        .map_err(|err| HttpError::from(ApiError::from(err)))
}

/// Today's date, the anchor for booking validation and attendance checks.
fn today() -> time::Date {
    time::OffsetDateTime::now_utc().date()
}

/// Maps a status-patch store error, surfacing lifecycle rejections as
/// domain rule violations rather than transient failures.
fn patch_error(err: StoreError) -> HttpError {
    match err {
        StoreError::Rejected(message) => HttpError::from(ApiError::DomainRuleViolation {
            rule: String::from("service_lifecycle"),
            message,
        }),
        other => HttpError::from(other),
    }
}

/// Converts a `Card` to a `CardResponse`.
fn card_to_response(card: &Card) -> CardResponse {
    CardResponse {
        card_id: card.card_id,
        customer_id: card.customer_id,
        customer_name: card.customer_name.clone(),
        customer_phone: card.customer_phone.clone(),
        model: card.model.clone(),
        card_type: card.card_type.as_str().to_string(),
        region: card.region.clone(),
        address: card.address.clone(),
        city: card.city.clone(),
        warranty: card.warranty.as_ref().map(|term| WarrantyTermResponse {
            start_date: term.start_date(),
            end_date: term.end_date(),
        }),
        amc: card.amc.as_ref().map(|term| AmcTermResponse {
            start_date: term.start_date(),
            end_date: term.end_date(),
            interval_unit: term.interval().unit().as_str().to_string(),
            interval_value: term.interval().value(),
        }),
    }
}

/// Converts a `ServiceTicket` to a `TicketResponse`.
fn ticket_to_response(ticket: &ServiceTicket) -> TicketResponse {
    TicketResponse {
        ticket_id: ticket.id,
        card_id: ticket.card_id,
        customer_id: ticket.customer_id,
        kind: ticket.kind.as_str().to_string(),
        visit_type: ticket.visit_type.code().to_string(),
        requested_by: ticket.requested_by,
        assigned_staff: ticket.assigned_staff,
        preferred_date: ticket.preferred_date,
        scheduled_date: ticket.scheduled_date,
        status: ticket.status.as_str().to_string(),
        milestone: ticket.milestone.map(|key| key.to_string()),
        description: ticket.description.clone(),
        otp_phone: ticket.otp_phone.clone(),
        next_service_date: ticket.next_service_date,
        feedback: ticket.feedback.as_ref().map(|feedback| FeedbackResponse {
            rating: feedback.rating(),
            comment: feedback.comment().to_string(),
        }),
    }
}

/// Converts milestones to their API form, dropping the card half of the key.
fn milestones_to_response(milestones: &[Milestone]) -> Vec<MilestoneResponse> {
    milestones
        .iter()
        .map(|m| MilestoneResponse {
            index: m.key.index,
            date: m.date,
        })
        .collect()
}

/// Handler for POST `/cards` endpoint.
///
/// Creates a new card without terms. Admin only.
async fn handle_create_card(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CardCreateRequest>,
) -> Result<Json<CardResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    AuthorizationService::authorize_manage_cards(&actor).map_err(ApiError::from)?;

    info!(
        actor_id = %actor.id,
        customer_id = req.customer_id,
        "Handling create_card request"
    );

    let card_type = req.card_type()?;
    let card = Card {
        card_id: 0,
        customer_id: req.customer_id,
        customer_name: req.customer_name,
        customer_phone: req.customer_phone,
        model: req.model,
        card_type,
        region: req.region,
        address: req.address,
        city: req.city,
        warranty: None,
        amc: None,
    };
    let created: Card = state.store.insert_card(card)?;

    info!(card_id = created.card_id, "Created card");

    Ok(Json(card_to_response(&created)))
}

/// Handler for GET `/cards` endpoint.
///
/// Lists cards, optionally restricted to one region.
async fn handle_list_cards(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<CardsQuery>,
) -> Result<Json<CardsResponse>, HttpError> {
    authenticate(&headers)?;

    let credential: BearerCredential = obtain_credential(&state).await?;
    let cards: Vec<Card> = state
        .store
        .list_cards(&credential, query.region.as_deref())
        .await?;

    Ok(Json(CardsResponse {
        cards: cards.iter().map(card_to_response).collect(),
    }))
}

/// Handler for POST `/cards/{card_id}/warranty_term` endpoint.
///
/// Sets or replaces the card's warranty term. Admin only.
async fn handle_set_warranty_term(
    AxumState(state): AxumState<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<WarrantyTermRequest>,
) -> Result<Json<CardResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    AuthorizationService::authorize_manage_cards(&actor).map_err(ApiError::from)?;

    info!(
        actor_id = %actor.id,
        card_id,
        "Handling set_warranty_term request"
    );

    let term = req.into_term()?;
    let card: Card = state.store.set_warranty(card_id, term)?;

    Ok(Json(card_to_response(&card)))
}

/// Handler for POST `/cards/{card_id}/amc_term` endpoint.
///
/// Sets or replaces the card's AMC term. Admin only.
async fn handle_set_amc_term(
    AxumState(state): AxumState<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<AmcTermRequest>,
) -> Result<Json<CardResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    AuthorizationService::authorize_manage_cards(&actor).map_err(ApiError::from)?;

    info!(
        actor_id = %actor.id,
        card_id,
        "Handling set_amc_term request"
    );

    let term = req.into_term()?;
    let card: Card = state.store.set_amc(card_id, term)?;

    Ok(Json(card_to_response(&card)))
}

/// Handler for GET `/cards/{card_id}/milestones` endpoint.
///
/// Projects the card's warranty and AMC milestone sequences. Open-ended
/// AMC terms require the `bound` query parameter.
async fn handle_get_milestones(
    AxumState(state): AxumState<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
    Query(query): Query<MilestonesQuery>,
) -> Result<Json<MilestonesResponse>, HttpError> {
    authenticate(&headers)?;

    let credential: BearerCredential = obtain_credential(&state).await?;
    let card: Card = state.store.get_card(&credential, card_id).await?;

    let warranty: Vec<Milestone> = match card.warranty.as_ref() {
        Some(term) => project_warranty(term, card.card_id).map_err(ApiError::from)?,
        None => Vec::new(),
    };
    let amc: Vec<Milestone> = match card.amc.as_ref() {
        Some(term) => project_amc(term, card.card_id, query.bound).map_err(ApiError::from)?,
        None => Vec::new(),
    };

    Ok(Json(MilestonesResponse {
        card_id: card.card_id,
        warranty: milestones_to_response(&warranty),
        amc: milestones_to_response(&amc),
    }))
}

/// Handler for GET `/tickets` endpoint.
///
/// Lists one card's tickets, optionally filtered by lifecycle state.
async fn handle_list_tickets(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<TicketsQuery>,
) -> Result<Json<TicketsResponse>, HttpError> {
    authenticate(&headers)?;

    let status: Option<ServiceStatus> = match query.status.as_deref() {
        Some(s) => Some(s.parse().map_err(
            |err: amc_book_domain::DomainError| ApiError::InvalidInput {
                field: String::from("status"),
                message: err.to_string(),
            },
        )?),
        None => None,
    };

    let credential: BearerCredential = obtain_credential(&state).await?;
    let tickets: Vec<ServiceTicket> = state
        .store
        .list_tickets(&credential, query.card_id, status)
        .await?;

    Ok(Json(TicketsResponse {
        tickets: tickets.iter().map(ticket_to_response).collect(),
    }))
}

/// Handler for POST `/tickets/{ticket_id}/status` endpoint.
///
/// Applies a status patch. Force edits are admin only; ordinary lifecycle
/// progress is open to both roles.
async fn handle_patch_status(
    AxumState(state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<StatusPatchRequest>,
) -> Result<Json<TicketResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    if req.force {
        AuthorizationService::authorize_force_status(&actor).map_err(ApiError::from)?;
    } else {
        AuthorizationService::authorize_progress_ticket(&actor).map_err(ApiError::from)?;
    }

    info!(
        actor_id = %actor.id,
        ticket_id,
        status = req.status.as_deref().unwrap_or("-"),
        force = req.force,
        "Handling patch_status request"
    );

    let patch: StatusPatch = req.into_patch()?;
    let credential: BearerCredential = obtain_credential(&state).await?;
    let ticket: ServiceTicket = state
        .store
        .patch_status(&credential, ticket_id, &patch)
        .await
        .map_err(patch_error)?;

    Ok(Json(ticket_to_response(&ticket)))
}

/// Handler for POST `/tickets/{ticket_id}/confirmation` endpoint.
///
/// Moves the ticket to the awaiting-confirmation state and dispatches a
/// confirmation code to the customer.
async fn handle_request_confirmation(
    AxumState(state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<ConfirmationApiRequest>,
) -> Result<Json<ConfirmationApiResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    AuthorizationService::authorize_progress_ticket(&actor).map_err(ApiError::from)?;

    let credential: BearerCredential = obtain_credential(&state).await?;
    let ticket: ServiceTicket = state.store.get_ticket(ticket_id)?;
    let phone: String = match req.phone {
        Some(phone) => phone,
        None => {
            state
                .store
                .get_card(&credential, ticket.card_id)
                .await?
                .customer_phone
        }
    };

    let patch = StatusPatch {
        status: Some(ServiceStatus::AwaitingConfirmation),
        otp_phone: Some(phone.clone()),
        ..StatusPatch::default()
    };
    let updated: ServiceTicket = state
        .store
        .patch_status(&credential, ticket_id, &patch)
        .await
        .map_err(patch_error)?;

    let dispatch: ConfirmationDispatch = dispatch_code(&phone, state.dispatch_mode);

    info!(ticket_id, "Dispatched confirmation code");

    Ok(Json(ConfirmationApiResponse {
        ticket: ticket_to_response(&updated),
        dispatch,
    }))
}

/// Handler for POST `/bookings/bulk` endpoint.
///
/// Runs one bulk booking pass and reports per-item outcomes. Admin only.
async fn handle_bulk_book(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<BulkBookApiRequest>,
) -> Result<Json<BulkBookingResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    AuthorizationService::authorize_bulk_book(&actor).map_err(ApiError::from)?;

    info!(
        actor_id = %actor.id,
        items = req.body.items.len(),
        cause_id = %req.cause_id,
        "Handling bulk_book request"
    );

    let requested_by: i64 = actor.id.parse().map_err(|_| ApiError::InvalidInput {
        field: String::from("authorization"),
        message: String::from("actor id must be numeric for booking"),
    })?;

    let bookings: Vec<BookingRequest> = req
        .body
        .items
        .into_iter()
        .map(|item| item.into_booking(requested_by))
        .collect::<Result<_, ApiError>>()?;

    let cause = Cause::new(req.cause_id, req.cause_description);
    let report = bulk_book(
        state.store.as_ref(),
        &state.provider,
        &actor.to_audit_actor(),
        &cause,
        bookings,
        today(),
        state.booking_budget,
    )
    .await;

    for event in &report.audit_events {
        info!(
            action = %event.action.name,
            card_id = event.card_id,
            "Recorded audit event"
        );
    }

    Ok(Json(BulkBookingResponse::from(&report)))
}

/// Builds the period report shared by the report and export endpoints.
async fn build_report(
    state: &AppState,
    kind: ReportKind,
    query: &ReportQuery,
) -> Result<Vec<ReportRow>, HttpError> {
    let period: PeriodMonth = query.period.parse().map_err(ApiError::from)?;
    let filter: StatusFilter = match query.status.as_deref() {
        Some(s) => StatusFilter::parse(s)?,
        None => StatusFilter::All,
    };

    let credential: BearerCredential = obtain_credential(state).await?;
    let rows: Vec<ReportRow> = period_report(
        state.store.as_ref(),
        state.store.as_ref(),
        &credential,
        kind,
        period,
        query.region.as_deref(),
        filter,
    )
    .await?;
    Ok(rows)
}

/// Handler for GET `/reports/amc` endpoint.
///
/// Returns the AMC period report for one calendar month.
async fn handle_amc_report(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, HttpError> {
    authenticate(&headers)?;
    let rows: Vec<ReportRow> = build_report(&state, ReportKind::Amc, &query).await?;
    Ok(Json(ReportResponse { rows }))
}

/// Handler for GET `/reports/warranty` endpoint.
///
/// Returns the warranty period report for one calendar month.
async fn handle_warranty_report(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, HttpError> {
    authenticate(&headers)?;
    let rows: Vec<ReportRow> = build_report(&state, ReportKind::Warranty, &query).await?;
    Ok(Json(ReportResponse { rows }))
}

/// Renders a period report as a CSV download. Admin only.
async fn export_csv(
    state: &AppState,
    headers: &HeaderMap,
    kind: ReportKind,
    query: &ReportQuery,
) -> Result<Response, HttpError> {
    let actor: AuthenticatedActor = authenticate(headers)?;
    AuthorizationService::authorize_export(&actor).map_err(ApiError::from)?;

    let rows: Vec<ReportRow> = build_report(state, kind, query).await?;
    let csv: String = render_csv(&rows).map_err(|err| {
        error!(error = %err, "CSV rendering failed");
        HttpError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    })?;

    Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}

/// Handler for GET `/export/amc.csv` endpoint.
async fn handle_export_amc(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Result<Response, HttpError> {
    export_csv(&state, &headers, ReportKind::Amc, &query).await
}

/// Handler for GET `/export/warranty.csv` endpoint.
async fn handle_export_warranty(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Result<Response, HttpError> {
    export_csv(&state, &headers, ReportKind::Warranty, &query).await
}

/// Handler for GET `/staff` endpoint.
///
/// Lists all assignable field staff.
async fn handle_list_staff(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<StaffListResponse>, HttpError> {
    authenticate(&headers)?;

    let credential: BearerCredential = obtain_credential(&state).await?;
    let staff: Vec<Staff> = state.store.list_workers(&credential).await?;

    Ok(Json(StaffListResponse {
        staff: staff
            .into_iter()
            .map(|s| StaffResponse {
                staff_id: s.staff_id,
                name: s.name,
                phone: s.phone,
            })
            .collect(),
    }))
}

/// Handler for GET `/staff/search` endpoint.
///
/// Finds staff by phone number prefix.
async fn handle_search_staff(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<StaffSearchQuery>,
) -> Result<Json<StaffListResponse>, HttpError> {
    authenticate(&headers)?;

    let credential: BearerCredential = obtain_credential(&state).await?;
    let staff: Vec<Staff> = state
        .store
        .find_by_phone(&credential, &query.phone)
        .await?;

    Ok(Json(StaffListResponse {
        staff: staff
            .into_iter()
            .map(|s| StaffResponse {
                staff_id: s.staff_id,
                name: s.name,
                phone: s.phone,
            })
            .collect(),
    }))
}

/// Handler for GET `/attendance/check` endpoint.
///
/// Advisory check of a staff member's attendance for an assignment date.
/// Dates other than today always come back `unknown`.
async fn handle_attendance_check(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<AttendanceCheckResponse>, HttpError> {
    authenticate(&headers)?;

    let credential: BearerCredential = obtain_credential(&state).await?;
    let mut session = AttendanceSession::new(today());
    let result = session
        .check(state.store.as_ref(), &credential, query.staff_id, query.date)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(AttendanceCheckResponse {
        staff_id: query.staff_id,
        date: query.date,
        result: result.as_str().to_string(),
    }))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/cards", post(handle_create_card))
        .route("/cards", get(handle_list_cards))
        .route("/cards/{card_id}/warranty_term", post(handle_set_warranty_term))
        .route("/cards/{card_id}/amc_term", post(handle_set_amc_term))
        .route("/cards/{card_id}/milestones", get(handle_get_milestones))
        .route("/tickets", get(handle_list_tickets))
        .route("/tickets/{ticket_id}/status", post(handle_patch_status))
        .route(
            "/tickets/{ticket_id}/confirmation",
            post(handle_request_confirmation),
        )
        .route("/bookings/bulk", post(handle_bulk_book))
        .route("/reports/amc", get(handle_amc_report))
        .route("/reports/warranty", get(handle_warranty_report))
        .route("/export/amc.csv", get(handle_export_amc))
        .route("/export/warranty.csv", get(handle_export_warranty))
        .route("/staff", get(handle_list_staff))
        .route("/staff/search", get(handle_search_staff))
        .route("/attendance/check", get(handle_attendance_check))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing AMC Book Server");

    let dispatch_mode: DispatchMode = if args.dev_codes {
        info!("Confirmation codes will be returned in responses");
        DispatchMode::DevReturn
    } else {
        DispatchMode::Sms
    };

    let app_state: AppState = AppState {
        store: Arc::new(MemoryStore::new(args.store_token.clone())),
        provider: StaticCredentialProvider::new(args.store_token),
        dispatch_mode,
        booking_budget: Duration::from_millis(args.booking_timeout_ms),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use amc_book_domain::AttendanceStatus;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const ADMIN: &str = "admin:1";
    const WORKER: &str = "worker:3";

    /// Helper to create test app state with an in-memory store.
    fn create_test_app_state() -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new(String::from("test-token"))),
            provider: StaticCredentialProvider::new(String::from("test-token")),
            dispatch_mode: DispatchMode::DevReturn,
            booking_budget: Duration::from_secs(5),
        }
    }

    fn future(days: i64) -> time::Date {
        today() + time::Duration::days(days)
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn card_body() -> Value {
        json!({
            "customer_id": 70,
            "customer_name": "R. Iyer",
            "customer_phone": "9000000001",
            "model": "AquaPure 900",
            "card_type": "normal",
            "region": "south",
            "address": "12 Lake Road",
            "city": "Coimbatore"
        })
    }

    async fn create_card(app: &Router) -> i64 {
        let response = app
            .clone()
            .oneshot(request("POST", "/cards", Some(ADMIN), Some(card_body())))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        body_json(response).await["card_id"].as_i64().unwrap()
    }

    async fn set_amc(app: &Router, card_id: i64, start: &str, end: Option<&str>, months: u32) {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/cards/{card_id}/amc_term"),
                Some(ADMIN),
                Some(json!({
                    "start_date": start,
                    "end_date": end,
                    "interval_unit": "months",
                    "interval_value": months
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    fn booking_item(card_id: i64, staff_id: Option<i64>, index: u32) -> Value {
        json!({
            "card_id": card_id,
            "customer_id": 70,
            "kind": "free",
            "visit_type": "MS",
            "staff_id": staff_id,
            "preferred_date": future(10).to_string(),
            "scheduled_date": future(12).to_string(),
            "milestone_index": index,
            "description": "AMC visit"
        })
    }

    fn bulk_body(items: Value) -> Value {
        json!({
            "cause_id": "bulk-1",
            "cause_description": "Monthly AMC run",
            "items": items
        })
    }

    async fn bulk_book_one(app: &Router, card_id: i64, index: u32) -> i64 {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/bookings/bulk",
                Some(ADMIN),
                Some(bulk_body(json!([booking_item(card_id, Some(3), index)]))),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["booked"], 1);
        body["outcomes"][0]["ticket_id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_create_card_as_admin_succeeds() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(request("POST", "/cards", Some(ADMIN), Some(card_body())))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["card_id"], 1);
        assert_eq!(body["customer_name"], "R. Iyer");
        assert_eq!(body["card_type"], "normal");
        assert!(body["warranty"].is_null());
        assert!(body["amc"].is_null());
    }

    #[tokio::test]
    async fn test_create_card_as_worker_is_forbidden() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(request("POST", "/cards", Some(WORKER), Some(card_body())))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
        let error: ErrorResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert!(error.error);
        assert!(error.message.contains("Unauthorized"));
    }

    #[tokio::test]
    async fn test_missing_auth_header_is_unauthorized() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(request("POST", "/cards", None, Some(card_body())))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_card_type_is_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let mut body = card_body();
        body["card_type"] = json!("industrial");
        let response = app
            .oneshot(request("POST", "/cards", Some(ADMIN), Some(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_default_warranty_end_uses_exclusive_start() {
        let app: Router = build_router(create_test_app_state());
        let card_id: i64 = create_card(&app).await;

        let response = app
            .oneshot(request(
                "POST",
                &format!("/cards/{card_id}/warranty_term"),
                Some(ADMIN),
                Some(json!({ "start_date": "2025-03-15" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["warranty"]["start_date"], "2025-03-15");
        assert_eq!(body["warranty"]["end_date"], "2026-03-14");
    }

    #[tokio::test]
    async fn test_amc_milestones_are_projected() {
        let app: Router = build_router(create_test_app_state());
        let card_id: i64 = create_card(&app).await;
        set_amc(&app, card_id, "2025-01-10", Some("2026-01-10"), 4).await;

        let response = app
            .oneshot(request(
                "GET",
                &format!("/cards/{card_id}/milestones"),
                Some(WORKER),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        let dates: Vec<&str> = body["amc"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["date"].as_str().unwrap())
            .collect();
        // The end date is the lapse day and carries no milestone.
        assert_eq!(dates, vec!["2025-01-10", "2025-05-10", "2025-09-10"]);
        assert!(body["warranty"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_ended_amc_requires_bound() {
        let app: Router = build_router(create_test_app_state());
        let card_id: i64 = create_card(&app).await;
        set_amc(&app, card_id, "2025-01-10", None, 4).await;

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/cards/{card_id}/milestones"),
                Some(ADMIN),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

        let response = app
            .oneshot(request(
                "GET",
                &format!("/cards/{card_id}/milestones?bound=2025-09-30"),
                Some(ADMIN),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["amc"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_bulk_book_books_and_skips() {
        let app: Router = build_router(create_test_app_state());
        let card_id: i64 = create_card(&app).await;
        set_amc(&app, card_id, "2025-01-10", Some("2026-01-10"), 4).await;

        let response = app
            .oneshot(request(
                "POST",
                "/bookings/bulk",
                Some(ADMIN),
                Some(bulk_body(json!([
                    booking_item(card_id, Some(3), 0),
                    booking_item(card_id, None, 1),
                ]))),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["booked"], 1);
        assert_eq!(body["skipped"], 1);
        assert_eq!(body["failed"], 0);

        let outcomes = body["outcomes"].as_array().unwrap();
        let booked = outcomes.iter().find(|o| o["outcome"] == "booked").unwrap();
        assert!(booked["ticket_id"].as_i64().unwrap() > 0);
        assert_eq!(booked["milestone"], format!("{card_id}#0"));
        let skipped = outcomes.iter().find(|o| o["outcome"] == "skipped").unwrap();
        assert_eq!(skipped["reason"], "no staff member chosen");
    }

    #[tokio::test]
    async fn test_bulk_book_as_worker_is_forbidden() {
        let app: Router = build_router(create_test_app_state());
        let card_id: i64 = create_card(&app).await;

        let response = app
            .oneshot(request(
                "POST",
                "/bookings/bulk",
                Some(WORKER),
                Some(bulk_body(json!([booking_item(card_id, Some(3), 0)]))),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rebooking_a_covered_milestone_fails_per_item() {
        let app: Router = build_router(create_test_app_state());
        let card_id: i64 = create_card(&app).await;
        bulk_book_one(&app, card_id, 0).await;

        // The rerun reports a per-item failure, not an HTTP error.
        let response = app
            .oneshot(request(
                "POST",
                "/bookings/bulk",
                Some(ADMIN),
                Some(bulk_body(json!([booking_item(card_id, Some(3), 0)]))),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["booked"], 0);
        assert_eq!(body["failed"], 1);
        let reason = body["outcomes"][0]["reason"].as_str().unwrap();
        assert!(reason.contains("already covered"));
    }

    #[tokio::test]
    async fn test_ticket_lifecycle_over_http() {
        let app: Router = build_router(create_test_app_state());
        let card_id: i64 = create_card(&app).await;
        let ticket_id: i64 = bulk_book_one(&app, card_id, 0).await;

        // Worker starts the visit.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/tickets/{ticket_id}/status"),
                Some(WORKER),
                Some(json!({ "status": "in_progress" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        assert_eq!(body_json(response).await["status"], "in_progress");

        // Confirmation code goes to the card's customer phone; development
        // mode returns the code in the response.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/tickets/{ticket_id}/confirmation"),
                Some(WORKER),
                Some(json!({})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ticket"]["status"], "awaiting_confirmation");
        assert_eq!(body["ticket"]["otp_phone"], "9000000001");
        assert_eq!(body["dispatch"]["phone"], "9000000001");
        assert_eq!(body["dispatch"]["code"].as_str().unwrap().len(), 4);

        // Completion records feedback.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/tickets/{ticket_id}/status"),
                Some(WORKER),
                Some(json!({ "status": "completed", "rating": 5, "comment": "Prompt" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "completed");
        assert_eq!(body["feedback"]["rating"], 5);

        // Completed tickets never leave their state.
        let response = app
            .oneshot(request(
                "POST",
                &format!("/tickets/{ticket_id}/status"),
                Some(WORKER),
                Some(json!({ "status": "cancelled" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_force_status_requires_admin() {
        let app: Router = build_router(create_test_app_state());
        let card_id: i64 = create_card(&app).await;
        let ticket_id: i64 = bulk_book_one(&app, card_id, 0).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/tickets/{ticket_id}/status"),
                Some(WORKER),
                Some(json!({ "status": "completed", "force": true })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);

        // Admin force skips the intermediate states.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/tickets/{ticket_id}/status"),
                Some(ADMIN),
                Some(json!({ "status": "completed", "force": true })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        assert_eq!(body_json(response).await["status"], "completed");

        // Even force cannot reopen a completed ticket.
        let response = app
            .oneshot(request(
                "POST",
                &format!("/tickets/{ticket_id}/status"),
                Some(ADMIN),
                Some(json!({ "status": "in_progress", "force": true })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_ticket_listing_filters_by_status() {
        let app: Router = build_router(create_test_app_state());
        let card_id: i64 = create_card(&app).await;
        bulk_book_one(&app, card_id, 0).await;

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/tickets?card_id={card_id}&status=assigned"),
                Some(WORKER),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        assert_eq!(body_json(response).await["tickets"].as_array().unwrap().len(), 1);

        let response = app
            .oneshot(request(
                "GET",
                &format!("/tickets?card_id={card_id}&status=completed"),
                Some(WORKER),
                None,
            ))
            .await
            .unwrap();
        assert!(body_json(response).await["tickets"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_amc_report_and_csv_export() {
        let state: AppState = create_test_app_state();
        let app: Router = build_router(state);
        let card_id: i64 = create_card(&app).await;
        set_amc(&app, card_id, "2025-01-10", Some("2026-01-10"), 4).await;

        let response = app
            .clone()
            .oneshot(request("GET", "/reports/amc?period=2025-05", Some(WORKER), None))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        let rows = body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["status"], "not_done");
        assert_eq!(rows[0]["service_date"], "2025-05-10");

        // A month with no milestones yields no rows.
        let response = app
            .clone()
            .oneshot(request("GET", "/reports/amc?period=2025-03", Some(WORKER), None))
            .await
            .unwrap();
        assert!(body_json(response).await["rows"].as_array().unwrap().is_empty());

        // Export is admin only.
        let response = app
            .clone()
            .oneshot(request("GET", "/export/amc.csv?period=2025-05", Some(WORKER), None))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);

        let response = app
            .oneshot(request("GET", "/export/amc.csv?period=2025-05", Some(ADMIN), None))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv"
        );
        let csv: String = body_string(response).await;
        assert!(csv.starts_with("card_id,customer_name"));
        assert!(csv.contains("2025-05-10"));
    }

    #[tokio::test]
    async fn test_invalid_period_is_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(request("GET", "/reports/amc?period=May-2025", Some(ADMIN), None))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_staff_listing_and_search() {
        let state: AppState = create_test_app_state();
        state
            .store
            .add_staff(Staff {
                staff_id: 3,
                name: String::from("K. Raman"),
                phone: String::from("9876543210"),
            })
            .unwrap();
        let app: Router = build_router(state);

        let response = app
            .clone()
            .oneshot(request("GET", "/staff", Some(WORKER), None))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let listed: StaffListResponse =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(listed.staff.len(), 1);
        assert_eq!(listed.staff[0].name, "K. Raman");

        let response = app
            .clone()
            .oneshot(request("GET", "/staff/search?phone=98765", Some(WORKER), None))
            .await
            .unwrap();
        let found: StaffListResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(found.staff.len(), 1);

        let response = app
            .oneshot(request("GET", "/staff/search?phone=91", Some(WORKER), None))
            .await
            .unwrap();
        let found: StaffListResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert!(found.staff.is_empty());
    }

    #[tokio::test]
    async fn test_attendance_check_endpoint() {
        let state: AppState = create_test_app_state();
        state
            .store
            .mark_attendance(today(), 3, AttendanceStatus::Present)
            .unwrap();
        state
            .store
            .mark_attendance(today(), 4, AttendanceStatus::Absent)
            .unwrap();
        let app: Router = build_router(state);

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/attendance/check?staff_id=3&date={}", today()),
                Some(ADMIN),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        assert_eq!(body_json(response).await["result"], "present");

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/attendance/check?staff_id=4&date={}", today()),
                Some(ADMIN),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["result"], "absent");

        // Any date other than today comes back unknown.
        let response = app
            .oneshot(request(
                "GET",
                &format!("/attendance/check?staff_id=3&date={}", future(1)),
                Some(ADMIN),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["result"], "unknown");
    }
}
