// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::validate_term_dates;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents a reporting period: one calendar month.
///
/// Periods are parsed from the `YYYY-MM` form used by the reporting
/// endpoints and the month selector in the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodMonth {
    /// The calendar year.
    year: i32,
    /// The calendar month (1-12).
    month: u8,
}

impl PeriodMonth {
    /// Creates a new `PeriodMonth`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPeriod` if `month` is not 1-12.
    pub fn new(year: i32, month: u8) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::InvalidPeriod(format!("{year}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// Returns the calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the calendar month (1-12).
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the first day of this period.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateArithmeticOverflow` if the year is outside
    /// the representable date range.
    pub fn first_day(&self) -> Result<time::Date, DomainError> {
        let month: time::Month = time::Month::try_from(self.month).map_err(|_| {
            DomainError::InvalidPeriod(format!("{}-{:02}", self.year, self.month))
        })?;
        time::Date::from_calendar_date(self.year, month, 1).map_err(|_| {
            DomainError::DateArithmeticOverflow {
                operation: format!("computing first day of {self}"),
            }
        })
    }

    /// Returns the last day of this period.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateArithmeticOverflow` if the year is outside
    /// the representable date range.
    pub fn last_day(&self) -> Result<time::Date, DomainError> {
        let month: time::Month = time::Month::try_from(self.month).map_err(|_| {
            DomainError::InvalidPeriod(format!("{}-{:02}", self.year, self.month))
        })?;
        let day: u8 = month.length(self.year);
        time::Date::from_calendar_date(self.year, month, day).map_err(|_| {
            DomainError::DateArithmeticOverflow {
                operation: format!("computing last day of {self}"),
            }
        })
    }

    /// Checks whether a date falls inside this period.
    #[must_use]
    pub fn contains(&self, date: time::Date) -> bool {
        date.year() == self.year && u8::from(date.month()) == self.month
    }
}

impl FromStr for PeriodMonth {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year_str, month_str) = s
            .split_once('-')
            .ok_or_else(|| DomainError::InvalidPeriod(s.to_string()))?;
        let year: i32 = year_str
            .parse()
            .map_err(|_| DomainError::InvalidPeriod(s.to_string()))?;
        let month: u8 = month_str
            .parse()
            .map_err(|_| DomainError::InvalidPeriod(s.to_string()))?;
        Self::new(year, month)
    }
}

impl std::fmt::Display for PeriodMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// The recurrence unit of an AMC service interval.
///
/// Day-based and month-based intervals are interchangeable recurrence
/// units used by different contract classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    /// Step the milestone sequence by whole days.
    Days,
    /// Step the milestone sequence by calendar months, clamping to the
    /// last valid day of shorter months.
    Months,
}

impl IntervalUnit {
    /// Returns the string representation of this unit.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Months => "months",
        }
    }

    /// Parses an interval unit from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIntervalUnit` if the string is not recognized.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "days" => Ok(Self::Days),
            "months" => Ok(Self::Months),
            _ => Err(DomainError::InvalidIntervalUnit(s.to_string())),
        }
    }
}

/// A recurring service interval: a unit and a positive count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInterval {
    /// The recurrence unit.
    unit: IntervalUnit,
    /// The step count (always >= 1).
    value: u32,
}

impl ServiceInterval {
    /// Creates a new `ServiceInterval`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInterval` if `value` is zero.
    pub const fn new(unit: IntervalUnit, value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidInterval { value });
        }
        Ok(Self { unit, value })
    }

    /// Returns the recurrence unit.
    #[must_use]
    pub const fn unit(&self) -> IntervalUnit {
        self.unit
    }

    /// Returns the step count.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }
}

/// Governs how a warranty's default one-year end date treats the start day.
///
/// The admin console historically computed "day before start, plus one
/// year"; whether that was intentional is a domain-owner question, so the
/// convention is an explicit parameter rather than a baked-in off-by-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartConvention {
    /// Coverage includes the start day: end = start + 1 year.
    InclusiveStart,
    /// Coverage starts the day after: end = (start - 1 day) + 1 year.
    ExclusiveStart,
}

/// A fixed one-year warranty term on a card.
///
/// Warranty coverage is single-shot: it carries no operator-configurable
/// recurrence. It does yield three derived free-service milestones at
/// 3, 6 and 9 months after the start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyTerm {
    /// The first day of coverage.
    start_date: time::Date,
    /// The last day of coverage.
    end_date: time::Date,
}

impl WarrantyTerm {
    /// Month offsets from the warranty start at which free services fall due.
    pub const FREE_SERVICE_OFFSETS_MONTHS: [u32; 3] = [3, 6, 9];

    /// Creates a new `WarrantyTerm` with explicit dates.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TermEndBeforeStart` if `end_date` precedes `start_date`.
    pub fn new(start_date: time::Date, end_date: time::Date) -> Result<Self, DomainError> {
        validate_term_dates(start_date, end_date)?;
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Creates a `WarrantyTerm` with the default one-year end date.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateArithmeticOverflow` if the end date is not
    /// representable.
    pub fn with_default_end(
        start_date: time::Date,
        convention: StartConvention,
    ) -> Result<Self, DomainError> {
        let anchor: time::Date = match convention {
            StartConvention::InclusiveStart => start_date,
            StartConvention::ExclusiveStart => start_date
                .previous_day()
                .ok_or_else(|| DomainError::DateArithmeticOverflow {
                    operation: format!("computing day before warranty start {start_date}"),
                })?,
        };
        let end_date: time::Date = crate::milestone::add_months_clamped(anchor, 12)?;
        Self::new(start_date, end_date)
    }

    /// Returns the first day of coverage.
    #[must_use]
    pub const fn start_date(&self) -> time::Date {
        self.start_date
    }

    /// Returns the last day of coverage.
    #[must_use]
    pub const fn end_date(&self) -> time::Date {
        self.end_date
    }
}

/// A recurring annual-maintenance-contract term on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmcTerm {
    /// The first service due date (the `k = 0` milestone).
    start_date: time::Date,
    /// The last day covered by the contract. `None` for open-ended terms.
    end_date: Option<time::Date>,
    /// The recurrence interval.
    interval: ServiceInterval,
}

impl AmcTerm {
    /// Creates a new `AmcTerm`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TermEndBeforeStart` if an end date precedes the start.
    pub fn new(
        start_date: time::Date,
        end_date: Option<time::Date>,
        interval: ServiceInterval,
    ) -> Result<Self, DomainError> {
        if let Some(end) = end_date {
            validate_term_dates(start_date, end)?;
        }
        Ok(Self {
            start_date,
            end_date,
            interval,
        })
    }

    /// Returns the first service due date.
    #[must_use]
    pub const fn start_date(&self) -> time::Date {
        self.start_date
    }

    /// Returns the contract end date, if bounded.
    #[must_use]
    pub const fn end_date(&self) -> Option<time::Date> {
        self.end_date
    }

    /// Returns the recurrence interval.
    #[must_use]
    pub const fn interval(&self) -> ServiceInterval {
        self.interval
    }
}

/// Card classification.
///
/// "Other machine" cards are customer equipment serviced ad hoc; they are
/// excluded from warranty milestone reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    /// A normally registered machine.
    Normal,
    /// Equipment not sold through the business ("other machine").
    OtherMachine,
}

impl CardType {
    /// Returns the string representation used by persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::OtherMachine => "om",
        }
    }

    /// Parses a card type from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCardType` if the string is not recognized.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "normal" => Ok(Self::Normal),
            "om" => Ok(Self::OtherMachine),
            _ => Err(DomainError::InvalidCardType(s.to_string())),
        }
    }
}

/// Whether a service visit is billable or covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// A billable visit.
    Normal,
    /// A free visit covered by warranty or AMC.
    Free,
}

impl ServiceKind {
    /// Returns the string representation of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Free => "free",
        }
    }

    /// Parses a service kind from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidServiceKind` if the string is not recognized.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "normal" => Ok(Self::Normal),
            "free" => Ok(Self::Free),
            _ => Err(DomainError::InvalidServiceKind(s.to_string())),
        }
    }
}

/// The enumerated reason code for a service visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitType {
    /// Initial installation of equipment.
    Installation,
    /// A customer-raised complaint.
    Complaint,
    /// A mandatory scheduled service (warranty or AMC milestone).
    MandatoryService,
    /// A contract service visit.
    ContractService,
    /// A courtesy call.
    CourtesyCall,
}

impl VisitType {
    /// Returns the short code used on the wire and in exports.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Installation => "I",
            Self::Complaint => "C",
            Self::MandatoryService => "MS",
            Self::ContractService => "CS",
            Self::CourtesyCall => "CC",
        }
    }

    /// Parses a visit type from its short code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidVisitType` if the code is not recognized.
    pub fn parse(code: &str) -> Result<Self, DomainError> {
        match code {
            "I" => Ok(Self::Installation),
            "C" => Ok(Self::Complaint),
            "MS" => Ok(Self::MandatoryService),
            "CS" => Ok(Self::ContractService),
            "CC" => Ok(Self::CourtesyCall),
            _ => Err(DomainError::InvalidVisitType(code.to_string())),
        }
    }
}

/// The stable synthetic identity of a projected milestone.
///
/// Milestones are derived, never persisted; a ticket references the one it
/// covers by `(card_id, index)` rather than by date proximity, so editing
/// the term dates cannot silently re-bind existing tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MilestoneKey {
    /// The card the milestone belongs to.
    pub card_id: i64,
    /// The zero-based step index within the projected sequence.
    pub index: u32,
}

impl MilestoneKey {
    /// Creates a new `MilestoneKey`.
    #[must_use]
    pub const fn new(card_id: i64, index: u32) -> Self {
        Self { card_id, index }
    }
}

impl std::fmt::Display for MilestoneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.card_id, self.index)
    }
}

/// A projected service due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// The stable synthetic key.
    pub key: MilestoneKey,
    /// The computed due date.
    pub date: time::Date,
}

impl Milestone {
    /// Creates a new `Milestone`.
    #[must_use]
    pub const fn new(key: MilestoneKey, date: time::Date) -> Self {
        Self { key, date }
    }
}

/// Customer feedback recorded when a service completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// The rating (1-5).
    rating: u8,
    /// Free-text comments.
    comment: String,
}

impl Feedback {
    /// Creates new `Feedback`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRating` if the rating is outside 1-5.
    pub fn new(rating: u8, comment: String) -> Result<Self, DomainError> {
        if !(1..=5).contains(&rating) {
            return Err(DomainError::InvalidRating { rating });
        }
        Ok(Self { rating, comment })
    }

    /// Returns the rating.
    #[must_use]
    pub const fn rating(&self) -> u8 {
        self.rating
    }

    /// Returns the comment text.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }
}

/// Same-day presence record for a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Staff member marked present.
    Present,
    /// Staff member marked absent.
    Absent,
}

impl AttendanceStatus {
    /// Returns the string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }

    /// Parses an attendance status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAttendanceStatus` if the string is not recognized.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            _ => Err(DomainError::InvalidAttendanceStatus(s.to_string())),
        }
    }
}

/// A staff member visible to the assignment workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// The staff member's identifier.
    pub staff_id: i64,
    /// Display name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
}

/// A customer service contract ("card"): one customer, one piece of
/// equipment, zero or one warranty term, zero or one AMC term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// The card identifier.
    pub card_id: i64,
    /// The owning customer's identifier.
    pub customer_id: i64,
    /// The customer's display name.
    pub customer_name: String,
    /// The customer's contact phone.
    pub customer_phone: String,
    /// The equipment model.
    pub model: String,
    /// Card classification.
    pub card_type: CardType,
    /// Region code the card is serviced from.
    pub region: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Warranty coverage, if any.
    pub warranty: Option<WarrantyTerm>,
    /// AMC coverage, if any.
    pub amc: Option<AmcTerm>,
}

impl Card {
    /// Returns true when the card has neither a warranty nor an AMC term.
    ///
    /// Such cards yield empty period views and are excluded from
    /// "due this period" listings.
    #[must_use]
    pub const fn has_no_term(&self) -> bool {
        self.warranty.is_none() && self.amc.is_none()
    }
}
