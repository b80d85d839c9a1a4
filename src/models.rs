// Marketplace records: users, listings, bookings, payments and reviews

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, BookingResult};

pub type UserId = u64;
pub type ListingId = u64;
pub type BookingId = u64;
pub type PaymentId = u64;
pub type ReviewId = u64;

// Money columns hold at most 8 digits, 2 of them after the decimal point
pub const MONEY_SCALE: u32 = 2;
pub const MONEY_DIGITS: u32 = 8;

pub fn validate_money(field: &str, value: Decimal) -> BookingResult<()> {
    if value <= Decimal::ZERO {
        return Err(BookingError::Validation(format!(
            "{} must be positive, got {}",
            field, value
        )));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(BookingError::Validation(format!(
            "{} allows at most {} decimal places, got {}",
            field, MONEY_SCALE, value
        )));
    }
    let limit = Decimal::from(10i64.pow(MONEY_DIGITS - MONEY_SCALE));
    if value >= limit {
        return Err(BookingError::Validation(format!(
            "{} must be below {}, got {}",
            field, limit, value
        )));
    }
    Ok(())
}

// Two-decimal rendering used on the gateway wire, e.g. "85.00"
pub fn format_money(value: Decimal) -> String {
    let mut value = value.round_dp(MONEY_SCALE);
    value.rescale(MONEY_SCALE);
    value.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub price_per_night: Decimal,
    pub location: String,
    pub host: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price_per_night: Decimal,
    pub location: String,
}

impl NewListing {
    pub fn validate(&self) -> BookingResult<()> {
        if self.title.trim().is_empty() {
            return Err(BookingError::Validation("title must not be empty".into()));
        }
        validate_money("price per night", self.price_per_night)
    }
}

// Partial update applied by the listing's host; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_per_night: Option<Decimal>,
    pub location: Option<String>,
}

impl Listing {
    pub fn apply(&mut self, patch: ListingPatch) -> BookingResult<()> {
        let mut next = NewListing {
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            description: patch.description.unwrap_or_else(|| self.description.clone()),
            price_per_night: patch.price_per_night.unwrap_or(self.price_per_night),
            location: patch.location.unwrap_or_else(|| self.location.clone()),
        };
        next.validate()?;

        self.title = std::mem::take(&mut next.title);
        self.description = std::mem::take(&mut next.description);
        self.price_per_night = next.price_per_night;
        self.location = std::mem::take(&mut next.location);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub listing: ListingId,
    pub user: UserId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn stay(&self) -> StayRange {
        StayRange {
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub listing: ListingId,
    pub user: UserId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

// Half-open [check_in, check_out) range of nights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> BookingResult<Self> {
        if check_out <= check_in {
            return Err(BookingError::Validation(format!(
                "check-out before check-in: {} is not after {}",
                check_out, check_in
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    // Ranges that merely touch (one ends on the day the other starts) do not overlap
    pub fn overlaps(&self, other: &StayRange) -> bool {
        other.check_in < self.check_out && other.check_out > self.check_in
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub booking: BookingId,
    pub user: UserId,
    pub amount: Decimal,
    pub currency: String,
    pub tx_ref: String,
    pub status: PaymentStatus,
    // Set once the gateway has handed out a hosted checkout page for `tx_ref`
    pub checkout_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub booking: BookingId,
    pub user: UserId,
    pub amount: Decimal,
    pub currency: String,
    pub tx_ref: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub listing: ListingId,
    pub user: UserId,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub listing: ListingId,
    pub user: UserId,
    pub rating: u8,
    pub comment: Option<String>,
}
