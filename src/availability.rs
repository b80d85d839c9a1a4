// Availability checker: decides whether a listing is free for a date range.
// The store runs the overlap check and the write as one step, so two
// conflicting requests cannot both be accepted, whichever checker they use.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::error::{BookingError, BookingResult};
use crate::models::{
    Booking, BookingId, BookingRequest, BookingStatus, ListingId, StayRange, UserId,
};
use crate::store::BookingStore;

// Status given to a booking that passes the availability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPolicy {
    // CONFIRMED immediately, blocks the range right away
    AutoConfirm,
    // PENDING until `confirm` succeeds; pending bookings block nothing
    RequireConfirmation,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        BookingPolicy::AutoConfirm
    }
}

pub fn find_conflict<'a>(existing: &'a [Booking], stay: &StayRange) -> Option<&'a Booking> {
    existing
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed)
        .find(|b| b.stay().overlaps(stay))
}

pub struct AvailabilityChecker<S: BookingStore> {
    store: Arc<S>,
    policy: BookingPolicy,
}

impl<S: BookingStore> AvailabilityChecker<S> {
    pub fn new(store: Arc<S>, policy: BookingPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> BookingPolicy {
        self.policy
    }

    // Read-only; the answer may be stale by the time a caller acts on it.
    // `reserve` re-checks atomically in the store.
    #[instrument(skip(self))]
    pub async fn check_availability(
        &self,
        listing: ListingId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> BookingResult<()> {
        let stay = StayRange::new(check_in, check_out)?;
        self.store.get_listing(listing).await?;

        let existing = self.store.bookings_for_listing(listing).await;
        if let Some(conflict) = find_conflict(&existing, &stay) {
            debug!(conflicting_booking = conflict.id, "range already taken");
            return Err(BookingError::Conflict(format!(
                "listing {} is already booked from {} to {}",
                listing, conflict.check_in, conflict.check_out
            )));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(listing = request.listing, user = request.user))]
    pub async fn reserve(&self, request: BookingRequest) -> BookingResult<Booking> {
        StayRange::new(request.check_in, request.check_out)?;

        let status = match self.policy {
            BookingPolicy::AutoConfirm => BookingStatus::Confirmed,
            BookingPolicy::RequireConfirmation => BookingStatus::Pending,
        };
        let booking = self.store.insert_booking(&request, status).await.map_err(|e| {
            debug!(error = %e, "booking rejected");
            e
        })?;

        info!(booking = booking.id, status = ?booking.status, "booking accepted");
        Ok(booking)
    }

    // PENDING -> CONFIRMED; the store re-checks the range as part of the update
    #[instrument(skip(self))]
    pub async fn confirm(&self, booking_id: BookingId) -> BookingResult<Booking> {
        let booking = self
            .store
            .set_booking_status(booking_id, BookingStatus::Confirmed)
            .await?;

        info!(booking = booking.id, "booking confirmed");
        Ok(booking)
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, actor: UserId, booking_id: BookingId) -> BookingResult<Booking> {
        let booking = self.store.get_booking(booking_id).await?;
        let listing = self.store.get_listing(booking.listing).await?;
        if actor != booking.user && actor != listing.host {
            warn!(actor, "cancel attempted by unrelated user");
            return Err(BookingError::Forbidden(format!(
                "user {} may not cancel booking {}",
                actor, booking_id
            )));
        }

        let booking = self
            .store
            .set_booking_status(booking_id, BookingStatus::Cancelled)
            .await?;

        info!(booking = booking.id, "booking cancelled");
        Ok(booking)
    }
}
