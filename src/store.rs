// Persistence collaborator: the records the core reads and writes, with the
// uniqueness and check constraints of the marketplace schema.

use std::{
    collections::HashSet,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use parking_lot::Mutex;
use tracing::debug;

use crate::availability::find_conflict;
use crate::error::{BookingError, BookingResult};
use crate::models::{
    Booking, BookingId, BookingRequest, BookingStatus, Listing, ListingId, NewListing, NewPayment,
    NewReview, NewUser, Payment, PaymentId, PaymentStatus, Review, StayRange, User, UserId,
};

#[async_trait]
pub trait BookingStore: Send + Sync + 'static {
    async fn insert_user(&self, user: NewUser) -> BookingResult<User>;
    async fn get_user(&self, id: UserId) -> BookingResult<User>;
    // Lowest-id user, if any exist
    async fn first_user(&self) -> Option<User>;

    async fn insert_listing(&self, host: UserId, listing: NewListing) -> BookingResult<Listing>;
    async fn get_listing(&self, id: ListingId) -> BookingResult<Listing>;
    // Newest first
    async fn list_listings(&self) -> Vec<Listing>;
    async fn replace_listing(&self, listing: Listing) -> BookingResult<()>;
    // Cascades to the listing's bookings, their payments, and its reviews
    async fn remove_listing(&self, id: ListingId) -> BookingResult<Listing>;

    // Rejects an inverted range, a duplicate (listing, user, check_in, check_out),
    // and a CONFIRMED booking overlapping another CONFIRMED one. The overlap
    // check and the insert are one atomic step.
    async fn insert_booking(
        &self,
        request: &BookingRequest,
        status: BookingStatus,
    ) -> BookingResult<Booking>;
    async fn get_booking(&self, id: BookingId) -> BookingResult<Booking>;
    async fn bookings_for_listing(&self, listing: ListingId) -> Vec<Booking>;
    // CANCELLED is final. Moving to CONFIRMED re-runs the overlap check atomically.
    async fn set_booking_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> BookingResult<Booking>;

    async fn insert_payment(&self, payment: NewPayment) -> BookingResult<Payment>;
    async fn get_payment_by_tx_ref(&self, tx_ref: &str) -> BookingResult<Payment>;
    async fn payment_for_booking(&self, booking: BookingId) -> Option<Payment>;
    // Gives a PENDING payment a new current tx_ref. Earlier references keep
    // resolving to the same payment.
    async fn reissue_tx_ref(&self, id: PaymentId, tx_ref: String) -> BookingResult<Payment>;
    // Remembers the hosted checkout page issued for the payment's current tx_ref
    async fn record_checkout(
        &self,
        id: PaymentId,
        tx_ref: &str,
        checkout_url: String,
    ) -> BookingResult<Payment>;
    // Compare-and-swap on the status; false when it was no longer `from`
    async fn transition_payment(
        &self,
        tx_ref: &str,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> BookingResult<bool>;

    async fn insert_review(&self, review: NewReview) -> BookingResult<Review>;
    async fn reviews_for_listing(&self, listing: ListingId) -> Vec<Review>;
}

type BookingKey = (ListingId, UserId, NaiveDate, NaiveDate);

#[derive(Default)]
struct Sequence(AtomicU64);

impl Sequence {
    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

// Concurrent in-memory backend. Each table is a DashMap; multi-column unique
// constraints are guarded by parking_lot mutexes.
#[derive(Default)]
pub struct InMemoryStore {
    users: DashMap<UserId, User>,
    listings: DashMap<ListingId, Listing>,
    bookings: DashMap<BookingId, Booking>,
    payments: DashMap<PaymentId, Payment>,
    reviews: DashMap<u64, Review>,

    usernames: DashMap<String, UserId>,
    // Every booking write happens while this is held
    booking_keys: Mutex<HashSet<BookingKey>>,
    review_keys: Mutex<HashSet<(ListingId, UserId)>>,
    payments_by_tx_ref: DashMap<String, PaymentId>,
    payments_by_booking: DashMap<BookingId, PaymentId>,

    user_seq: Sequence,
    listing_seq: Sequence,
    booking_seq: Sequence,
    payment_seq: Sequence,
    review_seq: Sequence,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn payment_id_for(&self, tx_ref: &str) -> BookingResult<PaymentId> {
        self.payments_by_tx_ref
            .get(tx_ref)
            .map(|id| *id)
            .ok_or_else(|| BookingError::NotFound(format!("payment with tx_ref {}", tx_ref)))
    }

    // Caller must hold `booking_keys`
    fn confirmed_conflict(
        &self,
        listing: ListingId,
        stay: &StayRange,
        skip: Option<BookingId>,
    ) -> BookingResult<()> {
        let others: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.listing == listing && Some(b.id) != skip)
            .map(|b| b.value().clone())
            .collect();

        match find_conflict(&others, stay) {
            Some(conflict) => Err(BookingError::Conflict(format!(
                "listing {} is already booked from {} to {}",
                listing, conflict.check_in, conflict.check_out
            ))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn insert_user(&self, user: NewUser) -> BookingResult<User> {
        let id = self.user_seq.next();
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => {
                return Err(BookingError::Conflict(format!(
                    "username {} already taken",
                    user.username
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        let user = User {
            id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> BookingResult<User> {
        self.users
            .get(&id)
            .map(|u| u.clone())
            .ok_or_else(|| BookingError::NotFound(format!("user {}", id)))
    }

    async fn first_user(&self) -> Option<User> {
        self.users
            .iter()
            .min_by_key(|u| u.id)
            .map(|u| u.value().clone())
    }

    async fn insert_listing(&self, host: UserId, listing: NewListing) -> BookingResult<Listing> {
        listing.validate()?;
        if !self.users.contains_key(&host) {
            return Err(BookingError::NotFound(format!("host {}", host)));
        }
        let listing = Listing {
            id: self.listing_seq.next(),
            title: listing.title,
            description: listing.description,
            price_per_night: listing.price_per_night,
            location: listing.location,
            host,
            created_at: Utc::now(),
        };
        self.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn get_listing(&self, id: ListingId) -> BookingResult<Listing> {
        self.listings
            .get(&id)
            .map(|l| l.clone())
            .ok_or_else(|| BookingError::NotFound(format!("listing {}", id)))
    }

    async fn list_listings(&self) -> Vec<Listing> {
        let mut listings: Vec<Listing> = self.listings.iter().map(|l| l.value().clone()).collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        listings
    }

    async fn replace_listing(&self, listing: Listing) -> BookingResult<()> {
        match self.listings.get_mut(&listing.id) {
            Some(mut slot) => {
                *slot = listing;
                Ok(())
            }
            None => Err(BookingError::NotFound(format!("listing {}", listing.id))),
        }
    }

    async fn remove_listing(&self, id: ListingId) -> BookingResult<Listing> {
        let (_, listing) = self
            .listings
            .remove(&id)
            .ok_or_else(|| BookingError::NotFound(format!("listing {}", id)))?;

        let booking_ids: Vec<BookingId> = self
            .bookings
            .iter()
            .filter(|b| b.listing == id)
            .map(|b| b.id)
            .collect();

        for booking_id in booking_ids {
            if let Some((_, booking)) = self.bookings.remove(&booking_id) {
                self.booking_keys.lock().remove(&(
                    booking.listing,
                    booking.user,
                    booking.check_in,
                    booking.check_out,
                ));
            }
            if let Some((_, payment_id)) = self.payments_by_booking.remove(&booking_id) {
                self.payments.remove(&payment_id);
                // superseded references point at the payment too
                self.payments_by_tx_ref.retain(|_, id| *id != payment_id);
            }
        }

        self.reviews.retain(|_, r| r.listing != id);
        self.review_keys.lock().retain(|(listing, _)| *listing != id);

        debug!(listing = id, "removed listing and dependent records");
        Ok(listing)
    }

    async fn insert_booking(
        &self,
        request: &BookingRequest,
        status: BookingStatus,
    ) -> BookingResult<Booking> {
        if !self.listings.contains_key(&request.listing) {
            return Err(BookingError::NotFound(format!("listing {}", request.listing)));
        }
        if !self.users.contains_key(&request.user) {
            return Err(BookingError::NotFound(format!("user {}", request.user)));
        }

        let stay = StayRange::new(request.check_in, request.check_out)?;
        let key = (
            request.listing,
            request.user,
            request.check_in,
            request.check_out,
        );
        let mut keys = self.booking_keys.lock();
        if keys.contains(&key) {
            return Err(BookingError::Conflict(format!(
                "user {} already holds a booking for listing {} from {} to {}",
                request.user, request.listing, request.check_in, request.check_out
            )));
        }
        if status == BookingStatus::Confirmed {
            self.confirmed_conflict(request.listing, &stay, None)?;
        }
        keys.insert(key);

        let booking = Booking {
            id: self.booking_seq.next(),
            listing: request.listing,
            user: request.user,
            check_in: request.check_in,
            check_out: request.check_out,
            status,
            created_at: Utc::now(),
        };
        self.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: BookingId) -> BookingResult<Booking> {
        self.bookings
            .get(&id)
            .map(|b| b.clone())
            .ok_or_else(|| BookingError::NotFound(format!("booking {}", id)))
    }

    async fn bookings_for_listing(&self, listing: ListingId) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.listing == listing)
            .map(|b| b.value().clone())
            .collect();
        bookings.sort_by_key(|b| (b.check_in, b.id));
        bookings
    }

    async fn set_booking_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> BookingResult<Booking> {
        let _keys = self.booking_keys.lock();
        let current = self
            .bookings
            .get(&id)
            .map(|b| b.clone())
            .ok_or_else(|| BookingError::NotFound(format!("booking {}", id)))?;

        if current.status == status {
            return Ok(current);
        }
        if current.status == BookingStatus::Cancelled {
            return Err(BookingError::Validation(format!("booking {} is cancelled", id)));
        }
        if status == BookingStatus::Confirmed {
            self.confirmed_conflict(current.listing, &current.stay(), Some(id))?;
        }

        let mut booking = self
            .bookings
            .get_mut(&id)
            .ok_or_else(|| BookingError::NotFound(format!("booking {}", id)))?;
        booking.status = status;
        Ok(booking.clone())
    }

    async fn insert_payment(&self, payment: NewPayment) -> BookingResult<Payment> {
        if !self.bookings.contains_key(&payment.booking) {
            return Err(BookingError::NotFound(format!("booking {}", payment.booking)));
        }

        let id = self.payment_seq.next();

        // Claim the one-to-one booking slot first, then the tx_ref, rolling back on failure.
        match self.payments_by_booking.entry(payment.booking) {
            Entry::Occupied(_) => {
                return Err(BookingError::Conflict(format!(
                    "booking {} already has a payment",
                    payment.booking
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        match self.payments_by_tx_ref.entry(payment.tx_ref.clone()) {
            Entry::Occupied(_) => {
                self.payments_by_booking.remove(&payment.booking);
                return Err(BookingError::Conflict(format!(
                    "tx_ref {} already in use",
                    payment.tx_ref
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let payment = Payment {
            id,
            booking: payment.booking,
            user: payment.user,
            amount: payment.amount,
            currency: payment.currency,
            tx_ref: payment.tx_ref,
            status: PaymentStatus::Pending,
            checkout_url: None,
            created_at: Utc::now(),
        };
        self.payments.insert(id, payment.clone());
        Ok(payment)
    }

    async fn get_payment_by_tx_ref(&self, tx_ref: &str) -> BookingResult<Payment> {
        let id = self.payment_id_for(tx_ref)?;
        self.payments
            .get(&id)
            .map(|p| p.clone())
            .ok_or_else(|| BookingError::NotFound(format!("payment with tx_ref {}", tx_ref)))
    }

    async fn payment_for_booking(&self, booking: BookingId) -> Option<Payment> {
        let id = *self.payments_by_booking.get(&booking)?;
        self.payments.get(&id).map(|p| p.clone())
    }

    async fn reissue_tx_ref(&self, id: PaymentId, tx_ref: String) -> BookingResult<Payment> {
        match self.payments_by_tx_ref.entry(tx_ref.clone()) {
            Entry::Occupied(_) => {
                return Err(BookingError::Conflict(format!(
                    "tx_ref {} already in use",
                    tx_ref
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let mut payment = match self.payments.get_mut(&id) {
            Some(payment) if payment.status == PaymentStatus::Pending => payment,
            Some(payment) => {
                let status = payment.status;
                drop(payment);
                self.payments_by_tx_ref.remove(&tx_ref);
                return Err(BookingError::Conflict(format!(
                    "payment {} is already settled as {:?}",
                    id, status
                )));
            }
            None => {
                self.payments_by_tx_ref.remove(&tx_ref);
                return Err(BookingError::NotFound(format!("payment {}", id)));
            }
        };

        debug!(payment = id, previous = %payment.tx_ref, current = %tx_ref, "tx_ref reissued");
        payment.tx_ref = tx_ref;
        payment.checkout_url = None;
        Ok(payment.clone())
    }

    async fn record_checkout(
        &self,
        id: PaymentId,
        tx_ref: &str,
        checkout_url: String,
    ) -> BookingResult<Payment> {
        let mut payment = self
            .payments
            .get_mut(&id)
            .ok_or_else(|| BookingError::NotFound(format!("payment {}", id)))?;

        // a URL for a superseded reference stays payable but is not the current session
        if payment.status == PaymentStatus::Pending && payment.tx_ref == tx_ref {
            payment.checkout_url = Some(checkout_url);
        }
        Ok(payment.clone())
    }

    async fn transition_payment(
        &self,
        tx_ref: &str,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> BookingResult<bool> {
        let id = self.payment_id_for(tx_ref)?;
        let mut payment = self
            .payments
            .get_mut(&id)
            .ok_or_else(|| BookingError::NotFound(format!("payment with tx_ref {}", tx_ref)))?;

        if payment.status != from {
            return Ok(false);
        }
        payment.status = to;
        Ok(true)
    }

    async fn insert_review(&self, review: NewReview) -> BookingResult<Review> {
        if !self.listings.contains_key(&review.listing) {
            return Err(BookingError::NotFound(format!("listing {}", review.listing)));
        }
        if !self.review_keys.lock().insert((review.listing, review.user)) {
            return Err(BookingError::Conflict(format!(
                "user {} already reviewed listing {}",
                review.user, review.listing
            )));
        }

        let review = Review {
            id: self.review_seq.next(),
            listing: review.listing,
            user: review.user,
            rating: review.rating,
            comment: review.comment,
            created_at: Utc::now(),
        };
        self.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn reviews_for_listing(&self, listing: ListingId) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .reviews
            .iter()
            .filter(|r| r.listing == listing)
            .map(|r| r.value().clone())
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        reviews
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::future::join_all;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    pub(crate) fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    pub(crate) async fn store_with_listing() -> (InMemoryStore, User, Listing) {
        let store = InMemoryStore::new();
        let host = store
            .insert_user(NewUser {
                username: "host1".into(),
                email: "host1@example.com".into(),
                first_name: "Abebe".into(),
                last_name: "Kebede".into(),
            })
            .await
            .unwrap();
        let listing = store
            .insert_listing(
                host.id,
                NewListing {
                    title: "Entoto view apartment".into(),
                    description: "Two bedrooms".into(),
                    price_per_night: dec!(85.00),
                    location: "Addis Ababa".into(),
                },
            )
            .await
            .unwrap();
        (store, host, listing)
    }

    pub(crate) async fn guest(store: &InMemoryStore, name: &str) -> User {
        store
            .insert_user(NewUser {
                username: name.into(),
                email: format!("{}@example.com", name),
                first_name: name.into(),
                last_name: "Guest".into(),
            })
            .await
            .unwrap()
    }

    fn request(listing: ListingId, user: UserId, from: u32, to: u32) -> BookingRequest {
        BookingRequest {
            listing,
            user,
            check_in: date(1, from),
            check_out: date(1, to),
        }
    }

    #[tokio::test]
    async fn test_booking_unique_per_user_and_range() {
        let (store, _host, listing) = store_with_listing().await;
        let guest = guest(&store, "guest").await;

        let first = store
            .insert_booking(&request(listing.id, guest.id, 10, 15), BookingStatus::Pending)
            .await;
        assert!(first.is_ok());

        let dup = store
            .insert_booking(&request(listing.id, guest.id, 10, 15), BookingStatus::Pending)
            .await;
        assert!(matches!(dup, Err(BookingError::Conflict(_))));

        let inverted = store
            .insert_booking(&request(listing.id, guest.id, 15, 10), BookingStatus::Pending)
            .await;
        assert!(matches!(inverted, Err(BookingError::Validation(_))));
    }

    #[tokio::test]
    async fn test_payment_constraints_and_transition() {
        let (store, _host, listing) = store_with_listing().await;
        let guest = guest(&store, "guest").await;
        let booking = store
            .insert_booking(&request(listing.id, guest.id, 1, 3), BookingStatus::Confirmed)
            .await
            .unwrap();

        let payment = store
            .insert_payment(NewPayment {
                booking: booking.id,
                user: guest.id,
                amount: dec!(85.00),
                currency: "ETB".into(),
                tx_ref: "tx-a".into(),
            })
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);

        let second = store
            .insert_payment(NewPayment {
                booking: booking.id,
                user: guest.id,
                amount: dec!(85.00),
                currency: "ETB".into(),
                tx_ref: "tx-b".into(),
            })
            .await;
        assert!(matches!(second, Err(BookingError::Conflict(_))));
        // rolled back: tx-b was never claimed
        assert!(store.get_payment_by_tx_ref("tx-b").await.is_err());

        let recorded = store
            .record_checkout(payment.id, "tx-a", "https://checkout/tx-a".into())
            .await
            .unwrap();
        assert_eq!(recorded.checkout_url.as_deref(), Some("https://checkout/tx-a"));

        let reissued = store.reissue_tx_ref(payment.id, "tx-c".into()).await.unwrap();
        assert_eq!(reissued.tx_ref, "tx-c");
        assert_eq!(reissued.checkout_url, None);
        // the earlier reference still leads to the same payment
        assert_eq!(store.get_payment_by_tx_ref("tx-a").await.unwrap().id, payment.id);

        // a late URL for the superseded reference does not replace the current session
        let stale = store
            .record_checkout(payment.id, "tx-a", "https://checkout/tx-a".into())
            .await
            .unwrap();
        assert_eq!(stale.checkout_url, None);

        assert!(store
            .transition_payment("tx-c", PaymentStatus::Pending, PaymentStatus::Failed)
            .await
            .unwrap());
        assert!(!store
            .transition_payment("tx-a", PaymentStatus::Pending, PaymentStatus::Success)
            .await
            .unwrap());
        assert_eq!(
            store.get_payment_by_tx_ref("tx-c").await.unwrap().status,
            PaymentStatus::Failed
        );

        let settled = store.reissue_tx_ref(payment.id, "tx-d".into()).await;
        assert!(matches!(settled, Err(BookingError::Conflict(_))));
        assert!(store.get_payment_by_tx_ref("tx-d").await.is_err());
    }

    #[tokio::test]
    async fn test_remove_listing_cascades() {
        let (store, _host, listing) = store_with_listing().await;
        let guest = guest(&store, "guest").await;
        let booking = store
            .insert_booking(&request(listing.id, guest.id, 1, 3), BookingStatus::Confirmed)
            .await
            .unwrap();
        let payment = store
            .insert_payment(NewPayment {
                booking: booking.id,
                user: guest.id,
                amount: dec!(85.00),
                currency: "ETB".into(),
                tx_ref: "tx-cascade".into(),
            })
            .await
            .unwrap();
        store
            .reissue_tx_ref(payment.id, "tx-cascade-2".into())
            .await
            .unwrap();
        store
            .insert_review(NewReview {
                listing: listing.id,
                user: guest.id,
                rating: 4,
                comment: None,
            })
            .await
            .unwrap();

        store.remove_listing(listing.id).await.unwrap();

        assert!(store.get_booking(booking.id).await.is_err());
        assert!(store.get_payment_by_tx_ref("tx-cascade").await.is_err());
        assert!(store.get_payment_by_tx_ref("tx-cascade-2").await.is_err());
        assert!(store.reviews_for_listing(listing.id).await.is_empty());
        assert!(matches!(
            store.remove_listing(listing.id).await,
            Err(BookingError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_confirmed_bookings_never_overlap_at_the_store() {
        let (store, _host, listing) = store_with_listing().await;
        let alice = guest(&store, "alice").await;
        let bob = guest(&store, "bob").await;

        store
            .insert_booking(&request(listing.id, alice.id, 10, 15), BookingStatus::Confirmed)
            .await
            .unwrap();

        let direct = store
            .insert_booking(&request(listing.id, bob.id, 12, 20), BookingStatus::Confirmed)
            .await;
        assert!(matches!(direct, Err(BookingError::Conflict(_))));

        // a pending booking may overlap, but cannot be promoted past the check
        let pending = store
            .insert_booking(&request(listing.id, bob.id, 12, 20), BookingStatus::Pending)
            .await
            .unwrap();
        let promoted = store
            .set_booking_status(pending.id, BookingStatus::Confirmed)
            .await;
        assert!(matches!(promoted, Err(BookingError::Conflict(_))));

        let cancelled = store
            .set_booking_status(pending.id, BookingStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        let revived = store
            .set_booking_status(pending.id, BookingStatus::Pending)
            .await;
        assert!(matches!(revived, Err(BookingError::Validation(_))));
    }

    #[tokio::test]
    async fn test_concurrent_signups_claim_a_username_once() {
        let store = Arc::new(InMemoryStore::new());

        let signups = (0..16).map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .insert_user(NewUser {
                        username: "meron".into(),
                        email: format!("meron{}@example.com", i),
                        ..Default::default()
                    })
                    .await
            })
        });
        let results: Vec<_> = join_all(signups)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| matches!(r, Err(BookingError::Conflict(_)))));
        assert_eq!(store.users.len(), 1);
    }
}
