// Guest reviews: one per user per listing, rated 1 to 5 stars

use tracing::info;

use crate::error::{BookingError, BookingResult};
use crate::models::{ListingId, NewReview, Review};
use crate::store::BookingStore;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

pub async fn submit_review<S: BookingStore>(store: &S, review: NewReview) -> BookingResult<Review> {
    if !(MIN_RATING..=MAX_RATING).contains(&review.rating) {
        return Err(BookingError::Validation(format!(
            "rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, review.rating
        )));
    }
    store.get_user(review.user).await?;

    let review = store.insert_review(review).await?;
    info!(review = review.id, listing = review.listing, rating = review.rating, "review submitted");
    Ok(review)
}

pub async fn average_rating<S: BookingStore>(store: &S, listing: ListingId) -> Option<f64> {
    let reviews = store.reviews_for_listing(listing).await;
    if reviews.is_empty() {
        return None;
    }
    let total: u32 = reviews.iter().map(|r| r.rating as u32).sum();
    Some(total as f64 / reviews.len() as f64)
}
