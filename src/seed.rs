// Sample data for local runs and demos

use rand::{seq::SliceRandom, Rng};
use rust_decimal::Decimal;
use tracing::info;

use crate::error::BookingResult;
use crate::models::{Listing, NewListing, NewUser, User};
use crate::store::BookingStore;

const ADJECTIVES: &[&str] = &["Sunny", "Quiet", "Spacious", "Cozy", "Modern", "Rustic", "Airy"];
const KINDS: &[&str] = &["loft", "cottage", "studio", "villa", "apartment", "cabin", "guesthouse"];
const CITIES: &[&str] = &[
    "Addis Ababa",
    "Bahir Dar",
    "Gondar",
    "Hawassa",
    "Nairobi",
    "Mombasa",
    "Kigali",
    "Zanzibar",
];
const FEATURES: &[&str] = &[
    "Fast wifi and a dedicated workspace.",
    "Walking distance to the market.",
    "Balcony with a view over the lake.",
    "Breakfast included on weekdays.",
    "Private parking for one car.",
    "Shared garden and outdoor kitchen.",
];

pub const MIN_SEED_PRICE: u32 = 50;
pub const MAX_SEED_PRICE: u32 = 500;
pub const DEFAULT_SEED_COUNT: usize = 10;

fn sample_listing<R: Rng>(rng: &mut R) -> NewListing {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Cozy");
    let kind = KINDS.choose(rng).copied().unwrap_or("studio");
    let city = CITIES.choose(rng).copied().unwrap_or("Addis Ababa");

    let description = FEATURES
        .choose_multiple(rng, 3)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    NewListing {
        title: format!("{} {} in {}", adjective, kind, city),
        description,
        price_per_night: Decimal::from(rng.gen_range(MIN_SEED_PRICE..=MAX_SEED_PRICE)),
        location: city.to_string(),
    }
}

// First existing user, or a freshly created `host1`
pub async fn ensure_host<S: BookingStore>(store: &S) -> BookingResult<User> {
    if let Some(user) = store.first_user().await {
        return Ok(user);
    }
    store
        .insert_user(NewUser {
            username: "host1".to_string(),
            email: "host1@example.com".to_string(),
            first_name: "Host".to_string(),
            last_name: "One".to_string(),
        })
        .await
}

// With `reset`, every existing listing (and what cascades from it) is removed first
pub async fn seed_listings<S: BookingStore>(
    store: &S,
    count: usize,
    reset: bool,
) -> BookingResult<Vec<Listing>> {
    if reset {
        let existing = store.list_listings().await;
        for listing in &existing {
            store.remove_listing(listing.id).await?;
        }
        info!(removed = existing.len(), "cleared existing listings");
    }

    let host = ensure_host(store).await?;

    // Generate up front; ThreadRng must not live across an await.
    let drafts: Vec<NewListing> = {
        let mut rng = rand::thread_rng();
        (0..count).map(|_| sample_listing(&mut rng)).collect()
    };

    let mut listings = Vec::with_capacity(count);
    for draft in drafts {
        listings.push(store.insert_listing(host.id, draft).await?);
    }

    info!(count = listings.len(), host = host.id, "seeded sample listings");
    Ok(listings)
}
