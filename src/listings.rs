// Listing management. Anyone may read; only the owning host may change or remove.

use tracing::{info, warn};

use crate::error::{BookingError, BookingResult};
use crate::models::{Listing, ListingId, ListingPatch, NewListing, UserId};
use crate::store::BookingStore;

pub async fn create_listing<S: BookingStore>(
    store: &S,
    host: UserId,
    listing: NewListing,
) -> BookingResult<Listing> {
    let listing = store.insert_listing(host, listing).await?;
    info!(listing = listing.id, host, "listing published");
    Ok(listing)
}

async fn owned_listing<S: BookingStore>(
    store: &S,
    actor: UserId,
    id: ListingId,
) -> BookingResult<Listing> {
    let listing = store.get_listing(id).await?;
    if listing.host != actor {
        warn!(listing = id, actor, "non-host attempted to modify listing");
        return Err(BookingError::Forbidden(format!(
            "user {} is not the host of listing {}",
            actor, id
        )));
    }
    Ok(listing)
}

pub async fn update_listing<S: BookingStore>(
    store: &S,
    actor: UserId,
    id: ListingId,
    patch: ListingPatch,
) -> BookingResult<Listing> {
    let mut listing = owned_listing(store, actor, id).await?;
    listing.apply(patch)?;
    store.replace_listing(listing.clone()).await?;
    Ok(listing)
}

pub async fn delete_listing<S: BookingStore>(
    store: &S,
    actor: UserId,
    id: ListingId,
) -> BookingResult<Listing> {
    owned_listing(store, actor, id).await?;
    let listing = store.remove_listing(id).await?;
    info!(listing = id, "listing deleted");
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{guest, store_with_listing};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_only_host_may_modify() {
        let (store, host, listing) = store_with_listing().await;
        let stranger = guest(&store, "stranger").await;

        let patch = ListingPatch {
            title: Some("Renamed".into()),
            ..Default::default()
        };
        let denied = update_listing(&store, stranger.id, listing.id, patch.clone()).await;
        assert!(matches!(denied, Err(BookingError::Forbidden(_))));

        let updated = update_listing(&store, host.id, listing.id, patch).await.unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(store.get_listing(listing.id).await.unwrap().title, "Renamed");

        let denied = delete_listing(&store, stranger.id, listing.id).await;
        assert!(matches!(denied, Err(BookingError::Forbidden(_))));
        assert!(delete_listing(&store, host.id, listing.id).await.is_ok());
        assert!(store.list_listings().await.is_empty());
    }

    #[tokio::test]
    async fn test_listings_are_newest_first() {
        let (store, host, first) = store_with_listing().await;
        let second = create_listing(
            &store,
            host.id,
            NewListing {
                title: "Lalibela guesthouse".into(),
                description: "Near the churches".into(),
                price_per_night: dec!(60.00),
                location: "Lalibela".into(),
            },
        )
        .await
        .unwrap();

        let ids: Vec<_> = store.list_listings().await.into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let invalid = create_listing(
            &store,
            host.id,
            NewListing {
                title: "Free".into(),
                price_per_night: dec!(0),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(invalid, Err(BookingError::Validation(_))));

        let sub_cent = create_listing(
            &store,
            host.id,
            NewListing {
                title: "Odd pricing".into(),
                price_per_night: dec!(19.999),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(sub_cent, Err(BookingError::Validation(_))));
        assert_eq!(store.list_listings().await.len(), 2);
    }
}
