use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use stay_reservations::{
    gateway::mock_gateway::MockGateway,
    models::NewUser,
    seed::{seed_listings, DEFAULT_SEED_COUNT},
    AppConfig, AvailabilityChecker, BookingError, BookingRequest, BookingStore, InMemoryStore,
    LogMailer, PaymentReconciler, VerificationOutcome, WorkerPool,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    info!(policy = ?config.booking_policy, currency = %config.reconciler.currency, "starting stay demo");

    let store = Arc::new(InMemoryStore::new());
    let listings = seed_listings(store.as_ref(), DEFAULT_SEED_COUNT, true).await?;
    let listing = listings.first().context("seeding produced no listings")?;

    let guest = store
        .insert_user(NewUser {
            username: "sara".to_string(),
            email: "sara@example.com".to_string(),
            first_name: "Sara".to_string(),
            last_name: "Tesfaye".to_string(),
        })
        .await?;
    let rival = store
        .insert_user(NewUser {
            username: "dawit".to_string(),
            email: "dawit@example.com".to_string(),
            first_name: "Dawit".to_string(),
            last_name: "Alemu".to_string(),
        })
        .await?;

    let checker = AvailabilityChecker::new(store.clone(), config.booking_policy);
    let check_in = Utc::now().date_naive() + Duration::days(14);
    let check_out = check_in + Duration::days(3);

    let booking = checker
        .reserve(BookingRequest {
            listing: listing.id,
            user: guest.id,
            check_in,
            check_out,
        })
        .await?;
    info!(booking = booking.id, title = %listing.title, "reserved {} nights", booking.nights());

    match checker
        .reserve(BookingRequest {
            listing: listing.id,
            user: rival.id,
            check_in: check_in + Duration::days(1),
            check_out: check_out + Duration::days(1),
        })
        .await
    {
        Err(BookingError::Conflict(reason)) => info!(%reason, "overlapping request rejected"),
        Err(e) => warn!(error = %e, "overlapping request failed unexpectedly"),
        Ok(b) => warn!(booking = b.id, "overlapping request was accepted"),
    }

    // The demo never talks to the real gateway.
    let gateway = Arc::new(MockGateway::new());
    let pool = Arc::new(WorkerPool::start(&config.notifier, Arc::new(LogMailer)));
    let reconciler = PaymentReconciler::new(
        store.clone(),
        gateway,
        pool.clone(),
        config.reconciler.clone(),
    );

    let session = reconciler
        .initiate(booking.id, "http://localhost:8000/payments/verify")
        .await?;
    info!(url = %session.checkout_url, amount = %session.payment.amount, "redirect payer to checkout");

    match reconciler.verify(&session.payment.tx_ref).await? {
        VerificationOutcome::Verified(p) => info!(payment = p.id, "payment succeeded"),
        VerificationOutcome::Failed(p) => warn!(payment = p.id, "payment failed"),
        VerificationOutcome::AlreadySettled(p) => info!(status = ?p.status, "payment already settled"),
    }

    let stats = pool.shutdown().await;
    info!(delivered = stats.delivered, failed = stats.failed, "notification pool drained");
    Ok(())
}
