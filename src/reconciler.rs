// Payment reconciler: PENDING -> SUCCESS | FAILED, driven by the gateway.
//
// `initiate` creates the PENDING payment for a booking and asks the gateway
// for a checkout URL; once a URL exists, later calls hand back the same
// session. `verify` asks the gateway how the transaction ended and settles
// the payment with a compare-and-swap, so a payment is settled once no matter
// how many callbacks race.

use std::sync::Arc;

use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::config::{AmountPolicy, ReconcilerConfig};
use crate::error::{BookingError, BookingResult};
use crate::gateway::{Customization, InitializeRequest, PaymentGateway};
use crate::locks::KeyedLocks;
use crate::models::{
    format_money, validate_money, Booking, BookingId, BookingStatus, Listing, NewPayment,
    Payment, PaymentStatus,
};
use crate::notifier::{NotificationJob, NotificationQueue};
use crate::store::BookingStore;

const TX_REF_PREFIX: &str = "tx-";
const TX_REF_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    pub payment: Payment,
    pub checkout_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    // This call moved the payment to SUCCESS and queued the confirmation email
    Verified(Payment),
    Failed(Payment),
    // Already SUCCESS or FAILED; nothing changed
    AlreadySettled(Payment),
}

impl VerificationOutcome {
    pub fn payment(&self) -> &Payment {
        match self {
            VerificationOutcome::Verified(p)
            | VerificationOutcome::Failed(p)
            | VerificationOutcome::AlreadySettled(p) => p,
        }
    }
}

pub fn generate_tx_ref() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TX_REF_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", TX_REF_PREFIX, suffix)
}

pub fn amount_for(policy: AmountPolicy, listing: &Listing, booking: &Booking) -> Decimal {
    match policy {
        AmountPolicy::NightlyRate => listing.price_per_night,
        AmountPolicy::FullStay => listing.price_per_night * Decimal::from(booking.nights()),
    }
}

pub struct PaymentReconciler<S, G, Q>
where
    S: BookingStore,
    G: PaymentGateway,
    Q: NotificationQueue,
{
    store: Arc<S>,
    gateway: Arc<G>,
    notifier: Arc<Q>,
    config: ReconcilerConfig,
    initiating: KeyedLocks<BookingId>,
}

impl<S, G, Q> PaymentReconciler<S, G, Q>
where
    S: BookingStore,
    G: PaymentGateway,
    Q: NotificationQueue,
{
    pub fn new(store: Arc<S>, gateway: Arc<G>, notifier: Arc<Q>, config: ReconcilerConfig) -> Self {
        Self {
            store,
            gateway,
            notifier,
            config,
            initiating: KeyedLocks::new(),
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    // A PENDING payment whose checkout page was already issued is returned as
    // is. One left without a page by a failed attempt gets a fresh tx_ref.
    #[instrument(skip(self))]
    pub async fn initiate(
        &self,
        booking_id: BookingId,
        callback_url: &str,
    ) -> BookingResult<CheckoutSession> {
        let booking = self.store.get_booking(booking_id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::Validation(format!(
                "booking {} is cancelled",
                booking_id
            )));
        }
        let listing = self.store.get_listing(booking.listing).await?;
        let payer = self.store.get_user(booking.user).await?;

        let _initiating = self.initiating.lock(booking.id).await;
        let payment = match self.store.payment_for_booking(booking.id).await {
            None => {
                let amount = amount_for(self.config.amount_policy, &listing, &booking);
                validate_money("payment amount", amount)?;
                self.store
                    .insert_payment(NewPayment {
                        booking: booking.id,
                        user: booking.user,
                        amount,
                        currency: self.config.currency.clone(),
                        tx_ref: generate_tx_ref(),
                    })
                    .await?
            }
            Some(existing) if existing.status == PaymentStatus::Pending => {
                if let Some(checkout_url) = existing.checkout_url.clone() {
                    info!(payment = existing.id, tx_ref = %existing.tx_ref, "reusing checkout session");
                    return Ok(CheckoutSession {
                        payment: existing,
                        checkout_url,
                    });
                }
                info!(payment = existing.id, "re-arming pending payment with a new tx_ref");
                self.store
                    .reissue_tx_ref(existing.id, generate_tx_ref())
                    .await?
            }
            Some(existing) => {
                return Err(BookingError::Conflict(format!(
                    "booking {} already has a settled payment ({:?})",
                    booking_id, existing.status
                )))
            }
        };

        let request = InitializeRequest {
            amount: format_money(payment.amount),
            currency: payment.currency.clone(),
            email: payer.email,
            first_name: payer.first_name,
            last_name: payer.last_name,
            tx_ref: payment.tx_ref.clone(),
            callback_url: callback_url.to_string(),
            return_url: format!(
                "{}/{}/",
                self.config.return_url_base.trim_end_matches('/'),
                payment.id
            ),
            customization: Customization {
                title: self.config.customization_title.clone(),
                description: format!("Payment for booking {}", booking.id),
            },
        };

        let reply = self.gateway.initialize(&request).await.map_err(|e| {
            warn!(tx_ref = %payment.tx_ref, error = %e, "gateway unreachable, payment left pending");
            e
        })?;

        if !reply.is_success() {
            warn!(tx_ref = %payment.tx_ref, http_status = reply.http_status, "gateway rejected transaction");
            return Err(reply.into_error());
        }
        let checkout_url = match reply.checkout_url() {
            Some(url) => url.to_string(),
            None => {
                warn!(tx_ref = %payment.tx_ref, "gateway success without checkout url");
                return Err(reply.into_error());
            }
        };

        let payment = self
            .store
            .record_checkout(payment.id, &payment.tx_ref, checkout_url.clone())
            .await?;

        info!(payment = payment.id, tx_ref = %payment.tx_ref, "payment initiated");
        Ok(CheckoutSession {
            payment,
            checkout_url,
        })
    }

    // Settled payments are final and returned without another gateway round trip
    #[instrument(skip(self))]
    pub async fn verify(&self, tx_ref: &str) -> BookingResult<VerificationOutcome> {
        let payment = self.store.get_payment_by_tx_ref(tx_ref).await?;
        if payment.status.is_terminal() {
            return Ok(VerificationOutcome::AlreadySettled(payment));
        }

        let reply = self.gateway.verify(tx_ref).await?;
        if !reply.is_well_formed() {
            warn!(
                payment = payment.id,
                http_status = reply.http_status,
                "unreadable gateway reply, payment left pending"
            );
            return Err(reply.into_error());
        }
        let target = if reply.is_success() && reply.transaction_status() == Some("success") {
            PaymentStatus::Success
        } else {
            PaymentStatus::Failed
        };

        let swapped = self
            .store
            .transition_payment(tx_ref, PaymentStatus::Pending, target)
            .await?;
        let payment = self.store.get_payment_by_tx_ref(tx_ref).await?;
        if !swapped {
            info!(status = ?payment.status, "payment settled by a concurrent verification");
            return Ok(VerificationOutcome::AlreadySettled(payment));
        }

        if target == PaymentStatus::Failed {
            warn!(payment = payment.id, reply = %reply.body, "payment failed verification");
            return Ok(VerificationOutcome::Failed(payment));
        }

        info!(payment = payment.id, booking = payment.booking, "payment verified");
        self.queue_confirmation(&payment).await;
        Ok(VerificationOutcome::Verified(payment))
    }

    pub async fn payment_status(&self, tx_ref: &str) -> BookingResult<PaymentStatus> {
        Ok(self.store.get_payment_by_tx_ref(tx_ref).await?.status)
    }

    // The payment is already SUCCESS here; nothing below may undo that.
    async fn queue_confirmation(&self, payment: &Payment) {
        let recipient = match self.store.get_user(payment.user).await {
            Ok(user) => user.email,
            Err(e) => {
                warn!(payment = payment.id, error = %e, "no recipient for confirmation email");
                return;
            }
        };

        let job = NotificationJob {
            recipient,
            booking: payment.booking,
        };
        if let Err(e) = self.notifier.submit(job).await {
            warn!(payment = payment.id, error = %e, "could not queue confirmation email");
        }
    }
}
