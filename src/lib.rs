// Reservation and payment reconciliation core for a stays marketplace

pub mod availability;
pub mod config;
pub mod error;
pub mod gateway;
pub mod listings;
pub mod locks;
pub mod models;
pub mod notifier;
pub mod reconciler;
pub mod reviews;
pub mod seed;
pub mod store;

// Re-export key types for convenience
pub use availability::{AvailabilityChecker, BookingPolicy};
pub use config::{AmountPolicy, AppConfig, GatewayConfig, NotifierConfig, ReconcilerConfig};
pub use error::{BookingError, BookingResult};
pub use gateway::{ChapaGateway, GatewayReply, PaymentGateway};
pub use models::{Booking, BookingRequest, BookingStatus, Listing, Payment, PaymentStatus, Review};
pub use notifier::{LogMailer, Mailer, NotificationJob, NotificationQueue, WorkerPool};
pub use reconciler::{CheckoutSession, PaymentReconciler, VerificationOutcome};
pub use store::{BookingStore, InMemoryStore};
