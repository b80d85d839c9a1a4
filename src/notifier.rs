// Confirmation emails, dispatched on a background worker pool so that sending
// never blocks or rolls back the payment that triggered it.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::{
    sync::{mpsc, Mutex as AsyncMutex},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::config::NotifierConfig;
use crate::error::{BookingError, BookingResult};
use crate::models::BookingId;

pub const CONFIRMATION_SUBJECT: &str = "Booking Payment Confirmation";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationJob {
    pub recipient: String,
    pub booking: BookingId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl NotificationJob {
    pub fn to_email(&self, from: &str) -> Email {
        Email {
            from: from.to_string(),
            to: self.recipient.clone(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            body: format!("Your payment for booking {} was successful!", self.booking),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, email: &Email) -> anyhow::Result<()>;
}

#[async_trait]
pub trait NotificationQueue: Send + Sync + 'static {
    async fn submit(&self, job: NotificationJob) -> BookingResult<()>;
}

// Mailer that only writes the email to the log
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> anyhow::Result<()> {
        info!(to = %email.to, subject = %email.subject, "{}", email.body);
        Ok(())
    }
}

// Mailer double that keeps every delivered email and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
    fail_next: AtomicUsize,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_sends(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &Email) -> anyhow::Result<()> {
        let remaining = self.fail_next.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_next.store(remaining - 1, Ordering::SeqCst);
            anyhow::bail!("smtp relay refused message for {}", email.to);
        }
        self.sent.lock().push(email.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NotifierStats {
    pub submitted: AtomicUsize,
    pub delivered: AtomicUsize,
    pub failed: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierSnapshot {
    pub submitted: usize,
    pub delivered: usize,
    pub failed: usize,
}

impl NotifierStats {
    pub fn snapshot(&self) -> NotifierSnapshot {
        NotifierSnapshot {
            submitted: self.submitted.load(Ordering::SeqCst),
            delivered: self.delivered.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

pub struct WorkerPool {
    sender: Mutex<Option<mpsc::Sender<NotificationJob>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    stats: Arc<NotifierStats>,
}

impl WorkerPool {
    // Must be called from within a tokio runtime
    pub fn start<M: Mailer>(config: &NotifierConfig, mailer: Arc<M>) -> Self {
        let (tx, rx) = mpsc::channel::<NotificationJob>(config.queue_capacity.max(1));
        let rx = Arc::new(AsyncMutex::new(rx));
        let stats = Arc::new(NotifierStats::default());

        let workers: Vec<JoinHandle<()>> = (0..config.workers.max(1))
            .map(|worker| {
                let rx = rx.clone();
                let mailer = mailer.clone();
                let stats = stats.clone();
                let from = config.from_address.clone();
                tokio::spawn(async move {
                    Self::run_worker(worker, rx, mailer, stats, from).await;
                })
            })
            .collect();

        Self {
            sender: Mutex::new(Some(tx)),
            workers: Mutex::new(workers),
            stats,
        }
    }

    async fn run_worker<M: Mailer>(
        worker: usize,
        rx: Arc<AsyncMutex<mpsc::Receiver<NotificationJob>>>,
        mailer: Arc<M>,
        stats: Arc<NotifierStats>,
        from: String,
    ) {
        loop {
            // Hold the receiver only while waiting, not while sending.
            let job = { rx.lock().await.recv().await };
            let Some(job) = job else {
                debug!(worker, "notification queue closed, worker exiting");
                break;
            };

            let email = job.to_email(&from);
            match mailer.send(&email).await {
                Ok(()) => {
                    stats.delivered.fetch_add(1, Ordering::SeqCst);
                    debug!(worker, booking = job.booking, "confirmation email sent");
                }
                Err(e) => {
                    stats.failed.fetch_add(1, Ordering::SeqCst);
                    error!(worker, booking = job.booking, error = %e, "confirmation email failed");
                }
            }
        }
    }

    pub fn stats(&self) -> NotifierSnapshot {
        self.stats.snapshot()
    }

    // Closes the queue and waits for the workers to drain what was already submitted
    pub async fn shutdown(&self) -> NotifierSnapshot {
        self.sender.lock().take();
        let workers: Vec<JoinHandle<()>> = std::mem::take(&mut *self.workers.lock());

        for joined in join_all(workers).await {
            if let Err(e) = joined {
                warn!(error = %e, "notification worker panicked");
            }
        }
        self.stats.snapshot()
    }
}

#[async_trait]
impl NotificationQueue for WorkerPool {
    async fn submit(&self, job: NotificationJob) -> BookingResult<()> {
        let sender = self
            .sender
            .lock()
            .clone()
            .ok_or_else(|| BookingError::Queue("notification pool is shut down".into()))?;

        sender.send(job).await.map_err(|e| {
            BookingError::Queue(format!("failed to enqueue job for booking {}", e.0.booking))
        })?;
        self.stats.submitted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(workers: usize) -> NotifierConfig {
        NotifierConfig {
            workers,
            queue_capacity: 8,
            from_address: "noreply@stays.test".to_string(),
        }
    }

    #[test]
    fn test_email_content() {
        let email = NotificationJob {
            recipient: "guest@example.com".into(),
            booking: 42,
        }
        .to_email("noreply@stays.test");

        assert_eq!(email.subject, "Booking Payment Confirmation");
        assert_eq!(email.body, "Your payment for booking 42 was successful!");
        assert_eq!(email.to, "guest@example.com");
        assert_eq!(email.from, "noreply@stays.test");
    }

    #[tokio::test]
    async fn test_pool_delivers_every_job_before_shutdown_returns() {
        let mailer = Arc::new(RecordingMailer::new());
        let pool = WorkerPool::start(&config(3), mailer.clone());

        for booking in 0..20 {
            pool.submit(NotificationJob {
                recipient: format!("guest{}@example.com", booking),
                booking,
            })
            .await
            .unwrap();
        }

        let stats = pool.shutdown().await;
        assert_eq!(stats.submitted, 20);
        assert_eq!(stats.delivered, 20);
        assert_eq!(mailer.sent().len(), 20);
    }

    #[tokio::test]
    async fn test_failed_send_is_counted_not_propagated() {
        let mailer = Arc::new(RecordingMailer::new());
        mailer.fail_next_sends(1);
        let pool = WorkerPool::start(&config(1), mailer.clone());

        pool.submit(NotificationJob {
            recipient: "a@example.com".into(),
            booking: 1,
        })
        .await
        .unwrap();
        pool.submit(NotificationJob {
            recipient: "b@example.com".into(),
            booking: 2,
        })
        .await
        .unwrap();

        let stats = pool.shutdown().await;
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.delivered, 1);
        assert_eq!(mailer.sent()[0].to, "b@example.com");
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_is_queue_error() {
        let pool = WorkerPool::start(&config(1), Arc::new(LogMailer));
        pool.shutdown().await;

        let res = pool
            .submit(NotificationJob {
                recipient: "late@example.com".into(),
                booking: 9,
            })
            .await;
        assert!(matches!(res, Err(BookingError::Queue(_))));
    }
}
