// Payment gateway client (Chapa) and a scriptable mock for tests

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::{BookingError, BookingResult};

#[derive(Debug, Clone, Serialize)]
pub struct Customization {
    pub title: String,
    pub description: String,
}

// Body of the "initialize transaction" call
#[derive(Debug, Clone, Serialize)]
pub struct InitializeRequest {
    pub amount: String,
    pub currency: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub tx_ref: String,
    pub callback_url: String,
    pub return_url: String,
    pub customization: Customization,
}

// Raw gateway answer: HTTP status plus the body, kept verbatim so a
// rejection can be handed back to the caller untouched
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayReply {
    pub http_status: u16,
    pub body: Value,
}

impl GatewayReply {
    pub fn new(http_status: u16, body: Value) -> Self {
        Self { http_status, body }
    }

    // A JSON object carrying a top-level status, outside the 5xx range.
    // Anything else says nothing about the transaction itself.
    pub fn is_well_formed(&self) -> bool {
        self.http_status < 500 && self.body.get("status").and_then(Value::as_str).is_some()
    }

    pub fn is_success(&self) -> bool {
        self.body.get("status").and_then(Value::as_str) == Some("success")
    }

    pub fn checkout_url(&self) -> Option<&str> {
        self.body.get("data")?.get("checkout_url")?.as_str()
    }

    pub fn transaction_status(&self) -> Option<&str> {
        self.body.get("data")?.get("status")?.as_str()
    }

    pub fn into_error(self) -> BookingError {
        BookingError::Gateway {
            // a "failed" body can arrive with HTTP 200; still a client-side rejection
            status_code: if self.http_status < 400 { 400 } else { self.http_status },
            payload: self.body,
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    async fn initialize(&self, request: &InitializeRequest) -> BookingResult<GatewayReply>;

    async fn verify(&self, tx_ref: &str) -> BookingResult<GatewayReply>;
}

pub struct ChapaGateway {
    client: Client,
    config: GatewayConfig,
}

impl ChapaGateway {
    pub fn new(config: GatewayConfig) -> BookingResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| BookingError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn read_reply(response: Response) -> BookingResult<GatewayReply> {
        let http_status = response.status().as_u16();
        let text = response.text().await?;

        let body = match serde_json::from_str::<Value>(&text) {
            Ok(body) => body,
            Err(e) => {
                warn!(http_status, error = %e, "gateway returned a non-JSON body");
                Value::String(text)
            }
        };
        Ok(GatewayReply::new(http_status, body))
    }
}

#[async_trait]
impl PaymentGateway for ChapaGateway {
    async fn initialize(&self, request: &InitializeRequest) -> BookingResult<GatewayReply> {
        let url = self.endpoint("transaction/initialize");
        debug!(%url, tx_ref = %request.tx_ref, "initializing gateway transaction");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.secret_key)
            .json(request)
            .send()
            .await?;

        Self::read_reply(response).await
    }

    async fn verify(&self, tx_ref: &str) -> BookingResult<GatewayReply> {
        let url = self.endpoint(&format!("transaction/verify/{}", tx_ref));
        debug!(%url, "verifying gateway transaction");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        Self::read_reply(response).await
    }
}

// Scriptable gateway double, used by tests and the demo binary
pub mod mock_gateway {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

    #[derive(Debug, Clone, Copy)]
    pub enum GatewayMode {
        Normal,
        // Every call answers with a failed status
        Rejecting,
        // Every call fails before reaching the gateway
        Unreachable,
    }

    pub struct MockGateway {
        mode: AtomicU8,
        delay_ms: AtomicU64,
        initialize_calls: AtomicUsize,
        verify_calls: AtomicUsize,
        initialized: Mutex<Vec<InitializeRequest>>,
        verify_replies: Mutex<HashMap<String, GatewayReply>>,
        default_transaction_status: Mutex<String>,
    }

    impl Default for MockGateway {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockGateway {
        pub fn new() -> Self {
            Self {
                mode: AtomicU8::new(0),
                delay_ms: AtomicU64::new(0),
                initialize_calls: AtomicUsize::new(0),
                verify_calls: AtomicUsize::new(0),
                initialized: Mutex::new(Vec::new()),
                verify_replies: Mutex::new(HashMap::new()),
                default_transaction_status: Mutex::new("success".to_string()),
            }
        }

        pub fn set_mode(&self, mode: GatewayMode) {
            let mode_value = match mode {
                GatewayMode::Normal => 0,
                GatewayMode::Rejecting => 1,
                GatewayMode::Unreachable => 2,
            };
            self.mode.store(mode_value, Ordering::SeqCst);
        }

        pub fn set_delay(&self, delay_ms: u64) {
            self.delay_ms.store(delay_ms, Ordering::SeqCst);
        }

        // data.status for transactions without a scripted reply
        pub fn set_transaction_status(&self, status: &str) {
            *self.default_transaction_status.lock() = status.to_string();
        }

        pub fn script_verify(&self, tx_ref: &str, reply: GatewayReply) {
            self.verify_replies.lock().insert(tx_ref.to_string(), reply);
        }

        pub fn initialize_calls(&self) -> usize {
            self.initialize_calls.load(Ordering::SeqCst)
        }

        pub fn verify_calls(&self) -> usize {
            self.verify_calls.load(Ordering::SeqCst)
        }

        pub fn initialized_requests(&self) -> Vec<InitializeRequest> {
            self.initialized.lock().clone()
        }

        async fn simulate_network(&self) -> BookingResult<u8> {
            let delay = self.delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let mode = self.mode.load(Ordering::SeqCst);
            if mode == 2 {
                return Err(BookingError::Transport {
                    message: "connection refused".to_string(),
                    timed_out: false,
                });
            }
            Ok(mode)
        }
    }

    #[async_trait]
    impl PaymentGateway for MockGateway {
        async fn initialize(&self, request: &InitializeRequest) -> BookingResult<GatewayReply> {
            self.initialize_calls.fetch_add(1, Ordering::SeqCst);
            let mode = self.simulate_network().await?;
            self.initialized.lock().push(request.clone());

            if mode == 1 {
                return Ok(GatewayReply::new(
                    400,
                    json!({
                        "status": "failed",
                        "message": {"currency": ["The currency is not supported."]},
                        "data": null
                    }),
                ));
            }

            Ok(GatewayReply::new(
                200,
                json!({
                    "status": "success",
                    "message": "Hosted Link",
                    "data": {
                        "checkout_url": format!("https://checkout.chapa.co/checkout/payment/{}", request.tx_ref)
                    }
                }),
            ))
        }

        async fn verify(&self, tx_ref: &str) -> BookingResult<GatewayReply> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            let mode = self.simulate_network().await?;

            if let Some(reply) = self.verify_replies.lock().get(tx_ref) {
                return Ok(reply.clone());
            }

            if mode == 1 {
                return Ok(GatewayReply::new(
                    400,
                    json!({"status": "failed", "message": "Invalid transaction or Transaction not found", "data": null}),
                ));
            }

            let status = self.default_transaction_status.lock().clone();
            Ok(GatewayReply::new(
                200,
                json!({
                    "status": "success",
                    "message": "Payment details",
                    "data": {"tx_ref": tx_ref, "status": status}
                }),
            ))
        }
    }
}
