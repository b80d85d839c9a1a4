use thiserror::Error;

// Error taxonomy shared by the availability checker and the payment reconciler
#[derive(Error, Debug, Clone)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Gateway error: {status_code} - {payload}")]
    Gateway {
        status_code: u16,
        payload: serde_json::Value,
    },

    #[error("Transport error: {message}")]
    Transport { message: String, timed_out: bool },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification queue error: {0}")]
    Queue(String),
}

impl BookingError {
    // Unreachable gateway or a gateway-side 5xx; everything else is a definitive answer
    pub fn is_retryable(&self) -> bool {
        match self {
            BookingError::Transport { .. } => true,
            BookingError::Gateway { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }

    // HTTP-equivalent status for callers that expose the core over a web API
    pub fn status_code(&self) -> u16 {
        match self {
            BookingError::Validation(_) => 400,
            BookingError::Conflict(_) => 409,
            BookingError::NotFound(_) => 404,
            BookingError::Forbidden(_) => 403,
            BookingError::Gateway { status_code, .. } if *status_code >= 500 => 502,
            BookingError::Gateway { .. } => 400,
            BookingError::Transport { timed_out: true, .. } => 504,
            BookingError::Transport { .. } => 502,
            BookingError::Config(_) | BookingError::Queue(_) => 500,
        }
    }
}

impl From<reqwest::Error> for BookingError {
    fn from(err: reqwest::Error) -> Self {
        BookingError::Transport {
            message: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unreachable_or_failing_gateway_is_retryable() {
        let transport = BookingError::Transport {
            message: "connection reset".to_string(),
            timed_out: false,
        };
        assert!(transport.is_retryable());
        assert_eq!(transport.status_code(), 502);

        let gateway = BookingError::Gateway {
            status_code: 400,
            payload: serde_json::json!({"status": "failed"}),
        };
        assert!(!gateway.is_retryable());

        let outage = BookingError::Gateway {
            status_code: 502,
            payload: serde_json::Value::String("<html>502 Bad Gateway</html>".into()),
        };
        assert!(outage.is_retryable());
        assert_eq!(outage.status_code(), 502);
        assert!(!BookingError::Conflict("taken".into()).is_retryable());
        assert_eq!(BookingError::NotFound("tx".into()).status_code(), 404);
    }
}
