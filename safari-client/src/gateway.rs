use async_trait::async_trait;
use safari_core::BookingRequest;
use serde_json::Value;
use url::Url;

pub const BOOKINGS_PATH: &str = "/api/bookings";

/// What the booking endpoint hands back on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingAccepted {
    /// Reference echoed by the server, when it sends one.
    pub booking_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Non-2xx, or a 2xx body carrying `error`.
    #[error("Request rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl GatewayError {
    /// Server-supplied message, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

/// Submits a booking to the backend.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn submit(&self, request: &BookingRequest) -> Result<BookingAccepted, GatewayError>;
}

/// `POST {base}/api/bookings` over HTTP. No timeout beyond the client default
/// and no retry.
#[derive(Debug, Clone)]
pub struct HttpBookingGateway {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpBookingGateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(BOOKINGS_PATH))
            .map_err(|e| GatewayError::InvalidEndpoint(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl BookingGateway for HttpBookingGateway {
    async fn submit(&self, request: &BookingRequest) -> Result<BookingAccepted, GatewayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        // Error pages are not always JSON; an unreadable body still carries the status.
        let body: Value = response.json().await.unwrap_or(Value::Null);
        interpret_booking_response(status, &body)
    }
}

/// Maps a `/api/bookings` response to the gateway result.
pub fn interpret_booking_response(status: u16, body: &Value) -> Result<BookingAccepted, GatewayError> {
    let error = body.get("error").and_then(Value::as_str).map(str::to_string);
    if !(200..300).contains(&status) || error.is_some() {
        return Err(GatewayError::Rejected { status, message: error });
    }

    let booking_reference = body
        .pointer("/booking/bookingReference")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(BookingAccepted { booking_reference })
}
