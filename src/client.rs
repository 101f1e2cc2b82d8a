use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::ACCEPT;
use reqwest::{Client as ReqwestClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::api::{games, online_go, wifi};
use crate::models::envelope::Envelope;
use crate::{PanelError, PanelResult};

/// Address the firmware serves the settings panel on in access-point mode.
pub const DEFAULT_DEVICE_URL: &str = "http://192.168.42.1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A request for the device, before it is put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRequest {
    pub method: Method,
    /// Endpoint path, always starting with `/`.
    pub path: String,
    pub body: Option<Value>,
}

/// Raw answer from the device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceResponse {
    pub status: StatusCode,
    pub body: String,
}

impl DeviceResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decodes the body as an envelope. An empty body counts as an ok
    /// envelope with a `null` value.
    pub fn envelope<R>(&self) -> PanelResult<Envelope<R>>
    where
        R: DeserializeOwned,
    {
        if self.body.trim().is_empty() {
            return Ok(Envelope::Ok(R::deserialize(Value::Null)?));
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Sends requests to the device.
///
/// [`HttpTransport`] is used unless another implementation is handed to
/// [`BoardClientBuilder::transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: DeviceRequest) -> PanelResult<DeviceResponse>;
}

/// [`Transport`] over HTTP using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    device_url: Url,
    http_client: ReqwestClient,
}

impl HttpTransport {
    pub fn new(device_url: Url, http_client: ReqwestClient) -> Self {
        Self {
            device_url,
            http_client,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: DeviceRequest) -> PanelResult<DeviceResponse> {
        let url = self.device_url.join(&request.path)?;

        let mut builder = self
            .http_client
            .request(request.method, url)
            .header(ACCEPT, "application/json");

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(DeviceResponse { status, body })
    }
}

/// Builder for the device client.
///
/// This builder provides a fluent API for creating clients with validation
/// at build time.
#[derive(Default)]
pub struct BoardClientBuilder {
    device_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    http_client: Option<ReqwestClient>,
    transport: Option<Arc<dyn Transport>>,
}

impl BoardClientBuilder {
    /// Sets the device URL. Defaults to [`DEFAULT_DEVICE_URL`].
    pub fn device_url(mut self, url: impl Into<String>) -> Self {
        self.device_url = Some(url.into());
        self
    }

    /// Sets the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a custom user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets a custom reqwest client (e.g., for custom middleware).
    pub fn http_client(mut self, http_client: ReqwestClient) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Replaces the HTTP transport entirely.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> PanelResult<BoardClient> {
        let url_str = self.device_url.unwrap_or_else(|| DEFAULT_DEVICE_URL.to_string());
        let device_url = Url::parse(&url_str)
            .map_err(|e| PanelError::ConfigurationError(format!("Invalid device URL: {e}")))?;

        if !matches!(device_url.scheme(), "http" | "https") {
            return Err(PanelError::ConfigurationError(format!(
                "Unsupported URL scheme: {}",
                device_url.scheme()
            )));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(PanelError::ConfigurationError("Timeout must be non-zero".into()));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let user_agent = self
                    .user_agent
                    .as_deref()
                    .unwrap_or(concat!("goboard-panel/", env!("CARGO_PKG_VERSION")));

                let http_client = match self.http_client {
                    Some(custom_client) => custom_client,
                    None => ReqwestClient::builder()
                        .timeout(timeout)
                        .user_agent(user_agent)
                        .build()
                        .map_err(|e| {
                            PanelError::ConfigurationError(format!(
                                "Failed to create HTTP client: {e}"
                            ))
                        })?,
                };

                Arc::new(HttpTransport::new(device_url.clone(), http_client))
            }
        };

        Ok(BoardClient {
            device_url,
            timeout,
            transport,
        })
    }
}

/// Client for the settings API served by the Go board firmware.
///
/// Cloning is cheap; clones share the same transport.
#[derive(Clone)]
pub struct BoardClient {
    device_url: Url,
    timeout: Duration,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for BoardClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardClient")
            .field("device_url", &self.device_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl BoardClient {
    pub fn builder() -> BoardClientBuilder {
        BoardClientBuilder::default()
    }

    /// The device base URL.
    pub fn device_url(&self) -> &Url {
        &self.device_url
    }

    /// Sends one request and returns the raw answer, whatever its status.
    pub(crate) async fn send<T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<T>,
    ) -> PanelResult<DeviceResponse>
    where
        T: Serialize,
    {
        validate_endpoint(endpoint)?;

        let body = body.map(|b| serde_json::to_value(b)).transpose()?;

        debug!("{} {}", method, endpoint);
        let response = self
            .transport
            .send(DeviceRequest {
                method,
                path: endpoint.to_string(),
                body,
            })
            .await?;
        debug!("{} answered {}", endpoint, response.status);

        Ok(response)
    }

    /// Makes a request and decodes the response envelope.
    ///
    /// Non-2xx answers are returned as long as they carry an envelope, so
    /// callers can look at both the status and the payload. Non-2xx answers
    /// without one fail with [`PanelError::UnexpectedStatus`].
    pub async fn request_envelope<T, R>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<T>,
    ) -> PanelResult<(StatusCode, Envelope<R>)>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let response = self.send(method, endpoint, body).await?;

        match response.envelope() {
            Ok(envelope) if response.status.is_success() || !envelope_is_empty(&response) => {
                Ok((response.status, envelope))
            }
            Ok(_) => Err(PanelError::UnexpectedStatus(response.status)),
            Err(e) if response.status.is_success() => Err(e),
            Err(_) => {
                warn!("{} failed with status {}", endpoint, response.status);
                Err(PanelError::UnexpectedStatus(response.status))
            }
        }
    }

    /// Makes a request and returns the ok value of the envelope.
    pub(crate) async fn request<T, R>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<T>,
    ) -> PanelResult<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let (status, envelope) = self.request_envelope(method, endpoint, body).await?;

        match envelope {
            Envelope::Ok(value) if status.is_success() => Ok(value),
            Envelope::Ok(_) => Err(PanelError::UnexpectedStatus(status)),
            Envelope::Err(payload) => {
                warn!("{} returned an error: {}", endpoint, payload);
                Err(PanelError::ApiError(payload.message()))
            }
        }
    }

    /// Makes a raw request to the device API.
    ///
    /// # Warning
    ///
    /// This is an advanced API that bypasses the type-safe wrappers.
    /// Use the typed API methods (like `wifi()`, `online_go()`) when possible.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method to use (e.g., "GET", "POST").
    /// * `endpoint` - The API endpoint path (e.g., "/wifi-status").
    /// * `body` - Optional request body (must implement `Serialize`).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The method or endpoint is invalid.
    /// - The request fails due to network issues.
    /// - The API returns an error envelope.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use goboard_panel::{BoardClient, PanelError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), PanelError> {
    /// let client = BoardClient::builder().device_url("http://192.168.42.1").build()?;
    /// let status = client.raw_request("GET", "/wifi-status", None::<()>).await?;
    /// println!("Wi-Fi: {status}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn raw_request<T>(
        &self,
        method: &str,
        endpoint: &str,
        body: Option<T>,
    ) -> PanelResult<Value>
    where
        T: Serialize,
    {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| PanelError::InvalidInput(format!("Invalid HTTP method: {method}")))?;

        self.request(method, endpoint, body).await
    }

    /// Gets the Wi-Fi API interface.
    pub fn wifi(&self) -> wifi::WifiHandler {
        wifi::WifiHandler::new(self.clone())
    }

    /// Gets the online-go account API interface.
    pub fn online_go(&self) -> online_go::OnlineGoHandler {
        online_go::OnlineGoHandler::new(self.clone())
    }

    /// Gets the games API interface.
    pub fn games(&self) -> games::GamesHandler {
        games::GamesHandler::new(self.clone())
    }
}

fn envelope_is_empty(response: &DeviceResponse) -> bool {
    response.body.trim().is_empty()
}

/// Endpoints are plain paths: a leading `/`, no query string, no fragment.
fn validate_endpoint(endpoint: &str) -> PanelResult<()> {
    if !endpoint.starts_with('/') {
        return Err(PanelError::InvalidEndpoint(format!(
            "Endpoint must start with '/': {endpoint}"
        )));
    }
    if endpoint.contains(&['?', '#'][..]) {
        return Err(PanelError::InvalidEndpoint(format!(
            "Endpoint must not contain a query or fragment: {endpoint}"
        )));
    }
    Ok(())
}
