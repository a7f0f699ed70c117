//! NFON service portal REST API client.

use crate::endpoints::{EndpointTable, VERSION_ENDPOINT};
use crate::error::NfonError;
use crate::responses::{VersionCheck, VersionResponse};
use auth::{
    encode_json_body, host_from_base_url, ApiCredentials, RequestSigner, SigningTrace, TraceEvent,
    TracingHook, DEFAULT_CONTENT_TYPE,
};
use common::{ClientConfig, DEFAULT_TIMEOUT_SECS};
use rest_client::{Method, RestClient, RestRequest, RestResponse, RetryPolicy, Transport};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

enum TransportSource {
    BaseUrl(String),
    Custom(Arc<dyn Transport>),
}

/// Builder for configuring an [`NfonClient`].
pub struct NfonClientBuilder {
    credentials: ApiCredentials,
    source: TransportSource,
    timeout: Duration,
    retry: RetryPolicy,
    endpoints: Option<EndpointTable>,
    content_type: String,
    trace: Option<Arc<dyn SigningTrace>>,
}

impl NfonClientBuilder {
    /// Builder populated from loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        let credentials = ApiCredentials::new(
            config.api.user_id.as_str(),
            config.api.key.as_str(),
            config.api.secret.as_str(),
        );

        let mut retry = RetryPolicy::new(config.client.max_attempts);
        if let Some(backoff) = config.backoff() {
            retry = retry.with_backoff(backoff);
        }

        let mut builder = NfonClient::builder(credentials, &config.api.base_url)
            .timeout(config.timeout())
            .retry_policy(retry);
        if config.client.trace {
            builder = builder.trace(Arc::new(TracingHook));
        }
        builder
    }

    /// Sets the default per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy for transport failures.
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Uses a custom endpoint table instead of the built-in one.
    pub fn endpoints(mut self, endpoints: EndpointTable) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Sends requests through `transport`. Its base URL replaces the one
    /// given to [`NfonClient::builder`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.source = TransportSource::Custom(transport);
        self
    }

    /// Sets the `Content-Type` sent and signed with every request.
    /// Defaults to `application/json`.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Attaches a hook observing intermediate signing values.
    pub fn trace(mut self, trace: Arc<dyn SigningTrace>) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Builds the [`NfonClient`].
    ///
    /// # Errors
    /// Returns an error if the base URL has no scheme or the HTTP client
    /// cannot be built.
    pub fn build(self) -> Result<NfonClient, NfonError> {
        let transport: Arc<dyn Transport> = match self.source {
            TransportSource::BaseUrl(base_url) => {
                check_base_url(&base_url)?;
                Arc::new(RestClient::new(&base_url, self.timeout).map_err(NfonError::ClientBuild)?)
            }
            TransportSource::Custom(transport) => {
                check_base_url(transport.base_url())?;
                transport
            }
        };

        let host = host_from_base_url(transport.base_url()).to_string();

        Ok(NfonClient {
            transport,
            credentials: self.credentials,
            host,
            endpoints: Arc::new(self.endpoints.unwrap_or_default()),
            timeout: self.timeout,
            retry: self.retry,
            content_type: self.content_type,
            trace: self.trace,
        })
    }
}

fn check_base_url(base_url: &str) -> Result<(), NfonError> {
    if base_url.starts_with("https://") || base_url.starts_with("http://") {
        Ok(())
    } else {
        Err(NfonError::InvalidBaseUrl(base_url.to_string()))
    }
}

/// Signed-request client for the NFON service portal API.
///
/// Every call resolves an endpoint, signs fresh headers, and sends the
/// request, retrying transport failures. Safe to share between tasks.
pub struct NfonClient {
    transport: Arc<dyn Transport>,
    credentials: ApiCredentials,
    host: String,
    endpoints: Arc<EndpointTable>,
    timeout: Duration,
    retry: RetryPolicy,
    content_type: String,
    trace: Option<Arc<dyn SigningTrace>>,
}

impl NfonClient {
    /// Create a client with default timeout, retry policy and endpoints.
    ///
    /// # Arguments
    /// * `credentials` - API credentials for authenticated requests
    /// * `base_url` - Base URL including scheme, e.g. `https://portal-api.example.net:8090`
    ///
    /// # Errors
    /// Returns an error if the base URL has no scheme or the HTTP client
    /// cannot be built.
    pub fn new(credentials: ApiCredentials, base_url: &str) -> Result<Self, NfonError> {
        Self::builder(credentials, base_url).build()
    }

    /// Start configuring a client.
    pub fn builder(credentials: ApiCredentials, base_url: &str) -> NfonClientBuilder {
        NfonClientBuilder {
            credentials,
            source: TransportSource::BaseUrl(base_url.to_string()),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            endpoints: None,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            trace: None,
        }
    }

    /// Get the upper-cased user id.
    pub fn user_id(&self) -> &str {
        self.credentials.user_id()
    }

    /// Get the API key (for logging/debugging).
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Get the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Get the endpoint table.
    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    /// Expand an endpoint key into a request path.
    pub fn endpoint(&self, key: &str, args: &[(&str, &str)]) -> Result<String, NfonError> {
        self.endpoints.resolve(key, args)
    }

    /// Placeholder names an endpoint requires.
    pub fn endpoint_variables(&self, key: &str) -> Result<Vec<&str>, NfonError> {
        self.endpoints.variables(key)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Resolve `key` with `args` and send a signed request.
    ///
    /// Error statuses are returned as responses. Transport failures are
    /// retried according to the retry policy.
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        key: &str,
        args: &[(&str, &str)],
        body: Option<&B>,
        timeout: Option<Duration>,
    ) -> Result<RestResponse, NfonError> {
        let path = self.endpoints.resolve(key, args)?;
        self.execute_path(method, &path, body, timeout).await
    }

    /// Send a signed request to an already expanded path.
    pub async fn execute_path<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        timeout: Option<Duration>,
    ) -> Result<RestResponse, NfonError> {
        // Serialized once: the same bytes are hashed and sent on every attempt.
        let body = body.map(encode_json_body).transpose()?;
        let timeout = timeout.unwrap_or(self.timeout);
        let url = format!("{}{}", self.transport.base_url(), path);

        let method = &method;
        let body = body.as_deref();
        let url = url.as_str();

        self.retry
            .run(
                move |attempt| self.attempt(method, path, body, timeout, url, attempt),
                NfonError::is_retryable,
            )
            .await
    }

    /// One attempt: fresh date and signature, then send.
    async fn attempt(
        &self,
        method: &Method,
        path: &str,
        body: Option<&[u8]>,
        timeout: Duration,
        url: &str,
        attempt: u32,
    ) -> Result<RestResponse, NfonError> {
        let headers = {
            let mut signer = RequestSigner::new(&self.credentials);
            if let Some(trace) = self.trace.as_deref() {
                signer = signer.with_trace(trace);
            }
            signer.build_headers(
                method.as_str(),
                path,
                body,
                &self.content_type,
                &self.host,
            )?
        };

        if let Some(trace) = self.trace.as_deref() {
            trace.record(TraceEvent::Url(url));
        }

        let mut request = RestRequest::new(method.clone(), path)
            .body(body.map(<[u8]>::to_vec))
            .timeout(Some(timeout));
        for (name, value) in headers.as_pairs() {
            request = request.header(name, value);
        }

        tracing::debug!(
            method = %method,
            path = %path,
            attempt = attempt,
            "Dispatching signed request"
        );

        self.transport
            .send(request)
            .await
            .map_err(|source| NfonError::Transport {
                attempts: attempt,
                source,
            })
    }

    /// GET an endpoint.
    pub async fn get(&self, key: &str, args: &[(&str, &str)]) -> Result<RestResponse, NfonError> {
        self.execute(Method::GET, key, args, None::<&()>, None).await
    }

    /// POST a JSON body to an endpoint.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        key: &str,
        args: &[(&str, &str)],
        body: &B,
    ) -> Result<RestResponse, NfonError> {
        self.execute(Method::POST, key, args, Some(body), None).await
    }

    /// PUT a JSON body to an endpoint.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        key: &str,
        args: &[(&str, &str)],
        body: &B,
    ) -> Result<RestResponse, NfonError> {
        self.execute(Method::PUT, key, args, Some(body), None).await
    }

    /// DELETE an endpoint.
    pub async fn delete(
        &self,
        key: &str,
        args: &[(&str, &str)],
    ) -> Result<RestResponse, NfonError> {
        self.execute(Method::DELETE, key, args, None::<&()>, None).await
    }

    // ========================================================================
    // Self-check
    // ========================================================================

    /// Compare the server's API version with the local endpoint table.
    ///
    /// GET /api/version
    pub async fn api_test(&self) -> Result<VersionCheck, NfonError> {
        let response = self
            .get(VERSION_ENDPOINT, &[])
            .await?
            .error_for_status()
            .map_err(NfonError::from_response)?;

        let version: VersionResponse = response.json().map_err(NfonError::from_response)?;
        let server_version = version
            .version()
            .ok_or_else(|| NfonError::Parse("version response has no data value".into()))?;

        let check = VersionCheck {
            server_version,
            local_version: self.endpoints.version().to_string(),
        };

        tracing::info!(
            server_version = %check.server_version,
            local_version = %check.local_version,
            up_to_date = check.is_up_to_date(),
            "Endpoint definitions checked"
        );

        Ok(check)
    }
}

impl std::fmt::Debug for NfonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NfonClient")
            .field("base_url", &self.transport.base_url())
            .field("user_id", &self.credentials.user_id())
            .field("api_key", &self.credentials.api_key())
            .field("timeout", &self.timeout)
            .field("content_type", &self.content_type)
            .field("max_attempts", &self.retry.max_attempts())
            .field("endpoints_version", &self.endpoints.version())
            .finish()
    }
}
