use std::{fmt, sync::Arc, time::Duration};

use reqwest::header::HeaderMap;

use crate::{
    decode::{interpret_response, Interpreted},
    hooks::Hooks,
    request::{build_descriptor, parse_headers},
    retry::{backoff_delay_ms, AttemptOutcome, RetryState},
    transport::{send_attempt, with_timeout},
    Body, ClientOptions, LunexError, Method, Query, RequestDescriptor, RequestOptions,
    ResponseSummary, Result, Value,
};

#[derive(Clone)]
/// Async HTTP client bound to a base URL.
///
/// Cheap to clone; clones share the connection handle and the frozen options.
pub struct LunexClient {
    http: reqwest::Client,
    base_url: String,
    default_headers: HeaderMap,
    options: Arc<ClientOptions>,
}

impl fmt::Debug for LunexClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Header values may carry credentials; only names are printed.
        let header_names: Vec<&str> = self.default_headers.keys().map(|name| name.as_str()).collect();
        f.debug_struct("LunexClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &header_names)
            .field("timeout", &self.options.timeout)
            .field("max_retries", &self.options.max_retries)
            .finish_non_exhaustive()
    }
}

impl LunexClient {
    /// Creates a client with default options.
    ///
    /// Fails with [`LunexError::Configuration`] if `base_url` is blank or not
    /// an absolute URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), ClientOptions::default())
    }

    /// Creates a client that sends `headers` with every request.
    pub fn with_headers<I, K, V>(base_url: impl Into<String>, headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_options(base_url, headers, ClientOptions::default())
    }

    /// Creates a client from default headers and options.
    ///
    /// `headers` are applied after `options.default_headers`, so they win on
    /// conflicting names.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    ///
    /// use lunex_http::{ClientOptions, LunexClient};
    ///
    /// let client = LunexClient::with_options(
    ///     "https://api.example.com",
    ///     [("Accept", "application/json")],
    ///     ClientOptions::default()
    ///         .timeout(Duration::from_secs(5))
    ///         .max_retries(3),
    /// )
    /// .expect("valid configuration");
    /// ```
    pub fn with_options<I, K, V>(
        base_url: impl Into<String>,
        headers: I,
        mut options: ClientOptions,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        options.default_headers.extend(
            headers
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
        Self::build(base_url.into(), options)
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `LUNEX_BASE_URL`: base endpoint (required)
    /// - `LUNEX_TIMEOUT_MS`: per-attempt timeout in milliseconds (optional)
    /// - `LUNEX_MAX_RETRIES`: retries after the first attempt (optional)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("LUNEX_BASE_URL").map_err(|_| {
            LunexError::Configuration("missing LUNEX_BASE_URL environment variable".to_owned())
        })?;

        let mut options = ClientOptions::default();
        if let Some(timeout_ms) = env_number("LUNEX_TIMEOUT_MS")? {
            options = options.timeout(Duration::from_millis(timeout_ms));
        }
        if let Some(max_retries) = env_number("LUNEX_MAX_RETRIES")? {
            let max_retries = usize::try_from(max_retries).map_err(|_| {
                LunexError::Configuration("LUNEX_MAX_RETRIES is out of range".to_owned())
            })?;
            options = options.max_retries(max_retries);
        }

        Self::build(base_url, options)
    }

    fn build(base_url: String, options: ClientOptions) -> Result<Self> {
        let base_url = base_url.trim().to_owned();
        if base_url.is_empty() {
            return Err(LunexError::Configuration("base URL is required".to_owned()));
        }
        url::Url::parse(&base_url).map_err(|err| {
            LunexError::Configuration(format!("invalid base URL '{base_url}': {err}"))
        })?;
        options.validate()?;
        let default_headers = parse_headers(&options.default_headers)?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            default_headers,
            options: Arc::new(options),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Sends a GET request with query parameters.
    ///
    /// Pass `()` for no query.
    pub async fn get(&self, path: &str, query: impl Into<Query>) -> Result<Value> {
        self.request(Method::Get, path, RequestOptions::new().query(query))
            .await
    }

    /// Sends a POST request with a body (JSON for `serde_json::Value`).
    ///
    /// Pass `()` for no body.
    pub async fn post(&self, path: &str, body: impl Into<Body>) -> Result<Value> {
        self.request(Method::Post, path, RequestOptions::new().body(body))
            .await
    }

    pub async fn put(&self, path: &str, body: impl Into<Body>) -> Result<Value> {
        self.request(Method::Put, path, RequestOptions::new().body(body))
            .await
    }

    pub async fn patch(&self, path: &str, body: impl Into<Body>) -> Result<Value> {
        self.request(Method::Patch, path, RequestOptions::new().body(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::Delete, path, RequestOptions::new())
            .await
    }

    /// Runs one logical call: hooks around the retry loop.
    ///
    /// Invalid per-call input (e.g. a malformed header) is rejected before any
    /// hook fires.
    pub async fn request(&self, method: Method, path: &str, call: RequestOptions) -> Result<Value> {
        let first = self.descriptor(method, path, &call)?;
        let url = first.url.clone();
        let hooks = Hooks::new(&self.options);

        hooks.start(method, &url, &first);

        match self.execute_with_retry(method, path, &call, first).await {
            Ok((interpreted, attempts)) => {
                hooks.end(&ResponseSummary {
                    method,
                    url,
                    status: interpreted.status,
                    status_text: interpreted.status_text,
                    attempts,
                });
                Ok(interpreted.value)
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(%method, %url, error = %err, "request failed");

                hooks.error(&err);
                Err(err)
            }
        }
    }

    fn descriptor(
        &self,
        method: Method,
        path: &str,
        call: &RequestOptions,
    ) -> Result<RequestDescriptor> {
        build_descriptor(&self.base_url, &self.default_headers, method, path, call)
    }

    async fn execute_with_retry(
        &self,
        method: Method,
        path: &str,
        call: &RequestOptions,
        first: RequestDescriptor,
    ) -> Result<(Interpreted, usize)> {
        let mut state = RetryState::new(self.options.max_retries);
        let mut next = Some(first);

        loop {
            let descriptor = match next.take() {
                Some(descriptor) => descriptor,
                None => self.descriptor(method, path, call)?,
            };

            #[cfg(feature = "tracing")]
            tracing::debug!(
                %method,
                url = %descriptor.url,
                attempt = state.attempt(),
                "sending request"
            );

            let result = with_timeout(self.options.timeout, send_attempt(&self.http, descriptor))
                .await
                .and_then(interpret_response);

            match AttemptOutcome::from(result) {
                AttemptOutcome::Success(interpreted) => return Ok((interpreted, state.attempts())),
                AttemptOutcome::Fatal(err) => return Err(err),
                AttemptOutcome::Recoverable(err) => {
                    if !state.can_retry() {
                        return Err(err);
                    }
                    let index = state.advance();
                    self.wait_before_retry(index, &err).await;
                }
            }
        }
    }

    /// Waits before the next attempt using the configured delay function.
    async fn wait_before_retry(&self, index: usize, err: &LunexError) {
        let delay_ms = backoff_delay_ms(self.options.retry_backoff_ms, index);

        #[cfg(feature = "tracing")]
        tracing::debug!(error = %err, "retrying request after {} ms", delay_ms);
        #[cfg(not(feature = "tracing"))]
        let _ = err;

        (self.options.delay_fn)(delay_ms).await;
    }
}

fn env_number(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw.trim().parse::<u64>().map(Some).map_err(|err| {
            LunexError::Configuration(format!("{name} must be a non-negative integer: {err}"))
        }),
        Err(_) => Ok(None),
    }
}
