use std::{fmt, future::Future, pin::Pin, sync::Arc, time::Duration};

use crate::{LunexError, Method, RequestDescriptor, ResponseSummary};

/// Boxed future returned by a [`DelayFn`].
pub type DelayFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Suspends for roughly the given number of milliseconds between retries.
pub type DelayFn = Arc<dyn Fn(u64) -> DelayFuture + Send + Sync>;

/// Called once before the first attempt of a logical call.
pub type StartHook = Arc<dyn Fn(Method, &str, &RequestDescriptor) + Send + Sync>;

/// Called once when a logical call succeeds.
pub type EndHook = Arc<dyn Fn(&ResponseSummary) + Send + Sync>;

/// Called once when a logical call fails for good.
pub type ErrorHook = Arc<dyn Fn(&LunexError) + Send + Sync>;

/// Configures timeout, retry behavior, default headers and lifecycle hooks.
///
/// Options are frozen once handed to [`crate::LunexClient`]; clones of the
/// client share them read-only.
#[derive(Clone)]
pub struct ClientOptions {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base retry backoff in milliseconds (exponential strategy).
    pub retry_backoff_ms: u64,
    /// Headers sent with every request, in insertion order.
    pub default_headers: Vec<(String, String)>,
    pub delay_fn: DelayFn,
    pub on_request_start: Option<StartHook>,
    pub on_request_end: Option<EndHook>,
    pub on_request_error: Option<ErrorHook>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10_000),
            max_retries: 0,
            retry_backoff_ms: 250,
            default_headers: Vec::new(),
            delay_fn: Arc::new(sleep_delay),
            on_request_start: None,
            on_request_end: None,
            on_request_error: None,
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("default_headers", &self.default_headers)
            .field("on_request_start", &self.on_request_start.is_some())
            .field("on_request_end", &self.on_request_end.is_some())
            .field("on_request_error", &self.on_request_error.is_some())
            .finish_non_exhaustive()
    }
}

impl ClientOptions {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn retry_backoff_ms(mut self, retry_backoff_ms: u64) -> Self {
        self.retry_backoff_ms = retry_backoff_ms;
        self
    }

    /// Appends a default header. Later entries with the same name win.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the retry delay, e.g. with a no-op in tests.
    ///
    /// ```
    /// use lunex_http::ClientOptions;
    ///
    /// let opts = ClientOptions::default()
    ///     .max_retries(3)
    ///     .delay_fn(|_ms| async {});
    /// ```
    pub fn delay_fn<F, Fut>(mut self, delay: F) -> Self
    where
        F: Fn(u64) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.delay_fn = Arc::new(move |ms| -> DelayFuture { Box::pin(delay(ms)) });
        self
    }

    pub fn on_request_start<F>(mut self, hook: F) -> Self
    where
        F: Fn(Method, &str, &RequestDescriptor) + Send + Sync + 'static,
    {
        self.on_request_start = Some(Arc::new(hook));
        self
    }

    pub fn on_request_end<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ResponseSummary) + Send + Sync + 'static,
    {
        self.on_request_end = Some(Arc::new(hook));
        self
    }

    pub fn on_request_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&LunexError) + Send + Sync + 'static,
    {
        self.on_request_error = Some(Arc::new(hook));
        self
    }

    pub(crate) fn validate(&self) -> Result<(), LunexError> {
        if self.timeout.is_zero() {
            return Err(LunexError::Configuration(
                "timeout must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

fn sleep_delay(ms: u64) -> DelayFuture {
    Box::pin(tokio::time::sleep(Duration::from_millis(ms)))
}
