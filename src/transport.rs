use std::{future::Future, time::Duration};

use reqwest::{header, StatusCode};

use crate::{LunexError, RequestDescriptor};

/// Undecoded response of a single attempt. Any status, including non-2xx.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    /// Reason phrase as sent by the server, or the canonical one for `status`.
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Runs `attempt` under a timer.
///
/// When the timer fires first the attempt future is dropped, which aborts the
/// in-flight reqwest call, and the result is [`LunexError::Timeout`]. The timer
/// lives inside the `Timeout` future and goes away with it on either path.
pub(crate) async fn with_timeout<F, T>(timeout: Duration, attempt: F) -> Result<T, LunexError>
where
    F: Future<Output = Result<T, LunexError>>,
{
    match tokio::time::timeout(timeout, attempt).await {
        Ok(result) => result,
        Err(_elapsed) => Err(LunexError::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

/// Performs exactly one network exchange for `descriptor`.
///
/// The body is read here as well, so a stalled body counts against the same
/// timeout as the headers.
pub(crate) async fn send_attempt(
    http: &reqwest::Client,
    descriptor: RequestDescriptor,
) -> Result<RawResponse, LunexError> {
    let mut request = http
        .request(descriptor.method.into(), &descriptor.url)
        .headers(descriptor.headers);
    if let Some(body) = descriptor.body {
        request = request.body(body);
    }

    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let status_text = reason_phrase(status, response.extensions());
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = response.text().await.map_err(map_transport_error)?;

    Ok(RawResponse {
        status,
        status_text,
        content_type,
        body,
    })
}

/// hyper only records a `ReasonPhrase` when the wire phrase differs from the
/// canonical one.
pub(crate) fn reason_phrase(status: StatusCode, extensions: &http::Extensions) -> String {
    match extensions.get::<hyper::ext::ReasonPhrase>() {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => status.canonical_reason().unwrap_or_default().to_owned(),
    }
}

fn map_transport_error(err: reqwest::Error) -> LunexError {
    // A request that cannot even be built will fail the same way on every attempt.
    if err.is_builder() {
        return LunexError::Configuration(format!("invalid request: {err}"));
    }
    LunexError::Transport(err)
}
