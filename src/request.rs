use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use url::form_urlencoded;

use crate::{LunexError, Method};

/// Query string parameters, serialized in insertion order.
///
/// Entries whose value is `None` are skipped when the URL is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, Option<String>)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn push(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.push((key.into(), Some(value.to_string())));
        self
    }

    /// Appends a parameter that is omitted from the URL when `value` is `None`.
    pub fn push_opt<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.0.push((key.into(), value.map(|value| value.to_string())));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, value)| value.is_none())
    }

    /// Encodes the present pairs as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            if let Some(value) = value {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl From<()> for Query {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Query
where
    K: Into<String>,
    V: ToString,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs
            .into_iter()
            .fold(Self::new(), |query, (key, value)| query.push(key, value))
    }
}

impl<K, V> From<Vec<(K, V)>> for Query
where
    K: Into<String>,
    V: ToString,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::new(), |query, (key, value)| query.push(key, value))
    }
}

/// Request payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// Serialized as JSON text; sets `Content-Type: application/json` unless overridden.
    Json(serde_json::Value),
    /// Sent verbatim; sets `Content-Type: text/plain; charset=utf-8` unless overridden.
    Text(String),
    /// No payload and no default content type. `()` converts into this.
    Empty,
}

impl Body {
    /// Builds a JSON body from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, LunexError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|err| LunexError::Configuration(format!("invalid JSON body: {err}")))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn default_content_type(&self) -> Option<&'static str> {
        match self {
            Self::Json(_) => Some("application/json"),
            Self::Text(_) => Some("text/plain; charset=utf-8"),
            Self::Empty => None,
        }
    }

    fn serialize(&self) -> Result<Option<String>, LunexError> {
        match self {
            Self::Json(value) => serde_json::to_string(value)
                .map(Some)
                .map_err(|err| LunexError::Configuration(format!("invalid JSON body: {err}"))),
            Self::Text(text) => Ok(Some(text.clone())),
            Self::Empty => Ok(None),
        }
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Per-call inputs: query, body and header overrides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    pub query: Query,
    pub body: Option<Body>,
    /// Merged over the client's default headers; entries here win.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.query = query.into();
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Everything needed for one attempt. Rebuilt for every attempt.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Joins `base_url` and `path` with exactly one `/` and appends the encoded query.
///
/// Example: `("https://api.example.com", "users", limit=5)` →
/// `"https://api.example.com/users?limit=5"`
pub fn build_url(base_url: &str, path: &str, query: &Query) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    let mut url = if path.is_empty() {
        base.to_owned()
    } else {
        format!("{base}/{path}")
    };

    let encoded = query.encode();
    if !encoded.is_empty() {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&encoded);
    }
    url
}

/// Parses header pairs into a map. Later pairs with the same name replace earlier ones.
pub(crate) fn parse_headers<'a, I>(pairs: I) -> Result<HeaderMap, LunexError>
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
            LunexError::Configuration(format!("invalid header name '{name}': {err}"))
        })?;
        let value = HeaderValue::from_str(value).map_err(|err| {
            LunexError::Configuration(format!("invalid value for header '{name}': {err}"))
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

pub(crate) fn build_descriptor(
    base_url: &str,
    default_headers: &HeaderMap,
    method: Method,
    path: &str,
    call: &RequestOptions,
) -> Result<RequestDescriptor, LunexError> {
    let mut headers = default_headers.clone();
    for (name, value) in parse_headers(&call.headers)? {
        if let Some(name) = name {
            headers.insert(name, value);
        }
    }

    let body = match &call.body {
        Some(body) => {
            if let Some(content_type) = body.default_content_type() {
                if !headers.contains_key(header::CONTENT_TYPE) {
                    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
                }
            }
            body.serialize()?
        }
        None => None,
    };

    Ok(RequestDescriptor {
        method,
        url: build_url(base_url, path, &call.query),
        headers,
        body,
    })
}
