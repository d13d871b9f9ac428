use serde::de::DeserializeOwned;

/// Parsed response body.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// No content (204).
    Null,
    /// Body of a response declared as JSON.
    Json(serde_json::Value),
    /// Body of any other response, verbatim.
    Text(String),
}

impl Value {
    pub fn null() -> Self {
        Self::Null
    }

    pub fn json(value: serde_json::Value) -> Self {
        Self::Json(value)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Deserializes a JSON body into `T`.
    ///
    /// `Null` deserializes as JSON `null`, so `Option<T>` targets accept 204s.
    /// Text bodies deserialize as a JSON string.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        match self {
            Self::Null => serde_json::from_value(serde_json::Value::Null),
            Self::Json(value) => serde_json::from_value(value),
            Self::Text(text) => serde_json::from_value(serde_json::Value::String(text)),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}
