use reqwest::StatusCode;

use crate::{transport::RawResponse, LunexError, Value};

/// A successfully interpreted response.
#[derive(Debug)]
pub(crate) struct Interpreted {
    pub value: Value,
    pub status: u16,
    pub status_text: String,
}

/// Turns a raw response into a value or a fatal error.
///
/// - 204 is `Value::Null` whatever the content type says.
/// - JSON content types are parsed; anything else is returned as text.
/// - Statuses outside `[200, 300)` become [`LunexError::Http`] with the parsed
///   body as `details`.
pub(crate) fn interpret_response(raw: RawResponse) -> Result<Interpreted, LunexError> {
    let status = raw.status.as_u16();
    let status_text = raw.status_text;

    if raw.status == StatusCode::NO_CONTENT {
        return Ok(Interpreted {
            value: Value::Null,
            status,
            status_text,
        });
    }

    let is_json = raw.content_type.as_deref().is_some_and(is_json_content_type);

    if !raw.status.is_success() {
        return Err(LunexError::Http {
            status,
            status_text,
            details: decode_error_details(raw.body, is_json),
        });
    }

    let value = if is_json {
        decode_json_body(&raw.body, status)?
    } else {
        Value::Text(raw.body)
    };

    Ok(Interpreted {
        value,
        status,
        status_text,
    })
}

fn decode_json_body(body: &str, status: u16) -> Result<Value, LunexError> {
    serde_json::from_str(body)
        .map(Value::Json)
        .map_err(|err| LunexError::Parse {
            status,
            message: format!("invalid JSON response body: {err}; body: {body}"),
        })
}

fn decode_error_details(body: String, is_json: bool) -> Value {
    if is_json {
        // An error body that claims JSON but is not still carries useful text.
        if let Ok(parsed) = serde_json::from_str(&body) {
            return Value::Json(parsed);
        }
    }
    Value::Text(body)
}

/// Matches `application/json`, `application/*+json` and parameters such as `; charset=utf-8`.
pub(crate) fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}
