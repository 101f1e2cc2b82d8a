use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Response envelope wrapping every answer from the device.
///
/// On the wire this is `{"is_ok": bool, "value": ...}`. The value is only
/// decoded as `T` when `is_ok` is true; error values are kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    /// `is_ok: true` with the decoded value.
    Ok(T),

    /// `is_ok: false` with whatever the device attached.
    Err(ErrorPayload),
}

impl<T> Envelope<T> {
    /// Converts into a `Result`, keeping the error payload.
    pub fn into_result(self) -> Result<T, ErrorPayload> {
        match self {
            Envelope::Ok(value) => Ok(value),
            Envelope::Err(payload) => Err(payload),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Envelope::Ok(_))
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    is_ok: bool,
    #[serde(default)]
    value: Value,
}

impl<'de, T> Deserialize<'de> for Envelope<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawEnvelope::deserialize(deserializer)?;
        if raw.is_ok {
            T::deserialize(raw.value).map(Envelope::Ok).map_err(D::Error::custom)
        } else {
            Ok(Envelope::Err(ErrorPayload(raw.value)))
        }
    }
}

/// Error value attached to an `is_ok: false` envelope.
///
/// The firmware sends either a plain string or a JSON object here, so the
/// payload stays untyped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorPayload(pub Value);

impl ErrorPayload {
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Human readable message for the payload.
    pub fn message(&self) -> String {
        match &self.0 {
            Value::Null => "Unknown error".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
