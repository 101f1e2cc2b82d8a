use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Partial information the device reveals about a stored password.
///
/// Only the first character and the length ever leave the device, which is
/// enough to render a placeholder without knowing the secret.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PasswordHint {
    /// First character of the stored password, if the device sent one.
    #[serde(
        rename = "first_letter_of_password",
        default,
        deserialize_with = "non_empty_string"
    )]
    pub first_char: Option<String>,

    /// Length of the stored password. Malformed or out-of-range values read
    /// as `0`.
    #[serde(
        rename = "length_of_password",
        default,
        deserialize_with = "lenient_length"
    )]
    pub length: u8,
}

impl PasswordHint {
    pub fn new(first_char: Option<&str>, length: u8) -> Self {
        Self {
            first_char: first_char.filter(|c| !c.is_empty()).map(str::to_string),
            length,
        }
    }

    /// Placeholder text for the stored password, `None` when nothing is stored.
    pub fn masked(&self) -> Option<String> {
        mask_password(self.first_char.as_deref(), self.length)
    }
}

/// Builds a display placeholder from a password hint.
///
/// Returns `None` for a zero length. Otherwise the result has exactly
/// `length` characters: the first character of `first_char` (or `*` when
/// absent) followed by `*`.
///
/// ```
/// use goboard_panel::mask_password;
///
/// assert_eq!(mask_password(Some("s"), 6).as_deref(), Some("s*****"));
/// assert_eq!(mask_password(None, 3).as_deref(), Some("***"));
/// assert_eq!(mask_password(Some("x"), 0), None);
/// ```
pub fn mask_password(first_char: Option<&str>, length: u8) -> Option<String> {
    if length == 0 {
        return None;
    }

    let length = usize::from(length);
    let first = first_char.and_then(|s| s.chars().next()).unwrap_or('*');
    let mut masked = String::with_capacity(length + first.len_utf8());
    masked.push(first);
    masked.extend(std::iter::repeat('*').take(length - 1));
    Some(masked)
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn lenient_length<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_length).unwrap_or(0))
}

// The firmware stores the length as a `u8`.
fn coerce_length(value: &Value) -> u8 {
    let length = match value {
        Value::Number(n) => n.as_u64().map(|n| n as f64).or_else(|| n.as_f64()),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    length
        .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= f64::from(u8::MAX))
        .map(|f| f as u8)
        .unwrap_or(0)
}
