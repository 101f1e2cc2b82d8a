use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::password::PasswordHint;
use crate::{PanelError, PanelResult};

/// Wi-Fi connection status as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WifiStatus {
    /// Whether the device is currently connected to the network.
    #[serde(default)]
    pub connected: bool,

    /// The stored network name.
    #[serde(default)]
    pub ssid: String,

    /// Hint about the stored password.
    #[serde(flatten)]
    pub hint: PasswordHint,
}

impl WifiStatus {
    /// Placeholder for the stored password.
    pub fn masked_password(&self) -> Option<String> {
        self.hint.masked()
    }
}

/// New Wi-Fi credentials to submit to the device.
///
/// The password is kept in a [`SecretString`] so it never shows up in
/// `Debug` output or logs.
#[derive(Debug)]
pub struct WifiCredentials {
    ssid: String,
    password: SecretString,
}

impl WifiCredentials {
    /// Creates a credential pair. An empty password is allowed for open
    /// networks, an empty SSID is not.
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> PanelResult<Self> {
        Self::from_secret(ssid, SecretString::from(password.into()))
    }

    pub fn from_secret(ssid: impl Into<String>, password: SecretString) -> PanelResult<Self> {
        let ssid = ssid.into();
        if ssid.trim().is_empty() {
            return Err(PanelError::InvalidInput("SSID is required".into()));
        }
        Ok(Self { ssid, password })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub(crate) fn to_body(&self) -> SaveWifiCredentialsRequest<'_> {
        SaveWifiCredentialsRequest {
            ssid: &self.ssid,
            password: self.password.expose_secret(),
        }
    }
}

/// Body of `POST /save-wifi-credentials`.
#[derive(Serialize)]
pub(crate) struct SaveWifiCredentialsRequest<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
}
