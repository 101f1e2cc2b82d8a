use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::password::PasswordHint;
use crate::{PanelError, PanelResult};

/// Online-go account status as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OnlineGoStatus {
    /// Whether the stored credentials were accepted by online-go.com.
    #[serde(default)]
    pub authorized: bool,

    /// The stored username.
    #[serde(default)]
    pub username: String,

    /// Hint about the stored password.
    #[serde(flatten)]
    pub hint: PasswordHint,
}

impl OnlineGoStatus {
    /// Placeholder for the stored password.
    pub fn masked_password(&self) -> Option<String> {
        self.hint.masked()
    }
}

/// Login state of the online-go account stored on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    /// Saved credentials are valid.
    Authorized(OnlineGoStatus),

    /// Credentials are saved but online-go.com rejected them.
    Unauthorized(OnlineGoStatus),

    /// No account is saved on the device.
    NoSavedAccount,
}

impl LoginState {
    /// Classifies a decoded status by its `authorized` flag.
    pub fn from_status(status: OnlineGoStatus) -> Self {
        if status.authorized {
            LoginState::Authorized(status)
        } else {
            LoginState::Unauthorized(status)
        }
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self, LoginState::Authorized(_))
    }

    pub fn status(&self) -> Option<&OnlineGoStatus> {
        match self {
            LoginState::Authorized(status) | LoginState::Unauthorized(status) => Some(status),
            LoginState::NoSavedAccount => None,
        }
    }

    /// Stored username, empty when no account is saved.
    pub fn username(&self) -> &str {
        self.status().map(|s| s.username.as_str()).unwrap_or_default()
    }

    /// Inline badge text for this state.
    pub fn badge_text(&self) -> &'static str {
        match self {
            LoginState::Authorized(_) => "Authorized",
            LoginState::Unauthorized(_) => "Incorrect Login Information",
            LoginState::NoSavedAccount => "No Saved Account",
        }
    }
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            Some(status) if !status.username.is_empty() => {
                write!(f, "{} ({})", self.badge_text(), status.username)
            }
            _ => f.write_str(self.badge_text()),
        }
    }
}

/// Online-go username and password to submit to the device.
#[derive(Debug)]
pub struct OnlineGoCredentials {
    username: String,
    password: SecretString,
}

impl OnlineGoCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> PanelResult<Self> {
        Self::from_secret(username, SecretString::from(password.into()))
    }

    /// Both username and password are required.
    pub fn from_secret(username: impl Into<String>, password: SecretString) -> PanelResult<Self> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(PanelError::InvalidInput("Username is required".into()));
        }
        if password.expose_secret().is_empty() {
            return Err(PanelError::InvalidInput("Password is required".into()));
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn to_body(&self) -> LoginRequest<'_> {
        LoginRequest {
            username: &self.username,
            password: self.password.expose_secret(),
        }
    }
}

/// Body of `POST /online-go-login`.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}
