//! # goboard-panel
//!
//! A Rust client for the settings API served by the Go board firmware.
//!
//! This crate provides a type-safe, async interface for reading and
//! replacing the board's Wi-Fi credentials and online-go.com login, listing
//! the account's games, and driving the credential cards of a settings panel.
//!
//! ## Features
//!
//! - 🔐 Stored passwords are only ever shown as a masked hint
//! - 📶 Wi-Fi saves go through an explicit confirmation step
//! - 🔄 Async API with Tokio runtime support
//! - 🛡️ Comprehensive error handling
//!
//! ## Example
//!
//! ```rust,no_run
//! use goboard_panel::{BoardClient, OnlineGoPanel, SyncState, WifiPanel};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BoardClient::builder().device_url("http://192.168.42.1").build()?;
//!
//!     let mut wifi = WifiPanel::new(client.wifi());
//!     if let SyncState::Loaded(status) = wifi.refresh().await {
//!         println!("SSID: {}", status.ssid);
//!         println!("Password: {}", status.masked_password().unwrap_or_default());
//!     }
//!
//!     let mut online_go = OnlineGoPanel::new(client.online_go());
//!     online_go.refresh().await;
//!     online_go.edit_identifier("cade");
//!     online_go.edit_password("new password");
//!     online_go.save().await;
//!     println!("online-go: {}", online_go.badge().text);
//!
//!     Ok(())
//! }
//! ```

mod api;
mod client;
mod error;
mod models;
mod panel;

pub use api::games::GamesHandler;
pub use api::online_go::OnlineGoHandler;
pub use api::wifi::WifiHandler;
pub use client::{
    BoardClient, BoardClientBuilder, DeviceRequest, DeviceResponse, HttpTransport, Transport,
    DEFAULT_DEVICE_URL,
};
pub use error::{PanelError, PanelResult};
pub use models::envelope::{Envelope, ErrorPayload};
pub use models::game::{GameSetup, GameSetupBuilder, GameSummary, StoneColor};
pub use models::online_go::{LoginState, OnlineGoCredentials, OnlineGoStatus};
pub use models::password::{mask_password, PasswordHint};
pub use models::wifi::{WifiCredentials, WifiStatus};
pub use models::SaveOutcome;
pub use panel::{
    ConfirmSave, CredentialDomain, CredentialPanel, DirectSave, EditableFields, OnlineGoPanel,
    SaveConfirmation, StatusBadge, SyncState, WifiPanel,
};
pub use secrecy::{ExposeSecret, SecretString};
