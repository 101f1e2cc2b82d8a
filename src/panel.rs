//! Status synchronization for the credential cards of the settings panel.
//!
//! A [`CredentialPanel`] fetches the current status of one credential
//! domain, keeps the user's unsaved edits and submits them back, replacing
//! its status with whatever the device answers. Rendering is left to the
//! caller; state changes are published on a [`tokio::sync::watch`] channel.
//!
//! All operations take `&mut self`, so one panel never has two requests in
//! flight. Share a panel behind a `tokio::sync::Mutex` to serialize callers.

use std::fmt;

use async_trait::async_trait;
use log::{debug, info, warn};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;

use crate::api::online_go::OnlineGoHandler;
use crate::api::wifi::WifiHandler;
use crate::models::online_go::{LoginState, OnlineGoCredentials};
use crate::models::wifi::{WifiCredentials, WifiStatus};
use crate::models::SaveOutcome;
use crate::PanelResult;

/// Panel for the device's Wi-Fi credentials.
pub type WifiPanel = CredentialPanel<WifiHandler>;

/// Panel for the online-go account stored on the device.
pub type OnlineGoPanel = CredentialPanel<OnlineGoHandler>;

/// Badge shown next to a credential card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub text: &'static str,
    pub is_error: bool,
}

impl StatusBadge {
    pub const fn ok(text: &'static str) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    pub const fn error(text: &'static str) -> Self {
        Self {
            text,
            is_error: true,
        }
    }
}

/// One credential domain the panel can synchronize.
#[async_trait]
pub trait CredentialDomain: Send + Sync {
    /// Status reported by the device.
    type Status: Clone + fmt::Debug + Send + Sync;

    /// Validated credentials ready to submit.
    type Credentials: Send + Sync;

    /// Short name used in log output.
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> PanelResult<Self::Status>;

    fn credentials(
        &self,
        identifier: &str,
        password: SecretString,
    ) -> PanelResult<Self::Credentials>;

    async fn submit(
        &self,
        credentials: &Self::Credentials,
    ) -> PanelResult<SaveOutcome<Self::Status>>;

    /// The identifier (SSID, username) held by a status.
    fn identifier(status: &Self::Status) -> &str;

    fn badge(status: &Self::Status) -> StatusBadge;

    /// Whether the device took the submitted credentials. Edits are kept
    /// when it did not.
    fn is_accepted(_status: &Self::Status) -> bool {
        true
    }
}

/// Domains whose save goes through [`CredentialPanel::request_save`].
pub trait ConfirmSave: CredentialDomain {
    /// Text shown to the user before the save fires.
    fn confirmation_message(&self) -> &'static str;
}

/// Domains that save without confirmation.
pub trait DirectSave: CredentialDomain {}

/// Lifecycle of a credential card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState<S> {
    Idle,
    Loading,
    Loaded(S),
    LoadError(String),
    Saving,
    SaveError {
        message: String,
        /// Status from before the failed save, if one was loaded.
        status: Option<S>,
    },
    /// The device accepted the change and restarts to apply it.
    PendingRestart,
}

impl<S> SyncState<S> {
    pub fn is_busy(&self) -> bool {
        matches!(self, SyncState::Loading | SyncState::Saving)
    }

    pub fn loaded(&self) -> Option<&S> {
        match self {
            SyncState::Loaded(status) => Some(status),
            _ => None,
        }
    }
}

/// Unsaved edits of a credential card.
#[derive(Debug)]
pub struct EditableFields {
    pub identifier: String,
    new_password: SecretString,
}

impl EditableFields {
    pub fn new_password(&self) -> &SecretString {
        &self.new_password
    }

    fn clear_password(&mut self) {
        self.new_password = SecretString::from(String::new());
    }
}

impl Default for EditableFields {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            new_password: SecretString::from(String::new()),
        }
    }
}

/// State holder for one credential card.
pub struct CredentialPanel<D: CredentialDomain> {
    domain: D,
    state: watch::Sender<SyncState<D::Status>>,
    status: Option<D::Status>,
    edits: EditableFields,
    identifier_edited: bool,
}

impl<D: CredentialDomain> fmt::Debug for CredentialPanel<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPanel")
            .field("domain", &self.domain.name())
            .field("state", &*self.state.borrow())
            .field("edits", &self.edits)
            .finish()
    }
}

impl<D: CredentialDomain> CredentialPanel<D> {
    pub fn new(domain: D) -> Self {
        let (state, _) = watch::channel(SyncState::Idle);
        Self {
            domain,
            state,
            status: None,
            edits: EditableFields::default(),
            identifier_edited: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> SyncState<D::Status> {
        self.state.borrow().clone()
    }

    /// Receives every state change, including `Loading` and `Saving`.
    pub fn subscribe(&self) -> watch::Receiver<SyncState<D::Status>> {
        self.state.subscribe()
    }

    /// Status from the last successful fetch or save. Cleared when a fetch
    /// fails.
    pub fn status(&self) -> Option<&D::Status> {
        self.status.as_ref()
    }

    pub fn edits(&self) -> &EditableFields {
        &self.edits
    }

    pub fn edit_identifier(&mut self, identifier: impl Into<String>) {
        self.edits.identifier = identifier.into();
        self.identifier_edited = true;
    }

    pub fn edit_password(&mut self, password: impl Into<String>) {
        self.edits.new_password = SecretString::from(password.into());
    }

    /// Badge for the current state.
    pub fn badge(&self) -> StatusBadge {
        match &*self.state.borrow() {
            SyncState::Idle | SyncState::Loading => StatusBadge::ok("Loading"),
            SyncState::Loaded(status) => D::badge(status),
            SyncState::Saving => StatusBadge::ok("Saving"),
            SyncState::PendingRestart => StatusBadge::ok("Restarting"),
            SyncState::LoadError(_) | SyncState::SaveError { .. } => {
                StatusBadge::error("Unknown Error")
            }
        }
    }

    /// Fetches the status from the device.
    ///
    /// The identifier edit is seeded from the fetched status unless the user
    /// already changed it.
    pub async fn refresh(&mut self) -> SyncState<D::Status> {
        self.state.send_replace(SyncState::Loading);

        let next = match self.domain.fetch().await {
            Ok(status) => {
                debug!("Loaded {} status: {:?}", self.domain.name(), status);
                if !self.identifier_edited {
                    self.edits.identifier = D::identifier(&status).to_string();
                }
                self.status = Some(status.clone());
                SyncState::Loaded(status)
            }
            Err(e) => {
                warn!("Failed to load {} status: {}", self.domain.name(), e);
                self.status = None;
                SyncState::LoadError(e.to_string())
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    async fn submit_edits(&mut self) -> SyncState<D::Status> {
        let password = SecretString::from(self.edits.new_password.expose_secret().to_string());
        let credentials = match self.domain.credentials(&self.edits.identifier, password) {
            Ok(credentials) => credentials,
            Err(e) => return self.fail_save(e.to_string()),
        };

        self.state.send_replace(SyncState::Saving);

        let next = match self.domain.submit(&credentials).await {
            Ok(SaveOutcome::Applied(status)) if D::is_accepted(&status) => {
                info!("Saved {} credentials", self.domain.name());
                self.edits.identifier = D::identifier(&status).to_string();
                self.edits.clear_password();
                self.identifier_edited = false;
                self.status = Some(status.clone());
                SyncState::Loaded(status)
            }
            Ok(SaveOutcome::Applied(status)) => {
                warn!("{} credentials were rejected by the device", self.domain.name());
                self.status = Some(status.clone());
                SyncState::Loaded(status)
            }
            Ok(SaveOutcome::Restarting) => {
                info!("Saved {} credentials, device is restarting", self.domain.name());
                self.edits.clear_password();
                self.identifier_edited = false;
                SyncState::PendingRestart
            }
            Err(e) => return self.fail_save(e.to_string()),
        };

        self.state.send_replace(next.clone());
        next
    }

    fn fail_save(&mut self, message: String) -> SyncState<D::Status> {
        warn!("Failed to save {} credentials: {}", self.domain.name(), message);
        let next = SyncState::SaveError {
            message,
            status: self.status.clone(),
        };
        self.state.send_replace(next.clone());
        next
    }
}

impl<D: DirectSave> CredentialPanel<D> {
    /// Submits the current edits.
    pub async fn save(&mut self) -> SyncState<D::Status> {
        self.submit_edits().await
    }
}

impl<D: ConfirmSave> CredentialPanel<D> {
    /// Asks to submit the current edits. Nothing is sent until the returned
    /// confirmation is confirmed.
    pub fn request_save(&mut self) -> SaveConfirmation<'_, D> {
        SaveConfirmation { panel: self }
    }
}

/// A pending save that needs explicit confirmation.
#[must_use = "a save request does nothing until it is confirmed"]
pub struct SaveConfirmation<'a, D: ConfirmSave> {
    panel: &'a mut CredentialPanel<D>,
}

impl<'a, D: ConfirmSave> SaveConfirmation<'a, D> {
    pub fn message(&self) -> &'static str {
        self.panel.domain.confirmation_message()
    }

    /// The edits that will be submitted.
    pub fn edits(&self) -> &EditableFields {
        &self.panel.edits
    }

    /// Sends the save request.
    pub async fn confirm(self) -> SyncState<D::Status> {
        self.panel.submit_edits().await
    }

    /// Drops the request. Edits are kept.
    pub fn cancel(self) {
        debug!("{} save cancelled", self.panel.domain.name());
    }
}

#[async_trait]
impl CredentialDomain for WifiHandler {
    type Status = WifiStatus;
    type Credentials = WifiCredentials;

    fn name(&self) -> &'static str {
        "Wi-Fi"
    }

    async fn fetch(&self) -> PanelResult<WifiStatus> {
        self.status().await
    }

    fn credentials(&self, identifier: &str, password: SecretString) -> PanelResult<WifiCredentials> {
        WifiCredentials::from_secret(identifier, password)
    }

    async fn submit(&self, credentials: &WifiCredentials) -> PanelResult<SaveOutcome<WifiStatus>> {
        self.save_credentials(credentials).await
    }

    fn identifier(status: &WifiStatus) -> &str {
        &status.ssid
    }

    fn badge(status: &WifiStatus) -> StatusBadge {
        if status.connected {
            StatusBadge::ok("Connected")
        } else {
            StatusBadge::error("Not Connected")
        }
    }
}

impl ConfirmSave for WifiHandler {
    fn confirmation_message(&self) -> &'static str {
        "This action will restart the device and attempt to connect with the provided \
         credentials. You will not have access to this panel during the restart."
    }
}

#[async_trait]
impl CredentialDomain for OnlineGoHandler {
    type Status = LoginState;
    type Credentials = OnlineGoCredentials;

    fn name(&self) -> &'static str {
        "online-go"
    }

    async fn fetch(&self) -> PanelResult<LoginState> {
        self.status().await
    }

    fn credentials(
        &self,
        identifier: &str,
        password: SecretString,
    ) -> PanelResult<OnlineGoCredentials> {
        OnlineGoCredentials::from_secret(identifier, password)
    }

    async fn submit(
        &self,
        credentials: &OnlineGoCredentials,
    ) -> PanelResult<SaveOutcome<LoginState>> {
        self.login(credentials).await.map(SaveOutcome::Applied)
    }

    fn identifier(status: &LoginState) -> &str {
        status.username()
    }

    fn badge(status: &LoginState) -> StatusBadge {
        StatusBadge {
            text: status.badge_text(),
            is_error: !status.is_authorized(),
        }
    }

    fn is_accepted(status: &LoginState) -> bool {
        status.is_authorized()
    }
}

impl DirectSave for OnlineGoHandler {}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use reqwest::{Method, StatusCode};
    use serde_json::{json, Value};

    use super::*;
    use crate::client::{DeviceRequest, DeviceResponse, Transport};
    use crate::models::online_go::OnlineGoStatus;
    use crate::models::password::PasswordHint;
    use crate::{BoardClient, PanelError};

    /// Answers requests from a queue and records everything it is sent.
    #[derive(Clone, Default)]
    struct FakeDevice {
        requests: Arc<Mutex<Vec<DeviceRequest>>>,
        responses: Arc<Mutex<VecDeque<DeviceResponse>>>,
    }

    impl FakeDevice {
        fn respond(&self, status: u16, body: Value) -> &Self {
            self.responses.lock().unwrap().push_back(DeviceResponse::new(
                StatusCode::from_u16(status).unwrap(),
                body.to_string(),
            ));
            self
        }

        fn requests(&self) -> Vec<DeviceRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn posts(&self) -> Vec<DeviceRequest> {
            self.requests()
                .into_iter()
                .filter(|r| r.method == Method::POST)
                .collect()
        }

        fn client(&self) -> BoardClient {
            BoardClient::builder().transport(self.clone()).build().unwrap()
        }
    }

    #[async_trait]
    impl Transport for FakeDevice {
        async fn send(&self, request: DeviceRequest) -> PanelResult<DeviceResponse> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| PanelError::ApiError("no response queued".into()))
        }
    }

    fn wifi_status_body(connected: bool) -> Value {
        json!({
            "is_ok": true,
            "value": {
                "connected": connected,
                "ssid": "randomssid",
                "first_letter_of_password": "s",
                "length_of_password": 6
            }
        })
    }

    fn loaded_wifi_panel(device: &FakeDevice) -> WifiPanel {
        device.respond(200, wifi_status_body(true));
        let mut panel = WifiPanel::new(device.client().wifi());
        tokio_test::block_on(panel.refresh());
        panel
    }

    #[test]
    fn refresh_seeds_identifier_and_mask() {
        let device = FakeDevice::default();
        let panel = loaded_wifi_panel(&device);

        assert_eq!(panel.edits().identifier, "randomssid");
        assert_eq!(
            panel.status().and_then(WifiStatus::masked_password).as_deref(),
            Some("s*****")
        );
        assert_eq!(panel.badge(), StatusBadge::ok("Connected"));
        assert_eq!(device.requests()[0].path, "/wifi-status");
    }

    #[test]
    fn refresh_keeps_user_edited_identifier() {
        let device = FakeDevice::default();
        let mut panel = loaded_wifi_panel(&device);
        panel.edit_identifier("other-network");

        device.respond(200, wifi_status_body(false));
        tokio_test::block_on(panel.refresh());

        assert_eq!(panel.edits().identifier, "other-network");
        assert_eq!(panel.badge(), StatusBadge::error("Not Connected"));
    }

    #[test]
    fn cancelled_wifi_save_sends_nothing() {
        let device = FakeDevice::default();
        let mut panel = loaded_wifi_panel(&device);
        panel.edit_identifier("new-network");
        panel.edit_password("hunter22");

        let confirmation = panel.request_save();
        assert!(confirmation.message().contains("restart the device"));
        confirmation.cancel();

        assert!(device.posts().is_empty());
        assert_eq!(panel.edits().identifier, "new-network");
        assert_eq!(panel.edits().new_password().expose_secret(), "hunter22");
        assert!(matches!(panel.state(), SyncState::Loaded(_)));
    }

    #[test]
    fn confirmed_wifi_save_sends_one_post() {
        let device = FakeDevice::default();
        let mut panel = loaded_wifi_panel(&device);
        panel.edit_identifier("new-network");
        panel.edit_password("hunter22");

        device.respond(200, json!({ "is_ok": true, "value": null }));
        let state = tokio_test::block_on(panel.request_save().confirm());

        assert_eq!(state, SyncState::PendingRestart);
        assert_eq!(
            device.posts(),
            vec![DeviceRequest {
                method: Method::POST,
                path: "/save-wifi-credentials".into(),
                body: Some(json!({ "ssid": "new-network", "password": "hunter22" })),
            }]
        );
        assert_eq!(panel.edits().new_password().expose_secret(), "");
        assert_eq!(panel.badge(), StatusBadge::ok("Restarting"));
    }

    #[test]
    fn failed_save_keeps_edits() {
        let device = FakeDevice::default();
        let mut panel = loaded_wifi_panel(&device);
        panel.edit_password("hunter22");

        device.respond(500, json!({ "is_ok": false, "value": "nvs write failed" }));
        let state = tokio_test::block_on(panel.request_save().confirm());

        match state {
            SyncState::SaveError { message, status } => {
                assert_eq!(message, "API error: nvs write failed");
                assert_eq!(status.map(|s| s.ssid).as_deref(), Some("randomssid"));
            }
            other => panic!("expected save error, got {other:?}"),
        }
        assert_eq!(panel.edits().new_password().expose_secret(), "hunter22");
        assert_eq!(panel.badge(), StatusBadge::error("Unknown Error"));
    }

    #[test]
    fn invalid_edits_fail_without_request() {
        let device = FakeDevice::default();
        let mut panel = OnlineGoPanel::new(device.client().online_go());
        panel.edit_identifier("cade");

        let state = tokio_test::block_on(panel.save());

        assert!(matches!(state, SyncState::SaveError { message, .. } if message == "Invalid input: Password is required"));
        assert!(device.requests().is_empty());
    }

    #[test]
    fn no_saved_account_is_a_loaded_state() {
        let device = FakeDevice::default();
        device.respond(511, json!({ "is_ok": false, "value": null }));
        let mut panel = OnlineGoPanel::new(device.client().online_go());

        let state = tokio_test::block_on(panel.refresh());

        assert_eq!(state, SyncState::Loaded(LoginState::NoSavedAccount));
        assert_eq!(panel.badge(), StatusBadge::error("No Saved Account"));
        assert_eq!(panel.edits().identifier, "");
    }

    #[test]
    fn login_acknowledged_without_status_is_refetched() {
        let device = FakeDevice::default();
        device
            .respond(511, json!({ "is_ok": false, "value": null }))
            .respond(200, json!({ "is_ok": true, "value": null }))
            .respond(
                200,
                json!({
                    "is_ok": true,
                    "value": {
                        "authorized": true,
                        "username": "cade",
                        "first_letter_of_password": "R",
                        "length_of_password": 8
                    }
                }),
            );
        let mut panel = OnlineGoPanel::new(device.client().online_go());
        tokio_test::block_on(panel.refresh());
        panel.edit_identifier("cade");
        panel.edit_password("Rosalind");

        let state = tokio_test::block_on(panel.save());

        assert_eq!(
            state,
            SyncState::Loaded(LoginState::Authorized(OnlineGoStatus {
                authorized: true,
                username: "cade".into(),
                hint: PasswordHint::new(Some("R"), 8),
            }))
        );
        let paths: Vec<_> = device.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/online-go-status", "/online-go-login", "/online-go-status"]);
        assert_eq!(panel.badge(), StatusBadge::ok("Authorized"));
        assert_eq!(panel.edits().new_password().expose_secret(), "");
    }

    #[test]
    fn rejected_login_replaces_status() {
        let device = FakeDevice::default();
        device.respond(
            401,
            json!({ "is_ok": false, "value": "invalid_grant -> Invalid credentials given." }),
        );
        let mut panel = OnlineGoPanel::new(device.client().online_go());
        panel.edit_identifier("cade");
        panel.edit_password("wrong");

        let state = tokio_test::block_on(panel.save());

        assert_eq!(state, SyncState::Loaded(LoginState::Unauthorized(OnlineGoStatus::default())));
        assert_eq!(panel.badge(), StatusBadge::error("Incorrect Login Information"));
    }

    #[test]
    fn rejected_login_keeps_edits() {
        let device = FakeDevice::default();
        device.respond(
            401,
            json!({ "is_ok": false, "value": "invalid_grant -> Invalid credentials given." }),
        );
        let mut panel = OnlineGoPanel::new(device.client().online_go());
        panel.edit_identifier("cade");
        panel.edit_password("wrongpw");

        tokio_test::block_on(panel.save());

        assert_eq!(panel.edits().identifier, "cade");
        assert_eq!(panel.edits().new_password().expose_secret(), "wrongpw");
        assert_eq!(panel.status(), Some(&LoginState::Unauthorized(OnlineGoStatus::default())));

        // A later refresh must not overwrite the typed username.
        device.respond(401, json!({ "is_ok": false, "value": null }));
        tokio_test::block_on(panel.refresh());
        assert_eq!(panel.edits().identifier, "cade");
    }

    #[test]
    fn subscribers_see_final_state() {
        let device = FakeDevice::default();
        device.respond(503, json!("busy"));
        let mut panel = WifiPanel::new(device.client().wifi());
        let receiver = panel.subscribe();

        tokio_test::block_on(panel.refresh());

        assert_eq!(
            *receiver.borrow(),
            SyncState::LoadError("Unexpected status code: 503 Service Unavailable".into())
        );
        assert_eq!(panel.badge(), StatusBadge::error("Unknown Error"));
    }

    #[test]
    fn failed_refresh_drops_stale_status() {
        let device = FakeDevice::default();
        let mut panel = loaded_wifi_panel(&device);
        assert!(panel.status().is_some());

        device.respond(503, json!("busy"));
        let state = tokio_test::block_on(panel.refresh());

        assert!(matches!(state, SyncState::LoadError(_)));
        assert!(panel.status().is_none());
        assert_eq!(panel.edits().identifier, "randomssid");
    }
}
