use log::{info, warn};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::routes;
use crate::client::DeviceResponse;
use crate::models::envelope::Envelope;
use crate::models::online_go::{LoginState, OnlineGoCredentials, OnlineGoStatus};
use crate::{BoardClient, PanelError, PanelResult};

/// Provides methods for the online-go.com account stored on the device.
///
/// Unlike the Wi-Fi endpoints, "not logged in" is an expected answer here:
/// the firmware reports it through HTTP status codes, which this handler
/// turns into [`LoginState`] variants instead of errors.
#[derive(Debug, Clone)]
pub struct OnlineGoHandler {
    client: BoardClient,
}

impl OnlineGoHandler {
    /// Creates a new online-go API instance.
    ///
    /// This method is intended for internal use by the device client.
    pub(crate) fn new(client: BoardClient) -> Self {
        Self { client }
    }

    /// Fetches the login state of the stored account.
    ///
    /// * HTTP 511 maps to [`LoginState::NoSavedAccount`].
    /// * HTTP 401 maps to [`LoginState::Unauthorized`].
    /// * An ok envelope maps by its `authorized` flag.
    ///
    /// # Errors
    ///
    /// Any other answer is an error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(client: &goboard_panel::BoardClient) -> goboard_panel::PanelResult<()> {
    /// use goboard_panel::LoginState;
    ///
    /// match client.online_go().status().await? {
    ///     LoginState::Authorized(status) => println!("Logged in as {}", status.username),
    ///     LoginState::Unauthorized(_) => println!("Stored login was rejected"),
    ///     LoginState::NoSavedAccount => println!("No account saved"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn status(&self) -> PanelResult<LoginState> {
        let response = self
            .client
            .send(Method::GET, routes::ONLINE_GO_STATUS, None::<()>)
            .await?;

        classify(&response)?
            .ok_or_else(|| PanelError::ApiError("No account status returned from device".into()))
    }

    /// Stores a new online-go login on the device and returns the resulting
    /// login state.
    ///
    /// When the device acknowledges the login without a status, the status
    /// is fetched again so the result always comes from the device.
    pub async fn login(&self, credentials: &OnlineGoCredentials) -> PanelResult<LoginState> {
        let response = self
            .client
            .send(
                Method::POST,
                routes::ONLINE_GO_LOGIN,
                Some(credentials.to_body()),
            )
            .await?;

        let state = match classify(&response)? {
            Some(state) => state,
            None => self.status().await?,
        };

        if state.is_authorized() {
            info!("Online-go login saved for {}", credentials.username());
        } else {
            warn!("Online-go login for {} was not accepted: {}", credentials.username(), state);
        }

        Ok(state)
    }
}

/// Maps an online-go answer to a login state. `Ok(None)` means an ok
/// envelope that carried no status.
fn classify(response: &DeviceResponse) -> PanelResult<Option<LoginState>> {
    match response.status {
        StatusCode::NETWORK_AUTHENTICATION_REQUIRED => Ok(Some(LoginState::NoSavedAccount)),
        StatusCode::UNAUTHORIZED => {
            let mut status = rejected_status(response);
            status.authorized = false;
            Ok(Some(LoginState::Unauthorized(status)))
        }
        status if status.is_success() => {
            match response.envelope::<Option<OnlineGoStatus>>()? {
                Envelope::Ok(status) => Ok(status.map(LoginState::from_status)),
                Envelope::Err(payload) => Err(PanelError::ApiError(payload.message())),
            }
        }
        status => match response.envelope::<Value>() {
            Ok(Envelope::Err(payload)) => Err(PanelError::ApiError(payload.message())),
            _ => Err(PanelError::UnexpectedStatus(status)),
        },
    }
}

/// Reads whatever status a 401 answer carries. The firmware attaches
/// either the stored account or the online-go OAuth error here.
fn rejected_status(response: &DeviceResponse) -> OnlineGoStatus {
    let value = match response.envelope::<Value>() {
        Ok(Envelope::Ok(value)) => value,
        Ok(Envelope::Err(payload)) => payload.0,
        Err(_) => return OnlineGoStatus::default(),
    };
    serde_json::from_value(value).unwrap_or_default()
}
