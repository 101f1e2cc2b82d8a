use reqwest::{Method, StatusCode};

use super::routes;
use crate::models::envelope::Envelope;
use crate::models::game::GameSummary;
use crate::{BoardClient, PanelError, PanelResult};

/// Provides access to the games of the stored online-go account.
#[derive(Debug, Clone)]
pub struct GamesHandler {
    client: BoardClient,
}

impl GamesHandler {
    /// Creates a new games API instance.
    ///
    /// This method is intended for internal use by the device client.
    pub(crate) fn new(client: BoardClient) -> Self {
        Self { client }
    }

    /// Lists the games the stored account is currently playing.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NotAuthorized`] when the device has no valid
    /// online-go login.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(client: &goboard_panel::BoardClient) -> goboard_panel::PanelResult<()> {
    /// for game in client.games().list().await? {
    ///     println!("{}: {}", game.id, game.label());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self) -> PanelResult<Vec<GameSummary>> {
        let result: PanelResult<(StatusCode, Envelope<Vec<GameSummary>>)> = self
            .client
            .request_envelope(Method::GET, routes::ONLINE_GO_GAMES_LIST, None::<()>)
            .await;

        let (status, envelope) = match result {
            Err(PanelError::UnexpectedStatus(status)) if requires_login(status) => {
                return Err(PanelError::NotAuthorized)
            }
            other => other?,
        };

        if requires_login(status) {
            return Err(PanelError::NotAuthorized);
        }

        match envelope {
            Envelope::Ok(games) if status.is_success() => Ok(games),
            Envelope::Ok(_) => Err(PanelError::UnexpectedStatus(status)),
            Envelope::Err(payload) => Err(PanelError::ApiError(payload.message())),
        }
    }
}

fn requires_login(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::NETWORK_AUTHENTICATION_REQUIRED
}
