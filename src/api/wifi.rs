use log::info;
use reqwest::Method;

use super::routes;
use crate::models::wifi::{WifiCredentials, WifiStatus};
use crate::models::SaveOutcome;
use crate::{BoardClient, PanelResult};

/// Provides methods for reading and replacing the device's Wi-Fi
/// credentials.
#[derive(Debug, Clone)]
pub struct WifiHandler {
    client: BoardClient,
}

impl WifiHandler {
    /// Creates a new Wi-Fi API instance.
    ///
    /// This method is intended for internal use by the device client.
    pub(crate) fn new(client: BoardClient) -> Self {
        Self { client }
    }

    /// Fetches the current Wi-Fi status.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::ApiError`](crate::PanelError::ApiError) when the device
    /// answers with an error envelope, and
    /// [`PanelError::UnexpectedStatus`](crate::PanelError::UnexpectedStatus)
    /// for non-2xx answers without one.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(client: &goboard_panel::BoardClient) -> goboard_panel::PanelResult<()> {
    /// let status = client.wifi().status().await?;
    /// println!(
    ///     "{} ({})",
    ///     status.ssid,
    ///     if status.connected { "Connected" } else { "Not Connected" }
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub async fn status(&self) -> PanelResult<WifiStatus> {
        self.client
            .request(Method::GET, routes::WIFI_STATUS, None::<()>)
            .await
    }

    /// Stores new Wi-Fi credentials on the device.
    ///
    /// The firmware restarts to apply new credentials, so the panel loses
    /// its connection right after a successful save. An ok answer without
    /// a status yields [`SaveOutcome::Restarting`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(client: &goboard_panel::BoardClient) -> goboard_panel::PanelResult<()> {
    /// use goboard_panel::WifiCredentials;
    ///
    /// let creds = WifiCredentials::new("home-network", "correct horse")?;
    /// client.wifi().save_credentials(&creds).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn save_credentials(
        &self,
        credentials: &WifiCredentials,
    ) -> PanelResult<SaveOutcome<WifiStatus>> {
        let status: Option<WifiStatus> = self
            .client
            .request(
                Method::POST,
                routes::SAVE_WIFI_CREDENTIALS,
                Some(credentials.to_body()),
            )
            .await?;

        info!("Saved Wi-Fi credentials for {}", credentials.ssid());

        Ok(match status {
            Some(status) => SaveOutcome::Applied(status),
            None => SaveOutcome::Restarting,
        })
    }
}
