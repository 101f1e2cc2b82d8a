// Export submodules
pub mod games;
pub mod online_go;
pub mod wifi;

/// Device endpoint paths.
pub(crate) mod routes {
    pub const WIFI_STATUS: &str = "/wifi-status";
    pub const SAVE_WIFI_CREDENTIALS: &str = "/save-wifi-credentials";
    pub const ONLINE_GO_STATUS: &str = "/online-go-status";
    pub const ONLINE_GO_LOGIN: &str = "/online-go-login";
    pub const ONLINE_GO_GAMES_LIST: &str = "/online-go-games-list";
}
