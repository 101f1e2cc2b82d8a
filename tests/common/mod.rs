use goboard_panel::BoardClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a client pointed at the mock device.
#[allow(dead_code)]
pub fn setup_test_client(mock_server_uri: &str) -> BoardClient {
    BoardClient::builder()
        .device_url(mock_server_uri)
        .build()
        .expect("Failed to build BoardClient")
}

#[allow(dead_code)]
pub fn ok(value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "is_ok": true, "value": value }))
}

#[allow(dead_code)]
pub fn err(status: u16, value: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "is_ok": false, "value": value }))
}

#[allow(dead_code)]
pub fn wifi_status(connected: bool) -> Value {
    json!({
        "connected": connected,
        "ssid": "randomssid",
        "first_letter_of_password": "s",
        "length_of_password": 6
    })
}

#[allow(dead_code)]
pub fn online_go_status(authorized: bool) -> Value {
    json!({
        "authorized": authorized,
        "username": "cade",
        "first_letter_of_password": "R",
        "length_of_password": 20
    })
}

/// Mounts `GET /wifi-status` answering with a connected status.
#[allow(dead_code)]
pub async fn mount_wifi_status(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/wifi-status"))
        .respond_with(ok(wifi_status(true)))
        .mount(mock_server)
        .await;
}
