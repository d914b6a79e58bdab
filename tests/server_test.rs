//! Server integration tests
//!
//! Tests for scrape handling and HTTP endpoints against a fake Redfish
//! controller.

use ilo_exporter::config::{Config, IloConfig, ServerConfig};
use ilo_exporter::error::ExporterError;
use ilo_exporter::ilo::IloClient;
use ilo_exporter::server::{self, resolve_identity, router, AppState};
use ilo_exporter::telemetry::Identity;
use mockito::{Mock, ServerGuard};

const AUTHORIZATION: &str = "Basic YWRtaW46cGFzc3dvcmQ="; // admin:password

const SYSTEM: &str = r#"{
    "Model": "ProLiant DL360 Gen10",
    "SerialNumber": "CZJ1234567",
    "Status": {"Health": "OK", "HealthRollup": "OK", "State": "Enabled"},
    "Oem": {"Hpe": {"AggregateHealthStatus": {
        "PowerSupplies": {"Status": {"Health": "Warning"}},
        "Fans": {"Status": {"Health": "OK"}}
    }}}
}"#;

const THERMAL: &str = r#"{
    "Fans": [
        {"Name": "Fan 1", "Reading": 23, "Status": {"Health": "OK", "State": "Enabled"}},
        {"Name": "Fan 2", "Reading": 27, "Status": {"Health": "OK", "State": "Enabled"}}
    ],
    "Temperatures": [
        {"Name": "01-Inlet Ambient", "ReadingCelsius": 21, "Status": {"Health": "OK", "State": "Enabled"}}
    ]
}"#;

const POWER: &str = r#"{
    "PowerControl": [{
        "PowerConsumedWatts": 155,
        "PowerMetrics": {"IntervalInMin": 20, "AverageConsumedWatts": 150,
                         "MinConsumedWatts": 140, "MaxConsumedWatts": 170}
    }]
}"#;

/// Helper to point a plain-HTTP client config at the fake controller
fn config_for(server: &ServerGuard) -> IloConfig {
    let host_with_port = server.host_with_port();
    let (host, port) = host_with_port
        .rsplit_once(':')
        .expect("mock server address has a port");

    let mut config = IloConfig::with_host(host);
    config.port = port.parse().expect("numeric port");
    config.use_tls = false;
    config.timeout_seconds = 5;
    config
}

async fn mock_json(server: &mut ServerGuard, path: &str, body: &str) -> Mock {
    server
        .mock("GET", path)
        .match_header("authorization", AUTHORIZATION)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

/// Helper to serve a healthy controller; the mocks live as long as the vec
async fn healthy_controller() -> (ServerGuard, Vec<Mock>) {
    let mut server = mockito::Server::new_async().await;
    let mocks = vec![
        mock_json(&mut server, "/redfish/v1/Systems/1/", SYSTEM).await,
        mock_json(&mut server, "/redfish/v1/Chassis/1/Thermal/", THERMAL).await,
        mock_json(&mut server, "/redfish/v1/Chassis/1/Power/", POWER).await,
    ];
    (server, mocks)
}

#[tokio::test]
async fn test_resolve_identity_from_redfish() {
    // Given: A reachable controller
    let (server, _mocks) = healthy_controller().await;
    let config = config_for(&server);

    // When: Resolving the identity at startup
    let (_client, identity) = resolve_identity(&config).await.expect("identity");

    // Then: Hostname is the configured host, the rest comes from the controller
    assert_eq!(identity.hostname, config.host);
    assert_eq!(identity.product_name, "ProLiant DL360 Gen10");
    assert_eq!(identity.serial_number.as_deref(), Some("CZJ1234567"));
}

#[tokio::test]
async fn test_scrape_renders_prometheus_format() {
    // Given: A healthy controller
    let (server, _mocks) = healthy_controller().await;
    let config = config_for(&server);
    let (client, identity) = resolve_identity(&config).await.unwrap();
    let state = AppState::new(client, identity);

    // When: Running one scrape
    let rendered = state.scrape().await.expect("scrape");

    // Then: Output is gauge exposition with the hpilo_ prefix
    assert!(rendered.contains("# HELP"), "Missing HELP comment");
    assert!(rendered.contains("# TYPE hpilo_fan_speed_percentage gauge"));
    assert!(!rendered.contains("hpilo_hpilo_"), "Namespace applied twice");

    assert!(rendered.contains("fan=\"Fan 1\""));
    assert!(rendered.contains("component=\"power_supplies\""));
    assert!(rendered.contains("serial_number=\"CZJ1234567\""));
    assert!(rendered.contains("hpilo_temperature_celsius"));
    assert!(rendered.contains("hpilo_power_reading_watts"));
    assert!(rendered.contains("interval_minutes=\"20\""));
}

#[tokio::test]
async fn test_rejected_credentials_are_auth_error() {
    // Given: A controller that rejects every request
    let mut server = mockito::Server::new_async().await;
    let _rejected = server
        .mock("GET", mockito::Matcher::Any)
        .with_status(401)
        .create_async()
        .await;
    let client = IloClient::new(&config_for(&server)).unwrap();

    // When: Fetching telemetry
    let result = client.fetch_snapshot().await;

    // Then: The failure is classified as authentication
    assert!(matches!(result, Err(ExporterError::Auth(_))));
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _system = mock_json(&mut server, "/redfish/v1/Systems/1/", "<html>not json</html>").await;
    let client = IloClient::new(&config_for(&server)).unwrap();

    let result = client.product_info().await;

    assert!(matches!(result, Err(ExporterError::Parse(_))));
}

#[tokio::test]
async fn test_resolve_identity_fails_on_server_error() {
    // Given: A controller whose system resource errors
    let mut server = mockito::Server::new_async().await;
    let _system = server
        .mock("GET", "/redfish/v1/Systems/1/")
        .with_status(500)
        .create_async()
        .await;

    // When: Resolving the identity
    let result = resolve_identity(&config_for(&server)).await;

    // Then: Startup fails with context naming the host
    let message = format!("{:#}", result.err().expect("startup error"));
    assert!(message.contains("Failed to resolve identity"));
}

#[tokio::test]
async fn test_resolve_identity_fails_when_unreachable() {
    let mut config = IloConfig::with_host("127.0.0.1");
    config.port = 1;
    config.use_tls = false;
    config.timeout_seconds = 2;

    assert!(resolve_identity(&config).await.is_err());
}

#[tokio::test]
async fn test_start_fails_before_binding_without_identity() {
    // Given: A controller that cannot be reached
    let mut ilo = IloConfig::with_host("127.0.0.1");
    ilo.port = 1;
    ilo.use_tls = false;
    ilo.timeout_seconds = 2;
    let config = Config {
        ilo,
        server: ServerConfig {
            addr: "127.0.0.1".to_string(),
            port: 0,
        },
    };

    // When: Starting the exporter
    let result = server::start(config).await;

    // Then: Startup returns the identity failure instead of serving
    let message = format!("{:#}", result.err().expect("startup error"));
    assert!(message.contains("Failed to resolve identity"));
}

/// Helper to serve the router on an ephemeral port
async fn serve(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_http_endpoints() {
    // Given: The exporter serving a healthy controller
    let (controller, _mocks) = healthy_controller().await;
    let (client, identity) = resolve_identity(&config_for(&controller)).await.unwrap();
    let base = serve(AppState::new(client, identity)).await;

    // When/Then: Each endpoint answers
    let metrics = reqwest::get(format!("{}/metrics", base)).await.unwrap();
    assert_eq!(metrics.status(), 200);
    let content_type = metrics
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"));
    assert!(metrics.text().await.unwrap().contains("hpilo_fan_speed_percentage"));

    let health = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(health.status(), 200);
    assert_eq!(health.text().await.unwrap(), "OK");

    let root = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(root.status(), 200);
    assert!(root.text().await.unwrap().contains("/metrics"));
}

#[tokio::test]
async fn test_failed_scrape_is_service_unavailable() {
    // Given: A controller whose power resource breaks after startup
    let mut controller = mockito::Server::new_async().await;
    let _system = mock_json(&mut controller, "/redfish/v1/Systems/1/", SYSTEM).await;
    let _thermal = mock_json(&mut controller, "/redfish/v1/Chassis/1/Thermal/", THERMAL).await;
    let _power = controller
        .mock("GET", "/redfish/v1/Chassis/1/Power/")
        .with_status(500)
        .create_async()
        .await;
    let (client, identity) = resolve_identity(&config_for(&controller)).await.unwrap();
    let base = serve(AppState::new(client, identity)).await;

    // When: Scraping
    let response = reqwest::get(format!("{}/metrics", base)).await.unwrap();

    // Then: Only that scrape fails, the exporter keeps serving
    assert_eq!(response.status(), 503);
    let body = response.text().await.unwrap();
    assert!(!body.contains("hpilo_fan_speed_percentage"));

    let health = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(health.status(), 200);
}

#[tokio::test]
async fn test_scrapes_are_independent() {
    // Given: Two scrapes of the same controller
    let (server, _mocks) = healthy_controller().await;
    let (client, identity) = resolve_identity(&config_for(&server)).await.unwrap();
    let state = AppState::new(client, identity);

    // When: Scraping concurrently
    let (first, second) = tokio::join!(state.scrape(), state.scrape());

    // Then: Both see the same telemetry
    assert_eq!(first.unwrap(), second.unwrap());
}

#[test]
fn test_identity_drops_blank_serial() {
    let identity = Identity::new("ilo01", "ProLiant", Some("  ".to_string()));
    assert!(identity.serial_number.is_none());
}
