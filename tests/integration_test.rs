use ilo_exporter::config::{Config, Protocol};

#[test]
fn test_config_load() {
    // This assumes config/Default.toml exists relative to where cargo test is run
    let config_res = Config::load("config/Default.toml");
    assert!(config_res.is_ok(), "Failed to load default config");

    let config = config_res.unwrap();
    assert_eq!(config.ilo.protocol, Protocol::Http);
    assert_eq!(config.server.port, 9116);
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let config = Config::load("config/does-not-exist").expect("defaults");
    assert_eq!(config.ilo.port, 443);
    assert_eq!(config.server.addr, "0.0.0.0");
}
