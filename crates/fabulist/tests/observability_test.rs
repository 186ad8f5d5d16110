use fabulist::observability::ObservabilityConfig;

#[test]
fn test_config_builders() {
    let config = ObservabilityConfig::new("fabulist-test")
        .with_version("9.9.9")
        .with_log_level("debug")
        .with_json_logs(true);

    assert_eq!(config.service_name, "fabulist-test");
    assert_eq!(config.service_version, "9.9.9");
    assert_eq!(config.log_level, "debug");
    assert!(config.json_logs);
}

#[test]
fn test_default_uses_package_name() {
    let config = ObservabilityConfig::default();

    assert_eq!(config.service_name, "fabulist");
    assert!(!config.json_logs);
}
