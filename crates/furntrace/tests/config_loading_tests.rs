//! Table-driven tests for configuration loading and validation.

use std::io::Write;

use furntrace::config::{load_config, load_config_from_str, load_or_default, LogFormat};

/// Represents a single config loading test case.
struct ConfigTestCase {
    /// Test case name for identification.
    name: &'static str,
    /// The config YAML content to test.
    config_yaml: &'static str,
    /// Whether loading should succeed.
    should_succeed: bool,
    /// Expected error substring (if should_succeed is false).
    expected_error: Option<&'static str>,
}

const YAML_CONFIG_TESTS: &[ConfigTestCase] = &[
    ConfigTestCase {
        name: "empty_means_defaults",
        config_yaml: "",
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "partial_section",
        config_yaml: "server:\n  port: 9090\n",
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "zero_port",
        config_yaml: "server:\n  port: 0\n",
        should_succeed: false,
        expected_error: Some("server.port"),
    },
    ConfigTestCase {
        name: "blank_host",
        config_yaml: "server:\n  host: '  '\n",
        should_succeed: false,
        expected_error: Some("server.host"),
    },
    ConfigTestCase {
        name: "zero_scan_attempts",
        config_yaml: "scan:\n  max_attempts: 0\n",
        should_succeed: false,
        expected_error: Some("scan.max_attempts"),
    },
    ConfigTestCase {
        name: "zero_busy_timeout",
        config_yaml: "database:\n  busy_timeout_ms: 0\n",
        should_succeed: false,
        expected_error: Some("database.busy_timeout_ms"),
    },
    ConfigTestCase {
        name: "unknown_log_format",
        config_yaml: "logging:\n  format: xml\n",
        should_succeed: false,
        expected_error: Some("parse"),
    },
    ConfigTestCase {
        name: "port_out_of_range",
        config_yaml: "server:\n  port: 70000\n",
        should_succeed: false,
        expected_error: None,
    },
];

#[test]
fn test_yaml_config_loading() {
    for test_case in YAML_CONFIG_TESTS {
        let result = load_config_from_str(test_case.config_yaml);

        if test_case.should_succeed {
            assert!(
                result.is_ok(),
                "Test '{}': Expected success but got error: {:?}",
                test_case.name,
                result.err()
            );
        } else {
            assert!(
                result.is_err(),
                "Test '{}': Expected error but got success",
                test_case.name
            );

            if let Some(expected_error) = test_case.expected_error {
                let error_msg = result.err().unwrap().to_string();
                assert!(
                    error_msg.contains(expected_error),
                    "Test '{}': Expected error containing '{}', got '{}'",
                    test_case.name,
                    expected_error,
                    error_msg
                );
            }
        }
    }
}

#[test]
fn test_config_defaults_applied() {
    let config = load_config_from_str("logging:\n  level: warn\n").unwrap();

    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.scan.max_attempts, 5);
    assert_eq!(config.database.busy_timeout_ms, 5000);
    assert!(config.database.path.is_none());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "server:\n  host: 127.0.0.1\n  port: 3000").unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);

    let explicit = load_or_default(Some(file.path())).unwrap();
    assert_eq!(explicit.server.port, 3000);
}

#[test]
fn test_missing_file_reports_path() {
    let err = load_config("/nonexistent/furntrace.yaml").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/furntrace.yaml"));
}
