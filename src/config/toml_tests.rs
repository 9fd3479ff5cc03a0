//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.request.url.is_none());
        assert!(config.client.base_url.is_none());
        assert!(config.client.headers.is_empty());
        assert!(!config.mock.enabled);
    }

    #[test]
    fn parse_client_section() {
        let toml = r#"
            [client]
            base_url = "https://api.example.com/"
            timeout = 2500
            bearer = "secret-token"

            [client.headers]
            X-Custom-Header = "custom-value"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let client = &config.client;

        assert_eq!(client.base_url.as_deref(), Some("https://api.example.com/"));
        assert_eq!(client.timeout, Some(2500));
        assert_eq!(client.bearer.as_deref(), Some("secret-token"));
        assert_eq!(
            client.headers.get("X-Custom-Header").map(String::as_str),
            Some("custom-value")
        );
    }

    #[test]
    fn parse_request_section() {
        let toml = r#"
            [request]
            url = "users/1"
            method = "PATCH"
            body = '{"name": "ferris"}'
            abort_after = 750
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.request.url.as_deref(), Some("users/1"));
        assert_eq!(config.request.method.as_deref(), Some("PATCH"));
        assert_eq!(config.request.body.as_deref(), Some(r#"{"name": "ferris"}"#));
        assert_eq!(config.request.abort_after, Some(750));
    }

    #[test]
    fn parse_mock_section() {
        let toml = r#"
            [mock]
            enabled = true
            delay = 100
            status = 503
            body = "down"
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert!(config.mock.enabled);
        assert_eq!(config.mock.delay, Some(100));
        assert_eq!(config.mock.status, Some(503));
        assert_eq!(config.mock.body.as_deref(), Some("down"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml = r#"
            [request]
            url = "x"
            retries = 3
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(TomlConfig::parse("[webhook]\nurl = \"x\"").is_err());
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(TomlConfig::parse("[client]\ntimeout = \"fast\"").is_err());
    }
}

mod template {
    use super::*;

    #[test]
    fn template_parses() {
        let template = default_config_template();

        let config = TomlConfig::parse(&template).unwrap();

        assert_eq!(config.client.timeout, Some(5000));
        assert!(config.request.url.is_none());
    }

    #[test]
    fn template_documents_every_section() {
        let template = default_config_template();

        assert!(template.contains("[client]"));
        assert!(template.contains("[request]"));
        assert!(template.contains("[mock]"));
        assert!(template.contains("base_url"));
        assert!(template.contains("abort_after"));
    }
}

mod file_loading {
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn load_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [request]
            url = "https://example.com"
        "#
        )
        .unwrap();

        let config = TomlConfig::load(file.path()).unwrap();
        assert_eq!(config.request.url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let path = Path::new("nonexistent_config_file_12345.toml");
        let result = TomlConfig::load(path);

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn load_invalid_toml_file_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        let result = TomlConfig::load(file.path());

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}
