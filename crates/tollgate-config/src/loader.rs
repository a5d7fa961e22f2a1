use std::path::Path;

use secrecy::ExposeSecret;

use crate::{Config, StoreConfig};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a referenced environment
    /// variable is missing, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], minus file access
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server()?;
        self.validate_store()?;
        self.validate_upstream()?;
        self.validate_ledger()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if self.server.max_body_bytes == 0 {
            anyhow::bail!("server.max_body_bytes must be greater than 0");
        }

        Ok(())
    }

    fn validate_store(&self) -> anyhow::Result<()> {
        if let StoreConfig::Redis(ref redis) = self.store {
            if !matches!(redis.url.scheme(), "redis" | "rediss") {
                anyhow::bail!("store.url must use the redis:// or rediss:// scheme");
            }
            if redis.connect_timeout == 0 {
                anyhow::bail!("store.connect_timeout must be greater than 0");
            }
        }

        Ok(())
    }

    fn validate_upstream(&self) -> anyhow::Result<()> {
        let upstream = &self.upstream;

        if upstream.api_key.expose_secret().trim().is_empty() {
            anyhow::bail!("upstream.api_key must not be empty");
        }

        if upstream.timeout()?.is_zero() {
            anyhow::bail!("upstream.timeout must be greater than 0");
        }

        if upstream.model.is_empty() {
            anyhow::bail!("upstream.model must not be empty");
        }

        if !upstream.temperature.is_finite() {
            anyhow::bail!("upstream.temperature must be a finite number");
        }

        Ok(())
    }

    fn validate_ledger(&self) -> anyhow::Result<()> {
        if let Some(minimum) = self.ledger.minimum_balance
            && !minimum.is_finite()
        {
            anyhow::bail!("ledger.minimum_balance must be a finite number");
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        let Some(ref telemetry) = self.telemetry else {
            return Ok(());
        };

        if !(0.0..=1.0).contains(&telemetry.tracing.sampling_rate) {
            anyhow::bail!("telemetry.tracing.sampling_rate must be between 0 and 1");
        }

        if let Some(ref exporter) = telemetry.exporter
            && exporter.metrics_interval()?.is_zero()
        {
            anyhow::bail!("telemetry.exporter.metrics_interval must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;
    use std::time::Duration;

    use secrecy::ExposeSecret;

    use crate::{Config, ExportProtocol, StoreConfig};

    const MINIMAL: &str = r#"
[upstream]
url = "https://api.openai.com/v1/completions"
api_key = "sk-test"
"#;

    #[test]
    fn minimal_config_applies_defaults() {
        let config = Config::parse(MINIMAL).unwrap();

        assert_eq!(config.server.listen_address().to_string(), "0.0.0.0:8000");
        assert!(!config.server.uniform_error_status);
        assert_eq!(config.server.max_body_bytes, 2 * 1024 * 1024);
        assert!(config.server.health.enabled);
        assert_eq!(config.server.health.path, "/health");

        let StoreConfig::Redis(redis) = &config.store else {
            panic!("expected redis store by default");
        };
        assert_eq!(redis.url.as_str(), "redis://127.0.0.1:6379");

        assert_eq!(config.upstream.timeout().unwrap(), Duration::from_secs(10));
        assert_eq!(config.upstream.model, "gpt-3.5-turbo");
        assert!((config.upstream.temperature - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.upstream.max_tokens, 100);
        assert!(config.ledger.minimum_balance.is_none());
        assert!(config.telemetry.is_none());
    }

    #[test]
    fn full_config_with_env_placeholders() {
        let raw = r#"
[server]
listen_address = "127.0.0.1:9000"
uniform_error_status = true

[server.health]
path = "/healthz"

[store]
type = "memory"

[upstream]
url = "{{ env.TOLLGATE_TEST_OPENAI_URL }}"
api_key = "{{ env.TOLLGATE_TEST_OPENAI_KEY }}"
timeout = "750ms"
model = "gpt-4o-mini"
max_tokens = 256

[ledger]
minimum_balance = 0.0
"#;

        let vars = [
            ("TOLLGATE_TEST_OPENAI_URL", Some("http://localhost:4000/v1/completions")),
            ("TOLLGATE_TEST_OPENAI_KEY", Some("sk-live")),
        ];

        temp_env::with_vars(vars, || {
            let config = Config::parse(raw).unwrap();

            assert_eq!(config.server.listen_address().to_string(), "127.0.0.1:9000");
            assert!(config.server.uniform_error_status);
            assert_eq!(config.server.health.path, "/healthz");
            assert!(matches!(config.store, StoreConfig::Memory));
            assert_eq!(config.upstream.url.as_str(), "http://localhost:4000/v1/completions");
            assert_eq!(config.upstream.api_key.expose_secret(), "sk-live");
            assert_eq!(config.upstream.timeout().unwrap(), Duration::from_millis(750));
            assert_eq!(config.upstream.model, "gpt-4o-mini");
            assert_eq!(config.upstream.max_tokens, 256);
            assert_eq!(config.ledger.minimum_balance, Some(0.0));
        });
    }

    #[test]
    fn missing_upstream_section_is_rejected() {
        let err = Config::parse("[server]\nuniform_error_status = true\n").unwrap_err();
        assert!(err.to_string().contains("upstream"));
    }

    #[test]
    fn missing_api_key_variable_is_rejected() {
        temp_env::with_var_unset("TOLLGATE_TEST_OPENAI_KEY", || {
            let raw = "[upstream]\nurl = \"http://u\"\napi_key = \"{{ env.TOLLGATE_TEST_OPENAI_KEY }}\"\n";
            let err = Config::parse(raw).unwrap_err();
            assert!(err.to_string().contains("TOLLGATE_TEST_OPENAI_KEY"));
        });
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let raw = "[upstream]\nurl = \"http://u\"\napi_key = \"  \"\n";
        let err = Config::parse(raw).unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn malformed_timeout_is_rejected() {
        let raw = "[upstream]\nurl = \"http://u\"\napi_key = \"k\"\ntimeout = \"soon\"\n";
        let err = Config::parse(raw).unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = format!("{MINIMAL}\n[ledger]\nfloor = 1.0\n");
        assert!(Config::parse(&raw).is_err());
    }

    #[test]
    fn non_redis_store_url_is_rejected() {
        let raw = format!("{MINIMAL}\n[store]\ntype = \"redis\"\nurl = \"http://localhost:6379\"\n");
        let err = Config::parse(&raw).unwrap_err();
        assert!(err.to_string().contains("store.url"));
    }

    #[test]
    fn telemetry_section_applies_defaults() {
        let raw = format!(
            "{MINIMAL}\n[telemetry]\n[telemetry.exporter]\nendpoint = \"http://localhost:4317\"\n"
        );
        let config = Config::parse(&raw).unwrap();

        let telemetry = config.telemetry.unwrap();
        assert_eq!(telemetry.service_name, "tollgate");
        assert!(telemetry.tracing.parent_based);
        let exporter = telemetry.exporter.unwrap();
        assert_eq!(exporter.protocol, ExportProtocol::Grpc);
        assert_eq!(exporter.metrics_interval().unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn sampling_rate_out_of_range_is_rejected() {
        let raw = format!("{MINIMAL}\n[telemetry.tracing]\nsampling_rate = 1.5\n");
        let err = Config::parse(&raw).unwrap_err();
        assert!(err.to_string().contains("sampling_rate"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.upstream.api_key.expose_secret(), "sk-test");
    }

    #[test]
    fn load_missing_file_fails() {
        let err = Config::load(std::path::Path::new("/nonexistent/tollgate.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
