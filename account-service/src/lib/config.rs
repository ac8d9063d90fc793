use std::env;
use std::time::Duration;

use auth::PasswordError;
use auth::PasswordHasher;
use auth::WorkFactor;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use secrecy::ExposeSecret;
use secrecy::SecretString;
use serde::Deserialize;
use serde::Deserializer;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub token: TokenConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Without a URL the service keeps accounts in memory.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        5
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: Self::default_max_connections(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenConfig {
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret: SecretString,
    /// Token lifetime; `None` issues tokens without `exp`.
    pub expiration_hours: Option<i64>,
}

impl TokenConfig {
    /// Upper bound for `expiration_hours`: ten years.
    pub const MAX_EXPIRATION_HOURS: i64 = 10 * 365 * 24;

    pub fn ttl(&self) -> Option<chrono::Duration> {
        self.expiration_hours.and_then(chrono::Duration::try_hours)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub timeout_ms: u64,
}

impl PasswordConfig {
    pub fn hasher(&self) -> Result<PasswordHasher, PasswordError> {
        PasswordHasher::with_work_factor(WorkFactor {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        })
        .map(|hasher| hasher.with_timeout(Duration::from_millis(self.timeout_ms)))
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let work_factor = WorkFactor::default();
        Self {
            memory_kib: work_factor.memory_kib,
            iterations: work_factor.iterations,
            parallelism: work_factor.parallelism,
            timeout_ms: PasswordHasher::DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LookupConfig {
    pub timeout_ms: u64,
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self { timeout_ms: 3000 }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. `PORT`, for `server.http_port` only
    /// 2. Environment variables (TOKEN__SECRET, SERVER__HTTP_PORT, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    ///
    /// A missing or empty `token.secret` is an error: the service must not
    /// start without a signing secret.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: TOKEN__SECRET=... overrides token.secret
            .add_source(Environment::default().separator("__"));

        let configuration = with_port_override(configuration, env::var("PORT").ok())?.build()?;

        Self::from_source(configuration)
    }

    /// Deserialize and validate an already assembled configuration.
    pub fn from_source(configuration: ConfigBuilder) -> Result<Self, ConfigError> {
        let config: Config = configuration.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.token.secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::Message(
                "token.secret must be set to a non-empty value".to_string(),
            ));
        }
        if matches!(
            self.token.expiration_hours,
            Some(hours) if hours <= 0 || hours > TokenConfig::MAX_EXPIRATION_HOURS
        ) {
            return Err(ConfigError::Message(format!(
                "token.expiration_hours must be between 1 and {} when set",
                TokenConfig::MAX_EXPIRATION_HOURS
            )));
        }
        Ok(())
    }
}

/// Apply a bare `PORT` value on top of every other source.
fn with_port_override(
    builder: config::builder::ConfigBuilder<DefaultState>,
    port: Option<String>,
) -> Result<config::builder::ConfigBuilder<DefaultState>, ConfigError> {
    builder.set_override_option("server.http_port", port)
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Config::from_source(configuration)
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = from_toml(
            r#"
            [server]
            http_port = 3090

            [token]
            secret = "test-secret-key-for-jwt-signing-at-least-32-bytes"
            expiration_hours = 24
            "#,
        )
        .expect("config should load");

        assert_eq!(config.server.http_port, 3090);
        assert!(config.database.url.is_none());
        assert_eq!(config.token.ttl(), Some(chrono::Duration::hours(24)));
        assert_eq!(config.password.memory_kib, 19_456);
        assert_eq!(config.lookup.timeout(), Duration::from_secs(3));
        assert!(config.password.hasher().is_ok());
    }

    #[test]
    fn test_port_variable_overrides_file() {
        let builder = ConfigBuilder::builder().add_source(File::from_str(
            r#"
            [server]
            http_port = 3090

            [token]
            secret = "test-secret-key-for-jwt-signing-at-least-32-bytes"
            "#,
            FileFormat::Toml,
        ));

        let configuration = with_port_override(builder, Some("8080".to_string()))
            .unwrap()
            .build()
            .unwrap();
        let config = Config::from_source(configuration).unwrap();

        assert_eq!(config.server.http_port, 8080);
    }

    #[test]
    fn test_port_variable_absent_keeps_file_value() {
        let builder = ConfigBuilder::builder().add_source(File::from_str(
            r#"
            [server]
            http_port = 3090

            [token]
            secret = "test-secret-key-for-jwt-signing-at-least-32-bytes"
            "#,
            FileFormat::Toml,
        ));

        let configuration = with_port_override(builder, None).unwrap().build().unwrap();
        let config = Config::from_source(configuration).unwrap();

        assert_eq!(config.server.http_port, 3090);
    }

    #[test]
    fn test_expiration_hours_bounds() {
        for hours in ["0", "-1", "87601", "9223372036854775807"] {
            let result = from_toml(&format!(
                r#"
                [server]
                http_port = 3090

                [token]
                secret = "test-secret-key-for-jwt-signing-at-least-32-bytes"
                expiration_hours = {}
                "#,
                hours
            ));
            assert!(result.is_err(), "expiration_hours = {}", hours);
        }

        let config = from_toml(
            r#"
            [server]
            http_port = 3090

            [token]
            secret = "test-secret-key-for-jwt-signing-at-least-32-bytes"
            expiration_hours = 87600
            "#,
        )
        .unwrap();
        assert_eq!(config.token.ttl(), Some(chrono::Duration::hours(87_600)));
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let result = from_toml(
            r#"
            [server]
            http_port = 3090

            [token]
            expiration_hours = 24
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_secret_is_fatal() {
        let result = from_toml(
            r#"
            [server]
            http_port = 3090

            [token]
            secret = "   "
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_secret_is_not_printed() {
        let config = from_toml(
            r#"
            [server]
            http_port = 3090

            [token]
            secret = "super-secret-signing-key"
            "#,
        )
        .unwrap();

        assert!(config.token.ttl().is_none());
        assert!(!format!("{:?}", config).contains("super-secret-signing-key"));
    }
}
