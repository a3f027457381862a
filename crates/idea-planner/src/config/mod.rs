use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_GENERATION_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_GENERATION_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_GENERATION_API_VERSION: &str = "2023-06-01";
const DEFAULT_BOOKING_URL: &str = "https://calendly.com/design1st/consultation";
const DEFAULT_RESOURCES_URL: &str = "https://www.design1st.com/resources";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub generation: GenerationConfig,
    pub links: CallToActionLinks,
    /// How long an assembled plan stays downloadable.
    pub report_retention: Duration,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let api_key = env::var("CLAUDE_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let max_tokens = u32::try_from(parse_number("GENERATION_MAX_TOKENS", 4000)?)
            .map_err(|_| ConfigError::InvalidNumber {
                key: "GENERATION_MAX_TOKENS",
            })?;
        let timeout_secs = parse_number("GENERATION_TIMEOUT_SECS", 60)?;
        let retention_secs = parse_number("PLANNER_REPORT_RETENTION_SECS", 86_400)?;

        let generation = GenerationConfig {
            api_key,
            endpoint: env::var("GENERATION_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GENERATION_ENDPOINT.to_string()),
            model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_MODEL.to_string()),
            api_version: env::var("GENERATION_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_GENERATION_API_VERSION.to_string()),
            max_tokens,
            timeout: Duration::from_secs(timeout_secs),
        };

        let links = CallToActionLinks {
            booking_url: env::var("PLANNER_BOOKING_URL")
                .unwrap_or_else(|_| DEFAULT_BOOKING_URL.to_string()),
            resources_url: env::var("PLANNER_RESOURCES_URL")
                .unwrap_or_else(|_| DEFAULT_RESOURCES_URL.to_string()),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            generation,
            links,
            report_retention: Duration::from_secs(retention_secs),
        })
    }
}

fn parse_number(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or(ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Outbound generation service settings.
///
/// A missing credential is not a load failure; the first generation attempt
/// reports it instead.
#[derive(Clone)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub api_version: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_version", &self.api_version)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Destinations for the two call-to-action variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallToActionLinks {
    pub booking_url: String,
    pub resources_url: String,
}

impl Default for CallToActionLinks {
    fn default() -> Self {
        Self {
            booking_url: DEFAULT_BOOKING_URL.to_string(),
            resources_url: DEFAULT_RESOURCES_URL.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
