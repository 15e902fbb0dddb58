use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRole {
    Candidates,
    Attachments,
    Gateway,
}

impl FromStr for ServiceRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "candidates" | "candidatos" => Ok(ServiceRole::Candidates),
            "attachments" | "adjuntos" => Ok(ServiceRole::Attachments),
            "gateway" => Ok(ServiceRole::Gateway),
            other => Err(format!(
                "unknown role '{}', expected candidates, attachments or gateway",
                other
            )),
        }
    }
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceRole::Candidates => "candidates",
            ServiceRole::Attachments => "attachments",
            ServiceRole::Gateway => "gateway",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Timeout and retry budget applied to every peer-service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerSettings {
    pub timeout: Duration,
    /// Extra attempts for idempotent GETs after the first one fails.
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for PeerSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(3000),
            max_retries: 2,
            retry_backoff: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub role: ServiceRole,
    pub server_address: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub attachment_service_url: Option<Url>,
    pub candidate_service_url: Option<Url>,
    pub peer: PeerSettings,
    /// `None` means any origin.
    pub cors_allowed_origins: Option<Vec<String>>,
    pub log_format: LogFormat,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let role: ServiceRole = get_env_parse("SERVICE_ROLE")?;
        let defaults = PeerSettings::default();

        let config = Self {
            role,
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env_opt("DATABASE_URL"),
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            attachment_service_url: get_env_url("ATTACHMENT_SERVICE_URL")?,
            candidate_service_url: get_env_url("CANDIDATE_SERVICE_URL")?,
            peer: PeerSettings {
                timeout: Duration::from_millis(get_env_parse_or(
                    "PEER_TIMEOUT_MS",
                    defaults.timeout.as_millis() as u64,
                )?),
                max_retries: get_env_parse_or("PEER_MAX_RETRIES", defaults.max_retries)?,
                retry_backoff: Duration::from_millis(get_env_parse_or(
                    "PEER_RETRY_BACKOFF_MS",
                    defaults.retry_backoff.as_millis() as u64,
                )?),
            },
            cors_allowed_origins: parse_origins(get_env_opt("CORS_ALLOWED_ORIGINS").as_deref()),
            log_format: get_env_parse_or("LOG_FORMAT", LogFormat::Text)?,
        };
        config.check_role_requirements()?;
        Ok(config)
    }

    fn check_role_requirements(&self) -> Result<()> {
        match self.role {
            ServiceRole::Candidates => Ok(()),
            ServiceRole::Attachments => {
                self.require_candidate_service_url()?;
                Ok(())
            }
            ServiceRole::Gateway => {
                self.require_candidate_service_url()?;
                self.require_attachment_service_url()?;
                Ok(())
            }
        }
    }

    pub fn require_candidate_service_url(&self) -> Result<&Url> {
        self.candidate_service_url.as_ref().ok_or_else(|| {
            Error::Config(format!(
                "CANDIDATE_SERVICE_URL is required for the {} role",
                self.role
            ))
        })
    }

    pub fn require_attachment_service_url(&self) -> Result<&Url> {
        self.attachment_service_url.as_ref().ok_or_else(|| {
            Error::Config(format!(
                "ATTACHMENT_SERVICE_URL is required for the {} role",
                self.role
            ))
        })
    }
}

/// Comma separated origins; empty or `*` allows any origin.
pub fn parse_origins(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == "*" {
        return None;
    }
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if origins.is_empty() {
        None
    } else {
        Some(origins)
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

fn get_env_url(name: &str) -> Result<Option<Url>> {
    get_env_opt(name)
        .map(|raw| {
            Url::parse(&raw).map_err(|e| Error::Config(format!("Invalid URL for {}: {}", name, e)))
        })
        .transpose()
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_wildcard_and_blank_mean_any() {
        assert_eq!(parse_origins(None), None);
        assert_eq!(parse_origins(Some("*")), None);
        assert_eq!(parse_origins(Some("  ")), None);
        assert_eq!(parse_origins(Some(" , ")), None);
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins(Some("http://localhost:4200, https://app.example.com")),
            Some(vec![
                "http://localhost:4200".to_string(),
                "https://app.example.com".to_string()
            ])
        );
    }

    #[test]
    fn role_accepts_english_and_spanish_names() {
        assert_eq!("candidatos".parse::<ServiceRole>(), Ok(ServiceRole::Candidates));
        assert_eq!("Attachments".parse::<ServiceRole>(), Ok(ServiceRole::Attachments));
        assert_eq!("gateway".parse::<ServiceRole>(), Ok(ServiceRole::Gateway));
        assert!("billing".parse::<ServiceRole>().is_err());
    }

    #[test]
    fn gateway_requires_both_upstreams() {
        let config = Config {
            role: ServiceRole::Gateway,
            server_address: "127.0.0.1:0".into(),
            database_url: None,
            database_max_connections: 10,
            attachment_service_url: None,
            candidate_service_url: Some(Url::parse("http://localhost:8081").unwrap()),
            peer: PeerSettings::default(),
            cors_allowed_origins: None,
            log_format: LogFormat::Text,
        };
        assert!(matches!(config.check_role_requirements(), Err(Error::Config(_))));
    }
}
