use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use hoso_core::AppError;
use tracing_subscriber::EnvFilter;

/// What the binary does after migrations have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCommand {
    Serve,
    Migrate,
    Seed,
}

impl ApiCommand {
    fn parse(argument: Option<&str>) -> Result<Self, AppError> {
        match argument {
            None | Some("serve") => Ok(Self::Serve),
            Some("migrate") => Ok(Self::Migrate),
            Some("seed") => Ok(Self::Seed),
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}', expected 'serve', 'migrate' or 'seed'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub command: ApiCommand,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub cookie_secure: bool,
    pub session_idle_minutes: i64,
    pub admin_role: String,
    pub invalidation_buffer: usize,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let argument = env::args().nth(1);
        Self::from_lookup(argument.as_deref(), |name| env::var(name).ok())
    }

    fn from_lookup(
        argument: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let command = ApiCommand::parse(argument)?;

        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))?;

        let database_max_connections =
            parsed_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10_u32)?.max(1);
        let acquire_timeout_secs = parsed_or(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", 5_u64)?;

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parsed_or(&lookup, "API_PORT", 3001_u16)?;
        let frontend_url = lookup("FRONTEND_URL")
            .map(|value| value.trim().trim_end_matches('/').to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "http://localhost:3000".to_owned());
        let cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|| "false".to_owned())
            .eq_ignore_ascii_case("true");
        let session_idle_minutes = parsed_or(&lookup, "SESSION_IDLE_MINUTES", 30_i64)?;
        if session_idle_minutes <= 0 {
            return Err(AppError::Validation(
                "SESSION_IDLE_MINUTES must be positive".to_owned(),
            ));
        }

        let admin_role = lookup("ADMIN_ROLE")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| hoso_application::DEFAULT_ADMIN_ROLE.to_owned());
        let invalidation_buffer = parsed_or(&lookup, "INVALIDATION_BUFFER", 256_usize)?;

        Ok(Self {
            command,
            database_url,
            database_max_connections,
            database_acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            api_host,
            api_port,
            frontend_url,
            cookie_secure,
            session_idle_minutes,
            admin_role,
            invalidation_buffer,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

// Unset or blank variables take the default; present but unparseable ones are rejected.
fn parsed_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
    }
}
