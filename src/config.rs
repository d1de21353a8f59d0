use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Either a full `url` or the discrete connection parts. The URL wins when
/// both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: None,
            port: None,
            user: None,
            password: None,
            name: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

impl DatabaseConfig {
    /// Resolves the connection string used by the pool.
    pub fn connection_url(&self) -> AppResult<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(url.to_string());
        }

        let part = |value: &Option<String>, name: &str| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::ConfigError(format!(
                        "database.{name} is required when database.url is not set"
                    ))
                })
        };

        let host = part(&self.host, "host")?;
        let port = part(&self.port, "port")?;
        let user = part(&self.user, "user")?;
        let password = part(&self.password, "password")?;
        let name = part(&self.name, "name")?;

        Ok(format!(
            "postgres://{user}:{password}@{host}:{port}/{name}?sslmode=disable"
        ))
    }
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            // no file: defaults plus environment
            Err(e) if e.kind() == ErrorKind::NotFound => Config {
                server: ServerConfig::default(),
                database: DatabaseConfig::default(),
            },
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "cannot read config file {config_path}: {e}"
                )));
            }
        };

        config.apply_env_overrides();

        // fail at startup rather than on first connect
        config.database.connection_url()?;

        Ok(config)
    }

    pub fn parse(config_str: &str) -> AppResult<Self> {
        toml::from_str(config_str)
            .map_err(|e| AppError::ConfigError(format!("failed to parse config file: {e}")))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("DB_HOST") {
            self.database.host = Some(v);
        }
        if let Ok(v) = env::var("DB_PORT") {
            self.database.port = Some(v);
        }
        if let Ok(v) = env::var("DB_USER") {
            self.database.user = Some(v);
        }
        if let Ok(v) = env::var("DB_PASSWORD") {
            self.database.password = Some(v);
        }
        if let Ok(v) = env::var("DB_NAME") {
            self.database.name = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = Config::parse("[database]\nurl = \"postgres://localhost/subs\"\n").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(
            config.database.connection_url().unwrap(),
            "postgres://localhost/subs"
        );
    }

    #[test]
    fn test_connection_url_from_parts() {
        let config = Config::parse(
            r#"
            [server]
            port = 9000

            [database]
            host = "db"
            port = "5432"
            user = "subs"
            password = "secret"
            name = "subscriptions"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.database.connection_url().unwrap(),
            "postgres://subs:secret@db:5432/subscriptions?sslmode=disable"
        );
    }

    #[test]
    fn test_connection_url_missing_part() {
        let database = DatabaseConfig {
            host: Some("db".into()),
            port: Some("5432".into()),
            user: Some("subs".into()),
            ..Default::default()
        };
        assert!(matches!(
            database.connection_url(),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(Config::parse("server = [").is_err());
    }
}
