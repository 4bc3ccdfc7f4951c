//! Application configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, PartialEq, Eq)]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value {:?} for {}: {}",
            self.value, self.var, self.reason
        )
    }
}

impl std::error::Error for ConfigError {}

/// SMTP settings; absent when `MAIL_SERVER` is not set.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub from_name: String,
}

/// Cloudinary credentials; absent unless all three variables are set.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub email_token_ttl_secs: i64,
    pub redis_url: Option<String>,
    pub user_cache_ttl_secs: u64,
    pub mail: Option<MailConfig>,
    pub cloudinary: Option<CloudinaryConfig>,
    pub upload_dir: String,
    pub cors_origins: Vec<String>,
    pub banned_ips: Vec<IpAddr>,
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let algorithm = parse_algorithm(&var("ALGORITHM", "HS256"))?;

        let mail = match optional("MAIL_SERVER") {
            Some(server) => {
                let username = var("MAIL_USERNAME", "");
                Some(MailConfig {
                    server,
                    port: parse("MAIL_PORT", &var("MAIL_PORT", "587"))?,
                    from: optional("MAIL_FROM").unwrap_or_else(|| username.clone()),
                    username,
                    password: var("MAIL_PASSWORD", ""),
                    from_name: var("MAIL_FROM_NAME", "Notebook"),
                })
            }
            None => None,
        };

        let cloudinary = match (
            optional("CLOUDINARY_NAME"),
            optional("CLOUDINARY_API_KEY"),
            optional("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        let banned_ips = split_list(&var("BANNED_IPS", ""))
            .into_iter()
            .map(|ip| parse::<IpAddr>("BANNED_IPS", &ip))
            .collect::<Result<Vec<_>, _>>()?;

        let rate_limit_requests: u32 =
            parse("RATE_LIMIT_REQUESTS", &var("RATE_LIMIT_REQUESTS", "20"))?;
        if rate_limit_requests == 0 {
            return Err(ConfigError {
                var: "RATE_LIMIT_REQUESTS",
                value: rate_limit_requests.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            server_host: var("SERVER_HOST", "127.0.0.1"),
            server_port: parse("SERVER_PORT", &var("SERVER_PORT", "8000"))?,
            mongodb_uri: var("MONGODB_URI", "mongodb://localhost:27017"),
            database_name: var("DATABASE_NAME", "notebook"),
            secret_key: var("SECRET_KEY", "secret_key"),
            algorithm,
            access_token_ttl_secs: parse(
                "ACCESS_TOKEN_TTL_SECONDS",
                &var("ACCESS_TOKEN_TTL_SECONDS", "86400"),
            )?,
            refresh_token_ttl_secs: parse(
                "REFRESH_TOKEN_TTL_SECONDS",
                &var("REFRESH_TOKEN_TTL_SECONDS", "604800"),
            )?,
            email_token_ttl_secs: parse(
                "EMAIL_TOKEN_TTL_SECONDS",
                &var("EMAIL_TOKEN_TTL_SECONDS", "86400"),
            )?,
            redis_url: optional("REDIS_URL"),
            user_cache_ttl_secs: parse(
                "USER_CACHE_TTL_SECONDS",
                &var("USER_CACHE_TTL_SECONDS", "900"),
            )?,
            mail,
            cloudinary,
            upload_dir: var("UPLOAD_DIR", "./uploads"),
            cors_origins: split_list(&var(
                "CORS_ORIGINS",
                "http://localhost:3000,http://localhost:63342",
            )),
            banned_ips,
            rate_limit_requests,
            rate_limit_window_secs: parse(
                "RATE_LIMIT_WINDOW_SECONDS",
                &var("RATE_LIMIT_WINDOW_SECONDS", "60"),
            )?,
        })
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

// Tokens are signed with a shared secret, so only HMAC algorithms make sense.
fn parse_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(value.trim()) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(ConfigError {
            var: "ALGORITHM",
            value: value.to_string(),
            reason: "expected one of HS256, HS384, HS512".to_string(),
        }),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
