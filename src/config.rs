use std::fmt;

use time::{Duration, OffsetDateTime};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Session token signing settings.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_seconds: i64,
    pub refresh_ttl_days: i64,
}

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub platform: String,
    pub polka_key: String,
    pub file_path_root: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Reads the environment (after an optional `.env`). Every missing
    /// required variable is reported at once.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid value for PORT: {e}"))?,
            None => 8080,
        };

        let mut missing = Vec::new();
        let mut required = |name: &'static str| {
            non_empty(name).unwrap_or_else(|| {
                missing.push(name);
                String::new()
            })
        };
        let database_url = required("DB_URL");
        let polka_key = required("POLKA_KEY");
        let secret = required("TOKEN_SECRET");

        if !missing.is_empty() {
            anyhow::bail!("missing required env vars: {}", missing.join(", "));
        }

        let ttl_seconds = parsed_or("TOKEN_TTL_SECONDS", 60 * 60)?;
        ensure_representable("TOKEN_TTL_SECONDS", Some(ttl_seconds))?;
        let refresh_ttl_days = parsed_or("REFRESH_TOKEN_TTL_DAYS", 60)?;
        ensure_representable(
            "REFRESH_TOKEN_TTL_DAYS",
            refresh_ttl_days.checked_mul(SECONDS_PER_DAY),
        )?;

        let jwt = JwtConfig {
            secret,
            ttl_seconds,
            refresh_ttl_days,
        };

        Ok(Self {
            port,
            database_url,
            platform: std::env::var("PLATFORM").unwrap_or_default(),
            polka_key,
            file_path_root: non_empty("FILEPATH_ROOT").unwrap_or_else(|| ".".into()),
            jwt,
        })
    }

    pub fn is_dev(&self) -> bool {
        self.platform == "dev"
    }
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parsed_or(name: &str, default: i64) -> anyhow::Result<i64> {
    match non_empty(name) {
        Some(raw) => {
            let value = raw
                .parse::<i64>()
                .map_err(|e| anyhow::anyhow!("invalid value for {name}: {e}"))?;
            anyhow::ensure!(value > 0, "{name} must be positive");
            Ok(value)
        }
        None => Ok(default),
    }
}

/// Expiry timestamps are computed as `now + ttl`; reject lifetimes that
/// cannot be added to the current time.
fn ensure_representable(name: &str, seconds: Option<i64>) -> anyhow::Result<()> {
    seconds
        .and_then(|s| OffsetDateTime::now_utc().checked_add(Duration::seconds(s)))
        .map(|_| ())
        .ok_or_else(|| anyhow::anyhow!("invalid value for {name}: lifetime too large"))
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("platform", &self.platform)
            .field("file_path_root", &self.file_path_root)
            .field("polka_key", &"<redacted>")
            .field("token_secret", &"<redacted>")
            .field("token_ttl_seconds", &self.jwt.ttl_seconds)
            .field("refresh_ttl_days", &self.jwt.refresh_ttl_days)
            .finish()
    }
}
