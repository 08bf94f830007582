use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: i64 = 12;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Recipes per page on the listing endpoint.
    pub page_size: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "recipefinder".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "recipefinder-customers".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let page_size = page_size_from(std::env::var("RECIPES_PAGE_SIZE").ok().as_deref());
        Ok(Self {
            database_url,
            jwt,
            page_size,
        })
    }
}

fn page_size_from(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_defaults_when_missing_or_invalid() {
        assert_eq!(page_size_from(None), DEFAULT_PAGE_SIZE);
        assert_eq!(page_size_from(Some("abc")), DEFAULT_PAGE_SIZE);
        assert_eq!(page_size_from(Some("0")), DEFAULT_PAGE_SIZE);
        assert_eq!(page_size_from(Some("-4")), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn page_size_accepts_positive_values() {
        assert_eq!(page_size_from(Some("24")), 24);
        assert_eq!(page_size_from(Some(" 5 ")), 5);
    }
}
