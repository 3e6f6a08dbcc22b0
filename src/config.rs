use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_days: i64,
}

/// Argon2 cost parameters. Defaults match the argon2 crate defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub hashing: HashConfig,
    /// Session cookies carry `Secure` only when this is set.
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_days: std::env::var("JWT_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };
        let defaults = HashConfig::default();
        let hashing = HashConfig {
            memory_kib: std::env::var("HASH_MEMORY_KIB")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.memory_kib),
            iterations: std::env::var("HASH_ITERATIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.iterations),
            parallelism: std::env::var("HASH_PARALLELISM")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.parallelism),
        };
        let cookie_secure = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);
        Ok(Self {
            database_url,
            jwt,
            hashing,
            cookie_secure,
        })
    }
}
