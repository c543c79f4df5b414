use std::path::PathBuf;

use chrono::Duration;

const DEFAULT_POOL_TTL_HOURS: i64 = 5;
const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// Directory for rolling log files; `None` keeps logs on stdout only.
    pub log_dir: Option<PathBuf>,
    pub pool: PoolSettings,
    pub rng_seed: Option<u64>,
}

/// How long a built pool stays fresh and how many forms a batch carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub ttl: Duration,
    pub batch_size: usize,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(DEFAULT_POOL_TTL_HOURS),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let file_logs = std::env::var("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let log_dir = file_logs.then(|| {
            std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./logs"))
        });

        let ttl = std::env::var("POOL_TTL_HOURS")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|hours| *hours > 0)
            .and_then(Duration::try_hours)
            .unwrap_or_else(|| Duration::hours(DEFAULT_POOL_TTL_HOURS));

        let batch_size = std::env::var("BATCH_SIZE")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(DEFAULT_BATCH_SIZE);

        let rng_seed = std::env::var("RNG_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok());

        Self {
            log_level,
            log_dir,
            pool: PoolSettings { ttl, batch_size },
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
            pool: PoolSettings::default(),
            rng_seed: None,
        }
    }
}
