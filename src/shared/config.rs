use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

/// Process-wide settings read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub contact_endpoint: String,
    pub contact_access_key: Option<String>,
    pub media_bucket: Option<String>,
    pub reconcile_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").expect("HOST is not set in .env file");
        let port = env::var("PORT")
            .expect("PORT is not set in .env file")
            .parse::<u16>()
            .expect("Invalid PORT");

        let store_backend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse::<StoreBackend>()
            .unwrap_or_else(|e| panic!("Invalid STORE_BACKEND: {e}"));

        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            panic!("DATABASE_URL is not set in .env file");
        }

        let contact_endpoint = env::var("CONTACT_ENDPOINT")
            .unwrap_or_else(|_| "https://api.web3forms.com/submit".to_string());

        let reconcile_secs = env::var("RECONCILE_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .expect("Invalid RECONCILE_INTERVAL_SECS");

        Self {
            host,
            port,
            store_backend,
            database_url,
            contact_endpoint,
            contact_access_key: env::var("CONTACT_ACCESS_KEY").ok(),
            media_bucket: env::var("MEDIA_BUCKET").ok(),
            reconcile_interval: Duration::from_secs(reconcile_secs),
        }
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
