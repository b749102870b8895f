use std::env;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret_key: String,
    pub issuer: String,
    pub access_token_expiry: i64, // seconds
}

impl JwtConfig {
    fn parse_expiry(key: &str, default: &str) -> i64 {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<i64>()
            .unwrap_or_else(|_| panic!("Invalid {} value", key))
    }

    /// Reads `JWT_SECRET`, `JWT_ACCESS_EXPIRY` and `JWT_ISSUER`. Panics on
    /// a missing or weak secret.
    pub fn from_env() -> Self {
        let secret_key = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        // HS256 wants at least 32 bytes of key.
        if secret_key.len() < 32 {
            panic!("JWT_SECRET must be at least 32 characters long for HS256 algorithm");
        }

        let access_token_expiry = Self::parse_expiry("JWT_ACCESS_EXPIRY", "3600");
        if access_token_expiry <= 0 || access_token_expiry > 86400 {
            panic!("JWT_ACCESS_EXPIRY must be between 1 and 86400 seconds (24 hours)");
        }

        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "folio_cms".to_string());

        Self {
            secret_key,
            issuer,
            access_token_expiry,
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            secret_key: "test-secret-key-that-is-long-enough-for-hs256".to_string(),
            issuer: "folio_cms_test".to_string(),
            access_token_expiry: 3600,
        }
    }
}
