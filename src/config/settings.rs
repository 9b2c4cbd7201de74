//! Application settings loaded from environment variables.

use std::env;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, FIELD_KEY_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    field_key: [u8; FIELD_KEY_LENGTH],
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("field_key", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if `FIELD_ENCRYPTION_KEY` is missing or malformed in a release
    /// build. PII columns are unreadable without the right key, so refusing
    /// to start beats silently encrypting with a throwaway one.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let field_key = match env::var("FIELD_ENCRYPTION_KEY") {
            Ok(encoded) => Self::decode_field_key(&encoded)
                .unwrap_or_else(|msg| panic!("FIELD_ENCRYPTION_KEY invalid: {}", msg)),
            Err(_) => {
                if cfg!(debug_assertions) {
                    tracing::warn!(
                        "FIELD_ENCRYPTION_KEY not set, using insecure default for development"
                    );
                    [0x42; FIELD_KEY_LENGTH]
                } else {
                    panic!("FIELD_ENCRYPTION_KEY environment variable must be set in production");
                }
            }
        };

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            field_key,
        }
    }

    /// AES-256 key for reversible encryption of PII columns.
    pub fn field_key(&self) -> &[u8; FIELD_KEY_LENGTH] {
        &self.field_key
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    fn decode_field_key(encoded: &str) -> Result<[u8; FIELD_KEY_LENGTH], String> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| format!("not valid base64: {}", e))?;
        let len = bytes.len();
        bytes
            .try_into()
            .map_err(|_| format!("expected {} key bytes, got {}", FIELD_KEY_LENGTH, len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_field_key_accepts_32_bytes() {
        let encoded = STANDARD.encode([7u8; 32]);
        let key = Config::decode_field_key(&encoded).unwrap();
        assert_eq!(key, [7u8; 32]);
    }

    #[test]
    fn decode_field_key_rejects_short_keys() {
        let encoded = STANDARD.encode([7u8; 16]);
        assert!(Config::decode_field_key(&encoded).is_err());
    }
}
