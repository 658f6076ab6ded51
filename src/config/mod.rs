use std::env;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::apply_security_headers;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
const DEFAULT_GENAI_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GENAI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub genai_api_url: String,
    pub genai_api_key: Option<String>,
    pub genai_model: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/tunewave".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_HOURS),
            genai_api_url: env::var("GENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_GENAI_API_URL.to_string()),
            genai_api_key: env::var("GENAI_API_KEY").ok(),
            genai_model: env::var("GENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GENAI_MODEL.to_string()),
        }
    }
}
