use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_audience: String,
    pub messaging_service_url: String,
    pub messaging_service_token: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_audience: env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "tutoring-api".to_string()),
            messaging_service_url: env::var("MESSAGING_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/events".to_string()),
            messaging_service_token: env::var("MESSAGING_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
        }
    }
}
