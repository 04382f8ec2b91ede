// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Passing score applied when a certification is created without one.
pub const DEFAULT_PASSING_SCORE: i32 = 70;

/// Time limit in minutes stamped on every recorded exam attempt.
pub const DEFAULT_ATTEMPT_TIME_LIMIT_MINUTES: i32 = 30;

/// Number of questions served when a sampling request omits `count`.
pub const DEFAULT_SAMPLE_COUNT: i64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_algorithm: String,
    pub token_expiry_minutes: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_algorithm = env::var("JWT_ALGORITHM")
            .unwrap_or_else(|_| "HS256".to_string());

        let token_expiry_minutes = env::var("JWT_EXPIRATION_MINUTES")
            .ok()
            .map(|v| v.parse().expect("JWT_EXPIRATION_MINUTES must be an integer"))
            .unwrap_or(30);

        let port = env::var("PORT")
            .ok()
            .map(|v| v.parse().expect("PORT must be a valid port number"))
            .unwrap_or(8080);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_algorithm,
            token_expiry_minutes,
            port,
            rust_log,
        }
    }
}
