// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the owning user's username.
    pub sub: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Issues and validates the service's bearer tokens.
///
/// Keys and validation rules are built once at startup from `Config`. The
/// signing secret is shared-key (HMAC family); `exp` is enforced with zero
/// leeway so a token is invalid the moment its lifetime elapses.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    lifetime_minutes: i64,
}

impl TokenService {
    pub fn new(secret: &str, algorithm: Algorithm, lifetime_minutes: i64) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            header: Header::new(algorithm),
            validation,
            lifetime_minutes,
        }
    }

    /// Panics when JWT_ALGORITHM names an algorithm jsonwebtoken does not
    /// know; a misconfigured signer must never come up.
    pub fn from_config(config: &Config) -> Self {
        let algorithm = config
            .jwt_algorithm
            .parse()
            .expect("JWT_ALGORITHM must name a supported signing algorithm");

        Self::new(&config.jwt_secret, algorithm, config.token_expiry_minutes)
    }

    /// Signs a new token for the given subject, expiring `lifetime_minutes`
    /// from now.
    pub fn issue(&self, subject: &str) -> Result<String, AppError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(e.to_string()))?
            .as_secs() as i64;
        let expiration = (now + self.lifetime_minutes * 60) as usize;

        let claims = Claims {
            sub: subject.to_owned(),
            exp: expiration,
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Verifies signature, structure and expiry, and returns the `Claims`.
    /// A missing or empty subject is rejected like any other invalid token.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::InvalidToken)?;

        if token_data.claims.sub.is_empty() {
            return Err(AppError::InvalidToken);
        }

        Ok(token_data.claims)
    }
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the 'Authorization: Bearer <token>' header.
/// If valid, injects `Claims` into the request extensions for handlers to use.
/// If invalid, returns 401 Unauthorized.
pub async fn auth_middleware(
    State(tokens): State<TokenService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return Err(AppError::InvalidToken),
    };

    let claims = tokens.validate(token)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
