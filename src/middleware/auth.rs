//! Bearer-token authentication. Session mechanics live outside this core:
//! all this middleware does is turn a valid JWT into a [`Principal`]
//! request extension for the handlers and services to consume.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::policy::{Principal, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

impl Claims {
    /// Resolves the token claims into a Principal. The subject must be a
    /// UUID and the role one of the recognized values.
    pub fn principal(&self) -> Option<Principal> {
        let id = Uuid::parse_str(&self.sub).ok()?;
        let role = Role::parse(self.role.as_deref()?)?;
        Some(Principal::new(id, role))
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "message": message})),
    )
        .into_response()
}

pub async fn authenticate(mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("Access denied. No token provided.");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("Access denied. No token provided.");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("Access denied. No token provided.");
    };

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => data,
        Err(_) => return unauthorized("Invalid token."),
    };

    let Some(principal) = data.claims.principal() else {
        return unauthorized("Invalid token.");
    };

    req.extensions_mut().insert(principal);
    next.run(req).await
}
