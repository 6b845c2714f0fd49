use crate::config::Config;
use crate::errors::ApiError;
use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use argon2::password_hash::{PasswordHash, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use futures_util::future::{Ready, err, ok};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "token";
const SESSION_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: usize,
}

pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|_| ApiError::Internal)?
        .to_string())
}

pub fn verify_password(hash: &str, plain: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// Issues a session token carrying the user id, valid for a fixed 24
/// hours from now. The window never slides.
pub fn create_session_token(user_id: &str, cfg: &Config) -> Result<String, ApiError> {
    let exp = (Utc::now() + Duration::hours(SESSION_HOURS)).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret_bytes()),
    )
    .map_err(|_| ApiError::Internal)
}

/// Checks signature and expiry only; whether the user still exists is the
/// caller's concern.
pub fn verify_session_token(token: &str, cfg: &Config) -> Result<Claims, ApiError> {
    let mut v = Validation::new(Algorithm::HS256);
    v.validate_exp = true;
    v.leeway = 0;
    jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(cfg.jwt_secret_bytes()), &v)
        .map(|data| data.claims)
        .map_err(|_| ApiError::Unauthorized)
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::hours(SESSION_HOURS))
        .finish()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .finish()
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(cfg) = req.app_data::<actix_web::web::Data<Config>>() else {
            return err(ApiError::Internal);
        };
        if let Some(cookie) = req.cookie(SESSION_COOKIE) {
            if let Ok(claims) = verify_session_token(cookie.value(), cfg) {
                return ok(AuthUser {
                    user_id: claims.sub,
                });
            }
        }
        err(ApiError::Unauthorized)
    }
}
