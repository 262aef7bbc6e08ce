use crate::{config::AppConfig, services::SessionGate, utils::AppError};
use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    web, HttpResponse,
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Name of the cookie the web client keeps its credential in.
const TOKEN_COOKIE: &str = "token";

#[derive(Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    request_body(content = Object, description = "Claims to sign; must contain `email`"),
    responses(
        (status = 200, description = "Token valid for one hour", body = TokenResponse),
        (status = 400, description = "No email claim")
    )
)]
pub async fn issue_token(
    gate: web::Data<SessionGate>,
    payload: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    let email = payload.get("email").and_then(Value::as_str).unwrap_or("N/A").to_string();
    log::info!("🔐 POST /jwt - email: {}", email);

    let token = gate.issue(payload.into_inner())?;

    log::info!("✅ Token issued: {}", email);
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Clears the credential cookie. Tokens are not tracked server side, so a
/// token copied elsewhere stays valid until it expires.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses((status = 200, description = "Cookie cleared"))
)]
pub async fn logout(config: web::Data<AppConfig>, body: Option<web::Json<Value>>) -> HttpResponse {
    let caller = body
        .as_ref()
        .and_then(|body| body.get("email"))
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    log::info!("👋 POST /logout - {}", caller);

    HttpResponse::Ok()
        .cookie(removal_cookie(&config))
        .json(json!({ "success": true }))
}

fn removal_cookie(config: &AppConfig) -> Cookie<'static> {
    let same_site = if config.production { SameSite::None } else { SameSite::Strict };

    Cookie::build(TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(config.production)
        .same_site(same_site)
        .max_age(Duration::ZERO)
        .finish()
}
