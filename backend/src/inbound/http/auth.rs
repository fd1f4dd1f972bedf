//! Authentication: login/logout handlers and actor resolution.
//!
//! Keep the resource modules focused on request/response mapping by
//! concentrating credential checks and actor derivation here. The uniform
//! `invalid credentials` message deliberately hides whether the email exists,
//! the password was wrong or the account is deactivated.

use actix_web::{HttpResponse, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{AccountRepository as _, PasswordHasher as _};
use crate::domain::{Account, EmailAddress, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts::AccountResponse;
use crate::inbound::http::error::map_account_storage_error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::FieldErrors;

/// Login request body for `POST /api/login`.
///
/// Example JSON: `{"email":"admin@clinic.test","password":"hunter2..."}`
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email address.
    pub email: String,
    /// Plaintext password, verified against the stored hash.
    pub password: String,
}

/// Resolve the authenticated actor for the current request.
///
/// Returns `401 Unauthorized` when no session is present, when the session
/// references an account that no longer exists, or when the account has been
/// deactivated.
pub async fn require_actor(state: &HttpState, session: &SessionContext) -> Result<Account, Error> {
    let id = session.require_account_id()?;
    let account = state
        .accounts
        .find_by_id(id)
        .await
        .map_err(map_account_storage_error)?;
    match account {
        Some(account) if account.is_active() => Ok(account),
        _ => Err(Error::unauthorized("login required")),
    }
}

/// Authenticate an account and establish a session.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AccountResponse,
         headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = crate::domain::DomainError),
        (status = 401, description = "Invalid credentials", body = crate::domain::DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AccountResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let password = Zeroizing::new(password);

    let mut errors = FieldErrors::new();
    if email.trim().is_empty() {
        errors.push("email", "email must not be empty");
    }
    if password.is_empty() {
        errors.push("password", "password must not be empty");
    }
    errors.finish()?;

    let email =
        EmailAddress::new(&email).map_err(|_| Error::unauthorized("invalid credentials"))?;
    let account = state
        .accounts
        .find_by_email(&email)
        .await
        .map_err(map_account_storage_error)?
        .ok_or_else(|| Error::unauthorized("invalid credentials"))?;

    let verified = account
        .password_hash()
        .is_some_and(|hash| state.hasher.verify(hash, &password));
    if !verified || !account.is_active() {
        return Err(Error::unauthorized("invalid credentials"));
    }

    let mut account = account;
    let now = Utc::now();
    account.record_login(now);
    account.touch(now);
    state
        .accounts
        .update(&account)
        .await
        .map_err(map_account_storage_error)?;

    session.persist_account(account.id())?;
    tracing::info!(account_id = %account.id(), "login succeeded");
    Ok(web::Json(AccountResponse::from_account(&account)))
}

/// Drop the current session.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}
