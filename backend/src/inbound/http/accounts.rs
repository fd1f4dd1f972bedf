//! Account resource handlers: `/api/users`.
//!
//! Two independent authorization layers guard every write, mirroring the
//! coarse-gate-plus-field-validation split in the domain policy:
//!
//! 1. the action-level gate (`can_perform_account_action`, plus
//!    `can_delete_account` for deletion) which denies with `403`, and
//! 2. field-level validation of the submitted `role` (`can_assign_role`)
//!    which denies with a `400` scoped to the `role` field.
//!
//! The role check always runs on the submitted value, even when an update
//! re-submits the target's current role unchanged.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::password::strength_violations;
use crate::domain::policy::{self, AccountAction};
use crate::domain::ports::{AccountPersistenceError, AccountRepository as _, PasswordHasher as _};
use crate::domain::{Account, AccountId, Error, NewAccount, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::error::map_account_storage_error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldErrors, non_blank, parse_email};

/// Account create/update request body.
///
/// One shape serves both operations: creation and full update require
/// `email`, `firstName`, `lastName` (plus `password` on creation), partial
/// update accepts any subset. Read-only fields (`id`, `dateJoined`,
/// `updatedAt`, `lastLogin`, `isStaff`, `isActive`) are not part of this
/// payload; submitting them is silently ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountPayload {
    /// Login email address.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Plaintext password; hashed before storage, never echoed.
    pub password: Option<String>,
    /// Role identifier: `admin`, `veterinarian` or `secretary`.
    pub role: Option<String>,
    /// Date of birth (ISO 8601).
    pub birth_date: Option<NaiveDate>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Street address line.
    pub street: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
}

/// Account representation returned by every read.
///
/// The password hash is structurally absent, not merely skipped.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// Primary key.
    pub id: Uuid,
    /// Login email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Assigned role, if any.
    pub role: Option<Role>,
    /// Human-readable role label, if a role is assigned.
    pub role_display: Option<String>,
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Street address line.
    pub street: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Whether the account may authenticate.
    pub is_active: bool,
    /// Back-office staff flag.
    pub is_staff: bool,
    /// Creation timestamp.
    pub date_joined: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Last successful login, if any.
    pub last_login: Option<DateTime<Utc>>,
}

impl AccountResponse {
    /// Project an account onto its wire representation.
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id().as_uuid(),
            email: account.email().as_str().to_owned(),
            first_name: account.first_name().to_owned(),
            last_name: account.last_name().to_owned(),
            role: account.role(),
            role_display: account.role().map(|role| role.display_label().to_owned()),
            birth_date: account.birth_date(),
            phone_number: account.phone_number().map(str::to_owned),
            street: account.street().map(str::to_owned),
            city: account.city().map(str::to_owned),
            zip_code: account.zip_code().map(str::to_owned),
            is_active: account.is_active(),
            is_staff: account.is_staff(),
            date_joined: account.date_joined(),
            updated_at: account.updated_at(),
            last_login: account.last_login(),
        }
    }
}

fn forbidden() -> Error {
    Error::forbidden("administrator role required")
}

fn account_not_found() -> Error {
    Error::not_found("account not found")
}

fn parse_account_id(raw: &str) -> Result<AccountId, Error> {
    raw.parse::<AccountId>().map_err(|_| account_not_found())
}

/// Validate a submitted role against the policy, recording field errors.
///
/// The policy is evaluated on the submitted value unconditionally; a
/// non-superuser re-submitting `admin` for an account that already holds it
/// is still rejected.
fn validate_role(
    errors: &mut FieldErrors,
    actor: &Account,
    submitted: Option<&str>,
) -> Option<Role> {
    let raw = submitted?;
    match raw.parse::<Role>() {
        Err(error) => {
            errors.push("role", error.to_string());
            None
        }
        Ok(role) => {
            if policy::can_assign_role(actor, role) {
                Some(role)
            } else {
                errors.push("role", "only a superuser may assign the administrator role");
                None
            }
        }
    }
}

fn validate_password(errors: &mut FieldErrors, candidate: &str) {
    for violation in strength_violations(candidate) {
        errors.push("password", violation.to_string());
    }
}

fn map_write_error(error: AccountPersistenceError) -> Error {
    match error {
        AccountPersistenceError::DuplicateEmail => {
            FieldErrors::single("email", "an account with this email already exists")
        }
        other => map_account_storage_error(other),
    }
}

/// List every account.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Accounts", body = [AccountResponse]),
        (status = 401, description = "Unauthorised", body = crate::domain::DomainError)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_accounts(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AccountResponse>>> {
    require_actor(&state, &session).await?;
    let accounts = state
        .accounts
        .list()
        .await
        .map_err(map_account_storage_error)?;
    Ok(web::Json(
        accounts.iter().map(AccountResponse::from_account).collect(),
    ))
}

/// Fetch a single account.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::DomainError),
        (status = 404, description = "Not found", body = crate::domain::DomainError)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<AccountResponse>> {
    require_actor(&state, &session).await?;
    let id = parse_account_id(&path)?;
    let account = state
        .accounts
        .find_by_id(id)
        .await
        .map_err(map_account_storage_error)?
        .ok_or_else(account_not_found)?;
    Ok(web::Json(AccountResponse::from_account(&account)))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = AccountPayload,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation failed", body = crate::domain::DomainError),
        (status = 401, description = "Unauthorised", body = crate::domain::DomainError),
        (status = 403, description = "Forbidden", body = crate::domain::DomainError)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AccountPayload>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    if !policy::can_perform_account_action(&actor, AccountAction::Create) {
        return Err(forbidden());
    }

    let AccountPayload {
        email,
        first_name,
        last_name,
        password,
        role,
        birth_date,
        phone_number,
        street,
        city,
        zip_code,
    } = payload.into_inner();
    let password = password.map(Zeroizing::new);

    let mut errors = FieldErrors::new();
    let email = match email.as_deref() {
        Some(raw) => parse_email(&mut errors, "email", raw),
        None => {
            errors.missing("email");
            None
        }
    };
    let first_name = match first_name.as_deref() {
        Some(raw) => non_blank(&mut errors, "firstName", raw, "first name must not be empty"),
        None => {
            errors.missing("firstName");
            None
        }
    };
    let last_name = match last_name.as_deref() {
        Some(raw) => non_blank(&mut errors, "lastName", raw, "last name must not be empty"),
        None => {
            errors.missing("lastName");
            None
        }
    };
    let role = validate_role(&mut errors, &actor, role.as_deref());
    match password.as_deref() {
        Some(candidate) => validate_password(&mut errors, candidate),
        None => errors.missing("password"),
    }
    errors.finish()?;

    let (Some(email), Some(first_name), Some(last_name), Some(password)) =
        (email, first_name, last_name, password)
    else {
        return Err(Error::internal("create validation invariant broken"));
    };

    let hash = state
        .hasher
        .hash(&password)
        .map_err(|error| Error::internal(format!("password hashing failed: {error}")))?;

    let details = NewAccount {
        email,
        first_name,
        last_name,
        role,
        password: Some(hash),
        birth_date,
        phone_number,
        street,
        city,
        zip_code,
    };
    let account = Account::create(details, Utc::now())
        .map_err(|error| Error::internal(format!("account construction failed: {error}")))?;

    state
        .accounts
        .insert(&account)
        .await
        .map_err(map_write_error)?;
    tracing::info!(account_id = %account.id(), actor_id = %actor.id(), "account created");
    Ok(HttpResponse::Created().json(AccountResponse::from_account(&account)))
}

async fn apply_update(
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
    payload: AccountPayload,
    action: AccountAction,
) -> ApiResult<web::Json<AccountResponse>> {
    let actor = require_actor(state, session).await?;
    if !policy::can_perform_account_action(&actor, action) {
        return Err(forbidden());
    }

    let id = parse_account_id(raw_id)?;
    let mut target = state
        .accounts
        .find_by_id(id)
        .await
        .map_err(map_account_storage_error)?
        .ok_or_else(account_not_found)?;

    let partial = action == AccountAction::PartialUpdate;
    let AccountPayload {
        email,
        first_name,
        last_name,
        password,
        role,
        birth_date,
        phone_number,
        street,
        city,
        zip_code,
    } = payload;
    let password = password.map(Zeroizing::new);

    let mut errors = FieldErrors::new();
    let email = match email.as_deref() {
        Some(raw) => parse_email(&mut errors, "email", raw),
        None => {
            if !partial {
                errors.missing("email");
            }
            None
        }
    };
    let first_name = match first_name.as_deref() {
        Some(raw) => non_blank(&mut errors, "firstName", raw, "first name must not be empty"),
        None => {
            if !partial {
                errors.missing("firstName");
            }
            None
        }
    };
    let last_name = match last_name.as_deref() {
        Some(raw) => non_blank(&mut errors, "lastName", raw, "last name must not be empty"),
        None => {
            if !partial {
                errors.missing("lastName");
            }
            None
        }
    };
    let role = validate_role(&mut errors, &actor, role.as_deref());
    if let Some(candidate) = password.as_deref() {
        validate_password(&mut errors, candidate);
    }
    errors.finish()?;

    if let Some(email) = email {
        target.set_email(email);
    }
    if let Some(first_name) = first_name {
        target.set_first_name(first_name);
    }
    if let Some(last_name) = last_name {
        target.set_last_name(last_name);
    }
    if let Some(role) = role {
        target.set_role(role);
    }
    if let Some(candidate) = password {
        let hash = state
            .hasher
            .hash(&candidate)
            .map_err(|error| Error::internal(format!("password hashing failed: {error}")))?;
        target.set_password(hash);
    }
    if let Some(birth_date) = birth_date {
        target.set_birth_date(birth_date);
    }
    if let Some(phone_number) = phone_number {
        target.set_phone_number(phone_number);
    }
    if let Some(street) = street {
        target.set_street(street);
    }
    if let Some(city) = city {
        target.set_city(city);
    }
    if let Some(zip_code) = zip_code {
        target.set_zip_code(zip_code);
    }
    target.touch(Utc::now());

    state
        .accounts
        .update(&target)
        .await
        .map_err(map_write_error)?;
    tracing::info!(account_id = %target.id(), actor_id = %actor.id(), "account updated");
    Ok(web::Json(AccountResponse::from_account(&target)))
}

/// Replace an account (full update).
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Account id")),
    request_body = AccountPayload,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 400, description = "Validation failed", body = crate::domain::DomainError),
        (status = 401, description = "Unauthorised", body = crate::domain::DomainError),
        (status = 403, description = "Forbidden", body = crate::domain::DomainError),
        (status = 404, description = "Not found", body = crate::domain::DomainError)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AccountPayload>,
) -> ApiResult<web::Json<AccountResponse>> {
    apply_update(
        &state,
        &session,
        &path,
        payload.into_inner(),
        AccountAction::Update,
    )
    .await
}

/// Modify part of an account.
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Account id")),
    request_body = AccountPayload,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 400, description = "Validation failed", body = crate::domain::DomainError),
        (status = 401, description = "Unauthorised", body = crate::domain::DomainError),
        (status = 403, description = "Forbidden", body = crate::domain::DomainError),
        (status = 404, description = "Not found", body = crate::domain::DomainError)
    ),
    tags = ["users"],
    operation_id = "patchUser"
)]
#[patch("/users/{id}")]
pub async fn patch_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AccountPayload>,
) -> ApiResult<web::Json<AccountResponse>> {
    apply_update(
        &state,
        &session,
        &path,
        payload.into_inner(),
        AccountAction::PartialUpdate,
    )
    .await
}

/// Remove an account.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 204, description = "Account removed"),
        (status = 401, description = "Unauthorised", body = crate::domain::DomainError),
        (status = 403, description = "Forbidden", body = crate::domain::DomainError),
        (status = 404, description = "Not found", body = crate::domain::DomainError)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    if !policy::can_perform_account_action(&actor, AccountAction::Destroy) {
        return Err(forbidden());
    }

    let id = parse_account_id(&path)?;
    let target = state
        .accounts
        .find_by_id(id)
        .await
        .map_err(map_account_storage_error)?
        .ok_or_else(account_not_found)?;

    if !policy::can_delete_account(&actor, &target) {
        return Err(Error::forbidden(
            "only a superuser may delete an administrator account",
        ));
    }

    state
        .accounts
        .delete(id)
        .await
        .map_err(map_account_storage_error)?;
    tracing::info!(account_id = %id, actor_id = %actor.id(), "account deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
