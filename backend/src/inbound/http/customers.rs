//! Customer resource handlers: `/api/customers`.
//!
//! Any authenticated staff member may manage customers; there is no
//! role-based gate on this resource. Validation mirrors the account
//! resource: field-scoped errors keyed by wire-format names, with the
//! unique email constraint surfaced on the `email` field.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{CustomerPersistenceError, CustomerRepository as _};
use crate::domain::{Customer, CustomerId, Error, NewCustomer};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::error::map_customer_storage_error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldErrors, non_blank, parse_email};

/// Customer create/update request body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerPayload {
    /// Family name.
    pub last_name: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Unique contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Street address line.
    pub street: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Whether the customer file is archived.
    pub archive: Option<bool>,
    /// Free-text medical or administrative notes.
    pub description: Option<String>,
}

/// Customer representation returned by every read.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    /// Primary key.
    pub id: Uuid,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Unique contact email.
    pub email: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Street address line.
    pub street: String,
    /// Postal code.
    pub zip_code: String,
    /// City.
    pub city: String,
    /// Whether the customer file is archived.
    pub archive: bool,
    /// Free-text notes.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl CustomerResponse {
    /// Project a customer onto its wire representation.
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            id: customer.id().as_uuid(),
            last_name: customer.last_name().to_owned(),
            first_name: customer.first_name().to_owned(),
            email: customer.email().as_str().to_owned(),
            phone_number: customer.phone_number().to_owned(),
            street: customer.street().to_owned(),
            zip_code: customer.zip_code().to_owned(),
            city: customer.city().to_owned(),
            archive: customer.archive(),
            description: customer.description().to_owned(),
            created_at: customer.created_at(),
            updated_at: customer.updated_at(),
        }
    }
}

fn customer_not_found() -> Error {
    Error::not_found("customer not found")
}

fn parse_customer_id(raw: &str) -> Result<CustomerId, Error> {
    raw.parse::<CustomerId>().map_err(|_| customer_not_found())
}

fn map_write_error(error: CustomerPersistenceError) -> Error {
    match error {
        CustomerPersistenceError::DuplicateEmail => {
            FieldErrors::single("email", "a customer with this email already exists")
        }
        other => map_customer_storage_error(other),
    }
}

struct RequiredField {
    name: &'static str,
    message: &'static str,
}

static REQUIRED_FIELDS: [RequiredField; 6] = [
    RequiredField { name: "lastName", message: "last name must not be empty" },
    RequiredField { name: "firstName", message: "first name must not be empty" },
    RequiredField { name: "phoneNumber", message: "phone number must not be empty" },
    RequiredField { name: "street", message: "street must not be empty" },
    RequiredField { name: "zipCode", message: "zip code must not be empty" },
    RequiredField { name: "city", message: "city must not be empty" },
];

fn required_text(
    errors: &mut FieldErrors,
    field: &RequiredField,
    submitted: Option<&str>,
    partial: bool,
) -> Option<String> {
    match submitted {
        Some(raw) => non_blank(errors, field.name, raw, field.message),
        None => {
            if !partial {
                errors.missing(field.name);
            }
            None
        }
    }
}

/// List customers ordered by family then given name.
#[utoipa::path(
    get,
    path = "/api/customers",
    responses(
        (status = 200, description = "Customers", body = [CustomerResponse]),
        (status = 401, description = "Unauthorised", body = crate::domain::DomainError)
    ),
    tags = ["customers"],
    operation_id = "listCustomers"
)]
#[get("/customers")]
pub async fn list_customers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CustomerResponse>>> {
    require_actor(&state, &session).await?;
    let customers = state
        .customers
        .list()
        .await
        .map_err(map_customer_storage_error)?;
    Ok(web::Json(
        customers
            .iter()
            .map(CustomerResponse::from_customer)
            .collect(),
    ))
}

/// Fetch a single customer.
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer", body = CustomerResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::DomainError),
        (status = 404, description = "Not found", body = crate::domain::DomainError)
    ),
    tags = ["customers"],
    operation_id = "getCustomer"
)]
#[get("/customers/{id}")]
pub async fn get_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CustomerResponse>> {
    require_actor(&state, &session).await?;
    let id = parse_customer_id(&path)?;
    let customer = state
        .customers
        .find_by_id(id)
        .await
        .map_err(map_customer_storage_error)?
        .ok_or_else(customer_not_found)?;
    Ok(web::Json(CustomerResponse::from_customer(&customer)))
}

/// Create a customer.
#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CustomerPayload,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Validation failed", body = crate::domain::DomainError),
        (status = 401, description = "Unauthorised", body = crate::domain::DomainError)
    ),
    tags = ["customers"],
    operation_id = "createCustomer"
)]
#[post("/customers")]
pub async fn create_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CustomerPayload>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    let payload = payload.into_inner();

    let mut errors = FieldErrors::new();
    let email = match payload.email.as_deref() {
        Some(raw) => parse_email(&mut errors, "email", raw),
        None => {
            errors.missing("email");
            None
        }
    };
    let [last_name, first_name, phone_number, street, zip_code, city] = [
        required_text(&mut errors, &REQUIRED_FIELDS[0], payload.last_name.as_deref(), false),
        required_text(&mut errors, &REQUIRED_FIELDS[1], payload.first_name.as_deref(), false),
        required_text(&mut errors, &REQUIRED_FIELDS[2], payload.phone_number.as_deref(), false),
        required_text(&mut errors, &REQUIRED_FIELDS[3], payload.street.as_deref(), false),
        required_text(&mut errors, &REQUIRED_FIELDS[4], payload.zip_code.as_deref(), false),
        required_text(&mut errors, &REQUIRED_FIELDS[5], payload.city.as_deref(), false),
    ];
    errors.finish()?;

    let (
        Some(email),
        Some(last_name),
        Some(first_name),
        Some(phone_number),
        Some(street),
        Some(zip_code),
        Some(city),
    ) = (email, last_name, first_name, phone_number, street, zip_code, city)
    else {
        return Err(Error::internal("create validation invariant broken"));
    };

    let details = NewCustomer {
        last_name,
        first_name,
        email,
        phone_number,
        street,
        zip_code,
        city,
        archive: payload.archive.unwrap_or(false),
        description: payload.description.unwrap_or_default(),
    };
    let customer = Customer::create(details, Utc::now())
        .map_err(|error| Error::internal(format!("customer construction failed: {error}")))?;

    state
        .customers
        .insert(&customer)
        .await
        .map_err(map_write_error)?;
    tracing::info!(customer_id = %customer.id(), actor_id = %actor.id(), "customer created");
    Ok(HttpResponse::Created().json(CustomerResponse::from_customer(&customer)))
}

async fn apply_update(
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
    payload: CustomerPayload,
    partial: bool,
) -> ApiResult<web::Json<CustomerResponse>> {
    let actor = require_actor(state, session).await?;
    let id = parse_customer_id(raw_id)?;
    let mut target = state
        .customers
        .find_by_id(id)
        .await
        .map_err(map_customer_storage_error)?
        .ok_or_else(customer_not_found)?;

    let mut errors = FieldErrors::new();
    let email = match payload.email.as_deref() {
        Some(raw) => parse_email(&mut errors, "email", raw),
        None => {
            if !partial {
                errors.missing("email");
            }
            None
        }
    };
    let [last_name, first_name, phone_number, street, zip_code, city] = [
        required_text(&mut errors, &REQUIRED_FIELDS[0], payload.last_name.as_deref(), partial),
        required_text(&mut errors, &REQUIRED_FIELDS[1], payload.first_name.as_deref(), partial),
        required_text(&mut errors, &REQUIRED_FIELDS[2], payload.phone_number.as_deref(), partial),
        required_text(&mut errors, &REQUIRED_FIELDS[3], payload.street.as_deref(), partial),
        required_text(&mut errors, &REQUIRED_FIELDS[4], payload.zip_code.as_deref(), partial),
        required_text(&mut errors, &REQUIRED_FIELDS[5], payload.city.as_deref(), partial),
    ];
    errors.finish()?;

    if let Some(email) = email {
        target.set_email(email);
    }
    if let Some(last_name) = last_name {
        target.set_last_name(last_name);
    }
    if let Some(first_name) = first_name {
        target.set_first_name(first_name);
    }
    if let Some(phone_number) = phone_number {
        target.set_phone_number(phone_number);
    }
    if let Some(street) = street {
        target.set_street(street);
    }
    if let Some(zip_code) = zip_code {
        target.set_zip_code(zip_code);
    }
    if let Some(city) = city {
        target.set_city(city);
    }
    if let Some(archive) = payload.archive {
        target.set_archive(archive);
    }
    if let Some(description) = payload.description {
        target.set_description(description);
    }
    target.touch(Utc::now());

    state
        .customers
        .update(&target)
        .await
        .map_err(map_write_error)?;
    tracing::info!(customer_id = %target.id(), actor_id = %actor.id(), "customer updated");
    Ok(web::Json(CustomerResponse::from_customer(&target)))
}

/// Replace a customer (full update).
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    params(("id" = String, Path, description = "Customer id")),
    request_body = CustomerPayload,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Validation failed", body = crate::domain::DomainError),
        (status = 401, description = "Unauthorised", body = crate::domain::DomainError),
        (status = 404, description = "Not found", body = crate::domain::DomainError)
    ),
    tags = ["customers"],
    operation_id = "updateCustomer"
)]
#[put("/customers/{id}")]
pub async fn update_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CustomerPayload>,
) -> ApiResult<web::Json<CustomerResponse>> {
    apply_update(&state, &session, &path, payload.into_inner(), false).await
}

/// Modify part of a customer.
#[utoipa::path(
    patch,
    path = "/api/customers/{id}",
    params(("id" = String, Path, description = "Customer id")),
    request_body = CustomerPayload,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Validation failed", body = crate::domain::DomainError),
        (status = 401, description = "Unauthorised", body = crate::domain::DomainError),
        (status = 404, description = "Not found", body = crate::domain::DomainError)
    ),
    tags = ["customers"],
    operation_id = "patchCustomer"
)]
#[patch("/customers/{id}")]
pub async fn patch_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CustomerPayload>,
) -> ApiResult<web::Json<CustomerResponse>> {
    apply_update(&state, &session, &path, payload.into_inner(), true).await
}

/// Remove a customer.
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 204, description = "Customer removed"),
        (status = 401, description = "Unauthorised", body = crate::domain::DomainError),
        (status = 404, description = "Not found", body = crate::domain::DomainError)
    ),
    tags = ["customers"],
    operation_id = "deleteCustomer"
)]
#[delete("/customers/{id}")]
pub async fn delete_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    let id = parse_customer_id(&path)?;
    state
        .customers
        .find_by_id(id)
        .await
        .map_err(map_customer_storage_error)?
        .ok_or_else(customer_not_found)?;

    state
        .customers
        .delete(id)
        .await
        .map_err(map_customer_storage_error)?;
    tracing::info!(customer_id = %id, actor_id = %actor.id(), "customer deleted");
    Ok(HttpResponse::NoContent().finish())
}
