//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated OpenAPI specification for the REST API:
//! every HTTP endpoint from the inbound layer, the shared error envelope and
//! resource schemas, and the session-cookie security scheme. Export the
//! document with `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Veterinary clinic backend API",
        description = "HTTP interface for staff account and customer management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::accounts::list_accounts,
        crate::inbound::http::accounts::get_account,
        crate::inbound::http::accounts::create_account,
        crate::inbound::http::accounts::update_account,
        crate::inbound::http::accounts::patch_account,
        crate::inbound::http::accounts::delete_account,
        crate::inbound::http::customers::list_customers,
        crate::inbound::http::customers::get_customer,
        crate::inbound::http::customers::create_customer,
        crate::inbound::http::customers::update_customer,
        crate::inbound::http::customers::patch_customer,
        crate::inbound::http::customers::delete_customer,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::DomainError,
        crate::domain::ErrorCode,
        crate::domain::Role,
        crate::inbound::http::auth::LoginRequest,
        crate::inbound::http::accounts::AccountPayload,
        crate::inbound::http::accounts::AccountResponse,
        crate::inbound::http::customers::CustomerPayload,
        crate::inbound::http::customers::CustomerResponse,
    ))
)]
pub struct ApiDoc;
