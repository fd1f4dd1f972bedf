//! Server construction and middleware wiring.

mod config;

pub use config::{BootstrapAdmin, ServerConfig};

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpRequest, HttpServer, middleware::NormalizePath, web};
use chrono::Utc;
use tracing::{info, warn};

use crate::Trace;
use crate::domain::ports::{
    AccountPersistenceError, AccountRepository as _, PasswordHashError, PasswordHasher as _,
};
use crate::domain::{
    Account, EmailAddress, EmailAddressError, Error, NewAccount, SuperuserConstructionError,
    SuperuserFlagOverrides,
};
use crate::inbound::http::accounts::{
    create_account, delete_account, get_account, list_accounts, patch_account, update_account,
};
use crate::inbound::http::auth::{login, logout};
use crate::inbound::http::customers::{
    create_customer, delete_customer, get_customer, list_customers, patch_customer, update_customer,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DieselAccountRepository, DieselCustomerRepository, MemoryAccountRepository,
    MemoryCustomerRepository,
};
use crate::outbound::security::Argon2PasswordHasher;

/// Failures raised by the startup superuser bootstrap.
///
/// All of them are fatal: a misconfigured bootstrap aborts startup instead
/// of running with a broken admin account.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The configured email failed validation.
    #[error("bootstrap admin email invalid: {0}")]
    Email(#[from] EmailAddressError),
    /// The account store rejected the lookup or insert.
    #[error(transparent)]
    Storage(#[from] AccountPersistenceError),
    /// Password hashing failed.
    #[error(transparent)]
    Hashing(#[from] PasswordHashError),
    /// The superuser constructor refused the configured flags.
    #[error(transparent)]
    Construction(#[from] SuperuserConstructionError),
}

/// Build handler state from the configuration.
///
/// Selects Diesel-backed repositories when a database pool is configured and
/// in-memory repositories otherwise.
pub fn build_http_state(server_config: &ServerConfig) -> HttpState {
    match &server_config.db_pool {
        Some(pool) => HttpState::new(
            Arc::new(DieselAccountRepository::new(pool.clone())),
            Arc::new(DieselCustomerRepository::new(pool.clone())),
            Arc::new(Argon2PasswordHasher),
        ),
        None => {
            warn!("no database configured; falling back to in-memory repositories");
            HttpState::new(
                Arc::new(MemoryAccountRepository::default()),
                Arc::new(MemoryCustomerRepository::default()),
                Arc::new(Argon2PasswordHasher),
            )
        }
    }
}

/// Ensure the configured bootstrap superuser exists.
///
/// A no-op when an account with the configured email is already stored. This
/// is the sole caller of [`Account::create_superuser`].
///
/// # Errors
/// Returns [`BootstrapError`] when the email is invalid, hashing fails, the
/// constructor rejects the flags, or storage rejects the write.
pub async fn ensure_bootstrap_admin(
    state: &HttpState,
    admin: &BootstrapAdmin,
) -> Result<(), BootstrapError> {
    let email = EmailAddress::new(&admin.email)?;
    if state.accounts.find_by_email(&email).await?.is_some() {
        info!(email = %email, "bootstrap admin already present");
        return Ok(());
    }

    let hash = state.hasher.hash(&admin.password)?;
    let mut details = NewAccount::new(email, admin.first_name.as_str(), admin.last_name.as_str());
    details.password = Some(hash);
    let account =
        Account::create_superuser(details, SuperuserFlagOverrides::default(), Utc::now())?;
    state.accounts.insert(&account).await?;
    info!(account_id = %account.id(), "bootstrap admin created");
    Ok(())
}

fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    Error::invalid_request(format!("invalid request body: {err}")).into()
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api")
        .wrap(session)
        .service(login)
        .service(logout)
        .service(list_accounts)
        .service(get_account)
        .service(create_account)
        .service(update_account)
        .service(patch_account)
        .service(delete_account)
        .service(list_customers)
        .service(get_customer)
        .service(create_customer)
        .service(update_customer)
        .service(patch_customer)
        .service(delete_customer);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .wrap(NormalizePath::trim())
        .service(api)
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server using the provided state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    server_config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
        bootstrap_admin: _,
    } = server_config;

    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::domain::ports::AccountRepository;
    use crate::inbound::http::test_utils::test_state;

    fn admin() -> BootstrapAdmin {
        BootstrapAdmin {
            email: "root@clinic.test".to_owned(),
            first_name: "Clinic".to_owned(),
            last_name: "Administrator".to_owned(),
            password: "Str0ngP@ss!".to_owned(),
        }
    }

    #[tokio::test]
    async fn bootstrap_creates_superuser_once() {
        let state = test_state();
        ensure_bootstrap_admin(&state, &admin())
            .await
            .expect("bootstrap succeeds");

        let email = EmailAddress::new("root@clinic.test").expect("valid email");
        let stored = state
            .accounts
            .find_by_email(&email)
            .await
            .expect("lookup succeeds")
            .expect("account exists");
        assert!(stored.is_superuser());
        assert!(stored.is_staff());
        assert_eq!(stored.role(), Some(Role::Admin));

        // A second run must not attempt to recreate the account.
        ensure_bootstrap_admin(&state, &admin())
            .await
            .expect("idempotent bootstrap");
    }

    #[tokio::test]
    async fn bootstrap_rejects_invalid_email() {
        let state = test_state();
        let mut bad = admin();
        bad.email = "not-an-email".to_owned();
        assert!(matches!(
            ensure_bootstrap_admin(&state, &bad).await,
            Err(BootstrapError::Email(_))
        ));
    }
}
