//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use chrono::Utc;
use serde_json::json;

use crate::domain::ports::{AccountRepository as _, PasswordHasher as _};
use crate::domain::{Account, EmailAddress, NewAccount, Role, SuperuserFlagOverrides};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{MemoryAccountRepository, MemoryCustomerRepository};
use crate::outbound::security::Argon2PasswordHasher;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build handler state backed by in-memory repositories and a real Argon2
/// hasher.
pub fn test_state() -> HttpState {
    HttpState::new(
        Arc::new(MemoryAccountRepository::default()),
        Arc::new(MemoryCustomerRepository::default()),
        Arc::new(Argon2PasswordHasher),
    )
}

/// Insert an account with the given role and password straight into storage.
pub async fn seed_account(
    state: &HttpState,
    email: &str,
    role: Option<Role>,
    password: &str,
) -> Account {
    let hash = state.hasher.hash(password).expect("hashing succeeds");
    let mut details = NewAccount::new(
        EmailAddress::new(email).expect("valid email"),
        "Test",
        "Person",
    );
    details.role = role;
    details.password = Some(hash);
    let account = Account::create(details, Utc::now()).expect("valid account");
    state.accounts.insert(&account).await.expect("seed insert");
    account
}

/// Insert a superuser account straight into storage.
pub async fn seed_superuser(state: &HttpState, email: &str, password: &str) -> Account {
    let hash = state.hasher.hash(password).expect("hashing succeeds");
    let mut details = NewAccount::new(
        EmailAddress::new(email).expect("valid email"),
        "Root",
        "Person",
    );
    details.password = Some(hash);
    let account = Account::create_superuser(details, SuperuserFlagOverrides::default(), Utc::now())
        .expect("valid superuser");
    state.accounts.insert(&account).await.expect("seed insert");
    account
}

/// Log in through the HTTP surface and return the session cookie.
pub async fn login_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> Cookie<'static> {
    let request = actix_web::test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let response = actix_web::test::call_service(app, request).await;
    assert!(
        response.status().is_success(),
        "login must succeed for {email}"
    );
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
