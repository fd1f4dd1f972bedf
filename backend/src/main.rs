//! Backend entry-point: configuration, storage selection and server startup.
//!
//! Configuration is environment-driven:
//! - `BIND_ADDR` (default `127.0.0.1:8080`)
//! - `DATABASE_URL` — optional; selects PostgreSQL-backed repositories
//! - `SESSION_KEY_FILE` (default `/var/run/secrets/session_key`),
//!   `SESSION_ALLOW_EPHEMERAL=1` to permit a generated key outside release
//!   builds, `SESSION_COOKIE_SECURE=0` to disable the `Secure` cookie flag
//! - `BOOTSTRAP_ADMIN_EMAIL` / `BOOTSTRAP_ADMIN_PASSWORD` (plus optional
//!   `BOOTSTRAP_ADMIN_FIRST_NAME` / `BOOTSTRAP_ADMIN_LAST_NAME`) — startup
//!   superuser

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::DbPool;
use backend::server::{
    BootstrapAdmin, ServerConfig, build_http_state, create_server, ensure_bootstrap_admin,
};

fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn bootstrap_admin_from_env() -> Option<BootstrapAdmin> {
    let email = env::var("BOOTSTRAP_ADMIN_EMAIL").ok()?;
    let password = env::var("BOOTSTRAP_ADMIN_PASSWORD").ok()?;
    Some(BootstrapAdmin {
        email,
        first_name: env::var("BOOTSTRAP_ADMIN_FIRST_NAME").unwrap_or_else(|_| "Clinic".into()),
        last_name: env::var("BOOTSTRAP_ADMIN_LAST_NAME")
            .unwrap_or_else(|_| "Administrator".into()),
        password,
    })
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let mut config = ServerConfig::new(session_key()?, cookie_secure, SameSite::Lax, bind_addr);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        let pool = DbPool::connect(&database_url)
            .await
            .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;
        config = config.with_db_pool(pool);
    }
    if let Some(admin) = bootstrap_admin_from_env() {
        config = config.with_bootstrap_admin(admin);
    }

    let http_state = build_http_state(&config);
    if let Some(admin) = config.bootstrap_admin() {
        ensure_bootstrap_admin(&http_state, admin)
            .await
            .map_err(|e| std::io::Error::other(format!("bootstrap admin failed: {e}")))?;
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, config)?;
    server.await
}
