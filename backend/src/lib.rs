//! Veterinary clinic administrative backend.
//!
//! REST API for managing staff accounts and clinic customers, with
//! session-cookie authentication and role-based authorization on the account
//! resource. The crate follows a ports-and-adapters layout: pure decision
//! logic and entities in [`domain`], Actix Web handlers in [`inbound`],
//! Diesel/PostgreSQL and Argon2 adapters in [`outbound`], and app wiring in
//! [`server`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
