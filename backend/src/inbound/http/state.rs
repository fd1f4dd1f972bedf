//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountRepository, CustomerRepository, PasswordHasher};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account storage port.
    pub accounts: Arc<dyn AccountRepository>,
    /// Customer storage port.
    pub customers: Arc<dyn CustomerRepository>,
    /// Password hashing port.
    pub hasher: Arc<dyn PasswordHasher>,
}

impl HttpState {
    /// Bundle the ports the handlers depend on.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        customers: Arc<dyn CustomerRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            accounts,
            customers,
            hasher,
        }
    }
}
