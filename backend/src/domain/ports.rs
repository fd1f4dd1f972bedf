//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (databases, password hashers). Each trait exposes strongly typed errors so
//! adapters map their failures into predictable variants instead of returning
//! `anyhow::Result`.

use async_trait::async_trait;
use thiserror::Error;

use super::account::{Account, AccountId, EmailAddress};
use super::customer::{Customer, CustomerId};
use super::password::PasswordHash;

/// Errors surfaced by the account persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountPersistenceError {
    /// Database connectivity failures.
    #[error("account storage connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or transaction failures.
    #[error("account storage query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
    /// The unique email constraint rejected the write.
    #[error("an account with this email already exists")]
    DuplicateEmail,
}

impl AccountPersistenceError {
    /// Helper for connection-level adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Durable storage for accounts.
///
/// Inserts and updates are atomic with respect to the unique email
/// constraint: a violating write fails with
/// [`AccountPersistenceError::DuplicateEmail`] and leaves storage unchanged.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account.
    async fn insert(&self, account: &Account) -> Result<(), AccountPersistenceError>;

    /// Persist changes to an existing account.
    async fn update(&self, account: &Account) -> Result<(), AccountPersistenceError>;

    /// Fetch an account by primary key.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountPersistenceError>;

    /// Fetch an account by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountPersistenceError>;

    /// List every account, oldest first.
    async fn list(&self) -> Result<Vec<Account>, AccountPersistenceError>;

    /// Remove an account. Removing an absent id is not an error.
    async fn delete(&self, id: AccountId) -> Result<(), AccountPersistenceError>;
}

/// Errors surfaced by the customer persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomerPersistenceError {
    /// Database connectivity failures.
    #[error("customer storage connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or transaction failures.
    #[error("customer storage query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
    /// The unique email constraint rejected the write.
    #[error("a customer with this email already exists")]
    DuplicateEmail,
}

impl CustomerPersistenceError {
    /// Helper for connection-level adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Durable storage for customers.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Persist a new customer.
    async fn insert(&self, customer: &Customer) -> Result<(), CustomerPersistenceError>;

    /// Persist changes to an existing customer.
    async fn update(&self, customer: &Customer) -> Result<(), CustomerPersistenceError>;

    /// Fetch a customer by primary key.
    async fn find_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerPersistenceError>;

    /// List every customer ordered by (family name, given name).
    async fn list(&self) -> Result<Vec<Customer>, CustomerPersistenceError>;

    /// Remove a customer. Removing an absent id is not an error.
    async fn delete(&self, id: CustomerId) -> Result<(), CustomerPersistenceError>;
}

/// Errors surfaced by the password hashing adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    /// Hashing failed inside the backing algorithm.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Adapter-level failure description.
        message: String,
    },
}

impl PasswordHashError {
    /// Helper for hashing failures.
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }
}

/// Salted password hashing, injected so the domain stays pure.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into PHC format.
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Verify a plaintext candidate against a stored hash.
    fn verify(&self, hash: &PasswordHash, plaintext: &str) -> bool;
}
