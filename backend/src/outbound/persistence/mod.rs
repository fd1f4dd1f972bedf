//! Persistence adapters for the account and customer repositories.
//!
//! PostgreSQL is the production store, reached through Diesel with async
//! support via `diesel-async` and `bb8` connection pooling. An in-memory
//! implementation of the same ports backs tests and database-less
//! development; the server selects an implementation at startup.
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Strongly typed errors**: database failures map onto the domain
//!   persistence error types, with unique-violation errors surfaced as
//!   `DuplicateEmail` so handlers can report a field-scoped failure.

pub mod diesel_account_repository;
pub mod diesel_customer_repository;
pub mod memory;
mod models;
pub mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_customer_repository::DieselCustomerRepository;
pub use memory::{MemoryAccountRepository, MemoryCustomerRepository};
pub use pool::{DbPool, PoolError};
