//! PostgreSQL-backed `CustomerRepository` implementation using Diesel ORM.
//!
//! Mirrors the account adapter: thin row/domain translation plus typed error
//! mapping. Listing order (family name, then given name) is pushed down to
//! SQL so the database collation decides ties.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{CustomerPersistenceError, CustomerRepository};
use crate::domain::{Customer, CustomerId, CustomerRecord, EmailAddress};

use super::models::{CustomerChangeset, CustomerRow, NewCustomerRow};
use super::pool::{DbPool, PoolError};
use super::schema::customers;

/// Diesel-backed implementation of the `CustomerRepository` port.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CustomerPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CustomerPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CustomerPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            CustomerPersistenceError::DuplicateEmail
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CustomerPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => CustomerPersistenceError::query("record not found"),
        _ => CustomerPersistenceError::query("database error"),
    }
}

fn row_to_customer(row: CustomerRow) -> Result<Customer, CustomerPersistenceError> {
    let email = EmailAddress::new(&row.email).map_err(|error| {
        CustomerPersistenceError::query(format!("stored email failed validation: {error}"))
    })?;

    Ok(Customer::restore(CustomerRecord {
        id: CustomerId::from_uuid(row.id),
        last_name: row.last_name,
        first_name: row.first_name,
        email,
        phone_number: row.phone_number,
        street: row.street,
        zip_code: row.zip_code,
        city: row.city,
        archive: row.archive,
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn insert(&self, customer: &Customer) -> Result<(), CustomerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(customers::table)
            .values(NewCustomerRow::from_customer(customer))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, customer: &Customer) -> Result<(), CustomerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(customers::table.find(customer.id().as_uuid()))
            .set(CustomerChangeset::from_customer(customer))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CustomerRow> = customers::table
            .find(id.as_uuid())
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_customer).transpose()
    }

    async fn list(&self) -> Result<Vec<Customer>, CustomerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CustomerRow> = customers::table
            .order((customers::last_name.asc(), customers::first_name.asc()))
            .select(CustomerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_customer).collect()
    }

    async fn delete(&self, id: CustomerId) -> Result<(), CustomerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(customers::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    #[test]
    fn unique_violation_maps_to_duplicate_email() {
        let error =
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new("stub".to_owned()));
        assert_eq!(map_diesel_error(error), CustomerPersistenceError::DuplicateEmail);
    }

    #[test]
    fn pool_errors_map_to_connection_errors() {
        assert!(matches!(
            map_pool_error(PoolError::build("bad url")),
            CustomerPersistenceError::Connection { .. }
        ));
    }
}
