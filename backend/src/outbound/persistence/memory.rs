//! In-memory implementations of the persistence ports.
//!
//! Back the HTTP layer in tests and in database-less development: the server
//! falls back to these when no `DATABASE_URL` is configured. Each repository
//! holds its state behind a mutex, so an insert checks the unique email
//! constraint and writes in one critical section, mirroring the atomicity
//! PostgreSQL provides through the unique index.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, CustomerPersistenceError, CustomerRepository,
};
use crate::domain::{Account, AccountId, Customer, CustomerId, EmailAddress};

/// Mutex-backed account store.
#[derive(Default)]
pub struct MemoryAccountRepository {
    state: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryAccountRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Account>>, AccountPersistenceError> {
        self.state
            .lock()
            .map_err(|_| AccountPersistenceError::query("account store lock poisoned"))
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn insert(&self, account: &Account) -> Result<(), AccountPersistenceError> {
        let mut state = self.lock()?;
        if state
            .values()
            .any(|existing| existing.email() == account.email())
        {
            return Err(AccountPersistenceError::DuplicateEmail);
        }
        state.insert(account.id().as_uuid(), account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<(), AccountPersistenceError> {
        let mut state = self.lock()?;
        let id = account.id().as_uuid();
        if state
            .iter()
            .any(|(other_id, other)| *other_id != id && other.email() == account.email())
        {
            return Err(AccountPersistenceError::DuplicateEmail);
        }
        state.insert(id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountPersistenceError> {
        Ok(self.lock()?.get(&id.as_uuid()).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        Ok(self
            .lock()?
            .values()
            .find(|account| account.email() == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, AccountPersistenceError> {
        let mut accounts: Vec<Account> = self.lock()?.values().cloned().collect();
        accounts.sort_by_key(|account| (account.date_joined(), account.id().as_uuid()));
        Ok(accounts)
    }

    async fn delete(&self, id: AccountId) -> Result<(), AccountPersistenceError> {
        self.lock()?.remove(&id.as_uuid());
        Ok(())
    }
}

/// Mutex-backed customer store.
#[derive(Default)]
pub struct MemoryCustomerRepository {
    state: Mutex<HashMap<Uuid, Customer>>,
}

impl MemoryCustomerRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Customer>>, CustomerPersistenceError> {
        self.state
            .lock()
            .map_err(|_| CustomerPersistenceError::query("customer store lock poisoned"))
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    async fn insert(&self, customer: &Customer) -> Result<(), CustomerPersistenceError> {
        let mut state = self.lock()?;
        if state
            .values()
            .any(|existing| existing.email() == customer.email())
        {
            return Err(CustomerPersistenceError::DuplicateEmail);
        }
        state.insert(customer.id().as_uuid(), customer.clone());
        Ok(())
    }

    async fn update(&self, customer: &Customer) -> Result<(), CustomerPersistenceError> {
        let mut state = self.lock()?;
        let id = customer.id().as_uuid();
        if state
            .iter()
            .any(|(other_id, other)| *other_id != id && other.email() == customer.email())
        {
            return Err(CustomerPersistenceError::DuplicateEmail);
        }
        state.insert(id, customer.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerPersistenceError> {
        Ok(self.lock()?.get(&id.as_uuid()).cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, CustomerPersistenceError> {
        let mut customers: Vec<Customer> = self.lock()?.values().cloned().collect();
        customers.sort_by_key(Customer::sort_key);
        Ok(customers)
    }

    async fn delete(&self, id: CustomerId) -> Result<(), CustomerPersistenceError> {
        self.lock()?.remove(&id.as_uuid());
        Ok(())
    }
}
