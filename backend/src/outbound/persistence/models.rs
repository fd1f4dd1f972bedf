//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Account, Customer};

use super::schema::{accounts, customers};

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
    pub password_hash: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Insertable struct for creating new account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub role: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub birth_date: Option<NaiveDate>,
    pub phone_number: Option<&'a str>,
    pub street: Option<&'a str>,
    pub city: Option<&'a str>,
    pub zip_code: Option<&'a str>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl<'a> NewAccountRow<'a> {
    pub(crate) fn from_account(account: &'a Account) -> Self {
        Self {
            id: account.id().as_uuid(),
            email: account.email().as_str(),
            first_name: account.first_name(),
            last_name: account.last_name(),
            role: account.role().map(|role| role.as_str()),
            password_hash: account.password_hash().map(|hash| hash.as_str()),
            birth_date: account.birth_date(),
            phone_number: account.phone_number(),
            street: account.street(),
            city: account.city(),
            zip_code: account.zip_code(),
            is_active: account.is_active(),
            is_staff: account.is_staff(),
            is_superuser: account.is_superuser(),
            date_joined: account.date_joined(),
            updated_at: account.updated_at(),
            last_login: account.last_login(),
        }
    }
}

/// Changeset struct for updating existing account records.
///
/// `date_joined` is deliberately absent: creation time is immutable.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = accounts)]
pub(crate) struct AccountChangeset<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub role: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub birth_date: Option<NaiveDate>,
    pub phone_number: Option<&'a str>,
    pub street: Option<&'a str>,
    pub city: Option<&'a str>,
    pub zip_code: Option<&'a str>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl<'a> AccountChangeset<'a> {
    pub(crate) fn from_account(account: &'a Account) -> Self {
        Self {
            email: account.email().as_str(),
            first_name: account.first_name(),
            last_name: account.last_name(),
            role: account.role().map(|role| role.as_str()),
            password_hash: account.password_hash().map(|hash| hash.as_str()),
            birth_date: account.birth_date(),
            phone_number: account.phone_number(),
            street: account.street(),
            city: account.city(),
            zip_code: account.zip_code(),
            is_active: account.is_active(),
            is_staff: account.is_staff(),
            is_superuser: account.is_superuser(),
            updated_at: account.updated_at(),
            last_login: account.last_login(),
        }
    }
}

/// Row struct for reading from the customers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerRow {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone_number: String,
    pub street: String,
    pub zip_code: String,
    pub city: String,
    pub archive: bool,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new customer records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub(crate) struct NewCustomerRow<'a> {
    pub id: Uuid,
    pub last_name: &'a str,
    pub first_name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub street: &'a str,
    pub zip_code: &'a str,
    pub city: &'a str,
    pub archive: bool,
    pub description: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewCustomerRow<'a> {
    pub(crate) fn from_customer(customer: &'a Customer) -> Self {
        Self {
            id: customer.id().as_uuid(),
            last_name: customer.last_name(),
            first_name: customer.first_name(),
            email: customer.email().as_str(),
            phone_number: customer.phone_number(),
            street: customer.street(),
            zip_code: customer.zip_code(),
            city: customer.city(),
            archive: customer.archive(),
            description: customer.description(),
            created_at: customer.created_at(),
            updated_at: customer.updated_at(),
        }
    }
}

/// Changeset struct for updating existing customer records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = customers)]
pub(crate) struct CustomerChangeset<'a> {
    pub last_name: &'a str,
    pub first_name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub street: &'a str,
    pub zip_code: &'a str,
    pub city: &'a str,
    pub archive: bool,
    pub description: &'a str,
    pub updated_at: DateTime<Utc>,
}

impl<'a> CustomerChangeset<'a> {
    pub(crate) fn from_customer(customer: &'a Customer) -> Self {
        Self {
            last_name: customer.last_name(),
            first_name: customer.first_name(),
            email: customer.email().as_str(),
            phone_number: customer.phone_number(),
            street: customer.street(),
            zip_code: customer.zip_code(),
            city: customer.city(),
            archive: customer.archive(),
            description: customer.description(),
            updated_at: customer.updated_at(),
        }
    }
}
