//! Customer data model: a clinic client and their contact details.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::account::EmailAddress;

/// Stable customer identifier stored as a UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CustomerId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self)
    }
}

/// Validation errors raised by [`Customer::create`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomerValidationError {
    /// Family name is empty after trimming.
    #[error("last name must not be empty")]
    EmptyLastName,
    /// Given name is empty after trimming.
    #[error("first name must not be empty")]
    EmptyFirstName,
    /// Phone number is empty after trimming.
    #[error("phone number must not be empty")]
    EmptyPhoneNumber,
    /// Street is empty after trimming.
    #[error("street must not be empty")]
    EmptyStreet,
    /// Postal code is empty after trimming.
    #[error("zip code must not be empty")]
    EmptyZipCode,
    /// City is empty after trimming.
    #[error("city must not be empty")]
    EmptyCity,
}

/// Parameters for creating a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    /// Family name, required.
    pub last_name: String,
    /// Given name, required.
    pub first_name: String,
    /// Unique contact email.
    pub email: EmailAddress,
    /// Contact phone number, required.
    pub phone_number: String,
    /// Street address line, required.
    pub street: String,
    /// Postal code, required.
    pub zip_code: String,
    /// City, required.
    pub city: String,
    /// Whether the customer file is archived.
    pub archive: bool,
    /// Free-text medical or administrative notes.
    pub description: String,
}

/// Raw field bundle used by persistence adapters to rebuild a [`Customer`].
#[derive(Debug, Clone)]
pub struct CustomerRecord {
    /// Primary key.
    pub id: CustomerId,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Unique contact email.
    pub email: EmailAddress,
    /// Contact phone number.
    pub phone_number: String,
    /// Street address line.
    pub street: String,
    /// Postal code.
    pub zip_code: String,
    /// City.
    pub city: String,
    /// Whether the customer file is archived.
    pub archive: bool,
    /// Free-text notes.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A clinic customer.
///
/// Listings order customers by family then given name, case-insensitively;
/// [`Customer::sort_key`] exposes that ordering for in-memory storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: CustomerId,
    last_name: String,
    first_name: String,
    email: EmailAddress,
    phone_number: String,
    street: String,
    zip_code: String,
    city: String,
    archive: bool,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Customer {
    /// Create a customer, validating that required fields are non-empty.
    pub fn create(details: NewCustomer, now: DateTime<Utc>) -> Result<Self, CustomerValidationError> {
        Ok(Self {
            id: CustomerId::random(),
            last_name: required(details.last_name, CustomerValidationError::EmptyLastName)?,
            first_name: required(details.first_name, CustomerValidationError::EmptyFirstName)?,
            email: details.email,
            phone_number: required(details.phone_number, CustomerValidationError::EmptyPhoneNumber)?,
            street: required(details.street, CustomerValidationError::EmptyStreet)?,
            zip_code: required(details.zip_code, CustomerValidationError::EmptyZipCode)?,
            city: required(details.city, CustomerValidationError::EmptyCity)?,
            archive: details.archive,
            description: details.description,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a customer from stored fields, trusting the storage layer.
    pub fn restore(record: CustomerRecord) -> Self {
        Self {
            id: record.id,
            last_name: record.last_name,
            first_name: record.first_name,
            email: record.email,
            phone_number: record.phone_number,
            street: record.street,
            zip_code: record.zip_code,
            city: record.city,
            archive: record.archive,
            description: record.description,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    /// Primary key.
    pub fn id(&self) -> CustomerId {
        self.id
    }

    /// Family name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Given name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Unique contact email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Contact phone number.
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Street address line.
    pub fn street(&self) -> &str {
        &self.street
    }

    /// Postal code.
    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    /// City.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Whether the customer file is archived.
    pub fn archive(&self) -> bool {
        self.archive
    }

    /// Free-text notes.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Case-insensitive (family name, given name) listing key.
    pub fn sort_key(&self) -> (String, String) {
        (
            self.last_name.to_lowercase(),
            self.first_name.to_lowercase(),
        )
    }

    /// Replace the family name.
    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    /// Replace the given name.
    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    /// Replace the contact email.
    pub fn set_email(&mut self, email: EmailAddress) {
        self.email = email;
    }

    /// Replace the phone number.
    pub fn set_phone_number(&mut self, phone_number: impl Into<String>) {
        self.phone_number = phone_number.into();
    }

    /// Replace the street address line.
    pub fn set_street(&mut self, street: impl Into<String>) {
        self.street = street.into();
    }

    /// Replace the postal code.
    pub fn set_zip_code(&mut self, zip_code: impl Into<String>) {
        self.zip_code = zip_code.into();
    }

    /// Replace the city.
    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    /// Set or clear the archive flag.
    pub fn set_archive(&mut self, archive: bool) {
        self.archive = archive;
    }

    /// Replace the free-text notes.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Refresh the last-mutation timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

fn required(value: String, error: CustomerValidationError) -> Result<String, CustomerValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}
