//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// Staff accounts.
    ///
    /// `email` carries a unique index; `role` stores the wire identifier of
    /// the assigned role or NULL when unassigned.
    accounts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login email, domain part lower-cased.
        email -> Varchar,
        /// Given name.
        first_name -> Varchar,
        /// Family name.
        last_name -> Varchar,
        /// Assigned role identifier, if any.
        role -> Nullable<Varchar>,
        /// PHC-format password hash, if a usable password is set.
        password_hash -> Nullable<Varchar>,
        /// Optional date of birth.
        birth_date -> Nullable<Date>,
        /// Optional phone number.
        phone_number -> Nullable<Varchar>,
        /// Optional street address line.
        street -> Nullable<Varchar>,
        /// Optional city.
        city -> Nullable<Varchar>,
        /// Optional postal code.
        zip_code -> Nullable<Varchar>,
        /// Whether the account may authenticate.
        is_active -> Bool,
        /// Back-office staff flag.
        is_staff -> Bool,
        /// Unconditional-privilege flag.
        is_superuser -> Bool,
        /// Record creation timestamp.
        date_joined -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
        /// Last successful login, if any.
        last_login -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Clinic customers.
    customers (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Family name.
        last_name -> Varchar,
        /// Given name.
        first_name -> Varchar,
        /// Unique contact email.
        email -> Varchar,
        /// Contact phone number.
        phone_number -> Varchar,
        /// Street address line.
        street -> Varchar,
        /// Postal code.
        zip_code -> Varchar,
        /// City.
        city -> Varchar,
        /// Whether the customer file is archived.
        archive -> Bool,
        /// Free-text medical or administrative notes.
        description -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
