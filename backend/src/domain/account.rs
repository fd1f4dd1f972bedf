//! Account data model: the authenticable clinic staff member.
//!
//! ## Invariants
//! - `email` is unique across accounts (enforced by the storage layer) and
//!   stored with a lower-cased domain part.
//! - `first_name` and `last_name` are non-empty once trimmed.
//! - The admin/veterinarian/secretary predicates derive from `role` alone.
//! - A superuser always has `role = admin`, `is_staff = true` and
//!   `is_superuser = true`; [`Account::create_superuser`] refuses to build
//!   anything else.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::password::PasswordHash;

/// Closed set of staff roles, the primary authorization axis.
///
/// Kept as a single enumeration with equality checks rather than independent
/// boolean flags so a role and its predicates cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Clinic administrator.
    Admin,
    /// Practicing veterinarian.
    Veterinarian,
    /// Front-desk secretary.
    Secretary,
}

impl Role {
    /// Every assignable role, in declaration order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Veterinarian, Self::Secretary];

    /// Wire-format identifier for the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Veterinarian => "veterinarian",
            Self::Secretary => "secretary",
        }
    }

    /// Human-readable label shown by the French clinic client.
    pub fn display_label(self) -> &'static str {
        match self {
            Self::Admin => "Administrateur",
            Self::Veterinarian => "Vétérinaire",
            Self::Secretary => "Secrétaire",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("role must be one of admin, veterinarian, secretary")]
pub struct RoleParseError;

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "veterinarian" => Ok(Self::Veterinarian),
            "secretary" => Ok(Self::Secretary),
            _ => Err(RoleParseError),
        }
    }
}

/// Validation errors returned by [`EmailAddress::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailAddressError {
    /// Input is empty after trimming whitespace.
    #[error("email must not be empty")]
    Empty,
    /// Input does not look like `local@domain.tld`.
    #[error("email must be a valid address")]
    Invalid,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Deliberately permissive; the goal is shape, not full RFC 5321.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised email address used as the sole login credential.
///
/// Normalisation lower-cases the domain part and preserves the local part,
/// so `Test@EXAMPLE.COM` is stored as `Test@example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("Test@EXAMPLE.COM").expect("valid email");
    /// assert_eq!(email.as_str(), "Test@example.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailAddressError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailAddressError::Empty);
        }
        if !email_regex().is_match(trimmed) {
            return Err(EmailAddressError::Invalid);
        }
        let (local, domain) = trimmed.rsplit_once('@').ok_or(EmailAddressError::Invalid)?;
        Ok(Self(format!("{local}@{}", domain.to_lowercase())))
    }

    /// Borrow the normalised address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stable account identifier stored as a UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
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

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self)
    }
}

/// Validation errors raised by the account constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountValidationError {
    /// First name is empty after trimming.
    #[error("first name must not be empty")]
    EmptyFirstName,
    /// Last name is empty after trimming.
    #[error("last name must not be empty")]
    EmptyLastName,
}

/// Fatal errors raised by [`Account::create_superuser`].
///
/// These signal a configuration mistake at bootstrap time, not a
/// request-handling failure; the public write path can never reach them.
#[derive(Debug, Error)]
pub enum SuperuserConstructionError {
    /// Caller forced a non-admin role onto a superuser.
    #[error("superuser must have role=admin")]
    RoleNotAdmin,
    /// Caller cleared the staff flag.
    #[error("superuser must have is_staff=true")]
    NotStaff,
    /// Caller cleared the superuser flag.
    #[error("superuser must have is_superuser=true")]
    NotSuperuser,
    /// Name validation failed.
    #[error(transparent)]
    Invalid(#[from] AccountValidationError),
}

/// Parameters for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Normalised login email.
    pub email: EmailAddress,
    /// Given name, required.
    pub first_name: String,
    /// Family name, required.
    pub last_name: String,
    /// Assigned role; `None` means no role yet.
    pub role: Option<Role>,
    /// Hashed credential; `None` leaves the account without a usable password.
    pub password: Option<PasswordHash>,
    /// Optional date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Optional phone number.
    pub phone_number: Option<String>,
    /// Optional street address line.
    pub street: Option<String>,
    /// Optional city.
    pub city: Option<String>,
    /// Optional postal code.
    pub zip_code: Option<String>,
}

impl NewAccount {
    /// Minimal parameter set; profile extras default to `None`.
    pub fn new(email: EmailAddress, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            email,
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: None,
            password: None,
            birth_date: None,
            phone_number: None,
            street: None,
            city: None,
            zip_code: None,
        }
    }

    /// Set the assigned role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Set the hashed credential.
    pub fn with_password(mut self, password: PasswordHash) -> Self {
        self.password = Some(password);
        self
    }
}

/// Privilege-flag overrides accepted by [`Account::create_superuser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SuperuserFlagOverrides {
    /// Explicit `is_staff` value; defaults to `true` when unset.
    pub is_staff: Option<bool>,
    /// Explicit `is_superuser` value; defaults to `true` when unset.
    pub is_superuser: Option<bool>,
}

/// Raw field bundle used by persistence adapters to rebuild an [`Account`]
/// without re-running construction-time validation.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    /// Primary key.
    pub id: AccountId,
    /// Normalised login email.
    pub email: EmailAddress,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Assigned role, if any.
    pub role: Option<Role>,
    /// Hashed credential, if any.
    pub password: Option<PasswordHash>,
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Street address line.
    pub street: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Whether the account may authenticate.
    pub is_active: bool,
    /// Back-office staff flag.
    pub is_staff: bool,
    /// Unconditional-privilege flag, orthogonal to role.
    pub is_superuser: bool,
    /// Creation timestamp.
    pub date_joined: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Last successful login, if any.
    pub last_login: Option<DateTime<Utc>>,
}

/// An authenticable clinic staff account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    email: EmailAddress,
    first_name: String,
    last_name: String,
    role: Option<Role>,
    password: Option<PasswordHash>,
    birth_date: Option<NaiveDate>,
    phone_number: Option<String>,
    street: Option<String>,
    city: Option<String>,
    zip_code: Option<String>,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
    date_joined: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a regular account.
    ///
    /// Defaults: active, not staff, not superuser, no last login.
    pub fn create(details: NewAccount, now: DateTime<Utc>) -> Result<Self, AccountValidationError> {
        let first_name = non_empty(details.first_name, AccountValidationError::EmptyFirstName)?;
        let last_name = non_empty(details.last_name, AccountValidationError::EmptyLastName)?;

        Ok(Self {
            id: AccountId::random(),
            email: details.email,
            first_name,
            last_name,
            role: details.role,
            password: details.password,
            birth_date: details.birth_date,
            phone_number: details.phone_number,
            street: details.street,
            city: details.city,
            zip_code: details.zip_code,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            date_joined: now,
            updated_at: now,
            last_login: None,
        })
    }

    /// Create a superuser account.
    ///
    /// The role defaults to admin when `details.role` is unset and the
    /// privilege flags default to `true`; any override contradicting these
    /// defaults is a fatal construction error. This constructor is reserved
    /// for the startup bootstrap and must stay unreachable from HTTP.
    pub fn create_superuser(
        details: NewAccount,
        flags: SuperuserFlagOverrides,
        now: DateTime<Utc>,
    ) -> Result<Self, SuperuserConstructionError> {
        let role = details.role.unwrap_or(Role::Admin);
        if role != Role::Admin {
            return Err(SuperuserConstructionError::RoleNotAdmin);
        }
        if !flags.is_staff.unwrap_or(true) {
            return Err(SuperuserConstructionError::NotStaff);
        }
        if !flags.is_superuser.unwrap_or(true) {
            return Err(SuperuserConstructionError::NotSuperuser);
        }

        let mut account = Self::create(
            NewAccount {
                role: Some(role),
                ..details
            },
            now,
        )?;
        account.is_staff = true;
        account.is_superuser = true;
        Ok(account)
    }

    /// Rebuild an account from stored fields, trusting the storage layer.
    pub fn restore(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            role: record.role,
            password: record.password,
            birth_date: record.birth_date,
            phone_number: record.phone_number,
            street: record.street,
            city: record.city,
            zip_code: record.zip_code,
            is_active: record.is_active,
            is_staff: record.is_staff,
            is_superuser: record.is_superuser,
            date_joined: record.date_joined,
            updated_at: record.updated_at,
            last_login: record.last_login,
        }
    }

    /// Primary key.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Normalised login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Given name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Assigned role, if any.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Hashed credential, if any. Never serialized.
    pub fn password_hash(&self) -> Option<&PasswordHash> {
        self.password.as_ref()
    }

    /// Whether the account holds a credential it can log in with.
    pub fn has_usable_password(&self) -> bool {
        self.password.is_some()
    }

    /// Date of birth.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    /// Phone number.
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// Street address line.
    pub fn street(&self) -> Option<&str> {
        self.street.as_deref()
    }

    /// City.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Postal code.
    pub fn zip_code(&self) -> Option<&str> {
        self.zip_code.as_deref()
    }

    /// Whether the account may authenticate.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Back-office staff flag.
    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    /// Unconditional-privilege flag, orthogonal to role.
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Creation timestamp, immutable after construction.
    pub fn date_joined(&self) -> DateTime<Utc> {
        self.date_joined
    }

    /// Last mutation timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Last successful login, if any.
    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    /// Role predicate: administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// Role predicate: veterinarian.
    pub fn is_veterinarian(&self) -> bool {
        self.role == Some(Role::Veterinarian)
    }

    /// Role predicate: secretary.
    pub fn is_secretary(&self) -> bool {
        self.role == Some(Role::Secretary)
    }

    /// Replace the login email.
    pub fn set_email(&mut self, email: EmailAddress) {
        self.email = email;
    }

    /// Replace the given name.
    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    /// Replace the family name.
    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    /// Assign a role.
    pub fn set_role(&mut self, role: Role) {
        self.role = Some(role);
    }

    /// Replace the stored credential with a freshly hashed one.
    pub fn set_password(&mut self, password: PasswordHash) {
        self.password = Some(password);
    }

    /// Replace the date of birth.
    pub fn set_birth_date(&mut self, birth_date: NaiveDate) {
        self.birth_date = Some(birth_date);
    }

    /// Replace the phone number.
    pub fn set_phone_number(&mut self, phone_number: impl Into<String>) {
        self.phone_number = Some(phone_number.into());
    }

    /// Replace the street address line.
    pub fn set_street(&mut self, street: impl Into<String>) {
        self.street = Some(street.into());
    }

    /// Replace the city.
    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = Some(city.into());
    }

    /// Replace the postal code.
    pub fn set_zip_code(&mut self, zip_code: impl Into<String>) {
        self.zip_code = Some(zip_code.into());
    }

    /// Stamp a successful login.
    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login = Some(now);
    }

    /// Refresh the last-mutation timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

fn non_empty(value: String, error: AccountValidationError) -> Result<String, AccountValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}
