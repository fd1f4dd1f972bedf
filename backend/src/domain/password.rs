//! Password credential types and strength rules.
//!
//! The domain only ever sees hashed credentials; hashing itself is an
//! injected capability (see [`crate::domain::ports::PasswordHasher`]) so the
//! policy and entity code stays pure and unit-testable.

use thiserror::Error;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// A salted password hash in PHC string format.
///
/// Deliberately opaque: no serde implementations, so a hash can never leak
/// through a serialized read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-computed PHC string.
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Borrow the PHC string for verification or storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A single way a candidate password fails the strength rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordStrengthViolation {
    /// Shorter than [`MIN_PASSWORD_LEN`] characters.
    #[error("password must contain at least 8 characters")]
    TooShort,
    /// Consists only of digits.
    #[error("password must not be entirely numeric")]
    EntirelyNumeric,
}

/// Check a candidate password against the platform strength rules.
///
/// Returns every violation rather than the first, so callers can report all
/// problems in one field-scoped response.
///
/// # Examples
/// ```
/// use backend::domain::password::strength_violations;
///
/// assert!(strength_violations("Str0ngP@ss!").is_empty());
/// assert_eq!(strength_violations("1234").len(), 2);
/// ```
pub fn strength_violations(candidate: &str) -> Vec<PasswordStrengthViolation> {
    let mut violations = Vec::new();
    if candidate.chars().count() < MIN_PASSWORD_LEN {
        violations.push(PasswordStrengthViolation::TooShort);
    }
    if !candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_digit()) {
        violations.push(PasswordStrengthViolation::EntirelyNumeric);
    }
    violations
}
