//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes. The active request trace identifier is stamped onto every error
//! body and response header here, at the boundary.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::ports::{AccountPersistenceError, CustomerPersistenceError};
use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::{TRACE_ID_HEADER, TraceId};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn prepare_for_client(error: &Error) -> Error {
    // Do not leak internal failure detail to clients.
    let mut outgoing = if matches!(error.code(), ErrorCode::InternalError) {
        Error::internal("Internal server error")
    } else {
        error.clone()
    };
    if outgoing.trace_id().is_none() {
        if let Some(id) = TraceId::current() {
            outgoing = outgoing.with_trace_id(id.to_string());
        }
    }
    outgoing
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let outgoing = prepare_for_client(self);
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = outgoing.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(outgoing)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}

/// Map account persistence failures onto HTTP-safe domain errors.
///
/// Duplicate-email violations are deliberately not handled here: handlers
/// turn them into field-scoped validation errors before reaching for this
/// fallback, which maps any stray duplicate onto a generic conflict.
pub(crate) fn map_account_storage_error(error: AccountPersistenceError) -> Error {
    match error {
        AccountPersistenceError::Connection { message } => {
            error!(%message, "account storage unavailable");
            Error::service_unavailable("account storage unavailable")
        }
        AccountPersistenceError::Query { message } => Error::internal(message),
        AccountPersistenceError::DuplicateEmail => {
            Error::conflict("an account with this email already exists")
        }
    }
}

/// Map customer persistence failures onto HTTP-safe domain errors.
pub(crate) fn map_customer_storage_error(error: CustomerPersistenceError) -> Error {
    match error {
        CustomerPersistenceError::Connection { message } => {
            error!(%message, "customer storage unavailable");
            Error::service_unavailable("customer storage unavailable")
        }
        CustomerPersistenceError::Query { message } => Error::internal(message),
        CustomerPersistenceError::DuplicateEmail => {
            Error::conflict("a customer with this email already exists")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED)]
    #[case(ErrorCode::Forbidden, StatusCode::FORBIDDEN)]
    #[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
    #[case(ErrorCode::Conflict, StatusCode::CONFLICT)]
    #[case(ErrorCode::ServiceUnavailable, StatusCode::SERVICE_UNAVAILABLE)]
    #[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_expected_status(#[case] code: ErrorCode, #[case] expected: StatusCode) {
        assert_eq!(status_for(code), expected);
    }

    #[test]
    fn internal_errors_are_redacted() {
        let prepared = prepare_for_client(&Error::internal("pool exhausted: secret dsn"));
        assert_eq!(prepared.message(), "Internal server error");
    }

    #[test]
    fn non_internal_errors_keep_their_message() {
        let prepared = prepare_for_client(&Error::forbidden("administrator role required"));
        assert_eq!(prepared.message(), "administrator role required");
    }

    #[test]
    fn connection_failures_surface_as_service_unavailable() {
        let mapped = map_account_storage_error(AccountPersistenceError::connection("refused"));
        assert_eq!(mapped.code(), ErrorCode::ServiceUnavailable);
    }

    #[test]
    fn duplicate_email_falls_back_to_conflict() {
        let mapped = map_account_storage_error(AccountPersistenceError::DuplicateEmail);
        assert_eq!(mapped.code(), ErrorCode::Conflict);
    }
}
