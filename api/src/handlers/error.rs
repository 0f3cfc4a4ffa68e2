//! Translation of domain errors into HTTP responses.

use std::fmt;

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use cg_core::DomainError;
use cg_shared::{error_codes, ErrorResponse};
use validator::ValidationErrors;

/// A `DomainError` on its way out of a handler or middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        ApiError(error)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError(first_violation(&errors))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
            DomainError::Unauthenticated => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::NotFound => StatusCode::NOT_FOUND,
            DomainError::Conflict => StatusCode::CONFLICT,
            DomainError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(handle_domain_error(&self.0))
    }
}

/// Error body for a domain error
///
/// Internal failure detail stays in the server log; only the correlation
/// id of an upstream failure reaches the caller.
pub fn handle_domain_error(error: &DomainError) -> ErrorResponse {
    match error {
        DomainError::Validation { field, message } => {
            ErrorResponse::new(error.code(), format!("{} {}", field, message))
                .add_detail("field", field)
        }
        DomainError::Upstream { correlation_id } => {
            ErrorResponse::new(error.code(), "Identity provider request failed")
                .add_detail("correlation_id", correlation_id.to_string())
        }
        DomainError::Internal { .. } => {
            ErrorResponse::new(error.code(), "An internal error occurred")
        }
        other => ErrorResponse::new(other.code(), other.to_string()),
    }
}

/// Body for a verb not served on an existing path
pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ErrorResponse::new(
        error_codes::METHOD_NOT_ALLOWED,
        "Method not allowed",
    ))
}

/// Default 404 handler
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}

/// Malformed or mistyped JSON bodies become 400s with the standard body
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &error {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!(
            "Invalid request body at line {}, column {}",
            e.line(),
            e.column()
        ),
        _ => "Invalid request body".to_string(),
    };
    let response =
        HttpResponse::BadRequest().json(ErrorResponse::new(error_codes::BAD_REQUEST, message));
    actix_web::error::InternalError::from_response(error, response).into()
}

/// Unparseable query strings become 400s with the standard body
pub fn query_error_handler(error: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::BAD_REQUEST,
        "Invalid query string",
    ));
    actix_web::error::InternalError::from_response(error, response).into()
}

/// First failing field, reported in the camelCase used on the wire
fn first_violation(errors: &ValidationErrors) -> DomainError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    match fields.into_iter().next() {
        Some((field, details)) => {
            let message = details
                .first()
                .and_then(|d| d.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "is invalid".to_string());
            DomainError::validation(camel_case(field), message)
        }
        None => DomainError::validation("body", "is invalid"),
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
