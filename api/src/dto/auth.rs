use serde::Deserialize;
use validator::Validate;

/// Body of `POST /api/v1/auth/login`
///
/// Not `Debug`: the credential must never reach a log line.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 320, message = "is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "is required"))]
    pub credential: String,
}
