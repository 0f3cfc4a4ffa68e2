use actix_web::{web, HttpResponse};
use cg_core::{AuditLogRepository, Credential, IdentityProvider};
use validator::Validate;

use crate::app::AppState;
use crate::dto::LoginRequest;
use crate::handlers::ApiError;

/// Handler for POST /api/v1/auth/login
///
/// # Request Body
///
/// ```json
/// { "email": "admin@clinic.example", "credential": "..." }
/// ```
///
/// # Response
///
/// `200 {token, expiresIn, account}`. Unknown email and wrong credential
/// both answer `401` with the same body.
pub async fn login<P, A>(
    state: web::Data<AppState<P, A>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError>
where
    P: IdentityProvider + 'static,
    A: AuditLogRepository + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let result = state
        .auth_service
        .login(&request.email, Credential::new(request.credential))
        .await?;

    Ok(HttpResponse::Ok().json(result))
}
