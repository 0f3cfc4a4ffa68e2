use actix_web::{web, HttpResponse};
use cg_core::{AuditLogRepository, Credential, DomainError, IdentityProvider, Role};
use validator::Validate;

use crate::app::AppState;
use crate::dto::{AccountResponse, CreateAccountRequest};
use crate::handlers::ApiError;
use crate::middleware::AuthContext;

/// Handler for POST /api/v1/admin/create-account
///
/// Provisions a pre-confirmed account. The role defaults to `patient`.
///
/// # Response
///
/// `201 {id, email, role}`
pub async fn create_account<P, A>(
    state: web::Data<AppState<P, A>>,
    auth: AuthContext,
    request: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse, ApiError>
where
    P: IdentityProvider + 'static,
    A: AuditLogRepository + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let role = match request.role.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw
            .parse::<Role>()
            .map_err(|e| DomainError::validation("role", e.to_string()))?,
        _ => Role::Patient,
    };

    let provision = cg_core::CreateAccountRequest::new(
        request.email,
        Credential::new(request.credential),
        role,
    )
    .with_metadata(request.metadata);

    let account = state
        .gateway
        .create_account(&auth.caller, provision)
        .await?;

    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}
