use actix_web::{web, HttpResponse};
use cg_core::{AccountId, AuditLogRepository, DomainError, IdentityProvider, Role};
use validator::Validate;

use crate::app::AppState;
use crate::dto::{AccountResponse, ChangeRoleRequest};
use crate::handlers::ApiError;
use crate::middleware::AuthContext;

/// Handler for POST /api/v1/admin/change-role
pub async fn change_role<P, A>(
    state: web::Data<AppState<P, A>>,
    auth: AuthContext,
    request: web::Json<ChangeRoleRequest>,
) -> Result<HttpResponse, ApiError>
where
    P: IdentityProvider + 'static,
    A: AuditLogRepository + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let role = request
        .role
        .parse::<Role>()
        .map_err(|e| DomainError::validation("role", e.to_string()))?;

    let account = state
        .gateway
        .change_role(&auth.caller, &AccountId::new(request.account_id.trim()), role)
        .await?;

    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}
