use actix_web::{web, HttpResponse};
use cg_core::{AccountId, AuditLogRepository, IdentityProvider};
use validator::Validate;

use crate::app::AppState;
use crate::dto::DeleteAccountRequest;
use crate::handlers::ApiError;
use crate::middleware::AuthContext;

/// Handler for POST /api/v1/admin/delete-account
///
/// Irreversible. Answers `200 {success: true}` only once the provider has
/// confirmed the cascade delete.
pub async fn delete_account<P, A>(
    state: web::Data<AppState<P, A>>,
    auth: AuthContext,
    request: web::Json<DeleteAccountRequest>,
) -> Result<HttpResponse, ApiError>
where
    P: IdentityProvider + 'static,
    A: AuditLogRepository + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let acknowledgement = state
        .gateway
        .delete_account(&auth.caller, &AccountId::new(request.account_id.trim()))
        .await?;

    Ok(HttpResponse::Ok().json(acknowledgement))
}
