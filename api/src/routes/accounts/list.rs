use actix_web::{web, HttpResponse};
use cg_core::{AuditLogRepository, IdentityProvider};
use validator::Validate;

use crate::app::AppState;
use crate::dto::{AccountListResponse, ListAccountsQuery};
use crate::handlers::ApiError;
use crate::middleware::AuthContext;

/// Handler for GET /api/v1/admin/accounts?q=&page=&perPage=
///
/// One provider page per request; `hasMore` tells the client whether to
/// ask for the next one.
pub async fn list_accounts<P, A>(
    state: web::Data<AppState<P, A>>,
    auth: AuthContext,
    query: web::Query<ListAccountsQuery>,
) -> Result<HttpResponse, ApiError>
where
    P: IdentityProvider + 'static,
    A: AuditLogRepository + 'static,
{
    let query = query.into_inner();
    query.validate()?;

    let mut listing = state.gateway.list_accounts(&auth.caller, query.q).await?;
    if let Some(per_page) = query.per_page {
        listing = listing.with_page_size(per_page);
    }

    let page_number = query.page.unwrap_or(1);
    let page = listing.page(page_number).await?;

    Ok(HttpResponse::Ok().json(AccountListResponse::from_page(
        page,
        page_number,
        listing.per_page(),
    )))
}
