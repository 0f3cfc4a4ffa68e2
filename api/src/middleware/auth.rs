//! Bearer-token authentication for the admin endpoints.
//!
//! The middleware verifies the session token, then asks the identity
//! provider for the caller's current role. The role inside the token is
//! never trusted for authorization.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use async_trait::async_trait;
use cg_core::{
    AccountId, AuditLogRepository, Caller, DomainError, DomainResult, ElevatedOperationGateway,
    IdentityProvider, TokenService,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::debug;

use crate::handlers::ApiError;

/// Authenticated caller injected into request extensions
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Caller with the role the provider reports right now
    pub caller: Caller,
    /// Token id, for correlating log lines
    pub jti: String,
}

/// Looks up a session subject's current role
#[async_trait]
pub trait CallerResolver: Send + Sync {
    async fn resolve_caller(&self, account_id: &AccountId) -> DomainResult<Caller>;
}

#[async_trait]
impl<P, A> CallerResolver for ElevatedOperationGateway<P, A>
where
    P: IdentityProvider + 'static,
    A: AuditLogRepository + 'static,
{
    async fn resolve_caller(&self, account_id: &AccountId) -> DomainResult<Caller> {
        ElevatedOperationGateway::resolve_caller(self, account_id).await
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    token_service: Arc<TokenService>,
    resolver: Arc<dyn CallerResolver>,
}

impl JwtAuth {
    pub fn new(token_service: Arc<TokenService>, resolver: Arc<dyn CallerResolver>) -> Self {
        Self {
            token_service,
            resolver,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            token_service: Arc::clone(&self.token_service),
            resolver: Arc::clone(&self.resolver),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    token_service: Arc<TokenService>,
    resolver: Arc<dyn CallerResolver>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let token_service = Arc::clone(&self.token_service);
        let resolver = Arc::clone(&self.resolver);

        Box::pin(async move {
            match authenticate(&req, &token_service, resolver.as_ref()).await {
                Ok(context) => {
                    req.extensions_mut().insert(context);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(error) => Ok(req.error_response(ApiError(error)).map_into_right_body()),
            }
        })
    }
}

async fn authenticate(
    req: &ServiceRequest,
    token_service: &TokenService,
    resolver: &dyn CallerResolver,
) -> DomainResult<AuthContext> {
    let token = extract_bearer_token(req).ok_or_else(|| {
        debug!(path = %req.path(), "Missing or malformed Authorization header");
        DomainError::Unauthenticated
    })?;

    let claims = token_service.verify(&token)?;
    let caller = resolver.resolve_caller(&claims.account_id()).await?;

    Ok(AuthContext {
        caller,
        jti: claims.jti,
    })
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError(DomainError::Unauthenticated).into());

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[::core::prelude::v1::test]
    fn test_extract_bearer_token() {
        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), Some("test_token_123".to_string()));

        let req_no_bearer = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_empty = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer "))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_empty), None);

        let req_no_header = test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }
}
