//! Application state and factory
//!
//! This module holds the shared services and builds the actix-web
//! application around them.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, Resource, Route,
};
use cg_core::{
    AuditLogRepository, AuthService, ElevatedOperationGateway, IdentityProvider,
    NoOpAuditLogRepository, TokenService,
};
use tracing_actix_web::TracingLogger;

use crate::handlers::{json_error_handler, method_not_allowed, not_found, query_error_handler};
use crate::middleware::{create_cors, CallerResolver, JwtAuth, RateLimiter, SecurityHeaders};
use crate::routes::accounts::{change_role, create_account, delete_account, list_accounts};
use crate::routes::auth::login;
use crate::routes::health::health_check;

/// Application state that holds shared services
pub struct AppState<P, A = NoOpAuditLogRepository>
where
    P: IdentityProvider + 'static,
    A: AuditLogRepository + 'static,
{
    pub gateway: Arc<ElevatedOperationGateway<P, A>>,
    pub auth_service: Arc<AuthService<P>>,
    pub token_service: Arc<TokenService>,
    /// Shared by every worker so the limit is per process
    pub rate_limiter: RateLimiter,
    pub security_headers: SecurityHeaders,
}

impl<P, A> AppState<P, A>
where
    P: IdentityProvider + 'static,
    A: AuditLogRepository + 'static,
{
    pub fn new(
        gateway: Arc<ElevatedOperationGateway<P, A>>,
        auth_service: Arc<AuthService<P>>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            gateway,
            auth_service,
            token_service,
            rate_limiter: RateLimiter::default(),
            security_headers: SecurityHeaders::default(),
        }
    }

    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    pub fn with_security_headers(mut self, security_headers: SecurityHeaders) -> Self {
        self.security_headers = security_headers;
        self
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<P, A>(
    app_state: web::Data<AppState<P, A>>,
    allowed_origins: &[String],
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    P: IdentityProvider + 'static,
    A: AuditLogRepository + 'static,
{
    let resolver: Arc<dyn CallerResolver> = app_state.gateway.clone();
    let auth = JwtAuth::new(Arc::clone(&app_state.token_service), resolver);
    let rate_limiter = app_state.rate_limiter.clone();
    let security_headers = app_state.security_headers;

    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        // Outermost last: request spans cover CORS rejections too
        .wrap(create_cors(allowed_origins))
        .wrap(security_headers)
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .wrap(rate_limiter)
                .service(web::scope("/auth").service(single_verb(
                    "/login",
                    web::post().to(login::<P, A>),
                )))
                .service(
                    web::scope("/admin")
                        .service(single_verb(
                            "/create-account",
                            web::post()
                                .to(create_account::<P, A>)
                                .wrap(auth.clone()),
                        ))
                        .service(single_verb(
                            "/delete-account",
                            web::post()
                                .to(delete_account::<P, A>)
                                .wrap(auth.clone()),
                        ))
                        .service(single_verb(
                            "/change-role",
                            web::post().to(change_role::<P, A>).wrap(auth.clone()),
                        ))
                        .service(single_verb(
                            "/accounts",
                            web::get().to(list_accounts::<P, A>).wrap(auth),
                        )),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// A path served by one verb; any other verb gets 405 before authentication
fn single_verb(path: &str, route: Route) -> Resource {
    web::resource(path)
        .route(route)
        .default_service(web::route().to(method_not_allowed))
}
