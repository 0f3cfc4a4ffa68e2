use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use cg_api::{
    app::{create_app, AppState},
    middleware::{RateLimitConfig, RateLimiter, SecurityHeaders},
    telemetry::init_tracing,
};
use cg_core::{
    AuditService, AuditServiceConfig, AuthService, CredentialVerifier, ElevatedOperationGateway,
    GatewayConfig, PermissionPolicy, TokenService, TokenServiceConfig, TracingAuditLogRepository,
};
use cg_infra::HttpIdentityProvider;
use cg_shared::ProcessConfig;
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Nothing touches the network until every setting has been validated
    let config = match ProcessConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Refusing to start: {}", error);
            for violation in error.violations() {
                eprintln!("  - {}", violation);
            }
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    info!(
        environment = %config.environment(),
        bind_address = %config.bind_address(),
        "Starting Clinic Gate"
    );
    if !config.secrets_are_distinct() {
        warn!("Signing secret equals the elevated credential; use distinct values");
    }

    let provider = Arc::new(
        HttpIdentityProvider::from_config(&config)
            .context("failed to build identity provider client")?,
    );
    let verifier = Arc::new(
        CredentialVerifier::new(config.credential_hash_cost())
            .map_err(|e| anyhow::anyhow!("invalid credential hash cost: {}", e))?,
    );
    let policy = Arc::new(PermissionPolicy::default());
    // The sink only emits an event, so writes stay on the request task
    let audit_service = Arc::new(AuditService::new(
        Arc::new(TracingAuditLogRepository::new()),
        AuditServiceConfig {
            async_writes: false,
        },
    ));
    let gateway_config = GatewayConfig {
        provider_timeout: config.provider_timeout(),
        ..GatewayConfig::default()
    };
    let gateway = Arc::new(ElevatedOperationGateway::with_audit(
        Arc::clone(&provider),
        Arc::clone(&verifier),
        policy,
        audit_service,
        gateway_config,
    ));

    let token_service = Arc::new(TokenService::new(
        config.signing_secret(),
        TokenServiceConfig::with_ttl(config.token_ttl()),
    ));
    let auth_service = Arc::new(AuthService::new(
        provider,
        verifier,
        Arc::clone(&token_service),
        config.provider_timeout(),
    ));

    let rate_limiter = RateLimiter::new(RateLimitConfig {
        max_requests: config.rate_limit_max_requests(),
        window: config.rate_limit_window(),
    });
    let state = web::Data::new(
        AppState::new(gateway, auth_service, token_service)
            .with_rate_limiter(rate_limiter)
            .with_security_headers(SecurityHeaders::new(config.environment().is_production())),
    );
    let allowed_origins = config.allowed_origins();

    HttpServer::new(move || create_app(state.clone(), &allowed_origins))
        .bind(config.bind_address())
        .with_context(|| format!("failed to bind {}", config.bind_address()))?
        .run()
        .await
        .context("server terminated abnormally")
}
