//! CORS middleware configuration for the browser client.
//!
//! Origins come from the validated process configuration: the public origin,
//! any additional origins and, outside production, the local dev servers.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tracing::info;

/// Preflight cache lifetime in seconds
const PREFLIGHT_MAX_AGE: usize = 3600;

/// Creates a CORS middleware instance restricted to `allowed_origins`
pub fn create_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(PREFLIGHT_MAX_AGE)
        .supports_credentials();

    for origin in allowed_origins {
        info!(origin = %origin, "Adding allowed origin");
        cors = cors.allowed_origin(origin);
    }

    cors
}
