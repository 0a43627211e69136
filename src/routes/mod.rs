use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use contact_relay_notification::Mailer;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{Config, CorsConfig};

pub mod contact;
pub mod health;

/// Preflight answers may be cached by browsers for a day.
const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: Config, mailer: impl Mailer) -> Self {
        Self {
            config: Arc::new(config),
            mailer: Arc::new(mailer),
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config.cors);

    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .route("/api/contact", post(contact::submit))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    // Any request header for `*`, otherwise only what the form sends.
    let (allow_origin, allow_headers) = if config.allow_origins.iter().any(|origin| origin == "*") {
        (AllowOrigin::any(), AllowHeaders::any())
    } else {
        let origins = config.allow_origins.iter().filter_map(|origin| {
            match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                    None
                }
            }
        });

        (
            AllowOrigin::list(origins),
            AllowHeaders::list([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(allow_headers)
        .max_age(CORS_MAX_AGE)
}
