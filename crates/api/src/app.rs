use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use domain::services::template_save::TemplateSaver;
use shared::jwt::JwtConfig;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    editor, guests, health, invitations, profiles, public, rsvps, setup, templates,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub saver: TemplateSaver,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    pub fn new(config: Config, jwt: JwtConfig, pool: PgPool, saver: TemplateSaver) -> Self {
        let rate_limiter =
            RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);
        Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            saver,
            rate_limiter,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        // Development: allow any origin
        layer.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Bearer token required
    let user_routes = Router::new()
        .route(
            "/api/v1/profiles/me",
            get(profiles::get_my_profile).put(profiles::update_my_profile),
        )
        .route(
            "/api/v1/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route("/api/v1/templates/public", get(templates::list_public_templates))
        .route("/api/v1/templates/local", get(templates::list_local_templates))
        .route("/api/v1/templates/sync", post(templates::sync_local_templates))
        .route(
            "/api/v1/templates/:template_id",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route(
            "/api/v1/invitations",
            get(invitations::list_invitations).post(invitations::create_invitation),
        )
        .route(
            "/api/v1/invitations/:invitation_id",
            get(invitations::get_invitation)
                .put(invitations::update_invitation)
                .delete(invitations::delete_invitation),
        )
        .route(
            "/api/v1/invitations/:invitation_id/guests",
            get(guests::list_guests).post(guests::create_guest),
        )
        .route(
            "/api/v1/invitations/:invitation_id/guests/:guest_id",
            put(guests::update_guest).delete(guests::delete_guest),
        )
        .route(
            "/api/v1/invitations/:invitation_id/rsvps",
            get(rsvps::list_rsvps),
        )
        .route("/api/v1/setup/status", get(setup::database_status))
        .route("/api/v1/setup", post(setup::run_setup))
        .route("/api/v1/setup/reset", post(setup::run_reset))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Editor: preview is open, save checks for a token itself
    let editor_routes = Router::new()
        .route("/api/v1/editor/preview", post(editor::preview))
        .route("/api/v1/editor/save", post(editor::save));

    // Guest-facing RSVP submission, limited per client IP
    let rsvp_routes = Router::new()
        .route(
            "/api/v1/public/invitations/:slug/rsvps",
            post(public::submit_rsvp),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/templates/catalog", get(templates::get_catalog))
        .route(
            "/api/v1/public/invitations/:slug",
            get(public::get_public_invitation),
        )
        .route("/i/:slug", get(public::invitation_page));

    Router::new()
        .merge(public_routes)
        .merge(rsvp_routes)
        .merge(editor_routes)
        .merge(user_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config.security.cors_origins))
        .with_state(state)
}
