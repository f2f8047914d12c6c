use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{
    InMemoryTranslationCache, NullTranslationCache, TranslationCache, TranslationService,
};
use persistence::repositories::PgTranslationRepository;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{CacheConfig, Config};
use crate::middleware::{metrics_handler, metrics_middleware, require_user_auth, trace_id};
use crate::routes::{auth, health, translations};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub translations: TranslationService,
}

/// Cache backing the locale bulk read, selected by `cache.driver`.
pub fn build_cache(config: &CacheConfig) -> Arc<dyn TranslationCache> {
    match config.driver.as_str() {
        "none" => Arc::new(NullTranslationCache),
        _ => Arc::new(InMemoryTranslationCache::new()),
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let repository =
        PgTranslationRepository::new(pool.clone(), build_cache(&config.cache), config.cache.ttl());

    let state = AppState {
        pool,
        config: config.clone(),
        translations: TranslationService::new(Arc::new(repository)),
    };

    // Bearer token required
    let protected_routes = Router::new()
        .route(
            "/api/translations",
            get(translations::list_translations).post(translations::create_translation),
        )
        .route(
            "/api/translations/:id",
            get(translations::show_translation)
                .put(translations::update_translation)
                .patch(translations::update_translation)
                .delete(translations::delete_translation),
        )
        .route(
            "/api/translations/locale/:locale",
            get(translations::get_by_locale),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/login", post(auth::login))
        .route("/api/login", post(auth::login))
        .route(
            "/api/translations/json/:locale",
            get(translations::get_json_translations),
        )
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (bottom layers run first)
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
