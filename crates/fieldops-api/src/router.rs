//! Route table and middleware layering

use std::time::Duration;

use axum::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{
    auth, brands, customers, exports, health, orders, products, tenants, tiers, users, visits,
};
use crate::middleware::require_auth;
use crate::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the full application router. Everything under `/api/v1` except
/// the auth endpoints sits behind the bearer-token middleware.
pub fn build_router(state: AppState) -> Router {
    // Public routes (no token)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh));

    // Protected routes
    let protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/tenants", post(tenants::create).get(tenants::list))
        .route(
            "/api/v1/tenants/{id}",
            get(tenants::get)
                .patch(tenants::update)
                .delete(tenants::delete),
        )
        .route("/api/v1/users", post(users::create).get(users::list))
        .route(
            "/api/v1/users/{id}",
            get(users::get).patch(users::update).delete(users::delete),
        )
        .route(
            "/api/v1/customers",
            post(customers::create).get(customers::list),
        )
        .route(
            "/api/v1/customers/{id}",
            get(customers::get)
                .patch(customers::update)
                .delete(customers::delete),
        )
        .route("/api/v1/brands", post(brands::create).get(brands::list))
        .route(
            "/api/v1/brands/{id}",
            get(brands::get)
                .patch(brands::update)
                .delete(brands::delete),
        )
        .route("/api/v1/tiers", post(tiers::create).get(tiers::list))
        .route(
            "/api/v1/tiers/{id}",
            get(tiers::get).patch(tiers::update).delete(tiers::delete),
        )
        .route(
            "/api/v1/products",
            post(products::create).get(products::list),
        )
        .route(
            "/api/v1/products/{id}",
            get(products::get)
                .patch(products::update)
                .delete(products::delete),
        )
        .route("/api/v1/orders", post(orders::create).get(orders::list))
        .route(
            "/api/v1/orders/{id}",
            get(orders::get)
                .patch(orders::update)
                .delete(orders::delete),
        )
        .route("/api/v1/exports", post(exports::create).get(exports::list))
        .route(
            "/api/v1/exports/{id}",
            get(exports::get).patch(exports::update),
        )
        .route("/api/v1/visits", post(visits::create).get(visits::list))
        .route(
            "/api/v1/visits/{id}",
            get(visits::get).patch(visits::update),
        )
        .route("/api/v1/visits/{id}/start", post(visits::start))
        .route("/api/v1/visits/{id}/complete", post(visits::complete))
        .route("/api/v1/visits/{id}/cancel", post(visits::cancel))
        .route("/api/v1/visits/{id}/miss", post(visits::miss))
        .route("/api/v1/visits/{id}/history", get(visits::history))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PATCH,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
