//! Route definitions for the Paddy Reception Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create the `/paddy` routes. Every path under the prefix, unknown ones
/// included, goes through the session gate.
pub fn paddy_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/producers", producer_routes())
        .nest("/discounts-percent", discount_percent_routes())
        .nest("/templates", template_routes())
        .nest("/receptions", reception_routes())
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Producer routes
fn producer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_producers).post(handlers::create_producer),
        )
        .route(
            "/:producer_id",
            get(handlers::get_producer)
                .put(handlers::update_producer)
                .delete(handlers::delete_producer),
        )
}

/// Discount range routes
fn discount_percent_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_discount_percents).post(handlers::create_discount_percent),
        )
        .route("/code/:code", get(handlers::list_discount_percents_by_code))
        .route(
            "/:range_id",
            get(handlers::get_discount_percent)
                .put(handlers::update_discount_percent)
                .delete(handlers::delete_discount_percent),
        )
}

/// Template routes
fn template_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_templates).post(handlers::create_template),
        )
        .route("/default", get(handlers::get_default_template))
        .route(
            "/:template_id",
            get(handlers::get_template)
                .put(handlers::update_template)
                .delete(handlers::delete_template),
        )
}

/// Reception routes, including the operator's draft
fn reception_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_receptions).post(handlers::create_reception),
        )
        .route(
            "/draft",
            get(handlers::get_draft)
                .patch(handlers::update_draft)
                .delete(handlers::discard_draft),
        )
        .route(
            "/draft/template",
            post(handlers::load_draft_template).delete(handlers::cancel_draft_template),
        )
        .route("/draft/save", post(handlers::save_draft))
        .route("/draft/receipt", get(handlers::get_draft_receipt))
        .route(
            "/:reception_id",
            get(handlers::get_reception)
                .put(handlers::update_reception)
                .delete(handlers::delete_reception),
        )
}
