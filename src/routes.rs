use crate::{
    routes::{
        directory::{
            get_directory, internal_post_next, internal_post_page, internal_post_previous,
            internal_post_search, internal_post_select, internal_post_toggle_field,
            internal_post_toggle_presentation,
        },
        index::get_index_route,
    },
    state::RollcallState,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub mod directory;
pub mod index;

pub fn router(state: RollcallState) -> Router {
    Router::new()
        .route("/", get(get_index_route))
        .route("/directory", get(get_directory))
        .route("/internal/directory/{id}/search", post(internal_post_search))
        .route("/internal/directory/{id}/select", post(internal_post_select))
        .route(
            "/internal/directory/{id}/toggle/{field}",
            post(internal_post_toggle_field),
        )
        .route("/internal/directory/{id}/next", post(internal_post_next))
        .route(
            "/internal/directory/{id}/previous",
            post(internal_post_previous),
        )
        .route(
            "/internal/directory/{id}/presentation",
            post(internal_post_toggle_presentation),
        )
        .route("/internal/directory/{id}/page/{page}", post(internal_post_page))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
