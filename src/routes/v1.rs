use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/photos", photo_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", get(handlers::auth::logout))
        .route("/me", get(handlers::auth::me))
}

fn photo_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::photo::list_photos).post(handlers::photo::upload_photo),
        )
        .route("/{id}", delete(handlers::photo::delete_photo))
        .route("/{id}/file", get(handlers::photo::download_photo))
        .layer(handlers::photo::upload_body_limit())
}
