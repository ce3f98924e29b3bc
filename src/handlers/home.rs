use axum::Json;
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::json;

use crate::extractors::auth::OptionalAuthUser;

/// Home. Authenticated callers are redirected to their photo listing;
/// everyone else gets a small service descriptor.
#[utoipa::path(
    get,
    path = "/",
    tag = "Home",
    operation_id = "home",
    summary = "Service home",
    responses(
        (status = 200, description = "Service descriptor"),
        (status = 303, description = "Redirect to the photo listing when authenticated"),
    ),
)]
pub async fn home(OptionalAuthUser(user): OptionalAuthUser) -> Response {
    if user.is_some() {
        return Redirect::to("/api/v1/photos").into_response();
    }

    Json(json!({
        "service": "photovault",
        "register": "/api/v1/auth/register",
        "login": "/api/v1/auth/login",
        "photos": "/api/v1/photos",
        "docs": "/api-docs/openapi.json",
    }))
    .into_response()
}
