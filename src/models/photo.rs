use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::photo;

/// Sort orders accepted by the photo listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSort {
    /// Order by display name ascending (the default).
    Name,
    /// Order by upload time ascending.
    Date,
}

impl PhotoSort {
    /// Parse the `sort` query parameter. `date` selects upload-time order;
    /// anything else, including absence, falls back to name order.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("date") => PhotoSort::Date,
            _ => PhotoSort::Name,
        }
    }
}

/// Query parameters for the photo listing.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListPhotosQuery {
    /// `date` to order by upload time ascending; any other value or absence
    /// orders by display name ascending.
    pub sort: Option<String>,
}

/// A single photo record as returned by the API.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PhotoResponse {
    /// Photo ID.
    #[schema(example = 7)]
    pub id: i32,
    /// User-visible name: `<name>-<64 hex chars>`.
    #[schema(example = "vacation-3f2a...")]
    pub display_name: String,
    /// MIME type guessed from the uploaded filename, if any.
    #[schema(example = "image/jpeg")]
    pub content_type: Option<String>,
    /// Size of the stored file in bytes.
    #[schema(example = 123456)]
    pub size: i64,
    /// Upload timestamp (UTC).
    pub uploaded_at: DateTime<Utc>,
}

impl From<photo::Model> for PhotoResponse {
    fn from(model: photo::Model) -> Self {
        Self {
            id: model.id,
            display_name: model.display_name,
            content_type: model.content_type,
            size: model.size,
            uploaded_at: model.uploaded_at,
        }
    }
}

/// Photo listing response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PhotoListResponse {
    pub photos: Vec<PhotoResponse>,
    /// Number of photos in `photos`.
    #[schema(example = 3)]
    pub total: u64,
}
