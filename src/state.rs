use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::storage::MediaStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub media: Arc<dyn MediaStore>,
    pub config: AppConfig,
}
