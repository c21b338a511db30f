//! Shared application state.

use std::sync::Arc;

use galleria_core::Config;
use galleria_db::{CategoryLookup, MediaStore};
use galleria_storage::AssetHost;

/// State shared across all request handlers.
pub struct AppState {
    pub config: Config,
    pub media: Arc<dyn MediaStore>,
    pub categories: Arc<dyn CategoryLookup>,
    pub assets: Arc<dyn AssetHost>,
}

impl AppState {
    pub fn new(
        config: Config,
        media: Arc<dyn MediaStore>,
        categories: Arc<dyn CategoryLookup>,
        assets: Arc<dyn AssetHost>,
    ) -> Self {
        AppState {
            config,
            media,
            categories,
            assets,
        }
    }
}
