//! In-memory collaborator doubles for tests and local development.

use async_trait::async_trait;
use chrono::Utc;
use galleria_core::models::{Category, MediaKindText, MediaRecord, NewMediaRecord};
use galleria_core::AppError;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::{CategoryLookup, MediaStore};

/// Media store that keeps records in a Vec, optionally failing every insert.
#[derive(Clone, Default)]
pub struct InMemoryMediaStore {
    records: Arc<Mutex<Vec<MediaRecord>>>,
    fail_inserts: Arc<Mutex<bool>>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent insert fail, for error-path tests.
    pub fn fail_inserts(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_inserts.lock() {
            *flag = fail;
        }
    }

    pub fn records(&self) -> Vec<MediaRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn create_record(&self, record: NewMediaRecord) -> Result<MediaRecord, AppError> {
        let failing = self.fail_inserts.lock().map(|f| *f).unwrap_or(false);
        if failing {
            return Err(AppError::Internal("insert failure injected".to_string()));
        }

        let persisted = MediaRecord {
            id: Uuid::new_v4(),
            owner_id: record.owner_id,
            category_id: record.category_id,
            category_name: record.category_name,
            asset_url: record.asset_url,
            asset_public_id: record.asset_public_id,
            media_kind: MediaKindText(record.media_kind),
            orientation: record.orientation.map(|o| o.as_str().to_string()),
            width_px: record.width_px,
            height_px: record.height_px,
            caption: record.caption,
            is_active: record.is_active,
            is_black_and_white: record.is_black_and_white,
            created_at: Utc::now(),
        };

        self.records
            .lock()
            .map_err(|_| AppError::Internal("media store poisoned".to_string()))?
            .push(persisted.clone());

        Ok(persisted)
    }
}

/// Category lookup over a fixed list.
#[derive(Clone)]
pub struct StaticCategories {
    categories: Vec<Category>,
}

impl StaticCategories {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }
}

#[async_trait]
impl CategoryLookup for StaticCategories {
    async fn list(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.categories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galleria_core::models::{MediaKind, Orientation};

    fn record() -> NewMediaRecord {
        NewMediaRecord {
            owner_id: "user-1".to_string(),
            category_id: "7".to_string(),
            category_name: "Weddings".to_string(),
            asset_url: "http://assets/gallery/Weddings/1.jpg".to_string(),
            asset_public_id: Some("gallery/Weddings/1.jpg".to_string()),
            media_kind: MediaKind::Image,
            orientation: Some(Orientation::Landscape),
            width_px: 2016,
            height_px: 1512,
            caption: String::new(),
            is_active: true,
            is_black_and_white: Some(false),
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let store = InMemoryMediaStore::new();
        let persisted = store.create_record(record()).await.unwrap();
        assert_eq!(persisted.category_name, "Weddings");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = InMemoryMediaStore::new();
        store.fail_inserts(true);
        assert!(store.create_record(record()).await.is_err());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_static_categories_preserve_order() {
        let lookup = StaticCategories::new(vec![
            Category {
                id: "1".to_string(),
                category_name: "Nature".to_string(),
            },
            Category {
                id: "7".to_string(),
                category_name: "Weddings".to_string(),
            },
        ]);
        let list = lookup.list().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].category_name, "Nature");
    }
}
