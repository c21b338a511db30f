//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p galleria-api`. The tests use the
//! in-memory media store and a tempdir-backed asset host, so no external
//! services are needed.

pub mod fixtures;

use std::sync::Arc;

use axum_test::TestServer;
use galleria_api::{build_router, AppState};
use galleria_core::models::Category;
use galleria_core::Config;
use galleria_db::memory::{InMemoryMediaStore, StaticCategories};
use galleria_storage::LocalAssetHost;
use tempfile::TempDir;

/// Test application: server plus the collaborators the tests inspect.
pub struct TestApp {
    pub server: TestServer,
    pub store: InMemoryMediaStore,
    pub assets_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of files currently stored by the asset host.
    pub fn stored_asset_count(&self) -> usize {
        count_files(self.assets_dir.path())
    }
}

fn count_files(dir: &std::path::Path) -> usize {
    let mut count = 0;
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                count += count_files(&path);
            } else {
                count += 1;
            }
        }
    }
    count
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_token(None).await
}

pub async fn setup_test_app_with_token(admin_token: Option<&str>) -> TestApp {
    let assets_dir = tempfile::tempdir().expect("tempdir");
    let mut config = Config::for_tests(assets_dir.path().to_string_lossy().to_string());
    config.admin_token = admin_token.map(|t| t.to_string());

    let assets = LocalAssetHost::new(assets_dir.path(), config.asset_base_url.clone())
        .await
        .expect("asset host");
    let store = InMemoryMediaStore::new();
    let categories = StaticCategories::new(vec![
        Category {
            id: "3".to_string(),
            category_name: "Nature".to_string(),
        },
        Category {
            id: "7".to_string(),
            category_name: "Weddings".to_string(),
        },
    ]);

    let state = Arc::new(AppState::new(
        config,
        Arc::new(store.clone()),
        Arc::new(categories),
        Arc::new(assets),
    ));

    let server = TestServer::new(build_router(state)).expect("test server");
    TestApp {
        server,
        store,
        assets_dir,
    }
}
