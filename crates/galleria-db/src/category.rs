use async_trait::async_trait;
use galleria_core::models::Category;
use galleria_core::AppError;
use sqlx::{PgPool, Postgres};

/// Category lookup contract: an ordered list of `{id, category_name}` pairs
/// for the category selector.
#[async_trait]
pub trait CategoryLookup: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, AppError>;
}

/// Postgres-backed category lookup.
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryLookup for CategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<Postgres, Category>(
            "SELECT id, category_name FROM categories ORDER BY category_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }
}
