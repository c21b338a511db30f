use async_trait::async_trait;
use chrono::Utc;
use galleria_core::models::{MediaRecord, NewMediaRecord};
use galleria_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Persistence contract: store one finalized media record. Every write is a
/// fresh insert; this pipeline never updates an existing record.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn create_record(&self, record: NewMediaRecord) -> Result<MediaRecord, AppError>;
}

/// Postgres-backed media store for the gallery table.
#[derive(Clone)]
pub struct GalleryRepository {
    pool: PgPool,
}

impl GalleryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaStore for GalleryRepository {
    async fn create_record(&self, record: NewMediaRecord) -> Result<MediaRecord, AppError> {
        let row: MediaRecord = sqlx::query_as::<Postgres, MediaRecord>(
            r#"
            INSERT INTO gallery_media (
                id, owner_id, category_id, category_name,
                asset_url, asset_public_id, media_kind, orientation,
                width_px, height_px, caption, is_active, is_black_and_white,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.owner_id)
        .bind(&record.category_id)
        .bind(&record.category_name)
        .bind(&record.asset_url)
        .bind(&record.asset_public_id)
        .bind(record.media_kind.as_str())
        .bind(record.orientation.map(|o| o.as_str()))
        .bind(record.width_px)
        .bind(record.height_px)
        .bind(&record.caption)
        .bind(record.is_active)
        .bind(record.is_black_and_white)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            id = %row.id,
            category = %row.category_name,
            kind = %record.media_kind.as_str(),
            "Persisted gallery media record"
        );

        Ok(row)
    }
}
