use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Media kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    /// Infer the media kind from a declared MIME type.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let ct = content_type.to_lowercase();
        if ct.starts_with("image/") {
            Some(MediaKind::Image)
        } else if ct.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// Display orientation of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Portrait iff height > width. A square image falls through to
    /// landscape; the product has not confirmed a different intent.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if height > width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "landscape" => Some(Orientation::Landscape),
            "portrait" => Some(Orientation::Portrait),
            _ => None,
        }
    }
}

/// A finalized media record, ready for a single insert. Built by the
/// ingestion endpoint after the binary has been uploaded to the asset host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMediaRecord {
    pub owner_id: String,
    pub category_id: String,
    pub category_name: String,
    pub asset_url: String,
    /// Host-side identifier, kept for later deletion. Absent for videos.
    pub asset_public_id: Option<String>,
    pub media_kind: MediaKind,
    pub orientation: Option<Orientation>,
    pub width_px: i32,
    pub height_px: i32,
    pub caption: String,
    pub is_active: bool,
    pub is_black_and_white: Option<bool>,
}

/// A persisted media record. Never mutated by the upload pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct MediaRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub category_id: String,
    pub category_name: String,
    pub asset_url: String,
    pub asset_public_id: Option<String>,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub media_kind: MediaKindText,
    pub orientation: Option<String>,
    pub width_px: i32,
    pub height_px: i32,
    pub caption: String,
    pub is_active: bool,
    pub is_black_and_white: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// Text-backed wrapper so `media_kind` round-trips through a TEXT column
/// without a custom Postgres enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaKindText(pub MediaKind);

impl TryFrom<String> for MediaKindText {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        MediaKind::parse(&s)
            .map(MediaKindText)
            .ok_or_else(|| format!("unknown media kind: {s}"))
    }
}

impl From<MediaKind> for MediaKindText {
    fn from(kind: MediaKind) -> Self {
        MediaKindText(kind)
    }
}
