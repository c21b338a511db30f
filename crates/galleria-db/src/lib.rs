//! Persistence collaborators for the Galleria pipeline.
//!
//! The ingestion endpoint consumes exactly two narrow contracts: a category
//! lookup returning `{id, category_name}` pairs and a persistence call that
//! stores finalized media records. Both are traits here, with Postgres
//! implementations for deployment and in-memory doubles for tests.

mod category;
mod media;
pub mod memory;

pub use category::{CategoryLookup, CategoryRepository};
pub use media::{GalleryRepository, MediaStore};
