//! Core types shared across the Galleria workspace.
//!
//! This crate holds the domain models (media records, categories, upload
//! payloads), the unified `AppError` type, and the environment-driven
//! configuration used by the server binary.

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
