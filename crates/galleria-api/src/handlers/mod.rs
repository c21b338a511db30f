pub mod categories;
pub mod gallery_upload;
