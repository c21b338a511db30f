pub mod category;
pub mod media;
pub mod upload;

pub use category::{Category, CategorySelection};
pub use media::{MediaKind, MediaKindText, MediaRecord, NewMediaRecord, Orientation};
pub use upload::{validate_caption, FieldError, FileUpload, MAX_CAPTION_LEN};
