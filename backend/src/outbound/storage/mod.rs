//! Filesystem storage for uploaded pictures.

mod fs_image_store;

pub use fs_image_store::{DEFAULT_MAX_UPLOAD_BYTES, FsImageStore};
