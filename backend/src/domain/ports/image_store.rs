//! Port for uploaded picture storage.

use super::define_port_error;

/// Extensions accepted for uploaded pictures, lower-case with leading dot.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

define_port_error! {
    /// Failures raised by image storage adapters.
    pub enum ImageStoreError {
        TooLarge { size: usize, limit: usize } => "image is {size} bytes, limit is {limit}",
        UnsupportedExtension { extension: String } => "unsupported image extension `{extension}`",
        Io { message: String } => "image storage failed: {message}",
    }
}

/// Destination folder for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    Users,
    Items,
    Coordinates,
}

impl ImageFolder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Items => "items",
            Self::Coordinates => "coordinates",
        }
    }
}

/// Decoded upload awaiting storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Lower-cased extension of `file_name`, including the dot.
    ///
    /// # Examples
    /// ```
    /// use speadwear::domain::ports::ImageUpload;
    ///
    /// let upload = ImageUpload { file_name: "Look.PNG".into(), bytes: vec![] };
    /// assert_eq!(upload.extension(), Some(".png".to_owned()));
    /// ```
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.file_name.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(format!(".{}", ext.to_lowercase()))
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait ImageStore: Send + Sync {
    /// Persist `upload` under `folder`, returning the stored relative path.
    fn save(&self, folder: ImageFolder, upload: &ImageUpload) -> Result<String, ImageStoreError>;

    /// Remove a previously stored path.
    fn delete(&self, path: &str) -> Result<(), ImageStoreError>;
}
