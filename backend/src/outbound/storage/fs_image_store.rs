//! `ImageStore` backed by a capability directory handle.
//!
//! Files land at `<root>/<folder>/<unix_secs>_<nanos><ext>`. All access goes
//! through a `cap_std::fs::Dir` opened on the upload root, so stored paths
//! cannot escape it.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{
    ALLOWED_IMAGE_EXTENSIONS, ImageFolder, ImageStore, ImageStoreError, ImageUpload,
};

/// Upload ceiling used when none is configured (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Name collisions are retried with the next nanosecond this many times.
const NAME_ATTEMPTS: u32 = 8;

pub struct FsImageStore {
    root: Dir,
    max_bytes: usize,
    clock: Arc<dyn Clock>,
}

fn io_error(error: &io::Error) -> ImageStoreError {
    ImageStoreError::io(error.to_string())
}

impl FsImageStore {
    /// Open (creating if needed) the upload root.
    pub fn open(
        root: &Path,
        max_bytes: usize,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ImageStoreError> {
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(|e| io_error(&e))?;
        let root = Dir::open_ambient_dir(root, ambient_authority()).map_err(|e| io_error(&e))?;
        Ok(Self {
            root,
            max_bytes,
            clock,
        })
    }

    fn candidate_name(&self, attempt: u32, extension: &str) -> String {
        let now = self.clock.utc();
        let nanos = now.timestamp_subsec_nanos().saturating_add(attempt);
        format!("{}_{nanos:09}{extension}", now.timestamp())
    }

    /// Write `bytes` into the freshly created `relative`, removing the file
    /// again if the write fails part way.
    fn fill_or_discard(
        &self,
        relative: &str,
        file: &mut impl Write,
        bytes: &[u8],
    ) -> Result<(), ImageStoreError> {
        let Err(error) = file.write_all(bytes) else {
            return Ok(());
        };
        if let Err(cleanup) = self.root.remove_file(relative) {
            warn!(path = %relative, error = %cleanup, "could not remove partial picture");
        }
        Err(io_error(&error))
    }
}

impl ImageStore for FsImageStore {
    fn save(&self, folder: ImageFolder, upload: &ImageUpload) -> Result<String, ImageStoreError> {
        if upload.bytes.len() > self.max_bytes {
            return Err(ImageStoreError::too_large(upload.bytes.len(), self.max_bytes));
        }
        let extension = upload.extension().unwrap_or_default();
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ImageStoreError::unsupported_extension(extension));
        }

        self.root
            .create_dir_all(folder.as_str())
            .map_err(|e| io_error(&e))?;
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);

        for attempt in 0..NAME_ATTEMPTS {
            let name = self.candidate_name(attempt, &extension);
            let relative = format!("{}/{name}", folder.as_str());
            match self.root.open_with(&relative, &options) {
                Ok(mut file) => {
                    self.fill_or_discard(&relative, &mut file, &upload.bytes)?;
                    debug!(path = %relative, bytes = upload.bytes.len(), "stored picture");
                    return Ok(relative);
                }
                Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {}
                Err(error) => return Err(io_error(&error)),
            }
        }
        Err(ImageStoreError::io("could not allocate a unique file name"))
    }

    fn delete(&self, path: &str) -> Result<(), ImageStoreError> {
        match self.root.remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(&error)),
        }
    }
}
