//! Shared translation from adapter failures into domain errors.

use tracing::warn;

use super::Error;
use super::ports::{
    CredentialError, ImageFolder, ImageStore, ImageStoreError, ImageUpload, RepositoryError,
};

/// Map a repository failure. Unique violations become `Conflict` with the
/// adapter's message; callers wanting a friendlier message use
/// [`conflict_as`].
pub(crate) fn map_repository_error(error: RepositoryError) -> Error {
    match error {
        RepositoryError::Connection { message } => {
            Error::service_unavailable(format!("repository unavailable: {message}"))
        }
        RepositoryError::Query { message } => {
            Error::internal(format!("repository error: {message}"))
        }
        RepositoryError::Duplicate { message } => Error::conflict(message),
    }
}

/// Like [`map_repository_error`] but replaces the conflict message.
pub(crate) fn conflict_as(message: &'static str) -> impl Fn(RepositoryError) -> Error {
    move |error| match error {
        RepositoryError::Duplicate { .. } => Error::conflict(message),
        other => map_repository_error(other),
    }
}

pub(crate) fn map_credential_error(error: CredentialError) -> Error {
    match error {
        CredentialError::InvalidToken { message } => Error::unauthorized(message),
        CredentialError::Backend { message } => {
            Error::internal(format!("credential backend failed: {message}"))
        }
    }
}

fn map_image_error(error: ImageStoreError) -> Error {
    match error {
        ImageStoreError::Io { message } => {
            Error::internal(format!("image storage failed: {message}"))
        }
        other => Error::invalid_request(other.to_string()),
    }
}

/// Save an optional upload, returning its stored path.
pub(crate) fn store_picture(
    images: &dyn ImageStore,
    folder: ImageFolder,
    upload: Option<&ImageUpload>,
) -> Result<Option<String>, Error> {
    upload
        .map(|upload| images.save(folder, upload).map_err(map_image_error))
        .transpose()
}

/// Remove a stored picture; failures are logged and dropped.
pub(crate) fn discard_picture(images: &dyn ImageStore, path: Option<&str>) {
    let Some(path) = path else {
        return;
    };
    if let Err(error) = images.delete(path) {
        warn!(%error, path, "failed to delete stored picture");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockImageStore;
    use rstest::rstest;

    #[rstest]
    #[case(RepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(RepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(RepositoryError::duplicate("likes_pkey"), ErrorCode::Conflict)]
    fn repository_errors_map_to_codes(#[case] error: RepositoryError, #[case] code: ErrorCode) {
        assert_eq!(map_repository_error(error).code(), code);
    }

    #[rstest]
    fn conflict_as_rewrites_only_duplicates() {
        let mapped = conflict_as("already following")(RepositoryError::duplicate("x"));
        assert_eq!(mapped.message(), "already following");
        let untouched = conflict_as("already following")(RepositoryError::query("x"));
        assert_eq!(untouched.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn oversized_uploads_are_invalid_requests() {
        let mut images = MockImageStore::new();
        images
            .expect_save()
            .return_once(|_, _| Err(ImageStoreError::too_large(11_usize, 10_usize)));
        let upload = ImageUpload {
            file_name: "a.png".into(),
            bytes: vec![0; 11],
        };
        let error = store_picture(&images, ImageFolder::Items, Some(&upload))
            .expect_err("upload rejected");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn discard_swallows_failures() {
        let mut images = MockImageStore::new();
        images
            .expect_delete()
            .times(1)
            .return_once(|_| Err(ImageStoreError::io("gone")));
        discard_picture(&images, Some("items/a.png"));
        discard_picture(&images, None);
    }
}
