//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` error whose `details` name the
//! offending field and a stable machine-readable code.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pagination::{PageRequest, PageRequestError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ImageUpload;
use crate::domain::{
    AttributeCodeError, CommentValidationError, CoordinateValidationError, Error,
    ItemValidationError, UserValidationError, optional_code, validate_rating,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidCode,
    OutOfRange,
    InvalidValue,
    InvalidImage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidCode => "invalid_code",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidImage => "invalid_image",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Serialize) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

fn attribute_error(err: AttributeCodeError) -> Error {
    ValidationError::new(err.attribute, err.to_string())
        .with_value(ErrorCode::InvalidCode, err.code)
}

/// Decode a required enumeration code.
pub(crate) fn parse_code<T>(code: i16) -> Result<T, Error>
where
    T: TryFrom<i16, Error = AttributeCodeError>,
{
    T::try_from(code).map_err(attribute_error)
}

/// Decode an enumeration code that may be absent from a partial update.
pub(crate) fn parse_optional_code<T>(code: Option<i16>) -> Result<Option<T>, Error>
where
    T: TryFrom<i16, Error = AttributeCodeError>,
{
    code.map(parse_code).transpose()
}

/// Decode a size code where `0` means "not recorded".
pub(crate) fn parse_size_code<T>(code: i16) -> Result<Option<T>, Error>
where
    T: TryFrom<i16, Error = AttributeCodeError>,
{
    optional_code(code).map_err(attribute_error)
}

pub(crate) fn parse_rating(field: FieldName, value: f64) -> Result<f64, Error> {
    validate_rating(value).map_err(|err| {
        ValidationError::new(field.as_str(), err.to_string())
            .with_value(ErrorCode::OutOfRange, value)
    })
}

pub(crate) fn parse_optional_rating(
    field: FieldName,
    value: Option<f64>,
) -> Result<Option<f64>, Error> {
    value.map(|raw| parse_rating(field, raw)).transpose()
}

/// Pagination query parameters shared by every list endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number; defaults to 1.
    #[param(minimum = 1)]
    pub page: Option<u32>,
    /// Page size between 1 and 100; defaults to 20.
    #[param(minimum = 1, maximum = 100)]
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub(crate) fn to_request(self) -> Result<PageRequest, Error> {
        PageRequest::from_query(self.page, self.per_page).map_err(|err| match err {
            PageRequestError::PageOutOfRange { page } => {
                ValidationError::new("page", err.to_string())
                    .with_value(ErrorCode::OutOfRange, page)
            }
            PageRequestError::PerPageOutOfRange { per_page, .. } => {
                ValidationError::new("per_page", err.to_string())
                    .with_value(ErrorCode::OutOfRange, per_page)
            }
        })
    }
}

/// Inline picture upload carried in JSON bodies.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ImagePayload {
    /// Original file name; only its extension is used.
    #[schema(example = "look.png")]
    pub file_name: String,
    /// Base64 (standard alphabet) file contents.
    pub data: String,
}

pub(crate) fn decode_image(payload: Option<ImagePayload>) -> Result<Option<ImageUpload>, Error> {
    let Some(payload) = payload else {
        return Ok(None);
    };
    let bytes = STANDARD.decode(payload.data.trim()).map_err(|_| {
        ValidationError::new("image", "image data must be base64 encoded")
            .with_code(ErrorCode::InvalidImage)
    })?;
    Ok(Some(ImageUpload {
        file_name: payload.file_name,
        bytes,
    }))
}

pub(crate) fn user_field_error(err: UserValidationError) -> Error {
    let field = match err {
        UserValidationError::NameLength { .. } => "name",
        UserValidationError::InvalidEmail => "email",
        UserValidationError::PasswordTooShort { .. } => "password",
    };
    ValidationError::new(field, err.to_string()).with_code(ErrorCode::InvalidValue)
}

pub(crate) fn item_field_error(err: ItemValidationError) -> Error {
    match err {
        ItemValidationError::RatingOutOfRange { value } => {
            ValidationError::new("rating", err.to_string()).with_value(ErrorCode::OutOfRange, value)
        }
        ItemValidationError::EmptySuperItem | ItemValidationError::SuperItemTooLong { .. } => {
            ValidationError::new("super_item", err.to_string()).with_code(ErrorCode::InvalidValue)
        }
    }
}

pub(crate) fn coordinate_field_error(err: CoordinateValidationError) -> Error {
    match err {
        CoordinateValidationError::NoItems => {
            ValidationError::new("item_ids", err.to_string()).with_code(ErrorCode::InvalidValue)
        }
        CoordinateValidationError::ShoeSizeOutOfRange { value } => {
            ValidationError::new("si_shoe_size", err.to_string())
                .with_value(ErrorCode::OutOfRange, value)
        }
    }
}

pub(crate) fn comment_field_error(err: CommentValidationError) -> Error {
    ValidationError::new("comment", err.to_string()).with_code(ErrorCode::InvalidValue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Season, TopLength};
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    fn unknown_codes_name_their_attribute() {
        let error = parse_code::<Season>(9).expect_err("out of range");

        assert_eq!(detail(&error, "field"), Some(&json!("season")));
        assert_eq!(detail(&error, "value"), Some(&json!(9)));
        assert_eq!(detail(&error, "code"), Some(&json!("invalid_code")));
    }

    #[rstest]
    #[case(0, None)]
    #[case(3, Some(TopLength::Long))]
    fn size_codes_treat_zero_as_unset(#[case] code: i16, #[case] expected: Option<TopLength>) {
        assert_eq!(parse_size_code::<TopLength>(code).expect("valid"), expected);
    }

    #[rstest]
    #[case(PageQuery { page: Some(0), per_page: None }, "page")]
    #[case(PageQuery { page: None, per_page: Some(101) }, "per_page")]
    fn page_bounds_are_reported_per_field(#[case] query: PageQuery, #[case] field: &str) {
        let error = query.to_request().expect_err("invalid paging");
        assert_eq!(detail(&error, "field"), Some(&json!(field)));
    }

    #[rstest]
    fn page_defaults_apply() {
        let request = PageQuery::default().to_request().expect("defaults");
        assert_eq!((request.page(), request.per_page()), (1, 20));
    }

    #[rstest]
    fn images_are_base64_decoded() {
        let upload = decode_image(Some(ImagePayload {
            file_name: "look.png".into(),
            data: STANDARD.encode([1_u8, 2, 3]),
        }))
        .expect("decodes")
        .expect("present");

        assert_eq!(upload.bytes, vec![1, 2, 3]);
        assert_eq!(upload.file_name, "look.png");
    }

    #[rstest]
    fn malformed_images_are_rejected() {
        let error = decode_image(Some(ImagePayload {
            file_name: "look.png".into(),
            data: "***".into(),
        }))
        .expect_err("not base64");

        assert_eq!(detail(&error, "code"), Some(&json!("invalid_image")));
    }
}
