//! Typed surrogate identifiers.
//!
//! Every entity is keyed by a database-assigned `BIGSERIAL`. Wrapping the raw
//! `i64` keeps a coordinate id from being passed where a user id is expected.
//! Identifiers serialise as bare integers.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = i64, example = 1)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`crate::domain::User`].
    UserId
);
define_id!(
    /// Identifier of an [`crate::domain::Item`].
    ItemId
);
define_id!(
    /// Identifier of a [`crate::domain::Coordinate`].
    CoordinateId
);
define_id!(CommentId);
define_id!(LikeId);
define_id!(RelationshipId);
define_id!(BlockId);
define_id!(NotificationId);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn identifiers_serialise_as_integers() {
        let value = serde_json::to_value(CoordinateId::new(42)).expect("serialise id");
        assert_eq!(value, serde_json::json!(42));
        let parsed: UserId = serde_json::from_value(serde_json::json!(7)).expect("parse id");
        assert_eq!(parsed.get(), 7);
    }
}
