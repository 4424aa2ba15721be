//! Helper macro for declaring port error enums.
//!
//! `define_port_error!` expands to a `thiserror` enum plus one snake_case
//! constructor per variant. Constructor parameters accept `impl Into<T>` so
//! adapters can pass `&str` or `String` interchangeably.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum UploadError {
            TooLarge { limit: u64 } => "upload exceeds {limit} bytes",
            Rejected { extension: String } => "extension {extension} is not accepted",
            Io { path: String, message: String } => "{path}: {message}",
            Missing => "upload missing",
        }
    }

    #[test]
    fn field_constructors_convert_arguments() {
        assert_eq!(
            UploadError::rejected(".exe").to_string(),
            "extension .exe is not accepted"
        );
        assert_eq!(
            UploadError::too_large(10_u64).to_string(),
            "upload exceeds 10 bytes"
        );
    }

    #[test]
    fn multi_field_constructor_preserves_order() {
        let err = UploadError::io("items/a.png", "denied");
        assert_eq!(err.to_string(), "items/a.png: denied");
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(UploadError::missing(), UploadError::Missing);
    }
}
