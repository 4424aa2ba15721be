//! Fixed clothing attribute vocabularies.
//!
//! Each enumeration is stored as `SMALLINT` and exchanged on the wire as its
//! integer code. Size attributes are optional: the wire value `0` means the
//! size was not recorded and decodes to `None` through [`optional_code`].

use thiserror::Error;

/// A code outside the vocabulary of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{attribute} code {code} is out of range")]
pub struct AttributeCodeError {
    pub attribute: &'static str,
    pub code: i16,
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($label:literal) {
            $($variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All members in code order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Integer code persisted and exchanged on the wire.
            #[must_use]
            pub const fn code(self) -> i16 {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl TryFrom<i16> for $name {
            type Error = AttributeCodeError;

            fn try_from(code: i16) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(AttributeCodeError { attribute: $label, code }),
                }
            }
        }

        impl From<$name> for i16 {
            fn from(value: $name) -> Self {
                value.code()
            }
        }
    };
}

coded_enum! {
    /// Season an item or outfit suits.
    pub enum Season ("season") {
        Spring = 1,
        Summer = 2,
        Autumn = 3,
        Winter = 4,
        AllSeason = 5,
    }
}

coded_enum! {
    /// Time, place and occasion.
    pub enum Tpo ("tpo") {
        Work = 1,
        Casual = 2,
        Formal = 3,
        Sports = 4,
        Home = 5,
    }
}

coded_enum! {
    pub enum Color ("color") {
        Black = 1,
        White = 2,
        Gray = 3,
        Brown = 4,
        Beige = 5,
        Green = 6,
        Blue = 7,
        Purple = 8,
        Yellow = 9,
        Pink = 10,
        Red = 11,
        Orange = 12,
        Silver = 13,
        Gold = 14,
        Other = 15,
    }
}

coded_enum! {
    pub enum TopLength ("si_top_length") {
        Crop = 1,
        Normal = 2,
        Long = 3,
    }
}

coded_enum! {
    /// Sleeve length for tops and dresses.
    pub enum Sleeve ("sleeve") {
        Sleeveless = 1,
        Cap = 2,
        Short = 3,
        Half = 4,
        Long = 5,
    }
}

coded_enum! {
    /// Hem length for bottoms and dresses.
    pub enum Length ("length") {
        Mini = 1,
        Knee = 2,
        Midi = 3,
        Ankle = 4,
        Long = 5,
        Maxi = 6,
    }
}

coded_enum! {
    pub enum BottomType ("si_bottom_type") {
        Skirt = 1,
        Pants = 2,
    }
}

coded_enum! {
    pub enum OuterLength ("si_outer_length") {
        Short = 1,
        Normal = 2,
        Long = 3,
    }
}

coded_enum! {
    pub enum OuterSleeve ("si_outer_sleeve") {
        Short = 1,
        Half = 2,
        Long = 3,
    }
}

/// Decode an optional size attribute where `0` means "unset".
///
/// # Examples
/// ```
/// use speadwear::domain::{optional_code, TopLength};
///
/// assert_eq!(optional_code::<TopLength>(0), Ok(None));
/// assert_eq!(optional_code::<TopLength>(1), Ok(Some(TopLength::Crop)));
/// assert!(optional_code::<TopLength>(9).is_err());
/// ```
pub fn optional_code<T>(code: i16) -> Result<Option<T>, AttributeCodeError>
where
    T: TryFrom<i16, Error = AttributeCodeError>,
{
    if code == 0 {
        Ok(None)
    } else {
        T::try_from(code).map(Some)
    }
}

/// Encode an optional size attribute, mapping `None` to `0`.
pub fn code_or_zero<T: Into<i16>>(value: Option<T>) -> i16 {
    value.map_or(0, Into::into)
}

/// Inclusive bounds for item and coordinate ratings.
pub const RATING_RANGE: std::ops::RangeInclusive<f64> = 0.0..=5.0;

/// Inclusive bounds for the free-form shoe size.
pub const SHOE_SIZE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=40.0;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, Season::Spring)]
    #[case(5, Season::AllSeason)]
    fn season_codes_decode(#[case] code: i16, #[case] expected: Season) {
        assert_eq!(Season::try_from(code), Ok(expected));
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    fn out_of_range_codes_are_rejected(#[case] code: i16) {
        let err = Tpo::try_from(code).expect_err("out of range");
        assert_eq!(err.attribute, "tpo");
        assert_eq!(err.code, code);
    }

    #[rstest]
    fn every_member_round_trips_through_its_code() {
        for color in Color::ALL {
            assert_eq!(Color::try_from(color.code()), Ok(*color));
        }
        assert_eq!(Color::ALL.len(), 15);
    }

    #[rstest]
    fn zero_means_unset_for_sizes() {
        assert_eq!(optional_code::<Length>(0), Ok(None));
        assert_eq!(code_or_zero::<Length>(None), 0);
        assert_eq!(code_or_zero(Some(Length::Maxi)), 6);
    }
}
