//! Wardrobe items.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{Color, CoordinateId, ItemId, RATING_RANGE, Season, Tpo, UserId};

/// Longest accepted category label.
pub const SUPER_ITEM_MAX: usize = 255;

/// Validation failures for item fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItemValidationError {
    #[error("super_item must not be empty")]
    EmptySuperItem,
    #[error("super_item must be at most {max} characters")]
    SuperItemTooLong { max: usize },
    #[error("rating must be between 0 and 5, got {value}")]
    RatingOutOfRange { value: f64 },
}

/// Check a category label and return its trimmed form.
pub fn validate_super_item(raw: &str) -> Result<String, ItemValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ItemValidationError::EmptySuperItem);
    }
    if trimmed.chars().count() > SUPER_ITEM_MAX {
        return Err(ItemValidationError::SuperItemTooLong {
            max: SUPER_ITEM_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Check that a rating lies in `0.0..=5.0`.
pub fn validate_rating(value: f64) -> Result<f64, ItemValidationError> {
    if RATING_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(ItemValidationError::RatingOutOfRange { value })
    }
}

/// Clothing piece owned by one user.
///
/// `coordinate_id` is written only by coordinate operations, in the same
/// transaction that records the coordinate's item list.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub user_id: UserId,
    pub coordinate_id: Option<CoordinateId>,
    pub super_item: String,
    pub season: Season,
    pub tpo: Tpo,
    pub color: Color,
    pub content: String,
    pub memo: String,
    pub picture: Option<String>,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Item to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub user_id: UserId,
    pub super_item: String,
    pub season: Season,
    pub tpo: Tpo,
    pub color: Color,
    pub content: String,
    pub memo: String,
    pub picture: Option<String>,
    pub rating: f64,
}

/// Partial item update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemUpdate {
    pub super_item: Option<String>,
    pub season: Option<Season>,
    pub tpo: Option<Tpo>,
    pub color: Option<Color>,
    pub content: Option<String>,
    pub memo: Option<String>,
    pub picture: Option<String>,
    pub rating: Option<f64>,
}

impl ItemUpdate {
    /// Apply the provided fields to `item` in place.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(value) = &self.super_item {
            item.super_item.clone_from(value);
        }
        if let Some(value) = self.season {
            item.season = value;
        }
        if let Some(value) = self.tpo {
            item.tpo = value;
        }
        if let Some(value) = self.color {
            item.color = value;
        }
        if let Some(value) = &self.content {
            item.content.clone_from(value);
        }
        if let Some(value) = &self.memo {
            item.memo.clone_from(value);
        }
        if let Some(value) = &self.picture {
            item.picture = Some(value.clone());
        }
        if let Some(value) = self.rating {
            item.rating = value;
        }
    }
}

/// Search criteria; every field is optional and combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    pub user_id: Option<UserId>,
    pub season: Option<Season>,
    pub tpo: Option<Tpo>,
    pub color: Option<Color>,
    pub super_item: Option<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
}

impl ItemFilter {
    /// Filter that only restricts the owner.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    /// In-memory evaluation matching the SQL adapter's predicates.
    pub fn matches(&self, item: &Item) -> bool {
        self.user_id.is_none_or(|id| item.user_id == id)
            && self.season.is_none_or(|season| item.season == season)
            && self.tpo.is_none_or(|tpo| item.tpo == tpo)
            && self.color.is_none_or(|color| item.color == color)
            && self
                .super_item
                .as_deref()
                .is_none_or(|label| item.super_item == label)
            && self.min_rating.is_none_or(|min| item.rating >= min)
            && self.max_rating.is_none_or(|max| item.rating <= max)
    }
}

/// Aggregate view over a user's wardrobe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemStatistics {
    pub total_count: i64,
    pub category_count: BTreeMap<String, i64>,
    pub season_count: BTreeMap<i16, i64>,
    pub tpo_count: BTreeMap<i16, i64>,
    pub color_count: BTreeMap<i16, i64>,
    /// Mean over items rated above zero; `0.0` when none are.
    pub average_rating: f64,
}

impl ItemStatistics {
    pub fn from_items(items: &[Item]) -> Self {
        let mut stats = Self::default();
        let mut rated = RatingAccumulator::default();
        for item in items {
            stats.total_count += 1;
            *stats
                .category_count
                .entry(item.super_item.clone())
                .or_default() += 1;
            *stats.season_count.entry(item.season.code()).or_default() += 1;
            *stats.tpo_count.entry(item.tpo.code()).or_default() += 1;
            *stats.color_count.entry(item.color.code()).or_default() += 1;
            rated.push(item.rating);
        }
        stats.average_rating = rated.average();
        stats
    }
}

/// Running mean over positive ratings.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct RatingAccumulator {
    total: f64,
    count: u32,
}

impl RatingAccumulator {
    pub(crate) fn push(&mut self, rating: f64) {
        if rating > 0.0 {
            self.total += rating;
            self.count += 1;
        }
    }

    pub(crate) fn average(self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / f64::from(self.count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn shirt() -> Item {
        let at = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        Item {
            id: ItemId::new(1),
            user_id: UserId::new(7),
            coordinate_id: None,
            super_item: "tops".into(),
            season: Season::Summer,
            tpo: Tpo::Casual,
            color: Color::White,
            content: "linen shirt".into(),
            memo: String::new(),
            picture: None,
            rating: 4.0,
            created_at: at,
            updated_at: at,
        }
    }

    #[rstest]
    #[case("", ItemValidationError::EmptySuperItem)]
    #[case("   ", ItemValidationError::EmptySuperItem)]
    fn blank_super_item_is_rejected(#[case] raw: &str, #[case] expected: ItemValidationError) {
        assert_eq!(validate_super_item(raw), Err(expected));
    }

    #[rstest]
    #[case(-0.5, false)]
    #[case(0.0, true)]
    #[case(5.0, true)]
    #[case(5.1, false)]
    fn rating_bounds(#[case] value: f64, #[case] ok: bool) {
        assert_eq!(validate_rating(value).is_ok(), ok);
    }

    #[rstest]
    fn update_only_touches_provided_fields(shirt: Item) {
        let mut item = shirt.clone();
        ItemUpdate {
            memo: Some("dry clean".into()),
            color: Some(Color::Blue),
            ..ItemUpdate::default()
        }
        .apply_to(&mut item);
        assert_eq!(item.memo, "dry clean");
        assert_eq!(item.color, Color::Blue);
        assert_eq!(item.super_item, shirt.super_item);
        assert!((item.rating - shirt.rating).abs() < f64::EPSILON);
    }

    #[rstest]
    fn filter_combines_predicates(shirt: Item) {
        let mut filter = ItemFilter::for_user(UserId::new(7));
        assert!(filter.matches(&shirt));
        filter.min_rating = Some(4.5);
        assert!(!filter.matches(&shirt));
        filter.min_rating = None;
        filter.color = Some(Color::Black);
        assert!(!filter.matches(&shirt));
    }

    #[rstest]
    fn statistics_average_ignores_unrated_items(shirt: Item) {
        let mut unrated = shirt.clone();
        unrated.rating = 0.0;
        unrated.super_item = "bottoms".into();
        let mut rated = shirt.clone();
        rated.rating = 2.0;

        let stats = ItemStatistics::from_items(&[shirt, unrated, rated]);
        assert_eq!(stats.total_count, 3);
        assert_eq!(stats.category_count.get("tops"), Some(&2));
        assert_eq!(stats.category_count.get("bottoms"), Some(&1));
        assert_eq!(stats.season_count.get(&Season::Summer.code()), Some(&3));
        assert!((stats.average_rating - 3.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn statistics_for_empty_wardrobe() {
        let stats = ItemStatistics::from_items(&[]);
        assert_eq!(stats.total_count, 0);
        assert!(stats.average_rating.abs() < f64::EPSILON);
    }
}
