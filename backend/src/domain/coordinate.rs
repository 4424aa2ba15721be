//! Coordinates: outfits composed from a user's items.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::item::RatingAccumulator;
use super::{
    BottomType, CoordinateId, Item, ItemId, Length, OuterLength, OuterSleeve, SHOE_SIZE_RANGE,
    Season, Sleeve, TopLength, Tpo, User, UserId,
};

/// Recent coordinates fetched per followed user when assembling a timeline.
pub const TIMELINE_PER_USER: i64 = 10;

/// Validation failures for coordinate fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateValidationError {
    #[error("at least one item is required")]
    NoItems,
    #[error("shoe size must be between 0 and 40, got {value}")]
    ShoeSizeOutOfRange { value: f64 },
}

/// Size measurements; `None` means not recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeInfo {
    pub top_length: Option<TopLength>,
    pub top_sleeve: Option<Sleeve>,
    pub bottom_length: Option<Length>,
    pub bottom_type: Option<BottomType>,
    pub dress_length: Option<Length>,
    pub dress_sleeve: Option<Sleeve>,
    pub outer_length: Option<OuterLength>,
    pub outer_sleeve: Option<OuterSleeve>,
    pub shoe_size: Option<f64>,
}

/// Check the free-form shoe size; zero is treated as unset.
pub fn validate_shoe_size(value: f64) -> Result<Option<f64>, CoordinateValidationError> {
    if !SHOE_SIZE_RANGE.contains(&value) {
        return Err(CoordinateValidationError::ShoeSizeOutOfRange { value });
    }
    Ok((value > 0.0).then_some(value))
}

/// De-duplicate and require a non-empty item list, preserving order.
pub fn validate_item_ids(ids: &[ItemId]) -> Result<Vec<ItemId>, CoordinateValidationError> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    if unique.is_empty() {
        return Err(CoordinateValidationError::NoItems);
    }
    Ok(unique)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub id: CoordinateId,
    pub user_id: UserId,
    pub season: Season,
    pub tpo: Tpo,
    pub picture: Option<String>,
    pub memo: String,
    pub rating: f64,
    pub sizes: SizeInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCoordinate {
    pub user_id: UserId,
    pub season: Season,
    pub tpo: Tpo,
    pub picture: Option<String>,
    pub memo: String,
    pub rating: f64,
    pub sizes: SizeInfo,
}

/// Partial coordinate update.
///
/// Each size field is doubly optional: the outer `None` leaves the stored
/// value alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateUpdate {
    pub season: Option<Season>,
    pub tpo: Option<Tpo>,
    pub picture: Option<String>,
    pub memo: Option<String>,
    pub rating: Option<f64>,
    pub top_length: Option<Option<TopLength>>,
    pub top_sleeve: Option<Option<Sleeve>>,
    pub bottom_length: Option<Option<Length>>,
    pub bottom_type: Option<Option<BottomType>>,
    pub dress_length: Option<Option<Length>>,
    pub dress_sleeve: Option<Option<Sleeve>>,
    pub outer_length: Option<Option<OuterLength>>,
    pub outer_sleeve: Option<Option<OuterSleeve>>,
    pub shoe_size: Option<Option<f64>>,
}

impl CoordinateUpdate {
    pub fn apply_to(&self, coordinate: &mut Coordinate) {
        if let Some(value) = self.season {
            coordinate.season = value;
        }
        if let Some(value) = self.tpo {
            coordinate.tpo = value;
        }
        if let Some(value) = &self.picture {
            coordinate.picture = Some(value.clone());
        }
        if let Some(value) = &self.memo {
            coordinate.memo.clone_from(value);
        }
        if let Some(value) = self.rating {
            coordinate.rating = value;
        }
        let sizes = &mut coordinate.sizes;
        if let Some(value) = self.top_length {
            sizes.top_length = value;
        }
        if let Some(value) = self.top_sleeve {
            sizes.top_sleeve = value;
        }
        if let Some(value) = self.bottom_length {
            sizes.bottom_length = value;
        }
        if let Some(value) = self.bottom_type {
            sizes.bottom_type = value;
        }
        if let Some(value) = self.dress_length {
            sizes.dress_length = value;
        }
        if let Some(value) = self.dress_sleeve {
            sizes.dress_sleeve = value;
        }
        if let Some(value) = self.outer_length {
            sizes.outer_length = value;
        }
        if let Some(value) = self.outer_sleeve {
            sizes.outer_sleeve = value;
        }
        if let Some(value) = self.shoe_size {
            sizes.shoe_size = value;
        }
    }
}

/// Search criteria for coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateFilter {
    pub user_id: Option<UserId>,
    pub season: Option<Season>,
    pub tpo: Option<Tpo>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
}

impl CoordinateFilter {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, coordinate: &Coordinate) -> bool {
        self.user_id.is_none_or(|id| coordinate.user_id == id)
            && self.season.is_none_or(|season| coordinate.season == season)
            && self.tpo.is_none_or(|tpo| coordinate.tpo == tpo)
            && self.min_rating.is_none_or(|min| coordinate.rating >= min)
            && self.max_rating.is_none_or(|max| coordinate.rating <= max)
    }
}

/// Coordinate decorated for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateDetails {
    pub coordinate: Coordinate,
    pub owner: Option<User>,
    pub items: Vec<Item>,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateStatistics {
    pub total_count: i64,
    pub season_count: BTreeMap<i16, i64>,
    pub tpo_count: BTreeMap<i16, i64>,
    pub total_likes: i64,
    pub average_rating: f64,
}

impl CoordinateStatistics {
    /// Fold coordinates paired with their like counts.
    pub fn from_coordinates(entries: &[(Coordinate, i64)]) -> Self {
        let mut stats = Self::default();
        let mut rated = RatingAccumulator::default();
        for (coordinate, likes) in entries {
            stats.total_count += 1;
            *stats.season_count.entry(coordinate.season.code()).or_default() += 1;
            *stats.tpo_count.entry(coordinate.tpo.code()).or_default() += 1;
            stats.total_likes += likes;
            rated.push(coordinate.rating);
        }
        stats.average_rating = rated.average();
        stats
    }
}
