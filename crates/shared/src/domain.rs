use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! string_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id_newtype!(EventId);

/// A resolved geographic point. Produced once by location resolution and
/// never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateParseError {
    #[error("expected \"lat,lon\", got {0:?}")]
    Shape(String),
    #[error("invalid {axis} component {value:?}")]
    Component { axis: &'static str, value: String },
}

/// Parses the `"lat,lon"` form used by IP-location services.
impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = raw
            .split_once(',')
            .ok_or_else(|| CoordinateParseError::Shape(raw.to_string()))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateParseError::Component {
                axis: "lat",
                value: lat.trim().to_string(),
            })?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateParseError::Component {
                axis: "lon",
                value: lon.trim().to_string(),
            })?;
        Ok(Self { lat, lon })
    }
}

/// Catalog segments a search can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Music,
    Sports,
    Arts,
    Film,
    Miscellaneous,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Music,
        Category::Sports,
        Category::Arts,
        Category::Film,
        Category::Miscellaneous,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Music => "music",
            Category::Sports => "sports",
            Category::Arts => "arts",
            Category::Film => "film",
            Category::Miscellaneous => "miscellaneous",
        }
    }

    /// Upstream segment identifier for this category.
    pub fn segment_id(self) -> &'static str {
        match self {
            Category::Music => "KZFzniwnSyZfZ7v7nJ",
            Category::Sports => "KZFzniwnSyZfZ7v7nE",
            Category::Arts => "KZFzniwnSyZfZ7v7na",
            Category::Film => "KZFzniwnSyZfZ7v7nn",
            Category::Miscellaneous => "KZFzniwnSyZfZ7v7n1",
        }
    }

    /// Exact, case-sensitive lookup. Unknown names mean "no category filter".
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
