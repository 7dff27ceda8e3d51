//! Library categories.
//!
//! Every manifest entry lands in exactly one category, which decides the
//! top-level directory of its reference file.

use serde::{Deserialize, Serialize};

/// Library category of a manifest entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Video-on-demand film
    Movie,

    /// Series episode
    Series,

    /// Live TV channel
    Channel,

    /// Anything the classification rules did not match
    Other,
}

impl Category {
    /// All categories in reporting order
    pub const ALL: [Category; 4] = [
        Category::Movie,
        Category::Series,
        Category::Channel,
        Category::Other,
    ];

    /// Whether entries of this category get a per-series container directory
    pub fn has_series_container(self) -> bool {
        matches!(self, Category::Series | Category::Other)
    }

    /// Human-readable label used in summaries and log files
    pub fn label(self) -> &'static str {
        match self {
            Category::Movie => "Movies",
            Category::Series => "Episodes",
            Category::Channel => "TV-channels",
            Category::Other => "Others",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Movie => write!(f, "movie"),
            Category::Series => write!(f, "series"),
            Category::Channel => write!(f, "channel"),
            Category::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" | "film" | "vod" => Ok(Category::Movie),
            "series" | "serie" | "srs" => Ok(Category::Series),
            "channel" | "channels" | "tv" => Ok(Category::Channel),
            "other" | "others" => Ok(Category::Other),
            _ => anyhow::bail!("Unknown category: {}", s),
        }
    }
}

/// Outcome of classifying a group label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Entry belongs to a library category
    Classified(Category),

    /// Group label is in the exclusion set; the entry is dropped
    Excluded,
}

impl Classification {
    /// The category, if the entry was not excluded
    pub fn category(self) -> Option<Category> {
        match self {
            Classification::Classified(category) => Some(category),
            Classification::Excluded => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!("movie".parse::<Category>().unwrap(), Category::Movie);
        assert_eq!("VOD".parse::<Category>().unwrap(), Category::Movie);
        assert_eq!("srs".parse::<Category>().unwrap(), Category::Series);
        assert_eq!("tv".parse::<Category>().unwrap(), Category::Channel);
        assert_eq!("others".parse::<Category>().unwrap(), Category::Other);
        assert!("radio".parse::<Category>().is_err());
    }

    #[test]
    fn test_series_container_categories() {
        assert!(!Category::Movie.has_series_container());
        assert!(Category::Series.has_series_container());
        assert!(!Category::Channel.has_series_container());
        assert!(Category::Other.has_series_container());
    }
}
