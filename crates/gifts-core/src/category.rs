//! The closed set of assessable categories (the spiritual gifts).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One of the ten gifts the questionnaire assesses.
///
/// Serialized as the lower-case variant name (`"prophecy"`, `"serving"`,
/// ...). `Display` renders the capitalized form used in prompts and charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Proclaiming truth for correction and edification.
    Prophecy,
    /// Meeting practical needs (also called Helps).
    Serving,
    /// Communicating truth so that others learn.
    Teaching,
    /// Encouragement, comfort and counsel.
    Exhortation,
    /// Contributing material resources with liberality.
    Giving,
    /// Setting goals and rallying others toward them.
    Leadership,
    /// Empathy and compassion for those who suffer.
    Mercy,
    /// Applying spiritual truth to a specific situation.
    Wisdom,
    /// Discovering and clarifying information.
    Knowledge,
    /// Extraordinary confidence in God's purposes.
    Faith,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 10] = [
        Category::Prophecy,
        Category::Serving,
        Category::Teaching,
        Category::Exhortation,
        Category::Giving,
        Category::Leadership,
        Category::Mercy,
        Category::Wisdom,
        Category::Knowledge,
        Category::Faith,
    ];

    /// Wire identifier (lower-case).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Prophecy => "prophecy",
            Category::Serving => "serving",
            Category::Teaching => "teaching",
            Category::Exhortation => "exhortation",
            Category::Giving => "giving",
            Category::Leadership => "leadership",
            Category::Mercy => "mercy",
            Category::Wisdom => "wisdom",
            Category::Knowledge => "knowledge",
            Category::Faith => "faith",
        }
    }

    /// Capitalized label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Prophecy => "Prophecy",
            Category::Serving => "Serving",
            Category::Teaching => "Teaching",
            Category::Exhortation => "Exhortation",
            Category::Giving => "Giving",
            Category::Leadership => "Leadership",
            Category::Mercy => "Mercy",
            Category::Wisdom => "Wisdom",
            Category::Knowledge => "Knowledge",
            Category::Faith => "Faith",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::Validation(format!("unknown category: {s}")))
    }
}
