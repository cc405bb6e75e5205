//! Domain types shared by the engine and its data sources.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Joins a slug and a type name in a disambiguated ref, e.g. `general::tag`.
pub const TYPE_SEPARATOR: &str = "::";

/// Identifies which data source produced an item.
///
/// The two built-in types are closed variants; anything registered by a
/// plugin travels as `Custom` and is only ever compared by its tag string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashtagType {
    Category,
    Tag,
    Custom(String),
}

impl HashtagType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for HashtagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashtagType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for HashtagType {
    fn from(s: &str) -> Self {
        match s {
            "category" => Self::Category,
            "tag" => Self::Tag,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for HashtagType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl Serialize for HashtagType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HashtagType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

/// How a search term is compared against names and slugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCondition {
    StartsWith,
    Contains,
}

impl MatchCondition {
    /// `term` is expected to be lowercase already.
    pub fn matches(self, haystack: &str, term: &str) -> bool {
        let haystack = haystack.to_lowercase();
        match self {
            Self::StartsWith => haystack.starts_with(term),
            Self::Contains => haystack.contains(term),
        }
    }
}

/// A resolved or suggested hashtag.
///
/// Items are built by data sources and handed to the engine, which assigns
/// `kind` and fills in `reference` before returning them. Serializes to the
/// flat JSON shape the composer expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashtagItem {
    pub relative_url: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
    pub description: Option<String>,
    pub icon: String,
    pub colors: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub kind: Option<HashtagType>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub slug: String,
    pub id: u64,
}

impl HashtagItem {
    pub fn new(text: impl Into<String>, slug: impl Into<String>, id: u64) -> Self {
        Self {
            relative_url: String::new(),
            text: text.into(),
            secondary_text: None,
            description: None,
            icon: String::new(),
            colors: None,
            kind: None,
            reference: None,
            slug: slug.into(),
            id,
        }
    }

    /// The lookup key for this item, falling back to the slug.
    pub fn reference(&self) -> &str {
        self.reference.as_deref().unwrap_or(&self.slug)
    }

    /// True when `key` resolves to this item, by ref or by slug.
    pub fn answers_to(&self, key: &str) -> bool {
        self.reference().eq_ignore_ascii_case(key) || self.slug.eq_ignore_ascii_case(key)
    }

    pub fn is_kind(&self, kind: &HashtagType) -> bool {
        self.kind.as_ref() == Some(kind)
    }
}

/// A priority for one hashtag type within one calling context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypePriority {
    #[serde(rename = "type")]
    pub kind: HashtagType,
    pub context: String,
    pub priority: i32,
}
