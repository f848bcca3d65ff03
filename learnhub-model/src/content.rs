use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::progress::Progress;
use crate::rating::Rating;

/// Source tag for items imported from the OpenLibrary catalog.
pub const SOURCE_OPENLIBRARY: &str = "openlibrary";
/// Source tag for items created locally through the API.
pub const SOURCE_MANUAL: &str = "manual";

/// Kind of learning resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "content_type", rename_all = "lowercase")
)]
pub enum ContentType {
    Book,
    Article,
    Video,
    Course,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Book,
        ContentType::Article,
        ContentType::Video,
        ContentType::Course,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Book => "book",
            ContentType::Article => "article",
            ContentType::Video => "video",
            ContentType::Course => "course",
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "content type",
                value: s.to_string(),
            })
    }
}

/// Topic bucket used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "category", rename_all = "kebab-case")
)]
pub enum Category {
    Programming,
    Design,
    Business,
    Science,
    DataScience,
    WebDev,
    UxDesign,
    Python,
    React,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Programming,
        Category::Design,
        Category::Business,
        Category::Science,
        Category::DataScience,
        Category::WebDev,
        Category::UxDesign,
        Category::Python,
        Category::React,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Programming => "programming",
            Category::Design => "design",
            Category::Business => "business",
            Category::Science => "science",
            Category::DataScience => "data-science",
            Category::WebDev => "web-dev",
            Category::UxDesign => "ux-design",
            Category::Python => "python",
            Category::React => "react",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// A stored learning resource.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Content {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub source: String,
    pub external_id: Option<String>,
    pub content_type: ContentType,
    pub category: Option<Category>,
    pub rating: Option<Rating>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for [`Content`]; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NewContent {
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default = "default_source"))]
    pub source: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub external_id: Option<String>,
    pub content_type: ContentType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Option<Category>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rating: Option<Rating>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub author: Option<String>,
}

#[cfg(feature = "serde")]
fn default_source() -> String {
    SOURCE_MANUAL.to_string()
}

/// A content item annotated with one user's bookmark and progress state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ContentWithProgress {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub content: Content,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub progress: Option<Progress>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_saved: bool,
}

impl ContentWithProgress {
    pub fn bare(content: Content) -> Self {
        Self {
            content,
            progress: None,
            is_saved: false,
        }
    }
}
