//! Portfolio cards: the data model and the per-user card store.

pub mod store;
pub mod templates;

pub use store::{CardStore, UserIdProvider};
pub use templates::{find_template, template_cards, TemplateCard};

use crate::clock::iso_millis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BACKGROUND: &str = "#555b6e";
pub const DEFAULT_TITLE_COLOR: &str = "#6be1c7";
pub const DEFAULT_CONTENT_COLOR: &str = "#ffffff";

/// Card identifier.
///
/// Cards created by users carry millisecond timestamps; catalog templates
/// carry literal names such as `template-3`. Stored as a bare JSON number or
/// string so existing data keeps its shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardId {
    Timestamp(u64),
    Named(String),
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardId::Timestamp(id) => write!(f, "{}", id),
            CardId::Named(name) => f.write_str(name),
        }
    }
}

impl From<u64> for CardId {
    fn from(id: u64) -> Self {
        CardId::Timestamp(id)
    }
}

impl From<&str> for CardId {
    fn from(name: &str) -> Self {
        CardId::Named(name.to_string())
    }
}

impl FromStr for CardId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<u64>() {
            Ok(id) => CardId::Timestamp(id),
            Err(_) => CardId::Named(s.to_string()),
        })
    }
}

/// Fully resolved colors of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardColors {
    pub background: String,
    pub title: String,
    pub content: String,
}

impl Default for CardColors {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_string(),
            title: DEFAULT_TITLE_COLOR.to_string(),
            content: DEFAULT_CONTENT_COLOR.to_string(),
        }
    }
}

/// Color channels supplied by the caller; missing or empty channels fall
/// back to an existing value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

fn pick(over: &Option<String>, fallback: &str) -> String {
    over.as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

impl ColorOverrides {
    /// Overlay these channels on `base`; no channel is ever removed.
    pub fn resolve(&self, base: &CardColors) -> CardColors {
        CardColors {
            background: pick(&self.background, &base.background),
            title: pick(&self.title, &base.title),
            content: pick(&self.content, &base.content),
        }
    }
}

impl From<&CardColors> for ColorOverrides {
    fn from(colors: &CardColors) -> Self {
        Self {
            background: Some(colors.background.clone()),
            title: Some(colors.title.clone()),
            content: Some(colors.content.clone()),
        }
    }
}

/// Input for creating or updating a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDraft {
    pub title: String,
    pub content: String,
    pub colors: Option<ColorOverrides>,
}

impl CardDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            colors: None,
        }
    }

    pub fn with_colors(mut self, colors: ColorOverrides) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Trimmed title and content, or `None` if either is blank.
    pub(crate) fn validated(&self) -> Option<(String, String)> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return None;
        }
        Some((title.to_string(), content.to_string()))
    }
}

/// A saved portfolio card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub content: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub colors: CardColors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
}
