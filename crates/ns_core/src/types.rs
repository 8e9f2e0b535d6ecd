use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

macro_rules! id_type {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| Error::InvalidId(format!("{} id '{}'", $label, s)))
            }
        }
    };
}

id_type!(ArticleId, "article");
id_type!(NoteId, "note");

/// A record produced by extraction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleCandidate {
    pub headline: String,
    pub summary: String,
    pub url: String,
}

impl ArticleCandidate {
    /// True when every field carries text. Only valid candidates are stored.
    pub fn is_valid(&self) -> bool {
        !self.headline.is_empty() && !self.summary.is_empty() && !self.url.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub headline: String,
    pub summary: String,
    pub url: String,
    pub favorite: bool,
    pub note: Option<NoteId>,
    pub scraped_at: DateTime<Utc>,
}

impl Article {
    /// Builds a fresh, unfavorited article from a candidate.
    pub fn from_candidate(candidate: &ArticleCandidate) -> Self {
        Self {
            id: ArticleId::new(),
            headline: candidate.headline.clone(),
            summary: candidate.summary.clone(),
            url: candidate.url.clone(),
            favorite: false,
            note: None,
            scraped_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
}

/// Fields supplied by a client when annotating an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// An article with its note resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    pub id: ArticleId,
    pub headline: String,
    pub summary: String,
    pub url: String,
    pub favorite: bool,
    pub note: Option<Note>,
    pub scraped_at: DateTime<Utc>,
}

impl ArticleDetail {
    pub fn new(article: Article, note: Option<Note>) -> Self {
        Self {
            id: article.id,
            headline: article.headline,
            summary: article.summary,
            url: article.url,
            favorite: article.favorite,
            note,
            scraped_at: article.scraped_at,
        }
    }
}
