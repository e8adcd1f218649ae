use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::limits::MAX_POSTER_URL_LEN;

/// A search term together with how many times it has been searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub id: i32,
    pub search_term: String,
    pub movie_id: String,
    pub count: i32,
    pub poster_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Incoming search event. Every field is optional on the wire so that missing
/// fields are reported through [`FieldErrors`] instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub movie_id: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl SearchRequest {
    pub fn new(
        search_term: impl Into<String>,
        movie_id: impl Into<String>,
        poster_url: Option<&str>,
    ) -> Self {
        Self {
            search_term: Some(search_term.into()),
            movie_id: Some(movie_id.into()),
            poster_url: poster_url.map(str::to_string),
        }
    }

    /// Checks the request and hands back the fields the store needs.
    ///
    /// Blank means empty or whitespace only. The search term is kept as sent,
    /// without trimming or case folding.
    pub fn validate(self) -> Result<ValidSearch, FieldErrors> {
        let mut errors = FieldErrors::default();

        let search_term = non_blank(self.search_term);
        if search_term.is_none() {
            errors.insert("searchTerm", "Search term is required");
        }

        let movie_id = non_blank(self.movie_id);
        if movie_id.is_none() {
            errors.insert("movieId", "Movie ID is required");
        }

        if self
            .poster_url
            .as_ref()
            .is_some_and(|url| url.chars().count() > MAX_POSTER_URL_LEN)
        {
            errors.insert(
                "posterUrl",
                format!("Poster URL must be {MAX_POSTER_URL_LEN} characters or less"),
            );
        }

        match (search_term, movie_id) {
            (Some(search_term), Some(movie_id)) if errors.is_empty() => Ok(ValidSearch {
                search_term,
                movie_id,
                poster_url: self.poster_url,
            }),
            _ => Err(errors),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A search event that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSearch {
    pub search_term: String,
    pub movie_id: String,
    pub poster_url: Option<String>,
}

/// Field name (as it appears on the wire) to message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}
