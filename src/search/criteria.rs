use crate::catalog::types::Condition;
use serde::{Deserialize, Serialize};

/// Filter inputs exactly as the user (or the query string) supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFilters {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub location: String,
}

impl RawFilters {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

/// Normalized search and facet constraints.
///
/// Equality is structural over the normalized fields, so two inputs that only
/// differ in surrounding whitespace compare equal and do not restart paging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    pub search_text: String,
    pub genre: Option<String>,
    pub condition: Option<Condition>,
    pub location: Option<String>,
}

impl FilterCriteria {
    pub fn normalize(raw: &RawFilters) -> Self {
        Self {
            search_text: raw.search.trim().to_string(),
            genre: non_blank(&raw.genre),
            // Unknown conditions degrade to "no constraint".
            condition: Condition::parse(&raw.condition),
            location: non_blank(&raw.location),
        }
    }

    pub fn equals(a: &FilterCriteria, b: &FilterCriteria) -> bool {
        a == b
    }

    /// Back to the wire representation. Absent facets become empty strings.
    pub fn to_raw(&self) -> RawFilters {
        RawFilters {
            search: self.search_text.clone(),
            genre: self.genre.clone().unwrap_or_default(),
            condition: self
                .condition
                .map(|c| c.label().to_string())
                .unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
        }
    }
}

impl From<&RawFilters> for FilterCriteria {
    fn from(raw: &RawFilters) -> Self {
        FilterCriteria::normalize(raw)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
