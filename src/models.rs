use std::cmp::Ordering;

use crate::error::ServiceError;

/// Categories every successful generation must contain.
pub const REQUIRED_CATEGORIES: [&str; 4] = ["popular", "niche", "community", "trending"];

/// Key used for the "copy all selected" action in [`CopyFeedback`](crate::app::CopyFeedback).
pub const COPY_ALL_KEY: &str = "all";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusArea {
    Topic,
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    /// Bare tags without `#`, in the order the service ranked them.
    pub tags: Vec<String>,
}

/// Hashtags grouped by category.
///
/// Categories are kept in case-insensitive alphabetical order, never in the
/// order the service happened to send them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategorizedHashtags {
    categories: Vec<Category>,
}

impl CategorizedHashtags {
    /// Builds the result, rejecting it when a required category is missing.
    /// Extra categories are kept.
    pub fn new<I>(entries: I) -> Result<Self, ServiceError>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut categories: Vec<Category> = entries
            .into_iter()
            .map(|(name, tags)| Category { name, tags })
            .collect();

        for required in REQUIRED_CATEGORIES {
            if !categories.iter().any(|c| c.name == required) {
                return Err(ServiceError::InvalidFormat(format!(
                    "missing required category `{}`",
                    required
                )));
            }
        }

        categories.sort_by(|a, b| category_order(&a.name, &b.name));
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.tags.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn total_tags(&self) -> usize {
        self.categories.iter().map(|c| c.tags.len()).sum()
    }
}

/// Case-insensitive alphabetical order, ties broken by the exact bytes.
pub fn category_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Renders tags the way they are pasted: `#one #two #three`.
pub fn format_hashtags<'a, I>(tags: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    tags.into_iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lifecycle of the current generation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(CategorizedHashtags),
    Failed(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn hashtags(&self) -> Option<&CategorizedHashtags> {
        match self {
            RequestState::Success(h) => Some(h),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_hashtags() -> CategorizedHashtags {
    let entry = |name: &str, tags: &[&str]| {
        (
            name.to_string(),
            tags.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
        )
    };
    CategorizedHashtags::new(vec![
        entry("popular", &["sun", "beach"]),
        entry("niche", &["coastalhiking"]),
        entry("community", &[]),
        entry("trending", &["heatwave2024"]),
    ])
    .unwrap()
}
