//! User-controlled filters over the release collection.

use serde::{Deserialize, Serialize};

use crate::release::Release;

/// Value that means "no constraint" for any filter field.
pub const ALL_SENTINEL: &str = "all";

/// Filter on release attributes.
///
/// A field that is absent, empty or `"all"` does not constrain anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseFilter {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub release_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Case-insensitive substring of the name or title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// The constraint carried by a field, if any.
fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_SENTINEL))
}

fn eq_opt(constraint: Option<&str>, value: Option<&str>) -> bool {
    match constraint {
        None => true,
        Some(wanted) => value.is_some_and(|v| v.eq_ignore_ascii_case(wanted)),
    }
}

impl ReleaseFilter {
    pub fn with_type(mut self, release_type: impl Into<String>) -> Self {
        self.release_type = Some(release_type.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Check if any constraint is set.
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    pub fn matches(&self, release: &Release) -> bool {
        if !eq_opt(active(&self.release_type), Some(release.release_type.as_str())) {
            return false;
        }
        if !eq_opt(active(&self.source), release.source.as_deref()) {
            return false;
        }
        if !eq_opt(active(&self.resolution), release.resolution.as_deref()) {
            return false;
        }
        if !eq_opt(active(&self.group), release.group.as_deref()) {
            return false;
        }
        if let Some(year) = active(&self.year) {
            if release.year.map(|y| y.to_string()).as_deref() != Some(year) {
                return false;
            }
        }
        if let Some(search) = active(&self.search) {
            let needle = search.to_lowercase();
            let in_name = release.name.to_lowercase().contains(&needle);
            let in_title = release
                .title
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(&needle));
            if !in_name && !in_title {
                return false;
            }
        }
        true
    }

    /// Releases matching the filter, in input order.
    pub fn apply(&self, releases: &[Release]) -> Vec<Release> {
        releases.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    /// Active constraints as query parameters for the upstream API.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("type", &self.release_type),
            ("source", &self.source),
            ("resolution", &self.resolution),
            ("group", &self.group),
            ("year", &self.year),
            ("search", &self.search),
        ]
        .into_iter()
        .filter_map(|(key, value)| active(value).map(|v| (key, v.to_string())))
        .collect()
    }
}
