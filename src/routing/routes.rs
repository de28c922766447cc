//! Static per-route metadata consulted by the guard.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

/// Metadata attached to a route pattern.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// Permission key the session must hold to enter the route.
    pub permission: Option<String>,
}

impl RouteMeta {
    #[must_use]
    pub fn requires(permission: impl Into<String>) -> Self {
        Self { permission: Some(permission.into()) }
    }
}

/// Ordered pattern table. Patterns use `/`-separated segments with `:name`
/// wildcards; the first matching entry wins.
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    entries: Vec<(Vec<String>, RouteMeta)>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(mut self, pattern: &str, meta: RouteMeta) -> Self {
        let segments = segments(&normalize_path(pattern))
            .map(str::to_owned)
            .collect();
        self.entries.push((segments, meta));
        self
    }

    #[must_use]
    pub fn meta_for(&self, path: &str) -> Option<&RouteMeta> {
        let path = normalize_path(path);
        let actual: Vec<&str> = segments(&path).collect();
        self.entries
            .iter()
            .find(|(pattern, _)| matches(pattern, &actual))
            .map(|(_, meta)| meta)
    }

    /// Permission declared for `path`, if any.
    #[must_use]
    pub fn required_permission(&self, path: &str) -> Option<&str> {
        self.meta_for(path).and_then(|m| m.permission.as_deref())
    }
}

/// Strip query/fragment and any trailing slash (root stays `/`).
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn matches(pattern: &[String], actual: &[&str]) -> bool {
    pattern.len() == actual.len()
        && pattern
            .iter()
            .zip(actual)
            .all(|(p, a)| p.starts_with(':') || p == a)
}
