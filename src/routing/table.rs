//! Route table module
//!
//! Maps short paths to the storage key of their image, built once from the
//! configured extension groups.

use std::collections::HashMap;

use crate::config::RouteGroup;

/// Immutable short path -> storage key mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: HashMap<String, String>,
}

impl RouteTable {
    /// Build the table from extension groups.
    ///
    /// Each path maps to `<path>.<extension>`. Groups are applied in order,
    /// so a path listed under two extensions keeps the later one.
    pub fn from_groups<'a, I>(groups: I) -> Self
    where
        I: IntoIterator<Item = &'a RouteGroup>,
    {
        let mut routes = HashMap::new();
        for group in groups {
            for path in &group.paths {
                routes.insert(path.clone(), format!("{path}.{}", group.extension));
            }
        }
        Self { routes }
    }

    /// Storage key for a short path, if it is routed
    pub fn get(&self, path: &str) -> Option<&str> {
        self.routes.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Short paths listed more than once across groups, with the key that wins
///
/// Sorted by path for stable startup logs.
pub fn overridden_paths(groups: &[RouteGroup]) -> Vec<(String, String)> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for group in groups {
        for path in &group.paths {
            *seen.entry(path.as_str()).or_default() += 1;
        }
    }

    let table = RouteTable::from_groups(groups);
    let mut overridden: Vec<(String, String)> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .filter_map(|(path, _)| {
            table
                .get(path)
                .map(|key| (path.to_string(), key.to_string()))
        })
        .collect();
    overridden.sort();
    overridden
}
