//! Derived dashboard views over a tab snapshot.

use std::collections::HashSet;

use tabflow_protocols::types::{Tab, TabGroup};

/// Tabs whose title or URL contains `query`, case-insensitively. An empty
/// query keeps everything.
pub fn filter_tabs<'a>(tabs: &'a [Tab], query: &str) -> Vec<&'a Tab> {
    tabs.iter().filter(|t| t.matches(query)).collect()
}

/// Ids of every tab that belongs to some group.
pub fn grouped_tab_ids(groups: &[TabGroup]) -> HashSet<&str> {
    groups
        .iter()
        .flat_map(|g| g.tab_ids.iter().map(String::as_str))
        .collect()
}

/// Filtered tabs that are in no group.
pub fn ungrouped_tabs<'a>(tabs: &'a [Tab], groups: &[TabGroup], query: &str) -> Vec<&'a Tab> {
    let grouped = grouped_tab_ids(groups);
    filter_tabs(tabs, query)
        .into_iter()
        .filter(|t| !grouped.contains(t.id.as_str()))
        .collect()
}
