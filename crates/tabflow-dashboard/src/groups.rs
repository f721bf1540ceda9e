//! Mapping categorization results onto the submitted tab list.

use tracing::warn;

use tabflow_protocols::types::{AIResult, GROUP_COLORS, Tab, TabGroup};

/// Build session groups from `result`.
///
/// `submitted` must be the exact tab list the request was built from;
/// `tab_indices` are positions in it. Indices past its end are skipped.
pub fn resolve_groups(result: &AIResult, submitted: &[Tab], now_ms: i64) -> Vec<TabGroup> {
    result
        .groups
        .iter()
        .enumerate()
        .map(|(idx, group)| {
            let tab_ids = group
                .tab_indices
                .iter()
                .filter_map(|&index| match submitted.get(index) {
                    Some(tab) => Some(tab.id.clone()),
                    None => {
                        warn!(
                            "Group '{}' references tab index {} but only {} tab(s) were submitted",
                            group.name,
                            index,
                            submitted.len()
                        );
                        None
                    }
                })
                .collect();

            let color = if group.color.trim().is_empty() {
                GROUP_COLORS[idx % GROUP_COLORS.len()].to_string()
            } else {
                group.color.clone()
            };

            TabGroup {
                id: format!("group-{}-{}", idx, now_ms),
                name: group.name.clone(),
                description: group.description.clone(),
                color,
                tab_ids,
            }
        })
        .collect()
}
