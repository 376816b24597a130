use ahash::AHashSet;
use serde_json::Value;

use crate::core::StatsError;
use crate::dataset::Table;

/// Distinct values of `project` over rows where `filter` equals `value`,
/// in order of first appearance.
pub fn distinct_where(
    table: &Table,
    filter: &str,
    value: &str,
    project: &str,
) -> Result<Vec<Value>, StatsError> {
    table.require(&[filter, project])?;

    let matching = table.filter_eq(filter, value)?;
    let mut seen = AHashSet::new();
    Ok(matching
        .json_values(project)?
        .into_iter()
        .filter(|v| seen.insert(v.to_string()))
        .collect())
}
