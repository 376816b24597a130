use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::Serialize;

use crate::core::StatsError;
use crate::dataset::Table;

use super::stats::{self, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agg {
    Mean,
    Median,
    Min,
    Max,
}

impl Agg {
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        match self {
            Agg::Mean => stats::mean(values),
            Agg::Median => stats::median(values),
            Agg::Min => stats::min(values),
            Agg::Max => stats::max(values),
        }
    }
}

/// Non-null values of `value` partitioned by non-null `key`, groups in
/// first-appearance order. A group whose values are all null is kept empty.
pub fn group_values(
    table: &Table,
    key: &str,
    value: &str,
) -> Result<Vec<(String, Vec<f64>)>, StatsError> {
    table.require(&[key, value])?;

    let keys = table.keys(key)?;
    let values = table.numeric(value)?;

    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (k, v) in keys.into_iter().zip(values) {
        let Some(k) = k else { continue };
        let slot = match index.get(&k) {
            Some(&i) => i,
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, Vec::new()));
                groups.len() - 1
            }
        };
        if let Some(v) = v {
            groups[slot].1.push(v);
        }
    }
    Ok(groups)
}

/// One aggregate per group, keyed by group.
pub fn group_aggregate(
    table: &Table,
    key: &str,
    value: &str,
    agg: Agg,
) -> Result<BTreeMap<String, Option<f64>>, StatsError> {
    Ok(group_values(table, key, value)?
        .into_iter()
        .map(|(k, values)| (k, agg.apply(&values)))
        .collect())
}

/// Several aggregates per group, statistic first: `{"min": {group: v}, ...}`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct GroupRange {
    pub min: BTreeMap<String, Option<f64>>,
    pub max: BTreeMap<String, Option<f64>>,
    pub mean: BTreeMap<String, Option<f64>>,
}

pub fn group_range(table: &Table, key: &str, value: &str) -> Result<GroupRange, StatsError> {
    let mut range = GroupRange::default();
    for (k, values) in group_values(table, key, value)? {
        range.min.insert(k.clone(), Agg::Min.apply(&values));
        range.max.insert(k.clone(), Agg::Max.apply(&values));
        range.mean.insert(k, Agg::Mean.apply(&values));
    }
    Ok(range)
}

/// Per-group descriptive summary, statistic first.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct GroupSummary {
    pub count: BTreeMap<String, usize>,
    pub mean: BTreeMap<String, Option<f64>>,
    pub std: BTreeMap<String, Option<f64>>,
    pub min: BTreeMap<String, Option<f64>>,
    #[serde(rename = "25%")]
    pub q25: BTreeMap<String, Option<f64>>,
    #[serde(rename = "50%")]
    pub q50: BTreeMap<String, Option<f64>>,
    #[serde(rename = "75%")]
    pub q75: BTreeMap<String, Option<f64>>,
    pub max: BTreeMap<String, Option<f64>>,
}

impl GroupSummary {
    fn insert(&mut self, key: String, s: Summary) {
        self.count.insert(key.clone(), s.count);
        self.mean.insert(key.clone(), s.mean);
        self.std.insert(key.clone(), s.std);
        self.min.insert(key.clone(), s.min);
        self.q25.insert(key.clone(), s.q25);
        self.q50.insert(key.clone(), s.q50);
        self.q75.insert(key.clone(), s.q75);
        self.max.insert(key, s.max);
    }
}

pub fn group_describe(table: &Table, key: &str, value: &str) -> Result<GroupSummary, StatsError> {
    let mut summary = GroupSummary::default();
    for (k, values) in group_values(table, key, value)? {
        summary.insert(k, Summary::of(&values));
    }
    Ok(summary)
}

/// Summary of every numeric column, column first.
pub fn describe(table: &Table) -> Result<BTreeMap<String, Summary>, StatsError> {
    let mut out = BTreeMap::new();
    for column in table.column_names() {
        if !table.column(&column)?.data_type().is_numeric() {
            continue;
        }
        let values: Vec<f64> = table.numeric(&column)?.into_iter().flatten().collect();
        out.insert(column, Summary::of(&values));
    }
    Ok(out)
}

/// Pairwise Pearson correlation over rows where both columns are present.
pub fn correlation(
    table: &Table,
    columns: &[&str],
) -> Result<BTreeMap<String, BTreeMap<String, Option<f64>>>, StatsError> {
    table.require(columns)?;

    let series = columns
        .iter()
        .map(|c| table.numeric(c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut matrix = BTreeMap::new();
    for (i, a) in columns.iter().enumerate() {
        let mut row = BTreeMap::new();
        for (j, b) in columns.iter().enumerate() {
            let pairs: Vec<(f64, f64)> = series[i]
                .iter()
                .zip(&series[j])
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .collect();
            row.insert(b.to_string(), stats::pearson(&pairs));
        }
        matrix.insert(a.to_string(), row);
    }
    Ok(matrix)
}
