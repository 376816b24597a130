use ahash::AHashMap;

use crate::core::StatsError;
use crate::dataset::Table;

use super::Ranked;

/// Occurrences of each non-null value of `column`, most frequent first.
/// Ties keep first-appearance order.
pub fn value_counts(
    table: &Table,
    column: &str,
    top: Option<usize>,
) -> Result<Ranked<u64>, StatsError> {
    table.require(&[column])?;

    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut counts: Vec<(String, u64)> = Vec::new();
    for key in table.keys(column)?.into_iter().flatten() {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(Ranked(counts).truncate(top))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::table_from_csv;

    #[test]
    fn test_counts_sorted_descending() {
        let table = table_from_csv(
            "details",
            "Brand\nHonda\nToyota\nToyota\nHonda\nToyota\n",
        );
        let counts = value_counts(&table, "Brand", None).unwrap();
        assert_eq!(
            counts,
            Ranked(vec![("Toyota".to_string(), 3), ("Honda".to_string(), 2)])
        );
    }

    #[test]
    fn test_top_k_and_totals() {
        let table = table_from_csv(
            "details",
            "Color,Brand\nred,a\nblue,a\nred,a\ngreen,a\n,a\nblack,a\n",
        );
        let all = value_counts(&table, "Color", None).unwrap();
        let total: u64 = all.0.iter().map(|(_, c)| c).sum();
        // the blank cell is null and not counted
        assert_eq!(total, 5);

        let top = value_counts(&table, "Color", Some(2)).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top.get("red"), Some(&2));
        // ties resolved by first appearance
        assert_eq!(top.keys().nth(1), Some("blue"));
    }

    #[test]
    fn test_numeric_keys() {
        let table = table_from_csv("details", "Year\n2019\n2020\n2019\n");
        let counts = value_counts(&table, "Year", None).unwrap();
        assert_eq!(counts.get("2019"), Some(&2));
        assert_eq!(counts.get("2020"), Some(&1));
    }

    #[test]
    fn test_missing_column() {
        let table = table_from_csv("details", "Brand\nToyota\n");
        assert_eq!(
            value_counts(&table, "Color", None),
            Err(StatsError::missing_column("details", "Color"))
        );
    }

    #[test]
    fn test_unloaded_table() {
        let counts = value_counts(&Table::empty("details"), "Brand", Some(5)).unwrap();
        assert!(counts.is_empty());
    }
}
