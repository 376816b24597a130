use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::record_batch::RecordBatch;
use log::{info, warn};
use regex::Regex;

use crate::core::StatsError;

use super::table::Table;

/// Loads a CSV table, substituting an empty table when the file cannot be
/// read or parsed. Startup never fails because of a dataset.
pub fn load_table(name: &str, path: &Path) -> Table {
    match read_csv_file(path) {
        Ok(batch) => {
            info!(
                "table '{}': loaded {} rows, {} columns from {}",
                name,
                batch.num_rows(),
                batch.num_columns(),
                path.display()
            );
            Table::new(name, batch)
        }
        Err(e) => {
            warn!(
                "table '{}': cannot load {}: {}; serving an empty table",
                name,
                path.display(),
                e
            );
            Table::empty(name)
        }
    }
}

pub fn read_csv_file(path: &Path) -> Result<RecordBatch, StatsError> {
    let file = File::open(path)
        .map_err(|e| StatsError::IoError(format!("opening {}: {}", path.display(), e)))?;
    read_csv(BufReader::new(file))
}

/// Cell spellings read as missing values, matching what pandas treats as NA.
const NULL_VALUES: &str =
    r"^(|#N/A|#N/A N/A|#NA|-1\.#IND|-1\.#QNAN|-NaN|-nan|1\.#IND|1\.#QNAN|<NA>|N/A|NA|NULL|NaN|None|n/a|nan|null)$";

/// Reads a headered CSV, inferring column types over every record.
///
/// Rows with fewer fields than the header are padded with nulls.
pub fn read_csv<R: Read + Seek>(mut reader: R) -> Result<RecordBatch, StatsError> {
    let nulls = Regex::new(NULL_VALUES).map_err(|e| StatsError::TableError(e.to_string()))?;
    let (schema, _) = Format::default()
        .with_header(true)
        .with_truncated_rows(true)
        .with_null_regex(nulls.clone())
        .infer_schema(&mut reader, None)?;
    reader.rewind()?;

    let schema = Arc::new(schema);
    let csv = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_truncated_rows(true)
        .with_null_regex(nulls)
        .build(reader)?;
    let batches = csv.collect::<Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use arrow::datatypes::DataType;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_read_csv_infers_types() {
        let csv = "Brand,Year,Price\nToyota,2019,15000.5\nHonda,,9000\n";
        let batch = read_csv(Cursor::new(csv)).unwrap();
        assert_eq!(batch.num_rows(), 2);

        let schema = batch.schema();
        assert_eq!(schema.field_with_name("Brand").unwrap().data_type(), &DataType::Utf8);
        assert_eq!(schema.field_with_name("Year").unwrap().data_type(), &DataType::Int64);
        assert_eq!(schema.field_with_name("Price").unwrap().data_type(), &DataType::Float64);
        assert!(batch.column_by_name("Year").unwrap().is_null(1));
    }

    #[test]
    fn test_na_markers_read_as_null() {
        let csv = "Brand,Price,Color\nToyota,10000,NA\nToyota,NA,n/a\nToyota,20000,Red\nHonda,NaN,null\n";
        let batch = read_csv(Cursor::new(csv)).unwrap();

        let schema = batch.schema();
        assert_eq!(schema.field_with_name("Price").unwrap().data_type(), &DataType::Int64);
        let price = batch.column_by_name("Price").unwrap();
        assert_eq!(price.null_count(), 2);
        assert!(price.is_null(1));
        assert!(price.is_null(3));

        let color = batch.column_by_name("Color").unwrap();
        assert_eq!(color.null_count(), 3);
        assert!(color.is_valid(2));
    }

    #[test]
    fn test_short_row_is_padded_with_nulls() {
        let csv = "Brand,Model,Price\nToyota,Corolla,10000\nHonda,Civic\nToyota,Camry,20000\n";
        let batch = read_csv(Cursor::new(csv)).unwrap();
        assert_eq!(batch.num_rows(), 3);

        let price = batch.column_by_name("Price").unwrap();
        assert!(price.is_valid(0));
        assert!(price.is_null(1));
        assert!(price.is_valid(2));
        assert!(batch.column_by_name("Model").unwrap().is_valid(1));
    }

    #[test]
    fn test_header_only_csv_is_empty() {
        let batch = read_csv(Cursor::new("Brand,Model\n")).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 2);
    }

    #[test]
    fn test_load_missing_file_yields_empty_table() {
        let dir = TempDir::new().unwrap();
        let table = load_table("details", &dir.path().join("nope.csv"));
        assert!(table.is_unloaded());
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.name(), "details");
    }

    #[test]
    fn test_load_malformed_file_yields_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.csv");
        std::fs::write(&path, b"Brand,Model\n\xff\xfe,Corolla\n").unwrap();
        let table = load_table("details", &path);
        assert!(table.is_unloaded());
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pricing.csv");
        std::fs::write(&path, "Brand,Price\nToyota,10000\nToyota,20000\n").unwrap();
        let table = load_table("pricing", &path);
        assert!(!table.is_unloaded());
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column_names(), vec!["Brand", "Price"]);
    }
}
