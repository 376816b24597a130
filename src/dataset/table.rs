use std::sync::{Arc, OnceLock};

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray, Int64Array, new_null_array};
use arrow::compute::{cast, filter_record_batch};
use arrow::datatypes::{DataType, Float64Type, Int64Type, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use log::debug;

use crate::core::StatsError;

/// Derived column: `reference_year - Year`.
pub const CAR_AGE: &str = "Car_Age";
const YEAR: &str = "Year";

/// An immutable in-memory table with one lazily derived column.
///
/// A table without any columns stands in for a dataset that failed to load.
/// Every column read from it is empty, so queries degrade to empty results
/// instead of failing.
#[derive(Debug)]
pub struct Table {
    name: String,
    batch: RecordBatch,
    age_reference: Option<i64>,
    car_age: OnceLock<ArrayRef>,
}

impl Table {
    pub fn new(name: impl Into<String>, batch: RecordBatch) -> Self {
        Self {
            name: name.into(),
            batch,
            age_reference: None,
            car_age: OnceLock::new(),
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, RecordBatch::new_empty(Arc::new(Schema::empty())))
    }

    /// Enables the derived `Car_Age` column relative to `year`.
    pub fn with_age_reference(mut self, year: i64) -> Self {
        self.age_reference = Some(year);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// True for the placeholder of a dataset that could not be loaded.
    pub fn is_unloaded(&self) -> bool {
        self.batch.num_columns() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        if self.is_unloaded() || self.batch.column_by_name(column).is_some() {
            return true;
        }
        column == CAR_AGE && self.age_reference.is_some() && self.has_column(YEAR)
    }

    /// Validates that every column a query touches is present.
    pub fn require(&self, columns: &[&str]) -> Result<(), StatsError> {
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(StatsError::missing_column(&self.name, missing)),
            None => Ok(()),
        }
    }

    pub fn column(&self, column: &str) -> Result<ArrayRef, StatsError> {
        if self.is_unloaded() {
            return Ok(new_null_array(&DataType::Null, 0));
        }
        if let Some(array) = self.batch.column_by_name(column) {
            return Ok(array.clone());
        }
        if column == CAR_AGE && self.age_reference.is_some() {
            return self.car_age();
        }
        Err(StatsError::missing_column(&self.name, column))
    }

    /// Computes the age column once; later calls return the cached array.
    /// Concurrent first calls may both compute, only one result is kept.
    pub fn car_age(&self) -> Result<ArrayRef, StatsError> {
        if let Some(cached) = self.car_age.get() {
            return Ok(cached.clone());
        }
        let reference = self
            .age_reference
            .ok_or_else(|| StatsError::missing_column(&self.name, CAR_AGE))?;
        let years = self.numeric(YEAR)?;
        let ages: Int64Array = years
            .iter()
            .map(|y| y.and_then(|y| reference.checked_sub(y as i64)))
            .collect();
        debug!("table '{}': derived {} for {} rows", self.name, CAR_AGE, ages.len());
        let computed: ArrayRef = Arc::new(ages);
        Ok(self.car_age.get_or_init(|| computed).clone())
    }

    /// Column values as f64, nulls preserved. A column with no values at all
    /// is accepted whatever its inferred type.
    pub fn numeric(&self, column: &str) -> Result<Vec<Option<f64>>, StatsError> {
        let array = self.column(column)?;
        if array.logical_null_count() == array.len() {
            return Ok(vec![None; array.len()]);
        }
        if !array.data_type().is_numeric() {
            return Err(StatsError::TableError(format!(
                "column '{}' in table '{}' is not numeric ({})",
                column,
                self.name,
                array.data_type()
            )));
        }
        let floats = cast(array.as_ref(), &DataType::Float64)?;
        Ok(floats
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.filter(|v| !v.is_nan()))
            .collect())
    }

    /// Column values rendered as display strings, used as grouping keys.
    pub fn keys(&self, column: &str) -> Result<Vec<Option<String>>, StatsError> {
        let array = self.column(column)?;
        display_values(array.as_ref())
    }

    /// Column values as JSON scalars.
    pub fn json_values(&self, column: &str) -> Result<Vec<serde_json::Value>, StatsError> {
        let array = self.column(column)?;
        json_values(array.as_ref())
    }

    /// Rows whose `column` displays exactly as `value`.
    pub fn filter_eq(&self, column: &str, value: &str) -> Result<Table, StatsError> {
        let mask: BooleanArray = self
            .keys(column)?
            .iter()
            .map(|k| Some(k.as_deref() == Some(value)))
            .collect();
        self.filter(&mask)
    }

    /// Rows whose numeric `column` is at least `threshold`.
    pub fn filter_at_least(&self, column: &str, threshold: f64) -> Result<Table, StatsError> {
        let mask: BooleanArray = self
            .numeric(column)?
            .iter()
            .map(|v| Some(v.is_some_and(|v| v >= threshold)))
            .collect();
        self.filter(&mask)
    }

    fn filter(&self, mask: &BooleanArray) -> Result<Table, StatsError> {
        if self.is_unloaded() {
            return Ok(Table::empty(self.name.clone()));
        }
        let batch = filter_record_batch(&self.batch, mask)?;
        Ok(Table {
            name: self.name.clone(),
            batch,
            age_reference: self.age_reference,
            car_age: OnceLock::new(),
        })
    }
}

fn display_values(array: &dyn Array) -> Result<Vec<Option<String>>, StatsError> {
    if array.data_type() == &DataType::Null {
        return Ok(vec![None; array.len()]);
    }
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(array, &options)?;
    Ok((0..array.len())
        .map(|i| {
            if array.is_null(i) {
                None
            } else {
                Some(formatter.value(i).to_string())
            }
        })
        .collect())
}

fn json_values(array: &dyn Array) -> Result<Vec<serde_json::Value>, StatsError> {
    use serde_json::Value;

    let values = match array.data_type() {
        DataType::Null => vec![Value::Null; array.len()],
        DataType::Boolean => array
            .as_boolean()
            .iter()
            .map(|v| v.map_or(Value::Null, Value::Bool))
            .collect(),
        dt if dt.is_integer() => cast(array, &DataType::Int64)?
            .as_primitive::<Int64Type>()
            .iter()
            .map(|v| v.map_or(Value::Null, Value::from))
            .collect(),
        dt if dt.is_numeric() => cast(array, &DataType::Float64)?
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.map_or(Value::Null, Value::from))
            .collect(),
        _ => display_values(array)?
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::String))
            .collect(),
    };
    Ok(values)
}
