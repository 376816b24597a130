mod loader;
mod table;

use serde::Serialize;

use crate::conf::DataConfig;

pub use loader::{load_table, read_csv, read_csv_file};
pub use table::{CAR_AGE, Table};

pub const DETAILS: &str = "details";
pub const PRICING: &str = "pricing";

/// The two datasets, loaded once at startup and never reloaded.
#[derive(Debug)]
pub struct Dataset {
    pub details: Table,
    pub pricing: Table,
}

/// Shape of a loaded table, as listed by the API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableInfo {
    pub name: String,
    pub loaded: bool,
    pub num_rows: usize,
    pub columns: Vec<String>,
}

impl Dataset {
    pub fn new(details: Table, pricing: Table) -> Self {
        Self { details, pricing }
    }

    pub fn load(config: &DataConfig) -> Self {
        let details =
            load_table(DETAILS, &config.details_path).with_age_reference(config.reference_year);
        let pricing = load_table(PRICING, &config.pricing_path);
        Self::new(details, pricing)
    }

    pub fn tables(&self) -> Vec<TableInfo> {
        [&self.details, &self.pricing]
            .into_iter()
            .map(|t| TableInfo {
                name: t.name().to_string(),
                loaded: !t.is_unloaded(),
                num_rows: t.num_rows(),
                columns: t.column_names(),
            })
            .collect()
    }
}
