use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the two datasets live and how the derived age column is computed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    #[serde(default = "DataConfig::default_details_path")]
    pub details_path: PathBuf,
    #[serde(default = "DataConfig::default_pricing_path")]
    pub pricing_path: PathBuf,
    /// Car_Age is `reference_year - Year`. Fixed, not wall-clock.
    #[serde(default = "DataConfig::default_reference_year")]
    pub reference_year: i64,
}

impl DataConfig {
    fn default_details_path() -> PathBuf {
        PathBuf::from("car_details_df.csv")
    }

    fn default_pricing_path() -> PathBuf {
        PathBuf::from("price_cardetails_df.csv")
    }

    fn default_reference_year() -> i64 {
        2024
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            details_path: Self::default_details_path(),
            pricing_path: Self::default_pricing_path(),
            reference_year: Self::default_reference_year(),
        }
    }
}
