//! Test and benchmark utilities.
//!
//! Available to unit tests and, through the `testutil` feature, to
//! integration tests and benches.

use std::fmt::Write as _;
use std::io::Cursor;
use std::path::Path;

use tempfile::TempDir;

use crate::conf::DataConfig;
use crate::dataset::{Table, read_csv};

/// A small listing-details dataset. Has no `Price` or `Engine_cc`.
pub const DETAILS_CSV: &str = "\
Brand,Model,Location,Fuel_Type,Mileage_km,Transmission,Year,Color,Features,Body_Type,Owner_Type
Toyota,Corolla,Pune,Petrol,20000,Manual,2020,White,Sunroof,Sedan,First
Toyota,Camry,Pune,Diesel,45000,Automatic,2018,Black,Navigation,Sedan,Second
Honda,Civic,Mumbai,Petrol,30000,Manual,2021,White,Sunroof,Sedan,First
Toyota,Fortuner,Delhi,Diesel,60000,Automatic,2016,Silver,Leather Seats,SUV,Third
Honda,Civic,Pune,Petrol,,Automatic,2022,Red,Sunroof,Sedan,First
";

/// A small pricing dataset. Has no `Fuel_Type`.
pub const PRICING_CSV: &str = "\
Brand,Model,Price,Engine_cc,Insurance_Cost
Toyota,Corolla,10000,1500,500
Toyota,Camry,20000,2500,900
Honda,Civic,12000,1800,600
Toyota,Corolla,15000,1500,
Honda,City,9000,1500,450
";

pub fn table_from_csv(name: &str, csv: &str) -> Table {
    let batch = read_csv(Cursor::new(csv.as_bytes())).unwrap();
    Table::new(name, batch)
}

/// Writes both CSVs into a temporary directory and returns a config
/// pointing at them. Keep the `TempDir` alive for as long as the files
/// are needed.
pub fn data_dir_with(details: &str, pricing: &str) -> (TempDir, DataConfig) {
    let dir = TempDir::new().unwrap();
    let details_path = dir.path().join("car_details_df.csv");
    let pricing_path = dir.path().join("price_cardetails_df.csv");
    std::fs::write(&details_path, details).unwrap();
    std::fs::write(&pricing_path, pricing).unwrap();
    let config = DataConfig {
        details_path,
        pricing_path,
        ..DataConfig::default()
    };
    (dir, config)
}

/// Config pointing at files that do not exist inside `dir`.
pub fn missing_data(dir: &Path) -> DataConfig {
    DataConfig {
        details_path: dir.join("absent_details.csv"),
        pricing_path: dir.join("absent_pricing.csv"),
        ..DataConfig::default()
    }
}

const BRANDS: &[&str] = &["Toyota", "Honda", "Ford", "BMW", "Hyundai", "Kia", "Audi"];
const FUELS: &[&str] = &["Petrol", "Diesel", "Electric", "Hybrid"];
const LOCATIONS: &[&str] = &["Pune", "Mumbai", "Delhi", "Chennai", "Kolkata"];

/// Deterministic details CSV with `num_rows` rows.
pub fn generate_details_csv(num_rows: usize) -> String {
    let mut csv = String::from(DETAILS_CSV.lines().next().unwrap_or_default());
    csv.push('\n');
    for i in 0..num_rows {
        let _ = writeln!(
            csv,
            "{},M{},{},{},{},{},{},C{},F{},B{},O{}",
            BRANDS[i % BRANDS.len()],
            i % 40,
            LOCATIONS[i % LOCATIONS.len()],
            FUELS[i % FUELS.len()],
            (i * 37) % 150_000,
            if i % 3 == 0 { "Manual" } else { "Automatic" },
            2005 + i % 20,
            i % 9,
            i % 6,
            i % 5,
            i % 4,
        );
    }
    csv
}

/// Deterministic pricing CSV with `num_rows` rows.
pub fn generate_pricing_csv(num_rows: usize) -> String {
    let mut csv = String::from(PRICING_CSV.lines().next().unwrap_or_default());
    csv.push('\n');
    for i in 0..num_rows {
        let _ = writeln!(
            csv,
            "{},M{},{},{},{}",
            BRANDS[i % BRANDS.len()],
            i % 40,
            5_000 + (i * 7919) % 95_000,
            1_000 + 100 * (i % 30),
            200 + (i * 13) % 1_800,
        );
    }
    csv
}
