use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use carstats::conf::{Config, DataConfig};
use carstats::dataset::{CAR_AGE, Dataset};
use carstats::service::StatsService;
use carstats::testutil::{
    DETAILS_CSV, PRICING_CSV, data_dir_with, generate_details_csv, generate_pricing_csv,
    missing_data,
};

#[test]
fn test_load_both_tables() {
    let (_dir, config) = data_dir_with(DETAILS_CSV, PRICING_CSV);
    let dataset = Dataset::load(&config);
    assert_eq!(dataset.details.num_rows(), 5);
    assert_eq!(dataset.pricing.num_rows(), 5);
    assert!(dataset.details.has_column(CAR_AGE));
}

#[test]
fn test_one_missing_file_does_not_affect_the_other() {
    let (dir, config) = data_dir_with(DETAILS_CSV, PRICING_CSV);
    fs::remove_file(&config.pricing_path).unwrap();

    let dataset = Dataset::load(&config);
    assert!(dataset.pricing.is_unloaded());
    assert!(!dataset.details.is_unloaded());

    let svc = StatsService::new(dataset);
    assert_eq!(svc.top_brands().unwrap().len(), 2);
    assert!(svc.price_analysis().unwrap().mean.is_empty());
    drop(dir);
}

#[test]
fn test_all_missing_files() {
    let dir = TempDir::new().unwrap();
    let dataset = Dataset::load(&missing_data(dir.path()));
    let svc = StatsService::new(dataset);
    assert!(svc.tables().iter().all(|t| !t.loaded));
    assert!(svc.fuel_count().unwrap().is_empty());
}

#[test]
fn test_reference_year_from_config() {
    let (dir, data) = data_dir_with(DETAILS_CSV, PRICING_CSV);
    let toml = format!(
        r#"
        [data]
        details_path = "{}"
        pricing_path = "{}"
        reference_year = 2030
        "#,
        data.details_path.display(),
        data.pricing_path.display()
    );
    let config = Config::from_str(&toml).unwrap();
    let dataset = Dataset::load(&config.data);

    let ages = dataset.details.numeric(CAR_AGE).unwrap();
    assert_eq!(ages[0], Some(10.0));
    drop(dir);
}

#[test]
fn test_car_age_computed_once_across_threads() {
    let (_dir, config) = data_dir_with(&generate_details_csv(2_000), PRICING_CSV);
    let dataset = Arc::new(Dataset::load(&config));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let dataset = dataset.clone();
            std::thread::spawn(move || dataset.details.car_age().unwrap())
        })
        .collect();
    let ages: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let cached = dataset.details.car_age().unwrap();
    assert!(ages.iter().all(|a| a.as_ref() == cached.as_ref()));
    assert!(Arc::ptr_eq(&cached, &dataset.details.car_age().unwrap()));
}

#[test]
fn test_generated_data_properties() {
    let (_dir, config) = data_dir_with(&generate_details_csv(500), &generate_pricing_csv(500));
    let svc = StatsService::new(Dataset::load(&config));

    let years = svc.listings_by_year().unwrap();
    assert_eq!(years.0.iter().map(|(_, c)| c).sum::<u64>(), 500);

    let brands = svc.top_brands().unwrap();
    assert_eq!(brands.len(), 5);
    assert!(brands.0.iter().map(|(_, c)| c).sum::<u64>() <= 500);

    let source_brands: Vec<String> = svc
        .dataset()
        .pricing
        .keys("Brand")
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    let insurance = svc.insurance_cost().unwrap();
    assert!(insurance.keys().all(|k| source_brands.contains(k)));

    let models = svc.expensive_models().unwrap();
    assert_eq!(models.len(), 10);
}

#[test]
fn test_na_prices_are_skipped_in_aggregates() {
    let pricing = "Brand,Model,Price,Engine_cc,Insurance_Cost\n\
        Toyota,Corolla,10000,1500,500\n\
        Toyota,Camry,NA,2000,600\n\
        Toyota,Yaris,20000,1200,N/A\n";
    let (_dir, config) = data_dir_with(DETAILS_CSV, pricing);
    let svc = StatsService::new(Dataset::load(&config));
    assert!(!svc.dataset().pricing.is_unloaded());

    let range = svc.price_analysis().unwrap();
    assert_eq!(range.min["Toyota"], Some(10000.0));
    assert_eq!(range.max["Toyota"], Some(20000.0));
    assert_eq!(range.mean["Toyota"], Some(15000.0));
    assert_eq!(svc.insurance_cost().unwrap()["Toyota"], Some(550.0));
}

#[test]
fn test_short_row_keeps_the_table_loaded() {
    let pricing = "Brand,Model,Price\nToyota,Corolla,10000\nHonda,Civic\nToyota,Camry,20000\n";
    let (_dir, config) = data_dir_with(DETAILS_CSV, pricing);
    let svc = StatsService::new(Dataset::load(&config));
    assert_eq!(svc.dataset().pricing.num_rows(), 3);

    let range = svc.price_analysis().unwrap();
    assert_eq!(range.mean["Toyota"], Some(15000.0));
    assert_eq!(range.mean["Honda"], None);
}

#[test]
fn test_data_config_defaults_are_relative() {
    let data = DataConfig::default();
    assert!(data.details_path.is_relative());
    assert!(data.pricing_path.is_relative());
}
