use std::collections::BTreeMap;

use log::debug;
use serde_json::Value;

use crate::chart::{self, ChartStyle};
use crate::core::StatsError;
use crate::dataset::{CAR_AGE, Dataset, TableInfo};
use crate::query::{
    self, Agg, GroupRange, GroupSummary, Ranked, Summary, distinct_where, group_aggregate,
    value_counts,
};

pub type Counts = Ranked<u64>;
pub type GroupMeans = BTreeMap<String, Option<f64>>;
pub type Matrix = BTreeMap<String, BTreeMap<String, Option<f64>>>;

const RECENT_YEAR: f64 = 2020.0;

/// Every statistics query the API serves, over an injected [`Dataset`].
pub struct StatsService {
    dataset: Dataset,
    chart: ChartStyle,
}

impl StatsService {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            chart: ChartStyle::default(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn tables(&self) -> Vec<TableInfo> {
        self.dataset.tables()
    }

    pub fn top_brands(&self) -> Result<Counts, StatsError> {
        value_counts(&self.dataset.details, "Brand", Some(5))
    }

    pub fn brand_models(&self, brand: &str) -> Result<Vec<Value>, StatsError> {
        distinct_where(&self.dataset.details, "Brand", brand, "Model")
    }

    pub fn popular_brand_location(&self, location: &str) -> Result<Counts, StatsError> {
        let details = &self.dataset.details;
        details.require(&["Location", "Brand"])?;
        value_counts(&details.filter_eq("Location", location)?, "Brand", Some(1))
    }

    pub fn avg_mileage(&self) -> Result<GroupMeans, StatsError> {
        group_aggregate(&self.dataset.details, "Fuel_Type", "Mileage_km", Agg::Mean)
    }

    pub fn brand_transmission(&self, brand: &str) -> Result<Vec<Value>, StatsError> {
        distinct_where(&self.dataset.details, "Brand", brand, "Transmission")
    }

    pub fn price_summary(&self) -> Result<BTreeMap<String, Summary>, StatsError> {
        query::describe(&self.dataset.pricing)
    }

    pub fn recent_transmission(&self) -> Result<Counts, StatsError> {
        let details = &self.dataset.details;
        details.require(&["Year", "Transmission"])?;
        value_counts(
            &details.filter_at_least("Year", RECENT_YEAR)?,
            "Transmission",
            None,
        )
    }

    pub fn price_analysis(&self) -> Result<GroupRange, StatsError> {
        query::group_range(&self.dataset.pricing, "Brand", "Price")
    }

    pub fn fuel_count(&self) -> Result<Counts, StatsError> {
        value_counts(&self.dataset.details, "Fuel_Type", None)
    }

    pub fn age_price_correlation(&self) -> Result<Matrix, StatsError> {
        query::correlation(&self.dataset.details, &[CAR_AGE, "Price"])
    }

    pub fn expensive_models(&self) -> Result<Ranked<Option<f64>>, StatsError> {
        let means = group_aggregate(&self.dataset.pricing, "Model", "Price", Agg::Mean)?;
        Ok(Ranked::descending(means.into_iter().collect()).truncate(Some(10)))
    }

    pub fn top_locations(&self) -> Result<Counts, StatsError> {
        value_counts(&self.dataset.details, "Location", Some(10))
    }

    pub fn common_price_range(&self) -> Result<GroupSummary, StatsError> {
        query::group_describe(&self.dataset.pricing, "Model", "Price")
    }

    pub fn popular_colors(&self) -> Result<Counts, StatsError> {
        value_counts(&self.dataset.details, "Color", None)
    }

    pub fn engine_price(&self) -> Result<GroupMeans, StatsError> {
        group_aggregate(&self.dataset.pricing, "Engine_cc", "Price", Agg::Mean)
    }

    pub fn resale_value(&self) -> Result<Ranked<Option<f64>>, StatsError> {
        let medians = group_aggregate(&self.dataset.pricing, "Brand", "Price", Agg::Median)?;
        Ok(Ranked::descending(medians.into_iter().collect()))
    }

    pub fn popular_features(&self) -> Result<Counts, StatsError> {
        value_counts(&self.dataset.details, "Features", None)
    }

    pub fn fuel_efficiency(&self) -> Result<GroupMeans, StatsError> {
        group_aggregate(&self.dataset.details, "Engine_cc", "Mileage_km", Agg::Mean)
    }

    pub fn resale_by_fuel(&self) -> Result<GroupMeans, StatsError> {
        group_aggregate(&self.dataset.pricing, "Fuel_Type", "Price", Agg::Median)
    }

    pub fn age_mileage(&self) -> Result<GroupMeans, StatsError> {
        group_aggregate(&self.dataset.details, CAR_AGE, "Mileage_km", Agg::Mean)
    }

    /// Price distribution as a `data:image/png;base64,...` URI.
    pub fn price_histogram(&self) -> Result<String, StatsError> {
        let pricing = &self.dataset.pricing;
        pricing.require(&["Price"])?;
        let prices: Vec<f64> = pricing.numeric("Price")?.into_iter().flatten().collect();
        let png = chart::render_histogram(&prices, &self.chart)?;
        debug!("rendered price histogram: {} values, {} bytes", prices.len(), png.len());
        Ok(chart::data_uri(&png))
    }

    pub fn listings_by_year(&self) -> Result<Counts, StatsError> {
        value_counts(&self.dataset.details, "Year", None)
    }

    pub fn listings_by_owner(&self) -> Result<Counts, StatsError> {
        value_counts(&self.dataset.details, "Owner_Type", None)
    }

    pub fn common_body_types(&self) -> Result<Counts, StatsError> {
        value_counts(&self.dataset.details, "Body_Type", None)
    }

    pub fn insurance_cost(&self) -> Result<GroupMeans, StatsError> {
        group_aggregate(&self.dataset.pricing, "Brand", "Insurance_Cost", Agg::Mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Table;
    use crate::testutil::{DETAILS_CSV, PRICING_CSV, table_from_csv};

    fn service() -> StatsService {
        StatsService::new(Dataset::new(
            table_from_csv("details", DETAILS_CSV).with_age_reference(2024),
            table_from_csv("pricing", PRICING_CSV),
        ))
    }

    fn unloaded() -> StatsService {
        StatsService::new(Dataset::new(
            Table::empty("details").with_age_reference(2024),
            Table::empty("pricing"),
        ))
    }

    #[test]
    fn test_top_brands() {
        let top = service().top_brands().unwrap();
        assert_eq!(
            top,
            Ranked(vec![("Toyota".to_string(), 3), ("Honda".to_string(), 2)])
        );
    }

    #[test]
    fn test_brand_filters() {
        let svc = service();
        assert_eq!(svc.brand_models("Honda").unwrap(), vec![Value::from("Civic")]);
        assert!(svc.brand_models("").unwrap().is_empty());
        assert_eq!(svc.brand_transmission("Toyota").unwrap().len(), 2);
    }

    #[test]
    fn test_popular_brand_location() {
        let svc = service();
        let popular = svc.popular_brand_location("Pune").unwrap();
        assert_eq!(popular, Ranked(vec![("Toyota".to_string(), 2)]));
        assert!(svc.popular_brand_location("Atlantis").unwrap().is_empty());
    }

    #[test]
    fn test_recent_transmission() {
        let recent = service().recent_transmission().unwrap();
        let total: u64 = recent.0.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_price_analysis() {
        let range = service().price_analysis().unwrap();
        assert_eq!(range.min["Toyota"], Some(10000.0));
        assert_eq!(range.max["Toyota"], Some(20000.0));
        assert_eq!(range.mean["Toyota"], Some(15000.0));
    }

    #[test]
    fn test_expensive_models_sorted() {
        let models = service().expensive_models().unwrap();
        assert_eq!(models.keys().next(), Some("Camry"));
        let values: Vec<f64> = models.0.iter().filter_map(|(_, v)| *v).collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_age_mileage_uses_derived_age() {
        let by_age = service().age_mileage().unwrap();
        assert_eq!(by_age["4"], Some(20000.0));
    }

    #[test]
    fn test_columns_absent_from_table() {
        let svc = service();
        assert_eq!(
            svc.age_price_correlation().unwrap_err(),
            StatsError::missing_column("details", "Price")
        );
        assert_eq!(
            svc.fuel_efficiency().unwrap_err(),
            StatsError::missing_column("details", "Engine_cc")
        );
        assert_eq!(
            svc.resale_by_fuel().unwrap_err(),
            StatsError::missing_column("pricing", "Fuel_Type")
        );
    }

    #[test]
    fn test_histogram_uri() {
        let uri = service().price_histogram().unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_unloaded_tables_answer_empty() {
        let svc = unloaded();
        assert!(svc.top_brands().unwrap().is_empty());
        assert!(svc.brand_models("Toyota").unwrap().is_empty());
        assert!(svc.avg_mileage().unwrap().is_empty());
        assert!(svc.price_summary().unwrap().is_empty());
        assert!(svc.recent_transmission().unwrap().is_empty());
        assert!(svc.age_mileage().unwrap().is_empty());
        assert!(matches!(
            svc.price_histogram(),
            Err(StatsError::RenderError(_))
        ));
    }
}
