use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde_json::Value;

use crate::dataset::TableInfo;
use crate::query::{GroupRange, GroupSummary, Ranked, Summary};
use crate::service::{Counts, GroupMeans, Matrix, StatsService};

use super::error::ApiError;
use super::types::{BrandQuery, GraphResponse, LocationQuery, MessageResponse};

type Svc = State<Arc<StatsService>>;

pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Car analysis API is running!".to_string(),
    })
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn tables(State(service): Svc) -> Json<Vec<TableInfo>> {
    Json(service.tables())
}

pub async fn top_brands(State(service): Svc) -> Result<Json<Counts>, ApiError> {
    Ok(Json(service.top_brands()?))
}

pub async fn brand_models(
    State(service): Svc,
    Query(query): Query<BrandQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(service.brand_models(&query.brand)?))
}

pub async fn popular_brand_location(
    State(service): Svc,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Counts>, ApiError> {
    Ok(Json(service.popular_brand_location(&query.location)?))
}

pub async fn avg_mileage(State(service): Svc) -> Result<Json<GroupMeans>, ApiError> {
    Ok(Json(service.avg_mileage()?))
}

pub async fn brand_transmission(
    State(service): Svc,
    Query(query): Query<BrandQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(service.brand_transmission(&query.brand)?))
}

pub async fn price_summary(
    State(service): Svc,
) -> Result<Json<BTreeMap<String, Summary>>, ApiError> {
    Ok(Json(service.price_summary()?))
}

pub async fn recent_transmission(State(service): Svc) -> Result<Json<Counts>, ApiError> {
    Ok(Json(service.recent_transmission()?))
}

pub async fn price_analysis(State(service): Svc) -> Result<Json<GroupRange>, ApiError> {
    Ok(Json(service.price_analysis()?))
}

pub async fn fuel_count(State(service): Svc) -> Result<Json<Counts>, ApiError> {
    Ok(Json(service.fuel_count()?))
}

pub async fn age_price_correlation(State(service): Svc) -> Result<Json<Matrix>, ApiError> {
    Ok(Json(service.age_price_correlation()?))
}

pub async fn expensive_models(
    State(service): Svc,
) -> Result<Json<Ranked<Option<f64>>>, ApiError> {
    Ok(Json(service.expensive_models()?))
}

pub async fn top_locations(State(service): Svc) -> Result<Json<Counts>, ApiError> {
    Ok(Json(service.top_locations()?))
}

pub async fn common_price_range(State(service): Svc) -> Result<Json<GroupSummary>, ApiError> {
    Ok(Json(service.common_price_range()?))
}

pub async fn popular_colors(State(service): Svc) -> Result<Json<Counts>, ApiError> {
    Ok(Json(service.popular_colors()?))
}

pub async fn engine_price(State(service): Svc) -> Result<Json<GroupMeans>, ApiError> {
    Ok(Json(service.engine_price()?))
}

pub async fn resale_value(State(service): Svc) -> Result<Json<Ranked<Option<f64>>>, ApiError> {
    Ok(Json(service.resale_value()?))
}

pub async fn popular_features(State(service): Svc) -> Result<Json<Counts>, ApiError> {
    Ok(Json(service.popular_features()?))
}

pub async fn fuel_efficiency(State(service): Svc) -> Result<Json<GroupMeans>, ApiError> {
    Ok(Json(service.fuel_efficiency()?))
}

pub async fn resale_by_fuel(State(service): Svc) -> Result<Json<GroupMeans>, ApiError> {
    Ok(Json(service.resale_by_fuel()?))
}

pub async fn age_mileage(State(service): Svc) -> Result<Json<GroupMeans>, ApiError> {
    Ok(Json(service.age_mileage()?))
}

pub async fn price_histogram(State(service): Svc) -> Result<impl IntoResponse, ApiError> {
    let graph = service.price_histogram()?;
    Ok(Json(GraphResponse { graph }))
}

pub async fn listings_by_year(State(service): Svc) -> Result<Json<Counts>, ApiError> {
    Ok(Json(service.listings_by_year()?))
}

pub async fn listings_by_owner(State(service): Svc) -> Result<Json<Counts>, ApiError> {
    Ok(Json(service.listings_by_owner()?))
}

pub async fn common_body_types(State(service): Svc) -> Result<Json<Counts>, ApiError> {
    Ok(Json(service.common_body_types()?))
}

pub async fn insurance_cost(State(service): Svc) -> Result<Json<GroupMeans>, ApiError> {
    Ok(Json(service.insurance_cost()?))
}
