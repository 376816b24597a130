mod error;
mod handlers;
mod types;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::core::StatsError;
use crate::service::StatsService;

pub use error::ApiError;
pub use types::{ErrorResponse, GraphResponse, MessageResponse};

pub struct StatsApi {
    service: Arc<StatsService>,
}

impl StatsApi {
    pub fn new(service: StatsService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub fn router(&self) -> Router {
        // the front-end is served from another origin
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(handlers::home))
            .route("/health", get(handlers::health))
            .route("/tables", get(handlers::tables))
            .route("/top-brands", get(handlers::top_brands))
            .route("/brand-models", get(handlers::brand_models))
            .route("/popular-brand-location", get(handlers::popular_brand_location))
            .route("/avg-mileage", get(handlers::avg_mileage))
            .route("/brand-transmission", get(handlers::brand_transmission))
            .route("/price-summary", get(handlers::price_summary))
            .route("/recent-transmission", get(handlers::recent_transmission))
            .route("/price-analysis", get(handlers::price_analysis))
            .route("/fuel-count", get(handlers::fuel_count))
            .route("/age-price-correlation", get(handlers::age_price_correlation))
            .route("/expensive-models", get(handlers::expensive_models))
            .route("/top-locations", get(handlers::top_locations))
            .route("/common-price-range", get(handlers::common_price_range))
            .route("/popular-colors", get(handlers::popular_colors))
            .route("/engine-price", get(handlers::engine_price))
            .route("/resale-value", get(handlers::resale_value))
            .route("/popular-features", get(handlers::popular_features))
            .route("/fuel-efficiency", get(handlers::fuel_efficiency))
            .route("/resale-by-fuel", get(handlers::resale_by_fuel))
            .route("/age-mileage", get(handlers::age_mileage))
            .route("/price-histogram", get(handlers::price_histogram))
            .route("/listings-by-year", get(handlers::listings_by_year))
            .route("/listings-by-owner", get(handlers::listings_by_owner))
            .route("/common-body-types", get(handlers::common_body_types))
            .route("/insurance-cost", get(handlers::insurance_cost))
            .layer(cors)
            .with_state(self.service.clone())
    }

    pub async fn serve(self, addr: &str) -> Result<(), StatsError> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| StatsError::IoError(format!("binding to {addr}: {e}")))?;
        info!("listening on {}", addr);
        axum::serve(listener, self.router())
            .await
            .map_err(|e| StatsError::IoError(format!("serving: {e}")))?;
        Ok(())
    }
}
