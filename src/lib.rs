pub mod api;
pub mod chart;
pub mod conf;
pub mod core;
pub mod dataset;
pub mod query;
pub mod service;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;
