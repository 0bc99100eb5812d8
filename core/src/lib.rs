//! Synthetic urban-mobility data: seeded ridership and demand generators,
//! a static station table, and the aggregation layer a dashboard renders.

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod demand;
pub mod error;
pub mod geo;
pub mod metrics;
pub mod ridership;
pub mod rng;
pub mod types;
