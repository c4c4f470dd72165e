//! Railway station dataset builder.
//!
//! Crawls per-train stop lists, geocodes the distinct station names through a
//! chain of providers, reverse geocodes them to administrative areas and
//! measures distances between stations.

pub mod address;
pub mod config;
pub mod crawler;
pub mod distance;
pub mod error;
pub mod geocode;
pub mod overrides;
pub mod progress;
pub mod resolver;
pub mod route_page;
pub mod stages;
pub mod store;
pub mod types;
