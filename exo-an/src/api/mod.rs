//! HTTP API handlers for exo-an

pub mod analysis;
pub mod buildinfo;
pub mod datasets;
pub mod health;

pub use analysis::analysis_routes;
pub use buildinfo::buildinfo_routes;
pub use datasets::dataset_routes;
pub use health::health_routes;
