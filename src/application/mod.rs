// Application layer - Use cases over the domain model
pub mod dashboard_service;
pub mod error;
pub mod pipeline;
pub mod quiz_service;
pub mod recommendation_engine;
pub mod series_cache;
pub mod series_repository;
pub mod series_source;
pub mod synthetic;
