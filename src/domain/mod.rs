// Domain layer - Core types with no infrastructure concerns
pub mod dashboard;
pub mod profile;
pub mod quiz;
pub mod source;
pub mod time_series;
