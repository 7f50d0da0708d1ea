pub mod aggregation;
pub mod counting;
pub mod detection;
pub mod errors;
pub mod geometry;
pub mod profiles;
pub mod rules;
pub mod status;
pub mod taxonomy;
