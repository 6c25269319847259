pub mod attributes;
pub mod dataset;
pub mod dataset_header;
pub mod estimators;
