pub mod distance;
mod knn_classifier;

pub use knn_classifier::{KnnClassifier, Neighbor};
