pub mod classifier;
pub mod knn;
mod majority;

pub use classifier::Classifier;
pub use knn::{KnnClassifier, Neighbor};
pub use majority::MajorityClassifier;
