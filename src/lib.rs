pub mod classifiers;
pub mod core;
pub mod error;
pub mod evaluation;
pub mod preprocessing;
pub mod streams;
pub mod tasks;
pub mod ui;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::KnnError;
