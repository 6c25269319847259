mod moment_estimator;

pub use moment_estimator::MomentEstimator;
