mod feature_scaler;

pub use feature_scaler::{FeatureScaler, ScalingTag, Standardized, ZeroVariancePolicy};
