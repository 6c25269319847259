use crate::core::dataset::{Dataset, matrix_width};
use crate::core::estimators::MomentEstimator;
use crate::error::KnnError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use strum_macros::{Display, EnumString};

/// What to do with a column whose standard deviation is zero.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ZeroVariancePolicy {
    /// `transform` fails with `DegenerateFeature`.
    #[default]
    Reject,
    /// The column is centered on its mean but not divided.
    Center,
}

/// Identity of a fitted scaler. Two scalers fitted to the same statistics
/// share a tag; data transformed by different scalers never compares equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScalingTag(u64);

impl fmt::Debug for ScalingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScalingTag({:016x})", self.0)
    }
}

/// Per-column standardization `(x - mean) / std` with population standard
/// deviation.
///
/// A scaler is immutable once fitted. Fit it on the training partition and
/// reuse it for every set that is scored afterwards; [`Standardized`] does
/// exactly that for a train/test split.
#[derive(Clone, Debug)]
pub struct FeatureScaler {
    means: Vec<f64>,
    std_devs: Vec<f64>,
    policy: ZeroVariancePolicy,
    tag: ScalingTag,
}

impl FeatureScaler {
    pub fn fit(features: &[Vec<f64>]) -> Result<Self, KnnError> {
        Self::fit_with_policy(features, ZeroVariancePolicy::default())
    }

    pub fn fit_with_policy(
        features: &[Vec<f64>],
        policy: ZeroVariancePolicy,
    ) -> Result<Self, KnnError> {
        let width = matrix_width(features)?;

        let mut columns = vec![MomentEstimator::new(); width];
        for row in features {
            for (est, &v) in columns.iter_mut().zip(row) {
                est.add_observation(v);
            }
        }

        let means: Vec<f64> = columns.iter().map(MomentEstimator::mean).collect();
        let std_devs: Vec<f64> = columns.iter().map(MomentEstimator::std_dev).collect();
        let tag = Self::tag_for(&means, &std_devs, policy);

        Ok(Self {
            means,
            std_devs,
            policy,
            tag,
        })
    }

    pub fn fit_dataset(dataset: &Dataset, policy: ZeroVariancePolicy) -> Result<Self, KnnError> {
        Self::fit_with_policy(dataset.features(), policy)
    }

    fn tag_for(means: &[f64], std_devs: &[f64], policy: ZeroVariancePolicy) -> ScalingTag {
        let mut hasher = DefaultHasher::new();
        for v in means.iter().chain(std_devs) {
            v.to_bits().hash(&mut hasher);
        }
        policy.hash(&mut hasher);
        ScalingTag(hasher.finish())
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn std_devs(&self) -> &[f64] {
        &self.std_devs
    }

    pub fn policy(&self) -> ZeroVariancePolicy {
        self.policy
    }

    pub fn tag(&self) -> ScalingTag {
        self.tag
    }

    pub fn number_of_features(&self) -> usize {
        self.means.len()
    }

    pub fn degenerate_columns(&self) -> Vec<usize> {
        self.std_devs
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s == 0.0)
            .map(|(j, _)| j)
            .collect()
    }

    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, KnnError> {
        if row.len() != self.means.len() {
            return Err(KnnError::invalid(format!(
                "row has {} features, scaler was fitted on {}",
                row.len(),
                self.means.len()
            )));
        }

        row.iter()
            .zip(self.means.iter().zip(&self.std_devs))
            .enumerate()
            .map(|(column, (&x, (&mean, &std)))| {
                if std != 0.0 {
                    return Ok((x - mean) / std);
                }
                match self.policy {
                    ZeroVariancePolicy::Reject => Err(KnnError::DegenerateFeature { column }),
                    ZeroVariancePolicy::Center => Ok(x - mean),
                }
            })
            .collect()
    }

    pub fn transform(&self, features: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, KnnError> {
        features.iter().map(|row| self.transform_row(row)).collect()
    }

    /// Transforms `dataset` and stamps the result with this scaler's tag.
    /// Already-scaled data is rejected; scaling twice is never what was meant.
    pub fn transform_dataset(&self, dataset: &Dataset) -> Result<Dataset, KnnError> {
        if let Some(existing) = dataset.scaling() {
            return Err(KnnError::invalid(format!(
                "dataset is already scaled ({existing:?})"
            )));
        }
        let scaled = self.transform(dataset.features())?;
        Ok(dataset.with_scaled_features(scaled, self.tag))
    }
}

/// A train/test split standardized with statistics from the training
/// partition only.
#[derive(Clone, Debug)]
pub struct Standardized {
    pub train: Dataset,
    pub test: Dataset,
    pub scaler: FeatureScaler,
}

impl Standardized {
    pub fn fit_on_train(
        train: &Dataset,
        test: &Dataset,
        policy: ZeroVariancePolicy,
    ) -> Result<Self, KnnError> {
        let scaler = FeatureScaler::fit_dataset(train, policy)?;
        Ok(Self {
            train: scaler.transform_dataset(train)?,
            test: scaler.transform_dataset(test)?,
            scaler,
        })
    }
}
