/// Running mean and variance of a single column (Welford's update).
#[derive(Clone, Debug, Default)]
pub struct MomentEstimator {
    count: f64,
    mean: f64,
    variance_sum: f64,
}

impl MomentEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_observation(&mut self, value: f64) {
        if value.is_infinite() || value.is_nan() {
            return;
        }

        self.count += 1.0;
        let last_mean = self.mean;
        self.mean += (value - last_mean) / self.count;
        self.variance_sum += (value - last_mean) * (value - self.mean);
    }

    pub fn count(&self) -> usize {
        self.count as usize
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Divides by n. This is the variance the standard scaler uses.
    pub fn population_variance(&self) -> f64 {
        if self.count > 0.0 {
            self.variance_sum / self.count
        } else {
            0.0
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.population_variance().sqrt()
    }
}
