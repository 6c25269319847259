use crate::classifiers::{Classifier, KnnClassifier, MajorityClassifier};
use crate::core::dataset::Dataset;
use crate::core::dataset_header::DatasetHeader;
use crate::evaluation::{SweepCurve, SweepPoint, null_accuracy, score, sweep_with};
use crate::preprocessing::{FeatureScaler, Standardized};
use crate::streams::{load_csv, train_test_split};
use crate::ui::types::config::{ScalingMode, SweepConfig};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::mpsc::Sender;

/// Everything a finished sweep produced.
#[derive(Clone, Debug)]
pub struct SweepReport {
    pub header: Arc<DatasetHeader>,
    pub train_size: usize,
    pub test_size: usize,
    /// Present when the features were standardized.
    pub scaler: Option<FeatureScaler>,
    pub null_accuracy: f64,
    /// Test accuracy of always predicting the most frequent training label.
    pub baseline_accuracy: f64,
    pub curve: SweepCurve,
    pub best_k: usize,
}

impl SweepReport {
    pub fn best_point(&self) -> Option<&SweepPoint> {
        self.curve.point_for(self.best_k)
    }
}

/// Load, split, optionally standardize, then sweep k.
pub struct SweepTask {
    config: SweepConfig,
    k_values: Vec<usize>,
    progress_tx: Option<Sender<SweepPoint>>,
}

impl SweepTask {
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        let k_values = config.parsed_k_values()?;
        Ok(Self {
            config,
            k_values,
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<SweepPoint>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn k_values(&self) -> &[usize] {
        &self.k_values
    }

    pub fn run(&self) -> Result<SweepReport> {
        let path = &self.config.data;
        let dataset = load_csv(path, &self.config.csv_options())
            .with_context(|| format!("failed to load '{}'", path.display()))?;
        self.run_on(&dataset)
    }

    pub fn run_on(&self, dataset: &Dataset) -> Result<SweepReport> {
        let (train, test) = train_test_split(dataset, self.config.test_fraction, self.config.seed)
            .context("failed to split the dataset")?;
        self.run_on_split(&train, &test)
    }

    /// Sweeps over an existing split. Both partitions must be unscaled.
    pub fn run_on_split(&self, train: &Dataset, test: &Dataset) -> Result<SweepReport> {
        let (train, test, scaler) = match self.config.scaling {
            ScalingMode::Standardize => {
                let s = Standardized::fit_on_train(train, test, self.config.zero_variance)
                    .context("failed to standardize features")?;
                (s.train, s.test, Some(s.scaler))
            }
            ScalingMode::Unscaled => (train.clone(), test.clone(), None),
        };

        let null_accuracy = null_accuracy(test.labels())?;
        let mut baseline = MajorityClassifier::new();
        baseline.fit_labels(train.features(), train.labels())?;
        let baseline_accuracy = score(&baseline, test.features(), test.labels())?;

        let tx = self.progress_tx.as_ref();
        let curve = sweep_with(&train, &test, &self.k_values, KnnClassifier::<usize>::new, |p| {
            if let Some(tx) = tx {
                // receiver gone means nobody is rendering; keep sweeping
                let _ = tx.send(p.clone());
            }
        })?;
        let best_k = curve.best_k()?;

        Ok(SweepReport {
            header: train.shared_header(),
            train_size: train.len(),
            test_size: test.len(),
            scaler,
            null_accuracy,
            baseline_accuracy,
            curve,
            best_k,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::ZeroVariancePolicy;
    use std::io::Write;
    use std::sync::mpsc;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    // x separates the classes; y is noise on the same scale as x
    const TRAIN: [([f64; 2], &str); 16] = [
        ([0.238, 0.544], "0"),
        ([2.37, 0.604], "1"),
        ([0.626, 0.066], "0"),
        ([2.013, 0.837], "1"),
        ([0.259, 0.234], "0"),
        ([2.996, 0.47], "1"),
        ([0.836, 0.476], "0"),
        ([2.639, 0.151], "1"),
        ([0.635, 0.868], "0"),
        ([2.523, 0.741], "1"),
        ([0.671, 0.064], "0"),
        ([2.758, 0.591], "1"),
        ([0.301, 0.031], "0"),
        ([2.866, 0.473], "1"),
        ([0.719, 0.879], "0"),
        ([2.714, 0.921], "1"),
    ];
    const TEST: [([f64; 2], &str); 8] = [
        ([0.395, 0.801], "0"),
        ([2.445, 0.936], "1"),
        ([0.879, 0.097], "0"),
        ([2.136, 0.217], "1"),
        ([0.965, 0.436], "0"),
        ([2.627, 0.301], "1"),
        ([0.507, 0.386], "0"),
        ([2.351, 0.585], "1"),
    ];

    /// Train and test partitions sharing one header, with y multiplied by
    /// `y_unit`.
    fn split(y_unit: f64) -> (Dataset, Dataset) {
        let records: Vec<(Vec<f64>, &str)> = TRAIN
            .iter()
            .chain(TEST.iter())
            .map(|(f, l)| (vec![f[0], f[1] * y_unit], *l))
            .collect();
        let ds = Dataset::from_records("noise", &["x", "y"], "class", &records).unwrap();
        let train = ds.subset(&(0..16).collect::<Vec<_>>()).unwrap();
        let test = ds.subset(&(16..24).collect::<Vec<_>>()).unwrap();
        (train, test)
    }

    fn task(scaling: ScalingMode, k_values: &str) -> SweepTask {
        SweepTask::new(SweepConfig {
            data: "unused.csv".into(),
            k_values: k_values.into(),
            scaling,
            ..SweepConfig::default()
        })
        .unwrap()
    }

    fn test_accuracies(report: &SweepReport) -> Vec<f64> {
        report.curve.iter().map(|p| p.testing_accuracy).collect()
    }

    #[test]
    fn large_unit_noise_column_breaks_unscaled_knn() {
        let t = task(ScalingMode::Unscaled, "1,3,5");

        let (train, test) = split(1.0);
        let report = t.run_on_split(&train, &test).unwrap();
        assert_eq!(test_accuracies(&report), vec![1.0, 1.0, 1.0]);
        assert!(report.scaler.is_none());

        let (train, test) = split(1000.0);
        let report = t.run_on_split(&train, &test).unwrap();
        assert!(approx_eq(report.curve.points()[0].testing_accuracy, 0.375, 1e-12));
        assert!(approx_eq(report.curve.points()[2].testing_accuracy, 0.625, 1e-12));
    }

    #[test]
    fn standardized_sweep_ignores_column_units() {
        let t = task(ScalingMode::Standardize, "1,3,5");

        let (train, test) = split(1.0);
        let small = t.run_on_split(&train, &test).unwrap();
        let (train, test) = split(1000.0);
        let large = t.run_on_split(&train, &test).unwrap();

        assert_eq!(test_accuracies(&small), vec![1.0, 1.0, 1.0]);
        assert_eq!(test_accuracies(&small), test_accuracies(&large));
        let scaler = large.scaler.as_ref().unwrap();
        let small_std = small.scaler.as_ref().unwrap().std_devs()[1];
        assert!(approx_eq(scaler.std_devs()[1] / small_std, 1000.0, 1e-6));
        assert_eq!(large.header.feature_names(), vec!["x", "y"]);
    }

    #[test]
    fn report_carries_baselines_and_best_k() {
        let (train, test) = split(1.0);
        let report = task(ScalingMode::Standardize, "5,3,1")
            .run_on_split(&train, &test)
            .unwrap();

        assert_eq!(report.train_size, 16);
        assert_eq!(report.test_size, 8);
        assert_eq!(report.null_accuracy, 0.5);
        assert_eq!(report.baseline_accuracy, 0.5);
        // all three tie at 1.0; smallest k wins
        assert_eq!(report.best_k, 1);
        assert_eq!(report.best_point().map(|p| p.k), Some(1));
    }

    #[test]
    fn progress_is_streamed_in_k_order() {
        let (train, test) = split(1.0);
        let (tx, rx) = mpsc::channel();
        let t = task(ScalingMode::Standardize, "1..=7:2").with_progress(tx);
        t.run_on_split(&train, &test).unwrap();
        drop(t);

        let ks: Vec<usize> = rx.iter().map(|p| p.k).collect();
        assert_eq!(ks, vec![1, 3, 5, 7]);
    }

    #[test]
    fn dropped_receiver_does_not_stop_the_sweep() {
        let (train, test) = split(1.0);
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let report = task(ScalingMode::Unscaled, "1,2")
            .with_progress(tx)
            .run_on_split(&train, &test)
            .unwrap();
        assert_eq!(report.curve.len(), 2);
    }

    #[test]
    fn k_larger_than_training_set_fails() {
        let (train, test) = split(1.0);
        let err = task(ScalingMode::Unscaled, "17")
            .run_on_split(&train, &test)
            .unwrap_err();
        assert!(err.to_string().contains("17"), "{err}");
    }

    #[test]
    fn constant_column_follows_zero_variance_policy() {
        let records: Vec<(Vec<f64>, &str)> = (0..12)
            .map(|i| (vec![i as f64, 5.0], if i < 6 { "lo" } else { "hi" }))
            .collect();
        let ds = Dataset::from_records("flat", &["x", "c"], "band", &records).unwrap();

        let reject = task(ScalingMode::Standardize, "1");
        assert!(reject.run_on(&ds).is_err());

        let center = SweepTask::new(SweepConfig {
            data: "unused.csv".into(),
            k_values: "1".into(),
            zero_variance: ZeroVariancePolicy::Center,
            ..SweepConfig::default()
        })
        .unwrap();
        let report = center.run_on(&ds).unwrap();
        assert_eq!(report.train_size + report.test_size, 12);
        assert_eq!(report.test_size, 3);
        assert_eq!(report.scaler.unwrap().degenerate_columns(), vec![1]);
    }

    #[test]
    fn same_seed_same_report() {
        let (train, _) = split(1.0);
        let t = task(ScalingMode::Standardize, "1..=5");
        let a = t.run_on(&train).unwrap();
        let b = t.run_on(&train).unwrap();
        assert_eq!(test_accuracies(&a), test_accuracies(&b));
        assert_eq!(a.best_k, b.best_k);
    }

    #[test]
    fn run_loads_csv_from_disk() {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(f, "name,x,y,class").unwrap();
        for (i, (row, label)) in TRAIN.iter().chain(TEST.iter()).enumerate() {
            writeln!(f, "\"p{i}\",{},{},{label}", row[0], row[1]).unwrap();
        }
        f.flush().unwrap();

        let config = SweepConfig {
            data: f.path().to_path_buf(),
            feature_columns: Some("x,y".into()),
            k_values: "1,3".into(),
            ..SweepConfig::default()
        };
        let report = SweepTask::new(config).unwrap().run().unwrap();
        assert_eq!(report.train_size, 18);
        assert_eq!(report.test_size, 6);
        assert_eq!(report.header.class_attribute.name, "class");
        assert_eq!(report.curve.len(), 2);
    }

    #[test]
    fn missing_file_and_bad_config_are_errors() {
        let t = task(ScalingMode::Unscaled, "1");
        let err = t.run().unwrap_err();
        assert!(format!("{err:#}").contains("unused.csv"));

        assert!(SweepTask::new(SweepConfig::default()).is_err());
    }
}
