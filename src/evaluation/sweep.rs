use crate::classifiers::{Classifier, KnnClassifier};
use crate::core::dataset::Dataset;
use crate::error::KnnError;
use crate::evaluation::metrics::score;
use crate::evaluation::preview::sweep_curve::SweepCurve;
use crate::evaluation::preview::sweep_point::SweepPoint;
use cpu_time::ThreadTime;
use std::sync::Arc;

/// Fits a fresh [`KnnClassifier`] on `train` for every k and scores it on
/// both partitions. Results keep the order of `k_values`.
pub fn sweep(train: &Dataset, test: &Dataset, k_values: &[usize]) -> Result<SweepCurve, KnnError> {
    sweep_with(train, test, k_values, KnnClassifier::<usize>::new, |_| {})
}

/// [`sweep`] with the classifier built by `make(k)` and `on_point` called
/// after each k is scored.
pub fn sweep_with<C, F, P>(
    train: &Dataset,
    test: &Dataset,
    k_values: &[usize],
    mut make: F,
    mut on_point: P,
) -> Result<SweepCurve, KnnError>
where
    C: Classifier<Label = usize>,
    F: FnMut(usize) -> C,
    P: FnMut(&SweepPoint),
{
    if k_values.is_empty() {
        return Err(KnnError::invalid("no k values to sweep"));
    }
    check_partitions(train, test)?;

    let mut curve = SweepCurve::default();
    for &k in k_values {
        let started = ThreadTime::now();

        let mut classifier = make(k);
        classifier.fit_labels(train.features(), train.labels())?;
        let training_accuracy = score(&classifier, train.features(), train.labels())?;
        let testing_accuracy = score(&classifier, test.features(), test.labels())?;

        let point = SweepPoint {
            k,
            training_accuracy,
            testing_accuracy,
            seconds: started.elapsed().as_secs_f64(),
        };
        on_point(&point);
        curve.push(point);
    }

    Ok(curve)
}

/// k with the highest testing accuracy; ties go to the smallest k.
pub fn best_k(points: &[SweepPoint]) -> Result<usize, KnnError> {
    let mut best: Option<&SweepPoint> = None;
    for p in points {
        best = match best {
            None => Some(p),
            Some(b) if p.testing_accuracy > b.testing_accuracy => Some(p),
            Some(b) if p.testing_accuracy == b.testing_accuracy && p.k < b.k => Some(p),
            keep => keep,
        };
    }
    best.map(|p| p.k)
        .ok_or_else(|| KnnError::invalid("no sweep results to choose from"))
}

fn check_partitions(train: &Dataset, test: &Dataset) -> Result<(), KnnError> {
    if train.scaling() != test.scaling() {
        return Err(KnnError::ScalingMismatch {
            train: train.scaling(),
            test: test.scaling(),
        });
    }

    let (a, b) = (train.shared_header(), test.shared_header());
    if Arc::ptr_eq(&a, &b) {
        return Ok(());
    }
    if a.feature_names() != b.feature_names() {
        return Err(KnnError::invalid(
            "train and test partitions have different feature columns",
        ));
    }
    if a.class_attribute.values != b.class_attribute.values {
        return Err(KnnError::invalid(
            "train and test partitions have different label sets",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{FeatureScaler, Standardized, ZeroVariancePolicy};
    use crate::testing::{ConstantClassifier, FitSpyClassifier};

    fn point(k: usize, test: f64) -> SweepPoint {
        SweepPoint {
            k,
            training_accuracy: 1.0,
            testing_accuracy: test,
            seconds: 0.0,
        }
    }

    fn two_clusters() -> Dataset {
        let mut records = Vec::new();
        for i in 0..6 {
            records.push((vec![i as f64 * 0.1, 0.0], "low"));
            records.push((vec![5.0 + i as f64 * 0.1, 1.0], "high"));
        }
        records.push((vec![0.05, 0.0], "high"));
        Dataset::from_records("clusters", &["x", "y"], "band", &records).unwrap()
    }

    #[test]
    fn best_k_picks_max_test_accuracy_then_smallest_k() {
        let pts = vec![point(9, 0.7), point(3, 0.8), point(5, 0.8), point(1, 0.6)];
        assert_eq!(best_k(&pts).unwrap(), 3);
        assert_eq!(best_k(&[point(4, 0.1)]).unwrap(), 4);
        assert!(matches!(best_k(&[]), Err(KnnError::InvalidArgument(_))));
    }

    #[test]
    fn sweep_preserves_k_order() {
        let ds = two_clusters();
        let train = ds.subset(&(0..10).collect::<Vec<_>>()).unwrap();
        let test = ds.subset(&[10, 11, 12]).unwrap();

        let curve = sweep(&train, &test, &[5, 1, 3]).unwrap();
        let ks: Vec<usize> = curve.iter().map(|p| p.k).collect();
        assert_eq!(ks, vec![5, 1, 3]);
    }

    #[test]
    fn k1_memorizes_training_set() {
        let ds = two_clusters();
        let curve = sweep(&ds, &ds, &[1, 13]).unwrap();
        assert_eq!(curve.points()[0].training_accuracy, 1.0);
        // k = n: every row gets the majority label ("high", 7 of 13)
        assert!((curve.points()[1].training_accuracy - 7.0 / 13.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_k_values_propagate() {
        let ds = two_clusters();
        assert!(matches!(
            sweep(&ds, &ds, &[]),
            Err(KnnError::InvalidArgument(_))
        ));
        assert!(matches!(
            sweep(&ds, &ds, &[1, 0]),
            Err(KnnError::InvalidArgument(_))
        ));
        assert_eq!(
            sweep(&ds, &ds, &[14]).unwrap_err(),
            KnnError::InsufficientData {
                k: 14,
                available: 13
            }
        );
    }

    #[test]
    fn separately_scaled_partitions_are_flagged() {
        let ds = two_clusters();
        let train = ds.subset(&(0..10).collect::<Vec<_>>()).unwrap();
        let test = ds.subset(&[10, 11, 12]).unwrap();

        let own_train = FeatureScaler::fit_dataset(&train, ZeroVariancePolicy::Reject)
            .unwrap()
            .transform_dataset(&train)
            .unwrap();
        let own_test = FeatureScaler::fit_dataset(&test, ZeroVariancePolicy::Center)
            .unwrap()
            .transform_dataset(&test)
            .unwrap();

        let err = sweep(&own_train, &own_test, &[1]).unwrap_err();
        assert!(matches!(err, KnnError::ScalingMismatch { .. }));

        let err = sweep(&own_train, &test, &[1]).unwrap_err();
        assert!(matches!(err, KnnError::ScalingMismatch { test: None, .. }));

        let s = Standardized::fit_on_train(&train, &test, ZeroVariancePolicy::Reject).unwrap();
        assert!(sweep(&s.train, &s.test, &[1, 3]).is_ok());
    }

    #[test]
    fn mismatched_headers_are_rejected() {
        let a = Dataset::from_records("a", &["x"], "y", &[(vec![0.0], "p"), (vec![1.0], "q")])
            .unwrap();
        let b = Dataset::from_records("b", &["x"], "y", &[(vec![0.0], "p"), (vec![1.0], "r")])
            .unwrap();
        assert!(matches!(
            sweep(&a, &b, &[1]),
            Err(KnnError::InvalidArgument(_))
        ));

        let c = Dataset::from_records("c", &["z"], "y", &[(vec![0.0], "p"), (vec![1.0], "q")])
            .unwrap();
        assert!(matches!(
            sweep(&a, &c, &[1]),
            Err(KnnError::InvalidArgument(_))
        ));
    }

    #[test]
    fn every_k_gets_a_fresh_classifier() {
        let ds = two_clusters();
        let (spy, handle) = FitSpyClassifier::new();
        let mut built = 0;
        let curve = sweep_with(
            &ds,
            &ds,
            &[1, 2, 3, 4],
            |_k| {
                built += 1;
                spy.fresh()
            },
            |_| {},
        )
        .unwrap();

        assert_eq!(curve.len(), 4);
        assert_eq!(built, 4);
        assert_eq!(handle.fits(), 4);
        assert_eq!(handle.refits(), 0);
    }

    #[test]
    fn on_point_sees_every_result_in_order() {
        let ds = two_clusters();
        let mut seen = Vec::new();
        let curve = sweep_with(
            &ds,
            &ds,
            &[3, 1],
            |_| ConstantClassifier::new(0),
            |p| seen.push(p.k),
        )
        .unwrap();

        assert_eq!(seen, vec![3, 1]);
        // label 0 is "high": 7 of 13 rows
        for p in curve.iter() {
            assert!((p.testing_accuracy - 7.0 / 13.0).abs() < 1e-12);
            assert!(p.seconds >= 0.0);
        }
    }
}
