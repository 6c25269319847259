use crate::core::dataset::Dataset;
use crate::error::KnnError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Shuffles row indices with a PRNG seeded by `seed` and cuts off
/// `round(n * test_fraction)` rows as the test partition. The same seed
/// always yields the same split.
pub fn train_test_split(
    dataset: &Dataset,
    test_fraction: f64,
    seed: u64,
) -> Result<(Dataset, Dataset), KnnError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(KnnError::invalid(format!(
            "test_fraction must be between 0 and 1, got {test_fraction}"
        )));
    }

    let n = dataset.len();
    let n_test = (n as f64 * test_fraction).round() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(KnnError::invalid(format!(
            "split would leave an empty partition (n_train={n_train}, n_test={n_test})"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    Ok((dataset.subset(train_idx)?, dataset.subset(test_idx)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn dataset(n: usize) -> Dataset {
        let records: Vec<(Vec<f64>, &str)> = (0..n)
            .map(|i| (vec![i as f64], if i % 2 == 0 { "even" } else { "odd" }))
            .collect();
        Dataset::from_records("n", &["i"], "parity", &records).unwrap()
    }

    fn ids(ds: &Dataset) -> Vec<usize> {
        ds.features().iter().map(|f| f[0] as usize).collect()
    }

    #[test]
    fn sizes_follow_rounded_fraction() {
        let (train, test) = train_test_split(&dataset(10), 0.25, 42).unwrap();
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 7);
    }

    #[test]
    fn partitions_are_disjoint_and_exhaustive() {
        let (train, test) = train_test_split(&dataset(50), 0.3, 7).unwrap();
        let a: HashSet<usize> = ids(&train).into_iter().collect();
        let b: HashSet<usize> = ids(&test).into_iter().collect();
        assert!(a.is_disjoint(&b));
        assert_eq!(a.len() + b.len(), 50);
    }

    #[test]
    fn same_seed_same_split() {
        let ds = dataset(40);
        let (tr1, te1) = train_test_split(&ds, 0.25, 42).unwrap();
        let (tr2, te2) = train_test_split(&ds, 0.25, 42).unwrap();
        assert_eq!(ids(&tr1), ids(&tr2));
        assert_eq!(ids(&te1), ids(&te2));

        let (_, te3) = train_test_split(&ds, 0.25, 43).unwrap();
        assert_ne!(ids(&te1), ids(&te3));
    }

    #[test]
    fn labels_follow_their_rows() {
        let ds = dataset(20);
        let (train, test) = train_test_split(&ds, 0.5, 1).unwrap();
        for part in [&train, &test] {
            for (f, &l) in part.features().iter().zip(part.labels()) {
                let expected = if (f[0] as usize) % 2 == 0 { "even" } else { "odd" };
                assert_eq!(part.label_name(l), Some(expected));
            }
        }
    }

    #[test]
    fn rejects_bad_fractions_and_tiny_sets() {
        let ds = dataset(10);
        for f in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                train_test_split(&ds, f, 0),
                Err(KnnError::InvalidArgument(_))
            ));
        }
        assert!(train_test_split(&dataset(1), 0.25, 0).is_err());
        assert!(train_test_split(&dataset(2), 0.9, 0).is_err());
    }
}
