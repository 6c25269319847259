pub mod fit_spy_classifier;
