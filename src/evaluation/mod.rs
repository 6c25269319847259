mod metrics;
mod preview;
mod sweep;

pub use metrics::{accuracy, null_accuracy, score};
pub use preview::sweep_curve::{CurveFormat, SweepCurve};
pub use preview::sweep_point::SweepPoint;
pub use sweep::{best_k, sweep, sweep_with};
