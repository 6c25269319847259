pub mod sweep_curve;
pub mod sweep_point;
