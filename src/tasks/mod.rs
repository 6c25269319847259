mod sweep_task;

pub use sweep_task::{SweepReport, SweepTask};
