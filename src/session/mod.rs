pub mod controller;
pub mod loop_worker;

pub use controller::{ChartSession, ChartStatus};
pub use loop_worker::{ChartEvent, LoadFuture, WeekLoader};
