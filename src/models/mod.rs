pub mod dto;
pub mod session;

pub use dto::{ChartDto, ChartSeries, CircuitStatusUpdate, LearningCircuitDto, TalkMessage};
pub use session::{SessionStamp, SessionStatus, TroublePoint};
