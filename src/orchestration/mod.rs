pub mod monitor;

pub use monitor::{
    ApplyOutcome, AssessmentUpdate, IgnoreReason, Monitor, MonitorError, PositionView, SessionInfo,
};
