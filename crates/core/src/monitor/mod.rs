//! Progress monitor and idle-based completion detector.
//!
//! The monitor wakes up every `idle_interval_secs`, logs a progress line and
//! compares the processed count with the previous tick. No change for one
//! full interval is taken to mean the input is exhausted and the workers are
//! idle.
//!
//! This is a fallback: the normal end of a run is the record source closing
//! the conduit. The heuristic misfires when one action takes longer than the
//! interval while nothing else completes; the run is then declared done with
//! that action still in flight.

mod config;
mod detector;

pub use config::MonitorConfig;
pub use detector::{IdleDetector, MonitorExit, MonitorState, ProgressMonitor};
