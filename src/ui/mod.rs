//! Interactive terminal UI
//!
//! The UI task owns all display state. It starts and stops sessions and
//! applies runner events in the order they were sent.

pub mod app;
pub mod chart;
pub mod render;
pub mod terminal;

pub use app::{App, Session};
pub use chart::ChartData;
pub use terminal::run;
