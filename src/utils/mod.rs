//! Console and file output helpers

pub mod display;

pub use display::{Console, GenerationTicker, ReportFormatter, SliceFormatter, Tone};
