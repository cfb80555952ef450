//! Finding a PDF417 symbol's rows by their start/stop guard patterns
//! (spec §4.8).

pub mod detector;

pub use detector::{Detector, Pdf417DetectorResult, RowScan};
