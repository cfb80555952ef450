//! Data Matrix symbol location: white-rectangle corner finding plus
//! transition-count edge classification (spec §4.8).

pub mod detector;

pub use detector::Detector;
