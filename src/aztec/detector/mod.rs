//! Locating an Aztec symbol's bullseye, reading its mode message, and
//! sampling its data grid (spec §4.8).

pub mod detector;

pub use detector::{AztecDetectorResult, Detector};
