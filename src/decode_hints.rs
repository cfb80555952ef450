//! Configuration surface handed to a [`crate::reader::Reader`] (spec §6).

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::BarcodeFormat;

/// Invoked zero or more times during detection with each candidate point
/// found, purely for caller-side progress reporting (e.g. a viewfinder
/// overlay). Must not panic, block, or mutate anything the decoder reads;
/// it is always called synchronously on the decoding thread (spec §5, §6).
pub trait ResultPointCallback: Fn(f32, f32) + Send + Sync {}
impl<T: Fn(f32, f32) + Send + Sync> ResultPointCallback for T {}

#[derive(Clone, Default)]
pub struct DecodeHints {
    /// Subset of formats to attempt. Empty = try all default 1D and 2D
    /// formats (spec §6).
    pub formats: Option<HashSet<BarcodeFormat>>,
    /// Do more exhaustive scans: more row offsets in 1D, retry on a
    /// transposed matrix in 2D.
    pub try_harder: bool,
    /// Forces Byte-segment decoding to a named character set instead of the
    /// heuristic detector.
    pub character_set: Option<String>,
    /// Treat the first decoded byte as FNC1 (GS1 application identifier
    /// framing) even if the symbol didn't declare it.
    pub assume_gs1: bool,
    /// Sink for detected candidate points; see [`ResultPointCallback`].
    pub result_point_callback: Option<Arc<dyn ResultPointCallback>>,
}

impl fmt::Debug for DecodeHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeHints")
            .field("formats", &self.formats)
            .field("try_harder", &self.try_harder)
            .field("character_set", &self.character_set)
            .field("assume_gs1", &self.assume_gs1)
            .field("result_point_callback", &self.result_point_callback.is_some())
            .finish()
    }
}

impl DecodeHints {
    pub fn wants(&self, format: BarcodeFormat) -> bool {
        match &self.formats {
            None => true,
            Some(set) => set.contains(&format),
        }
    }

    pub fn notify_point(&self, x: f32, y: f32) {
        if let Some(cb) = &self.result_point_callback {
            cb(x, y);
        }
    }
}
