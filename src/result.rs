//! The outward-facing decode envelope (spec §3, §6).

use crate::common::DecoderResult;
use crate::{BarcodeFormat, Point};

/// The result of a successful decode: text, raw bytes, the image-space
/// corners that were located, and which format produced it.
#[derive(Debug, Clone)]
pub struct RXingResult {
    text: String,
    raw_bytes: Vec<u8>,
    points: Vec<Point>,
    format: BarcodeFormat,
    byte_segments: Vec<Vec<u8>>,
    ec_level: Option<String>,
}

impl RXingResult {
    pub fn new(text: String, raw_bytes: Vec<u8>, points: Vec<Point>, format: BarcodeFormat) -> Self {
        Self {
            text,
            raw_bytes,
            points,
            format,
            byte_segments: Vec::new(),
            ec_level: None,
        }
    }

    pub fn from_decoder_result(
        decoder_result: DecoderResult,
        points: Vec<Point>,
        format: BarcodeFormat,
    ) -> Self {
        Self {
            text: decoder_result.text().to_owned(),
            raw_bytes: decoder_result.raw_bytes().to_vec(),
            points,
            format,
            byte_segments: decoder_result.byte_segments().to_vec(),
            ec_level: decoder_result.ec_level().map(str::to_owned),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn format(&self) -> BarcodeFormat {
        self.format
    }

    pub fn byte_segments(&self) -> &[Vec<u8>] {
        &self.byte_segments
    }

    pub fn ec_level(&self) -> Option<&str> {
        self.ec_level.as_deref()
    }

    /// Re-tag this result as a different format without touching the
    /// decoded payload. Used by the EAN-13/UPC-A post-processing step in
    /// `MultiFormatReader` (spec §4.11).
    pub fn with_format(mut self, format: BarcodeFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = text;
        self
    }
}
