//! The common entry point every symbology decoder implements, and the
//! dispatcher that tries them in a fixed order (spec §4.11).

use crate::binary_bitmap::BinaryBitmap;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::result::RXingResult;

/// One symbology's decode attempt over an already-binarized image.
/// Implementations must return [`Exceptions::NotFound`] (never panic) when
/// no symbol of their kind is present, so [`MultiFormatReader`] can fall
/// through to the next reader (spec §4.11).
pub trait Reader: std::fmt::Debug {
    fn decode(&mut self, image: &mut BinaryBitmap) -> Result<RXingResult> {
        self.decode_with_hints(image, &DecodeHints::default())
    }

    fn decode_with_hints(&mut self, image: &mut BinaryBitmap, hints: &DecodeHints) -> Result<RXingResult>;

    /// Clears any per-scan state readers that implement continuous/video
    /// scanning accumulate (e.g. structured-append fragments).
    fn reset(&mut self) {}
}

/// Tries every reader for a hinted (or, with no hints, every default)
/// format in a fixed order, returning the first successful decode. This is
/// the crate's main entry point for most callers (spec §4.11).
#[derive(Debug, Default)]
pub struct MultiFormatReader {
    hints: DecodeHints,
    readers: Vec<Box<dyn Reader>>,
}

impl MultiFormatReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, image: &mut BinaryBitmap) -> Result<RXingResult> {
        self.set_hints(DecodeHints::default());
        self.decode_internal(image)
    }

    pub fn decode_with_hints(&mut self, image: &mut BinaryBitmap, hints: DecodeHints) -> Result<RXingResult> {
        self.set_hints(hints);
        self.decode_internal(image)
    }

    /// Reuses the reader set built from the last [`Self::set_hints`] call,
    /// the way continuous-scan callers avoid rebuilding the reader list on
    /// every frame (spec §6).
    pub fn decode_with_state(&mut self, image: &mut BinaryBitmap) -> Result<RXingResult> {
        if self.readers.is_empty() {
            self.set_hints(DecodeHints::default());
        }
        self.decode_internal(image)
    }

    /// Builds the reader set for `hints`. Dispatch order is fixed and
    /// unconditional regardless of `try_harder`: the four 2D symbologies
    /// (QR, Data Matrix, Aztec, PDF417), then the 1D family (spec §4.11,
    /// §5 "Ordering").
    pub fn set_hints(&mut self, hints: DecodeHints) {
        let mut readers: Vec<Box<dyn Reader>> = Vec::new();

        let wants_any_1d = [
            crate::BarcodeFormat::UpcA,
            crate::BarcodeFormat::UpcE,
            crate::BarcodeFormat::Ean13,
            crate::BarcodeFormat::Ean8,
            crate::BarcodeFormat::Codabar,
            crate::BarcodeFormat::Code39,
            crate::BarcodeFormat::Code93,
            crate::BarcodeFormat::Code128,
            crate::BarcodeFormat::Itf,
            crate::BarcodeFormat::Rss14,
        ]
        .into_iter()
        .any(|f| hints.wants(f));

        if hints.wants(crate::BarcodeFormat::QrCode) {
            readers.push(Box::new(crate::qrcode::QrCodeReader::new()));
        }
        if hints.wants(crate::BarcodeFormat::DataMatrix) {
            readers.push(Box::new(crate::datamatrix::DataMatrixReader::new()));
        }
        if hints.wants(crate::BarcodeFormat::Aztec) {
            readers.push(Box::new(crate::aztec::AztecReader::new()));
        }
        if hints.wants(crate::BarcodeFormat::Pdf417) {
            readers.push(Box::new(crate::pdf417::Pdf417Reader::new()));
        }
        if wants_any_1d {
            readers.push(Box::new(crate::oned::MultiFormatOneDReader::new(&hints)));
        }

        self.hints = hints;
        self.readers = readers;
    }

    /// Tries each reader in turn. A `NotFound` just means "not this format",
    /// so the loop moves on; `FormatError`/`ChecksumError` mean a symbol of
    /// that format was located but didn't decode, which is only reported
    /// once every other reader has also failed (spec §4.11, §7).
    fn decode_internal(&mut self, image: &mut BinaryBitmap) -> Result<RXingResult> {
        let mut last_error = None;
        for reader in self.readers.iter_mut() {
            match reader.decode_with_hints(image, &self.hints) {
                Ok(result) => return Ok(result),
                Err(Exceptions::NotFound(_)) => {}
                Err(err) => last_error = Some(err),
            }
        }
        Err(last_error.unwrap_or_else(Exceptions::not_found_bare))
    }

    pub fn reset(&mut self) {
        for reader in self.readers.iter_mut() {
            reader.reset();
        }
    }
}
